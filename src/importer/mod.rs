// ==========================================
// 注塑排产系统 - 导入层
// ==========================================
// 职责: 外部数据导入,生成已清洗、已关联机台的订单
// 支持: Excel 工作簿 (订单表 + 机台表), CSV 文件对
// ==========================================

// 模块声明
pub mod data_cleaner;
pub mod error;
pub mod field_mapper;
pub mod file_parser;
pub mod order_importer;
pub mod order_importer_trait;

// 重导出核心类型
pub use data_cleaner::DataCleaner as DataCleanerImpl;
pub use error::{ImportError, ImportResult};
pub use field_mapper::{normalize_column_name, FieldMapper as FieldMapperImpl};
pub use file_parser::{CsvParser, ExcelParser, UniversalFileParser};
pub use order_importer::{ImportOutcome, OrderImporterImpl, RejectedRow};

// 重导出 Trait 接口
pub use order_importer_trait::{DataCleaner, FieldMapper, FileParser, OrderImporter, RawRow};
