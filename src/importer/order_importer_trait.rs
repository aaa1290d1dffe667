// ==========================================
// 注塑排产系统 - 订单导入 Trait
// ==========================================
// 职责: 定义订单/机台导入接口（不包含实现）
// 管道: 文件解析 → 列名标准化 → 字段映射 → 清洗 → 行过滤 → 机台关联
// ==========================================

use crate::domain::order::{RawMachineRecord, RawOrderRecord};
use crate::importer::error::ImportResult;
use crate::importer::order_importer::ImportOutcome;
use async_trait::async_trait;
use chrono::NaiveDateTime;
use std::collections::HashMap;
use std::path::Path;

/// 原始行记录（列名 → 值）
pub type RawRow = HashMap<String, String>;

// ==========================================
// OrderImporter Trait
// ==========================================
// 实现者: OrderImporterImpl
#[async_trait]
pub trait OrderImporter: Send + Sync {
    /// 从工作簿导入（第 1 个工作表为订单,第 2 个为机台）
    ///
    /// # 返回
    /// - Ok(ImportOutcome): 订单、机台、被剔除行、批次号
    /// - Err: 文件不存在、格式错误、缺少必需列
    async fn import_workbook(&self, file_path: &Path) -> ImportResult<ImportOutcome>;

    /// 从 CSV 文件对导入
    async fn import_csv_pair(
        &self,
        orders_path: &Path,
        machines_path: &Path,
    ) -> ImportResult<ImportOutcome>;
}

// ==========================================
// FileParser Trait
// ==========================================
// 实现者: CsvParser, ExcelParser
pub trait FileParser: Send + Sync {
    /// 解析文件为原始行记录
    ///
    /// # 参数
    /// - file_path: 文件路径
    /// - sheet_index: 工作表序号（CSV 忽略）
    fn parse_to_raw_records(&self, file_path: &Path, sheet_index: usize) -> ImportResult<Vec<RawRow>>;
}

// ==========================================
// FieldMapper Trait
// ==========================================
// 实现者: FieldMapper
// 输入行的列名须已标准化
pub trait FieldMapper: Send + Sync {
    fn map_to_raw_order(&self, row: &RawRow, row_number: usize) -> ImportResult<RawOrderRecord>;

    fn map_to_raw_machine(&self, row: &RawRow, row_number: usize) -> ImportResult<RawMachineRecord>;
}

// ==========================================
// DataCleaner Trait
// ==========================================
// 实现者: DataCleaner
pub trait DataCleaner: Send + Sync {
    /// 空白 / NaN / NULL → None
    fn normalize_null(&self, value: Option<&str>) -> Option<String>;

    /// 欧式金额 ("1.234,56" → 1234.56)
    fn parse_european_decimal(&self, value: &str) -> Option<f64>;

    /// 普通数值（兼容 "," 小数点）
    fn parse_decimal(&self, value: &str) -> Option<f64>;

    /// 日期时间（无法解析 → None）
    fn parse_datetime(&self, value: &str) -> Option<NaiveDateTime>;
}
