// ==========================================
// 注塑排产系统 - 导入错误
// ==========================================
// 只覆盖整批导入失败的情形
// 单行数据问题不走错误通道,记入 RejectedRow
// ==========================================

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ImportError {
    // ----- 数据源 -----
    #[error("数据文件不存在: {0}")]
    FileNotFound(String),

    #[error("不支持的数据文件类型: {0} (可用: xlsx / xls / csv)")]
    UnsupportedFormat(String),

    #[error("数据文件读取失败: {0}")]
    FileReadError(String),

    #[error("工作簿解析失败: {0}")]
    ExcelParseError(String),

    #[error("CSV 解析失败: {0}")]
    CsvParseError(String),

    /// 工作簿需同时包含订单表 (第 1 个) 与机台表 (第 2 个)
    #[error("工作簿缺少第 {index} 个工作表 (实际 {available} 个)")]
    SheetNotFound { index: usize, available: usize },

    // ----- 表结构 -----
    #[error("{source_name} 缺少必需列 {column}")]
    MissingColumn { source_name: String, column: String },

    #[error("第 {row} 行字段 {field} 无法转换: {message}")]
    TypeConversionError {
        row: usize,
        field: String,
        message: String,
    },

    #[error("导入内部错误: {0}")]
    InternalError(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl From<std::io::Error> for ImportError {
    fn from(err: std::io::Error) -> Self {
        Self::FileReadError(err.to_string())
    }
}

impl From<csv::Error> for ImportError {
    fn from(err: csv::Error) -> Self {
        Self::CsvParseError(err.to_string())
    }
}

impl From<calamine::Error> for ImportError {
    fn from(err: calamine::Error) -> Self {
        Self::ExcelParseError(err.to_string())
    }
}

pub type ImportResult<T> = Result<T, ImportError>;
