// ==========================================
// 注塑排产系统 - 导出模块错误类型
// ==========================================

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("导出目录创建失败 ({path}): {message}")]
    OutputDirError { path: String, message: String },

    #[error("文件写入失败: {0}")]
    IoError(#[from] std::io::Error),

    #[error("CSV 写入失败: {0}")]
    CsvError(#[from] csv::Error),

    #[error("JSON 序列化失败: {0}")]
    JsonError(#[from] serde_json::Error),
}

/// Result 类型别名
pub type ExportResult<T> = Result<T, ExportError>;
