// ==========================================
// 注塑排产系统 - 引擎层错误类型
// ==========================================
// Validation: 输入契约违反（快速失败,不做隐式修正）
// InternalInconsistency: 簿记不一致（程序缺陷,不可恢复）
// ==========================================

use crate::config::ConfigError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("订单校验失败 (order_id={order_id}, field={field}): {message}")]
    Validation {
        order_id: String,
        field: String,
        message: String,
    },

    #[error("内部一致性错误: {0}")]
    InternalInconsistency(String),

    #[error("计划时间超出可表示范围 (machine={machine_id}, order_id={order_id}): 毛工时 {gross_hours}h")]
    TimelineOverflow {
        machine_id: String,
        order_id: String,
        gross_hours: f64,
    },

    #[error("机台排产超时 (machine={machine_id}): 超过 {budget_ms}ms 上限")]
    MachineBudgetExceeded { machine_id: String, budget_ms: u64 },

    #[error("排产任务执行失败: {0}")]
    TaskJoin(String),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl From<tokio::task::JoinError> for EngineError {
    fn from(err: tokio::task::JoinError) -> Self {
        EngineError::TaskJoin(err.to_string())
    }
}

/// Result 类型别名
pub type EngineResult<T> = Result<T, EngineError>;
