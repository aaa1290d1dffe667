// ==========================================
// 注塑排产系统 - 核心库
// ==========================================
// 系统定位: 模具换型感知的贪心订单排序
// 主流程: 导入 → UPS 打分 → 按机台排序 (机会单前瞻) → 导出
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 引擎层 - 打分与排序
pub mod engine;

// 导入层 - 外部数据
pub mod importer;

// 导出层 - 排产结果
pub mod export;

// 配置层 - 系统配置
pub mod config;

// 日志系统
pub mod logging;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::{CostModel, PriorityRankDirection, SelectionReason, SequencerState, UrgencyBand};

// 领域实体
pub use domain::{
    Machine, MachineSchedule, OrderScore, ProductionOrder, ScheduleEntry, ScheduleRunResult,
    ScoredOrder, UnschedulableOrder,
};

// 引擎
pub use engine::{
    ConstraintValidator, EngineError, EngineResult, MouldPartitionIndex, OpportunityLookahead,
    ScheduleOrchestrator, Sequencer, UpsScorer,
};

// 配置
pub use config::{ConfigManager, SchedulingConfigReader};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "注塑排产系统";
