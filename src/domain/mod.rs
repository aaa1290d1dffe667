// ==========================================
// 注塑排产系统 - 领域模型层
// ==========================================
// 职责: 定义领域实体、类型
// 红线: 不含文件读写逻辑,不含引擎逻辑
// ==========================================

pub mod machine;
pub mod order;
pub mod schedule;
pub mod types;

// 重导出核心类型
pub use machine::Machine;
pub use order::{OrderScore, ProductionOrder, RawMachineRecord, RawOrderRecord, ScoredOrder};
pub use schedule::{MachineSchedule, ScheduleEntry, ScheduleRunResult, UnschedulableOrder};
pub use types::{CostModel, PriorityRankDirection, SelectionReason, SequencerState, UrgencyBand};
