// ==========================================
// 注塑排产系统 - 引擎层
// ==========================================
// 职责: UPS 打分、模具分区、机会单前瞻、约束校验、单机台排序
// 红线: 引擎只做内存计算,不做文件读写
// 红线: 每张订单的选单原因必须可追溯 (HeadOfQueue / Opportunity)
// ==========================================

pub mod constraint;
pub mod cost_model;
pub mod error;
pub mod lookahead;
pub mod mould_index;
pub mod orchestrator;
pub mod order_validator;
pub mod pending_queue;
pub mod priority;
pub mod sequencer;

// 重导出核心引擎
pub use constraint::{ConstraintValidator, ConstraintViolation};
pub use cost_model::{checked_finish, gross_duration, gross_processing_hours};
pub use error::{EngineError, EngineResult};
pub use lookahead::{LookaheadOutcome, OpportunityLookahead};
pub use mould_index::MouldPartitionIndex;
pub use orchestrator::{partition_by_machine, MachineBatch, MachinePartition, ScheduleOrchestrator};
pub use order_validator::OrderContractValidator;
pub use pending_queue::{OrderSlot, PendingQueue};
pub use priority::{DatasetStats, UpsScorer};
pub use sequencer::{sequence_machine, MachineContext, Sequencer};
