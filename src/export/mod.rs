// ==========================================
// 注塑排产系统 - 导出层
// ==========================================
// 职责: 排产结果 → CSV (每机台) + JSON 运行摘要
// 红线: 只做展示格式化,不改动排产结果
// ==========================================

pub mod error;
pub mod schedule_exporter;

pub use error::{ExportError, ExportResult};
pub use schedule_exporter::{
    round2, ExportReport, MachineSummary, RunSummary, ScheduleExporter, ScheduleRow,
};
