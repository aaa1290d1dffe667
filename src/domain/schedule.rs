// ==========================================
// 注塑排产系统 - 排产结果领域模型
// ==========================================
// 红线: 同一机台相邻两单首尾相接 (无间隙、无重叠)
// ==========================================

use crate::domain::types::{CostModel, SelectionReason};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ==========================================
// ScheduleEntry - 排产明细
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleEntry {
    pub seq_no: u32,                             // 机台内序号 (从 1 开始)
    pub order_id: String,
    pub machine_id: String,
    pub mould_id: String,
    pub ups: f64,
    pub unit_value: f64,
    pub value_score: f64,
    pub order_value: f64,
    pub actual_gross_processing_time_h: f64,     // 实际毛工时 (小时)
    pub needed_on: NaiveDateTime,
    pub planned_start: NaiveDateTime,
    pub planned_end: NaiveDateTime,
    pub selection: SelectionReason,              // 选单原因
    pub cost_model: CostModel,                   // 工时模型
    pub covering_demand_until: Option<NaiveDateTime>, // 覆盖需求截止 (透传)
}

impl ScheduleEntry {
    /// 计划完工是否晚于需求日期
    pub fn is_late(&self) -> bool {
        self.planned_end > self.needed_on
    }

    pub fn is_changeover(&self) -> bool {
        self.cost_model == CostModel::Changeover
    }
}

// ==========================================
// MachineSchedule - 单机台排产结果
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MachineSchedule {
    pub machine_id: String,
    pub entries: Vec<ScheduleEntry>,
}

impl MachineSchedule {
    pub fn new(machine_id: &str) -> Self {
        Self {
            machine_id: machine_id.to_string(),
            entries: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn changeover_count(&self) -> usize {
        self.entries.iter().filter(|e| e.is_changeover()).count()
    }

    pub fn opportunity_count(&self) -> usize {
        self.entries
            .iter()
            .filter(|e| e.selection == SelectionReason::Opportunity)
            .count()
    }

    pub fn late_count(&self) -> usize {
        self.entries.iter().filter(|e| e.is_late()).count()
    }

    /// 机台最后完工时间
    pub fn makespan_end(&self) -> Option<NaiveDateTime> {
        self.entries.last().map(|e| e.planned_end)
    }

    /// 检查首尾相接约束
    pub fn is_contiguous(&self) -> bool {
        self.entries
            .windows(2)
            .all(|w| w[0].planned_end == w[1].planned_start)
    }
}

// ==========================================
// UnschedulableOrder - 无法排产的订单
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnschedulableOrder {
    pub order_id: String,
    pub machine_id: String,
    pub reason: String,
}

// ==========================================
// ScheduleRunResult - 一次排产运行的结果
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleRunResult {
    pub run_id: Uuid,
    pub reference_time: NaiveDateTime,
    pub machine_schedules: Vec<MachineSchedule>, // 按机台编号升序
    pub unschedulable: Vec<UnschedulableOrder>,
    pub config_snapshot_json: Option<String>,
}

impl ScheduleRunResult {
    pub fn scheduled_count(&self) -> usize {
        self.machine_schedules.iter().map(|s| s.len()).sum()
    }

    pub fn schedule_for(&self, machine_id: &str) -> Option<&MachineSchedule> {
        self.machine_schedules
            .iter()
            .find(|s| s.machine_id == machine_id)
    }
}
