// ==========================================
// 注塑排产系统 - 领域类型定义
// ==========================================
// 紧急度分档 / 优先级方向 / 选单原因 / 工时模型
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// 交期紧急度分档 (Urgency Band)
// ==========================================
// 按距交期天数分档,升序匹配,命中即止
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UrgencyBand {
    Critical, // <= 1 天
    High,     // <= 3 天
    Medium,   // <= 7 天
    Low,      // <= 14 天
    Relaxed,  // > 14 天
}

impl UrgencyBand {
    /// 由距交期天数判定分档
    pub fn from_days(days_to_deadline: i64) -> Self {
        if days_to_deadline <= 1 {
            UrgencyBand::Critical
        } else if days_to_deadline <= 3 {
            UrgencyBand::High
        } else if days_to_deadline <= 7 {
            UrgencyBand::Medium
        } else if days_to_deadline <= 14 {
            UrgencyBand::Low
        } else {
            UrgencyBand::Relaxed
        }
    }

    /// 分档对应的紧急度得分
    pub fn score(&self) -> f64 {
        match self {
            UrgencyBand::Critical => 50.0,
            UrgencyBand::High => 40.0,
            UrgencyBand::Medium => 30.0,
            UrgencyBand::Low => 20.0,
            UrgencyBand::Relaxed => 5.0,
        }
    }
}

impl fmt::Display for UrgencyBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UrgencyBand::Critical => write!(f, "CRITICAL"),
            UrgencyBand::High => write!(f, "HIGH"),
            UrgencyBand::Medium => write!(f, "MEDIUM"),
            UrgencyBand::Low => write!(f, "LOW"),
            UrgencyBand::Relaxed => write!(f, "RELAXED"),
        }
    }
}

// ==========================================
// 优先级方向 (Priority Rank Direction)
// ==========================================
// MRP 优先级数值的业务含义由配置决定
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PriorityRankDirection {
    LowerIsUrgent,  // 数值越小越紧急 (默认)
    HigherIsUrgent, // 数值越大越紧急
}

impl PriorityRankDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            PriorityRankDirection::LowerIsUrgent => "lower_is_urgent",
            PriorityRankDirection::HigherIsUrgent => "higher_is_urgent",
        }
    }
}

impl Default for PriorityRankDirection {
    fn default() -> Self {
        PriorityRankDirection::LowerIsUrgent
    }
}

impl fmt::Display for PriorityRankDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for PriorityRankDirection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "lower_is_urgent" | "lower-is-urgent" | "asc" => Ok(PriorityRankDirection::LowerIsUrgent),
            "higher_is_urgent" | "higher-is-urgent" | "desc" => {
                Ok(PriorityRankDirection::HigherIsUrgent)
            }
            other => Err(format!("未知优先级方向: {}", other)),
        }
    }
}

// ==========================================
// 选单原因 (Selection Reason)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SelectionReason {
    HeadOfQueue, // 按 UPS 队首
    Opportunity, // 同模具机会单前移
}

impl fmt::Display for SelectionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SelectionReason::HeadOfQueue => write!(f, "HEAD_OF_QUEUE"),
            SelectionReason::Opportunity => write!(f, "OPPORTUNITY"),
        }
    }
}

// ==========================================
// 工时模型 (Cost Model)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CostModel {
    SameMould,  // 同模具连续生产,不含换型
    Changeover, // 换模具,含换型/准备时间
}

impl CostModel {
    /// 根据当前在机模具判定工时模型
    pub fn for_mould(mould_id: &str, current_mould: Option<&str>) -> Self {
        match current_mould {
            Some(current) if current == mould_id => CostModel::SameMould,
            _ => CostModel::Changeover,
        }
    }
}

impl fmt::Display for CostModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CostModel::SameMould => write!(f, "SAME_MOULD"),
            CostModel::Changeover => write!(f, "CHANGEOVER"),
        }
    }
}

// ==========================================
// 排序器状态 (Sequencer State)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SequencerState {
    Running, // 待排队列非空
    Done,    // 终态
}

impl fmt::Display for SequencerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SequencerState::Running => write!(f, "RUNNING"),
            SequencerState::Done => write!(f, "DONE"),
        }
    }
}
