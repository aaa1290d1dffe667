// ==========================================
// 注塑排产系统 - 机会单约束校验
// ==========================================
// 对机会单 c 与每张排在其前的同模具订单 h:
// 1) 交期: current_time + 同模具工时(c) + 4h 缓冲 不得晚于 h 交期
// 2) 价值: h 单价不得 >= c 单价 * 1.2
// 遇到 c 本身即停止扫描
// ==========================================

use crate::domain::order::ScoredOrder;
use crate::domain::types::CostModel;
use crate::engine::cost_model::{checked_finish, hours_to_duration};
use chrono::NaiveDateTime;
use std::fmt;

/// 交期校验缓冲（小时）
pub const CONSTRAINT_BUFFER_HOURS: f64 = 4.0;

/// 单价保护阈值
pub const VALUE_GAP_RATIO: f64 = 1.2;

// ==========================================
// ConstraintViolation - 违规原因
// ==========================================
#[derive(Debug, Clone, PartialEq)]
pub enum ConstraintViolation {
    DeadlineAtRisk {
        order_id: String,
        estimated_completion: NaiveDateTime,
        needed_on: NaiveDateTime,
    },
    ValueStarvation {
        order_id: String,
        unit_value: f64,
        candidate_unit_value: f64,
    },
    CompletionOutOfRange {
        order_id: String,
    },
}

impl fmt::Display for ConstraintViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConstraintViolation::DeadlineAtRisk {
                order_id,
                estimated_completion,
                needed_on,
            } => write!(
                f,
                "DEADLINE_AT_RISK: order={}, estimated_completion={}, needed_on={}",
                order_id, estimated_completion, needed_on
            ),
            ConstraintViolation::ValueStarvation {
                order_id,
                unit_value,
                candidate_unit_value,
            } => write!(
                f,
                "VALUE_STARVATION: order={}, unit_value={:.2}, candidate_unit_value={:.2}",
                order_id, unit_value, candidate_unit_value
            ),
            ConstraintViolation::CompletionOutOfRange { order_id } => {
                write!(f, "COMPLETION_OUT_OF_RANGE: order={}", order_id)
            }
        }
    }
}

// ==========================================
// ConstraintValidator - 约束校验器
// ==========================================
pub struct ConstraintValidator {
    // 无状态校验器
}

impl ConstraintValidator {
    pub fn new() -> Self {
        Self {}
    }

    /// 机会单的预计完工时间（含缓冲）,超出可表示范围时为 None
    pub fn estimated_completion(
        &self,
        candidate: &ScoredOrder,
        current_time: NaiveDateTime,
        availability: f64,
    ) -> Option<NaiveDateTime> {
        checked_finish(current_time, &candidate.order, availability, CostModel::SameMould)?
            .checked_add_signed(hours_to_duration(CONSTRAINT_BUFFER_HOURS))
    }

    /// 校验单张被挤占订单
    pub fn check_displaced(
        &self,
        candidate: &ScoredOrder,
        displaced: &ScoredOrder,
        estimated_completion: NaiveDateTime,
    ) -> Result<(), ConstraintViolation> {
        if estimated_completion > displaced.order.needed_on {
            return Err(ConstraintViolation::DeadlineAtRisk {
                order_id: displaced.order_id().to_string(),
                estimated_completion,
                needed_on: displaced.order.needed_on,
            });
        }

        if displaced.order.unit_value >= candidate.order.unit_value * VALUE_GAP_RATIO {
            return Err(ConstraintViolation::ValueStarvation {
                order_id: displaced.order_id().to_string(),
                unit_value: displaced.order.unit_value,
                candidate_unit_value: candidate.order.unit_value,
            });
        }

        Ok(())
    }

    /// 校验机会单
    ///
    /// # 参数
    /// - `candidate`: 机会单
    /// - `mould_orders`: 机会单所在模具的待排订单（UPS 顺序）
    /// - `current_time`: 当前排产时间
    /// - `availability`: 机台可用率
    pub fn validate<'a, I>(
        &self,
        candidate: &ScoredOrder,
        mould_orders: I,
        current_time: NaiveDateTime,
        availability: f64,
    ) -> Result<(), ConstraintViolation>
    where
        I: IntoIterator<Item = &'a ScoredOrder>,
    {
        let estimated_completion = self
            .estimated_completion(candidate, current_time, availability)
            .ok_or_else(|| ConstraintViolation::CompletionOutOfRange {
                order_id: candidate.order_id().to_string(),
            })?;

        for displaced in mould_orders {
            if displaced.order_id() == candidate.order_id() {
                break;
            }
            self.check_displaced(candidate, displaced, estimated_completion)?;
        }

        Ok(())
    }
}

impl Default for ConstraintValidator {
    fn default() -> Self {
        Self::new()
    }
}
