use crate::domain::types::PriorityRankDirection;
use chrono::{Duration, NaiveDateTime};

pub const URGENCY_WEIGHT: f64 = 0.5;
pub const TYPE_WEIGHT: f64 = 0.3;
pub const VALUE_WEIGHT: f64 = 0.1;
pub const PRIORITY_WEIGHT: f64 = 0.1;

/// 关联销售订单的类型得分
pub const SALES_TYPE_SCORE: f64 = 30.0;

/// 距交期天数（向下取整）
///
/// 交期早于基准时间不足一天时为 -1,与按天截断不同。
pub fn days_to_deadline(needed_on: NaiveDateTime, reference_time: NaiveDateTime) -> i64 {
    let delta = needed_on - reference_time;
    let days = delta.num_days();
    // num_days 向零截断，负的非整天需再减一
    if delta < Duration::days(days) {
        days - 1
    } else {
        days
    }
}

/// 价值得分: 10 * ln(1+v) / ln(1+max)
///
/// max_order_value 为 0 时分母为 ln(1)=0，统一返回 0（由调用方输出诊断日志）
pub fn value_score(order_value: f64, max_order_value: f64) -> f64 {
    if !(max_order_value > 0.0) {
        return 0.0;
    }
    let score = 10.0 * order_value.max(0.0).ln_1p() / max_order_value.ln_1p();
    score.clamp(0.0, 10.0)
}

/// MRP 优先级得分
///
/// - LowerIsUrgent: 10 * (max - rank) / max
/// - HigherIsUrgent: 10 * rank / max
/// - max 为 0 或订单无优先级: 0
pub fn priority_score(
    priority_rank: Option<u32>,
    max_priority_rank: u32,
    direction: PriorityRankDirection,
) -> f64 {
    let rank = match priority_rank {
        Some(r) => r.min(max_priority_rank) as f64,
        None => return 0.0,
    };
    if max_priority_rank == 0 {
        return 0.0;
    }
    let max = max_priority_rank as f64;

    match direction {
        PriorityRankDirection::LowerIsUrgent => 10.0 * (max - rank) / max,
        PriorityRankDirection::HigherIsUrgent => 10.0 * rank / max,
    }
}

pub(super) fn composite_ups(
    urgency_score: f64,
    type_score: f64,
    value_score: f64,
    priority_score: f64,
) -> f64 {
    URGENCY_WEIGHT * urgency_score
        + TYPE_WEIGHT * type_score
        + VALUE_WEIGHT * value_score
        + PRIORITY_WEIGHT * priority_score
}
