// ==========================================
// 注塑排产系统 - 毛工时模型
// ==========================================
// 同模具: unit_processing_time / availability
// 换模具: setup_and_processing_time / availability
// ==========================================

use crate::domain::order::ProductionOrder;
use crate::domain::types::CostModel;
use chrono::{Duration, NaiveDateTime};

const MICROS_PER_HOUR: f64 = 3_600_000_000.0;

/// 毛工时（小时）
pub fn gross_processing_hours(order: &ProductionOrder, availability: f64, model: CostModel) -> f64 {
    let net_hours = match model {
        CostModel::SameMould => order.unit_processing_time_h,
        CostModel::Changeover => order.setup_and_processing_time_h,
    };
    net_hours / availability
}

/// 毛工时（时长）
pub fn gross_duration(order: &ProductionOrder, availability: f64, model: CostModel) -> Duration {
    hours_to_duration(gross_processing_hours(order, availability, model))
}

/// 完工时间: start + 毛工时
///
/// 超出日期时间可表示范围时返回 None (如可用率极小或工时极大)
pub fn checked_finish(
    start: NaiveDateTime,
    order: &ProductionOrder,
    availability: f64,
    model: CostModel,
) -> Option<NaiveDateTime> {
    start.checked_add_signed(gross_duration(order, availability, model))
}

/// 小时 → 时长（微秒精度）
pub fn hours_to_duration(hours: f64) -> Duration {
    Duration::microseconds((hours * MICROS_PER_HOUR).round() as i64)
}
