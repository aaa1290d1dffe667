// ==========================================
// 注塑排产系统 - UPS 优先级打分引擎
// ==========================================
// 红线: 数据集统计量只计算一次,打分结果计算后不再修改
// ==========================================
// 职责: 订单 + 数据集统计量 → 紧急度/类型/价值/MRP 四项得分 + UPS
// 输入: 已通过契约校验的订单
// 输出: 按 UPS 降序排列的已打分订单队列
// ==========================================
// UPS = 0.5*urgency + 0.3*type + 0.1*value + 0.1*priority
// ==========================================

mod core;
mod scoring;


pub use core::{DatasetStats, UpsScorer};
pub use scoring::{
    days_to_deadline, priority_score, value_score, PRIORITY_WEIGHT, SALES_TYPE_SCORE,
    TYPE_WEIGHT, URGENCY_WEIGHT, VALUE_WEIGHT,
};
