use super::scoring::{composite_ups, days_to_deadline, priority_score, value_score, SALES_TYPE_SCORE};
use crate::domain::order::{OrderScore, ProductionOrder, ScoredOrder};
use crate::domain::types::{PriorityRankDirection, UrgencyBand};
use chrono::NaiveDateTime;
use std::cmp::Ordering;
use tracing::{instrument, warn};

// ==========================================
// DatasetStats - 数据集统计量
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DatasetStats {
    pub max_order_value: f64,
    pub max_priority_rank: u32,
}

impl DatasetStats {
    /// 在完整订单集上计算一次
    pub fn from_orders(orders: &[ProductionOrder]) -> Self {
        let max_order_value = orders
            .iter()
            .map(|o| o.order_value)
            .filter(|v| v.is_finite())
            .fold(0.0_f64, f64::max);
        let max_priority_rank = orders
            .iter()
            .filter_map(|o| o.priority_rank)
            .max()
            .unwrap_or(0);

        Self {
            max_order_value,
            max_priority_rank,
        }
    }
}

// ==========================================
// UpsScorer - UPS 打分引擎
// ==========================================
pub struct UpsScorer {
    reference_time: NaiveDateTime,
    direction: PriorityRankDirection,
}

impl UpsScorer {
    /// 构造函数
    ///
    /// # 参数
    /// - `reference_time`: 基准时间（交期天数的起点）
    /// - `direction`: MRP 优先级方向
    pub fn new(reference_time: NaiveDateTime, direction: PriorityRankDirection) -> Self {
        Self {
            reference_time,
            direction,
        }
    }

    pub fn reference_time(&self) -> NaiveDateTime {
        self.reference_time
    }

    // ==========================================
    // 核心方法
    // ==========================================

    /// 单订单打分（纯函数）
    pub fn score(&self, order: &ProductionOrder, stats: &DatasetStats) -> OrderScore {
        let days = days_to_deadline(order.needed_on, self.reference_time);
        let urgency_band = UrgencyBand::from_days(days);
        let urgency_score = urgency_band.score();

        let type_score = if order.has_sales_reference() {
            SALES_TYPE_SCORE
        } else {
            0.0
        };

        let value_score = value_score(order.order_value, stats.max_order_value);
        let priority_score =
            priority_score(order.priority_rank, stats.max_priority_rank, self.direction);

        OrderScore {
            days_to_deadline: days,
            urgency_band,
            urgency_score,
            type_score,
            value_score,
            priority_score,
            ups: composite_ups(urgency_score, type_score, value_score, priority_score),
        }
    }

    /// 整体打分并排序
    ///
    /// # 返回
    /// 按 UPS 降序的队列（同分按订单号升序）
    #[instrument(skip(self, orders), fields(count = orders.len(), direction = %self.direction))]
    pub fn score_all(&self, orders: Vec<ProductionOrder>) -> Vec<ScoredOrder> {
        let stats = DatasetStats::from_orders(&orders);

        if !orders.is_empty() && stats.max_order_value <= 0.0 {
            warn!("订单金额最大值为 0，价值得分统一记为 0");
        }
        if !orders.is_empty() && stats.max_priority_rank == 0 {
            warn!("MRP 优先级最大值为 0 或缺失，优先级得分统一记为 0");
        }

        let mut queue: Vec<ScoredOrder> = orders
            .into_iter()
            .map(|order| {
                let score = self.score(&order, &stats);
                ScoredOrder { order, score }
            })
            .collect();

        Self::sort_queue(&mut queue);
        queue
    }

    /// 按 UPS 降序排序（稳定排序）
    pub fn sort_queue(queue: &mut [ScoredOrder]) {
        queue.sort_by(Self::compare);
    }

    /// Ordering::Less 表示 a 优先于 b
    fn compare(a: &ScoredOrder, b: &ScoredOrder) -> Ordering {
        match b.score.ups.total_cmp(&a.score.ups) {
            Ordering::Equal => a.order.order_id.cmp(&b.order.order_id),
            other => other,
        }
    }
}
