// ==========================================
// 注塑排产系统 - 待排队列
// ==========================================
// 结构: 订单仓 (按 UPS 顺序,槽位稳定) + 有序待排槽位集合
// 红线: 每个槽位只能移出一次
// ==========================================

use crate::domain::order::ScoredOrder;
use crate::engine::error::{EngineError, EngineResult};
use std::collections::BTreeSet;

/// 队列槽位（= 订单在 UPS 队列中的初始位置）
pub type OrderSlot = usize;

#[derive(Debug, Clone)]
pub struct PendingQueue {
    arena: Vec<ScoredOrder>,
    pending: BTreeSet<OrderSlot>,
}

impl PendingQueue {
    /// 由已按 UPS 排序的订单构建
    pub fn new(queue: Vec<ScoredOrder>) -> Self {
        let pending = (0..queue.len()).collect();
        Self {
            arena: queue,
            pending,
        }
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// 队首（UPS 最高的待排订单）
    pub fn head(&self) -> Option<OrderSlot> {
        self.pending.iter().next().copied()
    }

    pub fn get(&self, slot: OrderSlot) -> &ScoredOrder {
        &self.arena[slot]
    }

    pub fn is_pending(&self, slot: OrderSlot) -> bool {
        self.pending.contains(&slot)
    }

    /// 按 UPS 顺序遍历待排订单
    pub fn iter(&self) -> impl Iterator<Item = (OrderSlot, &ScoredOrder)> + '_ {
        self.pending.iter().map(move |&slot| (slot, &self.arena[slot]))
    }

    /// 移出待排集合
    pub fn remove(&mut self, slot: OrderSlot) -> EngineResult<&ScoredOrder> {
        if !self.pending.remove(&slot) {
            let order_id = self
                .arena
                .get(slot)
                .map(|o| o.order_id().to_string())
                .unwrap_or_else(|| format!("slot#{}", slot));
            return Err(EngineError::InternalInconsistency(format!(
                "订单不在待排队列中: {}",
                order_id
            )));
        }
        Ok(&self.arena[slot])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::order::{OrderScore, ProductionOrder};
    use crate::domain::types::UrgencyBand;
    use chrono::NaiveDate;

    fn scored(id: &str) -> ScoredOrder {
        ScoredOrder {
            order: ProductionOrder {
                order_id: id.to_string(),
                machine_id: "350".to_string(),
                mould_id: "M1".to_string(),
                quantity: 1.0,
                unit_processing_time_h: 1.0,
                setup_and_processing_time_h: 2.0,
                order_value: 1.0,
                unit_value: 1.0,
                needed_on: NaiveDate::from_ymd_opt(2022, 3, 10)
                    .unwrap()
                    .and_hms_opt(0, 0, 0)
                    .unwrap(),
                priority_rank: None,
                sales_reference: None,
                covering_demand_until: None,
                machine: None,
            },
            score: OrderScore {
                days_to_deadline: 6,
                urgency_band: UrgencyBand::Medium,
                urgency_score: 30.0,
                type_score: 0.0,
                value_score: 0.0,
                priority_score: 0.0,
                ups: 15.0,
            },
        }
    }

    #[test]
    fn test_head_advances_after_removal() {
        let mut queue = PendingQueue::new(vec![scored("A"), scored("B"), scored("C")]);
        assert_eq!(queue.head(), Some(0));

        queue.remove(1).unwrap();
        assert_eq!(queue.head(), Some(0));
        queue.remove(0).unwrap();
        assert_eq!(queue.head(), Some(2));
        assert_eq!(queue.len(), 1);

        let ids: Vec<&str> = queue.iter().map(|(_, o)| o.order_id()).collect();
        assert_eq!(ids, vec!["C"]);
    }

    #[test]
    fn test_double_removal_is_inconsistency() {
        let mut queue = PendingQueue::new(vec![scored("A")]);
        queue.remove(0).unwrap();
        assert!(matches!(
            queue.remove(0),
            Err(EngineError::InternalInconsistency(_))
        ));
        assert!(queue.is_empty());
        assert_eq!(queue.head(), None);
    }
}
