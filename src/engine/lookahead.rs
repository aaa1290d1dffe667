// ==========================================
// 注塑排产系统 - 同模具机会单前瞻
// ==========================================
// 职责: 在待排队列中寻找与在机模具相同的第一张订单,
//       模拟其前移后被跳过订单 (改按换型工时) 的完工时间
// 红线: 任一被跳过订单模拟完工晚于交期 → 放弃机会单
// ==========================================

use crate::domain::types::CostModel;
use crate::engine::cost_model::checked_finish;
use crate::engine::pending_queue::{OrderSlot, PendingQueue};
use chrono::NaiveDateTime;
use tracing::debug;

// ==========================================
// LookaheadOutcome - 前瞻结果
// ==========================================
#[derive(Debug, Clone, PartialEq)]
pub enum LookaheadOutcome {
    /// 机台尚未上模
    NoRunningMould,
    /// 待排队列中无同模具订单
    NoSameMouldOrder,
    /// 队首即为同模具订单,无需前移
    HeadSharesMould { slot: OrderSlot },
    /// 机会单成立
    Candidate { slot: OrderSlot, skipped: usize },
    /// 机会单会导致被跳过订单延期
    Rejected {
        slot: OrderSlot,
        blocked_by: OrderSlot,
        simulated_completion: NaiveDateTime,
    },
    /// 模拟完工时间超出可表示范围,放弃机会单
    OutOfRange { slot: OrderSlot },
}

impl LookaheadOutcome {
    /// 可作为机会单的槽位
    pub fn candidate(&self) -> Option<OrderSlot> {
        match self {
            LookaheadOutcome::Candidate { slot, .. } => Some(*slot),
            _ => None,
        }
    }
}

// ==========================================
// OpportunityLookahead - 前瞻引擎
// ==========================================
pub struct OpportunityLookahead {
    // 无状态引擎
}

impl OpportunityLookahead {
    pub fn new() -> Self {
        Self {}
    }

    /// 评估当前步的机会单
    ///
    /// # 参数
    /// - `queue`: 待排队列（UPS 顺序）
    /// - `current_mould`: 在机模具
    /// - `current_time`: 当前排产时间
    /// - `availability`: 机台可用率
    pub fn evaluate(
        &self,
        queue: &PendingQueue,
        current_mould: Option<&str>,
        current_time: NaiveDateTime,
        availability: f64,
    ) -> LookaheadOutcome {
        let current_mould = match current_mould {
            Some(m) => m,
            None => return LookaheadOutcome::NoRunningMould,
        };

        // 1. 队列中第一张同模具订单
        let found = queue
            .iter()
            .enumerate()
            .find(|(_, (_, order))| order.mould_id() == current_mould)
            .map(|(position, (slot, _))| (position, slot));

        let (position, slot) = match found {
            Some(hit) => hit,
            None => return LookaheadOutcome::NoSameMouldOrder,
        };
        if position == 0 {
            return LookaheadOutcome::HeadSharesMould { slot };
        }

        // 2. 机会单按同模具工时完工
        let candidate = queue.get(slot);
        let candidate_completion =
            match checked_finish(current_time, &candidate.order, availability, CostModel::SameMould) {
                Some(t) => t,
                None => return LookaheadOutcome::OutOfRange { slot },
            };

        // 3. 被跳过订单紧随其后,按换型工时模拟
        for (skipped_slot, skipped) in queue.iter().take(position) {
            let simulated_completion = match checked_finish(
                candidate_completion,
                &skipped.order,
                availability,
                CostModel::Changeover,
            ) {
                Some(t) => t,
                None => return LookaheadOutcome::OutOfRange { slot },
            };

            if simulated_completion > skipped.order.needed_on {
                debug!(
                    candidate = %candidate.order_id(),
                    blocked_by = %skipped.order_id(),
                    simulated_completion = %simulated_completion,
                    needed_on = %skipped.order.needed_on,
                    "机会单会导致被跳过订单延期"
                );
                return LookaheadOutcome::Rejected {
                    slot,
                    blocked_by: skipped_slot,
                    simulated_completion,
                };
            }
        }

        LookaheadOutcome::Candidate {
            slot,
            skipped: position,
        }
    }
}

impl Default for OpportunityLookahead {
    fn default() -> Self {
        Self::new()
    }
}
