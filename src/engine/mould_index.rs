// ==========================================
// 注塑排产系统 - 模具分区索引
// ==========================================
// 红线: 每次排产运行独立构建,不跨机台共享
// 红线: 队列移出必须同步移出本索引
// ==========================================

use crate::engine::error::{EngineError, EngineResult};
use crate::engine::pending_queue::{OrderSlot, PendingQueue};
use std::collections::{BTreeSet, HashMap};

// ==========================================
// MouldPartitionIndex - 模具 → 待排订单槽位
// ==========================================
#[derive(Debug, Clone, Default)]
pub struct MouldPartitionIndex {
    partitions: HashMap<String, BTreeSet<OrderSlot>>,
}

impl MouldPartitionIndex {
    /// 基于待排队列构建（槽位有序 = 队列顺序）
    pub fn build(queue: &PendingQueue) -> Self {
        let mut partitions: HashMap<String, BTreeSet<OrderSlot>> = HashMap::new();
        for (slot, order) in queue.iter() {
            partitions
                .entry(order.mould_id().to_string())
                .or_default()
                .insert(slot);
        }
        Self { partitions }
    }

    /// 某模具的待排槽位（队列顺序）
    pub fn pending_of<'a>(&'a self, mould_id: &str) -> impl Iterator<Item = OrderSlot> + 'a {
        self.partitions
            .get(mould_id)
            .into_iter()
            .flat_map(|slots| slots.iter().copied())
    }

    pub fn contains(&self, mould_id: &str, slot: OrderSlot) -> bool {
        self.partitions
            .get(mould_id)
            .map(|slots| slots.contains(&slot))
            .unwrap_or(false)
    }

    /// 移出已提交订单；空分区一并删除
    pub fn remove(&mut self, mould_id: &str, slot: OrderSlot) -> EngineResult<()> {
        let slots = self.partitions.get_mut(mould_id).ok_or_else(|| {
            EngineError::InternalInconsistency(format!("模具分区不存在: {}", mould_id))
        })?;

        if !slots.remove(&slot) {
            return Err(EngineError::InternalInconsistency(format!(
                "模具分区 {} 中不存在槽位 {}",
                mould_id, slot
            )));
        }
        if slots.is_empty() {
            self.partitions.remove(mould_id);
        }
        Ok(())
    }

    pub fn mould_count(&self) -> usize {
        self.partitions.len()
    }

    pub fn pending_count(&self) -> usize {
        self.partitions.values().map(|s| s.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.partitions.is_empty()
    }
}
