// ==========================================
// 注塑排产系统 - 单机台排序状态机
// ==========================================
// 状态: RUNNING (待排非空) → DONE (终态)
// 每步: 前瞻机会单 → 约束校验 → 选定订单 → 计算毛工时 → 提交
// 红线: 每张订单 待排 → 已提交 恰好一次
// 红线: 相邻两单首尾相接
// ==========================================
// 职责: 单机台、单线程、无挂起点
// 输入: 本机台按 UPS 排序的订单（独占所有权）
// 输出: 带计划开始/结束时间的排产序列
// ==========================================

use crate::domain::order::ScoredOrder;
use crate::domain::schedule::{MachineSchedule, ScheduleEntry};
use crate::domain::types::{CostModel, SelectionReason, SequencerState};
use crate::engine::constraint::ConstraintValidator;
use crate::engine::cost_model::{checked_finish, gross_processing_hours};
use crate::engine::error::{EngineError, EngineResult};
use crate::engine::lookahead::OpportunityLookahead;
use crate::engine::mould_index::MouldPartitionIndex;
use crate::engine::pending_queue::{OrderSlot, PendingQueue};
use chrono::NaiveDateTime;
use std::collections::HashSet;
use tracing::{debug, info, instrument};

// ==========================================
// MachineContext - 机台上下文
// ==========================================
#[derive(Debug, Clone, PartialEq)]
pub struct MachineContext {
    pub machine_id: String,
    pub availability: f64, // (0, 1]
}

impl MachineContext {
    pub fn new(machine_id: &str, availability: f64) -> Self {
        Self {
            machine_id: machine_id.to_string(),
            availability,
        }
    }
}

// ==========================================
// Sequencer - 排序状态机
// ==========================================
pub struct Sequencer {
    ctx: MachineContext,
    queue: PendingQueue,
    index: MouldPartitionIndex,
    committed: HashSet<String>,
    schedule: MachineSchedule,
    current_time: NaiveDateTime,
    current_mould: Option<String>,
    state: SequencerState,
    lookahead: OpportunityLookahead,
    validator: ConstraintValidator,
}

impl Sequencer {
    /// 构造函数
    ///
    /// # 参数
    /// - `ctx`: 机台上下文
    /// - `queue`: 本机台订单（须已按 UPS 降序）
    /// - `reference_time`: 排产起点
    pub fn new(ctx: MachineContext, queue: Vec<ScoredOrder>, reference_time: NaiveDateTime) -> Self {
        let queue = PendingQueue::new(queue);
        let index = MouldPartitionIndex::build(&queue);
        let state = if queue.is_empty() {
            SequencerState::Done
        } else {
            SequencerState::Running
        };
        let schedule = MachineSchedule::new(&ctx.machine_id);

        Self {
            committed: HashSet::with_capacity(queue.len()),
            ctx,
            queue,
            index,
            schedule,
            current_time: reference_time,
            current_mould: None,
            state,
            lookahead: OpportunityLookahead::new(),
            validator: ConstraintValidator::new(),
        }
    }

    pub fn state(&self) -> SequencerState {
        self.state
    }

    pub fn current_time(&self) -> NaiveDateTime {
        self.current_time
    }

    pub fn current_mould(&self) -> Option<&str> {
        self.current_mould.as_deref()
    }

    pub fn pending_len(&self) -> usize {
        self.queue.len()
    }

    pub fn schedule(&self) -> &MachineSchedule {
        &self.schedule
    }

    // ==========================================
    // 核心方法
    // ==========================================

    /// 执行至终态
    #[instrument(skip(self), fields(machine_id = %self.ctx.machine_id, pending = self.queue.len()))]
    pub fn run(mut self) -> EngineResult<MachineSchedule> {
        while self.state == SequencerState::Running {
            self.step()?;
        }

        info!(
            scheduled = self.schedule.len(),
            changeovers = self.schedule.changeover_count(),
            opportunities = self.schedule.opportunity_count(),
            late = self.schedule.late_count(),
            "机台排序完成"
        );

        Ok(self.schedule)
    }

    /// 单步: 选定并提交一张订单
    ///
    /// # 返回
    /// - Some(entry): 本步提交的排产明细
    /// - None: 已处于 DONE
    pub fn step(&mut self) -> EngineResult<Option<&ScheduleEntry>> {
        if self.state == SequencerState::Done {
            return Ok(None);
        }

        let (slot, selection) = self.select_next()?;
        self.commit(slot, selection)?;

        Ok(self.schedule.entries.last())
    }

    /// 选单: 机会单通过前瞻与约束校验时前移,否则取队首
    fn select_next(&self) -> EngineResult<(OrderSlot, SelectionReason)> {
        let head = self.queue.head().ok_or_else(|| {
            EngineError::InternalInconsistency(format!(
                "机台 {} 处于 RUNNING 但待排队列为空",
                self.ctx.machine_id
            ))
        })?;

        let outcome = self.lookahead.evaluate(
            &self.queue,
            self.current_mould.as_deref(),
            self.current_time,
            self.ctx.availability,
        );

        let slot = match outcome.candidate() {
            Some(slot) => slot,
            None => return Ok((head, SelectionReason::HeadOfQueue)),
        };

        // 前瞻取的是在机模具的第一张待排订单,分区内不存在排在其前的同模具订单,
        // 因此这里的校验在单机台分区下恒通过; 保留它以约束前瞻策略的后续变化
        let candidate = self.queue.get(slot);
        let mould_orders = self
            .index
            .pending_of(candidate.mould_id())
            .map(|s| self.queue.get(s));

        match self.validator.validate(
            candidate,
            mould_orders,
            self.current_time,
            self.ctx.availability,
        ) {
            Ok(()) => {
                debug!(
                    candidate = %candidate.order_id(),
                    head = %self.queue.get(head).order_id(),
                    "机会单前移"
                );
                Ok((slot, SelectionReason::Opportunity))
            }
            Err(violation) => {
                debug!(
                    candidate = %candidate.order_id(),
                    violation = %violation,
                    "机会单约束校验未通过，回退队首"
                );
                Ok((head, SelectionReason::HeadOfQueue))
            }
        }
    }

    /// 提交: 写入计划时间,移出队列与模具分区,推进时钟
    ///
    /// 计划完工超出日期时间范围时返回 TimelineOverflow,状态不变
    fn commit(&mut self, slot: OrderSlot, selection: SelectionReason) -> EngineResult<()> {
        let pending = self.queue.get(slot);
        let order_id = pending.order_id().to_string();

        let cost_model = CostModel::for_mould(pending.mould_id(), self.current_mould.as_deref());
        let gross_hours = gross_processing_hours(&pending.order, self.ctx.availability, cost_model);
        let planned_start = self.current_time;
        let planned_end = checked_finish(planned_start, &pending.order, self.ctx.availability, cost_model)
            .ok_or_else(|| EngineError::TimelineOverflow {
                machine_id: self.ctx.machine_id.clone(),
                order_id: order_id.clone(),
                gross_hours,
            })?;

        if !self.committed.insert(order_id.clone()) {
            return Err(EngineError::InternalInconsistency(format!(
                "订单重复提交: {}",
                order_id
            )));
        }

        let scored = self.queue.remove(slot)?.clone();
        self.index.remove(scored.mould_id(), slot)?;

        let entry = ScheduleEntry {
            seq_no: self.schedule.entries.len() as u32 + 1,
            order_id,
            machine_id: self.ctx.machine_id.clone(),
            mould_id: scored.order.mould_id.clone(),
            ups: scored.score.ups,
            unit_value: scored.order.unit_value,
            value_score: scored.score.value_score,
            order_value: scored.order.order_value,
            actual_gross_processing_time_h: gross_hours,
            needed_on: scored.order.needed_on,
            planned_start,
            planned_end,
            selection,
            cost_model,
            covering_demand_until: scored.order.covering_demand_until,
        };

        debug!(
            seq_no = entry.seq_no,
            order_id = %entry.order_id,
            mould_id = %entry.mould_id,
            selection = %selection,
            cost_model = %cost_model,
            planned_start = %planned_start,
            planned_end = %planned_end,
            "订单提交"
        );

        self.schedule.entries.push(entry);
        self.current_mould = Some(scored.order.mould_id);
        self.current_time = planned_end;

        if self.queue.is_empty() {
            if !self.index.is_empty() {
                return Err(EngineError::InternalInconsistency(format!(
                    "机台 {} 待排队列已空但模具分区残留 {} 张订单",
                    self.ctx.machine_id,
                    self.index.pending_count()
                )));
            }
            self.state = SequencerState::Done;
        }

        Ok(())
    }
}

/// 单机台排序（同步入口）
pub fn sequence_machine(
    ctx: MachineContext,
    queue: Vec<ScoredOrder>,
    reference_time: NaiveDateTime,
) -> EngineResult<MachineSchedule> {
    Sequencer::new(ctx, queue, reference_time).run()
}
