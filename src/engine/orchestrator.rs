// ==========================================
// 注塑排产系统 - 排产编排器
// ==========================================
// 主流程: 读取配置 → 契约校验 → UPS 打分 (全量一次)
//        → 按机台拆分 → 各机台独立排序 (并发) → 汇总
// 红线: 各机台持有独立队列与模具分区,互不共享
// ==========================================

use crate::config::SchedulingConfigReader;
use crate::domain::order::{ProductionOrder, ScoredOrder};
use crate::domain::schedule::{MachineSchedule, ScheduleRunResult, UnschedulableOrder};
use crate::engine::error::{EngineError, EngineResult};
use crate::engine::order_validator::OrderContractValidator;
use crate::engine::priority::UpsScorer;
use crate::engine::sequencer::{sequence_machine, MachineContext};
use chrono::NaiveDateTime;
use futures::future::join_all;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration as StdDuration;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

// ==========================================
// MachineBatch - 单机台待排批次
// ==========================================
#[derive(Debug, Clone)]
pub struct MachineBatch {
    pub ctx: MachineContext,
    pub queue: Vec<ScoredOrder>, // UPS 顺序
}

// ==========================================
// MachinePartition - 按机台拆分结果
// ==========================================
#[derive(Debug, Clone, Default)]
pub struct MachinePartition {
    pub batches: Vec<MachineBatch>, // 按机台编号升序
    pub unschedulable: Vec<UnschedulableOrder>,
    pub filtered_out: usize,
}

/// 按机台拆分已排序队列
///
/// # 参数
/// - `queue`: 全量 UPS 队列
/// - `machine_filter`: 仅排产指定机台（None = 全部）
///
/// # 返回
/// 各机台批次保持原队列相对顺序；缺少有效可用率的订单归入不可排产
pub fn partition_by_machine(
    queue: Vec<ScoredOrder>,
    machine_filter: Option<&[String]>,
) -> MachinePartition {
    let mut grouped: BTreeMap<String, MachineBatch> = BTreeMap::new();
    let mut partition = MachinePartition::default();

    for scored in queue {
        let machine_id = scored.order.machine_id.clone();

        if let Some(filter) = machine_filter {
            if !filter.iter().any(|m| *m == machine_id) {
                partition.filtered_out += 1;
                continue;
            }
        }

        let availability = match unschedulable_reason(&scored.order) {
            Ok(a) => a,
            Err(reason) => {
                debug!(order_id = %scored.order_id(), machine_id = %machine_id, reason = %reason, "订单不可排产");
                partition.unschedulable.push(UnschedulableOrder {
                    order_id: scored.order.order_id.clone(),
                    machine_id,
                    reason,
                });
                continue;
            }
        };

        grouped
            .entry(machine_id.clone())
            .or_insert_with(|| MachineBatch {
                ctx: MachineContext::new(&machine_id, availability),
                queue: Vec::new(),
            })
            .queue
            .push(scored);
    }

    partition.batches = grouped.into_values().collect();
    partition
}

/// 可用率检查
///
/// # 返回
/// - Ok(availability)
/// - Err(reason): 不可排产原因
fn unschedulable_reason(order: &ProductionOrder) -> Result<f64, String> {
    let machine = order
        .machine
        .as_ref()
        .ok_or_else(|| "MACHINE_NOT_FOUND: 机台主数据缺失".to_string())?;

    machine.schedulable_availability().ok_or_else(|| match machine.estimated_availability {
        Some(a) => format!("INVALID_AVAILABILITY: 可用率越界 ({})", a),
        None => "INVALID_AVAILABILITY: 可用率缺失".to_string(),
    })
}

// ==========================================
// ScheduleOrchestrator - 排产编排器
// ==========================================
pub struct ScheduleOrchestrator<C>
where
    C: SchedulingConfigReader,
{
    config: Arc<C>,
    validator: OrderContractValidator,
}

impl<C> ScheduleOrchestrator<C>
where
    C: SchedulingConfigReader,
{
    /// 创建新的编排器实例
    ///
    /// # 参数
    /// - config: 配置读取器
    pub fn new(config: Arc<C>) -> Self {
        Self {
            config,
            validator: OrderContractValidator::new(),
        }
    }

    /// 执行一次完整排产
    ///
    /// # 参数
    /// - orders: 已清洗、已关联机台的订单
    ///
    /// # 返回
    /// 各机台排产序列与不可排产订单
    #[instrument(skip(self, orders), fields(order_count = orders.len()))]
    pub async fn execute(&self, orders: Vec<ProductionOrder>) -> EngineResult<ScheduleRunResult> {
        let run_id = Uuid::new_v4();

        // ==========================================
        // 步骤1: 读取配置
        // ==========================================
        let reference_time = self.config.get_reference_time().await?;
        let direction = self.config.get_priority_rank_direction().await?;
        let budget_ms = self.config.get_machine_time_budget_ms().await?;
        let machine_filter = self.config.get_machine_filter().await?;
        let config_snapshot = self.config.get_config_snapshot().await?;

        info!(
            run_id = %run_id,
            reference_time = %reference_time,
            direction = %direction,
            budget_ms = ?budget_ms,
            "开始执行排产流程"
        );

        // ==========================================
        // 步骤2: 输入契约校验
        // ==========================================
        debug!("步骤2: 输入契约校验");
        self.validator.validate_all(&orders)?;

        // ==========================================
        // 步骤3: UPS 打分 (全量)
        // ==========================================
        debug!("步骤3: UPS 打分");
        let queue = UpsScorer::new(reference_time, direction).score_all(orders);

        // ==========================================
        // 步骤4: 按机台拆分
        // ==========================================
        let partition = partition_by_machine(queue, machine_filter.as_deref());
        if !partition.unschedulable.is_empty() {
            warn!(
                count = partition.unschedulable.len(),
                "存在不可排产订单（机台缺失或可用率无效）"
            );
        }
        debug!(
            machines = partition.batches.len(),
            filtered_out = partition.filtered_out,
            "步骤4: 机台拆分完成"
        );

        // ==========================================
        // 步骤5: 各机台并发排序
        // ==========================================
        let tasks = partition
            .batches
            .into_iter()
            .map(|batch| run_machine(batch, reference_time, budget_ms));
        let machine_schedules = join_all(tasks)
            .await
            .into_iter()
            .collect::<EngineResult<Vec<MachineSchedule>>>()?;

        let result = ScheduleRunResult {
            run_id,
            reference_time,
            machine_schedules,
            unschedulable: partition.unschedulable,
            config_snapshot_json: Some(config_snapshot),
        };

        info!(
            run_id = %run_id,
            machines = result.machine_schedules.len(),
            scheduled = result.scheduled_count(),
            unschedulable = result.unschedulable.len(),
            "排产流程完成"
        );

        Ok(result)
    }
}

/// 在阻塞线程池上执行单机台排序
///
/// 超出 `budget_ms` 时返回 MachineBudgetExceeded。阻塞任务无法被中止,
/// 超时后仍在后台跑完,其结果被丢弃; 运行时关闭时会等待它结束。
async fn run_machine(
    batch: MachineBatch,
    reference_time: NaiveDateTime,
    budget_ms: Option<u64>,
) -> EngineResult<MachineSchedule> {
    let machine_id = batch.ctx.machine_id.clone();
    let handle =
        tokio::task::spawn_blocking(move || sequence_machine(batch.ctx, batch.queue, reference_time));

    match budget_ms {
        Some(ms) => match tokio::time::timeout(StdDuration::from_millis(ms), handle).await {
            Ok(joined) => joined?,
            Err(_) => Err(EngineError::MachineBudgetExceeded {
                machine_id,
                budget_ms: ms,
            }),
        },
        None => handle.await?,
    }
}
