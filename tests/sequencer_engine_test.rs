// ==========================================
// 单机台排序引擎集成测试
// ==========================================
// 覆盖: 单订单 / 同模具连续 / 队首回退 / 机会单前移与拒绝
//      首尾相接 / 订单守恒 / 换模判定
// ==========================================

mod helpers;

use chrono::Duration;
use helpers::order_builder::{reference_time, OrderBuilder};
use mould_aps::domain::order::{ProductionOrder, ScoredOrder};
use mould_aps::domain::schedule::MachineSchedule;
use mould_aps::domain::types::{CostModel, PriorityRankDirection, SelectionReason, SequencerState};
use mould_aps::engine::{sequence_machine, EngineError, MachineContext, Sequencer, UpsScorer};

// ==========================================
// 辅助函数
// ==========================================

fn score(orders: Vec<ProductionOrder>) -> Vec<ScoredOrder> {
    UpsScorer::new(reference_time(), PriorityRankDirection::LowerIsUrgent).score_all(orders)
}

fn run(orders: Vec<ProductionOrder>, availability: f64) -> MachineSchedule {
    sequence_machine(
        MachineContext::new("350", availability),
        score(orders),
        reference_time(),
    )
    .unwrap()
}

fn ids(schedule: &MachineSchedule) -> Vec<&str> {
    schedule.entries.iter().map(|e| e.order_id.as_str()).collect()
}

/// 确定性伪随机序列 (LCG)
struct Lcg(u64);

impl Lcg {
    fn next(&mut self, bound: u64) -> u64 {
        self.0 = self
            .0
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        (self.0 >> 33) % bound
    }
}

fn random_orders(seed: u64, count: usize) -> Vec<ProductionOrder> {
    let mut rng = Lcg(seed);
    (0..count)
        .map(|i| {
            let unit = 1.0 + rng.next(8) as f64;
            OrderBuilder::new(&format!("P{:03}", i))
                .mould(&format!("M{}", rng.next(4)))
                .unit_hours(unit)
                .setup_hours(unit + 1.0 + rng.next(4) as f64)
                .value(rng.next(50_000) as f64)
                .quantity(1.0 + rng.next(100) as f64)
                .due_in_hours(rng.next(24 * 20) as i64)
                .priority(rng.next(10) as u32)
                .build()
        })
        .collect()
}

// ==========================================
// 基本场景
// ==========================================

#[test]
fn test_single_order_schedule() {
    // 首单无在机模具,按换型工时计; 换型工时与单件工时同为 5h
    let order = OrderBuilder::new("A")
        .quantity(10.0)
        .value(1000.0)
        .unit_hours(5.0)
        .setup_hours(5.0)
        .mould("M1")
        .build();
    assert_eq!(order.unit_value, 100.0);

    let schedule = run(vec![order], 1.0);

    assert_eq!(schedule.len(), 1);
    let entry = &schedule.entries[0];
    assert_eq!(entry.unit_value, 100.0);
    assert_eq!(entry.planned_start, reference_time());
    assert_eq!(entry.planned_end, reference_time() + Duration::hours(5));
    assert_eq!(entry.selection, SelectionReason::HeadOfQueue);
}

#[test]
fn test_same_mould_orders_run_back_to_back() {
    let later = OrderBuilder::new("LATER").mould("M1").due_in_days(2).build();
    let sooner = OrderBuilder::new("SOONER").mould("M1").due_in_days(1).build();

    let schedule = run(vec![later, sooner], 1.0);

    assert_eq!(ids(&schedule), vec!["SOONER", "LATER"]);
    assert!(schedule.entries[0].ups > schedule.entries[1].ups);

    // 首单换型 7h, 次单同模具 5h
    assert_eq!(schedule.entries[0].cost_model, CostModel::Changeover);
    assert_eq!(schedule.entries[1].cost_model, CostModel::SameMould);
    assert_eq!(schedule.entries[1].planned_start, reference_time() + Duration::hours(7));
    assert_eq!(schedule.entries[1].planned_end, reference_time() + Duration::hours(12));
    assert_eq!(schedule.changeover_count(), 1);
}

#[test]
fn test_falls_back_to_head_without_same_mould_candidate() {
    let head = OrderBuilder::new("HEAD").mould("M2").due_in_days(1).sales_ref("SO-1").build();
    let second = OrderBuilder::new("SECOND").mould("M3").due_in_days(2).build();
    let deep = OrderBuilder::new("DEEP").mould("M1").due_in_days(5).build();

    let schedule = run(vec![deep, second, head], 1.0);

    assert_eq!(ids(&schedule), vec!["HEAD", "SECOND", "DEEP"]);
    assert!(schedule
        .entries
        .iter()
        .all(|e| e.selection == SelectionReason::HeadOfQueue));
    assert_eq!(schedule.changeover_count(), 3);
}

#[test]
fn test_availability_scales_durations() {
    let order = OrderBuilder::new("A").unit_hours(5.0).setup_hours(6.0).build();
    let schedule = run(vec![order], 0.5);
    assert_eq!(schedule.entries[0].actual_gross_processing_time_h, 12.0);
    assert_eq!(
        schedule.entries[0].planned_end,
        reference_time() + Duration::hours(12)
    );
}

#[test]
fn test_empty_machine_produces_empty_schedule() {
    let sequencer = Sequencer::new(MachineContext::new("350", 1.0), vec![], reference_time());
    assert_eq!(sequencer.state(), SequencerState::Done);
    assert!(sequencer.run().unwrap().is_empty());
}

#[test]
fn test_tiny_availability_reports_timeline_overflow() {
    let order = OrderBuilder::new("A").unit_hours(5.0).setup_hours(7.0).build();

    let result = sequence_machine(
        MachineContext::new("350", 1e-12),
        score(vec![order]),
        reference_time(),
    );

    assert!(matches!(
        result,
        Err(EngineError::TimelineOverflow { ref order_id, .. }) if order_id == "A"
    ));
}

#[test]
fn test_huge_processing_time_reports_timeline_overflow() {
    let normal = OrderBuilder::new("A").mould("M1").due_in_days(1).build();
    let huge = OrderBuilder::new("B")
        .mould("M2")
        .unit_hours(1e300)
        .setup_hours(1e300)
        .due_in_days(5)
        .build();

    let result = sequence_machine(
        MachineContext::new("350", 1.0),
        score(vec![normal, huge]),
        reference_time(),
    );

    assert!(matches!(
        result,
        Err(EngineError::TimelineOverflow { ref order_id, .. }) if order_id == "B"
    ));
}

// ==========================================
// 机会单
// ==========================================

#[test]
fn test_opportunity_pulls_same_mould_order_ahead() {
    let a = OrderBuilder::new("A").mould("M1").due_in_days(1).build();
    let b = OrderBuilder::new("B").mould("M2").due_in_days(3).build();
    let c = OrderBuilder::new("C").mould("M1").due_in_days(10).build();

    let schedule = run(vec![c, b, a], 1.0);

    // A 7h → C 同模具 5h (12h) → B 换型 7h (19h) <= 72h
    assert_eq!(ids(&schedule), vec!["A", "C", "B"]);
    assert_eq!(schedule.entries[1].selection, SelectionReason::Opportunity);
    assert_eq!(schedule.entries[1].cost_model, CostModel::SameMould);
    assert_eq!(schedule.makespan_end(), Some(reference_time() + Duration::hours(19)));
    assert_eq!(schedule.opportunity_count(), 1);
}

#[test]
fn test_opportunity_rejected_when_skipped_order_would_miss_deadline() {
    let a = OrderBuilder::new("A").mould("M1").due_in_days(1).build();
    let b = OrderBuilder::new("B").mould("M2").due_in_hours(15).build();
    let c = OrderBuilder::new("C").mould("M1").due_in_days(10).build();

    let schedule = run(vec![a, b, c], 1.0);

    // 若 C 前移, B 模拟完工 7 + 5 + 7 = 19h > 15h
    assert_eq!(ids(&schedule), vec!["A", "B", "C"]);
    assert_eq!(schedule.opportunity_count(), 0);
}

// ==========================================
// 不变量
// ==========================================

#[test]
fn test_schedule_invariants_on_random_queues() {
    for seed in [1_u64, 7, 42, 2022] {
        let orders = random_orders(seed, 40);
        let mut expected: Vec<String> = orders.iter().map(|o| o.order_id.clone()).collect();

        let schedule = run(orders, 0.85);

        // 订单守恒: 不丢失、不重复、不新增
        let mut actual: Vec<String> = schedule.entries.iter().map(|e| e.order_id.clone()).collect();
        expected.sort();
        actual.sort();
        assert_eq!(actual, expected, "seed={}", seed);

        // 首尾相接
        assert!(schedule.is_contiguous(), "seed={}", seed);
        assert_eq!(schedule.entries[0].planned_start, reference_time());

        // 换模判定: 当且仅当模具与上一单不同
        let mut previous: Option<&str> = None;
        for entry in &schedule.entries {
            let expected_model = match previous {
                Some(m) if m == entry.mould_id => CostModel::SameMould,
                _ => CostModel::Changeover,
            };
            assert_eq!(entry.cost_model, expected_model, "seed={} order={}", seed, entry.order_id);
            if entry.selection == SelectionReason::Opportunity {
                assert_eq!(entry.cost_model, CostModel::SameMould);
            }
            previous = Some(entry.mould_id.as_str());
        }

        // 序号连续
        for (i, entry) in schedule.entries.iter().enumerate() {
            assert_eq!(entry.seq_no as usize, i + 1);
        }
    }
}

#[test]
fn test_sequencing_is_deterministic() {
    let first = run(random_orders(99, 30), 0.9);
    let second = run(random_orders(99, 30), 0.9);
    assert_eq!(first, second);
}
