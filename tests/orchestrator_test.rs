// ==========================================
// 排产编排器集成测试
// ==========================================
// 覆盖: 多机台隔离 / 不可排产订单 / 机台过滤 / 契约校验 / 配置快照
// ==========================================

mod helpers;

use helpers::mock_config::MockConfig;
use helpers::order_builder::{reference_time, OrderBuilder};
use mould_aps::config::{config_keys, ConfigManager};
use mould_aps::domain::types::SelectionReason;
use mould_aps::engine::{EngineError, ScheduleOrchestrator};
use mould_aps::logging;
use std::sync::Arc;

fn orchestrator(config: MockConfig) -> ScheduleOrchestrator<MockConfig> {
    ScheduleOrchestrator::new(Arc::new(config))
}

#[tokio::test]
async fn test_each_machine_sequenced_independently() {
    logging::init_test();

    // 两台机台都有 M1 订单,互不影响
    let orders = vec![
        OrderBuilder::new("A1").machine("350").mould("M1").due_in_days(1).build(),
        OrderBuilder::new("A2").machine("350").mould("M2").due_in_days(3).build(),
        OrderBuilder::new("A3").machine("350").mould("M1").due_in_days(10).build(),
        OrderBuilder::new("B1").machine("420").mould("M2").due_in_days(1).build(),
        OrderBuilder::new("B2").machine("420").mould("M1").due_in_days(2).build(),
    ];

    let result = orchestrator(MockConfig::default())
        .execute(orders)
        .await
        .unwrap();

    assert_eq!(result.machine_schedules.len(), 2);
    assert_eq!(result.scheduled_count(), 5);
    assert!(result.unschedulable.is_empty());

    let m350 = result.schedule_for("350").unwrap();
    let ids: Vec<&str> = m350.entries.iter().map(|e| e.order_id.as_str()).collect();
    assert_eq!(ids, vec!["A1", "A3", "A2"]);
    assert_eq!(m350.entries[1].selection, SelectionReason::Opportunity);

    let m420 = result.schedule_for("420").unwrap();
    let ids: Vec<&str> = m420.entries.iter().map(|e| e.order_id.as_str()).collect();
    assert_eq!(ids, vec!["B1", "B2"]);
    assert_eq!(m420.entries[0].planned_start, reference_time());
    assert!(m420.entries.iter().all(|e| e.machine_id == "420"));
}

#[tokio::test]
async fn test_machine_schedules_sorted_by_machine_id() {
    let orders = vec![
        OrderBuilder::new("Z").machine("900").build(),
        OrderBuilder::new("Y").machine("100").build(),
        OrderBuilder::new("X").machine("500").build(),
    ];

    let result = orchestrator(MockConfig::default())
        .execute(orders)
        .await
        .unwrap();

    let machines: Vec<&str> = result
        .machine_schedules
        .iter()
        .map(|s| s.machine_id.as_str())
        .collect();
    assert_eq!(machines, vec!["100", "500", "900"]);
}

#[tokio::test]
async fn test_orders_without_valid_availability_are_unschedulable() {
    let orders = vec![
        OrderBuilder::new("OK").machine("350").build(),
        OrderBuilder::new("NO_MACHINE").machine("999").without_machine().build(),
        OrderBuilder::new("NO_AVAIL").machine("351").availability(None).build(),
        OrderBuilder::new("BAD_AVAIL").machine("352").availability(Some(1.5)).build(),
    ];

    let result = orchestrator(MockConfig::default())
        .execute(orders)
        .await
        .unwrap();

    assert_eq!(result.scheduled_count(), 1);
    assert_eq!(result.unschedulable.len(), 3);

    let reasons: Vec<(&str, &str)> = result
        .unschedulable
        .iter()
        .map(|u| (u.order_id.as_str(), u.reason.as_str()))
        .collect();
    assert!(reasons
        .iter()
        .any(|(id, r)| *id == "NO_MACHINE" && r.starts_with("MACHINE_NOT_FOUND")));
    assert!(reasons
        .iter()
        .any(|(id, r)| *id == "NO_AVAIL" && r.starts_with("INVALID_AVAILABILITY")));
    assert!(reasons
        .iter()
        .any(|(id, r)| *id == "BAD_AVAIL" && r.starts_with("INVALID_AVAILABILITY")));
}

#[tokio::test]
async fn test_machine_filter_limits_scheduled_machines() {
    let orders = vec![
        OrderBuilder::new("A").machine("350").build(),
        OrderBuilder::new("B").machine("420").build(),
    ];

    let result = orchestrator(MockConfig::default().with_machine_filter(&["420"]))
        .execute(orders)
        .await
        .unwrap();

    assert_eq!(result.machine_schedules.len(), 1);
    assert_eq!(result.machine_schedules[0].machine_id, "420");
    assert!(result.unschedulable.is_empty());
}

#[tokio::test]
async fn test_contract_violation_fails_fast() {
    let orders = vec![
        OrderBuilder::new("GOOD").build(),
        OrderBuilder::new("BAD").quantity(0.0).build(),
    ];

    let result = orchestrator(MockConfig::default()).execute(orders).await;
    match result {
        Err(EngineError::Validation { order_id, .. }) => assert_eq!(order_id, "BAD"),
        other => panic!("expected validation error, got {:?}", other.map(|r| r.run_id)),
    }
}

#[tokio::test]
async fn test_duplicate_order_ids_rejected() {
    let orders = vec![
        OrderBuilder::new("DUP").machine("350").build(),
        OrderBuilder::new("DUP").machine("420").build(),
    ];

    let result = orchestrator(MockConfig::default()).execute(orders).await;
    assert!(matches!(result, Err(EngineError::Validation { .. })));
}

#[tokio::test]
async fn test_generous_budget_does_not_abort() {
    let orders = vec![OrderBuilder::new("A").build(), OrderBuilder::new("B").build()];

    let result = orchestrator(MockConfig::default().with_budget_ms(60_000))
        .execute(orders)
        .await
        .unwrap();
    assert_eq!(result.scheduled_count(), 2);
}

#[tokio::test]
async fn test_machine_budget_exceeded() {
    logging::init_test();

    // 模具互不相同,每步前瞻都要扫完整个待排队列
    let orders: Vec<_> = (0..8000)
        .map(|i| {
            OrderBuilder::new(&format!("P{:05}", i))
                .machine("350")
                .mould(&format!("M{}", i))
                .due_in_days(30)
                .build()
        })
        .collect();

    let result = orchestrator(MockConfig::default().with_budget_ms(1))
        .execute(orders)
        .await;
    match result {
        Err(EngineError::MachineBudgetExceeded { machine_id, budget_ms }) => {
            assert_eq!(machine_id, "350");
            assert_eq!(budget_ms, 1);
        }
        other => panic!("expected budget exceeded, got {:?}", other.map(|r| r.run_id)),
    }
}

#[tokio::test]
async fn test_out_of_range_schedule_is_typed_error() {
    let orders = vec![OrderBuilder::new("A")
        .machine("350")
        .availability(Some(1e-12))
        .build()];

    let result = orchestrator(MockConfig::default()).execute(orders).await;
    match result {
        Err(EngineError::TimelineOverflow { machine_id, order_id, .. }) => {
            assert_eq!(machine_id, "350");
            assert_eq!(order_id, "A");
        }
        other => panic!("expected timeline overflow, got {:?}", other.map(|r| r.run_id)),
    }
}

#[tokio::test]
async fn test_empty_input_produces_empty_result() {
    let result = orchestrator(MockConfig::default())
        .execute(vec![])
        .await
        .unwrap();
    assert!(result.machine_schedules.is_empty());
    assert!(result.unschedulable.is_empty());
}

#[tokio::test]
async fn test_orchestrator_with_config_manager() {
    let mut config = ConfigManager::new();
    config.set(config_keys::REFERENCE_TIME, "2022-03-04");
    config.set(config_keys::PRIORITY_RANK_DIRECTION, "higher_is_urgent");

    let result = ScheduleOrchestrator::new(Arc::new(config))
        .execute(vec![OrderBuilder::new("A").priority(3).build()])
        .await
        .unwrap();

    assert_eq!(result.reference_time, reference_time());
    let snapshot = result.config_snapshot_json.unwrap();
    assert!(snapshot.contains("higher_is_urgent"));
}

#[tokio::test]
async fn test_missing_reference_time_is_config_error() {
    let result = ScheduleOrchestrator::new(Arc::new(ConfigManager::new()))
        .execute(vec![OrderBuilder::new("A").build()])
        .await;
    assert!(matches!(result, Err(EngineError::Config(_))));
}
