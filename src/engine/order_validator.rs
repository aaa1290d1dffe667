// ==========================================
// 注塑排产系统 - 订单契约校验
// ==========================================
// 职责: 核心入口处校验导入层承诺的前置条件
// 红线: 不修正数据,违反即返回 Validation 错误
// ==========================================

use crate::domain::order::ProductionOrder;
use crate::engine::error::{EngineError, EngineResult};
use std::collections::HashSet;

/// 单价一致性的相对容差 (金额较小时按绝对容差)
const UNIT_VALUE_TOLERANCE: f64 = 1e-9;

pub struct OrderContractValidator {
    // 无状态校验器
}

impl OrderContractValidator {
    pub fn new() -> Self {
        Self {}
    }

    /// 校验单个订单
    pub fn validate(&self, order: &ProductionOrder) -> EngineResult<()> {
        let fail = |field: &str, message: String| EngineError::Validation {
            order_id: order.order_id.clone(),
            field: field.to_string(),
            message,
        };

        if order.order_id.trim().is_empty() {
            return Err(fail("order_id", "订单号为空".to_string()));
        }
        if order.machine_id.trim().is_empty() {
            return Err(fail("machine_id", "机台为空".to_string()));
        }
        if order.mould_id.trim().is_empty() {
            return Err(fail("mould_id", "模具为空".to_string()));
        }
        if !(order.quantity.is_finite() && order.quantity > 0.0) {
            return Err(fail("quantity", format!("数量必须 > 0, 实际 {}", order.quantity)));
        }
        if !(order.unit_processing_time_h.is_finite() && order.unit_processing_time_h > 0.0) {
            return Err(fail(
                "unit_processing_time",
                format!("加工工时必须 > 0, 实际 {}", order.unit_processing_time_h),
            ));
        }
        if !(order.setup_and_processing_time_h.is_finite()
            && order.setup_and_processing_time_h > 0.0)
        {
            return Err(fail(
                "setup_and_processing_time",
                format!("换型工时必须 > 0, 实际 {}", order.setup_and_processing_time_h),
            ));
        }
        if !(order.order_value.is_finite() && order.order_value >= 0.0) {
            return Err(fail(
                "order_value",
                format!("订单金额必须 >= 0, 实际 {}", order.order_value),
            ));
        }
        if !order.unit_value.is_finite() {
            return Err(fail("unit_value", format!("单价非法: {}", order.unit_value)));
        }
        let expected_unit_value = ProductionOrder::unit_value_of(order.order_value, order.quantity);
        if (order.unit_value - expected_unit_value).abs()
            > UNIT_VALUE_TOLERANCE * expected_unit_value.abs().max(1.0)
        {
            return Err(fail(
                "unit_value",
                format!(
                    "单价与 金额/数量 不一致: 单价 {}, 金额/数量 {}",
                    order.unit_value, expected_unit_value
                ),
            ));
        }
        if let Some(machine) = &order.machine {
            if machine.machine_id != order.machine_id {
                return Err(fail(
                    "machine",
                    format!(
                        "关联机台不一致: 订单机台={}, 关联机台={}",
                        order.machine_id, machine.machine_id
                    ),
                ));
            }
        }

        Ok(())
    }

    /// 批量校验（含订单号唯一性）
    pub fn validate_all(&self, orders: &[ProductionOrder]) -> EngineResult<()> {
        let mut seen: HashSet<&str> = HashSet::with_capacity(orders.len());
        for order in orders {
            self.validate(order)?;
            if !seen.insert(order.order_id.as_str()) {
                return Err(EngineError::Validation {
                    order_id: order.order_id.clone(),
                    field: "order_id".to_string(),
                    message: "订单号重复".to_string(),
                });
            }
        }
        Ok(())
    }
}

impl Default for OrderContractValidator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::machine::Machine;
    use chrono::NaiveDate;

    fn order(id: &str) -> ProductionOrder {
        ProductionOrder {
            order_id: id.to_string(),
            machine_id: "350".to_string(),
            mould_id: "M1".to_string(),
            quantity: 10.0,
            unit_processing_time_h: 5.0,
            setup_and_processing_time_h: 7.0,
            order_value: 1000.0,
            unit_value: 100.0,
            needed_on: NaiveDate::from_ymd_opt(2022, 3, 10)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap(),
            priority_rank: Some(3),
            sales_reference: None,
            covering_demand_until: None,
            machine: Some(Machine::new("350", Some(120.0), Some(1.0))),
        }
    }

    #[test]
    fn test_valid_order_passes() {
        assert!(OrderContractValidator::new().validate(&order("A")).is_ok());
    }

    #[test]
    fn test_inconsistent_unit_value_rejected() {
        let mut o = order("A");
        o.unit_value = 99.0;
        let err = OrderContractValidator::new().validate(&o).unwrap_err();
        match err {
            EngineError::Validation { field, .. } => assert_eq!(field, "unit_value"),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_unit_value_rounding_noise_accepted() {
        let mut o = order("A");
        o.order_value = 1.0;
        o.quantity = 3.0;
        o.unit_value = 0.333_333_333_333_333_3;
        assert!(OrderContractValidator::new().validate(&o).is_ok());
    }

    #[test]
    fn test_non_positive_processing_time_rejected() {
        let mut o = order("A");
        o.unit_processing_time_h = 0.0;
        let err = OrderContractValidator::new().validate(&o).unwrap_err();
        match err {
            EngineError::Validation { field, .. } => assert_eq!(field, "unit_processing_time"),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_empty_mould_rejected() {
        let mut o = order("A");
        o.mould_id = "  ".to_string();
        assert!(OrderContractValidator::new().validate(&o).is_err());
    }

    #[test]
    fn test_duplicate_order_id_rejected() {
        let orders = vec![order("A"), order("B"), order("A")];
        let err = OrderContractValidator::new().validate_all(&orders).unwrap_err();
        assert!(err.to_string().contains("订单号重复"));
    }

    #[test]
    fn test_mismatched_machine_join_rejected() {
        let mut o = order("A");
        o.machine = Some(Machine::new("420", None, Some(0.9)));
        assert!(OrderContractValidator::new().validate(&o).is_err());
    }
}
