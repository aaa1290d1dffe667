// ==========================================
// 测试数据构建器 - 用于集成测试
// ==========================================

use chrono::{Duration, NaiveDate, NaiveDateTime};
use mould_aps::domain::machine::Machine;
use mould_aps::domain::order::ProductionOrder;

/// 测试统一基准时间: 2022-03-04 00:00
pub fn reference_time() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2022, 3, 4)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap()
}

// ==========================================
// ProductionOrder 构建器
// ==========================================

pub struct OrderBuilder {
    order_id: String,
    machine_id: String,
    mould_id: String,
    quantity: f64,
    unit_processing_time_h: f64,
    setup_and_processing_time_h: f64,
    order_value: f64,
    needed_on: NaiveDateTime,
    priority_rank: Option<u32>,
    sales_reference: Option<String>,
    covering_demand_until: Option<NaiveDateTime>,
    availability: Option<f64>,
    with_machine: bool,
}

impl OrderBuilder {
    pub fn new(order_id: &str) -> Self {
        Self {
            order_id: order_id.to_string(),
            machine_id: "350".to_string(),
            mould_id: "M1".to_string(),
            quantity: 10.0,
            unit_processing_time_h: 5.0,
            setup_and_processing_time_h: 7.0,
            order_value: 1000.0,
            needed_on: reference_time() + Duration::days(10),
            priority_rank: None,
            sales_reference: None,
            covering_demand_until: None,
            availability: Some(1.0),
            with_machine: true,
        }
    }

    pub fn machine(mut self, machine_id: &str) -> Self {
        self.machine_id = machine_id.to_string();
        self
    }

    pub fn mould(mut self, mould_id: &str) -> Self {
        self.mould_id = mould_id.to_string();
        self
    }

    pub fn quantity(mut self, quantity: f64) -> Self {
        self.quantity = quantity;
        self
    }

    pub fn unit_hours(mut self, hours: f64) -> Self {
        self.unit_processing_time_h = hours;
        self
    }

    pub fn setup_hours(mut self, hours: f64) -> Self {
        self.setup_and_processing_time_h = hours;
        self
    }

    pub fn value(mut self, order_value: f64) -> Self {
        self.order_value = order_value;
        self
    }

    pub fn due_in_hours(mut self, hours: i64) -> Self {
        self.needed_on = reference_time() + Duration::hours(hours);
        self
    }

    pub fn due_in_days(mut self, days: i64) -> Self {
        self.needed_on = reference_time() + Duration::days(days);
        self
    }

    pub fn priority(mut self, rank: u32) -> Self {
        self.priority_rank = Some(rank);
        self
    }

    pub fn sales_ref(mut self, reference: &str) -> Self {
        self.sales_reference = Some(reference.to_string());
        self
    }

    pub fn covering_demand_in_days(mut self, days: i64) -> Self {
        self.covering_demand_until = Some(reference_time() + Duration::days(days));
        self
    }

    pub fn availability(mut self, availability: Option<f64>) -> Self {
        self.availability = availability;
        self
    }

    /// 模拟机台关联失败
    pub fn without_machine(mut self) -> Self {
        self.with_machine = false;
        self
    }

    pub fn build(self) -> ProductionOrder {
        let machine = if self.with_machine {
            Some(Machine::new(&self.machine_id, Some(120.0), self.availability))
        } else {
            None
        };

        ProductionOrder {
            unit_value: ProductionOrder::unit_value_of(self.order_value, self.quantity),
            order_id: self.order_id,
            machine_id: self.machine_id,
            mould_id: self.mould_id,
            quantity: self.quantity,
            unit_processing_time_h: self.unit_processing_time_h,
            setup_and_processing_time_h: self.setup_and_processing_time_h,
            order_value: self.order_value,
            needed_on: self.needed_on,
            priority_rank: self.priority_rank,
            sales_reference: self.sales_reference,
            covering_demand_until: self.covering_demand_until,
            machine,
        }
    }
}
