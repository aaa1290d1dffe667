// ==========================================
// 注塑排产系统 - 生产订单领域模型
// ==========================================
// RawOrderRecord / RawMachineRecord: 导入中间结构 (全部可空)
// ProductionOrder: 清洗后的订单 (排产核心输入)
// ScoredOrder: 打分后的订单 (排序队列元素)
// ==========================================

use crate::domain::machine::Machine;
use crate::domain::types::UrgencyBand;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

// ==========================================
// RawOrderRecord - 导入中间结构
// ==========================================
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawOrderRecord {
    pub prod_order: Option<String>,
    pub machine: Option<String>,
    pub mould: Option<String>,
    pub order_qty: Option<f64>,
    pub processing_time: Option<f64>,
    pub setup_and_processing_time: Option<f64>,
    pub gross_processing_time: Option<f64>,
    pub order_value: Option<f64>,
    pub needed_on: Option<NaiveDateTime>,
    pub priority: Option<u32>,
    pub ref_sales_id: Option<String>,
    pub covering_demand_until: Option<NaiveDateTime>,

    // 元信息
    pub row_number: usize,
}

// ==========================================
// RawMachineRecord - 机台导入中间结构
// ==========================================
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawMachineRecord {
    pub machine: Option<String>,
    pub weekly_hours: Option<f64>,
    pub estimated_availability: Option<f64>,
    pub row_number: usize,
}

// ==========================================
// ProductionOrder - 生产订单
// ==========================================
// 工时单位统一为小时
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductionOrder {
    // ===== 标识 =====
    pub order_id: String,     // 生产订单号
    pub machine_id: String,   // 机台
    pub mould_id: String,     // 模具

    // ===== 工艺 =====
    pub quantity: f64,                    // 订单数量
    pub unit_processing_time_h: f64,      // 同模具加工工时
    pub setup_and_processing_time_h: f64, // 含换型的加工工时

    // ===== 价值 =====
    pub order_value: f64, // 订单金额
    pub unit_value: f64,  // 单价 (order_value / quantity)

    // ===== 交期与优先级 =====
    pub needed_on: NaiveDateTime,     // 需求日期
    pub priority_rank: Option<u32>,   // MRP 优先级
    pub sales_reference: Option<String>, // 关联销售订单
    pub covering_demand_until: Option<NaiveDateTime>,

    // ===== 机台关联 (左外连接结果) =====
    pub machine: Option<Machine>,
}

impl ProductionOrder {
    /// 单价计算 (仅在构建时计算一次)
    pub fn unit_value_of(order_value: f64, quantity: f64) -> f64 {
        order_value / quantity
    }

    pub fn has_sales_reference(&self) -> bool {
        self.sales_reference.is_some()
    }
}

// ==========================================
// OrderScore - UPS 打分结果
// ==========================================
// 由 UpsScorer 计算一次,之后不再修改
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OrderScore {
    pub days_to_deadline: i64,
    pub urgency_band: UrgencyBand,
    pub urgency_score: f64,
    pub type_score: f64,
    pub value_score: f64,
    pub priority_score: f64,
    pub ups: f64,
}

// ==========================================
// ScoredOrder - 已打分订单
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredOrder {
    pub order: ProductionOrder,
    pub score: OrderScore,
}

impl ScoredOrder {
    pub fn order_id(&self) -> &str {
        &self.order.order_id
    }

    pub fn mould_id(&self) -> &str {
        &self.order.mould_id
    }

    pub fn ups(&self) -> f64 {
        self.score.ups
    }
}
