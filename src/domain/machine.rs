// ==========================================
// 注塑排产系统 - 机台领域模型
// ==========================================

use serde::{Deserialize, Serialize};

// ==========================================
// Machine - 机台
// ==========================================
// estimated_availability: 有效产能折算系数 (0, 1]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Machine {
    pub machine_id: String,                    // 机台编号
    pub weekly_hours: Option<f64>,             // 周工时 (100%)
    pub estimated_availability: Option<f64>,   // 预估可用率
}

impl Machine {
    pub fn new(machine_id: &str, weekly_hours: Option<f64>, estimated_availability: Option<f64>) -> Self {
        Self {
            machine_id: machine_id.to_string(),
            weekly_hours,
            estimated_availability,
        }
    }

    /// 可用于排产的可用率
    ///
    /// # 返回
    /// - Some(a): a ∈ (0, 1]
    /// - None: 缺失或越界,机台不可排产
    pub fn schedulable_availability(&self) -> Option<f64> {
        self.estimated_availability
            .filter(|a| a.is_finite() && *a > 0.0 && *a <= 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schedulable_availability() {
        assert_eq!(
            Machine::new("350", Some(120.0), Some(0.85)).schedulable_availability(),
            Some(0.85)
        );
        assert_eq!(Machine::new("350", None, None).schedulable_availability(), None);
        assert_eq!(Machine::new("350", None, Some(0.0)).schedulable_availability(), None);
        assert_eq!(Machine::new("350", None, Some(1.5)).schedulable_availability(), None);
        assert_eq!(
            Machine::new("350", None, Some(f64::NAN)).schedulable_availability(),
            None
        );
    }
}
