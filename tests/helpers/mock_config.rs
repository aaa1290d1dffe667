// ==========================================
// Mock 配置实现 - 用于集成测试
// ==========================================

use async_trait::async_trait;
use chrono::NaiveDateTime;
use mould_aps::config::{ConfigResult, SchedulingConfigReader};
use mould_aps::domain::types::PriorityRankDirection;
use std::path::PathBuf;

use super::order_builder::reference_time;

/// Mock 配置结构
#[derive(Debug, Clone)]
pub struct MockConfig {
    pub reference_time: NaiveDateTime,
    pub direction: PriorityRankDirection,
    pub budget_ms: Option<u64>,
    pub machine_filter: Option<Vec<String>>,
    pub output_dir: PathBuf,
}

impl MockConfig {
    /// 创建默认配置
    pub fn default() -> Self {
        Self {
            reference_time: reference_time(),
            direction: PriorityRankDirection::LowerIsUrgent,
            budget_ms: None,
            machine_filter: None,
            output_dir: PathBuf::from("output"),
        }
    }

    pub fn with_machine_filter(mut self, machines: &[&str]) -> Self {
        self.machine_filter = Some(machines.iter().map(|m| m.to_string()).collect());
        self
    }

    pub fn with_budget_ms(mut self, budget_ms: u64) -> Self {
        self.budget_ms = Some(budget_ms);
        self
    }
}

#[async_trait]
impl SchedulingConfigReader for MockConfig {
    async fn get_reference_time(&self) -> ConfigResult<NaiveDateTime> {
        Ok(self.reference_time)
    }

    async fn get_priority_rank_direction(&self) -> ConfigResult<PriorityRankDirection> {
        Ok(self.direction)
    }

    async fn get_machine_time_budget_ms(&self) -> ConfigResult<Option<u64>> {
        Ok(self.budget_ms)
    }

    async fn get_machine_filter(&self) -> ConfigResult<Option<Vec<String>>> {
        Ok(self.machine_filter.clone())
    }

    async fn get_output_dir(&self) -> ConfigResult<PathBuf> {
        Ok(self.output_dir.clone())
    }

    async fn get_config_snapshot(&self) -> ConfigResult<String> {
        Ok(format!(
            "{{\"reference_time\":\"{}\",\"priority_rank_direction\":\"{}\"}}",
            self.reference_time.format("%Y-%m-%d %H:%M:%S"),
            self.direction
        ))
    }
}
