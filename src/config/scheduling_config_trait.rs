// ==========================================
// 注塑排产系统 - 排产配置读取 Trait
// ==========================================
// 职责: 定义排产引擎所需的配置读取接口（不包含实现）
// 红线: 不包含配置写入、不包含业务逻辑
// ==========================================

use crate::config::error::ConfigResult;
use crate::domain::types::PriorityRankDirection;
use async_trait::async_trait;
use chrono::NaiveDateTime;
use std::path::PathBuf;

// ==========================================
// SchedulingConfigReader Trait
// ==========================================
// 实现者: ConfigManager
#[async_trait]
pub trait SchedulingConfigReader: Send + Sync {
    /// 获取排产基准时间（交期天数与排产起点）
    ///
    /// # 默认值
    /// - 无,必须显式配置
    async fn get_reference_time(&self) -> ConfigResult<NaiveDateTime>;

    /// 获取 MRP 优先级方向
    ///
    /// # 默认值
    /// - lower_is_urgent
    async fn get_priority_rank_direction(&self) -> ConfigResult<PriorityRankDirection>;

    /// 获取单机台排产耗时上限（毫秒）
    ///
    /// # 返回
    /// - None: 不限制（未配置或配置为 0）
    async fn get_machine_time_budget_ms(&self) -> ConfigResult<Option<u64>>;

    /// 获取参与排产的机台列表
    ///
    /// # 返回
    /// - None: 全部机台
    async fn get_machine_filter(&self) -> ConfigResult<Option<Vec<String>>>;

    /// 获取导出目录
    ///
    /// # 默认值
    /// - output
    async fn get_output_dir(&self) -> ConfigResult<PathBuf>;

    /// 获取配置快照（JSON）,随排产结果一起输出便于复现
    async fn get_config_snapshot(&self) -> ConfigResult<String>;
}
