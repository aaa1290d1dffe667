// ==========================================
// 注塑排产系统 - 配置层
// ==========================================
// 职责: 系统配置管理,支持文件 + 环境变量覆写
// ==========================================

pub mod config_manager;
pub mod error;
pub mod scheduling_config_trait;

// 重导出核心配置管理器
pub use config_manager::{config_keys, parse_reference_time, ConfigManager};
pub use error::{ConfigError, ConfigResult};
pub use scheduling_config_trait::SchedulingConfigReader;
