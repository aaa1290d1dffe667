// ==========================================
// 注塑排产系统 - 配置管理器
// ==========================================
// 职责: 配置加载、查询、覆写管理
// 来源优先级: 环境变量 (MOULD_APS_*) > JSON 配置文件 > 默认值
// ==========================================

use crate::config::error::{ConfigError, ConfigResult};
use crate::config::scheduling_config_trait::SchedulingConfigReader;
use crate::domain::types::PriorityRankDirection;
use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime};
use serde_json::{json, Value};
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use tracing::debug;

/// 环境变量覆写前缀
pub const ENV_PREFIX: &str = "MOULD_APS_";

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
#[derive(Debug, Clone, Default)]
pub struct ConfigManager {
    values: HashMap<String, String>,
}

impl ConfigManager {
    /// 创建空配置（全部使用默认值）
    pub fn new() -> Self {
        Self {
            values: HashMap::new(),
        }
    }

    /// 从 JSON 配置文件加载
    ///
    /// 文件格式为扁平对象: {"reference_time": "2022-03-04", "machine_filter": ["350"]}
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> ConfigResult<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::ReadError(format!("{}: {}", path.display(), e)))?;
        let manager = Self::from_json_str(&raw)?;
        debug!(path = %path.display(), keys = manager.values.len(), "配置文件加载完成");
        Ok(manager)
    }

    /// 从 JSON 字符串加载
    pub fn from_json_str(raw: &str) -> ConfigResult<Self> {
        let parsed: Value = serde_json::from_str(raw)?;
        let object = parsed
            .as_object()
            .ok_or_else(|| ConfigError::ParseError("配置根节点必须为 JSON 对象".to_string()))?;

        let mut values = HashMap::with_capacity(object.len());
        for (key, value) in object {
            if let Some(text) = json_value_to_config_string(value) {
                values.insert(key.trim().to_string(), text);
            }
        }

        Ok(Self { values })
    }

    /// 应用进程环境变量覆写
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides_from(std::env::vars())
    }

    /// 应用指定的环境变量覆写（MOULD_APS_REFERENCE_TIME → reference_time）
    pub fn with_overrides_from<I>(mut self, vars: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        for (name, value) in vars {
            if let Some(key) = name.strip_prefix(ENV_PREFIX) {
                let key = key.to_lowercase();
                debug!(key = %key, "环境变量覆写配置");
                self.values.insert(key, value);
            }
        }
        self
    }

    /// 设置单个配置项
    pub fn set(&mut self, key: &str, value: &str) {
        self.values.insert(key.to_string(), value.to_string());
    }

    fn get_config_value(&self, key: &str) -> Option<String> {
        self.values
            .get(key)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }

    /// 读取配置值（公开方法，供其他模块复用）
    pub fn get_global_config_value(&self, key: &str) -> Option<String> {
        self.get_config_value(key)
    }

    fn get_config_or_default(&self, key: &str, default: &str) -> String {
        self.get_config_value(key)
            .unwrap_or_else(|| default.to_string())
    }

    /// 获取所有配置的快照（JSON格式，按键排序）
    pub fn snapshot_json(&self) -> ConfigResult<String> {
        let ordered: BTreeMap<&String, &String> = self.values.iter().collect();
        Ok(serde_json::to_string(&json!(ordered))?)
    }
}

fn json_value_to_config_string(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::Array(items) => Some(
            items
                .iter()
                .filter_map(json_value_to_config_string)
                .collect::<Vec<_>>()
                .join(","),
        ),
        Value::Object(_) => Some(value.to_string()),
    }
}

/// 解析基准时间
///
/// 支持: `2022-03-04`, `2022-03-04 08:00`, `2022-03-04 08:00:00`, `2022-03-04T08:00:00`
pub fn parse_reference_time(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    const DATETIME_FORMATS: [&str; 4] = [
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M",
    ];

    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(value, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

// ==========================================
// SchedulingConfigReader Trait 实现
// ==========================================
#[async_trait]
impl SchedulingConfigReader for ConfigManager {
    async fn get_reference_time(&self) -> ConfigResult<NaiveDateTime> {
        let value = self
            .get_config_value(config_keys::REFERENCE_TIME)
            .ok_or_else(|| ConfigError::MissingKey(config_keys::REFERENCE_TIME.to_string()))?;

        parse_reference_time(&value).ok_or_else(|| ConfigError::InvalidValue {
            key: config_keys::REFERENCE_TIME.to_string(),
            value: value.clone(),
            message: "期望 YYYY-MM-DD 或 YYYY-MM-DD HH:MM[:SS]".to_string(),
        })
    }

    async fn get_priority_rank_direction(&self) -> ConfigResult<PriorityRankDirection> {
        let value =
            self.get_config_or_default(config_keys::PRIORITY_RANK_DIRECTION, "lower_is_urgent");
        value
            .parse::<PriorityRankDirection>()
            .map_err(|message| ConfigError::InvalidValue {
                key: config_keys::PRIORITY_RANK_DIRECTION.to_string(),
                value,
                message,
            })
    }

    async fn get_machine_time_budget_ms(&self) -> ConfigResult<Option<u64>> {
        let value = self.get_config_or_default(config_keys::MACHINE_TIME_BUDGET_MS, "0");
        let budget = value
            .parse::<u64>()
            .map_err(|e| ConfigError::InvalidValue {
                key: config_keys::MACHINE_TIME_BUDGET_MS.to_string(),
                value: value.clone(),
                message: e.to_string(),
            })?;
        Ok(if budget == 0 { None } else { Some(budget) })
    }

    async fn get_machine_filter(&self) -> ConfigResult<Option<Vec<String>>> {
        let machines: Vec<String> = self
            .get_config_or_default(config_keys::MACHINE_FILTER, "")
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        if machines.is_empty() {
            Ok(None)
        } else {
            Ok(Some(machines))
        }
    }

    async fn get_output_dir(&self) -> ConfigResult<PathBuf> {
        Ok(PathBuf::from(
            self.get_config_or_default(config_keys::OUTPUT_DIR, "output"),
        ))
    }

    async fn get_config_snapshot(&self) -> ConfigResult<String> {
        self.snapshot_json()
    }
}

// ==========================================
// 配置键常量
// ==========================================
pub mod config_keys {
    // 排产基准
    pub const REFERENCE_TIME: &str = "reference_time";

    // 打分
    pub const PRIORITY_RANK_DIRECTION: &str = "priority_rank_direction";

    // 运行控制
    pub const MACHINE_TIME_BUDGET_MS: &str = "machine_time_budget_ms";
    pub const MACHINE_FILTER: &str = "machine_filter";

    // 导出
    pub const OUTPUT_DIR: &str = "output_dir";
}
