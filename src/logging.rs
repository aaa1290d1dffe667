// ==========================================
// 注塑排产系统 - 日志
// ==========================================
// 级别: RUST_LOG (缺省 info)
// 格式: MOULD_APS_LOG_FORMAT = text | json
// ==========================================

use tracing_subscriber::{fmt, EnvFilter};

/// 日志格式环境变量
pub const LOG_FORMAT_ENV: &str = "MOULD_APS_LOG_FORMAT";

const DEFAULT_DIRECTIVE: &str = "info";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

impl LogFormat {
    /// 未设置或无法识别时为 Text
    pub fn from_env() -> Self {
        Self::parse(std::env::var(LOG_FORMAT_ENV).ok().as_deref())
    }

    fn parse(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            Some(v) if v.eq_ignore_ascii_case("json") => LogFormat::Json,
            _ => LogFormat::Text,
        }
    }
}

/// 进程级日志初始化 (CLI 入口调用一次)
///
/// ```no_run
/// mould_aps::logging::init();
/// ```
///
/// 调试单个引擎: `RUST_LOG=mould_aps::engine::sequencer=debug`
pub fn init() {
    init_with_format(LogFormat::from_env());
}

pub fn init_with_format(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVE));

    // 各机台在阻塞线程池上排序,保留线程名便于区分
    let subscriber = fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(true)
        .with_line_number(true);

    match format {
        LogFormat::Json => subscriber.json().init(),
        LogFormat::Text => subscriber.init(),
    }
}

/// 测试用: debug 级别,输出交给测试框架捕获,可重复调用
pub fn init_test() {
    let _ = fmt()
        .with_env_filter(EnvFilter::new("debug"))
        .with_test_writer()
        .try_init();
}
