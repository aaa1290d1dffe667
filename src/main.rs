// ==========================================
// 注塑排产系统 - 命令行入口
// ==========================================
// 用法:
//   mould-aps <orders.xlsx> [选项]
//   mould-aps <orders.csv> <machines.csv> [选项]
// 选项:
//   --config <cfg.json>        配置文件
//   --out <dir>                导出目录
//   --reference-time <时间>    排产基准时间 (覆盖配置)
// ==========================================

use anyhow::{bail, Context, Result};
use mould_aps::config::{config_keys, ConfigManager, SchedulingConfigReader};
use mould_aps::engine::ScheduleOrchestrator;
use mould_aps::export::ScheduleExporter;
use mould_aps::importer::{ImportOutcome, OrderImporter, OrderImporterImpl};
use mould_aps::logging;
use std::path::{Path, PathBuf};
use std::sync::Arc;

const USAGE: &str = "用法: mould-aps <orders.xlsx | orders.csv machines.csv> [--config cfg.json] [--out dir] [--reference-time YYYY-MM-DD[ HH:MM]]";

#[derive(Debug, Default)]
struct CliArgs {
    inputs: Vec<PathBuf>,
    config_path: Option<PathBuf>,
    output_dir: Option<PathBuf>,
    reference_time: Option<String>,
}

fn parse_args<I: Iterator<Item = String>>(mut args: I) -> Result<CliArgs> {
    let mut cli = CliArgs::default();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--config" => cli.config_path = Some(PathBuf::from(next_value(&mut args, "--config")?)),
            "--out" => cli.output_dir = Some(PathBuf::from(next_value(&mut args, "--out")?)),
            "--reference-time" => cli.reference_time = Some(next_value(&mut args, "--reference-time")?),
            "-h" | "--help" => bail!("{}", USAGE),
            flag if flag.starts_with("--") => bail!("未知参数: {}\n{}", flag, USAGE),
            _ => cli.inputs.push(PathBuf::from(arg)),
        }
    }

    if cli.inputs.is_empty() || cli.inputs.len() > 2 {
        bail!("{}", USAGE);
    }
    Ok(cli)
}

fn next_value<I: Iterator<Item = String>>(args: &mut I, flag: &str) -> Result<String> {
    args.next()
        .with_context(|| format!("参数 {} 缺少取值", flag))
}

async fn import(inputs: &[PathBuf]) -> Result<ImportOutcome> {
    let importer = OrderImporterImpl::new();
    let outcome = match inputs {
        [workbook] => importer.import_workbook(workbook).await,
        [orders, machines] => importer.import_csv_pair(orders, machines).await,
        _ => bail!("{}", USAGE),
    };
    outcome.context("订单导入失败")
}

fn load_config(cli: &CliArgs) -> Result<ConfigManager> {
    let mut config = match &cli.config_path {
        Some(path) => ConfigManager::from_json_file(path)
            .with_context(|| format!("配置文件加载失败: {}", path.display()))?,
        None => ConfigManager::new(),
    }
    .with_env_overrides();

    if let Some(reference_time) = &cli.reference_time {
        config.set(config_keys::REFERENCE_TIME, reference_time);
    }
    if let Some(out) = &cli.output_dir {
        config.set(config_keys::OUTPUT_DIR, &out.display().to_string());
    }
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<()> {
    logging::init();

    let cli = parse_args(std::env::args().skip(1))?;

    tracing::info!("==================================================");
    tracing::info!("{} v{}", mould_aps::APP_NAME, mould_aps::VERSION);
    tracing::info!("==================================================");

    let config = Arc::new(load_config(&cli)?);

    // 导入
    let outcome = import(&cli.inputs).await?;
    for rejected in &outcome.rejected {
        tracing::warn!(
            source = %rejected.source,
            row_number = rejected.row_number,
            key = ?rejected.key,
            reason = %rejected.reason,
            "导入行被剔除"
        );
    }

    // 排产
    let orchestrator = ScheduleOrchestrator::new(config.clone());
    let result = orchestrator
        .execute(outcome.orders)
        .await
        .context("排产失败")?;

    // 导出
    let output_dir = config.get_output_dir().await?;
    let report = ScheduleExporter::new(&output_dir)
        .export(&result)
        .context("排产结果导出失败")?;

    print_summary(&result, &output_dir);
    tracing::info!(summary = %report.summary_file.display(), "完成");

    Ok(())
}

fn print_summary(result: &mould_aps::ScheduleRunResult, output_dir: &Path) {
    println!("排产批次: {}", result.run_id);
    println!("基准时间: {}", result.reference_time);
    println!(
        "{:<12} {:>8} {:>8} {:>8} {:>8}  {}",
        "机台", "订单数", "换模", "机会单", "延期", "完工时间"
    );
    for schedule in &result.machine_schedules {
        println!(
            "{:<12} {:>8} {:>8} {:>8} {:>8}  {}",
            schedule.machine_id,
            schedule.len(),
            schedule.changeover_count(),
            schedule.opportunity_count(),
            schedule.late_count(),
            schedule
                .makespan_end()
                .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
                .unwrap_or_else(|| "-".to_string()),
        );
    }
    if !result.unschedulable.is_empty() {
        println!("不可排产订单: {}", result.unschedulable.len());
    }
    println!("导出目录: {}", output_dir.display());
}
