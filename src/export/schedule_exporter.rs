// ==========================================
// 注塑排产系统 - 排产结果导出
// ==========================================
// 输出: machine_<机台>.csv (每机台一份) + summary.json
// 展示规则: ups / unit_value / 毛工时 保留 2 位小数
//          needed_on: %Y-%m-%d; 计划时间: %Y-%m-%d %H:%M
// ==========================================

use crate::domain::schedule::{MachineSchedule, ScheduleEntry, ScheduleRunResult, UnschedulableOrder};
use crate::export::error::{ExportError, ExportResult};
use chrono::NaiveDateTime;
use csv::Writer;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, instrument};

pub const DATE_FORMAT: &str = "%Y-%m-%d";
pub const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M";
pub const SUMMARY_FILE_NAME: &str = "summary.json";

/// 保留 2 位小数
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn format_datetime(value: NaiveDateTime) -> String {
    value.format(DATETIME_FORMAT).to_string()
}

// ==========================================
// ScheduleRow - 导出行
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScheduleRow {
    pub prod_order: String,
    pub machine: String,
    pub mould: String,
    pub ups: f64,
    pub unit_value: f64,
    pub gross_processing_time: f64,
    pub needed_on: String,
    pub covering_demand_until: String,
    pub planned_start: String,
    pub planned_end: String,
    pub value_score: f64,
    pub order_value: f64,
    pub selection: String,
    pub changeover: bool,
}

impl From<&ScheduleEntry> for ScheduleRow {
    fn from(entry: &ScheduleEntry) -> Self {
        Self {
            prod_order: entry.order_id.clone(),
            machine: entry.machine_id.clone(),
            mould: entry.mould_id.clone(),
            ups: round2(entry.ups),
            unit_value: round2(entry.unit_value),
            gross_processing_time: round2(entry.actual_gross_processing_time_h),
            needed_on: entry.needed_on.format(DATE_FORMAT).to_string(),
            covering_demand_until: entry
                .covering_demand_until
                .map(|d| d.format(DATE_FORMAT).to_string())
                .unwrap_or_default(),
            planned_start: format_datetime(entry.planned_start),
            planned_end: format_datetime(entry.planned_end),
            value_score: entry.value_score,
            order_value: entry.order_value,
            selection: entry.selection.to_string(),
            changeover: entry.is_changeover(),
        }
    }
}

// ==========================================
// RunSummary - 运行摘要
// ==========================================
#[derive(Debug, Clone, Serialize)]
pub struct MachineSummary {
    pub machine_id: String,
    pub scheduled: usize,
    pub changeovers: usize,
    pub opportunities: usize,
    pub late: usize,
    pub makespan_end: Option<String>,
}

impl From<&MachineSchedule> for MachineSummary {
    fn from(schedule: &MachineSchedule) -> Self {
        Self {
            machine_id: schedule.machine_id.clone(),
            scheduled: schedule.len(),
            changeovers: schedule.changeover_count(),
            opportunities: schedule.opportunity_count(),
            late: schedule.late_count(),
            makespan_end: schedule.makespan_end().map(format_datetime),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub run_id: String,
    pub reference_time: String,
    pub scheduled: usize,
    pub machines: Vec<MachineSummary>,
    pub unschedulable: Vec<UnschedulableOrder>,
    pub config: Option<serde_json::Value>,
}

impl RunSummary {
    pub fn from_result(result: &ScheduleRunResult) -> Self {
        Self {
            run_id: result.run_id.to_string(),
            reference_time: format_datetime(result.reference_time),
            scheduled: result.scheduled_count(),
            machines: result.machine_schedules.iter().map(MachineSummary::from).collect(),
            unschedulable: result.unschedulable.clone(),
            config: result
                .config_snapshot_json
                .as_deref()
                .and_then(|s| serde_json::from_str(s).ok()),
        }
    }
}

// ==========================================
// ExportReport - 导出文件清单
// ==========================================
#[derive(Debug, Clone)]
pub struct ExportReport {
    pub machine_files: Vec<PathBuf>,
    pub summary_file: PathBuf,
}

// ==========================================
// ScheduleExporter
// ==========================================
pub struct ScheduleExporter {
    output_dir: PathBuf,
}

impl ScheduleExporter {
    pub fn new<P: AsRef<Path>>(output_dir: P) -> Self {
        Self {
            output_dir: output_dir.as_ref().to_path_buf(),
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// 导出整次排产结果
    #[instrument(skip(self, result), fields(run_id = %result.run_id, output_dir = %self.output_dir.display()))]
    pub fn export(&self, result: &ScheduleRunResult) -> ExportResult<ExportReport> {
        fs::create_dir_all(&self.output_dir).map_err(|e| ExportError::OutputDirError {
            path: self.output_dir.display().to_string(),
            message: e.to_string(),
        })?;

        let machine_files = result
            .machine_schedules
            .iter()
            .map(|schedule| self.write_machine_csv(schedule))
            .collect::<ExportResult<Vec<_>>>()?;

        let summary_file = self.write_summary(&RunSummary::from_result(result))?;

        info!(
            machine_files = machine_files.len(),
            summary = %summary_file.display(),
            "排产结果导出完成"
        );

        Ok(ExportReport {
            machine_files,
            summary_file,
        })
    }

    /// 单机台 CSV
    pub fn write_machine_csv(&self, schedule: &MachineSchedule) -> ExportResult<PathBuf> {
        let path = self
            .output_dir
            .join(format!("machine_{}.csv", sanitize_file_component(&schedule.machine_id)));

        let mut writer = Writer::from_path(&path)?;
        for entry in &schedule.entries {
            writer.serialize(ScheduleRow::from(entry))?;
        }
        writer.flush()?;

        Ok(path)
    }

    pub fn write_summary(&self, summary: &RunSummary) -> ExportResult<PathBuf> {
        let path = self.output_dir.join(SUMMARY_FILE_NAME);
        fs::write(&path, serde_json::to_string_pretty(summary)?)?;
        Ok(path)
    }
}

/// 文件名中只保留字母数字与 - _
fn sanitize_file_component(value: &str) -> String {
    value
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect()
}
