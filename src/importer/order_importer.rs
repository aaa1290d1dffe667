// ==========================================
// 注塑排产系统 - 订单导入器实现
// ==========================================
// 阶段 0: 文件解析 (订单表 + 机台表)
// 阶段 1: 列名标准化 + 必需列检查
// 阶段 2: 字段映射与类型转换
// 阶段 3: 行过滤 (记录剔除原因,不中断导入)
// 阶段 4: 机台左外连接
// ==========================================

use crate::domain::machine::Machine;
use crate::domain::order::{ProductionOrder, RawMachineRecord, RawOrderRecord};
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::field_mapper::{
    normalize_row, FieldMapper, REQUIRED_MACHINE_COLUMNS, REQUIRED_ORDER_COLUMNS,
};
use crate::importer::file_parser::{CsvParser, ExcelParser};
use crate::importer::order_importer_trait::{
    FieldMapper as FieldMapperTrait, FileParser, OrderImporter, RawRow,
};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use uuid::Uuid;

/// 工作簿中订单表 / 机台表的位置
const ORDERS_SHEET_INDEX: usize = 0;
const MACHINES_SHEET_INDEX: usize = 1;

/// 数据行号起点（第 1 行为表头）
const FIRST_DATA_ROW: usize = 2;

// ==========================================
// RejectedRow - 被剔除的行
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RejectedRow {
    pub source: String, // orders / machines
    pub row_number: usize,
    pub key: Option<String>, // 订单号或机台号
    pub reason: String,
}

// ==========================================
// ImportOutcome - 导入结果
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportOutcome {
    pub batch_id: String,
    pub orders: Vec<ProductionOrder>, // 已关联机台
    pub machines: Vec<Machine>,
    pub rejected: Vec<RejectedRow>,
    pub total_order_rows: usize,
}

impl ImportOutcome {
    pub fn unmatched_machine_count(&self) -> usize {
        self.orders.iter().filter(|o| o.machine.is_none()).count()
    }
}

// ==========================================
// OrderImporterImpl
// ==========================================
pub struct OrderImporterImpl {
    mapper: FieldMapper,
}

impl OrderImporterImpl {
    pub fn new() -> Self {
        Self {
            mapper: FieldMapper::new(),
        }
    }

    /// 由原始行构建导入结果（与文件格式无关）
    pub fn build_outcome(
        &self,
        order_rows: Vec<RawRow>,
        machine_rows: Vec<RawRow>,
    ) -> ImportResult<ImportOutcome> {
        let batch_id = Uuid::new_v4().to_string();
        let total_order_rows = order_rows.len();

        // 阶段 1: 列名标准化
        let order_rows: Vec<RawRow> = order_rows.into_iter().map(normalize_row).collect();
        let machine_rows: Vec<RawRow> = machine_rows.into_iter().map(normalize_row).collect();
        check_required_columns("orders", &order_rows, &REQUIRED_ORDER_COLUMNS)?;
        check_required_columns("machines", &machine_rows, &REQUIRED_MACHINE_COLUMNS)?;

        let mut rejected = Vec::new();

        // 阶段 2: 机台
        let machines = self.map_machines(&machine_rows, &mut rejected);
        let machine_lookup: HashMap<&str, &Machine> = machines
            .iter()
            .map(|m| (m.machine_id.as_str(), m))
            .collect();

        // 阶段 2-4: 订单映射、过滤、关联
        let mut orders = Vec::with_capacity(order_rows.len());
        for (idx, row) in order_rows.iter().enumerate() {
            let row_number = idx + FIRST_DATA_ROW;
            let raw = match self.mapper.map_to_raw_order(row, row_number) {
                Ok(raw) => raw,
                Err(e) => {
                    warn!(row_number = row_number, error = %e, "订单字段映射失败");
                    rejected.push(RejectedRow {
                        source: "orders".to_string(),
                        row_number,
                        key: row.get("prod_order").cloned(),
                        reason: e.to_string(),
                    });
                    continue;
                }
            };

            match filter_order(raw) {
                Ok(mut order) => {
                    order.machine = machine_lookup.get(order.machine_id.as_str()).map(|m| (*m).clone());
                    orders.push(order);
                }
                Err((key, reason)) => {
                    debug!(row_number = row_number, reason = %reason, "订单行被剔除");
                    rejected.push(RejectedRow {
                        source: "orders".to_string(),
                        row_number,
                        key,
                        reason,
                    });
                }
            }
        }

        let outcome = ImportOutcome {
            batch_id,
            orders,
            machines,
            rejected,
            total_order_rows,
        };

        info!(
            batch_id = %outcome.batch_id,
            total_rows = outcome.total_order_rows,
            imported = outcome.orders.len(),
            machines = outcome.machines.len(),
            rejected = outcome.rejected.len(),
            unmatched_machine = outcome.unmatched_machine_count(),
            "订单导入完成"
        );

        Ok(outcome)
    }

    fn map_machines(&self, rows: &[RawRow], rejected: &mut Vec<RejectedRow>) -> Vec<Machine> {
        let mut machines: Vec<Machine> = Vec::with_capacity(rows.len());

        for (idx, row) in rows.iter().enumerate() {
            let row_number = idx + FIRST_DATA_ROW;
            let record = match self.mapper.map_to_raw_machine(row, row_number) {
                Ok(record) => record,
                Err(e) => {
                    warn!(row_number = row_number, error = %e, "机台字段映射失败");
                    rejected.push(RejectedRow {
                        source: "machines".to_string(),
                        row_number,
                        key: row.get("machine").cloned(),
                        reason: e.to_string(),
                    });
                    continue;
                }
            };

            match to_machine(record) {
                Some(machine) if machines.iter().any(|m| m.machine_id == machine.machine_id) => {
                    warn!(machine_id = %machine.machine_id, row_number = row_number, "机台重复,保留首条");
                    rejected.push(RejectedRow {
                        source: "machines".to_string(),
                        row_number,
                        key: Some(machine.machine_id),
                        reason: "机台编号重复".to_string(),
                    });
                }
                Some(machine) => machines.push(machine),
                None => rejected.push(RejectedRow {
                    source: "machines".to_string(),
                    row_number,
                    key: None,
                    reason: "机台编号缺失".to_string(),
                }),
            }
        }

        machines
    }
}

impl Default for OrderImporterImpl {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl OrderImporter for OrderImporterImpl {
    async fn import_workbook(&self, file_path: &Path) -> ImportResult<ImportOutcome> {
        info!(file_path = %file_path.display(), "开始导入订单工作簿");

        let parser = ExcelParser;
        let sheets = parser.sheet_names(file_path)?;
        if sheets.len() <= MACHINES_SHEET_INDEX {
            return Err(ImportError::SheetNotFound {
                index: MACHINES_SHEET_INDEX + 1,
                available: sheets.len(),
            });
        }

        let (order_rows, machine_rows) = tokio::try_join!(
            parse_blocking(ExcelParser, file_path.to_path_buf(), ORDERS_SHEET_INDEX),
            parse_blocking(ExcelParser, file_path.to_path_buf(), MACHINES_SHEET_INDEX),
        )?;
        info!(
            orders_sheet = %sheets[ORDERS_SHEET_INDEX],
            machines_sheet = %sheets[MACHINES_SHEET_INDEX],
            order_rows = order_rows.len(),
            machine_rows = machine_rows.len(),
            "文件解析完成"
        );

        self.build_outcome(order_rows, machine_rows)
    }

    async fn import_csv_pair(
        &self,
        orders_path: &Path,
        machines_path: &Path,
    ) -> ImportResult<ImportOutcome> {
        info!(
            orders = %orders_path.display(),
            machines = %machines_path.display(),
            "开始导入订单 CSV"
        );

        let (order_rows, machine_rows) = tokio::try_join!(
            parse_blocking(CsvParser, orders_path.to_path_buf(), 0),
            parse_blocking(CsvParser, machines_path.to_path_buf(), 0),
        )?;

        self.build_outcome(order_rows, machine_rows)
    }
}

/// 在阻塞线程池上解析单个数据源
async fn parse_blocking<P>(parser: P, path: PathBuf, sheet_index: usize) -> ImportResult<Vec<RawRow>>
where
    P: FileParser + Send + 'static,
{
    tokio::task::spawn_blocking(move || parser.parse_to_raw_records(&path, sheet_index))
        .await
        .map_err(|e| ImportError::InternalError(format!("解析任务异常退出: {}", e)))?
}

// ==========================================
// 行过滤
// ==========================================

fn check_required_columns(source: &str, rows: &[RawRow], required: &[&str]) -> ImportResult<()> {
    let first = match rows.first() {
        Some(row) => row,
        None => return Ok(()),
    };
    for column in required {
        if !first.contains_key(*column) {
            return Err(ImportError::MissingColumn {
                source_name: source.to_string(),
                column: column.to_string(),
            });
        }
    }
    Ok(())
}

fn to_machine(record: RawMachineRecord) -> Option<Machine> {
    let machine_id = record.machine?;
    Some(Machine::new(
        &machine_id,
        record.weekly_hours,
        record.estimated_availability,
    ))
}

/// 订单行过滤
///
/// # 返回
/// - Ok(order): 通过过滤（尚未关联机台）
/// - Err((订单号, 剔除原因))
fn filter_order(raw: RawOrderRecord) -> Result<ProductionOrder, (Option<String>, String)> {
    let key = raw.prod_order.clone();
    let reject = |reason: &str| (key.clone(), reason.to_string());

    let processing_time = match raw.processing_time {
        Some(t) if t > 0.0 => t,
        _ => return Err(reject("加工工时缺失或 <= 0")),
    };
    let mould = raw.mould.ok_or_else(|| reject("模具缺失"))?;
    let machine = raw.machine.ok_or_else(|| reject("机台缺失"))?;
    let quantity = raw.order_qty.ok_or_else(|| reject("订单数量缺失"))?;
    if raw.gross_processing_time.is_none() {
        return Err(reject("毛工时缺失"));
    }
    let setup_and_processing_time = match raw.setup_and_processing_time {
        Some(t) if t > 0.0 => t,
        _ => return Err(reject("换型加工工时缺失或 <= 0")),
    };
    if quantity <= 0.0 {
        return Err(reject("订单数量 <= 0"));
    }
    let needed_on = raw.needed_on.ok_or_else(|| reject("需求日期缺失或无法解析"))?;
    let order_value = match raw.order_value {
        Some(v) if v >= 0.0 => v,
        Some(_) => return Err(reject("订单金额为负")),
        None => return Err(reject("订单金额缺失")),
    };
    let order_id = raw.prod_order.ok_or_else(|| reject("生产订单号缺失"))?;

    Ok(ProductionOrder {
        order_id,
        machine_id: machine,
        mould_id: mould,
        quantity,
        unit_processing_time_h: processing_time,
        setup_and_processing_time_h: setup_and_processing_time,
        order_value,
        unit_value: ProductionOrder::unit_value_of(order_value, quantity),
        needed_on,
        priority_rank: raw.priority,
        sales_reference: raw.ref_sales_id,
        covering_demand_until: raw.covering_demand_until,
        machine: None,
    })
}
