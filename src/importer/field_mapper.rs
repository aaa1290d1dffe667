// ==========================================
// 注塑排产系统 - 字段映射器实现
// ==========================================
// 职责: 列名标准化 + 源字段 → 中间结构映射 + 类型转换
// 列名规则: 去首尾空白 → 小写 → 空格转 "_" → 删除 . ( ) 换行
// ==========================================

use crate::domain::order::{RawMachineRecord, RawOrderRecord};
use crate::importer::data_cleaner::DataCleaner;
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::order_importer_trait::{
    DataCleaner as DataCleanerTrait, FieldMapper as FieldMapperTrait, RawRow,
};
use chrono::NaiveDateTime;

/// 订单表必需列
pub const REQUIRED_ORDER_COLUMNS: [&str; 8] = [
    "prod_order",
    "machine",
    "mould",
    "order_qty",
    "processing_time",
    "net_processing_time_setup_&_processing",
    "order_value",
    "needed_on",
];

/// 机台表必需列
pub const REQUIRED_MACHINE_COLUMNS: [&str; 2] = ["machine", "estimated_availability"];

/// 列名标准化
pub fn normalize_column_name(name: &str) -> String {
    let normalized: String = name
        .trim()
        .to_lowercase()
        .replace(' ', "_")
        .chars()
        .filter(|c| !matches!(c, '.' | '(' | ')' | '\n' | '\r'))
        .collect();

    match normalized.as_str() {
        "weekly_hours__100%" | "weekly_hours_100%" => "weekly_hours".to_string(),
        _ => normalized,
    }
}

/// 标准化整行列名
pub fn normalize_row(row: RawRow) -> RawRow {
    row.into_iter()
        .map(|(k, v)| (normalize_column_name(&k), v))
        .collect()
}

pub struct FieldMapper {
    cleaner: DataCleaner,
}

impl FieldMapperTrait for FieldMapper {
    fn map_to_raw_order(&self, row: &RawRow, row_number: usize) -> ImportResult<RawOrderRecord> {
        Ok(RawOrderRecord {
            // 标识
            prod_order: self.get_string(row, "prod_order"),
            machine: self.get_id(row, "machine", row_number)?,
            mould: self.get_string(row, "mould"),

            // 数量与工时
            order_qty: self.parse_f64(row, "order_qty", row_number)?,
            processing_time: self.parse_f64(row, "processing_time", row_number)?,
            setup_and_processing_time: self.parse_f64(
                row,
                "net_processing_time_setup_&_processing",
                row_number,
            )?,
            gross_processing_time: self.parse_f64(row, "gross_processing_time", row_number)?,

            // 金额（欧式格式）
            order_value: self.parse_currency(row, "order_value", row_number)?,

            // 交期与优先级
            needed_on: self.parse_datetime(row, "needed_on"),
            priority: self.parse_rank(row, "priority", row_number)?,
            ref_sales_id: self.get_string(row, "ref_sales_id"),
            covering_demand_until: self.parse_datetime(row, "covering_demand_until"),

            row_number,
        })
    }

    fn map_to_raw_machine(&self, row: &RawRow, row_number: usize) -> ImportResult<RawMachineRecord> {
        Ok(RawMachineRecord {
            machine: self.get_id(row, "machine", row_number)?,
            weekly_hours: self.parse_f64(row, "weekly_hours", row_number)?,
            estimated_availability: self.parse_f64(row, "estimated_availability", row_number)?,
            row_number,
        })
    }
}

impl FieldMapper {
    pub fn new() -> Self {
        Self {
            cleaner: DataCleaner,
        }
    }

    fn get_string(&self, row: &RawRow, key: &str) -> Option<String> {
        self.cleaner.normalize_null(row.get(key).map(|v| v.as_str()))
    }

    /// 编号字段: Excel 数值单元格 "350.0" 归一为 "350"
    fn get_id(&self, row: &RawRow, key: &str, row_number: usize) -> ImportResult<Option<String>> {
        let value = match self.get_string(row, key) {
            Some(v) => v,
            None => return Ok(None),
        };
        match value.parse::<f64>() {
            Ok(n) if n.fract() == 0.0 && n.abs() < 1e15 => Ok(Some(format!("{}", n as i64))),
            Ok(n) if !n.is_finite() => Err(ImportError::TypeConversionError {
                row: row_number,
                field: key.to_string(),
                message: format!("无效编号: {}", value),
            }),
            _ => Ok(Some(value)),
        }
    }

    fn parse_f64(&self, row: &RawRow, key: &str, row_number: usize) -> ImportResult<Option<f64>> {
        match self.get_string(row, key) {
            None => Ok(None),
            Some(value) => self.cleaner.parse_decimal(&value).map(Some).ok_or_else(|| {
                ImportError::TypeConversionError {
                    row: row_number,
                    field: key.to_string(),
                    message: format!("无法解析为浮点数: {}", value),
                }
            }),
        }
    }

    fn parse_currency(&self, row: &RawRow, key: &str, row_number: usize) -> ImportResult<Option<f64>> {
        match self.get_string(row, key) {
            None => Ok(None),
            Some(value) => self
                .cleaner
                .parse_european_decimal(&value)
                .map(Some)
                .ok_or_else(|| ImportError::TypeConversionError {
                    row: row_number,
                    field: key.to_string(),
                    message: format!("无法解析为金额: {}", value),
                }),
        }
    }

    /// MRP 优先级: 非负整数
    fn parse_rank(&self, row: &RawRow, key: &str, row_number: usize) -> ImportResult<Option<u32>> {
        match self.parse_f64(row, key, row_number)? {
            None => Ok(None),
            Some(v) if v >= 0.0 && v.fract() == 0.0 && v <= u32::MAX as f64 => Ok(Some(v as u32)),
            Some(v) => Err(ImportError::TypeConversionError {
                row: row_number,
                field: key.to_string(),
                message: format!("优先级须为非负整数: {}", v),
            }),
        }
    }

    fn parse_datetime(&self, row: &RawRow, key: &str) -> Option<NaiveDateTime> {
        self.get_string(row, key)
            .and_then(|v| self.cleaner.parse_datetime(&v))
    }
}

impl Default for FieldMapper {
    fn default() -> Self {
        Self::new()
    }
}
