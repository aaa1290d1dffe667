// ==========================================
// 注塑排产系统 - 数据清洗器实现
// ==========================================
// 职责: NULL 标准化 / 欧式金额解析 / 日期解析
// 日期无法解析时记为缺失,不报错
// ==========================================

use crate::importer::order_importer_trait::DataCleaner as DataCleanerTrait;
use chrono::{Duration, NaiveDate, NaiveDateTime};

/// Excel 序列号起点 (1899-12-30)
const EXCEL_EPOCH: (i32, u32, u32) = (1899, 12, 30);

/// Excel 序列号合理范围 (1900-01-01 ~ 9999-12-31)
const EXCEL_SERIAL_RANGE: (f64, f64) = (1.0, 2_958_465.0);

const NULL_TOKENS: [&str; 5] = ["nan", "nat", "null", "none", "#n/a"];

const DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M:%S",
    "%d.%m.%Y %H:%M",
];

const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%d.%m.%Y", "%Y/%m/%d"];

pub struct DataCleaner;

impl DataCleanerTrait for DataCleaner {
    fn normalize_null(&self, value: Option<&str>) -> Option<String> {
        value.and_then(|v| {
            let trimmed = v.trim();
            if trimmed.is_empty() || NULL_TOKENS.contains(&trimmed.to_lowercase().as_str()) {
                None
            } else {
                Some(trimmed.to_string())
            }
        })
    }

    fn parse_european_decimal(&self, value: &str) -> Option<f64> {
        let trimmed = value.trim();
        let normalized = if trimmed.contains(',') {
            // "1.234,56": 点为千分位,逗号为小数点
            trimmed.replace('.', "").replace(',', ".")
        } else if is_thousands_grouped(trimmed) {
            // "1.234" / "1.234.567": 仅有千分位
            trimmed.replace('.', "")
        } else {
            // 数值单元格 ("1234.5")
            trimmed.to_string()
        };
        normalized.parse::<f64>().ok().filter(|v| v.is_finite())
    }

    fn parse_decimal(&self, value: &str) -> Option<f64> {
        let trimmed = value.trim();
        trimmed
            .parse::<f64>()
            .or_else(|_| trimmed.replace(',', ".").parse::<f64>())
            .ok()
            .filter(|v| v.is_finite())
    }

    fn parse_datetime(&self, value: &str) -> Option<NaiveDateTime> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return None;
        }

        // 纯数字: YYYYMMDD 或 Excel 序列号
        if trimmed.len() == 8 && trimmed.chars().all(|c| c.is_ascii_digit()) {
            return parse_compact_date(trimmed);
        }
        if let Ok(serial) = trimmed.parse::<f64>() {
            return excel_serial_to_datetime(serial);
        }

        for fmt in DATETIME_FORMATS {
            if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, fmt) {
                return Some(dt);
            }
        }
        for fmt in DATE_FORMATS {
            if let Ok(d) = NaiveDate::parse_from_str(trimmed, fmt) {
                return d.and_hms_opt(0, 0, 0);
            }
        }
        None
    }
}

/// YYYYMMDD
fn parse_compact_date(value: &str) -> Option<NaiveDateTime> {
    let year = value.get(0..4)?.parse::<i32>().ok()?;
    let month = value.get(4..6)?.parse::<u32>().ok()?;
    let day = value.get(6..8)?.parse::<u32>().ok()?;
    NaiveDate::from_ymd_opt(year, month, day)?.and_hms_opt(0, 0, 0)
}

/// 点号分组是否形如千分位 (每组 3 位)
fn is_thousands_grouped(value: &str) -> bool {
    let digits = value.trim_start_matches('-');
    let mut groups = digits.split('.');
    let head = match groups.next() {
        Some(h) if !h.is_empty() && h.len() <= 3 && h.chars().all(|c| c.is_ascii_digit()) => h,
        _ => return false,
    };
    let tail: Vec<&str> = groups.collect();
    !head.is_empty()
        && !tail.is_empty()
        && tail
            .iter()
            .all(|g| g.len() == 3 && g.chars().all(|c| c.is_ascii_digit()))
}

/// Excel 序列号 → 日期时间
pub fn excel_serial_to_datetime(serial: f64) -> Option<NaiveDateTime> {
    if !serial.is_finite() || serial < EXCEL_SERIAL_RANGE.0 || serial > EXCEL_SERIAL_RANGE.1 {
        return None;
    }
    let epoch = NaiveDate::from_ymd_opt(EXCEL_EPOCH.0, EXCEL_EPOCH.1, EXCEL_EPOCH.2)?
        .and_hms_opt(0, 0, 0)?;
    let seconds = (serial * 86_400.0).round() as i64;
    epoch.checked_add_signed(Duration::seconds(seconds))
}
