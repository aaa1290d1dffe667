// ==========================================
// 注塑排产系统 - 文件解析器实现
// ==========================================
// 输入: 订单 / 机台数据文件 (.csv, .xlsx, .xls)
// 输出: 以原始表头为键的行 (未标准化,未清洗)
// ==========================================

use crate::importer::error::{ImportError, ImportResult};
use crate::importer::order_importer_trait::{FileParser, RawRow};
use calamine::{open_workbook_auto, Reader};
use csv::ReaderBuilder;
use std::fs::File;
use std::path::Path;

fn file_extension(path: &Path) -> String {
    path.extension()
        .and_then(|e| e.to_str())
        .map(str::to_lowercase)
        .unwrap_or_default()
}

/// 存在性 + 扩展名检查
fn check_source(path: &Path, accepted: &[&str]) -> ImportResult<()> {
    if !path.exists() {
        return Err(ImportError::FileNotFound(path.display().to_string()));
    }
    let ext = file_extension(path);
    if accepted.contains(&ext.as_str()) {
        Ok(())
    } else {
        Err(ImportError::UnsupportedFormat(ext))
    }
}

/// 表头与单元格按列对齐;整行为空时返回 None
fn zip_row<I>(headers: &[String], cells: I) -> Option<RawRow>
where
    I: IntoIterator<Item = String>,
{
    let row: RawRow = headers
        .iter()
        .cloned()
        .zip(cells.into_iter().map(|c| c.trim().to_string()))
        .collect();

    if row.values().all(|v| v.is_empty()) {
        None
    } else {
        Some(row)
    }
}

// ==========================================
// CsvParser
// ==========================================
pub struct CsvParser;

impl FileParser for CsvParser {
    fn parse_to_raw_records(&self, file_path: &Path, _sheet_index: usize) -> ImportResult<Vec<RawRow>> {
        check_source(file_path, &["csv"])?;

        // 导出的订单表常见尾列缺失
        let mut reader = ReaderBuilder::new()
            .flexible(true)
            .from_reader(File::open(file_path)?);

        let headers: Vec<String> = reader.headers()?.iter().map(|h| h.trim().to_string()).collect();

        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record?;
            if let Some(row) = zip_row(&headers, record.iter().map(String::from)) {
                rows.push(row);
            }
        }
        Ok(rows)
    }
}

// ==========================================
// ExcelParser
// ==========================================
// 日期单元格按序列号输出,由 DataCleaner 统一换算
pub struct ExcelParser;

impl ExcelParser {
    /// 工作表名称列表
    pub fn sheet_names(&self, file_path: &Path) -> ImportResult<Vec<String>> {
        check_source(file_path, &["xlsx", "xls"])?;
        Ok(open_workbook_auto(file_path)?.sheet_names().to_vec())
    }
}

impl FileParser for ExcelParser {
    fn parse_to_raw_records(&self, file_path: &Path, sheet_index: usize) -> ImportResult<Vec<RawRow>> {
        check_source(file_path, &["xlsx", "xls"])?;

        let mut workbook = open_workbook_auto(file_path)?;
        let names = workbook.sheet_names().to_vec();
        let sheet = names.get(sheet_index).cloned().ok_or(ImportError::SheetNotFound {
            index: sheet_index + 1,
            available: names.len(),
        })?;

        let range = workbook.worksheet_range(&sheet)?;
        let mut cells = range.rows();

        let headers: Vec<String> = match cells.next() {
            Some(first) => first.iter().map(|c| c.to_string().trim().to_string()).collect(),
            None => {
                return Err(ImportError::ExcelParseError(format!(
                    "工作表 {} 无表头",
                    sheet
                )))
            }
        };

        Ok(cells
            .filter_map(|line| zip_row(&headers, line.iter().map(|c| c.to_string())))
            .collect())
    }
}

// ==========================================
// UniversalFileParser - 按扩展名分派
// ==========================================
pub struct UniversalFileParser;

impl UniversalFileParser {
    pub fn parse<P: AsRef<Path>>(&self, file_path: P, sheet_index: usize) -> ImportResult<Vec<RawRow>> {
        let path = file_path.as_ref();
        match file_extension(path).as_str() {
            "csv" => CsvParser.parse_to_raw_records(path, sheet_index),
            "xlsx" | "xls" => ExcelParser.parse_to_raw_records(path, sheet_index),
            other => Err(ImportError::UnsupportedFormat(other.to_string())),
        }
    }
}
