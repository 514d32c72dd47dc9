//! Dataset loading from spreadsheet workbooks or CSV exports.
//!
//! Workbooks carry two relations: the transaction sheet (required) and the
//! monthly-sales sheet (optional, passed through untouched). CSV files carry
//! the transaction relation only.

use crate::{
    config::InputConfig,
    dataset::{AuxiliaryTable, Dataset, RawAmount, RawTransaction, TRANSACTION_COLUMNS},
    error::{AnalysisError, AnalysisResult},
};
use calamine::{open_workbook_auto, Data, Range, Reader};
use std::path::Path;

/// Positions of the six transaction columns within a header row.
#[derive(Debug, Clone, Copy)]
struct ColumnMap {
    brand_name: usize,
    outlet_id: usize,
    outlet_name: usize,
    center: usize,
    phone_number: usize,
    amount: usize,
}

impl ColumnMap {
    fn locate<S: AsRef<str>>(relation: &str, headers: &[S]) -> AnalysisResult<Self> {
        let mut found = [0usize; 6];
        for (slot, column) in TRANSACTION_COLUMNS.iter().enumerate() {
            found[slot] = headers
                .iter()
                .position(|h| h.as_ref().trim() == *column)
                .ok_or_else(|| AnalysisError::MissingColumn {
                    relation: relation.to_string(),
                    column: column.to_string(),
                })?;
        }
        Ok(Self {
            brand_name: found[0],
            outlet_id: found[1],
            outlet_name: found[2],
            center: found[3],
            phone_number: found[4],
            amount: found[5],
        })
    }
}

/// Load a dataset, choosing the reader from the file extension.
pub fn load_dataset(path: &Path, input: &InputConfig) -> AnalysisResult<Dataset> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();

    let dataset = match extension.as_str() {
        "xlsx" | "xlsm" | "xls" | "ods" => load_workbook(path, input)?,
        "csv" => Dataset::from_transactions(load_csv_transactions(path)?),
        _ => {
            return Err(AnalysisError::UnsupportedInput {
                path: path.display().to_string(),
            })
        }
    };

    log::info!(
        "loaded {} transaction rows from {}",
        dataset.transactions.len(),
        path.display()
    );
    Ok(dataset)
}

fn load_workbook(path: &Path, input: &InputConfig) -> AnalysisResult<Dataset> {
    let mut workbook = open_workbook_auto(path)?;
    let sheet_names = workbook.sheet_names();

    if !sheet_names.iter().any(|n| n == &input.transaction_sheet) {
        return Err(AnalysisError::MissingSheet {
            name: input.transaction_sheet.clone(),
        });
    }
    let range = workbook.worksheet_range(&input.transaction_sheet)?;
    let transactions = transactions_from_range(&input.transaction_sheet, &range)?;

    let monthly_sales = if sheet_names.iter().any(|n| n == &input.monthly_sheet) {
        let range = workbook.worksheet_range(&input.monthly_sheet)?;
        let table = auxiliary_from_range(&input.monthly_sheet, &range);
        log::debug!("auxiliary relation '{}': {} rows", table.name, table.rows.len());
        Some(table)
    } else {
        log::warn!(
            "auxiliary relation '{}' not present in {}",
            input.monthly_sheet,
            path.display()
        );
        None
    };

    Ok(Dataset {
        transactions,
        monthly_sales,
    })
}

fn transactions_from_range(relation: &str, range: &Range<Data>) -> AnalysisResult<Vec<RawTransaction>> {
    let mut rows = range.rows();
    let headers: Vec<String> = rows
        .next()
        .map(|row| row.iter().map(cell_text).collect())
        .unwrap_or_default();
    let map = ColumnMap::locate(relation, &headers)?;

    let text = |row: &[Data], idx: usize| row.get(idx).map(cell_text).unwrap_or_default();

    Ok(rows
        .map(|row| RawTransaction {
            brand_name: text(row, map.brand_name),
            outlet_id: text(row, map.outlet_id),
            outlet_name: text(row, map.outlet_name),
            center: text(row, map.center),
            phone_number: text(row, map.phone_number),
            amount: row.get(map.amount).map(cell_amount).unwrap_or(RawAmount::Missing),
        })
        .collect())
}

fn auxiliary_from_range(name: &str, range: &Range<Data>) -> AuxiliaryTable {
    let mut rows = range.rows();
    let headers = rows
        .next()
        .map(|row| row.iter().map(cell_text).collect())
        .unwrap_or_default();
    AuxiliaryTable {
        name: name.to_string(),
        headers,
        rows: rows.map(|row| row.iter().map(cell_text).collect()).collect(),
    }
}

/// Read the transaction relation from a CSV file with a header row.
pub fn load_csv_transactions(path: &Path) -> AnalysisResult<Vec<RawTransaction>> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::Headers)
        .flexible(true)
        .from_path(path)?;
    let headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
    let map = ColumnMap::locate(&path.display().to_string(), &headers)?;

    let mut transactions = Vec::new();
    for record in reader.records() {
        let record = record?;
        let text = |idx: usize| record.get(idx).unwrap_or_default().to_string();
        let amount = match record.get(map.amount) {
            Some(s) if !s.trim().is_empty() => RawAmount::Text(s.to_string()),
            _ => RawAmount::Missing,
        };
        transactions.push(RawTransaction {
            brand_name: text(map.brand_name),
            outlet_id: text(map.outlet_id),
            outlet_name: text(map.outlet_name),
            center: text(map.center),
            phone_number: text(map.phone_number),
            amount,
        });
    }
    Ok(transactions)
}

/// Render a cell as text. Integral floats drop their trailing `.0` so that
/// identifiers stored as numbers compare equal to their textual form.
pub fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        Data::Int(i) => i.to_string(),
        Data::Float(f) if f.fract() == 0.0 && f.abs() < 1e15 => format!("{}", *f as i64),
        other => other.to_string(),
    }
}

pub fn cell_amount(cell: &Data) -> RawAmount {
    match cell {
        Data::Float(f) => RawAmount::Number(*f),
        Data::Int(i) => RawAmount::Number(*i as f64),
        Data::String(s) => RawAmount::Text(s.clone()),
        _ => RawAmount::Missing,
    }
}
