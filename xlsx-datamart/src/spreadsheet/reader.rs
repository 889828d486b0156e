//! Read one sheet of an xlsx workbook into a [`SourceTable`]
//!
//! The first row of the sheet's used range is the header row. Blank headers
//! become `Unnamed: <position>` and repeated headers get `.1`, `.2`, ...
//! suffixes, so every column ends up with a distinct name.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use calamine::{Data, DataType, Reader, Xlsx, open_workbook};

use super::table::{CellValue, Row, SourceTable};
use crate::error::ReadError;

/// Path of a workbook given its base name (no extension)
pub fn workbook_path(input_dir: &Path, name: &str) -> PathBuf {
    input_dir.join(format!("{}.xlsx", name))
}

/// Read `sheet_name` from `<input_dir>/<xlsx>.xlsx`, keyed by the `index` column
pub fn read_xlsx(
    input_dir: &Path,
    xlsx: &str,
    sheet_name: &str,
    index: &str,
) -> Result<SourceTable, ReadError> {
    let path = workbook_path(input_dir, xlsx);
    if !path.is_file() {
        return Err(ReadError::FileNotFound { path });
    }

    let mut workbook: Xlsx<_> = open_workbook(&path).map_err(|source| ReadError::Workbook {
        path: path.clone(),
        source,
    })?;

    let available = workbook.sheet_names();
    if !available.iter().any(|s| s == sheet_name) {
        return Err(ReadError::SheetNotFound {
            sheet: sheet_name.to_string(),
            available,
        });
    }

    let range = workbook
        .worksheet_range(sheet_name)
        .map_err(|source| ReadError::Workbook {
            path: path.clone(),
            source,
        })?;

    let mut rows = range.rows();
    let column_not_found = || ReadError::ColumnNotFound {
        column: index.to_string(),
        sheet: sheet_name.to_string(),
    };

    let headers = rows.next().map(header_names).ok_or_else(column_not_found)?;
    let index_pos = headers
        .iter()
        .position(|h| h == index)
        .ok_or_else(column_not_found)?;

    let columns: Vec<String> = headers
        .iter()
        .enumerate()
        .filter(|(i, _)| *i != index_pos)
        .map(|(_, h)| h.clone())
        .collect();

    let mut table_rows = Vec::new();
    for row in rows {
        // Skip empty rows
        if row.iter().all(|c| cell_to_value(c) == CellValue::Empty) {
            continue;
        }

        let mut index_value = CellValue::Empty;
        let mut cells = Vec::with_capacity(columns.len());
        for col in 0..headers.len() {
            let value = row.get(col).map(cell_to_value).unwrap_or(CellValue::Empty);
            if col == index_pos {
                index_value = value;
            } else {
                cells.push(value);
            }
        }

        table_rows.push(Row {
            index: index_value,
            cells,
        });
    }

    log::debug!(
        "Read {} rows and {} columns from {}[{}]",
        table_rows.len(),
        columns.len() + 1,
        path.display(),
        sheet_name
    );

    Ok(SourceTable {
        index_column: index.to_string(),
        columns,
        rows: table_rows,
    })
}

/// Build distinct column names from the header row
fn header_names(row: &[Data]) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut names = Vec::with_capacity(row.len());

    for (i, cell) in row.iter().enumerate() {
        let raw = match cell {
            Data::Empty => String::new(),
            Data::String(s) => s.clone(),
            other => other.to_string(),
        };
        let base = if raw.is_empty() {
            format!("Unnamed: {}", i)
        } else {
            raw
        };

        let mut name = base.clone();
        let mut suffix = 1;
        while seen.contains(&name) {
            name = format!("{}.{}", base, suffix);
            suffix += 1;
        }

        seen.insert(name.clone());
        names.push(name);
    }

    names
}

/// Convert a calamine cell into a [`CellValue`]
fn cell_to_value(cell: &Data) -> CellValue {
    match cell {
        Data::Empty => CellValue::Empty,
        Data::String(s) if s.is_empty() => CellValue::Empty,
        Data::String(s) => CellValue::Text(s.clone()),
        Data::Int(i) => CellValue::Int(*i),
        Data::Float(f) => CellValue::Float(*f),
        Data::Bool(b) => CellValue::Bool(*b),
        Data::DateTime(_) | Data::DateTimeIso(_) => match cell.as_datetime() {
            Some(dt) => CellValue::DateTime(dt),
            None => CellValue::Text(cell.to_string()),
        },
        Data::DurationIso(s) => CellValue::Text(s.clone()),
        Data::Error(_) => CellValue::Empty,
    }
}
