//! Reads an uploaded spreadsheet into a header plus numbered data rows.
//!
//! Workbooks (`.xlsx`, `.xlsm`, `.xls`, `.ods`) go through calamine and only the
//! first worksheet is read. CSV files go through the csv crate with the
//! delimiter sniffed from the header line.

use calamine::{open_workbook_auto_from_rs, Data, Reader};
use std::io::Cursor;
use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum SheetError {
    #[error("Invalid file type. Only .xlsx, .xls and .csv files are supported")]
    UnsupportedFileType,

    #[error("Excel file is empty")]
    Empty,

    #[error("Could not read spreadsheet: {0}")]
    Unreadable(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SheetFormat {
    Workbook,
    Csv,
}

impl SheetFormat {
    pub fn from_file_name(file_name: &str) -> Result<Self, SheetError> {
        let lower = file_name.trim().to_lowercase();
        if [".xlsx", ".xlsm", ".xls", ".ods"]
            .iter()
            .any(|ext| lower.ends_with(ext))
        {
            Ok(SheetFormat::Workbook)
        } else if lower.ends_with(".csv") {
            Ok(SheetFormat::Csv)
        } else {
            Err(SheetError::UnsupportedFileType)
        }
    }
}

/// One non-blank data row. `number` is the 1-based spreadsheet row (the header
/// is row 1 of a sheet that starts at the top).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetRow {
    pub number: usize,
    pub cells: Vec<Option<String>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sheet {
    pub headers: Vec<String>,
    pub rows: Vec<SheetRow>,
}

pub fn read_sheet(file_name: &str, bytes: Vec<u8>) -> Result<Sheet, SheetError> {
    let sheet = match SheetFormat::from_file_name(file_name)? {
        SheetFormat::Workbook => read_workbook(bytes)?,
        SheetFormat::Csv => read_csv(bytes)?,
    };
    if sheet.rows.is_empty() || sheet.headers.iter().all(String::is_empty) {
        return Err(SheetError::Empty);
    }
    Ok(sheet)
}

fn read_workbook(bytes: Vec<u8>) -> Result<Sheet, SheetError> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes))
        .map_err(|e| SheetError::Unreadable(e.to_string()))?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or(SheetError::Empty)?
        .map_err(|e| SheetError::Unreadable(e.to_string()))?;

    let first_row = range.start().map_or(0, |(row, _)| row as usize);
    let mut rows = range.rows().enumerate();
    let headers = match rows.next() {
        Some((_, cells)) => cells
            .iter()
            .map(|cell| cell_text(cell).unwrap_or_default())
            .collect(),
        None => return Err(SheetError::Empty),
    };

    let data = rows
        .map(|(offset, cells)| SheetRow {
            number: first_row + offset + 1,
            cells: cells.iter().map(cell_text).collect(),
        })
        .filter(|row| row.cells.iter().any(Option::is_some))
        .collect();

    Ok(Sheet {
        headers,
        rows: data,
    })
}

fn read_csv(bytes: Vec<u8>) -> Result<Sheet, SheetError> {
    let bytes = if bytes.starts_with(b"\xEF\xBB\xBF") {
        bytes[3..].to_vec()
    } else {
        bytes
    };
    let header_line = bytes
        .split(|&b| b == b'\n')
        .next()
        .map(|line| String::from_utf8_lossy(line).into_owned())
        .unwrap_or_default();
    let delimiter = detect_delimiter(&header_line);

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(false)
        .flexible(true)
        .from_reader(bytes.as_slice());

    let mut records = reader.records();
    let headers = match records.next() {
        Some(record) => record
            .map_err(|e| SheetError::Unreadable(e.to_string()))?
            .iter()
            .map(|cell| normalize_cell(cell).unwrap_or_default())
            .collect(),
        None => return Err(SheetError::Empty),
    };

    let mut rows = Vec::new();
    for (index, record) in records.enumerate() {
        let record = record.map_err(|e| SheetError::Unreadable(e.to_string()))?;
        let number = record
            .position()
            .map_or(index + 2, |pos| pos.line() as usize);
        let cells: Vec<Option<String>> = record.iter().map(normalize_cell).collect();
        if cells.iter().any(Option::is_some) {
            rows.push(SheetRow { number, cells });
        }
    }

    Ok(Sheet { headers, rows })
}

/// Picks the most frequent of `,` `;` tab `|` in the header line; Excel writes
/// `;` in locales where the comma is the decimal separator.
pub fn detect_delimiter(header_line: &str) -> u8 {
    [b',', b';', b'\t', b'|']
        .into_iter()
        .max_by_key(|&d| header_line.matches(d as char).count())
        .filter(|&d| header_line.contains(d as char))
        .unwrap_or(b',')
}

fn normalize_cell(cell: &str) -> Option<String> {
    let cleaned = cell.replace('\u{00A0}', " ");
    let trimmed = cleaned.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Text form of a workbook cell. Whole floats print without a fractional part
/// so numeric identifiers survive the round trip through Excel.
pub fn cell_text(cell: &Data) -> Option<String> {
    match cell {
        Data::Empty | Data::Error(_) => None,
        Data::String(text) => normalize_cell(text),
        Data::Int(value) => Some(value.to_string()),
        Data::Float(value) => Some(format_float(*value)),
        Data::Bool(value) => Some(value.to_string()),
        other => normalize_cell(&other.to_string()),
    }
}

fn format_float(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        value.to_string()
    }
}
