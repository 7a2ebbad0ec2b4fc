use std::fs::File;
use std::io::{Read, Seek};
use std::path::Path;

use arrow_array::{Array, RecordBatch, StringArray};
use chrono::{DateTime, Utc};

use crate::errors::LoadError;
use crate::readers::{read_csv_table, DEFAULT_BATCH_SIZE};
use crate::utils::date_parser::parse_timestamp;

pub const REQUIRED_HEADERS: [&str; 4] = ["table_name", "row_count", "time_start", "time_end"];

/// Expected shape of one exported table
#[derive(Debug, Clone, PartialEq)]
pub struct ManifestRow {
    pub table_name: String,
    pub row_count: u64,
    pub time_start: DateTime<Utc>,
    pub time_end: DateTime<Utc>,
}

impl ManifestRow {
    pub fn new(
        table_name: impl Into<String>,
        row_count: u64,
        time_start: DateTime<Utc>,
        time_end: DateTime<Utc>,
    ) -> Self {
        Self {
            table_name: table_name.into(),
            row_count,
            time_start,
            time_end,
        }
    }
}

/// One manifest line. A line that fails to parse only faults its own table.
#[derive(Debug)]
pub struct ManifestEntry {
    pub table_name: String,
    pub row: Result<ManifestRow, LoadError>,
}

/// Names of the required headers absent from `columns`, in declaration order.
pub fn missing_manifest_headers(columns: &[&str]) -> Vec<String> {
    REQUIRED_HEADERS
        .iter()
        .filter(|h| !columns.contains(*h))
        .map(|h| h.to_string())
        .collect()
}

pub fn read_manifest(path: &Path) -> Result<Vec<ManifestEntry>, LoadError> {
    read_manifest_from(File::open(path)?)
}

pub fn read_manifest_from<R: Read + Seek>(reader: R) -> Result<Vec<ManifestEntry>, LoadError> {
    let batch = read_csv_table(reader, DEFAULT_BATCH_SIZE)?;
    let schema = batch.schema();
    let columns: Vec<&str> = schema.fields().iter().map(|f| f.name().as_str()).collect();
    let missing = missing_manifest_headers(&columns);
    if !missing.is_empty() {
        return Err(LoadError::MissingHeaders(missing));
    }

    let names = text_column(&batch, "table_name")?;
    let counts = text_column(&batch, "row_count")?;
    let starts = text_column(&batch, "time_start")?;
    let ends = text_column(&batch, "time_end")?;

    let entries = (0..batch.num_rows())
        .map(|i| {
            let table_name = cell(names, i).unwrap_or_default().to_string();
            let row = parse_row(&table_name, cell(counts, i), cell(starts, i), cell(ends, i));
            let table_name = if table_name.is_empty() {
                format!("<manifest row {}>", i + 1)
            } else {
                table_name
            };
            ManifestEntry { table_name, row }
        })
        .collect();
    Ok(entries)
}

fn text_column<'a>(batch: &'a RecordBatch, name: &str) -> Result<&'a StringArray, LoadError> {
    batch
        .column_by_name(name)
        .and_then(|c| c.as_any().downcast_ref::<StringArray>())
        .ok_or_else(|| LoadError::MissingHeaders(vec![name.to_string()]))
}

fn cell(array: &StringArray, row: usize) -> Option<&str> {
    if array.is_null(row) {
        None
    } else {
        Some(array.value(row))
    }
}

fn field_error(field: &str, value: Option<&str>) -> LoadError {
    LoadError::ManifestField {
        field: field.to_string(),
        value: value.unwrap_or_default().to_string(),
    }
}

fn parse_row(
    table_name: &str,
    row_count: Option<&str>,
    time_start: Option<&str>,
    time_end: Option<&str>,
) -> Result<ManifestRow, LoadError> {
    if table_name.is_empty() {
        return Err(field_error("table_name", None));
    }
    let count = row_count
        .and_then(parse_row_count)
        .ok_or_else(|| field_error("row_count", row_count))?;
    let start = time_start
        .and_then(parse_timestamp)
        .ok_or_else(|| field_error("time_start", time_start))?;
    let end = time_end
        .and_then(parse_timestamp)
        .ok_or_else(|| field_error("time_end", time_end))?;
    Ok(ManifestRow::new(table_name, count, start, end))
}

/// Accepts `12` as well as an integral decimal such as `12.0`.
fn parse_row_count(value: &str) -> Option<u64> {
    let value = value.trim();
    value.parse::<u64>().ok().or_else(|| {
        value
            .parse::<f64>()
            .ok()
            .filter(|f| f.is_finite() && *f >= 0.0 && f.fract() == 0.0)
            .map(|f| f as u64)
    })
}
