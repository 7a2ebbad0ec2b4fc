use std::fmt::Write as _;
use std::io::{Read, Seek};
use std::path::Path;
use std::sync::Arc;

use arrow::datatypes::{Field, Schema};
use arrow::util::display::array_value_to_string;
use arrow_array::{
    Array, ArrayRef, RecordBatch, RecordBatchOptions, StringArray, TimestampMicrosecondArray,
};

use crate::errors::LoadError;
use crate::readers::{read_csv_file, read_csv_table, DEFAULT_BATCH_SIZE};
use crate::utils::date_parser::parse_timestamp_column;

/// Columns converted to UTC timestamps on load
pub const DATE_COLUMNS: [&str; 2] = ["DateCreated", "DateModified"];

/// A single cell as seen by row comparison
#[derive(Debug, Clone, PartialEq)]
enum Cell<'a> {
    Null,
    Text(&'a str),
    Instant(i64),
    Other(String),
}

impl Cell<'_> {
    fn matches(&self, other: &Cell<'_>) -> bool {
        match (self, other) {
            (Cell::Null, Cell::Null) => true,
            (Cell::Text(a), Cell::Text(b)) => a == b || numeric_eq(a, b),
            (Cell::Instant(a), Cell::Instant(b)) => a == b,
            (Cell::Other(a), Cell::Other(b)) => a == b || numeric_eq(a, b),
            _ => false,
        }
    }

    fn as_number(&self) -> Option<f64> {
        match self {
            Cell::Text(s) => s.trim().parse::<f64>().ok(),
            Cell::Other(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        }
    }
}

/// Two texts that both read as the same number are the same value ("1" and "1.0").
fn numeric_eq(a: &str, b: &str) -> bool {
    match (a.trim().parse::<f64>(), b.trim().parse::<f64>()) {
        (Ok(x), Ok(y)) => x == y,
        _ => false,
    }
}

/// An exported table held in memory as one Arrow batch.
///
/// All columns are text except the [`DATE_COLUMNS`], which are parsed into
/// UTC microsecond timestamps.
#[derive(Debug, Clone)]
pub struct Dataset {
    batch: RecordBatch,
}

impl Dataset {
    /// Wrap a text-typed batch, parsing the date columns it contains.
    pub fn from_batch(batch: RecordBatch) -> Result<Self, LoadError> {
        let schema = batch.schema();
        let mut fields = Vec::with_capacity(schema.fields().len());
        let mut columns: Vec<ArrayRef> = Vec::with_capacity(batch.num_columns());

        for (field, column) in schema.fields().iter().zip(batch.columns()) {
            let text = column.as_any().downcast_ref::<StringArray>();
            match text {
                Some(array) if DATE_COLUMNS.contains(&field.name().as_str()) => {
                    let parsed = parse_timestamp_column(field.name(), array)?;
                    fields.push(Field::new(field.name(), parsed.data_type().clone(), true));
                    columns.push(Arc::new(parsed));
                }
                _ => {
                    fields.push(field.as_ref().clone());
                    columns.push(Arc::clone(column));
                }
            }
        }

        let options = RecordBatchOptions::new().with_row_count(Some(batch.num_rows()));
        let batch = RecordBatch::try_new_with_options(Arc::new(Schema::new(fields)), columns, &options)?;
        Ok(Self { batch })
    }

    pub fn from_reader<R: Read + Seek>(reader: R) -> Result<Self, LoadError> {
        Self::from_batch(read_csv_table(reader, DEFAULT_BATCH_SIZE)?)
    }

    pub fn load(path: &Path) -> Result<Self, LoadError> {
        Self::from_batch(read_csv_file(path)?)
    }

    pub fn batch(&self) -> &RecordBatch {
        &self.batch
    }

    pub fn num_rows(&self) -> usize {
        self.batch.num_rows()
    }

    pub fn is_empty(&self) -> bool {
        self.batch.num_rows() == 0
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.batch
            .schema_ref()
            .fields()
            .iter()
            .map(|f| f.name().as_str())
            .collect()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.batch.schema_ref().column_with_name(name).is_some()
    }

    /// Parsed timestamps of a date column, `None` if the column is absent.
    pub fn timestamps(&self, name: &str) -> Option<&TimestampMicrosecondArray> {
        self.batch
            .column_by_name(name)?
            .as_any()
            .downcast_ref::<TimestampMicrosecondArray>()
    }

    /// Numeric reading of a flag column, `None` if the column is absent.
    ///
    /// Blank and non-numeric cells read as `None`.
    pub fn flags(&self, name: &str) -> Option<Vec<Option<f64>>> {
        let (idx, _) = self.batch.schema_ref().column_with_name(name)?;
        Some(
            (0..self.num_rows())
                .map(|row| self.cell(idx, row).as_number())
                .collect(),
        )
    }

    fn cell(&self, col: usize, row: usize) -> Cell<'_> {
        let array = self.batch.column(col);
        if array.is_null(row) {
            return Cell::Null;
        }
        if let Some(text) = array.as_any().downcast_ref::<StringArray>() {
            return Cell::Text(text.value(row));
        }
        if let Some(ts) = array.as_any().downcast_ref::<TimestampMicrosecondArray>() {
            return Cell::Instant(ts.value(row));
        }
        match array_value_to_string(array, row) {
            Ok(s) => Cell::Other(s),
            Err(_) => Cell::Null,
        }
    }

    /// Field-for-field equality between one of our rows and a row of `other`.
    ///
    /// Both datasets must expose the same column names in the same order.
    pub fn row_eq(&self, row: usize, other: &Dataset, other_row: usize) -> bool {
        if row >= self.num_rows() || other_row >= other.num_rows() {
            return false;
        }
        if self.column_names() != other.column_names() {
            return false;
        }
        (0..self.batch.num_columns())
            .all(|col| self.cell(col, row).matches(&other.cell(col, other_row)))
    }

    /// `Column=value` pairs for one row, used in debug output.
    pub fn render_row(&self, row: usize) -> String {
        let mut out = String::new();
        if row >= self.num_rows() {
            return out;
        }
        for (col, name) in self.column_names().iter().enumerate() {
            if col > 0 {
                out.push_str(", ");
            }
            let value = array_value_to_string(self.batch.column(col), row)
                .unwrap_or_else(|_| "?".to_string());
            let _ = write!(out, "{}={}", name, value);
        }
        out
    }
}
