//! CSV reader
//!
//! Every column is decoded as nullable UTF-8 text. Typing (timestamps, flags)
//! happens afterwards on the columns that need it, so a single odd value never
//! fails a whole file at decode time.
//!
//! Empty cells and the usual export placeholders (`NULL`, `NA`, `NaN`, `None`, ...)
//! decode as nulls. Rows shorter than the header are padded with nulls.

use arrow::compute::concat_batches;
use arrow::csv::reader::Format;
use arrow::csv::ReaderBuilder as CsvReaderBuilder;
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use regex::Regex;
use std::fs::File;
use std::io::{Read, Seek, SeekFrom};
use std::path::Path;
use std::sync::Arc;

use crate::errors::LoadError;

/// Rows decoded per Arrow batch before concatenation
pub const DEFAULT_BATCH_SIZE: usize = 8 * 1024;

/// Cells matching this pattern are read as null. The empty string is included.
pub const NULL_PATTERN: &str = r"^(|#N/A|#N/A N/A|#NA|-1\.#IND|-1\.#QNAN|-NaN|-nan|1\.#IND|1\.#QNAN|<NA>|N/A|NA|NULL|NaN|None|n/a|nan|null)$";

/// Generate a UTF-8 schema from the CSV header
fn csv_generate_schema<R: Read + Seek>(reader: &mut R) -> Result<Schema, LoadError> {
    if reader.seek(SeekFrom::End(0))? == 0 {
        return Err(LoadError::EmptyFile);
    }
    reader.seek(SeekFrom::Start(0))?;
    let (inferred, _) = Format::default()
        .with_header(true)
        .infer_schema(reader, Some(0))?;
    if inferred.fields().is_empty() {
        return Err(LoadError::EmptyFile);
    }
    let fields: Vec<Field> = inferred
        .fields()
        .iter()
        .map(|f| Field::new(f.name().trim(), DataType::Utf8, true))
        .collect();
    Ok(Schema::new(fields))
}

/// Read a whole CSV source into a single text-typed batch.
///
/// A file with a header and no data rows yields an empty batch that still
/// carries the header's columns.
pub fn read_csv_table<R: Read + Seek>(
    mut reader: R,
    batch_size: usize,
) -> Result<RecordBatch, LoadError> {
    let schema = Arc::new(csv_generate_schema(&mut reader)?);
    reader.seek(SeekFrom::Start(0))?;

    let csv = CsvReaderBuilder::new(schema.clone())
        .with_header(true)
        .with_batch_size(batch_size)
        .with_null_regex(Regex::new(NULL_PATTERN)?)
        .with_truncated_rows(true)
        .build(reader)?;

    let batches = csv.collect::<Result<Vec<RecordBatch>, _>>()?;
    Ok(concat_batches(&schema, &batches)?)
}

pub fn read_csv_file(path: &Path) -> Result<RecordBatch, LoadError> {
    let file = File::open(path)?;
    read_csv_table(file, DEFAULT_BATCH_SIZE)
}
