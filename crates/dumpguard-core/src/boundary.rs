//! Boundary comparator
//!
//! A validation file samples its raw file's boundary rows. Exporters write it
//! last row first, so only the crossed pairing is accepted: validation row 0
//! against the raw last row, validation row 1 against the raw first row.

use crate::dataset::Dataset;
use crate::results::BoundaryOutcome;

pub const EMPTY_VALIDATION: &str = "Validation file is empty, no changes made";
pub const SINGLE_ROW_PASSED: &str = "Validation check passed";
pub const SINGLE_ROW_MISMATCH: &str = "Validation and raw row mismatch";
pub const BOUNDARY_PASSED: &str = "Validation file check passed";
pub const BOUNDARY_MISMATCH: &str =
    "First and/or last rows don't match between raw and validation files";

/// Compare the raw dataset with its validation sample.
pub fn compare(raw: &Dataset, validation: &Dataset) -> BoundaryOutcome {
    if validation.is_empty() {
        return BoundaryOutcome::passed(EMPTY_VALIDATION);
    }

    let sampled = validation.num_rows();

    if raw.num_rows() == 1 && sampled == 1 {
        return if raw.row_eq(0, validation, 0) {
            BoundaryOutcome::passed(SINGLE_ROW_PASSED)
        } else {
            log_mismatch("Single row", raw, 0, validation, 0);
            BoundaryOutcome::failed(SINGLE_ROW_MISMATCH)
        };
    }

    if sampled != 2 {
        return BoundaryOutcome::failed(format!(
            "Validation file should contain exactly 2 data rows (first and last), found {} rows",
            sampled
        ));
    }

    // An empty raw file has no boundary rows to match
    let Some(last) = raw.num_rows().checked_sub(1) else {
        return BoundaryOutcome::failed(BOUNDARY_MISMATCH);
    };

    // Either crossed match is accepted on its own
    let first_row_match = raw.row_eq(0, validation, 1);
    let last_row_match = raw.row_eq(last, validation, 0);

    if first_row_match || last_row_match {
        return BoundaryOutcome::passed(BOUNDARY_PASSED);
    }

    log_mismatch("First row", raw, 0, validation, 1);
    log_mismatch("Last row", raw, last, validation, 0);
    BoundaryOutcome::failed(BOUNDARY_MISMATCH)
}

fn log_mismatch(label: &str, raw: &Dataset, raw_row: usize, validation: &Dataset, val_row: usize) {
    tracing::debug!(
        raw = %raw.render_row(raw_row),
        validation = %validation.render_row(val_row),
        "{} mismatch",
        label
    );
}
