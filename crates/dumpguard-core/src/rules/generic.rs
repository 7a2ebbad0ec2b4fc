use super::{DumpRule, RuleContext};
use crate::dataset::Dataset;

/// Recognised identifier columns, most preferred first
pub const ID_COLUMNS: [&str; 4] = ["ID", "Id", "DataID", "ProductOptionDataID"];

/// The identifier column a dataset would be keyed on, if any.
pub fn find_id_column(dataset: &Dataset) -> Option<&'static str> {
    ID_COLUMNS.into_iter().find(|c| dataset.has_column(c))
}

/// Raw row count must equal the manifest's declared count
pub struct RowCountCheck;

impl DumpRule for RowCountCheck {
    fn name(&self) -> &'static str {
        "RowCount"
    }

    fn required_columns(&self) -> &[&'static str] {
        &[]
    }

    fn check(&self, ctx: &RuleContext<'_>) -> Option<String> {
        let actual = ctx.dataset.num_rows() as u64;
        let expected = ctx.manifest.row_count;
        (actual != expected)
            .then(|| format!("Row count mismatch: expected {}, got {}", expected, actual))
    }
}

pub struct IdColumnCheck;

impl DumpRule for IdColumnCheck {
    fn name(&self) -> &'static str {
        "IdColumn"
    }

    fn required_columns(&self) -> &[&'static str] {
        &[]
    }

    fn check(&self, ctx: &RuleContext<'_>) -> Option<String> {
        match find_id_column(ctx.dataset) {
            Some(column) => {
                tracing::trace!(column, "identifier column");
                None
            }
            None => Some("No valid ID column found".to_string()),
        }
    }
}
