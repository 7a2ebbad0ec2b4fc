//! Rule engine
//!
//! Each rule declares the columns it needs. A rule whose columns are not all
//! present is skipped without producing a defect, so a dump that omits e.g.
//! `IsModified` is judged only on what it does export.

mod flags;
mod generic;
mod window;

pub use flags::{ConstantFlagCheck, FreshFlagCheck};
pub use generic::{find_id_column, IdColumnCheck, RowCountCheck, ID_COLUMNS};
pub use window::TimeWindowCheck;

use crate::config::{EtlMode, TimeWindow};
use crate::dataset::Dataset;
use crate::manifest::ManifestRow;
use crate::results::ValidationOutcome;

/// Everything a rule may look at
pub struct RuleContext<'a> {
    pub dataset: &'a Dataset,
    pub manifest: &'a ManifestRow,
    pub window: &'a TimeWindow,
}

/// A check over one raw dataset.
pub trait DumpRule: Send + Sync {
    /// Returns the name of the rule.
    fn name(&self) -> &'static str;
    /// Columns that must all exist for the rule to run.
    fn required_columns(&self) -> &[&'static str];
    /// Whether the rule runs against `dataset`.
    fn applies_to(&self, dataset: &Dataset) -> bool {
        self.required_columns()
            .iter()
            .all(|column| dataset.has_column(column))
    }
    /// Returns a defect message, or `None` when the dataset satisfies the rule.
    fn check(&self, ctx: &RuleContext<'_>) -> Option<String>;
}

/// Ordered rules for one ETL mode
pub struct RuleSet {
    rules: Vec<Box<dyn DumpRule>>,
}

impl RuleSet {
    pub fn for_mode(mode: EtlMode) -> Self {
        match mode {
            EtlMode::Delta => Self::daily(),
            EtlMode::Full => Self::full(),
        }
    }

    pub fn daily() -> Self {
        Self {
            rules: vec![
                Box::new(RowCountCheck),
                Box::new(IdColumnCheck),
                Box::new(FreshFlagCheck::is_created()),
                Box::new(FreshFlagCheck::is_modified()),
                Box::new(TimeWindowCheck),
            ],
        }
    }

    pub fn full() -> Self {
        Self {
            rules: vec![
                Box::new(RowCountCheck),
                Box::new(IdColumnCheck),
                Box::new(ConstantFlagCheck::is_created()),
                Box::new(ConstantFlagCheck::is_modified()),
            ],
        }
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.rules.iter().map(|r| r.name()).collect()
    }

    /// Names of the rules that would run against `dataset`
    pub fn applicable(&self, dataset: &Dataset) -> Vec<&'static str> {
        self.rules
            .iter()
            .filter(|r| r.applies_to(dataset))
            .map(|r| r.name())
            .collect()
    }

    /// Run every applicable rule. No rule short-circuits another.
    pub fn evaluate(&self, ctx: &RuleContext<'_>) -> ValidationOutcome {
        let mut outcome = ValidationOutcome::new();
        for rule in &self.rules {
            if !rule.applies_to(ctx.dataset) {
                tracing::trace!(rule = rule.name(), "rule skipped, columns absent");
                continue;
            }
            if let Some(message) = rule.check(ctx) {
                tracing::debug!(rule = rule.name(), %message, "defect");
                outcome.push(message);
            }
        }
        outcome
    }
}

/// Validate a raw dataset against its manifest row with the rules of `mode`.
pub fn evaluate(
    raw: &Dataset,
    manifest_row: &ManifestRow,
    mode: EtlMode,
    window: &TimeWindow,
) -> ValidationOutcome {
    let ctx = RuleContext {
        dataset: raw,
        manifest: manifest_row,
        window,
    };
    RuleSet::for_mode(mode).evaluate(&ctx)
}
