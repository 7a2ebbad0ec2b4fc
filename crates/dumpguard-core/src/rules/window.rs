use super::{DumpRule, RuleContext};

/// Daily rule: each record was created or modified inside `[start, end)`.
pub struct TimeWindowCheck;

impl DumpRule for TimeWindowCheck {
    fn name(&self) -> &'static str {
        "TimeWindow"
    }

    fn required_columns(&self) -> &[&'static str] {
        &["DateCreated", "DateModified"]
    }

    fn check(&self, ctx: &RuleContext<'_>) -> Option<String> {
        let created = ctx.dataset.timestamps("DateCreated")?;
        let modified = ctx.dataset.timestamps("DateModified")?;
        let inside = |ts: Option<i64>| ts.is_some_and(|micros| ctx.window.contains_micros(micros));

        let outside = created
            .iter()
            .zip(modified.iter())
            .filter(|(c, m)| !(inside(*c) || inside(*m)))
            .count();

        (outside > 0).then(|| format!("Found {} records outside time window", outside))
    }
}
