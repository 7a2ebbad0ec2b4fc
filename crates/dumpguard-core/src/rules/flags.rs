use super::{DumpRule, RuleContext};

/// Daily rule: a record dated at or after the window start must carry the flag.
pub struct FreshFlagCheck {
    name: &'static str,
    columns: [&'static str; 2],
}

impl FreshFlagCheck {
    /// `DateCreated >= start` ⇒ `IsCreated == 1`
    pub fn is_created() -> Self {
        Self {
            name: "IsCreatedFresh",
            columns: ["IsCreated", "DateCreated"],
        }
    }

    /// `DateModified >= start` ⇒ `IsModified == 1`
    pub fn is_modified() -> Self {
        Self {
            name: "IsModifiedFresh",
            columns: ["IsModified", "DateModified"],
        }
    }

    fn flag(&self) -> &'static str {
        self.columns[0]
    }

    fn date(&self) -> &'static str {
        self.columns[1]
    }
}

impl DumpRule for FreshFlagCheck {
    fn name(&self) -> &'static str {
        self.name
    }

    fn required_columns(&self) -> &[&'static str] {
        &self.columns
    }

    fn check(&self, ctx: &RuleContext<'_>) -> Option<String> {
        let dates = ctx.dataset.timestamps(self.date())?;
        let flags = ctx.dataset.flags(self.flag())?;
        let start = ctx.window.start_micros();

        // A null date is never fresh
        let invalid = dates
            .iter()
            .zip(flags)
            .filter(|(date, flag)| matches!(date, Some(ts) if *ts >= start) && *flag != Some(1.0))
            .count();

        (invalid > 0).then(|| format!("Found {} invalid {} values", invalid, self.flag()))
    }
}

/// Full rule: every record carries the same flag value.
pub struct ConstantFlagCheck {
    name: &'static str,
    columns: [&'static str; 1],
    expected: u8,
}

impl ConstantFlagCheck {
    /// Every snapshot record counts as created
    pub fn is_created() -> Self {
        Self {
            name: "IsCreatedConstant",
            columns: ["IsCreated"],
            expected: 1,
        }
    }

    /// No snapshot record counts as modified
    pub fn is_modified() -> Self {
        Self {
            name: "IsModifiedConstant",
            columns: ["IsModified"],
            expected: 0,
        }
    }
}

impl DumpRule for ConstantFlagCheck {
    fn name(&self) -> &'static str {
        self.name
    }

    fn required_columns(&self) -> &[&'static str] {
        &self.columns
    }

    fn check(&self, ctx: &RuleContext<'_>) -> Option<String> {
        let column = self.columns[0];
        let expected = f64::from(self.expected);
        let invalid = ctx
            .dataset
            .flags(column)?
            .into_iter()
            .filter(|flag| *flag != Some(expected))
            .count();

        (invalid > 0)
            .then(|| format!("Found {} rows with {} != {}", invalid, column, self.expected))
    }
}
