use std::path::{Path, PathBuf};

use crate::config::EtlMode;
use crate::errors::LoadError;

/// Defects found by the rule engine for one raw file.
///
/// Valid iff no defect was recorded. Messages keep rule evaluation order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationOutcome {
    messages: Vec<String>,
}

impl ValidationOutcome {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, message: String) {
        self.messages.push(message);
    }

    pub fn is_valid(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn messages(&self) -> &[String] {
        &self.messages
    }

    pub fn into_parts(self) -> (bool, Vec<String>) {
        (self.messages.is_empty(), self.messages)
    }
}

/// Result of comparing a validation sample with its raw file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoundaryOutcome {
    pub is_valid: bool,
    pub message: String,
}

impl BoundaryOutcome {
    pub fn passed(message: impl Into<String>) -> Self {
        Self {
            is_valid: true,
            message: message.into(),
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            is_valid: false,
            message: message.into(),
        }
    }
}

/// A file that could not be read or parsed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceFault {
    pub path: PathBuf,
    pub message: String,
}

impl ResourceFault {
    pub fn new(path: &Path, error: &LoadError) -> Self {
        Self {
            path: path.to_path_buf(),
            message: error.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BoundaryCheck {
    Compared(BoundaryOutcome),
    /// No validation file next to the raw file. A note, not a defect.
    NotFound(PathBuf),
    Fault(ResourceFault),
}

impl BoundaryCheck {
    pub fn is_defect(&self) -> bool {
        matches!(self, BoundaryCheck::Compared(outcome) if !outcome.is_valid)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableOutcome {
    Checked {
        rows: usize,
        raw: ValidationOutcome,
        boundary: BoundaryCheck,
    },
    RawMissing(PathBuf),
    Fault(ResourceFault),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableStatus {
    Passed,
    Failed,
    Skipped,
    Faulted,
}

impl TableStatus {
    pub fn label(self) -> &'static str {
        match self {
            TableStatus::Passed => "PASSED",
            TableStatus::Failed => "FAILED",
            TableStatus::Skipped => "SKIPPED",
            TableStatus::Faulted => "ERROR",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableReport {
    pub table_name: String,
    pub outcome: TableOutcome,
}

impl TableReport {
    pub fn status(&self) -> TableStatus {
        match &self.outcome {
            TableOutcome::Checked { raw, boundary, .. } => {
                if raw.is_valid() && !boundary.is_defect() {
                    TableStatus::Passed
                } else {
                    TableStatus::Failed
                }
            }
            TableOutcome::RawMissing(_) => TableStatus::Skipped,
            TableOutcome::Fault(_) => TableStatus::Faulted,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DatabaseOutcome {
    /// Table reports in manifest order
    Tables(Vec<TableReport>),
    ManifestMissing,
    Fault(ResourceFault),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseReport {
    pub database: String,
    pub manifest_path: PathBuf,
    pub outcome: DatabaseOutcome,
}

impl DatabaseReport {
    pub fn tables(&self) -> &[TableReport] {
        match &self.outcome {
            DatabaseOutcome::Tables(tables) => tables,
            _ => &[],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModeReport {
    pub mode: EtlMode,
    pub databases: Vec<DatabaseReport>,
}

/// Table counts over a whole run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub passed: usize,
    pub failed: usize,
    pub skipped: usize,
    pub faulted: usize,
    /// Databases whose manifest was missing or unreadable
    pub databases_unavailable: usize,
}

impl RunSummary {
    pub fn record_database(&mut self, report: &DatabaseReport) {
        match &report.outcome {
            DatabaseOutcome::Tables(tables) => {
                for table in tables {
                    match table.status() {
                        TableStatus::Passed => self.passed += 1,
                        TableStatus::Failed => self.failed += 1,
                        TableStatus::Skipped => self.skipped += 1,
                        TableStatus::Faulted => self.faulted += 1,
                    }
                }
            }
            DatabaseOutcome::ManifestMissing => self.databases_unavailable += 1,
            DatabaseOutcome::Fault(_) => {
                self.databases_unavailable += 1;
                self.faulted += 1;
            }
        }
    }

    pub fn from_modes(modes: &[ModeReport]) -> Self {
        let mut summary = Self::default();
        for db in modes.iter().flat_map(|m| m.databases.iter()) {
            summary.record_database(db);
        }
        summary
    }

    /// No table failed a rule and no file faulted
    pub fn is_clean(&self) -> bool {
        self.failed == 0 && self.faulted == 0
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn checked(raw: ValidationOutcome, boundary: BoundaryCheck) -> TableReport {
        TableReport {
            table_name: "orders".to_string(),
            outcome: TableOutcome::Checked {
                rows: 2,
                raw,
                boundary,
            },
        }
    }

    #[test]
    fn test_outcome_validity_follows_messages() {
        let mut outcome = ValidationOutcome::new();
        assert!(outcome.is_valid());
        outcome.push("Row count mismatch: expected 3, got 2".to_string());
        assert!(!outcome.is_valid());
        let (valid, messages) = outcome.into_parts();
        assert!(!valid);
        assert_eq!(messages.len(), 1);
    }

    #[test]
    fn test_missing_validation_file_still_passes() {
        let report = checked(
            ValidationOutcome::new(),
            BoundaryCheck::NotFound(PathBuf::from("x_validation.csv")),
        );
        assert_eq!(report.status(), TableStatus::Passed);
    }

    #[test]
    fn test_boundary_mismatch_fails_table() {
        let report = checked(
            ValidationOutcome::new(),
            BoundaryCheck::Compared(BoundaryOutcome::failed("mismatch")),
        );
        assert_eq!(report.status(), TableStatus::Failed);
    }

    #[test]
    fn test_summary_counts() {
        let db = DatabaseReport {
            database: "online".to_string(),
            manifest_path: PathBuf::from("m.csv"),
            outcome: DatabaseOutcome::Tables(vec![
                checked(
                    ValidationOutcome::new(),
                    BoundaryCheck::Compared(BoundaryOutcome::passed("ok")),
                ),
                TableReport {
                    table_name: "gone".to_string(),
                    outcome: TableOutcome::RawMissing(PathBuf::from("gone_raw.csv")),
                },
                TableReport {
                    table_name: "broken".to_string(),
                    outcome: TableOutcome::Fault(ResourceFault {
                        path: PathBuf::from("broken_raw.csv"),
                        message: "CSV file is empty".to_string(),
                    }),
                },
            ]),
        };
        let missing = DatabaseReport {
            database: "offline".to_string(),
            manifest_path: PathBuf::from("m2.csv"),
            outcome: DatabaseOutcome::ManifestMissing,
        };
        let summary = RunSummary::from_modes(&[ModeReport {
            mode: EtlMode::Delta,
            databases: vec![db, missing],
        }]);
        assert_eq!(summary.passed, 1);
        assert_eq!(summary.skipped, 1);
        assert_eq!(summary.faulted, 1);
        assert_eq!(summary.databases_unavailable, 1);
        assert!(!summary.is_clean());
    }
}
