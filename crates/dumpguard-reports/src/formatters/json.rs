use chrono::Local;
use dumpguard_core::{
    BoundaryCheck, DatabaseOutcome, DatabaseReport, EtlMode, RunSummary, TableOutcome,
    TableReport,
};
use serde::{Deserialize, Serialize};
use serde_json::Error;

use crate::Reporter;

#[derive(Serialize, Deserialize)]
pub struct JsonFormatter {
    version: String,
    timestamp: String,
    modes: Vec<ModeFormatter>,
    summary: Option<SummaryFormatter>,
}

#[derive(Serialize, Deserialize)]
struct ModeFormatter {
    mode: String,
    directory: String,
    databases: Vec<DatabaseFormatter>,
}

#[derive(Serialize, Deserialize)]
struct DatabaseFormatter {
    name: String,
    manifest: String,
    status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    tables: Vec<TableFormatter>,
}

#[derive(Serialize, Deserialize)]
struct TableFormatter {
    name: String,
    status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    n_rows: Option<usize>,
    defects: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    boundary: Option<BoundaryFormatter>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

#[derive(Serialize, Deserialize)]
struct BoundaryFormatter {
    status: String,
    message: String,
}

#[derive(Serialize, Deserialize)]
struct SummaryFormatter {
    passed: usize,
    failed: usize,
    skipped: usize,
    errors: usize,
    databases_unavailable: usize,
}

impl JsonFormatter {
    pub fn new(version: String) -> Self {
        let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S").to_string();
        Self {
            version,
            timestamp,
            modes: Vec::new(),
            summary: None,
        }
    }

    pub fn to_json(&self) -> Result<String, Error> {
        serde_json::to_string_pretty(self)
    }
}

fn table_formatter(table: &TableReport) -> TableFormatter {
    let status = table.status().label().to_lowercase();
    match &table.outcome {
        TableOutcome::Checked {
            rows,
            raw,
            boundary,
        } => {
            let boundary = match boundary {
                BoundaryCheck::Compared(outcome) => BoundaryFormatter {
                    status: if outcome.is_valid { "passed" } else { "failed" }.to_string(),
                    message: outcome.message.clone(),
                },
                BoundaryCheck::NotFound(path) => BoundaryFormatter {
                    status: "not_found".to_string(),
                    message: path.display().to_string(),
                },
                BoundaryCheck::Fault(fault) => BoundaryFormatter {
                    status: "error".to_string(),
                    message: fault.message.clone(),
                },
            };
            TableFormatter {
                name: table.table_name.clone(),
                status,
                n_rows: Some(*rows),
                defects: raw.messages().to_vec(),
                boundary: Some(boundary),
                error: None,
            }
        }
        TableOutcome::RawMissing(path) => TableFormatter {
            name: table.table_name.clone(),
            status,
            n_rows: None,
            defects: Vec::new(),
            boundary: None,
            error: Some(format!("Raw file not found: {}", path.display())),
        },
        TableOutcome::Fault(fault) => TableFormatter {
            name: table.table_name.clone(),
            status,
            n_rows: None,
            defects: Vec::new(),
            boundary: None,
            error: Some(fault.message.clone()),
        },
    }
}

impl Reporter for JsonFormatter {
    fn on_start(&self) {}

    fn on_mode_start(&mut self, mode: EtlMode) {
        self.modes.push(ModeFormatter {
            mode: mode.name().to_string(),
            directory: mode.dir_name().to_string(),
            databases: Vec::new(),
        });
    }

    fn on_database_result(&mut self, mode: EtlMode, report: &DatabaseReport) {
        if self.modes.last().is_none_or(|m| m.mode != mode.name()) {
            self.on_mode_start(mode);
        }
        let (status, error) = match &report.outcome {
            DatabaseOutcome::Tables(_) => ("ok", None),
            DatabaseOutcome::ManifestMissing => ("manifest_missing", None),
            DatabaseOutcome::Fault(fault) => ("error", Some(fault.message.clone())),
        };
        let database = DatabaseFormatter {
            name: report.database.clone(),
            manifest: report.manifest_path.display().to_string(),
            status: status.to_string(),
            error,
            tables: report.tables().iter().map(table_formatter).collect(),
        };
        if let Some(current) = self.modes.last_mut() {
            current.databases.push(database);
        }
    }

    fn on_summary(&mut self, summary: &RunSummary) {
        self.summary = Some(SummaryFormatter {
            passed: summary.passed,
            failed: summary.failed,
            skipped: summary.skipped,
            errors: summary.faulted,
            databases_unavailable: summary.databases_unavailable,
        });
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use dumpguard_core::{BoundaryOutcome, ValidationOutcome};
    use serde_json::Value;
    use std::path::PathBuf;

    #[test]
    fn test_json_report_shape() {
        let mut formatter = JsonFormatter::new("0.1.0".to_string());
        formatter.on_mode_start(EtlMode::Delta);

        let mut raw = ValidationOutcome::new();
        raw.push("Found 1 invalid IsCreated values".to_string());
        formatter.on_database_result(
            EtlMode::Delta,
            &DatabaseReport {
                database: "online".to_string(),
                manifest_path: PathBuf::from("m.csv"),
                outcome: DatabaseOutcome::Tables(vec![TableReport {
                    table_name: "orders".to_string(),
                    outcome: TableOutcome::Checked {
                        rows: 2,
                        raw,
                        boundary: BoundaryCheck::Compared(BoundaryOutcome::passed(
                            "Validation file check passed",
                        )),
                    },
                }]),
            },
        );
        formatter.on_summary(&RunSummary {
            failed: 1,
            ..RunSummary::default()
        });

        let json: Value = serde_json::from_str(&formatter.to_json().unwrap()).unwrap();
        assert_eq!(json["version"], "0.1.0");
        let table = &json["modes"][0]["databases"][0]["tables"][0];
        assert_eq!(json["modes"][0]["directory"], "daily");
        assert_eq!(table["name"], "orders");
        assert_eq!(table["status"], "failed");
        assert_eq!(table["n_rows"], 2);
        assert_eq!(table["defects"][0], "Found 1 invalid IsCreated values");
        assert_eq!(table["boundary"]["status"], "passed");
        assert!(table.get("error").is_none());
        assert_eq!(json["summary"]["failed"], 1);
    }

    #[test]
    fn test_database_without_mode_start_opens_mode() {
        let mut formatter = JsonFormatter::new("0.1.0".to_string());
        formatter.on_database_result(
            EtlMode::Full,
            &DatabaseReport {
                database: "offline".to_string(),
                manifest_path: PathBuf::from("m.csv"),
                outcome: DatabaseOutcome::ManifestMissing,
            },
        );
        let json: Value = serde_json::from_str(&formatter.to_json().unwrap()).unwrap();
        assert_eq!(json["modes"][0]["mode"], "full");
        assert_eq!(json["modes"][0]["databases"][0]["status"], "manifest_missing");
    }
}
