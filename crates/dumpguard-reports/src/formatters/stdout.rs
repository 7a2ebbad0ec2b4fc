use dumpguard_core::{
    BoundaryCheck, DatabaseOutcome, DatabaseReport, EtlMode, RunSummary, TableOutcome,
    TableReport,
};
use prettytable::{Cell, Row, Table};

use crate::Reporter;

/// Human-readable console report
pub struct StdOutFormatter {
    intro: String,
    rows: Vec<SummaryRow>,
}

struct SummaryRow {
    mode: EtlMode,
    database: String,
    table: String,
    rows: Option<usize>,
    status: &'static str,
}

pub fn mode_banner(mode: EtlMode) -> String {
    let title = match mode {
        EtlMode::Delta => "PROCESSING DELTA (DAILY) FILES",
        EtlMode::Full => "PROCESSING FULL FILES",
    };
    format!("\n********** {} **********", title)
}

/// Console text for one database, in manifest order.
pub fn render_database(report: &DatabaseReport) -> String {
    let mut lines = vec![
        String::new(),
        format!("========== PROCESSING {} DATABASE ==========", report.database),
    ];
    match &report.outcome {
        DatabaseOutcome::ManifestMissing => lines.push(format!(
            "Manifest file not found: {}",
            report.manifest_path.display()
        )),
        DatabaseOutcome::Fault(fault) => lines.push(format!(
            "Invalid manifest for {}: {}",
            report.database, fault.message
        )),
        DatabaseOutcome::Tables(tables) => {
            for table in tables {
                lines.extend(table_lines(&report.database, table));
            }
        }
    }
    lines.iter().map(|line| format!("{}\n", line)).collect()
}

fn table_lines(database: &str, table: &TableReport) -> Vec<String> {
    let mut lines = vec![
        String::new(),
        format!("Validating table: {} - {}", table.table_name, database),
    ];
    match &table.outcome {
        TableOutcome::RawMissing(path) => {
            lines.push(format!("Raw file not found: {}", path.display()));
        }
        TableOutcome::Fault(fault) => {
            lines.push(format!("Error processing {}: {}", table.table_name, fault.message));
        }
        TableOutcome::Checked { raw, boundary, .. } => {
            let status = if raw.is_valid() { "PASSED" } else { "FAILED" };
            lines.push(format!("Raw file validation: {}", status));
            lines.extend(raw.messages().iter().map(|msg| format!("- {}", msg)));
            lines.push(match boundary {
                BoundaryCheck::Compared(outcome) => {
                    format!("Validation file check: {}", outcome.message)
                }
                BoundaryCheck::NotFound(path) => {
                    format!("Validation file not found: {}", path.display())
                }
                BoundaryCheck::Fault(fault) => {
                    format!("Error processing validation file: {}", fault.message)
                }
            });
        }
    }
    lines
}

impl StdOutFormatter {
    pub fn new(version: String) -> Self {
        Self {
            intro: format!("DumpGuard v{} - Dump Validation Report", version),
            rows: Vec::new(),
        }
    }

    pub fn generate_summary_table(&self) -> String {
        let mut table = Table::new();
        table.add_row(Row::new(vec![
            Cell::new("Mode"),
            Cell::new("Database"),
            Cell::new("Table"),
            Cell::new("Rows"),
            Cell::new("Status"),
        ]));
        for row in &self.rows {
            let rows = row.rows.map(|n| n.to_string()).unwrap_or_else(|| "-".to_string());
            table.add_row(Row::new(vec![
                Cell::new(row.mode.name()),
                Cell::new(&row.database),
                Cell::new(&row.table),
                Cell::new(&rows),
                Cell::new(row.status),
            ]));
        }
        table.to_string()
    }
}

impl Reporter for StdOutFormatter {
    fn on_start(&self) {
        println!("{}", self.intro);
        println!("{}", "=".repeat(self.intro.len()));
    }

    fn on_mode_start(&mut self, mode: EtlMode) {
        println!("{}", mode_banner(mode));
    }

    fn on_database_result(&mut self, mode: EtlMode, report: &DatabaseReport) {
        print!("{}", render_database(report));
        for table in report.tables() {
            let rows = match &table.outcome {
                TableOutcome::Checked { rows, .. } => Some(*rows),
                _ => None,
            };
            self.rows.push(SummaryRow {
                mode,
                database: report.database.clone(),
                table: table.table_name.clone(),
                rows,
                status: table.status().label(),
            });
        }
    }

    fn on_summary(&mut self, summary: &RunSummary) {
        println!("\n===================================");
        if !self.rows.is_empty() {
            print!("{}", self.generate_summary_table());
        }
        println!(
            "Result: {} failed, {} passed, {} skipped, {} errors",
            summary.failed, summary.passed, summary.skipped, summary.faulted
        );
    }
}
