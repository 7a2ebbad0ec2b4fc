pub mod formatters;

use dumpguard_core::{DatabaseReport, EtlMode, RunSummary};
pub use formatters::{json::JsonFormatter, stdout::StdOutFormatter};

pub trait Reporter {
    fn on_start(&self);
    fn on_mode_start(&mut self, mode: EtlMode);
    fn on_database_result(&mut self, mode: EtlMode, report: &DatabaseReport);
    fn on_summary(&mut self, summary: &RunSummary);
}
