pub mod boundary;
pub mod config;
pub mod dataset;
pub mod engine;
pub mod errors;
pub mod manifest;
pub mod paths;
pub mod readers;
pub mod results;
pub mod rules;
pub mod utils;

pub use boundary::compare;
pub use config::{EtlMode, TimeWindow, ValidatorConfig};
pub use dataset::Dataset;
pub use engine::DumpValidator;
pub use errors::{ConfigError, LoadError};
pub use manifest::{ManifestEntry, ManifestRow};
pub use paths::DumpPaths;
pub use results::{
    BoundaryCheck, BoundaryOutcome, DatabaseOutcome, DatabaseReport, ModeReport, ResourceFault,
    RunSummary, TableOutcome, TableReport, TableStatus, ValidationOutcome,
};
pub use rules::{evaluate, RuleSet};
