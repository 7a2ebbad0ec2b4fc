use dumpguard_core::ConfigError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CliError {
    #[error("Failed to read config file: '{path}'")]
    ConfigRead {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse config file: '{path}' - {message}")]
    ConfigParse { path: String, message: String },
    // Semantic errors from core, e.g. an inverted window
    #[error("Invalid configuration")]
    Config(#[from] ConfigError),
    #[error("Failed to initialise logging: {0}")]
    Logging(String),
}
