use thiserror::Error;

#[derive(Error, Debug)]
pub enum LoadError {
    /// File could not be opened or read
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The Arrow CSV decoder produced an error
    #[error("Arrow computation error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    #[error("Invalid null pattern: {0}")]
    NullPattern(#[from] regex::Error),

    /// The file has no header line
    #[error("CSV file is empty")]
    EmptyFile,

    /// One or more required columns are absent
    #[error("Missing required headers: {}", .0.join(", "))]
    MissingHeaders(Vec<String>),

    #[error("Unparseable timestamp '{value}' in column '{column}' at row {row}")]
    DateParse {
        column: String,
        row: usize,
        value: String,
    },

    #[error("Invalid value '{value}' for manifest field '{field}'")]
    ManifestField { field: String, value: String },
}

#[derive(Error, Debug, PartialEq)]
pub enum ConfigError {
    #[error("Time window start ({start}) must be before its end ({end})")]
    InvalidWindow { start: String, end: String },

    #[error("At least one database name is required")]
    NoDatabases,

    #[error("Invalid timestamp '{0}' in configuration")]
    InvalidTimestamp(String),
}
