use thiserror::Error;

/// Canonical result for core.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("unknown column '{name}' referenced in {clause}")]
    UnknownColumn { name: String, clause: &'static str },

    #[error("count target column '{0}' not found")]
    AggregateTargetNotFound(String),

    // Raised by the builder surface for malformed query authoring.
    #[error("query construction error: {0}")]
    Builder(String),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("row data is not valid JSON: {0}")]
    Json(String),
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Json(e.to_string())
    }
}
