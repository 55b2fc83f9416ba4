use crate::errors::WorkdeckError;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Failed to read '{path}': {source}")]
    ReadFailed {
        path: String,
        source: std::io::Error,
    },

    #[error("Failed to parse '{path}': {message}")]
    ParseFailed { path: String, message: String },
}

impl WorkdeckError for StoreError {
    fn error_code(&self) -> &'static str {
        match self {
            StoreError::ReadFailed { .. } => "STORE_READ_FAILED",
            StoreError::ParseFailed { .. } => "STORE_PARSE_FAILED",
        }
    }
}
