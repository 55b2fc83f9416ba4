use crate::errors::WorkdeckError;

#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    #[error("Failed to watch '{path}': {message}")]
    WatchFailed { path: String, message: String },

    #[error("Watch backend error: {source}")]
    BackendError {
        #[from]
        source: notify::Error,
    },
}

impl WorkdeckError for SyncError {
    fn error_code(&self) -> &'static str {
        match self {
            SyncError::WatchFailed { .. } => "SYNC_WATCH_FAILED",
            SyncError::BackendError { .. } => "SYNC_BACKEND_ERROR",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sync_error_codes() {
        let error = SyncError::WatchFailed {
            path: "/work/demo/spec".to_string(),
            message: "permission denied".to_string(),
        };
        assert_eq!(error.error_code(), "SYNC_WATCH_FAILED");
        assert!(!error.is_user_error());
    }
}
