use crate::errors::WorkdeckError;

#[derive(Debug, thiserror::Error)]
pub enum IpcError {
    #[error("Failed to prepare socket directory '{path}': {source}")]
    SocketDirFailed {
        path: String,
        source: std::io::Error,
    },

    #[error("Failed to bind socket '{path}': {source}")]
    BindFailed {
        path: String,
        source: std::io::Error,
    },
}

impl WorkdeckError for IpcError {
    fn error_code(&self) -> &'static str {
        match self {
            IpcError::SocketDirFailed { .. } => "IPC_SOCKET_DIR_FAILED",
            IpcError::BindFailed { .. } => "IPC_BIND_FAILED",
        }
    }
}
