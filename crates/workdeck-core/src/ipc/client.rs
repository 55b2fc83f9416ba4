//! Synchronous notification client.
//!
//! Uses `std::os::unix::net::UnixStream` (no tokio dependency) so tools
//! and hooks can send a refresh hint without pulling in a runtime.
//! Sends are fire-and-forget: one JSON line, no response expected.

use std::io::Write;
use std::os::unix::net::UnixStream;
use std::path::Path;
use std::time::Duration;

use tracing::{debug, info};

use crate::errors::WorkdeckError;
use crate::ipc::messages::Notification;

/// Error sending a notification to a board.
#[derive(Debug, thiserror::Error)]
pub enum IpcClientError {
    #[error("No board is listening (socket not found at {path})")]
    NotListening { path: String },

    #[error("Connection failed: {message}")]
    ConnectionFailed { message: String },

    #[error("Failed to encode notification: {message}")]
    EncodeFailed { message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl WorkdeckError for IpcClientError {
    fn error_code(&self) -> &'static str {
        match self {
            IpcClientError::NotListening { .. } => "IPC_NOT_LISTENING",
            IpcClientError::ConnectionFailed { .. } => "IPC_CONNECTION_FAILED",
            IpcClientError::EncodeFailed { .. } => "IPC_ENCODE_FAILED",
            IpcClientError::Io(_) => "IPC_CLIENT_IO_ERROR",
        }
    }

    fn is_user_error(&self) -> bool {
        matches!(self, IpcClientError::NotListening { .. })
    }
}

/// Connect to a board socket with a write timeout.
fn connect(socket_path: &Path) -> Result<UnixStream, IpcClientError> {
    if !socket_path.exists() {
        return Err(IpcClientError::NotListening {
            path: socket_path.display().to_string(),
        });
    }

    let stream = UnixStream::connect(socket_path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::ConnectionRefused {
            IpcClientError::NotListening {
                path: socket_path.display().to_string(),
            }
        } else {
            IpcClientError::ConnectionFailed {
                message: e.to_string(),
            }
        }
    })?;

    stream.set_write_timeout(Some(Duration::from_secs(2)))?;

    Ok(stream)
}

/// Send one notification line and return whether anyone was listening.
pub fn try_send_notification(
    socket_path: &Path,
    notification: &Notification,
) -> Result<(), IpcClientError> {
    let msg =
        serde_json::to_string(notification).map_err(|e| IpcClientError::EncodeFailed {
            message: e.to_string(),
        })?;

    let mut stream = connect(socket_path)?;
    writeln!(stream, "{}", msg)?;
    stream.flush()?;

    Ok(())
}

/// Fire-and-forget send. A missing or unresponsive board is not an error;
/// the outcome is logged and swallowed so callers always succeed.
pub fn send_notification(socket_path: &Path, notification: &Notification) {
    match try_send_notification(socket_path, notification) {
        Ok(()) => {
            info!(
                event = "core.ipc.notify_sent",
                kind = notification.kind(),
                socket = %socket_path.display()
            );
        }
        Err(e) => {
            debug!(
                event = "core.ipc.notify_skipped",
                kind = notification.kind(),
                reason = %e
            );
        }
    }
}
