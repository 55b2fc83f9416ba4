//! Notification socket server.
//!
//! Binds the project-scoped Unix socket inside the board process and
//! feeds decoded notifications into the same router the file watcher
//! uses, so both sources share one coalescing state per action.
//!
//! A stale socket file left by a dead board is unlinked before binding;
//! the live socket is unlinked again on shutdown. Malformed lines are
//! dropped with a warning while the connection and the listener stay up.

use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::net::{UnixListener, UnixStream};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::ipc::errors::IpcError;
use crate::ipc::messages::Notification;
use crate::sync::router::RouterHandle;

pub struct IpcServer {
    socket_path: PathBuf,
    accept_task: JoinHandle<()>,
    shutdown: CancellationToken,
}

impl IpcServer {
    /// Bind the socket and start accepting connections.
    ///
    /// `shutdown` is the owning manager's token; the server derives a
    /// child so its own shutdown never cancels the rest of the system.
    pub fn bind(
        socket_path: PathBuf,
        router: RouterHandle,
        shutdown: &CancellationToken,
    ) -> Result<Self, IpcError> {
        prepare_socket_path(&socket_path)?;

        let listener = UnixListener::bind(&socket_path).map_err(|e| IpcError::BindFailed {
            path: socket_path.display().to_string(),
            source: e,
        })?;

        // Refresh hints are per-user traffic
        if let Err(e) =
            std::fs::set_permissions(&socket_path, std::fs::Permissions::from_mode(0o600))
        {
            warn!(
                event = "core.ipc.socket_chmod_failed",
                socket = %socket_path.display(),
                error = %e
            );
        }

        info!(event = "core.ipc.server_started", socket = %socket_path.display());

        let shutdown = shutdown.child_token();
        let accept_task = tokio::spawn(run_accept_loop(listener, router, shutdown.clone()));

        Ok(Self {
            socket_path,
            accept_task,
            shutdown,
        })
    }

    pub fn socket_path(&self) -> &Path {
        &self.socket_path
    }

    /// Stop accepting and unlink the socket file. Synchronous.
    pub fn shutdown(self) {
        self.shutdown.cancel();
        self.accept_task.abort();

        match std::fs::remove_file(&self.socket_path) {
            Ok(()) => {
                info!(event = "core.ipc.socket_unlinked", socket = %self.socket_path.display());
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => {
                warn!(
                    event = "core.ipc.socket_unlink_failed",
                    socket = %self.socket_path.display(),
                    error = %e
                );
            }
        }
    }
}

/// Create the runtime directory and clear any stale socket file.
fn prepare_socket_path(socket_path: &Path) -> Result<(), IpcError> {
    if let Some(parent) = socket_path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| IpcError::SocketDirFailed {
            path: parent.display().to_string(),
            source: e,
        })?;
        std::fs::set_permissions(parent, std::fs::Permissions::from_mode(0o700)).map_err(|e| {
            IpcError::SocketDirFailed {
                path: parent.display().to_string(),
                source: e,
            }
        })?;
    }

    if socket_path.exists() {
        std::fs::remove_file(socket_path).map_err(|e| IpcError::BindFailed {
            path: socket_path.display().to_string(),
            source: e,
        })?;
        info!(event = "core.ipc.stale_socket_removed", socket = %socket_path.display());
    }

    Ok(())
}

async fn run_accept_loop(
    listener: UnixListener,
    router: RouterHandle,
    shutdown: CancellationToken,
) {
    loop {
        tokio::select! {
            _ = shutdown.cancelled() => break,
            accepted = listener.accept() => {
                match accepted {
                    Ok((stream, _addr)) => {
                        debug!(event = "core.ipc.connection_accepted");
                        tokio::spawn(handle_connection(stream, router.clone(), shutdown.clone()));
                    }
                    Err(e) => {
                        warn!(event = "core.ipc.accept_failed", error = %e);
                    }
                }
            }
        }
    }
    debug!(event = "core.ipc.accept_loop_stopped");
}

/// Read newline-delimited notifications until EOF or shutdown.
async fn handle_connection(
    stream: UnixStream,
    router: RouterHandle,
    shutdown: CancellationToken,
) {
    let mut reader = BufReader::new(stream);
    let mut line = String::new();

    loop {
        line.clear();
        tokio::select! {
            _ = shutdown.cancelled() => break,
            read = reader.read_line(&mut line) => {
                match read {
                    Ok(0) => {
                        debug!(event = "core.ipc.connection_closed");
                        break;
                    }
                    Ok(_) => process_line(line.trim(), &router),
                    Err(e) => {
                        warn!(event = "core.ipc.read_error", error = %e);
                        break;
                    }
                }
            }
        }
    }
}

/// Decode one line and route it. A bad line is dropped, nothing else.
fn process_line(line: &str, router: &RouterHandle) {
    if line.is_empty() {
        return;
    }

    match serde_json::from_str::<Notification>(line) {
        Ok(notification) => {
            info!(
                event = "core.ipc.notification_received",
                kind = notification.kind()
            );
            for action in notification.actions() {
                router.trigger(*action);
            }
        }
        Err(e) => {
            warn!(event = "core.ipc.message_invalid", error = %e);
        }
    }
}
