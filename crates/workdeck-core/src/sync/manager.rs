//! Lifecycle owner for the sync pipeline.
//!
//! [`SyncManager`] wires the watch registry, the per-target watcher
//! handles, the debounce router, and the notification socket together
//! under one cancellation token. `start` arms everything; `stop` tears
//! it all down synchronously, so after it returns no watcher is armed,
//! no reload can start, and the socket file is gone.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

use crate::config::DEFAULT_DEBOUNCE_MS;
use crate::git::types::ProjectInfo;
use crate::ipc::server::IpcServer;
use crate::store::StateStore;
use crate::sync::registry::WatchRegistry;
use crate::sync::router::{ReloadRouter, RouterHandle};
use crate::sync::watcher::{run_watch_loop, subscribe_targets, WatcherHandle};

/// Tunables for one sync pipeline.
#[derive(Debug, Clone)]
pub struct SyncOptions {
    /// Quiet period applied per action before a reload fires.
    pub debounce: Duration,
    /// Socket to listen on for refresh notifications. `None` disables IPC.
    pub socket_path: Option<PathBuf>,
}

impl Default for SyncOptions {
    fn default() -> Self {
        Self {
            debounce: Duration::from_millis(DEFAULT_DEBOUNCE_MS),
            socket_path: None,
        }
    }
}

pub struct SyncManager<S: StateStore> {
    store: Arc<S>,
    project: ProjectInfo,
    options: SyncOptions,
    shutdown: CancellationToken,
    handles: Vec<WatcherHandle>,
    router: Option<ReloadRouter>,
    router_handle: Option<RouterHandle>,
    ipc: Option<IpcServer>,
    dispatch_task: Option<JoinHandle<()>>,
}

impl<S: StateStore> SyncManager<S> {
    pub fn new(store: Arc<S>, project: ProjectInfo, options: SyncOptions) -> Self {
        Self {
            store,
            project,
            options,
            shutdown: CancellationToken::new(),
            handles: Vec::new(),
            router: None,
            router_handle: None,
            ipc: None,
            dispatch_task: None,
        }
    }

    /// Arm the watchers, start the router workers, and bind the socket.
    ///
    /// Must be called from within a tokio runtime. Infallible on purpose:
    /// a watch that cannot be armed is contained per handle, and a socket
    /// bind failure degrades to filesystem-only sync instead of aborting
    /// startup.
    pub fn start(&mut self) {
        if self.router.is_some() {
            debug!(event = "core.sync.manager_already_started");
            return;
        }

        self.shutdown = CancellationToken::new();

        let router = ReloadRouter::start(
            Arc::clone(&self.store),
            self.options.debounce,
            self.shutdown.clone(),
        );
        let handle = router.handle();

        let registry = WatchRegistry::for_project(&self.project);
        let (handles, events) = subscribe_targets(&registry);
        self.handles = handles.clone();

        self.dispatch_task = Some(tokio::spawn(run_watch_loop(
            events,
            handles,
            registry,
            handle.clone(),
            self.shutdown.clone(),
        )));

        self.ipc = match &self.options.socket_path {
            Some(path) => match IpcServer::bind(path.clone(), handle.clone(), &self.shutdown) {
                Ok(server) => Some(server),
                Err(e) => {
                    error!(
                        event = "core.ipc.bind_failed",
                        socket = %path.display(),
                        error = %e
                    );
                    None
                }
            },
            None => None,
        };

        info!(
            event = "core.sync.manager_started",
            project = %self.project.name,
            targets = self.handles.len(),
            ipc = self.ipc.is_some()
        );

        self.router_handle = Some(handle);
        self.router = Some(router);
    }

    /// Router handle for out-of-band triggers (poll fallback, tests).
    /// `None` before `start` and after `stop`.
    pub fn handle(&self) -> Option<RouterHandle> {
        self.router_handle.clone()
    }

    /// Socket the server is listening on, if IPC is up.
    pub fn socket_path(&self) -> Option<&Path> {
        self.ipc.as_ref().map(|server| server.socket_path())
    }

    /// Tear the whole pipeline down. Synchronous and idempotent.
    pub fn stop(&mut self) {
        if self.router.is_none() && self.handles.is_empty() && self.ipc.is_none() {
            return;
        }

        self.shutdown.cancel();

        for handle in self.handles.drain(..) {
            handle.close();
        }

        if let Some(server) = self.ipc.take() {
            server.shutdown();
        }

        if let Some(task) = self.dispatch_task.take() {
            task.abort();
        }

        if let Some(router) = self.router.take() {
            router.abort();
        }
        self.router_handle = None;

        info!(event = "core.sync.manager_stopped", project = %self.project.name);
    }
}

impl<S: StateStore> Drop for SyncManager<S> {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    struct NullStore;

    impl StateStore for NullStore {
        async fn reload_work_items(&self) {}
        async fn reload_epics(&self) {}
        async fn reload_checkpoints(&self) {}
        async fn reload_file_status(&self) {}
    }

    fn test_project(root: &Path) -> ProjectInfo {
        ProjectInfo {
            id: "testid".to_string(),
            name: "test".to_string(),
            root: root.to_path_buf(),
            git_dir: root.join(".git"),
            common_dir: root.join(".git"),
        }
    }

    fn manager_at(root: &Path, options: SyncOptions) -> SyncManager<NullStore> {
        SyncManager::new(Arc::new(NullStore), test_project(root), options)
    }

    #[tokio::test]
    async fn test_start_arms_watchers_and_stop_disarms_them() {
        let dir = tempfile::tempdir().unwrap();
        let mut manager = manager_at(dir.path(), SyncOptions::default());

        manager.start();
        assert!(manager.handle().is_some());
        // Targets do not exist yet; every handle still arms an ancestor
        assert!(!manager.handles.is_empty());
        for handle in &manager.handles {
            assert!(handle.watched_dir().is_some());
        }

        manager.stop();
        assert!(manager.handle().is_none());
        assert!(manager.handles.is_empty());
    }

    #[tokio::test]
    async fn test_stop_unlinks_socket() {
        let dir = tempfile::tempdir().unwrap();
        let socket_path = dir.path().join("run").join("board-test.sock");
        let mut manager = manager_at(
            dir.path(),
            SyncOptions {
                socket_path: Some(socket_path.clone()),
                ..Default::default()
            },
        );

        manager.start();
        assert!(socket_path.exists());
        assert_eq!(manager.socket_path(), Some(socket_path.as_path()));

        manager.stop();
        assert!(!socket_path.exists());
        assert_eq!(manager.socket_path(), None);
    }

    #[tokio::test]
    async fn test_bind_failure_degrades_to_fs_only() {
        let dir = tempfile::tempdir().unwrap();
        // Parent of the socket path is a regular file, so bind must fail
        let blocker = dir.path().join("run");
        fs::write(&blocker, "not a directory").unwrap();
        let mut manager = manager_at(
            dir.path(),
            SyncOptions {
                socket_path: Some(blocker.join("board-test.sock")),
                ..Default::default()
            },
        );

        manager.start();
        assert_eq!(manager.socket_path(), None);
        assert!(manager.handle().is_some(), "fs sync must survive bind failure");

        manager.stop();
    }

    #[tokio::test]
    async fn test_stop_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let mut manager = manager_at(dir.path(), SyncOptions::default());

        manager.start();
        manager.stop();
        manager.stop();
    }

    #[tokio::test]
    async fn test_start_twice_is_a_noop() {
        let dir = tempfile::tempdir().unwrap();
        let mut manager = manager_at(dir.path(), SyncOptions::default());

        manager.start();
        let first = manager.handles.len();
        manager.start();
        assert_eq!(manager.handles.len(), first);

        manager.stop();
    }
}
