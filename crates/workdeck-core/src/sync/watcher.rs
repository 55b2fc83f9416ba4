//! Path watcher adapter.
//!
//! Bridges raw `notify` backend events into debounced reload triggers.
//! Each [`WatchTarget`] gets its own [`WatcherHandle`] owning its own OS
//! subscription, so one failing watch never disturbs the others and
//! teardown is a synchronous per-handle close.
//!
//! File targets are observed through their parent directory: git and
//! editors save via write-temp-then-rename, and a direct file watch dies
//! with the replaced inode. Directory events are filtered through the
//! registry before anything reaches the router.
//!
//! Targets that do not exist yet are not errors. The handle arms the
//! nearest existing ancestor and walks the watch down as path components
//! appear, so `spec/work-units.json` created long after startup is picked
//! up without restarting anything.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use notify::{EventKind, RecursiveMode, Watcher};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::sync::errors::SyncError;
use crate::sync::registry::{WatchRegistry, WatchTarget};
use crate::sync::router::RouterHandle;

/// Index of a target within the registry table.
pub type TargetId = usize;

/// Raw event stream shared by all handles.
pub type WatchEventReceiver = mpsc::UnboundedReceiver<(TargetId, notify::Event)>;

/// Backend seam: the handle logic only needs non-recursive watch and
/// unwatch, so tests can drive it without touching the OS.
pub trait WatchSource: Send + 'static {
    fn watch(&mut self, path: &Path) -> Result<(), SyncError>;
    fn unwatch(&mut self, path: &Path) -> Result<(), SyncError>;
}

/// `notify`-backed watch source. One instance per target.
pub struct NotifyWatchSource {
    watcher: notify::RecommendedWatcher,
}

impl NotifyWatchSource {
    pub fn new(
        id: TargetId,
        tx: mpsc::UnboundedSender<(TargetId, notify::Event)>,
    ) -> Result<Self, SyncError> {
        let watcher = notify::recommended_watcher(move |result: notify::Result<notify::Event>| {
            match result {
                Ok(event) => {
                    let _ = tx.send((id, event));
                }
                Err(e) => {
                    warn!(event = "core.sync.backend_error", target = id, error = %e);
                }
            }
        })?;
        Ok(Self { watcher })
    }
}

impl WatchSource for NotifyWatchSource {
    fn watch(&mut self, path: &Path) -> Result<(), SyncError> {
        self.watcher
            .watch(path, RecursiveMode::NonRecursive)
            .map_err(SyncError::from)
    }

    fn unwatch(&mut self, path: &Path) -> Result<(), SyncError> {
        self.watcher.unwatch(path).map_err(SyncError::from)
    }
}

struct HandleState {
    source: Option<Box<dyn WatchSource>>,
    watched_dir: Option<PathBuf>,
}

/// One per [`WatchTarget`]; owns the OS watch subscription.
///
/// Cloneable so the dispatch task and the manager can both hold it; the
/// manager's [`close`](WatcherHandle::close) is synchronous and total.
#[derive(Clone)]
pub struct WatcherHandle {
    target: WatchTarget,
    state: Arc<Mutex<HandleState>>,
}

impl WatcherHandle {
    pub fn new(target: WatchTarget, source: Option<Box<dyn WatchSource>>) -> Self {
        Self {
            target,
            state: Arc::new(Mutex::new(HandleState {
                source,
                watched_dir: None,
            })),
        }
    }

    pub fn target(&self) -> &WatchTarget {
        &self.target
    }

    /// Point the subscription at the nearest existing ancestor of the
    /// target's covering directory.
    ///
    /// Idempotent and cheap when already correctly armed. Returns `true`
    /// when the armed directory changed, which is the moment to check
    /// whether a previously missing target has appeared. Watch failures
    /// are logged and leave the handle disarmed; the rest of the system
    /// keeps running.
    pub fn ensure_armed(&self) -> bool {
        let desired = self.target.watch_dir();
        let next = nearest_existing_ancestor(&desired);

        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        if state.watched_dir.as_deref() == Some(next.as_path()) {
            return false;
        }

        let Some(source) = state.source.as_mut() else {
            return false;
        };

        if let Some(previous) = state.watched_dir.take() {
            if let Err(e) = source.unwatch(&previous) {
                debug!(
                    event = "core.sync.unwatch_failed",
                    path = %previous.display(),
                    error = %e
                );
            }
        }

        match source.watch(&next) {
            Ok(()) => {
                debug!(
                    event = "core.sync.watch_armed",
                    path = %next.display(),
                    target = %self.target.path.display()
                );
                state.watched_dir = Some(next);
                true
            }
            Err(e) => {
                warn!(
                    event = "core.sync.watch_failed",
                    path = %next.display(),
                    target = %self.target.path.display(),
                    error = %e
                );
                false
            }
        }
    }

    /// Currently armed directory, if any.
    pub fn watched_dir(&self) -> Option<PathBuf> {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .watched_dir
            .clone()
    }

    /// Drop the OS subscription. Synchronous; safe to call twice.
    pub fn close(&self) {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        if state.source.take().is_some() {
            debug!(
                event = "core.sync.watch_closed",
                target = %self.target.path.display()
            );
        }
        state.watched_dir = None;
    }
}

/// Nearest existing ancestor of `path`, including `path` itself.
pub fn nearest_existing_ancestor(path: &Path) -> PathBuf {
    for candidate in path.ancestors() {
        if candidate.exists() {
            return candidate.to_path_buf();
        }
    }
    // Unreachable for absolute paths; the filesystem root exists
    PathBuf::from("/")
}

/// Whether an event kind can represent content having changed.
///
/// Rename events count: an atomic save lands as a rename whose
/// destination is the watched path. Access events are pure noise.
pub fn is_content_event(kind: &EventKind) -> bool {
    matches!(
        kind,
        EventKind::Create(_) | EventKind::Modify(_) | EventKind::Remove(_) | EventKind::Any
    )
}

/// Build one handle per registry target and arm them all.
///
/// Individual arm failures are contained (logged, handle left disarmed).
pub fn subscribe_targets(
    registry: &WatchRegistry,
) -> (Vec<WatcherHandle>, WatchEventReceiver) {
    let (tx, rx) = mpsc::unbounded_channel();
    let mut handles = Vec::with_capacity(registry.targets().len());

    for (id, target) in registry.targets().iter().enumerate() {
        let source: Option<Box<dyn WatchSource>> = match NotifyWatchSource::new(id, tx.clone()) {
            Ok(source) => Some(Box::new(source)),
            Err(e) => {
                warn!(
                    event = "core.sync.subscribe_failed",
                    target = %target.path.display(),
                    error = %e
                );
                None
            }
        };

        let handle = WatcherHandle::new(target.clone(), source);
        handle.ensure_armed();
        info!(
            event = "core.sync.watch_registered",
            target = %target.path.display(),
            armed = handle.watched_dir().is_some()
        );
        handles.push(handle);
    }

    (handles, rx)
}

/// Dispatch loop: normalize raw events and feed the router.
///
/// Every branch is contained; one malformed or surprising event can only
/// ever be dropped, never take the loop down.
pub async fn run_watch_loop(
    mut events: WatchEventReceiver,
    handles: Vec<WatcherHandle>,
    registry: WatchRegistry,
    router: RouterHandle,
    shutdown: CancellationToken,
) {
    loop {
        tokio::select! {
            _ = shutdown.cancelled() => break,
            received = events.recv() => {
                let Some((id, event)) = received else { break };
                let Some(handle) = handles.get(id) else { continue };
                process_event(handle, &event, &registry, &router);
            }
        }
    }
    debug!(event = "core.sync.watch_loop_stopped");
}

fn process_event(
    handle: &WatcherHandle,
    event: &notify::Event,
    registry: &WatchRegistry,
    router: &RouterHandle,
) {
    // Walk the watch closer to a target that is still materializing, or
    // back up when the watched directory disappeared.
    if handle.ensure_armed() && handle.target().exists() {
        route_change(&handle.target().path, registry, router);
    }

    if !is_content_event(&event.kind) {
        return;
    }

    for path in &event.paths {
        if handle.target().matches(path) {
            route_change(path, registry, router);
        }
    }
}

fn route_change(path: &Path, registry: &WatchRegistry, router: &RouterHandle) {
    let actions = registry.resolve(path);
    if actions.is_empty() {
        return;
    }
    info!(
        event = "core.sync.change_detected",
        path = %path.display(),
        actions = %actions
            .iter()
            .map(|a| a.to_string())
            .collect::<Vec<_>>()
            .join(",")
    );
    for action in actions {
        router.trigger(action);
    }
}
