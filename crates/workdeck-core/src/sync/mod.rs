//! Real-time state synchronization.
//!
//! Filesystem changes and IPC notifications both end up as
//! [`ReloadAction`] triggers on a shared debounce router, which drives
//! targeted reloads of the board's state store. See the submodules for
//! the registry (what to watch), the watcher adapter (how), the
//! coalescing router (when), and the manager (lifecycle).

pub mod coalesce;
pub mod errors;
pub mod manager;
pub mod registry;
pub mod router;
pub mod types;
pub mod watcher;

// Re-export commonly used types and functions
pub use coalesce::{CoalesceMachine, CoalesceState, Effect};
pub use errors::SyncError;
pub use manager::{SyncManager, SyncOptions};
pub use registry::{WatchRegistry, WatchTarget, WatchTargetKind};
pub use router::{ReloadRouter, RouterHandle};
pub use types::ReloadAction;
pub use watcher::{NotifyWatchSource, WatchSource, WatcherHandle};
