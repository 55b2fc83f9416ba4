//! workdeck-core: Core library for the workdeck terminal board
//!
//! This library keeps a board process's in-memory view of a spec-driven
//! project (work items, epics, checkpoints, file status) synchronized
//! with the working tree in real time. It is used by the CLI and by any
//! frontend that embeds the board.
//!
//! # Main Entry Points
//!
//! - [`sync`] - Watch registry, debounce router, sync manager
//! - [`store`] - Board state slices and targeted reloads
//! - [`ipc`] - Notification socket server and fire-and-forget client
//! - [`git`] - Project detection, stash checkpoints, file status
//! - [`config`] - Configuration management

pub mod config;
pub mod errors;
pub mod events;
pub mod git;
pub mod ipc;
pub mod logging;
pub mod store;
pub mod sync;

// Re-export commonly used types at crate root for convenience
pub use config::{BoardConfig, Config, SyncConfig};
pub use git::types::{FileStatusCounts, ProjectInfo, StashCheckpoint};
pub use ipc::Notification;
pub use store::{BoardStore, StateStore, StoreError};
pub use store::types::{CheckpointEntry, Epic, WorkItem, WorkItemStatus};
pub use sync::{ReloadAction, RouterHandle, SyncManager, SyncOptions};

// Re-export handler modules as the primary API
pub use git::handler as git_ops;

// Re-export logging initialization
pub use logging::init_logging;
