//! Dashboard state: slice types, tolerant loaders, and the live store.

pub mod board;
pub mod errors;
pub mod loader;
pub mod types;

// Public API exports
pub use board::{BoardStore, StateStore};
pub use errors::StoreError;
pub use types::{CheckpointDoc, CheckpointEntry, Epic, WorkItem, WorkItemStatus};
