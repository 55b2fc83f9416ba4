pub mod errors;
pub mod handler;
pub mod operations;
pub mod types;

// Re-export commonly used types and functions
pub use errors::GitError;
pub use handler::{detect_project, detect_project_at, list_stash_checkpoints, read_file_status};
pub use types::{FileStatusCounts, ProjectInfo, StashCheckpoint};
