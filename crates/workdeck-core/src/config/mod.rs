//! # Configuration System
//!
//! Hierarchical TOML configuration system for the workdeck CLI.
//!
//! ## Configuration Hierarchy
//!
//! Configuration is loaded in the following order (later sources override earlier ones):
//! 1. **Hardcoded defaults** - Built-in fallback values
//! 2. **User config** - `~/.workdeck/config.toml` (global user preferences)
//! 3. **Project config** - `<project>/.workdeck/config.toml` (project-specific overrides)
//! 4. **CLI arguments** - Command-line flags (highest priority)
//!
//! ## Usage Example
//!
//! ```toml
//! # ~/.workdeck/config.toml
//! [sync]
//! debounce_ms = 100
//! poll_interval_secs = 60
//! ipc_enabled = true
//! ```
//!
//! ## Loading Configuration
//!
//! ```rust,no_run
//! use workdeck_core::config::BoardConfig;
//!
//! // Handle config errors explicitly - don't silently fall back to defaults
//! fn example(project_root: &std::path::Path) -> Result<(), Box<dyn std::error::Error>> {
//!     let config = BoardConfig::load_hierarchy_from(project_root)?;
//!     let window = config.debounce_window();
//!     Ok(())
//! }
//! ```

pub mod defaults;
pub mod loading;
pub mod types;
pub mod validation;

// Public API exports
pub use defaults::DEFAULT_DEBOUNCE_MS;
pub use types::{BoardConfig, Config, SyncConfig};
pub use validation::validate_config;

// Delegation for BoardConfig methods
impl BoardConfig {
    /// Load configuration with the project config read from `project_root`.
    ///
    /// See [`loading::load_hierarchy_from`] for details.
    pub fn load_hierarchy_from(
        project_root: &std::path::Path,
    ) -> Result<Self, Box<dyn std::error::Error>> {
        loading::load_hierarchy_from(project_root)
    }
}
