//! Configuration type definitions for the workdeck CLI.
//!
//! This module contains all configuration struct definitions used throughout
//! workdeck. These types are serialized/deserialized from TOML config files.
//!
//! # Example Configuration
//!
//! ```toml
//! [sync]
//! debounce_ms = 100
//! poll_interval_secs = 60
//! ipc_enabled = true
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Runtime configuration for workdeck.
///
/// This struct holds paths and settings that are derived from environment
/// variables and system defaults, not from config files.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base directory for all workdeck data (default: ~/.workdeck)
    pub workdeck_dir: PathBuf,
    /// Log level for the application
    pub log_level: String,
    /// Quiet-period window in milliseconds for reload coalescing
    pub debounce_ms: u64,
}

impl Config {
    /// Directory holding per-project runtime sockets.
    pub fn run_dir(&self) -> PathBuf {
        self.workdeck_dir.join("run")
    }

    /// Deterministic socket path for a project, scoped by its id.
    pub fn socket_path(&self, project_id: &str) -> PathBuf {
        self.run_dir().join(format!("board-{project_id}.sock"))
    }

    /// Quiet-period window as a [`Duration`].
    pub fn debounce_window(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

/// Main configuration loaded from TOML config files.
///
/// This is the primary configuration structure that gets loaded from:
/// 1. User config: `~/.workdeck/config.toml`
/// 2. Project config: `<project>/.workdeck/config.toml`
///
/// Project config values override user config values.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct BoardConfig {
    /// Live-sync tuning
    #[serde(default)]
    pub sync: SyncConfig,
}

impl BoardConfig {
    /// Effective quiet-period window, falling back to the built-in default.
    pub fn debounce_window(&self) -> Duration {
        Duration::from_millis(
            self.sync
                .debounce_ms
                .unwrap_or(super::defaults::DEFAULT_DEBOUNCE_MS),
        )
    }

    /// Effective slow-poll interval for the board loop.
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(
            self.sync
                .poll_interval_secs
                .unwrap_or(super::defaults::DEFAULT_POLL_INTERVAL_SECS),
        )
    }
}

/// Live-sync configuration.
///
/// Controls debounce timing and the IPC listener.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncConfig {
    /// Quiet-period window in milliseconds before a reload fires.
    /// Default: 100 ms.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub debounce_ms: Option<u64>,

    /// Interval in seconds between fallback full refreshes in the board loop.
    /// Default: 60 seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub poll_interval_secs: Option<u64>,

    /// Whether the board binds the notification socket.
    #[serde(default = "super::defaults::default_ipc_enabled")]
    pub ipc_enabled: bool,
}
