//! Default implementations for configuration types.
//!
//! This module contains all `Default` implementations and helper functions
//! for providing default values in serde deserialization.

use crate::config::types::{Config, SyncConfig};

/// Quiet-period window applied when nothing overrides it.
pub const DEFAULT_DEBOUNCE_MS: u64 = 100;

/// Fallback full-refresh interval for the board loop.
pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 60;

/// Returns whether the notification socket is bound by default.
///
/// Used by serde `#[serde(default = "...")]` attribute.
pub fn default_ipc_enabled() -> bool {
    true
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            debounce_ms: None,
            poll_interval_secs: None,
            ipc_enabled: true,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        let workdeck_dir = match dirs::home_dir() {
            Some(home) => home.join(".workdeck"),
            None => {
                eprintln!(
                    "Warning: Could not find home directory. Set HOME environment variable. \
                    Using fallback directory."
                );
                std::env::temp_dir().join(".workdeck")
            }
        };

        Self {
            workdeck_dir,
            log_level: std::env::var("WORKDECK_LOG_LEVEL").unwrap_or("info".to_string()),
            debounce_ms: parse_debounce_ms(),
        }
    }
}

/// Parse WORKDECK_DEBOUNCE_MS env var with validation and warnings.
fn parse_debounce_ms() -> u64 {
    let Ok(val) = std::env::var("WORKDECK_DEBOUNCE_MS") else {
        return DEFAULT_DEBOUNCE_MS;
    };

    match val.parse::<u64>() {
        Ok(ms) if (10..=10_000).contains(&ms) => ms,
        _ => {
            eprintln!(
                "Warning: Invalid WORKDECK_DEBOUNCE_MS '{}', using default {}",
                val, DEFAULT_DEBOUNCE_MS
            );
            DEFAULT_DEBOUNCE_MS
        }
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }
}
