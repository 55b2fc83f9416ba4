//! Configuration validation.
//!
//! Checks value ranges after the hierarchy has been merged, so invalid
//! settings fail loudly at startup instead of surfacing as odd sync
//! behavior later.

use crate::config::types::BoardConfig;
use crate::errors::ConfigError;

/// Inclusive bounds for the quiet-period window in milliseconds.
pub const DEBOUNCE_MS_RANGE: std::ops::RangeInclusive<u64> = 10..=10_000;

/// Inclusive bounds for the fallback poll interval in seconds.
pub const POLL_INTERVAL_SECS_RANGE: std::ops::RangeInclusive<u64> = 5..=3_600;

/// Validate the merged configuration.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidConfiguration`] when a value is outside
/// its supported range.
pub fn validate_config(config: &BoardConfig) -> Result<(), ConfigError> {
    if let Some(ms) = config.sync.debounce_ms {
        if !DEBOUNCE_MS_RANGE.contains(&ms) {
            return Err(ConfigError::InvalidConfiguration {
                message: format!(
                    "sync.debounce_ms must be between {} and {}, got {}",
                    DEBOUNCE_MS_RANGE.start(),
                    DEBOUNCE_MS_RANGE.end(),
                    ms
                ),
            });
        }
    }

    if let Some(secs) = config.sync.poll_interval_secs {
        if !POLL_INTERVAL_SECS_RANGE.contains(&secs) {
            return Err(ConfigError::InvalidConfiguration {
                message: format!(
                    "sync.poll_interval_secs must be between {} and {}, got {}",
                    POLL_INTERVAL_SECS_RANGE.start(),
                    POLL_INTERVAL_SECS_RANGE.end(),
                    secs
                ),
            });
        }
    }

    Ok(())
}
