//! Application-level lifecycle events.
//!
//! Module-specific events (`core.sync.*`, `core.git.*`, ...) are logged
//! where they happen; this module covers the process boundary.

use tracing::{error, info, warn};

use crate::errors::WorkdeckError;

pub fn log_app_startup() {
    info!(
        event = "core.app.startup_completed",
        version = env!("CARGO_PKG_VERSION")
    );
}

pub fn log_app_shutdown() {
    info!(event = "core.app.shutdown_started");
}

/// Log a command-aborting error with its taxonomy code.
///
/// User errors (wrong directory, bad input) log as warnings; everything
/// else is an operational error.
pub fn log_app_error(error: &dyn WorkdeckError) {
    if error.is_user_error() {
        warn!(
            event = "core.app.user_error",
            error = %error,
            error_code = error.error_code()
        );
    } else {
        error!(
            event = "core.app.error_occurred",
            error = %error,
            error_code = error.error_code()
        );
    }
}
