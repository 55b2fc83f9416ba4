use clap::ArgMatches;
use tracing::{debug, info};

use workdeck_core::config::Config;
use workdeck_core::git_ops;
use workdeck_core::ipc;
use workdeck_core::Notification;

/// Send one refresh hint to a running board.
///
/// Notifying is best-effort by contract: no project, no board, or a dead
/// socket all end with exit code 0 so hooks and scripts never break.
pub(crate) fn handle_notify_command(
    matches: &ArgMatches,
) -> Result<(), Box<dyn std::error::Error>> {
    let kind = matches
        .get_one::<String>("kind")
        .ok_or("Kind argument is required")?;

    info!(event = "cli.notify_started", kind = kind);

    let Some(notification) = Notification::from_kind(kind) else {
        // Unreachable through the CLI parser; still not worth failing over
        debug!(event = "cli.notify_skipped", reason = "unknown_kind", kind = kind);
        return Ok(());
    };

    let project = match git_ops::detect_project() {
        Ok(project) => project,
        Err(e) => {
            debug!(event = "cli.notify_skipped", reason = %e);
            return Ok(());
        }
    };

    let config = Config::new();
    let socket_path = config.socket_path(&project.id);
    ipc::send_notification(&socket_path, &notification);

    info!(event = "cli.notify_completed", kind = kind);

    Ok(())
}
