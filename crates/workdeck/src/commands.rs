use clap::ArgMatches;
use tracing::error;

use workdeck_core::events;

mod board;
mod completions;
mod items;
mod notify;
mod status;

pub fn run_command(matches: &ArgMatches) -> Result<(), Box<dyn std::error::Error>> {
    events::log_app_startup();

    match matches.subcommand() {
        Some(("board", sub_matches)) => board::handle_board_command(sub_matches),
        Some(("notify", sub_matches)) => notify::handle_notify_command(sub_matches),
        Some(("status", sub_matches)) => status::handle_status_command(sub_matches),
        Some(("items", sub_matches)) => items::handle_items_command(sub_matches),
        Some(("completions", sub_matches)) => completions::handle_completions_command(sub_matches),
        _ => {
            error!(event = "cli.command_unknown");
            Err("Unknown command".into())
        }
    }
}
