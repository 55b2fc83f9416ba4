use clap::ArgMatches;
use tracing::{error, info};

use workdeck_core::events;
use workdeck_core::git_ops;
use workdeck_core::store::loader;

pub(crate) fn handle_items_command(
    matches: &ArgMatches,
) -> Result<(), Box<dyn std::error::Error>> {
    let json_output = matches.get_flag("json");

    info!(event = "cli.items_started", json_output = json_output);

    let project = match git_ops::detect_project() {
        Ok(project) => project,
        Err(e) => {
            eprintln!("Failed to detect project: {}", e);
            error!(event = "cli.items_failed", error = %e);
            events::log_app_error(&e);
            return Err(e.into());
        }
    };

    let items = match loader::load_work_units(&project.work_units_path()) {
        Ok(items) => items.unwrap_or_default(),
        Err(e) => {
            eprintln!("Failed to read work units: {}", e);
            error!(event = "cli.items_failed", error = %e);
            events::log_app_error(&e);
            return Err(e.into());
        }
    };

    if json_output {
        println!("{}", serde_json::to_string_pretty(&items)?);
    } else if items.is_empty() {
        println!("No work units found.");
    } else {
        println!("Work units for '{}':", project.name);
        let formatter = crate::table::TableFormatter::new(&items);
        formatter.print_table(&items);
    }

    info!(event = "cli.items_completed", count = items.len());

    Ok(())
}
