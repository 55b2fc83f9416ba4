use clap::ArgMatches;
use tracing::{error, info};

use workdeck_core::events;
use workdeck_core::git_ops;
use workdeck_core::store::{BoardStore, StateStore};

use crate::table::truncate;

#[derive(serde::Serialize)]
struct StatusSummary {
    project: String,
    work_units: usize,
    epics: usize,
    checkpoints: usize,
    branch: Option<String>,
    staged: usize,
    unstaged: usize,
    untracked: usize,
}

pub(crate) fn handle_status_command(
    matches: &ArgMatches,
) -> Result<(), Box<dyn std::error::Error>> {
    let json_output = matches.get_flag("json");

    info!(event = "cli.status_started", json_output = json_output);

    let project = match git_ops::detect_project() {
        Ok(project) => project,
        Err(e) => {
            eprintln!("Failed to detect project: {}", e);
            error!(event = "cli.status_failed", error = %e);
            events::log_app_error(&e);
            return Err(e.into());
        }
    };

    // One-shot load through the same store the board uses, so the counts
    // match what a live board would show
    let store = BoardStore::new(project.clone());
    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(async {
        store.reload_work_items().await;
        store.reload_epics().await;
        store.reload_checkpoints().await;
        store.reload_file_status().await;
    });

    let file_status = store.file_status();
    let summary = StatusSummary {
        project: project.name.clone(),
        work_units: store.work_items().len(),
        epics: store.epics().len(),
        checkpoints: store.checkpoints().values().map(|c| c.len()).sum(),
        branch: file_status.branch.clone(),
        staged: file_status.staged,
        unstaged: file_status.unstaged,
        untracked: file_status.untracked,
    };

    if json_output {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        print_status_box(&summary);
    }

    info!(
        event = "cli.status_completed",
        project = %summary.project,
        work_units = summary.work_units
    );

    Ok(())
}

fn print_status_box(summary: &StatusSummary) {
    let changes = format!(
        "{} staged, {} unstaged, {} untracked",
        summary.staged, summary.unstaged, summary.untracked
    );

    println!("Workdeck Status: {}", summary.project);
    println!("┌──────────────────────────────────────────────────────────────┐");
    println!("│ Project:     {} │", truncate(&summary.project, 47));
    println!("│ Work units:  {:<47} │", summary.work_units);
    println!("│ Epics:       {:<47} │", summary.epics);
    println!("│ Checkpoints: {:<47} │", summary.checkpoints);
    println!(
        "│ Branch:      {} │",
        truncate(summary.branch.as_deref().unwrap_or("(detached)"), 47)
    );
    println!("│ Changes:     {} │", truncate(&changes, 47));
    println!("└──────────────────────────────────────────────────────────────┘");
}
