use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use clap::ArgMatches;
use tracing::{debug, error, info, warn};

use workdeck_core::config::{BoardConfig, Config};
use workdeck_core::events;
use workdeck_core::git_ops;
use workdeck_core::store::{BoardStore, StateStore};
use workdeck_core::sync::{SyncManager, SyncOptions};
use workdeck_core::ProjectInfo;

/// Load configuration with warning on errors.
///
/// Falls back to defaults if config loading fails, but notifies the user via:
/// - stderr message for immediate visibility
/// - structured log event `cli.config.load_failed` for debugging
fn load_board_config(project_root: &Path) -> BoardConfig {
    match BoardConfig::load_hierarchy_from(project_root) {
        Ok(config) => config,
        Err(e) => {
            eprintln!(
                "Warning: Could not load config: {}. Using defaults.\n\
                 Tip: Check ~/.workdeck/config.toml and ./.workdeck/config.toml for syntax errors.",
                e
            );
            warn!(
                event = "cli.config.load_failed",
                error = %e,
                "Config load failed, using defaults"
            );
            BoardConfig::default()
        }
    }
}

pub(crate) fn handle_board_command(matches: &ArgMatches) -> Result<(), Box<dyn std::error::Error>> {
    let project = match git_ops::detect_project() {
        Ok(project) => project,
        Err(e) => {
            eprintln!("Failed to detect project: {}", e);
            error!(event = "cli.board_failed", error = %e);
            events::log_app_error(&e);
            return Err(e.into());
        }
    };

    let runtime_config = Config::new();
    let board_config = load_board_config(&project.root);

    // Debounce precedence: CLI flag, then config file, then environment
    let debounce = match matches.get_one::<u64>("debounce-ms") {
        Some(ms) => Duration::from_millis(*ms),
        None => match board_config.sync.debounce_ms {
            Some(ms) => Duration::from_millis(ms),
            None => runtime_config.debounce_window(),
        },
    };

    let poll_interval = match matches.get_one::<u64>("interval") {
        Some(secs) => Duration::from_secs(*secs),
        None => board_config.poll_interval(),
    };

    let ipc_enabled = !matches.get_flag("no-ipc") && board_config.sync.ipc_enabled;
    let socket_path = ipc_enabled.then(|| runtime_config.socket_path(&project.id));

    info!(
        event = "cli.board_started",
        project = %project.name,
        debounce_ms = debounce.as_millis() as u64,
        poll_interval_secs = poll_interval.as_secs(),
        ipc = ipc_enabled
    );

    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(run_board(project, debounce, poll_interval, socket_path))
}

async fn run_board(
    project: ProjectInfo,
    debounce: Duration,
    poll_interval: Duration,
    socket_path: Option<std::path::PathBuf>,
) -> Result<(), Box<dyn std::error::Error>> {
    let store = Arc::new(BoardStore::new(project.clone()));

    // Populate every slice before watching so the first render is complete
    store.reload_work_items().await;
    store.reload_epics().await;
    store.reload_checkpoints().await;
    store.reload_file_status().await;

    let mut manager = SyncManager::new(
        Arc::clone(&store),
        project.clone(),
        SyncOptions {
            debounce,
            socket_path,
        },
    );
    manager.start();

    let handle = manager
        .handle()
        .ok_or("Sync manager failed to provide a router handle")?;

    print_board_summary(&project, &store, manager.socket_path());
    println!("Watching for changes. Press Ctrl+C to exit.");

    // Slow safety-net poll; event-driven sync does the real work
    let mut poll = tokio::time::interval_at(
        tokio::time::Instant::now() + poll_interval,
        poll_interval,
    );
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    loop {
        tokio::select! {
            _ = &mut ctrl_c => break,
            _ = poll.tick() => {
                debug!(event = "cli.board_poll_refresh");
                handle.trigger_all();
            }
        }
    }

    events::log_app_shutdown();
    manager.stop();
    println!("Board stopped.");

    info!(event = "cli.board_completed", project = %project.name);

    Ok(())
}

fn print_board_summary(project: &ProjectInfo, store: &BoardStore, socket: Option<&Path>) {
    let checkpoint_total: usize = store.checkpoints().values().map(|c| c.len()).sum();

    println!("Workdeck board for '{}'", project.name);
    println!("   Work units:  {}", store.work_items().len());
    println!("   Epics:       {}", store.epics().len());
    println!("   Checkpoints: {}", checkpoint_total);
    match socket {
        Some(path) => println!("   Socket:      {}", path.display()),
        None => println!("   Socket:      disabled"),
    }
}
