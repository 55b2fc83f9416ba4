use clap::{Arg, ArgAction, ArgMatches, Command};

pub fn build_cli() -> Command {
    Command::new("workdeck")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Terminal dashboard for spec-driven projects")
        .long_about("WORKDECK keeps a live view of a project's work units, epics, checkpoints, and git file status. The 'board' command watches the working tree and reacts to changes in real time; sibling commands read the same state or nudge a running board over its notification socket.")
        .arg(
            Arg::new("quiet")
                .short('q')
                .long("quiet")
                .help("Suppress log output (errors only)")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(
            Command::new("board")
                .about("Run the live board, keeping state synchronized until Ctrl-C")
                .arg(
                    Arg::new("interval")
                        .long("interval")
                        .short('i')
                        .help("Poll fallback interval in seconds (overrides config)")
                        .value_parser(clap::value_parser!(u64)),
                )
                .arg(
                    Arg::new("debounce-ms")
                        .long("debounce-ms")
                        .help("Debounce window in milliseconds (overrides config)")
                        .value_parser(clap::value_parser!(u64)),
                )
                .arg(
                    Arg::new("no-ipc")
                        .long("no-ipc")
                        .help("Disable the notification socket (filesystem watching only)")
                        .action(ArgAction::SetTrue),
                ),
        )
        .subcommand(
            Command::new("notify")
                .about("Send a refresh hint to a running board (fire-and-forget)")
                .arg(
                    Arg::new("kind")
                        .help("What changed")
                        .required(true)
                        .index(1)
                        .value_parser(["work-items", "epics", "checkpoints", "file-status"]),
                ),
        )
        .subcommand(
            Command::new("status")
                .about("Show a one-shot summary of the project's board state")
                .arg(
                    Arg::new("json")
                        .long("json")
                        .help("Output in JSON format")
                        .action(ArgAction::SetTrue),
                ),
        )
        .subcommand(
            Command::new("items")
                .about("List work units for the current project")
                .arg(
                    Arg::new("json")
                        .long("json")
                        .help("Output in JSON format")
                        .action(ArgAction::SetTrue),
                ),
        )
        .subcommand(
            Command::new("completions")
                .about("Generate shell completion scripts")
                .arg(
                    Arg::new("shell")
                        .help("Shell to generate completions for")
                        .required(true)
                        .index(1)
                        .value_parser(clap::value_parser!(clap_complete::Shell)),
                ),
        )
}

#[allow(dead_code)]
pub fn get_matches() -> ArgMatches {
    build_cli().get_matches()
}
