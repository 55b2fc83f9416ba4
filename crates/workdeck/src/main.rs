use workdeck_core::init_logging;

mod app;
mod commands;
mod table;

fn main() {
    let matches = app::build_cli().get_matches();

    // Quiet must be known before the first log line
    let quiet = matches.get_flag("quiet");
    init_logging(quiet);

    if let Err(e) = commands::run_command(&matches) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
