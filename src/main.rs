use std::sync::Arc;

use clap::Parser;
use taskmaster::cli::commands::Cli;
use taskmaster::cli::handlers;

fn main() {
    init_logging();
    let cli = Cli::parse();

    match cli.command {
        None => {
            // No subcommand → launch TUI
            if let Err(e) = taskmaster::tui::run(cli.offline) {
                eprintln!("error: {}", e);
                std::process::exit(1);
            }
        }
        Some(_) => {
            if let Err(e) = handlers::dispatch(cli) {
                eprintln!("error: {}", e);
                std::process::exit(1);
            }
        }
    }
}

/// Log to a file (stdout belongs to the TUI). Level via TM_LOG, e.g.
/// `TM_LOG=taskmaster=debug`. Logging being unavailable is never fatal.
fn init_logging() {
    let Some(dir) = dirs::state_dir().or_else(dirs::cache_dir) else {
        return;
    };
    let dir = dir.join("taskmaster");
    if std::fs::create_dir_all(&dir).is_err() {
        return;
    }
    let Ok(file) = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(dir.join("tm.log"))
    else {
        return;
    };
    let filter = tracing_subscriber::EnvFilter::try_from_env("TM_LOG")
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Arc::new(file))
        .with_ansi(false)
        .try_init();
}
