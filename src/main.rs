//! Karte - keyboard-driven geographic annotation

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, Subcommand};
use karte::app::App;
use karte::autopilot::HttpFetcher;
use karte::config::Config;
use karte::host::Host;
use karte::paths;
use std::path::PathBuf;
use tracing::warn;

mod tui;

/// Keyboard-driven geographic annotation tool
#[derive(Parser)]
#[command(name = "karte")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Read configuration from this file instead of the default location
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Command string to replay before handing over to the keyboard
    #[arg(long)]
    autopilot: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the keyboard menu
    Menu,
    /// Run a command string without the UI and print the resulting layers
    Replay {
        /// Command string, e.g. "i l 'geoText(wkt,POINT(1 1))'"
        script: String,
    },
}

fn main() -> Result<()> {
    let log_path = paths::log_path();

    // Clear the log file on startup
    if let Err(e) = std::fs::write(&log_path, "") {
        eprintln!("Warning: Failed to clear log file: {e}");
    }

    // Set DEBUG=0-3 to control verbosity (0=off, 1=warn, 2=info, 3=debug)
    let debug_level = std::env::var("DEBUG")
        .ok()
        .and_then(|v| v.parse::<u8>().ok())
        .unwrap_or(0);

    if debug_level > 0 {
        let level = match debug_level {
            1 => tracing::Level::WARN,
            2 => tracing::Level::INFO,
            _ => tracing::Level::DEBUG,
        };

        let log_dir = log_path
            .parent()
            .map_or_else(std::env::temp_dir, std::path::Path::to_path_buf);
        let file_appender = tracing_appender::rolling::never(log_dir, "karte.log");
        tracing_subscriber::fmt()
            .with_writer(file_appender)
            .with_max_level(level)
            .with_ansi(false)
            .init();
    }

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            // Let --help and --version exit normally
            if e.kind() == clap::error::ErrorKind::DisplayHelp
                || e.kind() == clap::error::ErrorKind::DisplayVersion
            {
                e.exit();
            }
            eprintln!("error: {}\n", e.kind());
            Cli::command().print_help()?;
            std::process::exit(1);
        }
    };

    let config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };

    match cli.command {
        Some(Commands::Menu) => {
            let app = App::new(config)?;
            println!("{}", app.menu().help());
            Ok(())
        }
        Some(Commands::Replay { script }) => cmd_replay(config, &script),
        None => {
            let mut app = App::new(config)?;
            let script = cli.autopilot.or_else(|| app.config.autopilot.clone());
            if let Some(script) = script
                && let Err(e) = app.run_autopilot(&script, &HttpFetcher::default())
            {
                warn!(error = %e, "Autopilot failed");
                eprintln!("Warning: Autopilot failed: {e}");
            }
            tui::run(app)
        }
    }
}

fn cmd_replay(config: Config, script: &str) -> Result<()> {
    let mut app = App::new(config)?;
    let report = app
        .run_autopilot(script, &HttpFetcher::default())
        .context("Failed to replay command string")?;

    println!(
        "Replayed {} token(s), skipped {}.",
        report.executed, report.skipped
    );
    let active = app.workspace.active_layer();
    for (i, layer) in app.workspace.layers().iter().enumerate() {
        let index = i + 1;
        let marker = if active == Some(index) { '*' } else { ' ' };
        println!(
            "{marker} {index}: {} feature(s), color {}",
            layer.features.len(),
            layer.style.color
        );
    }
    if let Some(path) = app.workspace.last_export() {
        println!("Last export: {}", path.display());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parsing() {
        let cli = Cli::parse_from(["karte"]);
        assert!(cli.command.is_none());
        assert!(cli.config.is_none());
    }

    #[test]
    fn test_cli_replay_command() -> Result<(), Box<dyn std::error::Error>> {
        let cli = Cli::parse_from(["karte", "replay", "i l", "--config", "/tmp/k.json"]);
        match cli.command {
            Some(Commands::Replay { script }) => assert_eq!(script, "i l"),
            _ => return Err("Expected Replay command".into()),
        }
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/k.json")));
        Ok(())
    }

    #[test]
    fn test_cli_autopilot_flag() {
        let cli = Cli::parse_from(["karte", "--autopilot", "h"]);
        assert_eq!(cli.autopilot.as_deref(), Some("h"));
    }
}
