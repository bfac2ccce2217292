//! Pantry CLI - build and search a unified grocery product catalog.

use clap::Parser;
use pantry_cli::commands;
use pantry_cli::{Cli, Command, Config, Formatter};
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Log to stderr, filtered by `PANTRY_LOG` (default `info`); `-v` forces debug.
fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_env("PANTRY_LOG").unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .init();
}

fn run(cli: Cli) -> pantry_cli::Result<()> {
    let config_path = match cli.config {
        Some(path) => path,
        None => Config::path()?,
    };
    let config = Config::load_from(&config_path)?;

    // Determine output format
    let format = cli
        .format
        .map(Into::into)
        .unwrap_or(config.settings.format);

    // Determine color setting
    let color_enabled = !cli.no_color && config.settings.color;

    let formatter = Formatter::new(format, color_enabled);

    match cli.command {
        Command::Ingest(args) => commands::execute_ingest(args, &config, &formatter)?,
        Command::Locations(args) => commands::execute_locations(args, &config, &formatter)?,
        Command::Search(args) => commands::execute_search(args, &config, &formatter)?,
        Command::Config(args) => commands::execute_config(args, &config, &config_path, &formatter)?,
    }

    Ok(())
}
