//! Config command implementation.

use crate::cli::{ConfigAction, ConfigArgs};
use crate::config::{Config, OutputFormat};
use crate::error::Result;
use crate::output::Formatter;
use std::path::Path;

/// Execute the config command.
pub fn execute_config(
    args: ConfigArgs,
    config: &Config,
    path: &Path,
    formatter: &Formatter,
) -> Result<()> {
    match args.action {
        ConfigAction::Show => show_config(config, formatter),
        ConfigAction::Path => {
            println!("{}", path.display());
            Ok(())
        }
        ConfigAction::Init { force } => init_config(path, force, formatter),
    }
}

/// Print the effective configuration.
fn show_config(config: &Config, formatter: &Formatter) -> Result<()> {
    match formatter.format() {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(config)?),
        _ => print!("{}", config.to_toml()?),
    }
    Ok(())
}

/// Write a default configuration file.
fn init_config(path: &Path, force: bool, formatter: &Formatter) -> Result<()> {
    if path.exists() && !force {
        println!(
            "{}",
            formatter.warning(&format!("{} already exists (use --force to overwrite)", path.display()))
        );
        return Ok(());
    }

    Config::default().save_to(path)?;
    println!("{}", formatter.success(&format!("Wrote {}", path.display())));
    Ok(())
}
