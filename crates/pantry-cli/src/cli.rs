//! CLI command definitions and argument parsing.

use clap::{Parser, Subcommand};
use pantry_domain::{Label, NutrientKey, Store};
use std::path::PathBuf;

/// Pantry - Build and search a unified grocery product catalog.
#[derive(Debug, Parser)]
#[command(name = "pantry")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Output format
    #[arg(short, long, value_enum, global = true)]
    pub format: Option<CliFormat>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Log per-record detail
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Output format options.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum CliFormat {
    /// Table format (default)
    Table,
    /// JSON format
    Json,
    /// Quiet format (names or counts only)
    Quiet,
}

/// CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Extract, reconcile and store scraped product data
    Ingest(IngestArgs),

    /// Add physical store locations
    Locations(LocationsArgs),

    /// Search stored products
    Search(SearchArgs),

    /// Inspect or create the configuration file
    Config(ConfigArgs),
}

/// Arguments for the ingest command.
#[derive(Debug, Parser)]
pub struct IngestArgs {
    /// JSON array of scraped product pages
    #[arg(short, long)]
    pub pages: Option<PathBuf>,

    /// Tabular retailer export as STORE=FILE (JSON array of row objects)
    #[arg(short, long, value_parser = parse_export)]
    pub export: Vec<(Store, PathBuf)>,

    /// JSON object mapping labels to curated exemplar product names
    #[arg(short, long)]
    pub reference: Option<PathBuf>,

    /// Also emit the curated exemplars as label-listing records of this store
    #[arg(long, requires = "reference")]
    pub reference_store: Option<Store>,

    /// Reconcile and report without writing to the database
    #[arg(long)]
    pub dry_run: bool,
}

/// Arguments for the locations command.
#[derive(Debug, Parser)]
pub struct LocationsArgs {
    /// JSON file containing locations
    #[arg(long)]
    pub file: Option<PathBuf>,

    /// JSON array of locations from stdin
    #[arg(long)]
    pub stdin: bool,
}

/// Arguments for the search command.
#[derive(Debug, Parser)]
pub struct SearchArgs {
    /// Words that must all appear in the product name
    pub name: Option<String>,

    /// Upper nutrient bound as NUTRIENT=VALUE (e.g. sodium=200)
    #[arg(long = "max", value_parser = parse_nutrient_bound)]
    pub max: Vec<(NutrientKey, f64)>,

    /// Lower nutrient bound as NUTRIENT=VALUE (e.g. protein=10)
    #[arg(long = "min", value_parser = parse_nutrient_bound)]
    pub min: Vec<(NutrientKey, f64)>,

    /// Required dietary label (repeatable)
    #[arg(short, long)]
    pub label: Vec<Label>,

    /// Restrict to a store (repeatable)
    #[arg(short, long)]
    pub store: Vec<Store>,

    /// Ingredient words that must all appear
    #[arg(long)]
    pub contains: Option<String>,

    /// Ingredient words that must not appear
    #[arg(long)]
    pub exclude: Option<String>,

    /// Store location zipcode prefix
    #[arg(short, long)]
    pub zipcode: Option<String>,
}

/// Arguments for configuration management.
#[derive(Debug, Parser)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

/// Configuration actions.
#[derive(Debug, Subcommand)]
pub enum ConfigAction {
    /// Print the effective configuration
    Show,

    /// Print the configuration file path
    Path,

    /// Write a default configuration file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

impl From<CliFormat> for crate::config::OutputFormat {
    fn from(format: CliFormat) -> Self {
        match format {
            CliFormat::Table => crate::config::OutputFormat::Table,
            CliFormat::Json => crate::config::OutputFormat::Json,
            CliFormat::Quiet => crate::config::OutputFormat::Quiet,
        }
    }
}

fn parse_export(s: &str) -> Result<(Store, PathBuf), String> {
    let (store, path) = s
        .split_once('=')
        .ok_or_else(|| format!("Invalid export '{}'. Expected 'store=path'", s))?;
    let store: Store = store.trim().parse()?;
    Ok((store, PathBuf::from(path.trim())))
}

fn parse_nutrient_bound(s: &str) -> Result<(NutrientKey, f64), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("Invalid bound '{}'. Expected 'nutrient=value'", s))?;
    let key: NutrientKey = key.trim().parse()?;
    let value: f64 = value
        .trim()
        .parse()
        .map_err(|_| format!("Invalid quantity '{}'", value.trim()))?;
    if !value.is_finite() {
        return Err(format!("Invalid quantity '{}'", value));
    }
    Ok((key, value))
}
