//! Locations command implementation.

use crate::cli::LocationsArgs;
use crate::commands::open_store;
use crate::config::Config;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use pantry_domain::traits::ProductStore;
use pantry_domain::{Store, StoreLocation};
use serde::Deserialize;
use std::fs;
use std::io::{self, Read};

/// Execute the locations command.
pub fn execute_locations(args: LocationsArgs, config: &Config, formatter: &Formatter) -> Result<()> {
    let json_data = if args.stdin {
        let mut buffer = String::new();
        io::stdin().read_to_string(&mut buffer)?;
        buffer
    } else if let Some(file_path) = args.file {
        fs::read_to_string(file_path)?
    } else {
        return Err(CliError::InvalidInput(
            "Must specify either --file or --stdin".to_string(),
        ));
    };

    let locations = parse_locations(&json_data)?;

    let mut store = open_store(config)?;
    let count = store.add_locations(&locations)?;

    println!("{}", formatter.success(&format!("Added {} location(s)", count)));

    Ok(())
}

/// Parse a JSON array of locations.
pub fn parse_locations(json_data: &str) -> Result<Vec<StoreLocation>> {
    let defs: Vec<LocationDefinition> = serde_json::from_str(json_data)?;

    if defs.is_empty() {
        return Err(CliError::InvalidInput("No locations provided".to_string()));
    }

    defs.into_iter().map(LocationDefinition::into_location).collect()
}

/// Location definition for JSON input.
#[derive(Debug, Deserialize)]
struct LocationDefinition {
    store: String,
    address: String,
    #[serde(default)]
    city: String,
    #[serde(default)]
    state: String,
    zipcode: String,
}

impl LocationDefinition {
    fn into_location(self) -> Result<StoreLocation> {
        let store: Store = self.store.parse().map_err(CliError::InvalidInput)?;
        let zipcode = self.zipcode.trim().to_string();
        if zipcode.is_empty() {
            return Err(CliError::InvalidInput(format!(
                "Location '{}' has no zipcode",
                self.address
            )));
        }

        Ok(StoreLocation {
            store,
            address: self.address.trim().to_string(),
            city: self.city.trim().to_string(),
            state: self.state.trim().to_string(),
            zipcode,
        })
    }
}
