//! Command implementations.

pub mod config;
pub mod ingest;
pub mod locations;
pub mod search;

pub use self::config::execute_config;
pub use self::ingest::execute_ingest;
pub use self::locations::execute_locations;
pub use self::search::execute_search;

use crate::config::Config;
use crate::error::Result;
use pantry_store::SqliteStore;
use std::fs;

/// Open the configured database, creating its directory if needed.
pub fn open_store(config: &Config) -> Result<SqliteStore> {
    let path = config.database_path()?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    tracing::debug!(path = %path.display(), "Opening database");
    Ok(SqliteStore::new(&path)?)
}
