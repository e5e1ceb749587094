//! Runtime configuration resolved from CLI flags and `BACKOFFICE_*` variables.
//!
//! # Storage Structure
//!
//! ```text
//! ~/.backoffice/
//! ├── backoffice.db   # grid tables and the entity mirror
//! ├── queries.json    # named grid queries (optional)
//! └── .env            # environment overrides (optional)
//! ```

use std::path::{Path, PathBuf};

use tracing::debug;
use url::Url;

use backoffice_datatables::QueryCatalog;
use backoffice_models::FieldCatalog;
use backoffice_persistence::read_json;

use crate::cli::Cli;
use crate::error::Result;

/// Default data directory name under home.
const DEFAULT_DATA_DIR: &str = ".backoffice";

const DATABASE_FILE: &str = "backoffice.db";
const QUERIES_FILE: &str = "queries.json";

/// Returns the default data directory: `~/.backoffice`, or `.backoffice`
/// in the current directory when no home directory is known.
pub fn default_data_dir() -> PathBuf {
    dirs::home_dir()
        .map(|h| h.join(DEFAULT_DATA_DIR))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR))
}

/// Settings shared by every command.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub data_dir: PathBuf,
    pub database: PathBuf,
    /// Replacement field catalog; the built-in one is used when `None`.
    pub catalog_file: Option<PathBuf>,
    pub queries_file: PathBuf,
    pub notify_url: Option<Url>,
}

impl AppConfig {
    /// Creates a configuration rooted at `data_dir` with default file names.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        let data_dir = data_dir.into();
        Self {
            database: data_dir.join(DATABASE_FILE),
            queries_file: data_dir.join(QUERIES_FILE),
            catalog_file: None,
            notify_url: None,
            data_dir,
        }
    }

    /// Resolves the configuration from parsed CLI arguments.
    pub fn from_cli(cli: &Cli) -> Self {
        let mut config = Self::new(cli.data_dir.clone().unwrap_or_else(default_data_dir));
        if let Some(database) = &cli.database {
            config.database = database.clone();
        }
        if let Some(queries) = &cli.queries {
            config.queries_file = queries.clone();
        }
        config.catalog_file = cli.catalog.clone();
        config.notify_url = cli.notify_url.clone();
        config
    }

    /// Path of the optional `.env` file inside the data directory.
    pub fn env_file(data_dir: &Path) -> PathBuf {
        data_dir.join(".env")
    }

    /// Loads the field catalog, validating every field expression.
    pub fn load_catalog(&self) -> Result<FieldCatalog> {
        let catalog = match &self.catalog_file {
            Some(path) => {
                debug!(path = %path.display(), "loading field catalog");
                read_json::<FieldCatalog>(path)?
            }
            None => FieldCatalog::builtin(),
        };
        catalog.validate()?;
        Ok(catalog)
    }

    /// Loads named grid queries; a missing file yields an empty catalog.
    pub fn load_queries(&self) -> Result<QueryCatalog> {
        Ok(QueryCatalog::load(&self.queries_file)?)
    }
}
