//! Command-line interface definition using clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use url::Url;

/// Staffing back-office - grids, subscription workflows and DLM polling
#[derive(Parser, Debug)]
#[command(name = "backoffice")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Directory holding the database and configuration files
    #[arg(short, long, env = "BACKOFFICE_DATA_DIR", global = true)]
    pub data_dir: Option<PathBuf>,

    /// SQLite database file (default: <data-dir>/backoffice.db)
    #[arg(long, env = "BACKOFFICE_DATABASE", global = true)]
    pub database: Option<PathBuf>,

    /// JSON file replacing the built-in related-entity field catalog
    #[arg(long, env = "BACKOFFICE_CATALOG", global = true)]
    pub catalog: Option<PathBuf>,

    /// JSON file of named grid queries (default: <data-dir>/queries.json)
    #[arg(long, env = "BACKOFFICE_QUERIES", global = true)]
    pub queries: Option<PathBuf>,

    /// Webhook notified after every processed event
    #[arg(long, env = "BACKOFFICE_NOTIFY_URL", global = true)]
    pub notify_url: Option<Url>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the HTTP API and the date-last-modified poller
    Serve(ServeArgs),

    /// Print or export the related-entity field catalog
    Catalog {
        /// Entity name or catalog key (prints the whole catalog if omitted)
        entity: Option<String>,

        /// Write the selection to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Run a subscription event from a JSON file through its pipeline
    Dispatch {
        /// Path to the event JSON
        #[arg(required = true)]
        file: PathBuf,
    },
}

/// Options of the `serve` command.
#[derive(Args, Debug, Clone)]
pub struct ServeArgs {
    /// Host to bind to
    #[arg(long, env = "BACKOFFICE_HOST", default_value = "127.0.0.1")]
    pub host: String,

    /// Port to bind to
    #[arg(short, long, env = "BACKOFFICE_PORT", default_value = "8480")]
    pub port: u16,

    /// Per-request deadline in seconds
    #[arg(long, env = "BACKOFFICE_REQUEST_TIMEOUT_SECS", default_value = "30")]
    pub request_timeout_secs: u64,

    /// Allowed CORS origins, comma separated (`*` allows any)
    #[arg(
        long,
        env = "BACKOFFICE_CORS_ORIGINS",
        value_delimiter = ',',
        default_value = "*"
    )]
    pub cors_origins: Vec<String>,

    /// Seconds between date-last-modified polls
    #[arg(long, env = "BACKOFFICE_DLM_INTERVAL_SECS", default_value = "60")]
    pub dlm_interval_secs: u64,
}

impl Cli {
    /// Returns the log level based on verbosity.
    pub fn log_level(&self) -> tracing::Level {
        match self.verbose {
            0 => tracing::Level::WARN,
            1 => tracing::Level::INFO,
            2 => tracing::Level::DEBUG,
            _ => tracing::Level::TRACE,
        }
    }
}
