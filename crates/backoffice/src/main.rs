//! Back-office entry point.

use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

use backoffice::cli::Cli;
use backoffice::commands;
use backoffice::config::{default_data_dir, AppConfig};

#[tokio::main]
async fn main() {
    // Environment overrides: data dir .env first, then the working directory
    let _ = dotenvy::from_path(AppConfig::env_file(&default_data_dir()));
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(cli.log_level().to_string()));

    fmt().with_env_filter(filter).with_target(false).init();

    let config = AppConfig::from_cli(&cli);

    if let Err(e) = commands::execute(cli.command, &config).await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
