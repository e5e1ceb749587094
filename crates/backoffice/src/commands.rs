//! Command execution.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use serde_json::Value;
use tokio::sync::watch;
use tracing::{info, warn};

use backoffice_api::{ApiConfig, AppState};
use backoffice_events::{DateLastModifiedPoller, PipelineReport, WorkflowError};
use backoffice_models::{EntityType, FieldCatalog, SubscriptionEvent};
use backoffice_persistence::{read_json, write_json_atomic};

use crate::app::Backoffice;
use crate::cli::{Commands, ServeArgs};
use crate::config::AppConfig;
use crate::error::Result;

/// Executes a CLI command.
pub async fn execute(command: Commands, config: &AppConfig) -> Result<()> {
    match command {
        Commands::Serve(args) => serve(config, args).await,
        Commands::Catalog { entity, output } => {
            catalog(config, entity.as_deref(), output.as_deref())
        }
        Commands::Dispatch { file } => {
            let report = dispatch(config, &file).await?;
            println!("{}", serde_json::to_string_pretty(&report)?);
            Ok(())
        }
    }
}

async fn serve(config: &AppConfig, args: ServeArgs) -> Result<()> {
    let app = Backoffice::open(config)?;

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let mut poller = DateLastModifiedPoller::new(
        app.dlm_services(Utc::now()),
        Duration::from_secs(args.dlm_interval_secs.max(1)),
        shutdown_rx,
    );
    let poller = tokio::spawn(async move { poller.run().await });

    let api_config = ApiConfig::new(args.host, args.port)
        .with_cors_origins(args.cors_origins)
        .with_request_timeout(Duration::from_secs(args.request_timeout_secs));
    let state = AppState::new(
        api_config.clone(),
        app.grids,
        Arc::clone(&app.dispatcher),
        Arc::clone(&app.catalog),
    );

    let served = tokio::select! {
        result = backoffice_api::serve(api_config, state) => result,
        _ = tokio::signal::ctrl_c() => {
            info!("interrupt received, shutting down");
            Ok(())
        }
    };

    let _ = shutdown_tx.send(true);
    if let Err(e) = poller.await {
        warn!(error = %e, "poller task failed");
    }
    Ok(served?)
}

/// Selects the whole catalog, or one entity's related-entity field sets.
fn catalog_selection(catalog: &FieldCatalog, entity: Option<&str>) -> Result<Value> {
    match entity {
        None => Ok(serde_json::to_value(catalog)?),
        Some(name) => {
            let entity: EntityType = name.parse()?;
            let fields = catalog.related_fields(entity).cloned().unwrap_or_default();
            Ok(serde_json::to_value(fields)?)
        }
    }
}

fn catalog(config: &AppConfig, entity: Option<&str>, output: Option<&Path>) -> Result<()> {
    let catalog = config.load_catalog()?;
    let selection = catalog_selection(&catalog, entity)?;

    match output {
        Some(path) => {
            write_json_atomic(path, &selection)?;
            println!("Catalog written to {}", path.display());
        }
        None => println!("{}", serde_json::to_string_pretty(&selection)?),
    }
    Ok(())
}

/// Runs the event stored in `file` through its pipeline.
///
/// An aborted pipeline still prints its report before the error is returned.
async fn dispatch(config: &AppConfig, file: &Path) -> Result<PipelineReport> {
    let event: SubscriptionEvent = read_json(file)?;
    let app = Backoffice::open(config)?;
    let dispatcher = Arc::clone(&app.dispatcher);

    let result = tokio::task::spawn_blocking(move || dispatcher.dispatch(event)).await?;
    match result {
        Err(WorkflowError::Aborted { task, report }) => {
            eprintln!("{}", serde_json::to_string_pretty(&report)?);
            Err(WorkflowError::Aborted { task, report }.into())
        }
        other => Ok(other?),
    }
}
