//! Wiring of grids, event pipelines and pollers over one database.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::info;

use backoffice_datatables::{CandidateTable, DataTablesService, GridRegistry, JobOrderTable};
use backoffice_events::{
    AuditTask, DateLastModifiedService, EventDispatcher, EventPipeline, EventTask,
    LoadEntityTask, WebhookNotifyTask,
};
use backoffice_models::{Candidate, EntityType, FieldCatalog, JobOrder};
use backoffice_persistence::{Database, SqliteDao, SqliteEntityStore};

use crate::config::AppConfig;
use crate::error::Result;

/// Entity types without a subscription feed; their changes are found by
/// polling date-last-modified.
pub const DLM_ENTITIES: [EntityType; 1] = [EntityType::BillMaster];

/// The assembled back-office components.
pub struct Backoffice {
    pub catalog: Arc<FieldCatalog>,
    pub grids: GridRegistry,
    pub dispatcher: Arc<EventDispatcher>,
    pub store: Arc<SqliteEntityStore>,
}

impl Backoffice {
    /// Opens the configured database and wires everything on top of it.
    pub fn open(config: &AppConfig) -> Result<Self> {
        let db = Database::open(&config.database)?;
        Self::with_database(config, db)
    }

    /// Wires grids and pipelines over an already opened database.
    pub fn with_database(config: &AppConfig, db: Database) -> Result<Self> {
        let catalog = Arc::new(config.load_catalog()?);
        let queries = config.load_queries()?;
        let store = Arc::new(SqliteEntityStore::new(db.clone())?);

        let grids = GridRegistry::new()
            .register(DataTablesService::new(
                CandidateTable,
                Arc::new(SqliteDao::<Candidate>::new(db.clone())?),
            )?)
            .register(DataTablesService::new(
                JobOrderTable::new(&queries),
                Arc::new(SqliteDao::<JobOrder>::new(db)?),
            )?);

        // one notifier for every pipeline
        let notify = config
            .notify_url
            .clone()
            .map(|url| Arc::new(WebhookNotifyTask::new(url)) as Arc<dyn EventTask>);

        let mut builder = EventDispatcher::builder(Arc::clone(&catalog), store.clone());
        for entity in catalog.entity_types() {
            let mut pipeline = EventPipeline::builder(entity)
                .task(LoadEntityTask)
                .task(AuditTask);
            if let Some(task) = &notify {
                pipeline = pipeline.shared_task(Arc::clone(task));
            }
            builder = builder.pipeline(pipeline.build());
        }
        let dispatcher = Arc::new(builder.build());

        info!(
            grids = grids.len(),
            pipelines = dispatcher.routes().len(),
            "back-office wired"
        );

        Ok(Self {
            catalog,
            grids,
            dispatcher,
            store,
        })
    }

    /// One date-last-modified service per polled entity type, each starting
    /// from `since`.
    pub fn dlm_services(&self, since: DateTime<Utc>) -> Vec<Arc<DateLastModifiedService>> {
        DLM_ENTITIES
            .iter()
            .map(|&entity| {
                Arc::new(DateLastModifiedService::new(
                    entity,
                    self.store.clone(),
                    Arc::clone(&self.dispatcher),
                    since,
                ))
            })
            .collect()
    }
}
