//! Application state shared across handlers.

use std::sync::Arc;

use backoffice_datatables::GridRegistry;
use backoffice_events::EventDispatcher;
use backoffice_models::FieldCatalog;

use crate::config::ApiConfig;

/// Application state shared across all handlers.
///
/// Everything in here is immutable after start-up or synchronises itself,
/// so handlers clone the `Arc`s freely.
#[derive(Clone)]
pub struct AppState {
    /// API configuration.
    pub config: Arc<ApiConfig>,
    /// Grids served under `/api/datatables`.
    pub grids: Arc<GridRegistry>,
    /// Event workflow dispatcher.
    pub dispatcher: Arc<EventDispatcher>,
    /// Related-entity field catalog.
    pub catalog: Arc<FieldCatalog>,
}

impl AppState {
    /// Creates a new AppState with all components.
    pub fn new(
        config: ApiConfig,
        grids: GridRegistry,
        dispatcher: Arc<EventDispatcher>,
        catalog: Arc<FieldCatalog>,
    ) -> Self {
        Self {
            config: Arc::new(config),
            grids: Arc::new(grids),
            dispatcher,
            catalog,
        }
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use std::sync::Arc;

    use backoffice_datatables::{CandidateTable, DataTablesService};
    use backoffice_events::{AuditTask, EventPipeline, LoadEntityTask};
    use backoffice_models::{Candidate, EntityType};
    use backoffice_persistence::{Database, GenericDao, SqliteDao, SqliteEntityStore};
    use chrono::Utc;
    use serde_json::json;

    /// State over an in-memory database with three candidates, one
    /// placement document and a placement pipeline.
    pub(crate) fn make_test_state() -> AppState {
        let db = Database::open_in_memory().unwrap();

        let dao = SqliteDao::<Candidate>::new(db.clone()).unwrap();
        for (name, email) in [
            ("Ada Smith", "ada@example.com"),
            ("Grace Hopper", "grace@example.com"),
            ("John Smithers", "john@example.com"),
        ] {
            dao.merge(Candidate::new(name, email)).unwrap();
        }
        let grid = DataTablesService::new(CandidateTable, Arc::new(dao)).unwrap();

        let store = SqliteEntityStore::new(db).unwrap();
        store
            .upsert(
                EntityType::Placement,
                7,
                &json!({"id": 7, "status": "Approved", "payRate": 40}),
                Utc::now(),
            )
            .unwrap();

        let catalog = Arc::new(FieldCatalog::builtin());
        let dispatcher = EventDispatcher::builder(Arc::clone(&catalog), Arc::new(store))
            .pipeline(
                EventPipeline::builder(EntityType::Placement)
                    .task(LoadEntityTask)
                    .task(AuditTask)
                    .build(),
            )
            .build();

        AppState::new(
            ApiConfig::default(),
            GridRegistry::new().register(grid),
            Arc::new(dispatcher),
            catalog,
        )
    }

    #[test]
    fn test_state_wiring() {
        let state = make_test_state();
        assert_eq!(state.grids.names().collect::<Vec<_>>(), vec!["candidates"]);
        assert_eq!(state.dispatcher.routes(), vec![EntityType::Placement]);
        assert!(!state.catalog.is_empty());
    }
}
