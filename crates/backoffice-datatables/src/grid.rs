//! Type-erased grids addressed by name.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{DataTablesError, Result};
use crate::request::{GridRequest, GridResponse};
use crate::service::{DataTable, DataTablesService};

/// A grid whose records travel as JSON.
pub trait Grid: Send + Sync {
    fn name(&self) -> &str;
    fn page(&self, request: &GridRequest) -> Result<GridResponse<Value>>;
    fn find(&self, id: i64) -> Result<Value>;
    fn add(&self, record: Value) -> Result<Value>;
    fn update(&self, id: i64, record: Value) -> Result<Value>;
    fn remove(&self, id: i64) -> Result<()>;
}

impl<D> Grid for DataTablesService<D>
where
    D: DataTable,
    D::Record: DeserializeOwned,
{
    fn name(&self) -> &str {
        DataTablesService::name(self)
    }

    fn page(&self, request: &GridRequest) -> Result<GridResponse<Value>> {
        self.get_page(request)?
            .try_map(serde_json::to_value)
            .map_err(Into::into)
    }

    fn find(&self, id: i64) -> Result<Value> {
        Ok(serde_json::to_value(DataTablesService::find(self, id)?)?)
    }

    fn add(&self, record: Value) -> Result<Value> {
        let record: D::Record = serde_json::from_value(record)?;
        Ok(serde_json::to_value(DataTablesService::add(self, record)?)?)
    }

    fn update(&self, id: i64, record: Value) -> Result<Value> {
        let record: D::Record = serde_json::from_value(record)?;
        Ok(serde_json::to_value(DataTablesService::update(
            self, id, record,
        )?)?)
    }

    fn remove(&self, id: i64) -> Result<()> {
        DataTablesService::remove(self, id)
    }
}

/// Grids keyed by name. Built at start-up, read-only afterwards.
#[derive(Clone, Default)]
pub struct GridRegistry {
    grids: BTreeMap<String, Arc<dyn Grid>>,
}

impl GridRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a grid, replacing any grid registered under the same name.
    pub fn register(mut self, grid: impl Grid + 'static) -> Self {
        self.grids.insert(grid.name().to_string(), Arc::new(grid));
        self
    }

    pub fn get(&self, name: &str) -> Result<Arc<dyn Grid>> {
        self.grids
            .get(name)
            .cloned()
            .ok_or_else(|| DataTablesError::NotFound(format!("grid '{name}'")))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.grids.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.grids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.grids.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use backoffice_models::Candidate;
    use backoffice_persistence::{Database, SqliteDao};
    use serde_json::json;

    use crate::tables::CandidateTable;

    fn registry() -> GridRegistry {
        let dao = SqliteDao::<Candidate>::new(Database::open_in_memory().unwrap()).unwrap();
        let service = DataTablesService::new(CandidateTable, Arc::new(dao)).unwrap();
        GridRegistry::new().register(service)
    }

    #[test]
    fn test_lookup_by_name() {
        let registry = registry();
        assert_eq!(registry.names().collect::<Vec<_>>(), vec!["candidates"]);
        assert!(registry.get("candidates").is_ok());
        assert!(matches!(registry.get("invoices"), Err(DataTablesError::NotFound(_))));
    }

    #[test]
    fn test_json_round_trip_through_grid() {
        let grid = registry().get("candidates").unwrap();

        let saved = grid
            .add(json!({"name": "Ada Smith", "email": "ada@example.com", "status": "Active"}))
            .unwrap();
        let id = saved["id"].as_i64().unwrap();
        assert_eq!(grid.find(id).unwrap()["name"], "Ada Smith");

        let updated = grid
            .update(id, json!({"name": "Ada King", "email": "ada@example.com"}))
            .unwrap();
        assert_eq!(updated["name"], "Ada King");
        assert_eq!(updated["id"], id);

        let page = grid.page(&GridRequest::new()).unwrap();
        assert_eq!(page.total_records, 1);
        assert_eq!(page.data[0]["email"], "ada@example.com");

        grid.remove(id).unwrap();
        assert!(matches!(grid.find(id), Err(DataTablesError::NotFound(_))));
    }

    #[test]
    fn test_malformed_record() {
        let grid = registry().get("candidates").unwrap();
        let err = grid.add(json!({"email": 3})).unwrap_err();
        assert!(matches!(err, DataTablesError::InvalidRecord(_)));
    }
}
