//! Named base queries loaded from configuration.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use backoffice_persistence::{read_json_optional, SqlQuery};

use crate::error::{DataTablesError, Result};

/// SQL text keyed by name, so grids can swap base queries without a rebuild.
///
/// Stored on disk as a flat JSON object: `{"open_job_orders": "SELECT ..."}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QueryCatalog {
    queries: BTreeMap<String, String>,
}

impl QueryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads a catalog file; a missing file yields an empty catalog.
    pub fn load(path: &Path) -> Result<Self> {
        Ok(read_json_optional(path)?.unwrap_or_default())
    }

    pub fn with_query(mut self, key: impl Into<String>, sql: impl Into<String>) -> Self {
        self.queries.insert(key.into(), sql.into());
        self
    }

    /// Returns the query stored under `key`.
    pub fn get(&self, key: &str) -> Result<SqlQuery> {
        self.queries
            .get(key)
            .map(|sql| SqlQuery::new(sql.as_str()))
            .ok_or_else(|| DataTablesError::NotFound(format!("query '{key}'")))
    }

    pub fn contains(&self, key: &str) -> bool {
        self.queries.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.queries.keys().map(String::as_str)
    }
}
