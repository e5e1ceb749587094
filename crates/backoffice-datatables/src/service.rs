//! Generic grid service over a [`GenericDao`].

use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info};

use backoffice_persistence::{Entity, GenericDao, SqlQuery};

use crate::builder::filtered_query;
use crate::column::ColumnConfiguration;
use crate::error::{DataTablesError, Result};
use crate::request::{GridRequest, GridResponse};

/// Per-grid customisation points.
///
/// Only `name` and `columns` are required; the rest default to "every row
/// of the table" and "always valid".
pub trait DataTable: Send + Sync + 'static {
    type Record: Entity + Serialize;

    /// Grid name used in URLs and logs.
    fn name(&self) -> &str;

    /// Derives the column layout from a blank record.
    fn columns(&self, prototype: &Self::Record) -> Result<ColumnConfiguration>;

    /// Query the grid pages over, before search and sort are applied.
    fn base_query(&self, _request: &GridRequest) -> SqlQuery {
        SqlQuery::select_all(<Self::Record as Entity>::TABLE)
    }

    /// Returns validation messages; an empty list means the record is valid.
    fn validate(&self, _record: &Self::Record) -> Vec<String> {
        Vec::new()
    }
}

/// Serves paging, search, sort and record editing for one grid.
///
/// The column configuration is derived once in [`DataTablesService::new`]
/// and never changes, so the service can be shared across threads freely.
///
/// The total count and the page are read in separate transactions. Writes
/// landing in between can make the counts disagree with the page by a few
/// rows; the grid tolerates that.
pub struct DataTablesService<D: DataTable> {
    table: D,
    dao: Arc<dyn GenericDao<D::Record>>,
    columns: ColumnConfiguration,
}

impl<D: DataTable> DataTablesService<D> {
    /// Creates the service, failing if the column configuration cannot be
    /// derived.
    pub fn new(table: D, dao: Arc<dyn GenericDao<D::Record>>) -> Result<Self> {
        let columns = table.columns(&D::Record::default())?;
        if columns.is_empty() {
            return Err(DataTablesError::ConfigurationUnavailable(format!(
                "grid '{}' defines no columns",
                table.name()
            )));
        }
        debug!(grid = table.name(), columns = columns.len(), "grid configured");
        Ok(Self {
            table,
            dao,
            columns,
        })
    }

    pub fn name(&self) -> &str {
        self.table.name()
    }

    pub fn columns(&self) -> &ColumnConfiguration {
        &self.columns
    }

    /// Returns one page of rows with the total and filtered counts.
    pub fn get_page(&self, request: &GridRequest) -> Result<GridResponse<D::Record>> {
        let base = self.table.base_query(request);
        let query = filtered_query(&base, &self.columns, request)?;

        let total_records = self.dao.count(&base)?;
        info!(grid = self.name(), sql = query.sql(), "grid query");
        let result = self
            .dao
            .query(&query, request.offset(), request.limit())?;

        Ok(GridResponse {
            echo: request.echo.clone(),
            total_records,
            total_display_records: result.total,
            data: result.data,
        })
    }

    pub fn find(&self, id: i64) -> Result<D::Record> {
        Ok(self.dao.find(id)?)
    }

    /// Validates and stores a new record.
    ///
    /// Any id on the incoming record is dropped; `add` never overwrites.
    pub fn add(&self, mut record: D::Record) -> Result<D::Record> {
        record.clear_id();
        self.check(&record)?;
        let saved = self.dao.merge(record)?;
        info!(grid = self.name(), id = ?saved.id(), "record added");
        Ok(saved)
    }

    /// Validates and overwrites an existing record.
    pub fn update(&self, id: i64, mut record: D::Record) -> Result<D::Record> {
        record.set_id(id);
        self.check(&record)?;
        self.dao.find(id)?;
        let saved = self.dao.merge(record)?;
        info!(grid = self.name(), id, "record updated");
        Ok(saved)
    }

    pub fn remove(&self, id: i64) -> Result<()> {
        let record = self.dao.find(id)?;
        self.dao.remove(&record)?;
        info!(grid = self.name(), id, "record removed");
        Ok(())
    }

    fn check(&self, record: &D::Record) -> Result<()> {
        let errors = self.table.validate(record);
        if errors.is_empty() {
            Ok(())
        } else {
            Err(DataTablesError::Validation(errors))
        }
    }
}
