//! Grids shipped with the back-office.

use backoffice_models::{Candidate, JobOrder};
use backoffice_persistence::SqlQuery;

use crate::column::ColumnConfiguration;
use crate::error::Result;
use crate::named::QueryCatalog;
use crate::request::GridRequest;
use crate::service::DataTable;

/// Candidate list.
#[derive(Debug, Clone, Copy, Default)]
pub struct CandidateTable;

impl DataTable for CandidateTable {
    type Record = Candidate;

    fn name(&self) -> &str {
        "candidates"
    }

    fn columns(&self, prototype: &Candidate) -> Result<ColumnConfiguration> {
        ColumnConfiguration::from_prototype(
            prototype,
            &[
                ("name", true),
                ("email", true),
                ("status", true),
                ("owner", false),
                ("date_last_modified", false),
            ],
        )
    }

    fn validate(&self, record: &Candidate) -> Vec<String> {
        let mut errors = Vec::new();
        if record.name.trim().is_empty() {
            errors.push("name is required".to_string());
        }
        if !record.email.contains('@') {
            errors.push(format!("'{}' is not an email address", record.email));
        }
        errors
    }
}

/// Key of the optional job order base query in the [`QueryCatalog`].
pub const JOB_ORDER_QUERY_KEY: &str = "job_orders";

/// Job order list. Its base query can be replaced through the query catalog.
#[derive(Debug, Clone, Default)]
pub struct JobOrderTable {
    base: Option<SqlQuery>,
}

impl JobOrderTable {
    pub fn new(queries: &QueryCatalog) -> Self {
        Self {
            base: queries.get(JOB_ORDER_QUERY_KEY).ok(),
        }
    }
}

impl DataTable for JobOrderTable {
    type Record = JobOrder;

    fn name(&self) -> &str {
        "job-orders"
    }

    fn columns(&self, prototype: &JobOrder) -> Result<ColumnConfiguration> {
        ColumnConfiguration::from_prototype(
            prototype,
            &[
                ("title", true),
                ("employment_type", true),
                ("status", true),
                ("client_corporation", true),
                ("date_last_modified", false),
            ],
        )
    }

    fn base_query(&self, _request: &GridRequest) -> SqlQuery {
        self.base
            .clone()
            .unwrap_or_else(|| SqlQuery::select_all("job_order"))
    }

    fn validate(&self, record: &JobOrder) -> Vec<String> {
        if record.title.trim().is_empty() {
            vec!["title is required".to_string()]
        } else {
            Vec::new()
        }
    }
}
