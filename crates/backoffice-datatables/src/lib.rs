//! Server-side paging, sorting and searching for back-office grids.
//!
//! A grid is a [`DataTable`] (columns, base query, validation) wrapped in a
//! [`DataTablesService`] that turns [`GridRequest`] parameters into a
//! parameterized query against a [`GenericDao`](backoffice_persistence::GenericDao).
//! Services are erased to [`Grid`] and collected in a [`GridRegistry`] for
//! the HTTP layer.

pub mod builder;
pub mod column;
pub mod error;
pub mod grid;
pub mod named;
pub mod request;
pub mod service;
pub mod tables;

pub use builder::{escape_like, filtered_query};
pub use column::{Column, ColumnConfiguration};
pub use error::{DataTablesError, Result};
pub use grid::{Grid, GridRegistry};
pub use named::QueryCatalog;
pub use request::{GridRequest, GridResponse, SortDirection};
pub use service::{DataTable, DataTablesService};
pub use tables::{CandidateTable, JobOrderTable, JOB_ORDER_QUERY_KEY};
