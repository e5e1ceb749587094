//! Persistence layer for the staffing back-office.
//!
//! Provides the storage collaborators used by the grid and workflow crates:
//! - [`GenericDao`] with a SQLite implementation, one transaction per call
//! - [`EntityLookup`] / [`ModifiedEntitySource`] backed by a local mirror
//! - JSON helpers for configuration files
//!
//! # Example
//!
//! ```no_run
//! use backoffice_models::Candidate;
//! use backoffice_persistence::{Database, GenericDao, SqliteDao};
//!
//! let db = Database::open_in_memory().unwrap();
//! let dao: SqliteDao<Candidate> = SqliteDao::new(db).unwrap();
//!
//! let saved = dao.merge(Candidate::new("Ada Smith", "ada@example.com")).unwrap();
//! let loaded = dao.find(saved.id.unwrap()).unwrap();
//! ```

pub mod dao;
pub mod database;
pub mod entity;
pub mod error;
pub mod files;
pub mod lookup;
pub mod query;

pub use dao::{GenericDao, SqliteDao};
pub use database::{Database, FOLD_FUNCTION};
pub use entity::{timestamp_text, Entity};
pub use error::{PersistenceError, Result};
pub use files::{read_json, read_json_optional, write_json_atomic};
pub use lookup::{EntityLookup, ModifiedEntitySource, SqliteEntityStore};
pub use query::{quote_ident, QueryResult, SqlQuery};

/// Value type bound to SQL parameters.
pub use rusqlite::types::Value as SqlValue;
