//! Generic data access for record types.

use std::marker::PhantomData;

use rusqlite::{params_from_iter, OptionalExtension, Transaction};
use tracing::debug;

use crate::database::Database;
use crate::entity::Entity;
use crate::error::{PersistenceError, Result};
use crate::query::{quote_ident, QueryResult, SqlQuery};

/// Storage operations the grid service needs for one record type.
///
/// Every call is its own transaction. Nothing ties two calls together, so a
/// `count` followed by a `query` may observe different data.
pub trait GenericDao<T: Entity>: Send + Sync {
    /// Loads a record by id.
    fn find(&self, id: i64) -> Result<T>;

    /// Inserts a new record or overwrites an existing one, returning the
    /// stored form (with its id assigned).
    fn merge(&self, entity: T) -> Result<T>;

    /// Deletes a stored record.
    fn remove(&self, entity: &T) -> Result<()>;

    /// Counts the rows a query returns.
    fn count(&self, query: &SqlQuery) -> Result<u64>;

    /// Fetches one page of a query along with its total row count.
    ///
    /// A negative `limit` returns every row from `offset` on.
    fn query(&self, query: &SqlQuery, offset: u64, limit: i64) -> Result<QueryResult<T>>;
}

/// SQLite implementation of [`GenericDao`].
pub struct SqliteDao<T> {
    db: Database,
    _entity: PhantomData<fn() -> T>,
}

impl<T: Entity> SqliteDao<T> {
    /// Creates the DAO, creating the table when missing.
    pub fn new(db: Database) -> Result<Self> {
        db.ensure_table::<T>()?;
        Ok(Self {
            db,
            _entity: PhantomData,
        })
    }

    fn select_by_id(tx: &Transaction<'_>, id: i64) -> Result<Option<T>> {
        let sql = format!("SELECT * FROM {} WHERE id = ?", quote_ident(T::TABLE));
        Ok(tx.query_row(&sql, [id], |row| T::from_row(row)).optional()?)
    }

    fn count_in(tx: &Transaction<'_>, query: &SqlQuery) -> Result<u64> {
        let sql = format!("SELECT COUNT(*) FROM ({})", query.sql());
        let count: i64 = tx.query_row(&sql, params_from_iter(query.params()), |r| r.get(0))?;
        Ok(count.max(0) as u64)
    }
}

impl<T: Entity> GenericDao<T> for SqliteDao<T> {
    fn find(&self, id: i64) -> Result<T> {
        self.db
            .read(|tx| Self::select_by_id(tx, id))?
            .ok_or_else(|| PersistenceError::not_found(T::TABLE, id))
    }

    fn merge(&self, mut entity: T) -> Result<T> {
        let table = quote_ident(T::TABLE);
        let columns: Vec<String> = T::COLUMNS.iter().map(|c| quote_ident(c)).collect();
        let mut values = entity.values();

        self.db.write(|tx| {
            let id = match entity.id() {
                Some(id) => {
                    let updates = columns
                        .iter()
                        .map(|c| format!("{c} = excluded.{c}"))
                        .collect::<Vec<_>>()
                        .join(", ");
                    let sql = format!(
                        "INSERT INTO {table} (id, {}) VALUES (?, {}) ON CONFLICT(id) DO UPDATE SET {updates}",
                        columns.join(", "),
                        placeholders(columns.len()),
                    );
                    values.insert(0, id.into());
                    tx.execute(&sql, params_from_iter(values.iter()))?;
                    id
                }
                None => {
                    let sql = format!(
                        "INSERT INTO {table} ({}) VALUES ({})",
                        columns.join(", "),
                        placeholders(columns.len()),
                    );
                    tx.execute(&sql, params_from_iter(values.iter()))?;
                    tx.last_insert_rowid()
                }
            };

            entity.set_id(id);
            debug!(table = T::TABLE, id, "merged record");
            Self::select_by_id(tx, id)?.ok_or_else(|| PersistenceError::not_found(T::TABLE, id))
        })
    }

    fn remove(&self, entity: &T) -> Result<()> {
        let id = entity
            .id()
            .ok_or_else(|| PersistenceError::not_found(T::TABLE, "<unsaved>"))?;
        let sql = format!("DELETE FROM {} WHERE id = ?", quote_ident(T::TABLE));

        let removed = self.db.write(|tx| Ok(tx.execute(&sql, [id])?))?;
        if removed == 0 {
            return Err(PersistenceError::not_found(T::TABLE, id));
        }
        debug!(table = T::TABLE, id, "removed record");
        Ok(())
    }

    fn count(&self, query: &SqlQuery) -> Result<u64> {
        self.db.read(|tx| Self::count_in(tx, query))
    }

    fn query(&self, query: &SqlQuery, offset: u64, limit: i64) -> Result<QueryResult<T>> {
        self.db.read(|tx| {
            let total = Self::count_in(tx, query)?;

            let sql = format!("{} LIMIT ? OFFSET ?", query.sql());
            let mut params = query.params().to_vec();
            params.push(limit.into());
            params.push((offset.min(i64::MAX as u64) as i64).into());

            let mut stmt = tx.prepare(&sql)?;
            let data = stmt
                .query_map(params_from_iter(params.iter()), |row| T::from_row(row))?
                .collect::<rusqlite::Result<Vec<T>>>()?;

            Ok(QueryResult { data, total })
        })
    }
}

fn placeholders(n: usize) -> String {
    vec!["?"; n].join(", ")
}
