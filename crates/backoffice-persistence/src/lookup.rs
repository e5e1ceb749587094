//! Entity documents mirrored from the staffing platform.
//!
//! Workflow tasks look entities up by type and id with an explicit field
//! list; the date-last-modified poller asks which entities changed in a
//! time window. Both are collaborator traits so the platform client can be
//! swapped in; [`SqliteEntityStore`] answers them from a local mirror table.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use rusqlite::OptionalExtension;
use serde_json::{Map, Value};

use backoffice_models::{EntityType, FieldExpr};

use crate::database::Database;
use crate::entity::timestamp_text;
use crate::error::{PersistenceError, Result};

/// Fetches entities by id, limited to a set of field expressions.
pub trait EntityLookup: Send + Sync {
    fn fetch(&self, entity: EntityType, id: i64, fields: &BTreeSet<String>) -> Result<Value>;
}

/// Lists entities modified inside a time window.
pub trait ModifiedEntitySource: Send + Sync {
    /// Ids of `entity` rows whose last modification lies in `(after, until]`.
    fn modified_between(
        &self,
        entity: EntityType,
        after: DateTime<Utc>,
        until: DateTime<Utc>,
    ) -> Result<Vec<i64>>;
}

const SCHEMA: &str = "CREATE TABLE IF NOT EXISTS entity_document (
    entity TEXT NOT NULL,
    id INTEGER NOT NULL,
    body TEXT NOT NULL,
    date_last_modified TEXT NOT NULL,
    PRIMARY KEY (entity, id)
)";

/// Local mirror of platform entities stored as JSON documents.
#[derive(Clone)]
pub struct SqliteEntityStore {
    db: Database,
}

impl SqliteEntityStore {
    /// Creates the store, creating its table when missing.
    pub fn new(db: Database) -> Result<Self> {
        db.execute_batch(SCHEMA)?;
        Ok(Self { db })
    }

    /// Stores (or replaces) an entity document.
    pub fn upsert(
        &self,
        entity: EntityType,
        id: i64,
        body: &Value,
        modified_at: DateTime<Utc>,
    ) -> Result<()> {
        let body = serde_json::to_string(body)?;
        self.db.write(|tx| {
            tx.execute(
                "INSERT INTO entity_document (entity, id, body, date_last_modified)
                 VALUES (?1, ?2, ?3, ?4)
                 ON CONFLICT(entity, id) DO UPDATE SET
                    body = excluded.body,
                    date_last_modified = excluded.date_last_modified",
                rusqlite::params![entity.name(), id, body, timestamp_text(&modified_at)],
            )?;
            Ok(())
        })
    }

    /// Deletes an entity document. Missing documents are not an error.
    pub fn delete(&self, entity: EntityType, id: i64) -> Result<()> {
        self.db.write(|tx| {
            tx.execute(
                "DELETE FROM entity_document WHERE entity = ?1 AND id = ?2",
                rusqlite::params![entity.name(), id],
            )?;
            Ok(())
        })
    }
}

impl EntityLookup for SqliteEntityStore {
    fn fetch(&self, entity: EntityType, id: i64, fields: &BTreeSet<String>) -> Result<Value> {
        let exprs = fields
            .iter()
            .map(|f| {
                f.parse::<FieldExpr>()
                    .map_err(|e| PersistenceError::InvalidData(format!("field '{f}': {e}")))
            })
            .collect::<Result<Vec<_>>>()?;

        let body: Option<String> = self.db.read(|tx| {
            Ok(tx
                .query_row(
                    "SELECT body FROM entity_document WHERE entity = ?1 AND id = ?2",
                    rusqlite::params![entity.name(), id],
                    |r| r.get(0),
                )
                .optional()?)
        })?;

        let body = body.ok_or_else(|| PersistenceError::not_found(entity.name(), id))?;
        let document: Value = serde_json::from_str(&body)?;
        Ok(project(&document, &exprs))
    }
}

impl ModifiedEntitySource for SqliteEntityStore {
    fn modified_between(
        &self,
        entity: EntityType,
        after: DateTime<Utc>,
        until: DateTime<Utc>,
    ) -> Result<Vec<i64>> {
        self.db.read(|tx| {
            let mut stmt = tx.prepare(
                "SELECT id FROM entity_document
                 WHERE entity = ?1 AND date_last_modified > ?2 AND date_last_modified <= ?3
                 ORDER BY date_last_modified, id",
            )?;
            let ids = stmt
                .query_map(
                    rusqlite::params![entity.name(), timestamp_text(&after), timestamp_text(&until)],
                    |r| r.get(0),
                )?
                .collect::<rusqlite::Result<Vec<i64>>>()?;
            Ok(ids)
        })
    }
}

/// Keeps only the requested fields of a document.
///
/// Related fields recurse into objects (and arrays of objects); fields the
/// document lacks are left out.
pub fn project(document: &Value, fields: &[FieldExpr]) -> Value {
    match document {
        Value::Object(map) => {
            let mut out = Map::new();
            for field in fields {
                if let Some(value) = map.get(field.name()) {
                    let value = if field.is_related() {
                        project(value, field.children())
                    } else {
                        value.clone()
                    };
                    out.insert(field.name().to_string(), value);
                }
            }
            Value::Object(out)
        }
        Value::Array(items) => Value::Array(items.iter().map(|v| project(v, fields)).collect()),
        other => other.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use serde_json::json;

    fn store() -> SqliteEntityStore {
        SqliteEntityStore::new(Database::open_in_memory().unwrap()).unwrap()
    }

    fn fields(list: &[&str]) -> BTreeSet<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_project_nested_fields() {
        let doc = json!({
            "id": 1,
            "status": "Approved",
            "payRate": 40,
            "candidate": {"id": 7, "name": "Ada", "ssn": "secret"},
            "tags": [{"id": 1, "label": "x"}]
        });
        let exprs = FieldExpr::parse_list("id,status,candidate(id,name),tags(id),missing").unwrap();

        assert_eq!(
            project(&doc, &exprs),
            json!({
                "id": 1,
                "status": "Approved",
                "candidate": {"id": 7, "name": "Ada"},
                "tags": [{"id": 1}]
            })
        );
    }

    #[test]
    fn test_fetch_projects_fields() {
        let store = store();
        store
            .upsert(
                EntityType::Placement,
                5,
                &json!({"id": 5, "status": "Approved", "payRate": 40}),
                Utc::now(),
            )
            .unwrap();

        let value = store
            .fetch(EntityType::Placement, 5, &fields(&["id", "status"]))
            .unwrap();
        assert_eq!(value, json!({"id": 5, "status": "Approved"}));
    }

    #[test]
    fn test_fetch_missing_is_not_found() {
        let err = store()
            .fetch(EntityType::Placement, 1, &fields(&["id"]))
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_fetch_rejects_bad_field() {
        let store = store();
        store
            .upsert(EntityType::Candidate, 1, &json!({"id": 1}), Utc::now())
            .unwrap();
        let err = store
            .fetch(EntityType::Candidate, 1, &fields(&["owner(id"]))
            .unwrap_err();
        assert!(matches!(err, PersistenceError::InvalidData(_)));
    }

    #[test]
    fn test_modified_between_window() {
        let store = store();
        let base = Utc.with_ymd_and_hms(2024, 5, 1, 9, 0, 0).unwrap();
        for (id, minutes) in [(1, 0), (2, 10), (3, 20)] {
            store
                .upsert(
                    EntityType::BillMaster,
                    id,
                    &json!({"id": id}),
                    base + Duration::minutes(minutes),
                )
                .unwrap();
        }
        store
            .upsert(EntityType::Candidate, 9, &json!({"id": 9}), base + Duration::minutes(10))
            .unwrap();

        let ids = store
            .modified_between(EntityType::BillMaster, base, base + Duration::minutes(20))
            .unwrap();
        assert_eq!(ids, vec![2, 3]);

        store.delete(EntityType::BillMaster, 3).unwrap();
        let ids = store
            .modified_between(EntityType::BillMaster, base, base + Duration::minutes(20))
            .unwrap();
        assert_eq!(ids, vec![2]);
    }
}
