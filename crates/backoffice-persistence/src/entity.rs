//! Mapping between stored rows and record types.

use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::types::{Type, Value};
use rusqlite::Row;

use backoffice_models::{Candidate, JobOrder};

/// A record type stored in its own table with an integer `id` key.
///
/// `Default` stands in for a blank prototype instance; grids derive their
/// column layout from it.
pub trait Entity: Default + Clone + Send + Sync + 'static {
    /// Table name.
    const TABLE: &'static str;
    /// Stored columns other than `id`, in the order of [`Entity::values`].
    const COLUMNS: &'static [&'static str];
    /// `CREATE TABLE IF NOT EXISTS` statement.
    const SCHEMA: &'static str;

    fn id(&self) -> Option<i64>;
    fn set_id(&mut self, id: i64);
    /// Turns the record back into an unsaved one.
    fn clear_id(&mut self);
    /// Column values, aligned with [`Entity::COLUMNS`].
    fn values(&self) -> Vec<Value>;
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self>;
}

/// Encodes a timestamp as fixed-width RFC 3339 text so that text ordering
/// matches time ordering.
pub fn timestamp_text(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn timestamp_value(ts: Option<&DateTime<Utc>>) -> Value {
    ts.map_or(Value::Null, |t| Value::Text(timestamp_text(t)))
}

fn opt_text(value: Option<&String>) -> Value {
    value.map_or(Value::Null, |s| Value::Text(s.clone()))
}

/// Reads a nullable RFC 3339 timestamp column.
pub fn read_timestamp(row: &Row<'_>, column: &str) -> rusqlite::Result<Option<DateTime<Utc>>> {
    let raw: Option<String> = row.get(column)?;
    raw.map(|s| {
        DateTime::parse_from_rfc3339(&s)
            .map(|d| d.with_timezone(&Utc))
            .map_err(|e| {
                let idx = row.as_ref().column_index(column).unwrap_or_default();
                rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e))
            })
    })
    .transpose()
}

impl Entity for Candidate {
    const TABLE: &'static str = "candidate";
    const COLUMNS: &'static [&'static str] =
        &["name", "email", "phone", "status", "owner", "date_last_modified"];
    const SCHEMA: &'static str = "CREATE TABLE IF NOT EXISTS \"candidate\" (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL,
        email TEXT NOT NULL DEFAULT '',
        phone TEXT,
        status TEXT NOT NULL DEFAULT '',
        owner TEXT,
        date_last_modified TEXT
    )";

    fn id(&self) -> Option<i64> {
        self.id
    }

    fn set_id(&mut self, id: i64) {
        self.id = Some(id);
    }

    fn clear_id(&mut self) {
        self.id = None;
    }

    fn values(&self) -> Vec<Value> {
        vec![
            Value::Text(self.name.clone()),
            Value::Text(self.email.clone()),
            opt_text(self.phone.as_ref()),
            Value::Text(self.status.clone()),
            opt_text(self.owner.as_ref()),
            timestamp_value(self.date_last_modified.as_ref()),
        ]
    }

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            name: row.get("name")?,
            email: row.get("email")?,
            phone: row.get("phone")?,
            status: row.get("status")?,
            owner: row.get("owner")?,
            date_last_modified: read_timestamp(row, "date_last_modified")?,
        })
    }
}

impl Entity for JobOrder {
    const TABLE: &'static str = "job_order";
    const COLUMNS: &'static [&'static str] = &[
        "title",
        "employment_type",
        "status",
        "client_corporation",
        "date_last_modified",
    ];
    const SCHEMA: &'static str = "CREATE TABLE IF NOT EXISTS \"job_order\" (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        title TEXT NOT NULL,
        employment_type TEXT NOT NULL DEFAULT '',
        status TEXT NOT NULL DEFAULT '',
        client_corporation TEXT,
        date_last_modified TEXT
    )";

    fn id(&self) -> Option<i64> {
        self.id
    }

    fn set_id(&mut self, id: i64) {
        self.id = Some(id);
    }

    fn clear_id(&mut self) {
        self.id = None;
    }

    fn values(&self) -> Vec<Value> {
        vec![
            Value::Text(self.title.clone()),
            Value::Text(self.employment_type.clone()),
            Value::Text(self.status.clone()),
            opt_text(self.client_corporation.as_ref()),
            timestamp_value(self.date_last_modified.as_ref()),
        ]
    }

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            title: row.get("title")?,
            employment_type: row.get("employment_type")?,
            status: row.get("status")?,
            client_corporation: row.get("client_corporation")?,
            date_last_modified: read_timestamp(row, "date_last_modified")?,
        })
    }
}
