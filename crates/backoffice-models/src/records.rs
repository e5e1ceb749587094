//! Locally stored records shown in the back-office grids.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A candidate row.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    /// Primary key; `None` until persisted.
    #[serde(default)]
    pub id: Option<i64>,
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub owner: Option<String>,
    #[serde(default)]
    pub date_last_modified: Option<DateTime<Utc>>,
}

impl Candidate {
    /// Creates an unsaved candidate.
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            status: "New Lead".to_string(),
            ..Default::default()
        }
    }
}

/// A job order row.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JobOrder {
    #[serde(default)]
    pub id: Option<i64>,
    pub title: String,
    #[serde(default)]
    pub employment_type: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub client_corporation: Option<String>,
    #[serde(default)]
    pub date_last_modified: Option<DateTime<Utc>>,
}

impl JobOrder {
    /// Creates an unsaved job order.
    pub fn new(title: impl Into<String>, employment_type: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            employment_type: employment_type.into(),
            status: "Open".to_string(),
            ..Default::default()
        }
    }
}
