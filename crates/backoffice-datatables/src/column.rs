//! Column configuration of a grid.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use crate::error::{DataTablesError, Result};

static FIELD_NAME_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("Invalid field name regex"));

/// One grid column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Column {
    field_name: String,
    searchable: bool,
}

impl Column {
    pub fn field_name(&self) -> &str {
        &self.field_name
    }

    pub fn is_searchable(&self) -> bool {
        self.searchable
    }
}

/// Ordered mapping from column index to column.
///
/// Field names are checked to be plain identifiers when added, since they
/// end up as (quoted) column references in generated SQL.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ColumnConfiguration {
    columns: BTreeMap<usize, Column>,
}

impl ColumnConfiguration {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a column at `index`, replacing any column already there.
    pub fn column(mut self, index: usize, field_name: &str, searchable: bool) -> Result<Self> {
        if !FIELD_NAME_REGEX.is_match(field_name) {
            return Err(DataTablesError::ConfigurationUnavailable(format!(
                "column {index} has invalid field name '{field_name}'"
            )));
        }
        self.columns.insert(
            index,
            Column {
                field_name: field_name.to_string(),
                searchable,
            },
        );
        Ok(self)
    }

    /// Builds a configuration from a blank record.
    ///
    /// `layout` lists `(field, searchable)` in column order. Every field must
    /// be present on the serialized prototype, so a layout that drifts from
    /// the record type fails here instead of at query time.
    pub fn from_prototype<T: Serialize>(prototype: &T, layout: &[(&str, bool)]) -> Result<Self> {
        let value = serde_json::to_value(prototype)
            .map_err(|e| DataTablesError::ConfigurationUnavailable(e.to_string()))?;
        let fields = value.as_object().ok_or_else(|| {
            DataTablesError::ConfigurationUnavailable("prototype is not a record".to_string())
        })?;

        layout
            .iter()
            .enumerate()
            .try_fold(Self::new(), |config, (index, (field, searchable))| {
                if !fields.contains_key(*field) {
                    return Err(DataTablesError::ConfigurationUnavailable(format!(
                        "record has no field '{field}'"
                    )));
                }
                config.column(index, field, *searchable)
            })
    }

    /// Returns the column at `index`.
    pub fn get(&self, index: usize) -> Option<&Column> {
        self.columns.get(&index)
    }

    /// Iterates over searchable columns in index order.
    pub fn searchable(&self) -> impl Iterator<Item = &Column> {
        self.columns.values().filter(|c| c.searchable)
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, &Column)> {
        self.columns.iter().map(|(i, c)| (*i, c))
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use backoffice_models::Candidate;

    #[test]
    fn test_column_builder() {
        let config = ColumnConfiguration::new()
            .column(1, "email", true)
            .unwrap()
            .column(0, "name", true)
            .unwrap()
            .column(2, "status", false)
            .unwrap();

        assert_eq!(config.len(), 3);
        assert_eq!(config.get(0).unwrap().field_name(), "name");
        assert_eq!(
            config.searchable().map(Column::field_name).collect::<Vec<_>>(),
            vec!["name", "email"]
        );
        assert!(config.get(3).is_none());
    }

    #[test]
    fn test_rejects_unsafe_field_name() {
        let err = ColumnConfiguration::new()
            .column(0, "name; DROP TABLE candidate", true)
            .unwrap_err();
        assert!(matches!(err, DataTablesError::ConfigurationUnavailable(_)));
        assert!(ColumnConfiguration::new().column(0, "", true).is_err());
    }

    #[test]
    fn test_from_prototype() {
        let config = ColumnConfiguration::from_prototype(
            &Candidate::default(),
            &[("name", true), ("email", true), ("status", false)],
        )
        .unwrap();
        assert_eq!(config.get(2).unwrap().field_name(), "status");
        assert!(!config.get(2).unwrap().is_searchable());
    }

    #[test]
    fn test_from_prototype_unknown_field() {
        let err = ColumnConfiguration::from_prototype(&Candidate::default(), &[("salary", false)])
            .unwrap_err();
        assert!(matches!(err, DataTablesError::ConfigurationUnavailable(_)));

        let err = ColumnConfiguration::from_prototype(&42, &[("name", true)]).unwrap_err();
        assert!(matches!(err, DataTablesError::ConfigurationUnavailable(_)));
    }
}
