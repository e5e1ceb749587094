//! Grid request parameters and the response envelope.

use serde::{Deserialize, Serialize};

fn default_display_length() -> i64 {
    10
}

fn default_sort_direction() -> String {
    "asc".to_string()
}

/// Paging, sorting and search parameters of one grid request.
///
/// Field names follow the legacy jQuery DataTables protocol so a browser
/// grid can send its query string unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridRequest {
    /// Offset of the first row.
    #[serde(rename = "iDisplayStart", default)]
    pub display_start: u64,

    /// Page size; negative means every row.
    #[serde(rename = "iDisplayLength", default = "default_display_length")]
    pub display_length: i64,

    #[serde(rename = "iSortCol_0", alias = "iSortColumnIndex", default)]
    pub sort_column: usize,

    #[serde(
        rename = "sSortDir_0",
        alias = "sSortDirection",
        default = "default_sort_direction"
    )]
    pub sort_direction: String,

    #[serde(rename = "sSearch", default)]
    pub search: String,

    /// Opaque token echoed back in the response.
    #[serde(rename = "sEcho", default, skip_serializing_if = "Option::is_none")]
    pub echo: Option<String>,
}

impl Default for GridRequest {
    fn default() -> Self {
        Self {
            display_start: 0,
            display_length: default_display_length(),
            sort_column: 0,
            sort_direction: default_sort_direction(),
            search: String::new(),
            echo: None,
        }
    }
}

impl GridRequest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page(mut self, start: u64, length: i64) -> Self {
        self.display_start = start;
        self.display_length = length;
        self
    }

    pub fn sort(mut self, column: usize, direction: impl Into<String>) -> Self {
        self.sort_column = column;
        self.sort_direction = direction.into();
        self
    }

    pub fn search(mut self, term: impl Into<String>) -> Self {
        self.search = term.into();
        self
    }

    pub fn echo(mut self, token: impl Into<String>) -> Self {
        self.echo = Some(token.into());
        self
    }

    pub fn offset(&self) -> u64 {
        self.display_start
    }

    /// Row limit for the page query; `-1` fetches everything.
    pub fn limit(&self) -> i64 {
        if self.display_length < 0 {
            -1
        } else {
            self.display_length
        }
    }

    pub fn direction(&self) -> SortDirection {
        SortDirection::from_token(&self.sort_direction)
    }

    /// The search term exactly as sent, or `None` when it is blank.
    pub fn search_term(&self) -> Option<&str> {
        (!self.search.trim().is_empty()).then_some(self.search.as_str())
    }
}

/// Sort direction of the page query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    /// `Asc` only for the exact token `"asc"`; anything else sorts descending.
    pub fn from_token(token: &str) -> Self {
        if token == "asc" {
            SortDirection::Asc
        } else {
            SortDirection::Desc
        }
    }

    pub fn as_sql(&self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}

/// One page of a grid plus its counts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridResponse<R> {
    #[serde(rename = "sEcho", default, skip_serializing_if = "Option::is_none")]
    pub echo: Option<String>,
    /// Rows in the unfiltered base query.
    #[serde(rename = "iTotalRecords")]
    pub total_records: u64,
    /// Rows left after the search filter.
    #[serde(rename = "iTotalDisplayRecords")]
    pub total_display_records: u64,
    pub data: Vec<R>,
}

impl<R> GridResponse<R> {
    /// Converts each row, keeping the counts.
    pub fn try_map<S, E>(self, f: impl FnMut(R) -> Result<S, E>) -> Result<GridResponse<S>, E> {
        Ok(GridResponse {
            echo: self.echo,
            total_records: self.total_records,
            total_display_records: self.total_display_records,
            data: self.data.into_iter().map(f).collect::<Result<_, _>>()?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_sort_direction_exact_asc() {
        assert_eq!(SortDirection::from_token("asc"), SortDirection::Asc);
        assert_eq!(SortDirection::from_token("desc"), SortDirection::Desc);
        assert_eq!(SortDirection::from_token("ASC"), SortDirection::Desc);
        assert_eq!(SortDirection::from_token(" asc"), SortDirection::Desc);
        assert_eq!(SortDirection::from_token(""), SortDirection::Desc);
    }

    #[test]
    fn test_request_defaults() {
        let request: GridRequest = serde_json::from_value(json!({})).unwrap();
        assert_eq!(request, GridRequest::default());
        assert_eq!(request.limit(), 10);
        assert_eq!(request.direction(), SortDirection::Asc);
        assert!(request.search_term().is_none());
        assert!(GridRequest::new().search(" \t ").search_term().is_none());
    }

    #[test]
    fn test_request_aliases() {
        let request: GridRequest = serde_json::from_value(json!({
            "iDisplayStart": 20,
            "iDisplayLength": -1,
            "iSortColumnIndex": 2,
            "sSortDirection": "desc",
            "sSearch": "  smith ",
            "sEcho": "3"
        }))
        .unwrap();

        assert_eq!(request.offset(), 20);
        assert_eq!(request.limit(), -1);
        assert_eq!(request.sort_column, 2);
        assert_eq!(request.direction(), SortDirection::Desc);
        assert_eq!(request.search_term(), Some("  smith "));
        assert_eq!(request.echo.as_deref(), Some("3"));
    }

    #[test]
    fn test_negative_length_means_all() {
        assert_eq!(GridRequest::new().page(0, -5).limit(), -1);
    }

    #[test]
    fn test_response_wire_names() {
        let response = GridResponse {
            echo: None,
            total_records: 25,
            total_display_records: 3,
            data: vec![1, 2, 3],
        };
        assert_eq!(
            serde_json::to_value(&response).unwrap(),
            json!({"iTotalRecords": 25, "iTotalDisplayRecords": 3, "data": [1, 2, 3]})
        );
    }
}
