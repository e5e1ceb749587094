//! Turns a base query and a grid request into filtered, sorted SQL.
//!
//! The base query is wrapped as a subquery before search and sort are
//! added, so its own `OR`s, `ORDER BY` and `LIMIT` keep their meaning.

use backoffice_persistence::{quote_ident, SqlQuery, FOLD_FUNCTION};

use crate::column::ColumnConfiguration;
use crate::error::{DataTablesError, Result};
use crate::request::GridRequest;

/// Escapes `LIKE` wildcards so the term matches literally.
pub fn escape_like(term: &str) -> String {
    let mut out = String::with_capacity(term.len());
    for ch in term.chars() {
        if matches!(ch, '\\' | '%' | '_') {
            out.push('\\');
        }
        out.push(ch);
    }
    out
}

fn wrap(base: &SqlQuery) -> SqlQuery {
    let mut query = SqlQuery::new(format!("SELECT * FROM ({}) AS base", base.sql()));
    for param in base.params() {
        query = query.bind(param.clone());
    }
    query
}

/// Each searchable column gets a substring match, ORed in column order.
/// Both sides are lowercased with Unicode rules. Nothing is added for a
/// blank term or when no column is searchable.
fn apply_filter(query: &mut SqlQuery, columns: &ColumnConfiguration, request: &GridRequest) {
    let Some(term) = request.search_term() else {
        return;
    };
    let searchable: Vec<_> = columns.searchable().collect();
    if searchable.is_empty() {
        return;
    }

    query.push_sql(" WHERE (");
    let pattern = format!("%{}%", escape_like(&term.to_lowercase()));
    for (i, column) in searchable.iter().enumerate() {
        if i > 0 {
            query.push_sql(" OR ");
        }
        query.push_sql(&format!(
            "{FOLD_FUNCTION}({}) LIKE ",
            quote_ident(column.field_name())
        ));
        query.push_param(pattern.clone());
        query.push_sql(" ESCAPE '\\'");
    }
    query.push_sql(")");
}

fn apply_sort(
    query: &mut SqlQuery,
    columns: &ColumnConfiguration,
    request: &GridRequest,
) -> Result<()> {
    let column = columns
        .get(request.sort_column)
        .ok_or(DataTablesError::InvalidSortColumn(request.sort_column))?;
    query.push_sql(&format!(
        " ORDER BY {} {}",
        quote_ident(column.field_name()),
        request.direction().as_sql()
    ));
    Ok(())
}

/// Base query with the search filter and sort applied.
pub fn filtered_query(
    base: &SqlQuery,
    columns: &ColumnConfiguration,
    request: &GridRequest,
) -> Result<SqlQuery> {
    let mut query = wrap(base);
    apply_filter(&mut query, columns, request);
    apply_sort(&mut query, columns, request)?;
    Ok(query)
}
