//! Shared utilities for SQLite adapter
//!
//! Error mapping and query building helpers used across all domain modules.

use outbound_types::meta_adapter::ContentQuery;
use outbound_types::prelude::*;
use sqlx::sqlite::SqliteRow;
use sqlx::{QueryBuilder, Sqlite};

/// Build an IN clause with parameterized values
pub(crate) fn push_in<'a>(
	mut query: QueryBuilder<'a, Sqlite>,
	values: &'a [impl AsRef<str>],
) -> QueryBuilder<'a, Sqlite> {
	query.push("(");
	for (i, value) in values.iter().enumerate() {
		if i > 0 {
			query.push(", ");
		}
		query.push_bind(value.as_ref());
	}
	query.push(")");
	query
}

/// Append an organization restriction on `column` as an AND clause
pub(crate) fn push_org_filter<'a>(
	mut query: QueryBuilder<'a, Sqlite>,
	column: &'static str,
	filter: &'a OrgFilter,
) -> QueryBuilder<'a, Sqlite> {
	match filter {
		OrgFilter::Unrestricted => query,
		OrgFilter::AnyOf(ids) if ids.is_empty() => {
			query.push(" AND 0");
			query
		}
		OrgFilter::AnyOf(ids) => {
			query.push(" AND ").push(column).push(" IN ");
			push_in(query, &ids[..])
		}
	}
}

/// Append the WHERE clause of a content query. `search` is the column `q` matches.
pub(crate) fn push_content_where<'a>(
	mut query: QueryBuilder<'a, Sqlite>,
	content: &'a ContentQuery,
	search: &'static str,
) -> QueryBuilder<'a, Sqlite> {
	query.push(" WHERE user_id = ").push_bind(content.owner_id.as_str());
	if let Some(id) = &content.id {
		query.push(" AND id = ").push_bind(id.as_ref());
	}
	if let Some(q) = &content.q {
		query.push(" AND ").push(search).push(" LIKE '%' || ").push_bind(q.as_ref()).push(" || '%'");
	}
	push_org_filter(query, "organization_id", &content.org_filter)
}

/// Error for a column value that does not parse into its domain type
pub(crate) fn decode_err(column: &str, value: &str) -> sqlx::Error {
	sqlx::Error::Decode(format!("invalid {}: {}", column, value).into())
}

/// Log database error for debugging
pub(crate) fn inspect(err: &sqlx::Error) {
	warn!("DB: {:#?}", err);
}

/// Map any query error to `Error::DbError`, logging it
pub(crate) fn db_err(err: sqlx::Error) -> Error {
	inspect(&err);
	Error::DbError
}

/// Map a single-row query result, translating SQL errors to OiResult
pub(crate) fn map_res<T, F>(row: Result<SqliteRow, sqlx::Error>, f: F) -> OiResult<T>
where
	F: FnOnce(SqliteRow) -> Result<T, sqlx::Error>,
{
	match row {
		Ok(row) => f(row).inspect_err(inspect).map_err(|_| Error::DbError),
		Err(sqlx::Error::RowNotFound) => Err(Error::NotFound),
		Err(err) => {
			inspect(&err);
			Err(Error::DbError)
		}
	}
}

/// Collect an iterator of query results, translating errors
pub(crate) fn collect_res<T>(
	iter: impl Iterator<Item = Result<T, sqlx::Error>> + Unpin,
) -> OiResult<Vec<T>> {
	let mut items = Vec::new();
	for item in iter {
		items.push(item.inspect_err(inspect).map_err(|_| Error::DbError)?);
	}
	Ok(items)
}

/// Zero affected rows means the target did not match
pub(crate) fn expect_affected(rows_affected: u64) -> OiResult<()> {
	if rows_affected == 0 { Err(Error::NotFound) } else { Ok(()) }
}

// vim: ts=4
