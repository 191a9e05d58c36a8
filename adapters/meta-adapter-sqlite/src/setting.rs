//! Platform settings record
//!
//! A single row (id = 1) holding the settings object as JSON. The row is created
//! on the first save.

use sqlx::{Row, SqlitePool};

use crate::utils::*;
use outbound_types::prelude::*;

pub(crate) async fn read(db: &SqlitePool) -> OiResult<Option<serde_json::Value>> {
	let row = sqlx::query("SELECT value FROM platform_settings WHERE id = 1")
		.fetch_optional(db)
		.await
		.map_err(db_err)?;

	let Some(row) = row else {
		return Ok(None);
	};
	let value: String = row.try_get("value").map_err(db_err)?;
	let value = serde_json::from_str(&value).map_err(|err| {
		warn!("Stored platform settings are not valid JSON: {}", err);
		Error::DbError
	})?;
	Ok(Some(value))
}

pub(crate) async fn write(db: &SqlitePool, value: &serde_json::Value) -> OiResult<()> {
	let value = serde_json::to_string(value)?;
	sqlx::query(
		"INSERT INTO platform_settings (id, value, updated_at) VALUES (1, ?1, unixepoch())
		ON CONFLICT(id) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
	)
	.bind(value)
	.execute(db)
	.await
	.map_err(db_err)?;

	Ok(())
}

// vim: ts=4
