//! Audit log

use sqlx::{Row, SqlitePool};

use crate::utils::*;
use outbound_types::meta_adapter::AuditLogEntry;
use outbound_types::prelude::*;

pub(crate) async fn create(db: &SqlitePool, entry: &AuditLogEntry) -> OiResult<()> {
	let metadata = serde_json::to_string(&entry.metadata)?;
	sqlx::query(
		"INSERT INTO audit_logs (user_id, action, ip_address, device, metadata, created_at)
		VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
	)
	.bind(entry.user_id.as_str())
	.bind(entry.action.as_ref())
	.bind(entry.ip_address.as_deref())
	.bind(entry.device.as_deref())
	.bind(metadata)
	.bind(entry.created_at.0)
	.execute(db)
	.await
	.map_err(db_err)?;

	Ok(())
}

/// Newest entries first, optionally restricted to one user
pub(crate) async fn list(
	db: &SqlitePool,
	user_id: Option<&UserId>,
	limit: u32,
) -> OiResult<Vec<AuditLogEntry>> {
	let rows = sqlx::query(
		"SELECT user_id, action, ip_address, device, metadata, created_at FROM audit_logs
		WHERE ?1 IS NULL OR user_id = ?1
		ORDER BY id DESC LIMIT ?2",
	)
	.bind(user_id.map(UserId::as_str))
	.bind(limit)
	.fetch_all(db)
	.await
	.map_err(db_err)?;

	collect_res(rows.iter().map(|row| {
		let metadata: Option<&str> = row.try_get("metadata")?;
		Ok(AuditLogEntry {
			user_id: UserId::new(row.try_get::<&str, _>("user_id")?),
			action: row.try_get::<&str, _>("action")?.into(),
			ip_address: row.try_get::<Option<&str>, _>("ip_address")?.map(Into::into),
			device: row.try_get::<Option<&str>, _>("device")?.map(Into::into),
			metadata: metadata
				.and_then(|m| serde_json::from_str(m).ok())
				.unwrap_or(serde_json::Value::Null),
			created_at: Timestamp(row.try_get("created_at")?),
		})
	}))
}

// vim: ts=4
