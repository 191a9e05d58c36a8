//! Organizations owned by accounts

use sqlx::sqlite::SqliteRow;
use sqlx::{QueryBuilder, Row, Sqlite, SqlitePool};

use crate::utils::*;
use outbound_types::meta_adapter::Organization;
use outbound_types::prelude::*;
use outbound_types::utils::random_id;

fn org_from_row(row: &SqliteRow) -> Result<Organization, sqlx::Error> {
	Ok(Organization {
		id: OrgId::new(row.try_get::<&str, _>("id")?),
		owner_id: UserId::new(row.try_get::<&str, _>("owner_id")?),
		name: row.try_get::<&str, _>("name")?.into(),
		created_at: Timestamp(row.try_get("created_at")?),
	})
}

pub(crate) async fn list(
	db: &SqlitePool,
	owner_id: &UserId,
	filter: &OrgFilter,
) -> OiResult<Vec<Organization>> {
	let mut query: QueryBuilder<Sqlite> =
		QueryBuilder::new("SELECT id, owner_id, name, created_at FROM organizations WHERE owner_id = ");
	query.push_bind(owner_id.as_str());
	let mut query = push_org_filter(query, "id", filter);
	query.push(" ORDER BY created_at, id");

	let rows = query.build().fetch_all(db).await.map_err(db_err)?;
	collect_res(rows.iter().map(org_from_row))
}

pub(crate) async fn create(db: &SqlitePool, owner_id: &UserId, name: &str) -> OiResult<Organization> {
	let id = random_id();
	let res = sqlx::query(
		"INSERT INTO organizations (id, owner_id, name) VALUES (?1, ?2, ?3)
		RETURNING id, owner_id, name, created_at",
	)
	.bind(&id)
	.bind(owner_id.as_str())
	.bind(name)
	.fetch_one(db)
	.await;
	map_res(res, |row| org_from_row(&row))
}

// vim: ts=4
