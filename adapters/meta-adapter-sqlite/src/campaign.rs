//! Campaigns (streams)

use sqlx::sqlite::SqliteRow;
use sqlx::{QueryBuilder, Row, Sqlite, SqlitePool};

use crate::utils::*;
use outbound_types::meta_adapter::{Campaign, ContentQuery, CreateNamedData, UpdateNamedData};
use outbound_types::prelude::*;
use outbound_types::utils::random_id;

pub(crate) const CAMPAIGN_COLUMNS: &str =
	"id, user_id, organization_id, name, description, category, created_at, updated_at";

pub(crate) fn campaign_from_row(row: &SqliteRow) -> Result<Campaign, sqlx::Error> {
	Ok(Campaign {
		id: row.try_get::<&str, _>("id")?.into(),
		user_id: UserId::new(row.try_get::<&str, _>("user_id")?),
		organization_id: row.try_get::<Option<&str>, _>("organization_id")?.map(OrgId::new),
		name: row.try_get::<&str, _>("name")?.into(),
		description: row.try_get::<Option<&str>, _>("description")?.map(Into::into),
		category: row.try_get::<Option<&str>, _>("category")?.map(Into::into),
		created_at: Timestamp(row.try_get("created_at")?),
		updated_at: Timestamp(row.try_get("updated_at")?),
	})
}

fn select<'a>() -> QueryBuilder<'a, Sqlite> {
	QueryBuilder::new(format!("SELECT {} FROM campaigns", CAMPAIGN_COLUMNS))
}

pub(crate) async fn list(db: &SqlitePool, content: &ContentQuery) -> OiResult<Vec<Campaign>> {
	let mut query = push_content_where(select(), content, "name");
	query.push(" ORDER BY created_at DESC, id");

	let rows = query.build().fetch_all(db).await.map_err(db_err)?;
	collect_res(rows.iter().map(campaign_from_row))
}

pub(crate) async fn read(db: &SqlitePool, content: &ContentQuery) -> OiResult<Campaign> {
	let mut query = push_content_where(select(), content, "name");
	query.push(" LIMIT 1");

	let res = query.build().fetch_one(db).await;
	map_res(res, |row| campaign_from_row(&row))
}

pub(crate) async fn create(
	db: &SqlitePool,
	owner_id: &UserId,
	data: &CreateNamedData<'_>,
) -> OiResult<Campaign> {
	let id = random_id();
	sqlx::query(
		"INSERT INTO campaigns (id, user_id, organization_id, name, description, category)
		VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
	)
	.bind(&id)
	.bind(owner_id.as_str())
	.bind(data.organization_id.map(OrgId::as_str))
	.bind(data.name)
	.bind(data.description)
	.bind(data.category)
	.execute(db)
	.await
	.map_err(db_err)?;

	read(db, &ContentQuery::for_owner(owner_id).with_id(&id)).await
}

pub(crate) async fn update(
	db: &SqlitePool,
	content: &ContentQuery,
	data: &UpdateNamedData<'_>,
) -> OiResult<Campaign> {
	let mut query: QueryBuilder<Sqlite> =
		QueryBuilder::new("UPDATE campaigns SET updated_at = unixepoch()");
	if let Some(name) = data.name {
		query.push(", name = ").push_bind(name);
	}
	if let Some(description) = data.description {
		query.push(", description = ").push_bind(description);
	}
	if let Some(category) = data.category {
		query.push(", category = ").push_bind(category);
	}
	let mut query = push_content_where(query, content, "name");

	let res = query.build().execute(db).await.map_err(db_err)?;
	expect_affected(res.rows_affected())?;
	read(db, content).await
}

pub(crate) async fn delete(db: &SqlitePool, content: &ContentQuery) -> OiResult<()> {
	let mut query = push_content_where(QueryBuilder::new("DELETE FROM campaigns"), content, "name");
	let res = query.build().execute(db).await.map_err(db_err)?;
	expect_affected(res.rows_affected())
}

// vim: ts=4
