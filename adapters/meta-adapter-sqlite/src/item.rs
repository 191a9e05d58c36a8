//! Content items

use sqlx::sqlite::SqliteRow;
use sqlx::{QueryBuilder, Row, Sqlite, SqlitePool};

use crate::utils::*;
use outbound_types::meta_adapter::{ContentQuery, CreateItemData, Item, ItemType, UpdateItemData};
use outbound_types::prelude::*;
use outbound_types::utils::random_id;

const ITEM_SELECT: &str = "SELECT id, user_id, organization_id, title, description, type, \
	media_url, slug, created_at, updated_at FROM items";

fn item_from_row(row: &SqliteRow) -> Result<Item, sqlx::Error> {
	let typ: &str = row.try_get("type")?;
	Ok(Item {
		id: row.try_get::<&str, _>("id")?.into(),
		user_id: UserId::new(row.try_get::<&str, _>("user_id")?),
		organization_id: row.try_get::<Option<&str>, _>("organization_id")?.map(OrgId::new),
		title: row.try_get::<&str, _>("title")?.into(),
		description: row.try_get::<Option<&str>, _>("description")?.map(Into::into),
		typ: ItemType::parse(typ).ok_or_else(|| decode_err("type", typ))?,
		media_url: row.try_get::<Option<&str>, _>("media_url")?.map(Into::into),
		slug: row.try_get::<&str, _>("slug")?.into(),
		created_at: Timestamp(row.try_get("created_at")?),
		updated_at: Timestamp(row.try_get("updated_at")?),
	})
}

pub(crate) async fn list(db: &SqlitePool, content: &ContentQuery) -> OiResult<Vec<Item>> {
	let mut query = push_content_where(QueryBuilder::new(ITEM_SELECT), content, "title");
	query.push(" ORDER BY created_at DESC, id");

	let rows = query.build().fetch_all(db).await.map_err(db_err)?;
	collect_res(rows.iter().map(item_from_row))
}

pub(crate) async fn read(db: &SqlitePool, content: &ContentQuery) -> OiResult<Item> {
	let mut query = push_content_where(QueryBuilder::new(ITEM_SELECT), content, "title");
	query.push(" LIMIT 1");

	let res = query.build().fetch_one(db).await;
	map_res(res, |row| item_from_row(&row))
}

pub(crate) async fn create(
	db: &SqlitePool,
	owner_id: &UserId,
	data: &CreateItemData<'_>,
) -> OiResult<Item> {
	let id = random_id();
	sqlx::query(
		"INSERT INTO items (id, user_id, organization_id, title, description, type, media_url, slug)
		VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
	)
	.bind(&id)
	.bind(owner_id.as_str())
	.bind(data.organization_id.map(OrgId::as_str))
	.bind(data.title)
	.bind(data.description)
	.bind(data.typ.as_str())
	.bind(data.media_url)
	.bind(data.slug)
	.execute(db)
	.await
	.map_err(db_err)?;

	read(db, &ContentQuery::for_owner(owner_id).with_id(&id)).await
}

pub(crate) async fn update(
	db: &SqlitePool,
	content: &ContentQuery,
	data: &UpdateItemData<'_>,
) -> OiResult<Item> {
	let mut query: QueryBuilder<Sqlite> = QueryBuilder::new("UPDATE items SET updated_at = unixepoch()");
	if let Some(title) = data.title {
		query.push(", title = ").push_bind(title);
	}
	if let Some(description) = data.description {
		query.push(", description = ").push_bind(description);
	}
	if let Some(typ) = data.typ {
		query.push(", type = ").push_bind(typ.as_str());
	}
	if let Some(media_url) = data.media_url {
		query.push(", media_url = ").push_bind(media_url);
	}
	let mut query = push_content_where(query, content, "title");

	let res = query.build().execute(db).await.map_err(db_err)?;
	expect_affected(res.rows_affected())?;
	read(db, content).await
}

pub(crate) async fn delete(db: &SqlitePool, content: &ContentQuery) -> OiResult<()> {
	let mut query = push_content_where(QueryBuilder::new("DELETE FROM items"), content, "title");
	let res = query.build().execute(db).await.map_err(db_err)?;
	expect_affected(res.rows_affected())
}

// vim: ts=4
