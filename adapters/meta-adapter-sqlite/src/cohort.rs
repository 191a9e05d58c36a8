//! Cohorts, their members and their stream assignments

use sqlx::sqlite::SqliteRow;
use sqlx::{QueryBuilder, Row, Sqlite, SqlitePool};

use crate::campaign::{CAMPAIGN_COLUMNS, campaign_from_row};
use crate::utils::*;
use outbound_types::meta_adapter::{
	Campaign, Cohort, CohortMember, ContentQuery, CreateCohortMemberData, CreateNamedData,
	UpdateNamedData,
};
use outbound_types::prelude::*;
use outbound_types::utils::{normalize_email, random_id};

const COHORT_SELECT: &str = "SELECT id, user_id, organization_id, name, description, \
	(SELECT count(*) FROM cohort_members m WHERE m.cohort_id = cohorts.id) AS member_count, \
	created_at, updated_at FROM cohorts";

fn cohort_from_row(row: &SqliteRow) -> Result<Cohort, sqlx::Error> {
	Ok(Cohort {
		id: row.try_get::<&str, _>("id")?.into(),
		user_id: UserId::new(row.try_get::<&str, _>("user_id")?),
		organization_id: row.try_get::<Option<&str>, _>("organization_id")?.map(OrgId::new),
		name: row.try_get::<&str, _>("name")?.into(),
		description: row.try_get::<Option<&str>, _>("description")?.map(Into::into),
		member_count: row.try_get("member_count")?,
		created_at: Timestamp(row.try_get("created_at")?),
		updated_at: Timestamp(row.try_get("updated_at")?),
	})
}

fn member_from_row(row: &SqliteRow) -> Result<CohortMember, sqlx::Error> {
	Ok(CohortMember {
		id: row.try_get::<&str, _>("id")?.into(),
		cohort_id: row.try_get::<&str, _>("cohort_id")?.into(),
		name: row.try_get::<Option<&str>, _>("name")?.map(Into::into),
		email: row.try_get::<Option<&str>, _>("email")?.map(Into::into),
		phone: row.try_get::<Option<&str>, _>("phone")?.map(Into::into),
		created_at: Timestamp(row.try_get("created_at")?),
	})
}

// Cohorts
//*********
pub(crate) async fn list(db: &SqlitePool, content: &ContentQuery) -> OiResult<Vec<Cohort>> {
	let mut query = push_content_where(QueryBuilder::new(COHORT_SELECT), content, "name");
	query.push(" ORDER BY created_at DESC, id");

	let rows = query.build().fetch_all(db).await.map_err(db_err)?;
	collect_res(rows.iter().map(cohort_from_row))
}

pub(crate) async fn read(db: &SqlitePool, content: &ContentQuery) -> OiResult<Cohort> {
	let mut query = push_content_where(QueryBuilder::new(COHORT_SELECT), content, "name");
	query.push(" LIMIT 1");

	let res = query.build().fetch_one(db).await;
	map_res(res, |row| cohort_from_row(&row))
}

pub(crate) async fn create(
	db: &SqlitePool,
	owner_id: &UserId,
	data: &CreateNamedData<'_>,
) -> OiResult<Cohort> {
	let id = random_id();
	sqlx::query(
		"INSERT INTO cohorts (id, user_id, organization_id, name, description)
		VALUES (?1, ?2, ?3, ?4, ?5)",
	)
	.bind(&id)
	.bind(owner_id.as_str())
	.bind(data.organization_id.map(OrgId::as_str))
	.bind(data.name)
	.bind(data.description)
	.execute(db)
	.await
	.map_err(db_err)?;

	read(db, &ContentQuery::for_owner(owner_id).with_id(&id)).await
}

pub(crate) async fn update(
	db: &SqlitePool,
	content: &ContentQuery,
	data: &UpdateNamedData<'_>,
) -> OiResult<Cohort> {
	let mut query: QueryBuilder<Sqlite> =
		QueryBuilder::new("UPDATE cohorts SET updated_at = unixepoch()");
	if let Some(name) = data.name {
		query.push(", name = ").push_bind(name);
	}
	if let Some(description) = data.description {
		query.push(", description = ").push_bind(description);
	}
	let mut query = push_content_where(query, content, "name");

	let res = query.build().execute(db).await.map_err(db_err)?;
	expect_affected(res.rows_affected())?;
	read(db, content).await
}

pub(crate) async fn delete(db: &SqlitePool, content: &ContentQuery) -> OiResult<()> {
	let mut query = push_content_where(QueryBuilder::new("DELETE FROM cohorts"), content, "name");
	let res = query.build().execute(db).await.map_err(db_err)?;
	expect_affected(res.rows_affected())
}

// Members
//*********
pub(crate) async fn list_members(db: &SqlitePool, cohort_id: &str) -> OiResult<Vec<CohortMember>> {
	let rows = sqlx::query(
		"SELECT id, cohort_id, name, email, phone, created_at FROM cohort_members
		WHERE cohort_id = ?1 ORDER BY created_at, id",
	)
	.bind(cohort_id)
	.fetch_all(db)
	.await
	.map_err(db_err)?;
	collect_res(rows.iter().map(member_from_row))
}

/// Inserts all members in one transaction
pub(crate) async fn create_members(
	db: &SqlitePool,
	cohort_id: &str,
	members: &[CreateCohortMemberData<'_>],
) -> OiResult<Vec<CohortMember>> {
	let mut tx = db.begin().await.map_err(db_err)?;
	let mut created = Vec::with_capacity(members.len());

	for member in members {
		let res = sqlx::query(
			"INSERT INTO cohort_members (id, cohort_id, name, email, phone)
			VALUES (?1, ?2, ?3, ?4, ?5)
			RETURNING id, cohort_id, name, email, phone, created_at",
		)
		.bind(random_id())
		.bind(cohort_id)
		.bind(member.name.map(str::trim))
		.bind(member.email.map(normalize_email))
		.bind(member.phone.map(str::trim))
		.fetch_one(&mut *tx)
		.await;
		created.push(map_res(res, |row| member_from_row(&row))?);
	}

	tx.commit().await.map_err(db_err)?;
	Ok(created)
}

pub(crate) async fn delete_member(db: &SqlitePool, cohort_id: &str, member_id: &str) -> OiResult<()> {
	let res = sqlx::query("DELETE FROM cohort_members WHERE cohort_id = ?1 AND id = ?2")
		.bind(cohort_id)
		.bind(member_id)
		.execute(db)
		.await
		.map_err(db_err)?;
	expect_affected(res.rows_affected())
}

// Streams
//*********
pub(crate) async fn list_streams(db: &SqlitePool, cohort_id: &str) -> OiResult<Vec<Campaign>> {
	let rows = sqlx::query(&format!(
		"SELECT {} FROM campaigns WHERE id IN
		(SELECT campaign_id FROM cohort_streams WHERE cohort_id = ?1)
		ORDER BY name, id",
		CAMPAIGN_COLUMNS
	))
	.bind(cohort_id)
	.fetch_all(db)
	.await
	.map_err(db_err)?;
	collect_res(rows.iter().map(campaign_from_row))
}

pub(crate) async fn assign_stream(db: &SqlitePool, cohort_id: &str, campaign_id: &str) -> OiResult<()> {
	let res = sqlx::query("INSERT INTO cohort_streams (cohort_id, campaign_id) VALUES (?1, ?2)")
		.bind(cohort_id)
		.bind(campaign_id)
		.execute(db)
		.await;

	match res {
		Ok(_) => Ok(()),
		Err(sqlx::Error::Database(err)) if err.is_unique_violation() => {
			Err(Error::Conflict("stream already assigned to this cohort".into()))
		}
		Err(err) => Err(db_err(err)),
	}
}

pub(crate) async fn unassign_stream(
	db: &SqlitePool,
	cohort_id: &str,
	campaign_id: &str,
) -> OiResult<()> {
	let res = sqlx::query("DELETE FROM cohort_streams WHERE cohort_id = ?1 AND campaign_id = ?2")
		.bind(cohort_id)
		.bind(campaign_id)
		.execute(db)
		.await
		.map_err(db_err)?;
	expect_affected(res.rows_affected())
}

// vim: ts=4
