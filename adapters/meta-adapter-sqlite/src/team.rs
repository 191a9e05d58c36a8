//! Team memberships

use sqlx::sqlite::SqliteRow;
use sqlx::{QueryBuilder, Row, Sqlite, SqlitePool};

use crate::utils::*;
use outbound_types::meta_adapter::{
	CreateTeamMemberData, MemberStatus, TeamMember, UpdateTeamMemberData,
};
use outbound_types::prelude::*;
use outbound_types::utils::{normalize_email, random_id};

const MEMBER_COLUMNS: &str =
	"id, owner_id, user_id, email, role, organization_ids, status, created_at";

fn member_from_row(row: &SqliteRow) -> Result<TeamMember, sqlx::Error> {
	let role: &str = row.try_get("role")?;
	let status: &str = row.try_get("status")?;
	let org_ids: &str = row.try_get("organization_ids")?;
	let organization_ids: Vec<OrgId> =
		serde_json::from_str(org_ids).map_err(|_| decode_err("organization_ids", org_ids))?;

	Ok(TeamMember {
		id: row.try_get::<&str, _>("id")?.into(),
		owner_id: UserId::new(row.try_get::<&str, _>("owner_id")?),
		user_id: row.try_get::<Option<&str>, _>("user_id")?.map(UserId::new),
		email: row.try_get::<&str, _>("email")?.into(),
		role: TeamRole::parse(role).ok_or_else(|| decode_err("role", role))?,
		organization_ids,
		status: MemberStatus::parse(status).ok_or_else(|| decode_err("status", status))?,
		created_at: Timestamp(row.try_get("created_at")?),
	})
}

pub(crate) async fn read_active_membership(
	db: &SqlitePool,
	user_id: &UserId,
) -> OiResult<Option<TeamMember>> {
	let row = sqlx::query(&format!(
		"SELECT {} FROM team_members WHERE user_id = ?1 AND status = 'ACTIVE'
		ORDER BY created_at, id LIMIT 1",
		MEMBER_COLUMNS
	))
	.bind(user_id.as_str())
	.fetch_optional(db)
	.await
	.map_err(db_err)?;
	row.map(|row| member_from_row(&row).map_err(db_err)).transpose()
}

pub(crate) async fn list(db: &SqlitePool, owner_id: &UserId) -> OiResult<Vec<TeamMember>> {
	let rows = sqlx::query(&format!(
		"SELECT {} FROM team_members WHERE owner_id = ?1 ORDER BY created_at, id",
		MEMBER_COLUMNS
	))
	.bind(owner_id.as_str())
	.fetch_all(db)
	.await
	.map_err(db_err)?;
	collect_res(rows.iter().map(member_from_row))
}

pub(crate) async fn read(db: &SqlitePool, owner_id: &UserId, id: &str) -> OiResult<TeamMember> {
	let res = sqlx::query(&format!(
		"SELECT {} FROM team_members WHERE owner_id = ?1 AND id = ?2",
		MEMBER_COLUMNS
	))
	.bind(owner_id.as_str())
	.bind(id)
	.fetch_one(db)
	.await;
	map_res(res, |row| member_from_row(&row))
}

pub(crate) async fn create(
	db: &SqlitePool,
	owner_id: &UserId,
	data: &CreateTeamMemberData<'_>,
) -> OiResult<TeamMember> {
	let id = random_id();
	let org_ids = serde_json::to_string(data.organization_ids)?;
	let res = sqlx::query(
		"INSERT INTO team_members (id, owner_id, user_id, email, role, organization_ids, status)
		VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
	)
	.bind(&id)
	.bind(owner_id.as_str())
	.bind(data.user_id.map(UserId::as_str))
	.bind(normalize_email(data.email))
	.bind(data.role.as_str())
	.bind(org_ids)
	.bind(data.status.as_str())
	.execute(db)
	.await;

	match res {
		Ok(_) => read(db, owner_id, &id).await,
		Err(sqlx::Error::Database(err)) if err.is_unique_violation() => {
			Err(Error::Conflict("this email is already on the team".into()))
		}
		Err(err) => Err(db_err(err)),
	}
}

pub(crate) async fn update(
	db: &SqlitePool,
	owner_id: &UserId,
	id: &str,
	data: &UpdateTeamMemberData,
) -> OiResult<TeamMember> {
	let org_ids = data.organization_ids.as_ref().map(serde_json::to_string).transpose()?;

	let mut query: QueryBuilder<Sqlite> = QueryBuilder::new("UPDATE team_members SET ");
	let mut has_updates = false;
	if let Some(role) = data.role {
		query.push("role = ").push_bind(role.as_str());
		has_updates = true;
	}
	if let Some(org_ids) = org_ids {
		if has_updates {
			query.push(", ");
		}
		query.push("organization_ids = ").push_bind(org_ids);
		has_updates = true;
	}
	if let Some(status) = data.status {
		if has_updates {
			query.push(", ");
		}
		query.push("status = ").push_bind(status.as_str());
		has_updates = true;
	}
	if !has_updates {
		return read(db, owner_id, id).await;
	}
	query.push(" WHERE owner_id = ").push_bind(owner_id.as_str());
	query.push(" AND id = ").push_bind(id);

	let res = query.build().execute(db).await.map_err(db_err)?;
	expect_affected(res.rows_affected())?;
	read(db, owner_id, id).await
}

pub(crate) async fn delete(db: &SqlitePool, owner_id: &UserId, id: &str) -> OiResult<()> {
	let res = sqlx::query("DELETE FROM team_members WHERE owner_id = ?1 AND id = ?2")
		.bind(owner_id.as_str())
		.bind(id)
		.execute(db)
		.await
		.map_err(db_err)?;
	expect_affected(res.rows_affected())
}

// vim: ts=4
