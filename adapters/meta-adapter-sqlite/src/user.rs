//! Platform user accounts

use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

use crate::utils::*;
use outbound_types::meta_adapter::{CreateUserData, User};
use outbound_types::prelude::*;
use outbound_types::utils::{normalize_email, random_id};

const USER_COLUMNS: &str = "id, email, name, role, status, created_at";

fn user_from_row(row: &SqliteRow) -> Result<User, sqlx::Error> {
	let role: &str = row.try_get("role")?;
	let status: &str = row.try_get("status")?;
	Ok(User {
		id: UserId::new(row.try_get::<&str, _>("id")?),
		email: row.try_get::<&str, _>("email")?.into(),
		name: row.try_get::<&str, _>("name")?.into(),
		role: Role::parse(role).ok_or_else(|| decode_err("role", role))?,
		status: UserStatus::parse(status).ok_or_else(|| decode_err("status", status))?,
		created_at: Timestamp(row.try_get("created_at")?),
	})
}

pub(crate) async fn read(db: &SqlitePool, user_id: &UserId) -> OiResult<User> {
	let res = sqlx::query(&format!("SELECT {} FROM users WHERE id = ?1", USER_COLUMNS))
		.bind(user_id.as_str())
		.fetch_one(db)
		.await;
	map_res(res, |row| user_from_row(&row))
}

pub(crate) async fn read_by_email(db: &SqlitePool, email: &str) -> OiResult<Option<User>> {
	let row = sqlx::query(&format!("SELECT {} FROM users WHERE email = ?1", USER_COLUMNS))
		.bind(normalize_email(email))
		.fetch_optional(db)
		.await
		.map_err(db_err)?;
	row.map(|row| user_from_row(&row).map_err(db_err)).transpose()
}

pub(crate) async fn read_status(db: &SqlitePool, user_id: &UserId) -> OiResult<UserStatus> {
	let res = sqlx::query("SELECT status FROM users WHERE id = ?1")
		.bind(user_id.as_str())
		.fetch_one(db)
		.await;
	map_res(res, |row| {
		let status: &str = row.try_get("status")?;
		UserStatus::parse(status).ok_or_else(|| decode_err("status", status))
	})
}

pub(crate) async fn list(db: &SqlitePool) -> OiResult<Vec<User>> {
	let rows = sqlx::query(&format!("SELECT {} FROM users ORDER BY created_at, id", USER_COLUMNS))
		.fetch_all(db)
		.await
		.map_err(db_err)?;
	collect_res(rows.iter().map(user_from_row))
}

pub(crate) async fn create(db: &SqlitePool, data: &CreateUserData<'_>) -> OiResult<User> {
	let id = random_id();
	let res = sqlx::query(
		"INSERT INTO users (id, email, name, role, status) VALUES (?1, ?2, ?3, ?4, 'active')",
	)
	.bind(&id)
	.bind(normalize_email(data.email))
	.bind(data.name.trim())
	.bind(data.role.as_str())
	.execute(db)
	.await;

	match res {
		Ok(_) => read(db, &UserId::new(id)).await,
		Err(sqlx::Error::Database(err)) if err.is_unique_violation() => {
			Err(Error::Conflict("a user with this email already exists".into()))
		}
		Err(err) => Err(db_err(err)),
	}
}

pub(crate) async fn update_status(
	db: &SqlitePool,
	user_id: &UserId,
	status: UserStatus,
) -> OiResult<()> {
	let res = sqlx::query("UPDATE users SET status = ?1 WHERE id = ?2")
		.bind(status.as_str())
		.bind(user_id.as_str())
		.execute(db)
		.await
		.map_err(db_err)?;
	expect_affected(res.rows_affected())
}

// vim: ts=4
