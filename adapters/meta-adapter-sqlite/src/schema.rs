//! Database schema initialization
//!
//! Creates tables and indexes so the database is usable right after opening.

use sqlx::SqlitePool;

/// Initialize the database schema with all required tables and indexes
pub(crate) async fn init_db(db: &SqlitePool) -> Result<(), sqlx::Error> {
	let mut tx = db.begin().await?;

	// Users
	//*******
	sqlx::query(
		"CREATE TABLE IF NOT EXISTS users (
		id text NOT NULL,
		email text NOT NULL,
		name text NOT NULL,
		role text NOT NULL,
		status text NOT NULL DEFAULT 'active',
		created_at integer DEFAULT (unixepoch()),
		PRIMARY KEY(id)
	)",
	)
	.execute(&mut *tx)
	.await?;
	sqlx::query("CREATE UNIQUE INDEX IF NOT EXISTS idx_users_email ON users(email)")
		.execute(&mut *tx)
		.await?;

	// Organizations
	//***************
	sqlx::query(
		"CREATE TABLE IF NOT EXISTS organizations (
		id text NOT NULL,
		owner_id text NOT NULL,
		name text NOT NULL,
		created_at integer DEFAULT (unixepoch()),
		PRIMARY KEY(id)
	)",
	)
	.execute(&mut *tx)
	.await?;
	sqlx::query(
		"CREATE INDEX IF NOT EXISTS idx_organizations_owner ON organizations(owner_id)",
	)
	.execute(&mut *tx)
	.await?;

	// Team members
	//**************
	// organization_ids is a JSON array, its order is the member's scope order
	sqlx::query(
		"CREATE TABLE IF NOT EXISTS team_members (
		id text NOT NULL,
		owner_id text NOT NULL,
		user_id text,
		email text NOT NULL,
		role text NOT NULL,
		organization_ids json NOT NULL DEFAULT '[]',
		status text NOT NULL,
		created_at integer DEFAULT (unixepoch()),
		PRIMARY KEY(id)
	)",
	)
	.execute(&mut *tx)
	.await?;
	sqlx::query("CREATE INDEX IF NOT EXISTS idx_team_members_owner ON team_members(owner_id)")
		.execute(&mut *tx)
		.await?;
	sqlx::query(
		"CREATE INDEX IF NOT EXISTS idx_team_members_user ON team_members(user_id, status)",
	)
	.execute(&mut *tx)
	.await?;
	sqlx::query(
		"CREATE UNIQUE INDEX IF NOT EXISTS idx_team_members_email ON team_members(owner_id, email)",
	)
	.execute(&mut *tx)
	.await?;

	// Content
	//*********
	sqlx::query(
		"CREATE TABLE IF NOT EXISTS items (
		id text NOT NULL,
		user_id text NOT NULL,
		organization_id text,
		title text NOT NULL,
		description text,
		type text NOT NULL,
		media_url text,
		slug text NOT NULL,
		created_at integer DEFAULT (unixepoch()),
		updated_at integer DEFAULT (unixepoch()),
		PRIMARY KEY(id)
	)",
	)
	.execute(&mut *tx)
	.await?;
	sqlx::query("CREATE INDEX IF NOT EXISTS idx_items_owner ON items(user_id, organization_id)")
		.execute(&mut *tx)
		.await?;
	sqlx::query("CREATE UNIQUE INDEX IF NOT EXISTS idx_items_slug ON items(slug)")
		.execute(&mut *tx)
		.await?;

	sqlx::query(
		"CREATE TABLE IF NOT EXISTS campaigns (
		id text NOT NULL,
		user_id text NOT NULL,
		organization_id text,
		name text NOT NULL,
		description text,
		category text,
		created_at integer DEFAULT (unixepoch()),
		updated_at integer DEFAULT (unixepoch()),
		PRIMARY KEY(id)
	)",
	)
	.execute(&mut *tx)
	.await?;
	sqlx::query(
		"CREATE INDEX IF NOT EXISTS idx_campaigns_owner ON campaigns(user_id, organization_id)",
	)
	.execute(&mut *tx)
	.await?;

	sqlx::query(
		"CREATE TABLE IF NOT EXISTS cohorts (
		id text NOT NULL,
		user_id text NOT NULL,
		organization_id text,
		name text NOT NULL,
		description text,
		created_at integer DEFAULT (unixepoch()),
		updated_at integer DEFAULT (unixepoch()),
		PRIMARY KEY(id)
	)",
	)
	.execute(&mut *tx)
	.await?;
	sqlx::query(
		"CREATE INDEX IF NOT EXISTS idx_cohorts_owner ON cohorts(user_id, organization_id)",
	)
	.execute(&mut *tx)
	.await?;

	sqlx::query(
		"CREATE TABLE IF NOT EXISTS cohort_members (
		id text NOT NULL,
		cohort_id text NOT NULL REFERENCES cohorts(id) ON DELETE CASCADE,
		name text,
		email text,
		phone text,
		created_at integer DEFAULT (unixepoch()),
		PRIMARY KEY(id)
	)",
	)
	.execute(&mut *tx)
	.await?;
	sqlx::query(
		"CREATE INDEX IF NOT EXISTS idx_cohort_members_cohort ON cohort_members(cohort_id)",
	)
	.execute(&mut *tx)
	.await?;

	sqlx::query(
		"CREATE TABLE IF NOT EXISTS cohort_streams (
		cohort_id text NOT NULL REFERENCES cohorts(id) ON DELETE CASCADE,
		campaign_id text NOT NULL REFERENCES campaigns(id) ON DELETE CASCADE,
		created_at integer DEFAULT (unixepoch()),
		PRIMARY KEY(cohort_id, campaign_id)
	)",
	)
	.execute(&mut *tx)
	.await?;

	// Platform settings
	//*******************
	sqlx::query(
		"CREATE TABLE IF NOT EXISTS platform_settings (
		id integer NOT NULL CHECK (id = 1),
		value json NOT NULL,
		updated_at integer DEFAULT (unixepoch()),
		PRIMARY KEY(id)
	)",
	)
	.execute(&mut *tx)
	.await?;

	// Audit log
	//***********
	sqlx::query(
		"CREATE TABLE IF NOT EXISTS audit_logs (
		id integer NOT NULL,
		user_id text NOT NULL,
		action text NOT NULL,
		ip_address text,
		device text,
		metadata json,
		created_at integer NOT NULL,
		PRIMARY KEY(id)
	)",
	)
	.execute(&mut *tx)
	.await?;
	sqlx::query(
		"CREATE INDEX IF NOT EXISTS idx_audit_logs_user ON audit_logs(user_id, created_at)",
	)
	.execute(&mut *tx)
	.await?;

	tx.commit().await?;

	Ok(())
}

// vim: ts=4
