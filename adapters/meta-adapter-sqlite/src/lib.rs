//! SQLite metadata adapter for Outbound Impact
//!
//! Stores users, team memberships, organizations, content, platform settings and the
//! audit log in a single SQLite database (WAL mode). The schema is created on open.

#![forbid(unsafe_code)]

use async_trait::async_trait;
use sqlx::sqlite::{self, SqlitePool};
use std::path::Path;

use outbound_types::meta_adapter::*;
use outbound_types::prelude::*;

mod audit;
mod campaign;
mod cohort;
mod item;
mod organization;
mod schema;
mod setting;
mod team;
mod user;
mod utils;

pub const DB_FILE: &str = "meta.db";

#[derive(Debug)]
pub struct MetaAdapterSqlite {
	db: SqlitePool,
}

impl MetaAdapterSqlite {
	/// Opens (or creates) the database in the `dir` directory
	pub async fn new(dir: impl AsRef<Path>) -> OiResult<Self> {
		let dir = dir.as_ref();
		tokio::fs::create_dir_all(dir).await?;

		let opts = sqlite::SqliteConnectOptions::new()
			.filename(dir.join(DB_FILE))
			.create_if_missing(true)
			.foreign_keys(true)
			.journal_mode(sqlite::SqliteJournalMode::Wal);
		let db = sqlite::SqlitePoolOptions::new()
			.max_connections(5)
			.connect_with(opts)
			.await
			.inspect_err(|err| error!("DbError: {:#?}", err))
			.or(Err(Error::DbError))?;

		schema::init_db(&db)
			.await
			.inspect_err(|err| error!("DbError: {:#?}", err))
			.or(Err(Error::DbError))?;

		Ok(Self { db })
	}

	/// Lists audit entries, newest first
	pub async fn list_audit_entries(
		&self,
		user_id: Option<&UserId>,
		limit: u32,
	) -> OiResult<Vec<AuditLogEntry>> {
		audit::list(&self.db, user_id, limit).await
	}
}

#[async_trait]
impl SettingsStore for MetaAdapterSqlite {
	async fn read_platform_settings(&self) -> OiResult<Option<serde_json::Value>> {
		setting::read(&self.db).await
	}

	async fn write_platform_settings(&self, settings: &serde_json::Value) -> OiResult<()> {
		setting::write(&self.db, settings).await
	}
}

#[async_trait]
impl UserStore for MetaAdapterSqlite {
	async fn read_user(&self, user_id: &UserId) -> OiResult<User> {
		user::read(&self.db, user_id).await
	}

	async fn read_user_by_email(&self, email: &str) -> OiResult<Option<User>> {
		user::read_by_email(&self.db, email).await
	}

	async fn read_user_status(&self, user_id: &UserId) -> OiResult<UserStatus> {
		user::read_status(&self.db, user_id).await
	}

	async fn list_users(&self) -> OiResult<Vec<User>> {
		user::list(&self.db).await
	}

	async fn create_user(&self, data: &CreateUserData<'_>) -> OiResult<User> {
		user::create(&self.db, data).await
	}

	async fn update_user_status(&self, user_id: &UserId, status: UserStatus) -> OiResult<()> {
		user::update_status(&self.db, user_id, status).await
	}
}

#[async_trait]
impl TeamStore for MetaAdapterSqlite {
	async fn read_active_membership(&self, user_id: &UserId) -> OiResult<Option<TeamMember>> {
		team::read_active_membership(&self.db, user_id).await
	}

	async fn list_team_members(&self, owner_id: &UserId) -> OiResult<Vec<TeamMember>> {
		team::list(&self.db, owner_id).await
	}

	async fn read_team_member(&self, owner_id: &UserId, id: &str) -> OiResult<TeamMember> {
		team::read(&self.db, owner_id, id).await
	}

	async fn create_team_member(
		&self,
		owner_id: &UserId,
		data: &CreateTeamMemberData<'_>,
	) -> OiResult<TeamMember> {
		team::create(&self.db, owner_id, data).await
	}

	async fn update_team_member(
		&self,
		owner_id: &UserId,
		id: &str,
		data: &UpdateTeamMemberData,
	) -> OiResult<TeamMember> {
		team::update(&self.db, owner_id, id, data).await
	}

	async fn delete_team_member(&self, owner_id: &UserId, id: &str) -> OiResult<()> {
		team::delete(&self.db, owner_id, id).await
	}
}

#[async_trait]
impl OrgStore for MetaAdapterSqlite {
	async fn list_organizations(
		&self,
		owner_id: &UserId,
		filter: &OrgFilter,
	) -> OiResult<Vec<Organization>> {
		organization::list(&self.db, owner_id, filter).await
	}

	async fn create_organization(&self, owner_id: &UserId, name: &str) -> OiResult<Organization> {
		organization::create(&self.db, owner_id, name).await
	}
}

#[async_trait]
impl ContentStore for MetaAdapterSqlite {
	// Items
	//*******
	async fn list_items(&self, query: &ContentQuery) -> OiResult<Vec<Item>> {
		item::list(&self.db, query).await
	}

	async fn read_item(&self, query: &ContentQuery) -> OiResult<Item> {
		item::read(&self.db, query).await
	}

	async fn create_item(&self, owner_id: &UserId, data: &CreateItemData<'_>) -> OiResult<Item> {
		item::create(&self.db, owner_id, data).await
	}

	async fn update_item(&self, query: &ContentQuery, data: &UpdateItemData<'_>) -> OiResult<Item> {
		item::update(&self.db, query, data).await
	}

	async fn delete_item(&self, query: &ContentQuery) -> OiResult<()> {
		item::delete(&self.db, query).await
	}

	// Campaigns
	//***********
	async fn list_campaigns(&self, query: &ContentQuery) -> OiResult<Vec<Campaign>> {
		campaign::list(&self.db, query).await
	}

	async fn read_campaign(&self, query: &ContentQuery) -> OiResult<Campaign> {
		campaign::read(&self.db, query).await
	}

	async fn create_campaign(
		&self,
		owner_id: &UserId,
		data: &CreateNamedData<'_>,
	) -> OiResult<Campaign> {
		campaign::create(&self.db, owner_id, data).await
	}

	async fn update_campaign(
		&self,
		query: &ContentQuery,
		data: &UpdateNamedData<'_>,
	) -> OiResult<Campaign> {
		campaign::update(&self.db, query, data).await
	}

	async fn delete_campaign(&self, query: &ContentQuery) -> OiResult<()> {
		campaign::delete(&self.db, query).await
	}

	// Cohorts
	//*********
	async fn list_cohorts(&self, query: &ContentQuery) -> OiResult<Vec<Cohort>> {
		cohort::list(&self.db, query).await
	}

	async fn read_cohort(&self, query: &ContentQuery) -> OiResult<Cohort> {
		cohort::read(&self.db, query).await
	}

	async fn create_cohort(
		&self,
		owner_id: &UserId,
		data: &CreateNamedData<'_>,
	) -> OiResult<Cohort> {
		cohort::create(&self.db, owner_id, data).await
	}

	async fn update_cohort(
		&self,
		query: &ContentQuery,
		data: &UpdateNamedData<'_>,
	) -> OiResult<Cohort> {
		cohort::update(&self.db, query, data).await
	}

	async fn delete_cohort(&self, query: &ContentQuery) -> OiResult<()> {
		cohort::delete(&self.db, query).await
	}

	async fn list_cohort_members(&self, cohort_id: &str) -> OiResult<Vec<CohortMember>> {
		cohort::list_members(&self.db, cohort_id).await
	}

	async fn create_cohort_members(
		&self,
		cohort_id: &str,
		members: &[CreateCohortMemberData<'_>],
	) -> OiResult<Vec<CohortMember>> {
		cohort::create_members(&self.db, cohort_id, members).await
	}

	async fn delete_cohort_member(&self, cohort_id: &str, member_id: &str) -> OiResult<()> {
		cohort::delete_member(&self.db, cohort_id, member_id).await
	}

	async fn list_cohort_streams(&self, cohort_id: &str) -> OiResult<Vec<Campaign>> {
		cohort::list_streams(&self.db, cohort_id).await
	}

	async fn assign_cohort_stream(&self, cohort_id: &str, campaign_id: &str) -> OiResult<()> {
		cohort::assign_stream(&self.db, cohort_id, campaign_id).await
	}

	async fn unassign_cohort_stream(&self, cohort_id: &str, campaign_id: &str) -> OiResult<()> {
		cohort::unassign_stream(&self.db, cohort_id, campaign_id).await
	}
}

#[async_trait]
impl AuditStore for MetaAdapterSqlite {
	async fn create_audit_entry(&self, entry: &AuditLogEntry) -> OiResult<()> {
		audit::create(&self.db, entry).await
	}
}

// vim: ts=4
