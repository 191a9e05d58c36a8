//! Adapter that stores platform metadata: users, team memberships, organizations,
//! content records, platform settings and the audit log.
//!
//! The storage surface is split into small store traits so that components depending
//! on a single concern (the settings cache only needs `SettingsStore`) can be handed
//! exactly that. `MetaAdapter` bundles them for the application state.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;
use std::fmt::Debug;

use crate::prelude::*;

// Users //
//*******//
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
	pub id: UserId,
	pub email: Box<str>,
	pub name: Box<str>,
	pub role: Role,
	pub status: UserStatus,
	pub created_at: Timestamp,
}

#[derive(Debug)]
pub struct CreateUserData<'a> {
	pub email: &'a str,
	pub name: &'a str,
	pub role: Role,
}

// Team memberships //
//******************//
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MemberStatus {
	Pending,
	Active,
	Revoked,
}

impl MemberStatus {
	pub fn as_str(self) -> &'static str {
		match self {
			MemberStatus::Pending => "PENDING",
			MemberStatus::Active => "ACTIVE",
			MemberStatus::Revoked => "REVOKED",
		}
	}

	pub fn parse(s: &str) -> Option<MemberStatus> {
		match s {
			"PENDING" => Some(MemberStatus::Pending),
			"ACTIVE" => Some(MemberStatus::Active),
			"REVOKED" => Some(MemberStatus::Revoked),
			_ => None,
		}
	}
}

/// A user acting on behalf of an account owner
#[skip_serializing_none]
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamMember {
	pub id: Box<str>,
	/// The account owner the member works for
	pub owner_id: UserId,
	/// Linked user account, absent until the invitation is matched to a user
	pub user_id: Option<UserId>,
	pub email: Box<str>,
	pub role: TeamRole,
	/// Organizations the member is restricted to, in assignment order
	pub organization_ids: Vec<OrgId>,
	pub status: MemberStatus,
	pub created_at: Timestamp,
}

#[derive(Debug)]
pub struct CreateTeamMemberData<'a> {
	pub user_id: Option<&'a UserId>,
	pub email: &'a str,
	pub role: TeamRole,
	pub organization_ids: &'a [OrgId],
	pub status: MemberStatus,
}

#[derive(Debug, Default)]
pub struct UpdateTeamMemberData {
	pub role: Option<TeamRole>,
	pub organization_ids: Option<Vec<OrgId>>,
	pub status: Option<MemberStatus>,
}

// Organizations //
//***************//
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Organization {
	pub id: OrgId,
	pub owner_id: UserId,
	pub name: Box<str>,
	pub created_at: Timestamp,
}

// Content //
//*********//
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ItemType {
	Image,
	Video,
	Audio,
	Text,
	Embed,
	Link,
}

impl ItemType {
	pub fn as_str(self) -> &'static str {
		match self {
			ItemType::Image => "IMAGE",
			ItemType::Video => "VIDEO",
			ItemType::Audio => "AUDIO",
			ItemType::Text => "TEXT",
			ItemType::Embed => "EMBED",
			ItemType::Link => "LINK",
		}
	}

	pub fn parse(s: &str) -> Option<ItemType> {
		match s {
			"IMAGE" => Some(ItemType::Image),
			"VIDEO" => Some(ItemType::Video),
			"AUDIO" => Some(ItemType::Audio),
			"TEXT" => Some(ItemType::Text),
			"EMBED" => Some(ItemType::Embed),
			"LINK" => Some(ItemType::Link),
			_ => None,
		}
	}
}

#[skip_serializing_none]
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
	pub id: Box<str>,
	pub user_id: UserId,
	pub organization_id: Option<OrgId>,
	pub title: Box<str>,
	pub description: Option<Box<str>>,
	#[serde(rename = "type")]
	pub typ: ItemType,
	pub media_url: Option<Box<str>>,
	pub slug: Box<str>,
	pub created_at: Timestamp,
	pub updated_at: Timestamp,
}

#[derive(Debug)]
pub struct CreateItemData<'a> {
	pub organization_id: Option<&'a OrgId>,
	pub title: &'a str,
	pub description: Option<&'a str>,
	pub typ: ItemType,
	pub media_url: Option<&'a str>,
	pub slug: &'a str,
}

#[derive(Debug, Default)]
pub struct UpdateItemData<'a> {
	pub title: Option<&'a str>,
	pub description: Option<&'a str>,
	pub typ: Option<ItemType>,
	pub media_url: Option<&'a str>,
}

/// A campaign (stream) groups items for sharing
#[skip_serializing_none]
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Campaign {
	pub id: Box<str>,
	pub user_id: UserId,
	pub organization_id: Option<OrgId>,
	pub name: Box<str>,
	pub description: Option<Box<str>>,
	pub category: Option<Box<str>>,
	pub created_at: Timestamp,
	pub updated_at: Timestamp,
}

/// Shared create payload of named content (campaigns, cohorts)
#[derive(Debug)]
pub struct CreateNamedData<'a> {
	pub organization_id: Option<&'a OrgId>,
	pub name: &'a str,
	pub description: Option<&'a str>,
	/// Campaigns only
	pub category: Option<&'a str>,
}

#[derive(Debug, Default)]
pub struct UpdateNamedData<'a> {
	pub name: Option<&'a str>,
	pub description: Option<&'a str>,
	pub category: Option<&'a str>,
}

/// A cohort is a named group of recipients
#[skip_serializing_none]
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Cohort {
	pub id: Box<str>,
	pub user_id: UserId,
	pub organization_id: Option<OrgId>,
	pub name: Box<str>,
	pub description: Option<Box<str>>,
	pub member_count: u32,
	pub created_at: Timestamp,
	pub updated_at: Timestamp,
}

#[skip_serializing_none]
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CohortMember {
	pub id: Box<str>,
	pub cohort_id: Box<str>,
	pub name: Option<Box<str>>,
	pub email: Option<Box<str>>,
	pub phone: Option<Box<str>>,
	pub created_at: Timestamp,
}

#[derive(Debug)]
pub struct CreateCohortMemberData<'a> {
	pub name: Option<&'a str>,
	pub email: Option<&'a str>,
	pub phone: Option<&'a str>,
}

// ContentQuery //
//**************//
/// Ownership and organization predicate of a content query.
///
/// Every content read and write goes through one of these, so a record outside the
/// effective owner's account or outside the caller's organization scope is invisible.
#[derive(Clone, Debug)]
pub struct ContentQuery {
	pub owner_id: UserId,
	pub org_filter: OrgFilter,
	pub id: Option<Box<str>>,
	/// Case-insensitive title/name substring
	pub q: Option<Box<str>>,
}

impl ContentQuery {
	pub fn for_owner(owner_id: &UserId) -> Self {
		Self { owner_id: owner_id.clone(), org_filter: OrgFilter::Unrestricted, id: None, q: None }
	}

	pub fn with_id(mut self, id: &str) -> Self {
		self.id = Some(id.into());
		self
	}

	pub fn with_search(mut self, q: Option<&str>) -> Self {
		self.q = q.map(str::trim).filter(|q| !q.is_empty()).map(Into::into);
		self
	}

	/// Merge an organization filter as an additional AND clause
	pub fn and_org_filter(mut self, filter: OrgFilter) -> Self {
		self.org_filter = std::mem::take(&mut self.org_filter).and(filter);
		self
	}
}

// Audit //
//*******//
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditLogEntry {
	pub user_id: UserId,
	pub action: Box<str>,
	pub ip_address: Option<Box<str>>,
	pub device: Option<Box<str>>,
	pub metadata: serde_json::Value,
	pub created_at: Timestamp,
}

// Store traits //
//**************//
#[async_trait]
pub trait SettingsStore: Debug + Send + Sync {
	/// Reads the stored platform settings object, `None` if never saved
	async fn read_platform_settings(&self) -> OiResult<Option<serde_json::Value>>;

	/// Replaces the stored platform settings object
	async fn write_platform_settings(&self, settings: &serde_json::Value) -> OiResult<()>;
}

#[async_trait]
pub trait UserStore: Debug + Send + Sync {
	async fn read_user(&self, user_id: &UserId) -> OiResult<User>;
	async fn read_user_by_email(&self, email: &str) -> OiResult<Option<User>>;
	async fn read_user_status(&self, user_id: &UserId) -> OiResult<UserStatus>;
	async fn list_users(&self) -> OiResult<Vec<User>>;
	async fn create_user(&self, data: &CreateUserData<'_>) -> OiResult<User>;
	async fn update_user_status(&self, user_id: &UserId, status: UserStatus) -> OiResult<()>;
}

#[async_trait]
pub trait TeamStore: Debug + Send + Sync {
	/// Reads the active membership of a member user, if any
	async fn read_active_membership(&self, user_id: &UserId) -> OiResult<Option<TeamMember>>;
	async fn list_team_members(&self, owner_id: &UserId) -> OiResult<Vec<TeamMember>>;
	async fn read_team_member(&self, owner_id: &UserId, id: &str) -> OiResult<TeamMember>;
	async fn create_team_member(
		&self,
		owner_id: &UserId,
		data: &CreateTeamMemberData<'_>,
	) -> OiResult<TeamMember>;
	async fn update_team_member(
		&self,
		owner_id: &UserId,
		id: &str,
		data: &UpdateTeamMemberData,
	) -> OiResult<TeamMember>;
	async fn delete_team_member(&self, owner_id: &UserId, id: &str) -> OiResult<()>;
}

#[async_trait]
pub trait OrgStore: Debug + Send + Sync {
	async fn list_organizations(
		&self,
		owner_id: &UserId,
		filter: &OrgFilter,
	) -> OiResult<Vec<Organization>>;
	async fn create_organization(&self, owner_id: &UserId, name: &str) -> OiResult<Organization>;
}

/// Items, campaigns and cohorts.
///
/// Reads, updates and deletes match by `ContentQuery`; a query matching nothing is
/// `Error::NotFound`.
#[async_trait]
pub trait ContentStore: Debug + Send + Sync {
	// Items
	async fn list_items(&self, query: &ContentQuery) -> OiResult<Vec<Item>>;
	async fn read_item(&self, query: &ContentQuery) -> OiResult<Item>;
	async fn create_item(&self, owner_id: &UserId, data: &CreateItemData<'_>) -> OiResult<Item>;
	async fn update_item(&self, query: &ContentQuery, data: &UpdateItemData<'_>) -> OiResult<Item>;
	async fn delete_item(&self, query: &ContentQuery) -> OiResult<()>;

	// Campaigns
	async fn list_campaigns(&self, query: &ContentQuery) -> OiResult<Vec<Campaign>>;
	async fn read_campaign(&self, query: &ContentQuery) -> OiResult<Campaign>;
	async fn create_campaign(
		&self,
		owner_id: &UserId,
		data: &CreateNamedData<'_>,
	) -> OiResult<Campaign>;
	async fn update_campaign(
		&self,
		query: &ContentQuery,
		data: &UpdateNamedData<'_>,
	) -> OiResult<Campaign>;
	async fn delete_campaign(&self, query: &ContentQuery) -> OiResult<()>;

	// Cohorts
	async fn list_cohorts(&self, query: &ContentQuery) -> OiResult<Vec<Cohort>>;
	async fn read_cohort(&self, query: &ContentQuery) -> OiResult<Cohort>;
	async fn create_cohort(&self, owner_id: &UserId, data: &CreateNamedData<'_>)
	-> OiResult<Cohort>;
	async fn update_cohort(
		&self,
		query: &ContentQuery,
		data: &UpdateNamedData<'_>,
	) -> OiResult<Cohort>;
	async fn delete_cohort(&self, query: &ContentQuery) -> OiResult<()>;

	// Cohort members. The cohort itself must already be scope-checked by the caller.
	async fn list_cohort_members(&self, cohort_id: &str) -> OiResult<Vec<CohortMember>>;
	async fn create_cohort_members(
		&self,
		cohort_id: &str,
		members: &[CreateCohortMemberData<'_>],
	) -> OiResult<Vec<CohortMember>>;
	async fn delete_cohort_member(&self, cohort_id: &str, member_id: &str) -> OiResult<()>;

	// Cohort stream assignments
	async fn list_cohort_streams(&self, cohort_id: &str) -> OiResult<Vec<Campaign>>;
	/// Assigns a campaign to a cohort, `Error::Conflict` if already assigned
	async fn assign_cohort_stream(&self, cohort_id: &str, campaign_id: &str) -> OiResult<()>;
	async fn unassign_cohort_stream(&self, cohort_id: &str, campaign_id: &str) -> OiResult<()>;
}

#[async_trait]
pub trait AuditStore: Debug + Send + Sync {
	async fn create_audit_entry(&self, entry: &AuditLogEntry) -> OiResult<()>;
}

/// An Outbound Impact meta adapter
///
/// Every `MetaAdapter` implementation implements all store traits.
pub trait MetaAdapter:
	SettingsStore + UserStore + TeamStore + OrgStore + ContentStore + AuditStore
{
}

impl<T> MetaAdapter for T where
	T: SettingsStore + UserStore + TeamStore + OrgStore + ContentStore + AuditStore
{
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_content_query_merges_org_filter() {
		let owner = UserId::from("owner");
		let query = ContentQuery::for_owner(&owner).and_org_filter(OrgFilter::Unrestricted);
		assert!(query.org_filter.is_unrestricted());

		let scoped = OrgFilter::AnyOf(vec![OrgId::from("a"), OrgId::from("b")].into());
		let query = ContentQuery::for_owner(&owner)
			.and_org_filter(scoped.clone())
			.and_org_filter(OrgFilter::Unrestricted);
		assert_eq!(query.org_filter, scoped);
	}

	#[test]
	fn test_content_query_search_is_trimmed() {
		let owner = UserId::from("owner");
		assert!(ContentQuery::for_owner(&owner).with_search(Some("  ")).q.is_none());
		assert_eq!(
			ContentQuery::for_owner(&owner).with_search(Some(" x ")).q.as_deref(),
			Some("x")
		);
	}
}

// vim: ts=4
