//! Meta adapter CRUD operation tests
//!
//! Users, memberships, organizations, org-scoped content, cohorts, settings and audit

use outbound_meta_adapter_sqlite::MetaAdapterSqlite;
use outbound_types::meta_adapter::*;
use outbound_types::prelude::*;
use tempfile::TempDir;

async fn create_test_adapter() -> (MetaAdapterSqlite, TempDir) {
	let temp_dir = TempDir::new().expect("Failed to create temp directory");
	let adapter = MetaAdapterSqlite::new(temp_dir.path()).await.expect("Failed to create adapter");

	(adapter, temp_dir)
}

async fn create_user(adapter: &MetaAdapterSqlite, email: &str) -> User {
	adapter
		.create_user(&CreateUserData { email, name: "Test User", role: Role::OrgSmall })
		.await
		.expect("Failed to create user")
}

fn named<'a>(organization_id: Option<&'a OrgId>, name: &'static str) -> CreateNamedData<'a> {
	CreateNamedData { organization_id, name, description: None, category: None }
}

#[tokio::test]
async fn test_users() {
	let (adapter, _temp) = create_test_adapter().await;

	let user = create_user(&adapter, " Alice@Example.com ").await;
	assert_eq!(user.email.as_ref(), "alice@example.com");
	assert_eq!(user.status, UserStatus::Active);

	let found = adapter.read_user_by_email("ALICE@example.com").await.unwrap();
	assert_eq!(found.map(|u| u.id), Some(user.id.clone()));
	assert!(adapter.read_user_by_email("bob@example.com").await.unwrap().is_none());

	let dup = adapter
		.create_user(&CreateUserData { email: "alice@example.com", name: "A", role: Role::Individual })
		.await;
	assert!(matches!(dup, Err(Error::Conflict(_))));

	adapter.update_user_status(&user.id, UserStatus::Suspended).await.unwrap();
	assert_eq!(adapter.read_user_status(&user.id).await.unwrap(), UserStatus::Suspended);

	let missing = adapter.read_user_status(&UserId::from("nope")).await;
	assert!(matches!(missing, Err(Error::NotFound)));
	let missing = adapter.update_user_status(&UserId::from("nope"), UserStatus::Active).await;
	assert!(matches!(missing, Err(Error::NotFound)));

	assert_eq!(adapter.list_users().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_active_membership_ignores_pending_and_revoked() {
	let (adapter, _temp) = create_test_adapter().await;
	let owner_a = create_user(&adapter, "a@example.com").await;
	let owner_b = create_user(&adapter, "b@example.com").await;
	let member = create_user(&adapter, "m@example.com").await;

	assert!(adapter.read_active_membership(&member.id).await.unwrap().is_none());

	let pending = adapter
		.create_team_member(
			&owner_a.id,
			&CreateTeamMemberData {
				user_id: Some(&member.id),
				email: "m@example.com",
				role: TeamRole::Admin,
				organization_ids: &[],
				status: MemberStatus::Pending,
			},
		)
		.await
		.unwrap();
	assert!(adapter.read_active_membership(&member.id).await.unwrap().is_none());

	let org = OrgId::from("org-1");
	let active = adapter
		.create_team_member(
			&owner_b.id,
			&CreateTeamMemberData {
				user_id: Some(&member.id),
				email: "m@example.com",
				role: TeamRole::Viewer,
				organization_ids: std::slice::from_ref(&org),
				status: MemberStatus::Active,
			},
		)
		.await
		.unwrap();

	let found = adapter.read_active_membership(&member.id).await.unwrap().unwrap();
	assert_eq!(found.id, active.id);
	assert_eq!(found.owner_id, owner_b.id);
	assert_eq!(found.role, TeamRole::Viewer);
	assert_eq!(found.organization_ids, vec![org]);

	// Activating the first one does not matter once the second is revoked
	let revoke = UpdateTeamMemberData { status: Some(MemberStatus::Revoked), ..Default::default() };
	adapter.update_team_member(&owner_b.id, &active.id, &revoke).await.unwrap();
	assert!(adapter.read_active_membership(&member.id).await.unwrap().is_none());

	let activate = UpdateTeamMemberData {
		status: Some(MemberStatus::Active),
		role: Some(TeamRole::Editor),
		..Default::default()
	};
	let updated = adapter.update_team_member(&owner_a.id, &pending.id, &activate).await.unwrap();
	assert_eq!(updated.role, TeamRole::Editor);
	let found = adapter.read_active_membership(&member.id).await.unwrap().unwrap();
	assert_eq!(found.owner_id, owner_a.id);
}

#[tokio::test]
async fn test_team_member_crud_is_owner_scoped() {
	let (adapter, _temp) = create_test_adapter().await;
	let owner = create_user(&adapter, "owner@example.com").await;
	let other = create_user(&adapter, "other@example.com").await;

	let invite = CreateTeamMemberData {
		user_id: None,
		email: "New@Example.com",
		role: TeamRole::Editor,
		organization_ids: &[],
		status: MemberStatus::Pending,
	};
	let member = adapter.create_team_member(&owner.id, &invite).await.unwrap();
	assert_eq!(member.email.as_ref(), "new@example.com");
	assert!(member.user_id.is_none());

	let dup = adapter.create_team_member(&owner.id, &invite).await;
	assert!(matches!(dup, Err(Error::Conflict(_))));

	assert_eq!(adapter.list_team_members(&owner.id).await.unwrap().len(), 1);
	assert!(adapter.list_team_members(&other.id).await.unwrap().is_empty());

	let res = adapter.read_team_member(&other.id, &member.id).await;
	assert!(matches!(res, Err(Error::NotFound)));
	let res = adapter.delete_team_member(&other.id, &member.id).await;
	assert!(matches!(res, Err(Error::NotFound)));

	adapter.delete_team_member(&owner.id, &member.id).await.unwrap();
	assert!(adapter.list_team_members(&owner.id).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_organizations_filter() {
	let (adapter, _temp) = create_test_adapter().await;
	let owner = create_user(&adapter, "owner@example.com").await;

	let north = adapter.create_organization(&owner.id, "North").await.unwrap();
	let south = adapter.create_organization(&owner.id, "South").await.unwrap();

	let all = adapter.list_organizations(&owner.id, &OrgFilter::Unrestricted).await.unwrap();
	assert_eq!(all.len(), 2);

	let filter = OrgFilter::AnyOf(vec![south.id.clone()].into());
	let scoped = adapter.list_organizations(&owner.id, &filter).await.unwrap();
	assert_eq!(scoped.len(), 1);
	assert_eq!(scoped[0].id, south.id);

	let none = OrgFilter::AnyOf(Box::default());
	assert!(adapter.list_organizations(&owner.id, &none).await.unwrap().is_empty());

	let other = create_user(&adapter, "other@example.com").await;
	let filter = OrgFilter::AnyOf(vec![north.id].into());
	assert!(adapter.list_organizations(&other.id, &filter).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_items_org_scoping() {
	let (adapter, _temp) = create_test_adapter().await;
	let owner = create_user(&adapter, "owner@example.com").await;
	let north = adapter.create_organization(&owner.id, "North").await.unwrap();
	let south = adapter.create_organization(&owner.id, "South").await.unwrap();

	let item = |organization_id, title, slug| CreateItemData {
		organization_id,
		title,
		description: None,
		typ: ItemType::Image,
		media_url: None,
		slug,
	};
	let a = adapter.create_item(&owner.id, &item(Some(&north.id), "Sunrise", "slug-a")).await.unwrap();
	let b = adapter.create_item(&owner.id, &item(Some(&south.id), "Sunset", "slug-b")).await.unwrap();
	let c = adapter.create_item(&owner.id, &item(None, "Loose", "slug-c")).await.unwrap();

	let all = ContentQuery::for_owner(&owner.id);
	assert_eq!(adapter.list_items(&all).await.unwrap().len(), 3);

	let scoped = all.clone().and_org_filter(OrgFilter::AnyOf(vec![north.id.clone()].into()));
	let items = adapter.list_items(&scoped).await.unwrap();
	assert_eq!(items.len(), 1);
	assert_eq!(items[0].id, a.id);

	// Out-of-scope and unassigned records are invisible
	let res = adapter.read_item(&scoped.clone().with_id(&b.id)).await;
	assert!(matches!(res, Err(Error::NotFound)));
	let res = adapter.read_item(&scoped.clone().with_id(&c.id)).await;
	assert!(matches!(res, Err(Error::NotFound)));
	let res = adapter.delete_item(&scoped.clone().with_id(&b.id)).await;
	assert!(matches!(res, Err(Error::NotFound)));

	let update = UpdateItemData { title: Some("Sunrise 2"), ..Default::default() };
	let updated = adapter.update_item(&scoped.clone().with_id(&a.id), &update).await.unwrap();
	assert_eq!(updated.title.as_ref(), "Sunrise 2");
	assert_eq!(updated.typ, ItemType::Image);

	let res = adapter.update_item(&scoped.with_id(&b.id), &update).await;
	assert!(matches!(res, Err(Error::NotFound)));

	let search = all.clone().with_search(Some("sun"));
	assert_eq!(adapter.list_items(&search).await.unwrap().len(), 2);

	let dup = adapter.create_item(&owner.id, &item(None, "Dup", "slug-a")).await;
	assert!(matches!(dup, Err(Error::Conflict(_))));

	let other = create_user(&adapter, "other@example.com").await;
	let res = adapter.read_item(&ContentQuery::for_owner(&other.id).with_id(&a.id)).await;
	assert!(matches!(res, Err(Error::NotFound)));
}

#[tokio::test]
async fn test_campaigns() {
	let (adapter, _temp) = create_test_adapter().await;
	let owner = create_user(&adapter, "owner@example.com").await;
	let org = adapter.create_organization(&owner.id, "North").await.unwrap();

	let campaign = adapter.create_campaign(&owner.id, &named(Some(&org.id), "Spring")).await.unwrap();
	assert_eq!(campaign.organization_id.as_ref(), Some(&org.id));

	let query = ContentQuery::for_owner(&owner.id).with_id(&campaign.id);
	let update = UpdateNamedData { category: Some("seasonal"), ..Default::default() };
	let updated = adapter.update_campaign(&query, &update).await.unwrap();
	assert_eq!(updated.name.as_ref(), "Spring");
	assert_eq!(updated.category.as_deref(), Some("seasonal"));

	adapter.delete_campaign(&query).await.unwrap();
	assert!(matches!(adapter.read_campaign(&query).await, Err(Error::NotFound)));
}

#[tokio::test]
async fn test_cohort_members_and_streams() {
	let (adapter, _temp) = create_test_adapter().await;
	let owner = create_user(&adapter, "owner@example.com").await;

	let cohort = adapter.create_cohort(&owner.id, &named(None, "Donors")).await.unwrap();
	assert_eq!(cohort.member_count, 0);

	let members = adapter
		.create_cohort_members(
			&cohort.id,
			&[
				CreateCohortMemberData { name: Some("Ann"), email: Some("ann@example.com"), phone: None },
				CreateCohortMemberData { name: None, email: None, phone: Some("+3612345") },
			],
		)
		.await
		.unwrap();
	assert_eq!(members.len(), 2);

	let query = ContentQuery::for_owner(&owner.id).with_id(&cohort.id);
	assert_eq!(adapter.read_cohort(&query).await.unwrap().member_count, 2);

	adapter.delete_cohort_member(&cohort.id, &members[0].id).await.unwrap();
	let res = adapter.delete_cohort_member(&cohort.id, &members[0].id).await;
	assert!(matches!(res, Err(Error::NotFound)));
	assert_eq!(adapter.list_cohort_members(&cohort.id).await.unwrap().len(), 1);

	let campaign = adapter.create_campaign(&owner.id, &named(None, "Spring")).await.unwrap();
	adapter.assign_cohort_stream(&cohort.id, &campaign.id).await.unwrap();
	let res = adapter.assign_cohort_stream(&cohort.id, &campaign.id).await;
	assert!(matches!(res, Err(Error::Conflict(_))));

	let streams = adapter.list_cohort_streams(&cohort.id).await.unwrap();
	assert_eq!(streams.len(), 1);
	assert_eq!(streams[0].id, campaign.id);

	adapter.unassign_cohort_stream(&cohort.id, &campaign.id).await.unwrap();
	assert!(adapter.list_cohort_streams(&cohort.id).await.unwrap().is_empty());
	adapter.assign_cohort_stream(&cohort.id, &campaign.id).await.unwrap();

	// Deleting the cohort cascades to members and stream assignments
	adapter.delete_cohort(&query).await.unwrap();
	assert!(adapter.list_cohort_members(&cohort.id).await.unwrap().is_empty());
	assert!(adapter.list_cohort_streams(&cohort.id).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_platform_settings_roundtrip() {
	let (adapter, _temp) = create_test_adapter().await;
	assert!(adapter.read_platform_settings().await.unwrap().is_none());

	let value = serde_json::json!({ "maintenanceMode": true, "sessionTimeoutMinutes": 30 });
	adapter.write_platform_settings(&value).await.unwrap();
	assert_eq!(adapter.read_platform_settings().await.unwrap(), Some(value));

	let value = serde_json::json!({ "maintenanceMode": false });
	adapter.write_platform_settings(&value).await.unwrap();
	assert_eq!(adapter.read_platform_settings().await.unwrap(), Some(value));
}

#[tokio::test]
async fn test_audit_entries() {
	let (adapter, _temp) = create_test_adapter().await;

	for (user, action) in [("u1", "CREATE_ITEM"), ("u2", "DELETE_ITEM"), ("u1", "UPDATE_ITEM")] {
		adapter
			.create_audit_entry(&AuditLogEntry {
				user_id: UserId::from(user),
				action: action.into(),
				ip_address: Some("10.0.0.1".into()),
				device: None,
				metadata: serde_json::json!({ "path": "/api/items" }),
				created_at: Timestamp(1000),
			})
			.await
			.unwrap();
	}

	let all = adapter.list_audit_entries(None, 10).await.unwrap();
	assert_eq!(all.len(), 3);
	assert_eq!(all[0].action.as_ref(), "UPDATE_ITEM");

	let u1 = adapter.list_audit_entries(Some(&UserId::from("u1")), 10).await.unwrap();
	assert_eq!(u1.len(), 2);
	assert_eq!(u1[1].metadata["path"], "/api/items");
	assert_eq!(u1[1].ip_address.as_deref(), Some("10.0.0.1"));
}

// vim: ts=4
