//! Effective identity, organization scoping, capability checks and auditing

mod common;

use axum::http::StatusCode;
use serde_json::{Value, json};

use common::{TestEnv, code, setup};
use outbound::meta_adapter::OrgStore;
use outbound::prelude::*;

struct Team {
	owner_token: String,
	org_a: OrgId,
	org_b: OrgId,
}

/// Owner with organizations A and B
async fn owner_with_orgs(env: &TestEnv) -> Team {
	let owner = env.user("owner@example.com", Role::OrgMedium).await;
	let org_a = env.meta.create_organization(&owner.id, "A").await.unwrap().id;
	let org_b = env.meta.create_organization(&owner.id, "B").await.unwrap().id;
	Team { owner_token: env.token(&owner).await, org_a, org_b }
}

/// Invites a new user to the team and returns their token and membership id
async fn member(env: &TestEnv, team: &Team, email: &str, role: &str, orgs: &[&OrgId]) -> (String, String) {
	let user = env.user(email, Role::Individual).await;
	let (status, body) = env
		.post(
			"/api/team",
			&team.owner_token,
			json!({ "email": email, "role": role, "organizationIds": orgs }),
		)
		.await;
	assert_eq!(status, StatusCode::CREATED, "{}", body);
	assert_eq!(body["data"]["status"], "ACTIVE");
	(env.token(&user).await, body["data"]["id"].as_str().unwrap().to_string())
}

fn ids(body: &Value) -> Vec<&str> {
	body["data"].as_array().unwrap().iter().map(|v| v["id"].as_str().unwrap()).collect()
}

#[tokio::test]
async fn test_member_acts_for_owner() {
	let env = setup().await;
	let team = owner_with_orgs(&env).await;
	let (token, _) = member(&env, &team, "m@example.com", "EDITOR", &[&team.org_b]).await;

	let (status, body) = env.get("/api/me", &token).await;
	assert_eq!(status, StatusCode::OK);
	assert_ne!(body["data"]["userId"], body["data"]["effectiveUserId"]);
	assert_eq!(body["data"]["teamRole"], "EDITOR");
	assert_eq!(body["data"]["orgScope"], json!([team.org_b.as_str()]));

	// Created content belongs to the owner
	let (status, body) = env.post("/api/campaigns", &token, json!({ "name": "Spring" })).await;
	assert_eq!(status, StatusCode::CREATED);
	let (_, owner_list) = env.get("/api/campaigns", &team.owner_token).await;
	assert_eq!(ids(&owner_list), vec![body["data"]["id"].as_str().unwrap()]);
}

#[tokio::test]
async fn test_scoped_member_sees_only_scope() {
	let env = setup().await;
	let team = owner_with_orgs(&env).await;
	let (token, _) = member(&env, &team, "m@example.com", "VIEWER", &[&team.org_b]).await;

	let item = |org: &OrgId, title: &str| {
		json!({ "title": title, "type": "IMAGE", "organizationId": org.as_str() })
	};
	let (_, in_a) = env.post("/api/items", &team.owner_token, item(&team.org_a, "In A")).await;
	let (_, in_b) = env.post("/api/items", &team.owner_token, item(&team.org_b, "In B")).await;
	let (status, _) = env
		.post("/api/items", &team.owner_token, json!({ "title": "Loose", "type": "TEXT" }))
		.await;
	assert_eq!(status, StatusCode::CREATED);

	let (_, owner_list) = env.get("/api/items", &team.owner_token).await;
	assert_eq!(owner_list["total"], 3);

	let (status, body) = env.get("/api/items", &token).await;
	assert_eq!(status, StatusCode::OK);
	assert_eq!(ids(&body), vec![in_b["data"]["id"].as_str().unwrap()]);

	// Outside the scope is indistinguishable from missing
	let uri = format!("/api/items/{}", in_a["data"]["id"].as_str().unwrap());
	let (status, _) = env.get(&uri, &token).await;
	assert_eq!(status, StatusCode::NOT_FOUND);

	let (_, orgs) = env.get("/api/organizations", &token).await;
	assert_eq!(ids(&orgs), vec![team.org_b.as_str()]);
}

#[tokio::test]
async fn test_create_auto_assigns_first_scope_org() {
	let env = setup().await;
	let team = owner_with_orgs(&env).await;
	let (token, _) =
		member(&env, &team, "m@example.com", "EDITOR", &[&team.org_b, &team.org_a]).await;

	let (status, body) = env.post("/api/cohorts", &token, json!({ "name": "Donors" })).await;
	assert_eq!(status, StatusCode::CREATED);
	assert_eq!(body["data"]["organizationId"], team.org_b.as_str());

	let (status, body) = env
		.post("/api/cohorts", &token, json!({ "name": "Other", "organizationId": team.org_a.as_str() }))
		.await;
	assert_eq!(status, StatusCode::CREATED);
	assert_eq!(body["data"]["organizationId"], team.org_a.as_str());
}

#[tokio::test]
async fn test_create_outside_scope_is_403() {
	let env = setup().await;
	let team = owner_with_orgs(&env).await;
	let (token, _) = member(&env, &team, "m@example.com", "EDITOR", &[&team.org_b]).await;

	let (status, _) = env
		.post("/api/items", &token, json!({ "title": "X", "type": "LINK", "organizationId": team.org_a.as_str() }))
		.await;
	assert_eq!(status, StatusCode::FORBIDDEN);

	// Owners cannot use organizations of other accounts
	let stranger = env.user("s@example.com", Role::OrgSmall).await;
	let foreign = env.meta.create_organization(&stranger.id, "Foreign").await.unwrap();
	let (status, _) = env
		.post("/api/items", &team.owner_token, json!({ "title": "X", "type": "LINK", "organizationId": foreign.id.as_str() }))
		.await;
	assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_viewer_cannot_create_cohort() {
	let env = setup().await;
	let team = owner_with_orgs(&env).await;
	let (token, _) = member(&env, &team, "v@example.com", "VIEWER", &[]).await;

	let (status, body) = env.post("/api/cohorts", &token, json!({ "name": "Donors" })).await;
	assert_eq!(status, StatusCode::FORBIDDEN);
	assert_eq!(code(&body), "CAPABILITY_DENIED");
	assert_eq!(body["error"]["message"], "VIEWER role cannot create cohort; EDITOR role required");

	let (status, _) = env.get("/api/cohorts", &token).await;
	assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_editor_cannot_delete() {
	let env = setup().await;
	let team = owner_with_orgs(&env).await;
	let (token, _) = member(&env, &team, "e@example.com", "EDITOR", &[]).await;

	let (_, body) = env.post("/api/campaigns", &token, json!({ "name": "Spring" })).await;
	let uri = format!("/api/campaigns/{}", body["data"]["id"].as_str().unwrap());

	let (status, _) = env.put(&uri, &token, json!({ "description": "Updated" })).await;
	assert_eq!(status, StatusCode::OK);
	let (status, body) = env.delete(&uri, &token).await;
	assert_eq!(status, StatusCode::FORBIDDEN);
	assert_eq!(body["error"]["message"], "EDITOR role cannot delete campaign; ADMIN role required");

	let (status, _) = env.delete(&uri, &team.owner_token).await;
	assert_eq!(status, StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn test_cohort_members_and_streams() {
	let env = setup().await;
	let team = owner_with_orgs(&env).await;
	let token = &team.owner_token;

	let (_, cohort) = env.post("/api/cohorts", token, json!({ "name": "Donors" })).await;
	let cohort_id = cohort["data"]["id"].as_str().unwrap();

	let (status, body) = env
		.post(
			&format!("/api/cohorts/{}/members/import", cohort_id),
			token,
			json!([
				{ "name": "Ann", "email": "ann@example.com" },
				{ "phone": "+3612345" },
				{ "email": "bob@example.com" }
			]),
		)
		.await;
	assert_eq!(status, StatusCode::CREATED);
	assert_eq!(body["data"], json!({ "imported": 2, "skipped": 1 }));

	let (_, body) = env.get(&format!("/api/cohorts/{}", cohort_id), token).await;
	assert_eq!(body["data"]["memberCount"], 2);

	let (status, _) = env
		.post(&format!("/api/cohorts/{}/members", cohort_id), token, json!({ "email": "nope" }))
		.await;
	assert_eq!(status, StatusCode::BAD_REQUEST);

	let (_, campaign) = env.post("/api/campaigns", token, json!({ "name": "Spring" })).await;
	let campaign_id = campaign["data"]["id"].as_str().unwrap();
	let streams_uri = format!("/api/cohorts/{}/streams", cohort_id);

	let (status, _) = env.post(&streams_uri, token, json!({ "campaignId": campaign_id })).await;
	assert_eq!(status, StatusCode::CREATED);
	let (status, _) = env.post(&streams_uri, token, json!({ "campaignId": campaign_id })).await;
	assert_eq!(status, StatusCode::CONFLICT);
	let (status, _) = env.post(&streams_uri, token, json!({ "campaignId": "missing" })).await;
	assert_eq!(status, StatusCode::NOT_FOUND);

	let (_, body) = env.get(&streams_uri, token).await;
	assert_eq!(ids(&body), vec![campaign_id]);

	let (status, _) = env.delete(&format!("{}/{}", streams_uri, campaign_id), token).await;
	assert_eq!(status, StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn test_team_management() {
	let env = setup().await;
	let team = owner_with_orgs(&env).await;
	let (admin_token, admin_member_id) =
		member(&env, &team, "a@example.com", "ADMIN", &[]).await;
	let (editor_token, editor_member_id) =
		member(&env, &team, "e@example.com", "EDITOR", &[]).await;

	// Unknown invitee stays pending
	let (status, body) = env
		.post("/api/team", &admin_token, json!({ "email": "new@example.com", "role": "VIEWER" }))
		.await;
	assert_eq!(status, StatusCode::CREATED);
	assert_eq!(body["data"]["status"], "PENDING");

	let (status, _) = env
		.post("/api/team", &editor_token, json!({ "email": "x@example.com", "role": "VIEWER" }))
		.await;
	assert_eq!(status, StatusCode::FORBIDDEN);

	let (_, body) = env.get("/api/team", &editor_token).await;
	assert_eq!(body["total"], 3);

	// Organizations must be the owner's
	let uri = format!("/api/team/{}", editor_member_id);
	let (status, _) =
		env.put(&uri, &admin_token, json!({ "organizationIds": ["not-an-org"] })).await;
	assert_eq!(status, StatusCode::FORBIDDEN);
	let (status, body) = env
		.put(&uri, &admin_token, json!({ "role": "VIEWER", "organizationIds": [team.org_a.as_str()] }))
		.await;
	assert_eq!(status, StatusCode::OK);
	assert_eq!(body["data"]["role"], "VIEWER");

	let (status, _) = env.delete(&format!("/api/team/{}", admin_member_id), &admin_token).await;
	assert_eq!(status, StatusCode::CONFLICT);
	let (status, _) = env.delete(&uri, &admin_token).await;
	assert_eq!(status, StatusCode::NO_CONTENT);

	// The removed member acts as themselves again
	let (_, body) = env.get("/api/me", &editor_token).await;
	assert_eq!(body["data"]["userId"], body["data"]["effectiveUserId"]);
}

#[tokio::test]
async fn test_scoped_admin_cannot_widen_scope() {
	let env = setup().await;
	let team = owner_with_orgs(&env).await;
	let (status, _) = env
		.post(
			"/api/items",
			&team.owner_token,
			json!({ "title": "Secret A", "type": "TEXT", "organizationId": team.org_a.as_str() }),
		)
		.await;
	assert_eq!(status, StatusCode::CREATED);

	let (admin_token, admin_member_id) =
		member(&env, &team, "a@example.com", "ADMIN", &[&team.org_b]).await;
	let (_, in_a_member_id) = member(&env, &team, "in-a@example.com", "VIEWER", &[&team.org_a]).await;
	let (_, unscoped_member_id) = member(&env, &team, "all@example.com", "VIEWER", &[]).await;

	// An empty list would lift the restriction
	let own_uri = format!("/api/team/{}", admin_member_id);
	let (status, _) = env.put(&own_uri, &admin_token, json!({ "organizationIds": [] })).await;
	assert_eq!(status, StatusCode::FORBIDDEN);
	let (status, body) = env.get("/api/items", &admin_token).await;
	assert_eq!(status, StatusCode::OK);
	assert_eq!(body["total"], 0);

	let (status, _) = env
		.post("/api/team", &admin_token, json!({ "email": "acc@example.com", "role": "ADMIN", "organizationIds": [] }))
		.await;
	assert_eq!(status, StatusCode::FORBIDDEN);
	let (status, _) = env
		.post("/api/team", &admin_token, json!({ "email": "acc@example.com", "role": "ADMIN" }))
		.await;
	assert_eq!(status, StatusCode::FORBIDDEN);
	let (status, body) = env
		.post(
			"/api/team",
			&admin_token,
			json!({ "email": "acc@example.com", "role": "VIEWER", "organizationIds": [team.org_b.as_str()] }),
		)
		.await;
	assert_eq!(status, StatusCode::CREATED);
	assert_eq!(body["data"]["organizationIds"], json!([team.org_b.as_str()]));

	// Memberships reaching outside the scope are not manageable
	for id in [&in_a_member_id, &unscoped_member_id] {
		let uri = format!("/api/team/{}", id);
		let (status, _) =
			env.put(&uri, &admin_token, json!({ "organizationIds": [team.org_b.as_str()] })).await;
		assert_eq!(status, StatusCode::FORBIDDEN);
		let (status, _) = env.delete(&uri, &admin_token).await;
		assert_eq!(status, StatusCode::FORBIDDEN);
	}

	let (status, _) = env.put(&own_uri, &admin_token, json!({ "role": "ADMIN" })).await;
	assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_unassign_stream_outside_scope_is_404() {
	let env = setup().await;
	let team = owner_with_orgs(&env).await;
	let token = &team.owner_token;

	let (_, cohort) = env
		.post("/api/cohorts", token, json!({ "name": "Donors", "organizationId": team.org_b.as_str() }))
		.await;
	let cohort_id = cohort["data"]["id"].as_str().unwrap();
	let (_, campaign) = env
		.post("/api/campaigns", token, json!({ "name": "Spring", "organizationId": team.org_a.as_str() }))
		.await;
	let campaign_id = campaign["data"]["id"].as_str().unwrap();
	let streams_uri = format!("/api/cohorts/{}/streams", cohort_id);
	let (status, _) = env.post(&streams_uri, token, json!({ "campaignId": campaign_id })).await;
	assert_eq!(status, StatusCode::CREATED);

	let (admin_token, _) = member(&env, &team, "a@example.com", "ADMIN", &[&team.org_b]).await;
	let (status, _) = env.delete(&format!("{}/{}", streams_uri, campaign_id), &admin_token).await;
	assert_eq!(status, StatusCode::NOT_FOUND);

	let (_, body) = env.get(&streams_uri, token).await;
	assert_eq!(ids(&body), vec![campaign_id]);
}

#[tokio::test]
async fn test_team_member_cannot_create_organization() {
	let env = setup().await;
	let team = owner_with_orgs(&env).await;
	let (token, _) = member(&env, &team, "a@example.com", "ADMIN", &[]).await;

	let (status, _) = env.post("/api/organizations", &token, json!({ "name": "Mine" })).await;
	assert_eq!(status, StatusCode::FORBIDDEN);
	let (status, _) = env.post("/api/organizations", &team.owner_token, json!({ "name": "C" })).await;
	assert_eq!(status, StatusCode::CREATED);
}

#[tokio::test]
async fn test_successful_writes_are_audited() {
	let env = setup().await;
	let team = owner_with_orgs(&env).await;
	let (token, _) = member(&env, &team, "e@example.com", "EDITOR", &[&team.org_a]).await;
	env.recorder.drain().await;

	let (status, body) = env
		.post("/api/items", &token, json!({ "title": "Poster", "type": "IMAGE", "mediaUrl": "https://cdn/x.png" }))
		.await;
	assert_eq!(status, StatusCode::CREATED);
	let item_id = body["data"]["id"].as_str().unwrap().to_string();

	// Reads and denied writes are not audited
	env.get("/api/items", &token).await;
	env.delete(&format!("/api/items/{}", item_id), &token).await;

	assert_eq!(env.recorder.drain().await, 1);
	let entries = env.meta.list_audit_entries(None, 10).await.unwrap();
	let entry = entries.iter().find(|e| e.action.as_ref() == "CREATE_ITEM").unwrap();
	assert_eq!(entry.metadata["resourceId"], item_id.as_str());
	assert_eq!(entry.metadata["status"], 201);
	assert_eq!(entry.metadata["body"]["title"], "Poster");
	assert!(entry.metadata["effectiveUserId"].is_string());
	assert_ne!(entry.metadata["effectiveUserId"].as_str(), Some(entry.user_id.as_str()));
}

// vim: ts=4
