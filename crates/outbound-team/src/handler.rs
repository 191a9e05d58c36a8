//! Team API handlers

use axum::{
	Extension, Json,
	extract::{Path, State},
	http::StatusCode,
};
use serde::Deserialize;

use outbound_core::RequestCtx;
use outbound_core::audit::CreatedResource;
use outbound_core::extract::{Auth, OptionalRequestId};
use outbound_core::org_scope::check_owned_orgs;
use outbound_types::meta_adapter::{
	CreateTeamMemberData, MemberStatus, TeamMember, TeamStore, UpdateTeamMemberData, UserStore,
};
use outbound_types::utils::is_valid_email;

use crate::prelude::*;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InviteRequest {
	pub email: String,
	pub role: TeamRole,
	#[serde(default)]
	pub organization_ids: Vec<OrgId>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateMemberRequest {
	pub role: Option<TeamRole>,
	pub organization_ids: Option<Vec<OrgId>>,
}

/// Checks that `ids` lie inside the scope of the caller. An empty list is unrestricted,
/// so only an unscoped caller may hand it out.
fn check_within_scope(ctx: &RequestCtx, ids: &[OrgId]) -> OiResult<()> {
	if ctx.org_scope.is_empty() {
		return Ok(());
	}
	if ids.is_empty() {
		warn!(user_id = %ctx.user_id, "Unrestricted membership outside of scope");
		return Err(Error::PermissionDenied);
	}
	if let Some(org_id) = ids.iter().find(|id| !ctx.org_scope.contains(id)) {
		warn!(user_id = %ctx.user_id, org_id = %org_id, "Organization outside of scope");
		return Err(Error::PermissionDenied);
	}
	Ok(())
}

/// Organization ids assigned to a membership must be the owner's, and a scoped team
/// admin can only hand out organizations of their own scope.
async fn check_assignable_orgs(app: &App, ctx: &RequestCtx, ids: &[OrgId]) -> OiResult<()> {
	check_within_scope(ctx, ids)?;
	check_owned_orgs(app.meta_adapter.as_ref(), &ctx.effective_user_id, ids).await
}

/// Reads a membership the caller may manage: a scoped team admin only manages
/// memberships restricted to organizations of their own scope.
async fn read_manageable_member(app: &App, ctx: &RequestCtx, id: &str) -> OiResult<TeamMember> {
	let member = app.meta_adapter.read_team_member(&ctx.effective_user_id, id).await?;
	check_within_scope(ctx, &member.organization_ids)?;
	Ok(member)
}

/// GET /api/team
pub async fn list_team(
	State(app): State<App>,
	Auth(ctx): Auth,
	OptionalRequestId(req_id): OptionalRequestId,
) -> OiResult<Json<ApiResponse<Vec<TeamMember>>>> {
	let members = app.meta_adapter.list_team_members(&ctx.effective_user_id).await?;
	let total = members.len();

	Ok(Json(ApiResponse::new(members).with_total(total).with_req_id(req_id.unwrap_or_default())))
}

/// POST /api/team
///
/// An email of an existing user is linked right away and the membership is active.
/// Otherwise the membership stays pending until the invitee signs up.
pub async fn post_invite(
	State(app): State<App>,
	Auth(ctx): Auth,
	Json(req): Json<InviteRequest>,
) -> OiResult<(StatusCode, Extension<CreatedResource>, Json<ApiResponse<TeamMember>>)> {
	if !is_valid_email(&req.email) {
		return Err(Error::ValidationError(format!("invalid email: {}", req.email.trim())));
	}
	check_assignable_orgs(&app, &ctx, &req.organization_ids).await?;

	let user = app.meta_adapter.read_user_by_email(&req.email).await?;
	if let Some(user) = &user
		&& user.id == ctx.effective_user_id
	{
		return Err(Error::Conflict("the account owner cannot be a team member".into()));
	}
	let status = if user.is_some() { MemberStatus::Active } else { MemberStatus::Pending };

	let member = app
		.meta_adapter
		.create_team_member(
			&ctx.effective_user_id,
			&CreateTeamMemberData {
				user_id: user.as_ref().map(|u| &u.id),
				email: &req.email,
				role: req.role,
				organization_ids: &req.organization_ids,
				status,
			},
		)
		.await?;
	info!(
		user_id = %ctx.user_id,
		owner_id = %ctx.effective_user_id,
		member_id = %member.id,
		role = %member.role,
		status = member.status.as_str(),
		"Team member invited"
	);

	Ok((
		StatusCode::CREATED,
		Extension(CreatedResource(member.id.clone())),
		Json(ApiResponse::new(member)),
	))
}

/// PUT /api/team/{id}
pub async fn put_member(
	State(app): State<App>,
	Auth(ctx): Auth,
	Path(id): Path<String>,
	Json(req): Json<UpdateMemberRequest>,
) -> OiResult<Json<ApiResponse<TeamMember>>> {
	read_manageable_member(&app, &ctx, &id).await?;
	if let Some(ids) = &req.organization_ids {
		check_assignable_orgs(&app, &ctx, ids).await?;
	}

	let data = UpdateTeamMemberData {
		role: req.role,
		organization_ids: req.organization_ids,
		status: None,
	};
	let member = app.meta_adapter.update_team_member(&ctx.effective_user_id, &id, &data).await?;
	info!(user_id = %ctx.user_id, member_id = %member.id, role = %member.role, "Team member updated");

	Ok(Json(ApiResponse::new(member)))
}

/// DELETE /api/team/{id}
pub async fn delete_member(
	State(app): State<App>,
	Auth(ctx): Auth,
	Path(id): Path<String>,
) -> OiResult<StatusCode> {
	let member = read_manageable_member(&app, &ctx, &id).await?;
	if member.user_id.as_ref() == Some(&ctx.user_id) {
		return Err(Error::Conflict("you cannot remove yourself from the team".into()));
	}

	app.meta_adapter.delete_team_member(&ctx.effective_user_id, &id).await?;
	info!(user_id = %ctx.user_id, member_id = %id, "Team member removed");

	Ok(StatusCode::NO_CONTENT)
}

// vim: ts=4
