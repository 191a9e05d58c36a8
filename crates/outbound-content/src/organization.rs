//! Organization handlers

use axum::{
	Extension, Json,
	extract::State,
	http::StatusCode,
};
use serde::Deserialize;

use outbound_core::audit::CreatedResource;
use outbound_core::extract::Auth;
use outbound_core::org_scope::build_filter;
use outbound_types::meta_adapter::{OrgStore, Organization};
use outbound_types::utils::required_text;

use crate::prelude::*;

#[derive(Debug, Deserialize)]
pub struct CreateOrganizationRequest {
	pub name: String,
}

/// GET /api/organizations
///
/// The effective owner's organizations, limited to the scope of a team member.
pub async fn list_organizations(
	State(app): State<App>,
	Auth(ctx): Auth,
) -> OiResult<Json<ApiResponse<Vec<Organization>>>> {
	let orgs = app
		.meta_adapter
		.list_organizations(&ctx.effective_user_id, &build_filter(&ctx.org_scope))
		.await?;
	let total = orgs.len();

	Ok(Json(ApiResponse::new(orgs).with_total(total)))
}

/// POST /api/organizations - account owners only
pub async fn post_organization(
	State(app): State<App>,
	Auth(ctx): Auth,
	Json(req): Json<CreateOrganizationRequest>,
) -> OiResult<(StatusCode, Extension<CreatedResource>, Json<ApiResponse<Organization>>)> {
	if ctx.is_team_member() {
		warn!(user_id = %ctx.user_id, owner_id = %ctx.effective_user_id, "Team member tried to create an organization");
		return Err(Error::PermissionDenied);
	}
	let name = required_text("name", &req.name)?;

	let org = app.meta_adapter.create_organization(&ctx.effective_user_id, &name).await?;
	info!(user_id = %ctx.user_id, org_id = %org.id, "Organization created");

	Ok((
		StatusCode::CREATED,
		Extension(CreatedResource(org.id.as_str().into())),
		Json(ApiResponse::new(org)),
	))
}

// vim: ts=4
