//! Campaign (stream) handlers

use axum::{
	Extension, Json,
	extract::{Path, Query, State},
	http::StatusCode,
};
use serde::Deserialize;

use outbound_core::audit::CreatedResource;
use outbound_core::extract::{Auth, OptionalRequestId};
use outbound_core::org_scope::resolve_create_org;
use outbound_types::meta_adapter::{Campaign, ContentStore, CreateNamedData, UpdateNamedData};
use outbound_types::utils::{optional_text, required_text};

use crate::prelude::*;
use crate::query::{self, ListContentQuery};

/// Request body shared by campaign and cohort creation
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateNamedRequest {
	pub name: String,
	pub description: Option<String>,
	pub category: Option<String>,
	pub organization_id: Option<OrgId>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateNamedRequest {
	pub name: Option<String>,
	pub description: Option<String>,
	pub category: Option<String>,
}

pub(crate) struct NamedFields {
	pub name: Box<str>,
	pub organization_id: Option<OrgId>,
}

/// Validates the name and resolves the organization of a new campaign or cohort
pub(crate) async fn prepare_create(
	app: &App,
	ctx: &outbound_core::RequestCtx,
	req: &CreateNamedRequest,
) -> OiResult<NamedFields> {
	let name = required_text("name", &req.name)?;
	let organization_id =
		resolve_create_org(app.meta_adapter.as_ref(), ctx, req.organization_id.clone()).await?;
	Ok(NamedFields { name, organization_id })
}

pub(crate) fn update_data<'a>(
	req: &'a UpdateNamedRequest,
	name: Option<&'a str>,
) -> UpdateNamedData<'a> {
	UpdateNamedData {
		name,
		description: req.description.as_deref().map(str::trim),
		category: req.category.as_deref().map(str::trim),
	}
}

/// GET /api/campaigns
pub async fn list_campaigns(
	State(app): State<App>,
	Auth(ctx): Auth,
	Query(params): Query<ListContentQuery>,
	OptionalRequestId(req_id): OptionalRequestId,
) -> OiResult<Json<ApiResponse<Vec<Campaign>>>> {
	let campaigns = app.meta_adapter.list_campaigns(&query::listing(&ctx, &params)).await?;
	let total = campaigns.len();

	Ok(Json(ApiResponse::new(campaigns).with_total(total).with_req_id(req_id.unwrap_or_default())))
}

/// GET /api/campaigns/{id}
pub async fn get_campaign(
	State(app): State<App>,
	Auth(ctx): Auth,
	Path(id): Path<String>,
) -> OiResult<Json<ApiResponse<Campaign>>> {
	let campaign = app.meta_adapter.read_campaign(&query::scoped(&ctx).with_id(&id)).await?;
	Ok(Json(ApiResponse::new(campaign)))
}

/// POST /api/campaigns
pub async fn post_campaign(
	State(app): State<App>,
	Auth(ctx): Auth,
	Json(req): Json<CreateNamedRequest>,
) -> OiResult<(StatusCode, Extension<CreatedResource>, Json<ApiResponse<Campaign>>)> {
	let fields = prepare_create(&app, &ctx, &req).await?;

	let campaign = app
		.meta_adapter
		.create_campaign(
			&ctx.effective_user_id,
			&CreateNamedData {
				organization_id: fields.organization_id.as_ref(),
				name: &fields.name,
				description: optional_text(req.description.as_deref()),
				category: optional_text(req.category.as_deref()),
			},
		)
		.await?;
	info!(user_id = %ctx.user_id, owner_id = %ctx.effective_user_id, campaign_id = %campaign.id, "Campaign created");

	Ok((
		StatusCode::CREATED,
		Extension(CreatedResource(campaign.id.clone())),
		Json(ApiResponse::new(campaign)),
	))
}

/// PUT /api/campaigns/{id}
pub async fn put_campaign(
	State(app): State<App>,
	Auth(ctx): Auth,
	Path(id): Path<String>,
	Json(req): Json<UpdateNamedRequest>,
) -> OiResult<Json<ApiResponse<Campaign>>> {
	let name = req.name.as_deref().map(|n| required_text("name", n)).transpose()?;
	let campaign = app
		.meta_adapter
		.update_campaign(&query::scoped(&ctx).with_id(&id), &update_data(&req, name.as_deref()))
		.await?;
	Ok(Json(ApiResponse::new(campaign)))
}

/// DELETE /api/campaigns/{id}
pub async fn delete_campaign(
	State(app): State<App>,
	Auth(ctx): Auth,
	Path(id): Path<String>,
) -> OiResult<StatusCode> {
	app.meta_adapter.delete_campaign(&query::scoped(&ctx).with_id(&id)).await?;
	info!(user_id = %ctx.user_id, campaign_id = %id, "Campaign deleted");
	Ok(StatusCode::NO_CONTENT)
}

// vim: ts=4
