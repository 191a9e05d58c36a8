//! Item handlers

use axum::{
	Extension, Json,
	extract::{Path, Query, State},
	http::StatusCode,
};
use serde::Deserialize;

use outbound_core::audit::CreatedResource;
use outbound_core::extract::{Auth, OptionalRequestId};
use outbound_core::org_scope::resolve_create_org;
use outbound_types::meta_adapter::{ContentStore, CreateItemData, Item, ItemType, UpdateItemData};
use outbound_types::utils::{optional_text, random_slug, required_text};

use crate::prelude::*;
use crate::query::{self, ListContentQuery};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateItemRequest {
	pub title: String,
	pub description: Option<String>,
	#[serde(rename = "type")]
	pub typ: ItemType,
	pub media_url: Option<String>,
	pub organization_id: Option<OrgId>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateItemRequest {
	pub title: Option<String>,
	pub description: Option<String>,
	#[serde(rename = "type")]
	pub typ: Option<ItemType>,
	pub media_url: Option<String>,
}

/// GET /api/items
pub async fn list_items(
	State(app): State<App>,
	Auth(ctx): Auth,
	Query(params): Query<ListContentQuery>,
	OptionalRequestId(req_id): OptionalRequestId,
) -> OiResult<Json<ApiResponse<Vec<Item>>>> {
	let items = app.meta_adapter.list_items(&query::listing(&ctx, &params)).await?;
	let total = items.len();

	Ok(Json(ApiResponse::new(items).with_total(total).with_req_id(req_id.unwrap_or_default())))
}

/// GET /api/items/{id}
pub async fn get_item(
	State(app): State<App>,
	Auth(ctx): Auth,
	Path(id): Path<String>,
) -> OiResult<Json<ApiResponse<Item>>> {
	let item = app.meta_adapter.read_item(&query::scoped(&ctx).with_id(&id)).await?;
	Ok(Json(ApiResponse::new(item)))
}

/// POST /api/items
pub async fn post_item(
	State(app): State<App>,
	Auth(ctx): Auth,
	Json(req): Json<CreateItemRequest>,
) -> OiResult<(StatusCode, Extension<CreatedResource>, Json<ApiResponse<Item>>)> {
	let title = required_text("title", &req.title)?;
	let organization_id =
		resolve_create_org(app.meta_adapter.as_ref(), &ctx, req.organization_id).await?;
	let slug = random_slug();

	let item = app
		.meta_adapter
		.create_item(
			&ctx.effective_user_id,
			&CreateItemData {
				organization_id: organization_id.as_ref(),
				title: &title,
				description: optional_text(req.description.as_deref()),
				typ: req.typ,
				media_url: optional_text(req.media_url.as_deref()),
				slug: &slug,
			},
		)
		.await?;
	info!(user_id = %ctx.user_id, owner_id = %ctx.effective_user_id, item_id = %item.id, "Item created");

	Ok((StatusCode::CREATED, Extension(CreatedResource(item.id.clone())), Json(ApiResponse::new(item))))
}

/// PUT /api/items/{id}
pub async fn put_item(
	State(app): State<App>,
	Auth(ctx): Auth,
	Path(id): Path<String>,
	Json(req): Json<UpdateItemRequest>,
) -> OiResult<Json<ApiResponse<Item>>> {
	let title = req.title.as_deref().map(|t| required_text("title", t)).transpose()?;
	let data = UpdateItemData {
		title: title.as_deref(),
		description: req.description.as_deref().map(str::trim),
		typ: req.typ,
		media_url: req.media_url.as_deref().map(str::trim),
	};

	let item = app.meta_adapter.update_item(&query::scoped(&ctx).with_id(&id), &data).await?;
	Ok(Json(ApiResponse::new(item)))
}

/// DELETE /api/items/{id}
pub async fn delete_item(
	State(app): State<App>,
	Auth(ctx): Auth,
	Path(id): Path<String>,
) -> OiResult<StatusCode> {
	app.meta_adapter.delete_item(&query::scoped(&ctx).with_id(&id)).await?;
	info!(user_id = %ctx.user_id, item_id = %id, "Item deleted");
	Ok(StatusCode::NO_CONTENT)
}

// vim: ts=4
