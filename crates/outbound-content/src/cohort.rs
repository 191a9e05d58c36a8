//! Cohort handlers: cohorts, their members and their stream assignments
//!
//! Member and stream endpoints first read the cohort through the scoped query, so a
//! cohort outside the caller's organizations is a 404 for every nested route too.

use axum::{
	Extension, Json,
	extract::{Path, Query, State},
	http::StatusCode,
};
use serde::{Deserialize, Serialize};

use outbound_core::RequestCtx;
use outbound_core::audit::CreatedResource;
use outbound_core::extract::{Auth, OptionalRequestId};
use outbound_types::meta_adapter::{
	Campaign, Cohort, CohortMember, ContentStore, CreateCohortMemberData, CreateNamedData,
};
use outbound_types::utils::{is_valid_email, optional_text, required_text};

use crate::campaign::{CreateNamedRequest, UpdateNamedRequest, prepare_create, update_data};
use crate::prelude::*;
use crate::query::{self, ListContentQuery};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CohortMemberRequest {
	pub name: Option<String>,
	pub email: Option<String>,
	pub phone: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportResult {
	pub imported: usize,
	pub skipped: usize,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignStreamRequest {
	pub campaign_id: String,
}

async fn read_scoped_cohort(app: &App, ctx: &RequestCtx, id: &str) -> OiResult<Cohort> {
	app.meta_adapter.read_cohort(&query::scoped(ctx).with_id(id)).await
}

/// Validated member row, `None` if it has neither name nor email
fn member_data(req: &CohortMemberRequest) -> OiResult<Option<CreateCohortMemberData<'_>>> {
	let name = optional_text(req.name.as_deref());
	let email = optional_text(req.email.as_deref());
	if name.is_none() && email.is_none() {
		return Ok(None);
	}
	if let Some(email) = email
		&& !is_valid_email(email)
	{
		return Err(Error::ValidationError(format!("invalid email: {}", email)));
	}
	Ok(Some(CreateCohortMemberData { name, email, phone: optional_text(req.phone.as_deref()) }))
}

// Cohorts //
//*********//

/// GET /api/cohorts
pub async fn list_cohorts(
	State(app): State<App>,
	Auth(ctx): Auth,
	Query(params): Query<ListContentQuery>,
	OptionalRequestId(req_id): OptionalRequestId,
) -> OiResult<Json<ApiResponse<Vec<Cohort>>>> {
	let cohorts = app.meta_adapter.list_cohorts(&query::listing(&ctx, &params)).await?;
	let total = cohorts.len();

	Ok(Json(ApiResponse::new(cohorts).with_total(total).with_req_id(req_id.unwrap_or_default())))
}

/// GET /api/cohorts/{id}
pub async fn get_cohort(
	State(app): State<App>,
	Auth(ctx): Auth,
	Path(id): Path<String>,
) -> OiResult<Json<ApiResponse<Cohort>>> {
	let cohort = read_scoped_cohort(&app, &ctx, &id).await?;
	Ok(Json(ApiResponse::new(cohort)))
}

/// POST /api/cohorts
pub async fn post_cohort(
	State(app): State<App>,
	Auth(ctx): Auth,
	Json(req): Json<CreateNamedRequest>,
) -> OiResult<(StatusCode, Extension<CreatedResource>, Json<ApiResponse<Cohort>>)> {
	let fields = prepare_create(&app, &ctx, &req).await?;

	let cohort = app
		.meta_adapter
		.create_cohort(
			&ctx.effective_user_id,
			&CreateNamedData {
				organization_id: fields.organization_id.as_ref(),
				name: &fields.name,
				description: optional_text(req.description.as_deref()),
				category: None,
			},
		)
		.await?;
	info!(user_id = %ctx.user_id, owner_id = %ctx.effective_user_id, cohort_id = %cohort.id, "Cohort created");

	Ok((StatusCode::CREATED, Extension(CreatedResource(cohort.id.clone())), Json(ApiResponse::new(cohort))))
}

/// PUT /api/cohorts/{id}
pub async fn put_cohort(
	State(app): State<App>,
	Auth(ctx): Auth,
	Path(id): Path<String>,
	Json(req): Json<UpdateNamedRequest>,
) -> OiResult<Json<ApiResponse<Cohort>>> {
	let name = req.name.as_deref().map(|n| required_text("name", n)).transpose()?;
	let cohort = app
		.meta_adapter
		.update_cohort(&query::scoped(&ctx).with_id(&id), &update_data(&req, name.as_deref()))
		.await?;
	Ok(Json(ApiResponse::new(cohort)))
}

/// DELETE /api/cohorts/{id}
pub async fn delete_cohort(
	State(app): State<App>,
	Auth(ctx): Auth,
	Path(id): Path<String>,
) -> OiResult<StatusCode> {
	app.meta_adapter.delete_cohort(&query::scoped(&ctx).with_id(&id)).await?;
	info!(user_id = %ctx.user_id, cohort_id = %id, "Cohort deleted");
	Ok(StatusCode::NO_CONTENT)
}

// Members //
//*********//

/// GET /api/cohorts/{id}/members
pub async fn list_members(
	State(app): State<App>,
	Auth(ctx): Auth,
	Path(id): Path<String>,
) -> OiResult<Json<ApiResponse<Vec<CohortMember>>>> {
	let cohort = read_scoped_cohort(&app, &ctx, &id).await?;
	let members = app.meta_adapter.list_cohort_members(&cohort.id).await?;
	let total = members.len();

	Ok(Json(ApiResponse::new(members).with_total(total)))
}

/// POST /api/cohorts/{id}/members
pub async fn post_member(
	State(app): State<App>,
	Auth(ctx): Auth,
	Path(id): Path<String>,
	Json(req): Json<CohortMemberRequest>,
) -> OiResult<(StatusCode, Json<ApiResponse<CohortMember>>)> {
	let Some(data) = member_data(&req)? else {
		return Err(Error::ValidationError("name or email is required".into()));
	};
	let cohort = read_scoped_cohort(&app, &ctx, &id).await?;

	let mut created = app.meta_adapter.create_cohort_members(&cohort.id, &[data]).await?;
	let member =
		created.pop().ok_or_else(|| Error::Internal("cohort member was not created".into()))?;

	Ok((StatusCode::CREATED, Json(ApiResponse::new(member))))
}

/// POST /api/cohorts/{id}/members/import
///
/// Rows with neither a name nor an email are skipped. Any invalid email rejects the
/// whole import.
pub async fn post_import_members(
	State(app): State<App>,
	Auth(ctx): Auth,
	Path(id): Path<String>,
	Json(rows): Json<Vec<CohortMemberRequest>>,
) -> OiResult<(StatusCode, Json<ApiResponse<ImportResult>>)> {
	let mut members = Vec::with_capacity(rows.len());
	for row in &rows {
		if let Some(data) = member_data(row)? {
			members.push(data);
		}
	}
	let skipped = rows.len() - members.len();
	let cohort = read_scoped_cohort(&app, &ctx, &id).await?;

	let imported = if members.is_empty() {
		0
	} else {
		app.meta_adapter.create_cohort_members(&cohort.id, &members).await?.len()
	};
	info!(user_id = %ctx.user_id, cohort_id = %cohort.id, imported, skipped, "Cohort members imported");

	Ok((StatusCode::CREATED, Json(ApiResponse::new(ImportResult { imported, skipped }))))
}

/// DELETE /api/cohorts/{id}/members/{member_id}
pub async fn delete_member(
	State(app): State<App>,
	Auth(ctx): Auth,
	Path((id, member_id)): Path<(String, String)>,
) -> OiResult<StatusCode> {
	let cohort = read_scoped_cohort(&app, &ctx, &id).await?;
	app.meta_adapter.delete_cohort_member(&cohort.id, &member_id).await?;
	Ok(StatusCode::NO_CONTENT)
}

// Streams //
//*********//

/// GET /api/cohorts/{id}/streams
pub async fn list_streams(
	State(app): State<App>,
	Auth(ctx): Auth,
	Path(id): Path<String>,
) -> OiResult<Json<ApiResponse<Vec<Campaign>>>> {
	let cohort = read_scoped_cohort(&app, &ctx, &id).await?;
	let filter = query::scoped(&ctx).org_filter;
	let streams: Vec<Campaign> = app
		.meta_adapter
		.list_cohort_streams(&cohort.id)
		.await?
		.into_iter()
		.filter(|campaign| filter.allows(campaign.organization_id.as_ref()))
		.collect();
	let total = streams.len();

	Ok(Json(ApiResponse::new(streams).with_total(total)))
}

/// POST /api/cohorts/{id}/streams
pub async fn post_stream(
	State(app): State<App>,
	Auth(ctx): Auth,
	Path(id): Path<String>,
	Json(req): Json<AssignStreamRequest>,
) -> OiResult<(StatusCode, Json<ApiResponse<Campaign>>)> {
	let cohort = read_scoped_cohort(&app, &ctx, &id).await?;
	let campaign =
		app.meta_adapter.read_campaign(&query::scoped(&ctx).with_id(&req.campaign_id)).await?;

	app.meta_adapter.assign_cohort_stream(&cohort.id, &campaign.id).await?;
	info!(user_id = %ctx.user_id, cohort_id = %cohort.id, campaign_id = %campaign.id, "Stream assigned");

	Ok((StatusCode::CREATED, Json(ApiResponse::new(campaign))))
}

/// DELETE /api/cohorts/{id}/streams/{campaign_id}
pub async fn delete_stream(
	State(app): State<App>,
	Auth(ctx): Auth,
	Path((id, campaign_id)): Path<(String, String)>,
) -> OiResult<StatusCode> {
	let cohort = read_scoped_cohort(&app, &ctx, &id).await?;
	let campaign =
		app.meta_adapter.read_campaign(&query::scoped(&ctx).with_id(&campaign_id)).await?;

	app.meta_adapter.unassign_cohort_stream(&cohort.id, &campaign.id).await?;
	info!(user_id = %ctx.user_id, cohort_id = %cohort.id, campaign_id = %campaign.id, "Stream unassigned");

	Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
	use super::*;

	fn row(name: Option<&str>, email: Option<&str>) -> CohortMemberRequest {
		CohortMemberRequest { name: name.map(Into::into), email: email.map(Into::into), phone: None }
	}

	#[test]
	fn test_member_without_name_and_email_is_skipped() {
		assert!(member_data(&row(None, None)).unwrap().is_none());
		assert!(member_data(&row(Some("  "), Some(""))).unwrap().is_none());
	}

	#[test]
	fn test_member_with_name_only() {
		let req = row(Some(" Ann "), None);
		let data = member_data(&req).unwrap().unwrap();
		assert_eq!(data.name, Some("Ann"));
		assert_eq!(data.email, None);
	}

	#[test]
	fn test_member_invalid_email() {
		assert!(matches!(
			member_data(&row(Some("Ann"), Some("not-an-email"))),
			Err(Error::ValidationError(_))
		));
	}
}

// vim: ts=4
