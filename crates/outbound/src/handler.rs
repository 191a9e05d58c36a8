//! Public and identity endpoints

use axum::{Json, extract::State};
use serde::Serialize;

use outbound_core::RequestCtx;
use outbound_core::app::VERSION;
use outbound_core::extract::{Auth, OptionalRequestId};

use crate::prelude::*;

#[derive(Debug, Serialize)]
pub struct Health {
	pub status: &'static str,
	pub version: &'static str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlatformStatus {
	pub maintenance_mode: bool,
	pub platform_name: Box<str>,
}

/// GET /api/health
pub async fn get_health() -> Json<Health> {
	Json(Health { status: "ok", version: VERSION })
}

/// GET /api/platform/status - unauthenticated, served from the settings cache
pub async fn get_platform_status(State(app): State<App>) -> Json<PlatformStatus> {
	let settings = app.settings.get().await;
	Json(PlatformStatus {
		maintenance_mode: settings.maintenance_mode,
		platform_name: settings.platform_name.clone(),
	})
}

/// GET /api/me - the resolved request context
pub async fn get_me(
	Auth(ctx): Auth,
	OptionalRequestId(req_id): OptionalRequestId,
) -> Json<ApiResponse<RequestCtx>> {
	Json(ApiResponse::new(ctx).with_req_id(req_id.unwrap_or_default()))
}

// vim: ts=4
