//! Platform settings administration

use axum::{Json, extract::State};

use outbound_core::extract::Auth;
use outbound_core::settings::PlatformSettings;
use outbound_types::meta_adapter::SettingsStore;

use crate::prelude::*;

/// GET /api/admin/settings - the stored settings merged over the defaults, uncached
pub async fn get_settings(State(app): State<App>) -> OiResult<Json<ApiResponse<PlatformSettings>>> {
	let settings = app.settings.fetch().await;
	Ok(Json(ApiResponse::new(settings)))
}

/// PUT /api/admin/settings
///
/// Merges the partial object over the stored record, validates and persists it, then
/// invalidates the settings cache before responding.
pub async fn put_settings(
	State(app): State<App>,
	Auth(ctx): Auth,
	Json(patch): Json<serde_json::Value>,
) -> OiResult<Json<ApiResponse<PlatformSettings>>> {
	let current = match app.meta_adapter.read_platform_settings().await? {
		Some(stored) => PlatformSettings::merge_stored(&stored).unwrap_or_else(|err| {
			warn!("Stored platform settings are invalid, replacing: {}", err);
			PlatformSettings::default()
		}),
		None => PlatformSettings::default(),
	};
	let settings = current.patched(&patch)?;

	app.meta_adapter.write_platform_settings(&serde_json::to_value(&settings)?).await?;
	app.settings.invalidate();
	info!(
		user_id = %ctx.user_id,
		maintenance_mode = settings.maintenance_mode,
		session_timeout_minutes = ?settings.session_timeout_minutes,
		"Platform settings updated"
	);

	Ok(Json(ApiResponse::new(settings)))
}

// vim: ts=4
