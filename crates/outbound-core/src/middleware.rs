//! Custom middlewares
//!
//! `require_auth` is the gate every protected request passes. Authentication fails
//! closed. The secondary checks (session age, suspension, maintenance) depend on
//! stores that may be down and fail open: an unreadable store never locks users out.

use axum::{
	extract::{Request, State},
	http::{HeaderMap, HeaderValue, header},
	middleware::Next,
	response::Response,
};
use std::{future::Future, pin::Pin};

use outbound_types::auth_adapter::AuthCtx;
use outbound_types::meta_adapter::UserStore;

use crate::extract::{Auth, RequestId};
use crate::identity::resolve_identity;
use crate::prelude::*;
use crate::settings::PlatformSettings;

/// Boxed future returned by permission middleware factories
pub type PermissionCheckOutput = Pin<Box<dyn Future<Output = Result<Response, Error>> + Send>>;

pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Extracts the token of an `Authorization: Bearer <token>` header
fn bearer_token(headers: &HeaderMap) -> OiResult<&str> {
	let auth_header =
		headers.get(header::AUTHORIZATION).and_then(|h| h.to_str().ok()).ok_or(Error::Unauthorized)?;
	let token = auth_header.strip_prefix("Bearer ").ok_or(Error::Unauthorized)?.trim();

	if token.is_empty() {
		return Err(Error::Unauthorized);
	}
	Ok(token)
}

/// Rejects credentials older than the configured session timeout.
///
/// A credential exactly at the timeout is still valid.
pub fn check_session(auth: &AuthCtx, settings: &PlatformSettings, now: Timestamp) -> OiResult<()> {
	let (Some(timeout), Some(issued_at)) = (settings.session_timeout_secs(), auth.issued_at) else {
		return Ok(());
	};
	if now.seconds_since(issued_at) > timeout {
		info!(user_id = %auth.user_id, issued_at = %issued_at, "Session expired");
		return Err(Error::SessionExpired);
	}
	Ok(())
}

/// Rejects suspended accounts. A failed lookup lets the request through.
pub async fn check_suspension(users: &dyn UserStore, auth: &AuthCtx) -> OiResult<()> {
	match users.read_user_status(&auth.user_id).await {
		Ok(UserStatus::Suspended) => {
			info!(user_id = %auth.user_id, "Suspended account rejected");
			Err(Error::AccountSuspended)
		}
		Ok(UserStatus::Active) => Ok(()),
		Err(err) => {
			warn!(user_id = %auth.user_id, "Suspension lookup failed, allowing request: {}", err);
			Ok(())
		}
	}
}

/// Rejects non-admin traffic while the platform is in maintenance
pub fn check_maintenance(settings: &PlatformSettings) -> OiResult<()> {
	if settings.maintenance_mode {
		return Err(Error::MaintenanceMode);
	}
	Ok(())
}

pub async fn require_auth(State(app): State<App>, mut req: Request, next: Next) -> OiResult<Response> {
	let token = bearer_token(req.headers())?;
	let auth = app.auth_adapter.validate_access_token(token).await?;

	// Admins are exempt from session, suspension and maintenance enforcement
	if !auth.is_admin() {
		let settings = app.settings.get().await;
		check_session(&auth, &settings, app.clock.now())?;
		check_suspension(app.meta_adapter.as_ref(), &auth).await?;
		check_maintenance(&settings)?;
	}

	let ctx = resolve_identity(app.meta_adapter.as_ref(), auth).await?;
	req.extensions_mut().insert(Auth(ctx));

	Ok(next.run(req).await)
}

/// Assigns a request id, echoed back in the `X-Request-Id` response header
pub async fn request_id(mut req: Request, next: Next) -> Response {
	let req_id = uuid::Uuid::new_v4().simple().to_string();
	req.extensions_mut().insert(RequestId(req_id.clone()));

	let mut res = next.run(req).await;
	if let Ok(value) = HeaderValue::from_str(&req_id) {
		res.headers_mut().insert(REQUEST_ID_HEADER, value);
	}
	res
}


// vim: ts=4
