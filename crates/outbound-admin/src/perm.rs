//! Admin permission middleware

use axum::{extract::Request, middleware::Next, response::Response};

use outbound_core::extract::Auth;

use crate::prelude::*;

/// Middleware that lets only principals with the platform `ADMIN` role through
pub async fn require_admin(Auth(ctx): Auth, req: Request, next: Next) -> Result<Response, Error> {
	if !ctx.is_admin() {
		warn!(
			user_id = %ctx.user_id,
			role = %ctx.role,
			"Admin permission denied - ADMIN role required"
		);
		return Err(Error::PermissionDenied);
	}

	Ok(next.run(req).await)
}

// vim: ts=4
