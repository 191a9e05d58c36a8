//! User administration

use axum::{
	Json,
	extract::{Path, State},
	http::StatusCode,
};
use serde::Deserialize;

use outbound_core::extract::{Auth, OptionalRequestId};
use outbound_types::meta_adapter::{CreateUserData, User, UserStore};
use outbound_types::utils::{is_valid_email, required_text};

use crate::prelude::*;

#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
	pub email: String,
	pub name: String,
	pub role: Role,
}

#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
	pub status: UserStatus,
}

/// GET /api/admin/users
pub async fn list_users(
	State(app): State<App>,
	OptionalRequestId(req_id): OptionalRequestId,
) -> OiResult<Json<ApiResponse<Vec<User>>>> {
	let users = app.meta_adapter.list_users().await?;
	let total = users.len();

	Ok(Json(ApiResponse::new(users).with_total(total).with_req_id(req_id.unwrap_or_default())))
}

/// POST /api/admin/users
pub async fn post_user(
	State(app): State<App>,
	Auth(ctx): Auth,
	Json(req): Json<CreateUserRequest>,
) -> OiResult<(StatusCode, Json<ApiResponse<User>>)> {
	if !is_valid_email(&req.email) {
		return Err(Error::ValidationError(format!("invalid email: {}", req.email.trim())));
	}
	let name = required_text("name", &req.name)?;

	let user = app
		.meta_adapter
		.create_user(&CreateUserData { email: &req.email, name: &name, role: req.role })
		.await?;
	info!(admin = %ctx.user_id, user_id = %user.id, role = %user.role, "User created");

	Ok((StatusCode::CREATED, Json(ApiResponse::new(user))))
}

/// PUT /api/admin/users/{id}/status - suspend or reactivate an account
pub async fn put_user_status(
	State(app): State<App>,
	Auth(ctx): Auth,
	Path(user_id): Path<String>,
	Json(req): Json<UpdateStatusRequest>,
) -> OiResult<Json<ApiResponse<User>>> {
	let user_id = UserId::new(user_id);
	if user_id == ctx.user_id && req.status == UserStatus::Suspended {
		return Err(Error::Conflict("you cannot suspend your own account".into()));
	}

	app.meta_adapter.update_user_status(&user_id, req.status).await?;
	warn!(admin = %ctx.user_id, user_id = %user_id, status = req.status.as_str(), "User status changed");

	let user = app.meta_adapter.read_user(&user_id).await?;
	Ok(Json(ApiResponse::new(user)))
}

// vim: ts=4
