//! Adapter that verifies and issues bearer credentials.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;

use crate::prelude::*;

/// Default lifetime of an issued access token
pub const ACCESS_TOKEN_EXPIRY: i64 = 8 * 3600;

/// Claims carried by an access token
#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessClaims {
	pub user_id: UserId,
	pub role: Role,
	/// Issued at
	pub iat: Timestamp,
	pub exp: Timestamp,
}

/// The verified caller of a request.
///
/// Built fresh from the credential on every request, never persisted.
#[derive(Clone, Debug)]
pub struct AuthCtx {
	pub user_id: UserId,
	pub role: Role,
	pub issued_at: Option<Timestamp>,
}

impl AuthCtx {
	pub fn is_admin(&self) -> bool {
		self.role == Role::Admin
	}
}

impl From<AccessClaims> for AuthCtx {
	fn from(claims: AccessClaims) -> Self {
		AuthCtx { user_id: claims.user_id, role: claims.role, issued_at: Some(claims.iat) }
	}
}

/// An Outbound Impact auth adapter
///
/// The adapter owns the signing secret. Signature checks and expiry are its concern,
/// policy checks (session timeout, suspension, maintenance) are not.
#[async_trait]
pub trait AuthAdapter: Debug + Send + Sync {
	/// Validates an access token and returns the caller's claims.
	///
	/// Any invalid, malformed or expired token yields `Error::Unauthorized`.
	async fn validate_access_token(&self, token: &str) -> OiResult<AuthCtx>;

	/// Issues a new access token valid for `ttl_secs` seconds
	async fn create_access_token(
		&self,
		user_id: &UserId,
		role: Role,
		ttl_secs: i64,
	) -> OiResult<Box<str>>;
}

// vim: ts=4
