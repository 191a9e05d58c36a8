//! Error type shared by every Outbound Impact crate.
//!
//! Variants map one-to-one onto the HTTP status codes the API produces, so handlers
//! and middlewares can simply return `Err(..)` and let `IntoResponse` do the rest.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

pub type OiResult<T> = std::result::Result<T, Error>;

#[derive(Debug)]
pub enum Error {
	// Authentication (401)
	/// Missing, malformed or invalid bearer credential
	Unauthorized,
	/// Credential older than the configured session timeout
	SessionExpired,

	// Authorization (403)
	AccountSuspended,
	PermissionDenied,
	/// Team role below the capability's minimum, carries the denial message
	CapabilityDenied(String),

	// Platform state (503)
	MaintenanceMode,
	ServiceUnavailable(String),

	NotFound,
	ValidationError(String),
	Conflict(String),

	// Infrastructure
	DbError,
	Parse,
	ConfigError(String),
	Internal(String),
	Io(std::io::Error),
}

impl Error {
	/// Stable machine-readable code sent to clients
	pub fn code(&self) -> &'static str {
		match self {
			Error::Unauthorized => "UNAUTHENTICATED",
			Error::SessionExpired => "SESSION_EXPIRED",
			Error::AccountSuspended => "ACCOUNT_SUSPENDED",
			Error::PermissionDenied => "FORBIDDEN",
			Error::CapabilityDenied(_) => "CAPABILITY_DENIED",
			Error::MaintenanceMode => "MAINTENANCE_MODE",
			Error::ServiceUnavailable(_) => "SERVICE_UNAVAILABLE",
			Error::NotFound => "NOT_FOUND",
			Error::ValidationError(_) => "VALIDATION_ERROR",
			Error::Conflict(_) => "CONFLICT",
			Error::DbError
			| Error::Parse
			| Error::ConfigError(_)
			| Error::Internal(_)
			| Error::Io(_) => "INTERNAL",
		}
	}

	pub fn status(&self) -> StatusCode {
		match self {
			Error::Unauthorized | Error::SessionExpired => StatusCode::UNAUTHORIZED,
			Error::AccountSuspended | Error::PermissionDenied | Error::CapabilityDenied(_) => {
				StatusCode::FORBIDDEN
			}
			Error::MaintenanceMode | Error::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
			Error::NotFound => StatusCode::NOT_FOUND,
			Error::ValidationError(_) => StatusCode::BAD_REQUEST,
			Error::Conflict(_) => StatusCode::CONFLICT,
			Error::DbError
			| Error::Parse
			| Error::ConfigError(_)
			| Error::Internal(_)
			| Error::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
		}
	}

	/// Message shown to the client. Internal details are never exposed.
	fn public_message(&self) -> String {
		match self {
			Error::Unauthorized => "Authentication required".into(),
			Error::SessionExpired => "Session expired, please log in again".into(),
			Error::AccountSuspended => "Your account has been suspended".into(),
			Error::PermissionDenied => "Permission denied".into(),
			Error::MaintenanceMode => {
				"The platform is under maintenance, please try again later".into()
			}
			Error::NotFound => "Not found".into(),
			Error::CapabilityDenied(msg)
			| Error::ServiceUnavailable(msg)
			| Error::ValidationError(msg)
			| Error::Conflict(msg) => msg.clone(),
			Error::DbError
			| Error::Parse
			| Error::ConfigError(_)
			| Error::Internal(_)
			| Error::Io(_) => "Internal server error".into(),
		}
	}
}

impl std::fmt::Display for Error {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Error::CapabilityDenied(msg) => write!(f, "capability denied: {}", msg),
			Error::ServiceUnavailable(msg) => write!(f, "service unavailable: {}", msg),
			Error::ValidationError(msg) => write!(f, "validation error: {}", msg),
			Error::Conflict(msg) => write!(f, "conflict: {}", msg),
			Error::ConfigError(msg) => write!(f, "configuration error: {}", msg),
			Error::Internal(msg) => write!(f, "internal error: {}", msg),
			Error::Io(err) => write!(f, "io error: {}", err),
			Error::DbError => write!(f, "database error"),
			Error::Parse => write!(f, "parse error"),
			_ => write!(f, "{}", self.code()),
		}
	}
}

impl std::error::Error for Error {
	fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
		match self {
			Error::Io(err) => Some(err),
			_ => None,
		}
	}
}

impl From<std::io::Error> for Error {
	fn from(err: std::io::Error) -> Self {
		Self::Io(err)
	}
}

impl From<serde_json::Error> for Error {
	fn from(err: serde_json::Error) -> Self {
		tracing::debug!("JSON error: {}", err);
		Self::Parse
	}
}

impl IntoResponse for Error {
	fn into_response(self) -> Response {
		let status = self.status();
		if status.is_server_error() && !matches!(self, Error::MaintenanceMode) {
			tracing::error!("Request failed: {}", self);
		}

		let body = serde_json::json!({
			"error": {
				"code": self.code(),
				"message": self.public_message(),
			}
		});
		(status, Json(body)).into_response()
	}
}


// vim: ts=4
