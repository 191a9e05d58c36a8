//! Common types used throughout the Outbound Impact platform.

use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;
use std::time::SystemTime;

macro_rules! string_id {
	($(#[$meta:meta])* $name:ident) => {
		$(#[$meta])*
		#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
		#[serde(transparent)]
		pub struct $name(pub Box<str>);

		impl $name {
			pub fn new(id: impl Into<Box<str>>) -> Self {
				Self(id.into())
			}

			pub fn as_str(&self) -> &str {
				&self.0
			}
		}

		impl std::fmt::Display for $name {
			fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
				f.write_str(&self.0)
			}
		}

		impl From<&str> for $name {
			fn from(id: &str) -> Self {
				Self(id.into())
			}
		}

		impl AsRef<str> for $name {
			fn as_ref(&self) -> &str {
				&self.0
			}
		}
	};
}

// UserId //
//********//
string_id!(
	/// Identifier of a platform user (account owner, team member or admin)
	UserId
);

// OrgId //
//*******//
string_id!(
	/// Identifier of an organization owned by an account
	OrgId
);

// Timestamp //
//***********//
/// Seconds since the Unix epoch
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(pub i64);

impl Timestamp {
	pub fn now() -> Timestamp {
		let res = SystemTime::now().duration_since(SystemTime::UNIX_EPOCH).unwrap_or_default();
		Timestamp(i64::try_from(res.as_secs()).unwrap_or(i64::MAX))
	}

	pub fn add_seconds(&self, seconds: i64) -> Timestamp {
		Timestamp(self.0.saturating_add(seconds))
	}

	/// Seconds elapsed from `earlier` to `self` (negative if `earlier` is in the future)
	pub fn seconds_since(&self, earlier: Timestamp) -> i64 {
		self.0.saturating_sub(earlier.0)
	}
}

impl std::fmt::Display for Timestamp {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}", self.0)
	}
}

// Role //
//******//
/// Platform-level account role, carried in access tokens
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
	Admin,
	CustomerSupport,
	Individual,
	OrgSmall,
	OrgMedium,
	OrgEnterprise,
}

impl Role {
	pub fn as_str(self) -> &'static str {
		match self {
			Role::Admin => "ADMIN",
			Role::CustomerSupport => "CUSTOMER_SUPPORT",
			Role::Individual => "INDIVIDUAL",
			Role::OrgSmall => "ORG_SMALL",
			Role::OrgMedium => "ORG_MEDIUM",
			Role::OrgEnterprise => "ORG_ENTERPRISE",
		}
	}

	pub fn parse(s: &str) -> Option<Role> {
		match s {
			"ADMIN" => Some(Role::Admin),
			"CUSTOMER_SUPPORT" => Some(Role::CustomerSupport),
			"INDIVIDUAL" => Some(Role::Individual),
			"ORG_SMALL" => Some(Role::OrgSmall),
			"ORG_MEDIUM" => Some(Role::OrgMedium),
			"ORG_ENTERPRISE" => Some(Role::OrgEnterprise),
			_ => None,
		}
	}
}

impl std::fmt::Display for Role {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.write_str(self.as_str())
	}
}

// UserStatus //
//************//
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserStatus {
	Active,
	Suspended,
}

impl UserStatus {
	pub fn as_str(self) -> &'static str {
		match self {
			UserStatus::Active => "active",
			UserStatus::Suspended => "suspended",
		}
	}

	pub fn parse(s: &str) -> Option<UserStatus> {
		match s {
			"active" => Some(UserStatus::Active),
			"suspended" => Some(UserStatus::Suspended),
			_ => None,
		}
	}
}

// TeamRole //
//**********//
/// Capability tier of a team membership.
///
/// Variant order is the permission ladder: `Viewer < Editor < Admin`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TeamRole {
	Viewer,
	Editor,
	Admin,
}

impl TeamRole {
	pub fn as_str(self) -> &'static str {
		match self {
			TeamRole::Viewer => "VIEWER",
			TeamRole::Editor => "EDITOR",
			TeamRole::Admin => "ADMIN",
		}
	}

	pub fn parse(s: &str) -> Option<TeamRole> {
		match s {
			"VIEWER" => Some(TeamRole::Viewer),
			"EDITOR" => Some(TeamRole::Editor),
			"ADMIN" => Some(TeamRole::Admin),
			_ => None,
		}
	}
}

impl std::fmt::Display for TeamRole {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.write_str(self.as_str())
	}
}

// OrgFilter //
//***********//
/// Organization restriction applied to content queries
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum OrgFilter {
	/// No restriction
	#[default]
	Unrestricted,
	/// `organization_id` must be one of these ids
	AnyOf(Box<[OrgId]>),
}

impl OrgFilter {
	pub fn is_unrestricted(&self) -> bool {
		matches!(self, OrgFilter::Unrestricted)
	}

	/// Check whether a record with the given organization passes the filter
	pub fn allows(&self, organization_id: Option<&OrgId>) -> bool {
		match self {
			OrgFilter::Unrestricted => true,
			OrgFilter::AnyOf(ids) => organization_id.is_some_and(|org| ids.contains(org)),
		}
	}

	/// AND-combine two filters
	pub fn and(self, other: OrgFilter) -> OrgFilter {
		match (self, other) {
			(OrgFilter::Unrestricted, f) | (f, OrgFilter::Unrestricted) => f,
			(OrgFilter::AnyOf(a), OrgFilter::AnyOf(b)) => {
				OrgFilter::AnyOf(a.iter().filter(|id| b.contains(id)).cloned().collect())
			}
		}
	}
}

// ApiResponse //
//*************//
/// Envelope for successful API responses
#[skip_serializing_none]
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse<T> {
	pub data: T,
	pub total: Option<usize>,
	pub time: Timestamp,
	pub req_id: Option<String>,
}

impl<T> ApiResponse<T> {
	pub fn new(data: T) -> Self {
		Self { data, total: None, time: Timestamp::now(), req_id: None }
	}

	pub fn with_total(mut self, total: usize) -> Self {
		self.total = Some(total);
		self
	}

	pub fn with_req_id(mut self, req_id: String) -> Self {
		if !req_id.is_empty() {
			self.req_id = Some(req_id);
		}
		self
	}
}


// vim: ts=4
