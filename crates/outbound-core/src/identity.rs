//! Effective identity resolution
//!
//! A principal is either an account owner acting on their own resources, or a team
//! member acting for an owner. Content operations always key off the effective user.

use serde::Serialize;
use serde_with::skip_serializing_none;

use outbound_types::auth_adapter::AuthCtx;
use outbound_types::meta_adapter::{TeamMember, TeamStore};

use crate::org_scope::OrgScope;
use crate::prelude::*;

/// Immutable per-request context, built once by the auth middleware
#[skip_serializing_none]
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestCtx {
	/// The authenticated caller
	pub user_id: UserId,
	pub role: Role,
	#[serde(skip)]
	pub issued_at: Option<Timestamp>,
	/// Owner of the resources this request operates on
	pub effective_user_id: UserId,
	pub org_scope: OrgScope,
	/// `None` when acting as the account owner
	pub team_role: Option<TeamRole>,
}

impl RequestCtx {
	/// Context of a principal acting as an account owner
	pub fn owner(auth: AuthCtx) -> Self {
		Self {
			effective_user_id: auth.user_id.clone(),
			user_id: auth.user_id,
			role: auth.role,
			issued_at: auth.issued_at,
			org_scope: OrgScope::default(),
			team_role: None,
		}
	}

	/// Context of a principal acting through an active team membership
	pub fn team_member(auth: AuthCtx, membership: TeamMember) -> Self {
		Self {
			user_id: auth.user_id,
			role: auth.role,
			issued_at: auth.issued_at,
			effective_user_id: membership.owner_id,
			org_scope: OrgScope::new(membership.organization_ids),
			team_role: Some(membership.role),
		}
	}

	pub fn is_admin(&self) -> bool {
		self.role == Role::Admin
	}

	pub fn is_team_member(&self) -> bool {
		self.team_role.is_some()
	}
}

/// Resolves the effective identity of an authenticated principal.
///
/// A lookup failure is propagated, it never resolves to the principal itself.
pub async fn resolve_identity(teams: &dyn TeamStore, auth: AuthCtx) -> OiResult<RequestCtx> {
	let membership = teams.read_active_membership(&auth.user_id).await.inspect_err(|err| {
		error!(user_id = %auth.user_id, "Team membership lookup failed: {}", err);
	})?;

	Ok(match membership {
		Some(membership) => {
			debug!(
				user_id = %auth.user_id,
				owner_id = %membership.owner_id,
				team_role = %membership.role,
				"Acting as team member"
			);
			RequestCtx::team_member(auth, membership)
		}
		None => RequestCtx::owner(auth),
	})
}


// vim: ts=4
