//! Team role capability guard
//!
//! Each capability has a minimum `TeamRole`; a team member below it is denied.
//! Account owners (no team role) are never restricted by this guard.

use axum::{extract::Request, middleware::Next, response::Response};

use crate::{extract::Auth, middleware::PermissionCheckOutput, prelude::*};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Action {
	Read,
	Create,
	Update,
	Delete,
	AddMember,
	DeleteMember,
	Import,
	AssignStream,
	DeleteStreamAssignment,
	InviteTeamUser,
	RemoveTeamUser,
}

impl Action {
	/// Minimum team role allowed to perform the action
	pub fn min_role(self) -> TeamRole {
		match self {
			Action::Read => TeamRole::Viewer,
			Action::Create
			| Action::Update
			| Action::AddMember
			| Action::Import
			| Action::AssignStream => TeamRole::Editor,
			Action::Delete
			| Action::DeleteMember
			| Action::DeleteStreamAssignment
			| Action::InviteTeamUser
			| Action::RemoveTeamUser => TeamRole::Admin,
		}
	}

	fn describe(self) -> &'static str {
		match self {
			Action::Read => "read",
			Action::Create => "create",
			Action::Update => "update",
			Action::Delete => "delete",
			Action::AddMember => "add members to",
			Action::DeleteMember => "delete members of",
			Action::Import => "import members into",
			Action::AssignStream => "assign streams to",
			Action::DeleteStreamAssignment => "delete stream assignments of",
			Action::InviteTeamUser => "invite users to",
			Action::RemoveTeamUser => "remove users from",
		}
	}
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Resource {
	Item,
	Campaign,
	Cohort,
	Organization,
	Team,
}

impl Resource {
	pub fn as_str(self) -> &'static str {
		match self {
			Resource::Item => "item",
			Resource::Campaign => "campaign",
			Resource::Cohort => "cohort",
			Resource::Organization => "organization",
			Resource::Team => "team",
		}
	}
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Capability {
	pub action: Action,
	pub resource: Resource,
}

impl Capability {
	pub fn new(action: Action, resource: Resource) -> Self {
		Self { action, resource }
	}

	pub fn min_role(self) -> TeamRole {
		self.action.min_role()
	}
}

impl std::fmt::Display for Capability {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{} {}", self.action.describe(), self.resource.as_str())
	}
}

/// Checks a team role against a capability. `None` is the account owner.
pub fn check_capability(team_role: Option<TeamRole>, capability: Capability) -> OiResult<()> {
	let Some(role) = team_role else {
		return Ok(());
	};
	let min_role = capability.min_role();
	if role >= min_role {
		return Ok(());
	}

	Err(Error::CapabilityDenied(format!(
		"{} role cannot {}; {} role required",
		role, capability, min_role
	)))
}

/// Middleware factory for capability checks
///
/// Returns a middleware function usable with `axum::middleware::from_fn` that rejects
/// team members whose role is below the capability's minimum.
pub fn require_capability(
	action: Action,
	resource: Resource,
) -> impl Fn(Auth, Request, Next) -> PermissionCheckOutput + Clone {
	move |auth, req, next| Box::pin(check_capability_middleware(auth, req, next, action, resource))
}

async fn check_capability_middleware(
	Auth(ctx): Auth,
	req: Request,
	next: Next,
	action: Action,
	resource: Resource,
) -> Result<Response, Error> {
	let capability = Capability::new(action, resource);
	if let Err(err) = check_capability(ctx.team_role, capability) {
		warn!(
			user_id = %ctx.user_id,
			owner_id = %ctx.effective_user_id,
			team_role = ?ctx.team_role,
			capability = %capability,
			"Capability denied"
		);
		return Err(err);
	}

	Ok(next.run(req).await)
}

#[cfg(test)]
mod tests {
	use super::*;

	const MUTATING: &[Action] = &[
		Action::Create,
		Action::Update,
		Action::Delete,
		Action::AddMember,
		Action::DeleteMember,
		Action::Import,
		Action::AssignStream,
		Action::DeleteStreamAssignment,
		Action::InviteTeamUser,
		Action::RemoveTeamUser,
	];

	const DELETES: &[Action] = &[
		Action::Delete,
		Action::DeleteMember,
		Action::DeleteStreamAssignment,
		Action::RemoveTeamUser,
	];

	#[test]
	fn test_viewer_denied_all_mutations() {
		for action in MUTATING {
			let cap = Capability::new(*action, Resource::Cohort);
			assert!(check_capability(Some(TeamRole::Viewer), cap).is_err(), "{:?}", action);
		}
		assert!(
			check_capability(Some(TeamRole::Viewer), Capability::new(Action::Read, Resource::Item))
				.is_ok()
		);
	}

	#[test]
	fn test_editor_denied_deletes_only() {
		for action in MUTATING {
			let cap = Capability::new(*action, Resource::Cohort);
			let res = check_capability(Some(TeamRole::Editor), cap);
			assert_eq!(res.is_err(), DELETES.contains(action) || *action == Action::InviteTeamUser);
		}
	}

	#[test]
	fn test_admin_and_owner_allowed_everything() {
		for action in MUTATING {
			let cap = Capability::new(*action, Resource::Team);
			assert!(check_capability(Some(TeamRole::Admin), cap).is_ok());
			assert!(check_capability(None, cap).is_ok());
		}
	}

	#[test]
	fn test_denial_message() {
		let err = check_capability(
			Some(TeamRole::Viewer),
			Capability::new(Action::Create, Resource::Cohort),
		)
		.unwrap_err();
		assert!(matches!(
			err,
			Error::CapabilityDenied(ref msg) if msg == "VIEWER role cannot create cohort; EDITOR role required"
		));
	}
}

// vim: ts=4
