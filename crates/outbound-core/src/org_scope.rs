//! Organization scope of team members
//!
//! An empty scope is unrestricted. A non-empty scope restricts every content read to
//! its organizations and supplies the default organization of created content.

use serde::Serialize;

use outbound_types::meta_adapter::OrgStore;

use crate::identity::RequestCtx;
use crate::prelude::*;

/// Ordered set of organization ids a principal is restricted to
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct OrgScope(Vec<OrgId>);

impl OrgScope {
	/// Builds a scope keeping the first occurrence of each id
	pub fn new(ids: Vec<OrgId>) -> Self {
		let mut scope = Vec::with_capacity(ids.len());
		for id in ids {
			if !scope.contains(&id) {
				scope.push(id);
			}
		}
		Self(scope)
	}

	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	pub fn ids(&self) -> &[OrgId] {
		&self.0
	}

	pub fn contains(&self, org_id: &OrgId) -> bool {
		self.0.contains(org_id)
	}
}

/// Query filter for a scope: unrestricted when empty, else `organization_id IN scope`
pub fn build_filter(scope: &OrgScope) -> OrgFilter {
	if scope.is_empty() {
		OrgFilter::Unrestricted
	} else {
		OrgFilter::AnyOf(scope.0.clone().into_boxed_slice())
	}
}

/// Default organization of newly created content: the first id in scope order
pub fn auto_assign_org_id(scope: &OrgScope) -> Option<OrgId> {
	scope.0.first().cloned()
}

/// Organization of newly created content.
///
/// An explicit id must lie inside a non-empty scope. Without one, the first id of the
/// scope is used even if the principal has several organizations.
pub fn resolve_create_org_id(scope: &OrgScope, explicit: Option<OrgId>) -> OiResult<Option<OrgId>> {
	match explicit {
		Some(org_id) if !scope.is_empty() && !scope.contains(&org_id) => {
			warn!(org_id = %org_id, "Organization outside of scope");
			Err(Error::PermissionDenied)
		}
		Some(org_id) => Ok(Some(org_id)),
		None => Ok(auto_assign_org_id(scope)),
	}
}

/// Checks that every id names an organization of `owner_id`
pub async fn check_owned_orgs(orgs: &dyn OrgStore, owner_id: &UserId, ids: &[OrgId]) -> OiResult<()> {
	if ids.is_empty() {
		return Ok(());
	}
	let filter = OrgFilter::AnyOf(ids.into());
	let found = orgs.list_organizations(owner_id, &filter).await?;
	if let Some(missing) = ids.iter().find(|id| !found.iter().any(|org| &org.id == *id)) {
		warn!(owner_id = %owner_id, org_id = %missing, "Organization not owned by account");
		return Err(Error::PermissionDenied);
	}
	Ok(())
}

/// Organization of content created in this request context
///
/// Applies `resolve_create_org_id`, then verifies that an explicit id given under an
/// empty scope belongs to the effective owner.
pub async fn resolve_create_org(
	orgs: &dyn OrgStore,
	ctx: &RequestCtx,
	explicit: Option<OrgId>,
) -> OiResult<Option<OrgId>> {
	let check_owner = explicit.is_some() && ctx.org_scope.is_empty();
	let org_id = resolve_create_org_id(&ctx.org_scope, explicit)?;
	if check_owner && let Some(org_id) = &org_id {
		check_owned_orgs(orgs, &ctx.effective_user_id, std::slice::from_ref(org_id)).await?;
	}
	Ok(org_id)
}


// vim: ts=4
