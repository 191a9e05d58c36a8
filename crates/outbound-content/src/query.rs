//! Shared query parameters of content listings

use serde::Deserialize;

use outbound_core::RequestCtx;
use outbound_core::org_scope::build_filter;
use outbound_types::meta_adapter::ContentQuery;

use crate::prelude::*;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListContentQuery {
	/// Case-insensitive search in the title or name
	pub q: Option<String>,
	/// Narrow the listing to one organization (still within scope)
	pub organization_id: Option<OrgId>,
}

/// Base query of a request: the effective owner's records inside the org scope
pub fn scoped(ctx: &RequestCtx) -> ContentQuery {
	ContentQuery::for_owner(&ctx.effective_user_id).and_org_filter(build_filter(&ctx.org_scope))
}

/// Listing query with the optional search and organization narrowing applied
pub fn listing(ctx: &RequestCtx, params: &ListContentQuery) -> ContentQuery {
	let query = scoped(ctx).with_search(params.q.as_deref());
	match &params.organization_id {
		Some(org_id) => query.and_org_filter(OrgFilter::AnyOf(vec![org_id.clone()].into())),
		None => query,
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use outbound_core::OrgScope;

	fn ctx(scope: &[&str]) -> RequestCtx {
		RequestCtx {
			user_id: UserId::from("member"),
			role: Role::Individual,
			issued_at: None,
			effective_user_id: UserId::from("owner"),
			org_scope: OrgScope::new(scope.iter().map(|id| OrgId::from(*id)).collect()),
			team_role: Some(TeamRole::Viewer),
		}
	}

	#[test]
	fn test_scoped_uses_effective_user() {
		let query = scoped(&ctx(&[]));
		assert_eq!(query.owner_id, UserId::from("owner"));
		assert!(query.org_filter.is_unrestricted());
	}

	#[test]
	fn test_narrowing_cannot_escape_scope() {
		let params =
			ListContentQuery { q: Some(" sun ".into()), organization_id: Some(OrgId::from("c")) };
		let query = listing(&ctx(&["a", "b"]), &params);
		assert_eq!(query.org_filter, OrgFilter::AnyOf(Box::default()));
		assert_eq!(query.q.as_deref(), Some("sun"));

		let params = ListContentQuery { q: None, organization_id: Some(OrgId::from("b")) };
		let query = listing(&ctx(&["a", "b"]), &params);
		assert_eq!(query.org_filter, OrgFilter::AnyOf(vec![OrgId::from("b")].into()));
	}
}

// vim: ts=4
