//! Router assembly

use axum::{
	Router,
	http::HeaderValue,
	middleware,
	routing::{MethodRouter, delete, get, post, put},
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use outbound_admin as admin;
use outbound_content::{campaign, cohort, item, organization};
use outbound_core::audit::AuditLayer;
use outbound_core::middleware::{request_id, require_auth};
use outbound_core::roles::{Action, Resource, require_capability};
use outbound_team::handler as team;

use crate::handler;
use crate::prelude::*;

/// Attaches a capability check to a single method route
fn cap(route: MethodRouter<App>, action: Action, resource: Resource) -> MethodRouter<App> {
	route.route_layer(middleware::from_fn(require_capability(action, resource)))
}

fn init_content() -> Router<App> {
	use Action::*;

	Router::new()
		// Items
		.route("/api/items", cap(get(item::list_items), Read, Resource::Item))
		.route("/api/items", cap(post(item::post_item), Create, Resource::Item))
		.route("/api/items/{id}", cap(get(item::get_item), Read, Resource::Item))
		.route("/api/items/{id}", cap(put(item::put_item), Update, Resource::Item))
		.route("/api/items/{id}", cap(delete(item::delete_item), Delete, Resource::Item))
		// Campaigns
		.route("/api/campaigns", cap(get(campaign::list_campaigns), Read, Resource::Campaign))
		.route("/api/campaigns", cap(post(campaign::post_campaign), Create, Resource::Campaign))
		.route("/api/campaigns/{id}", cap(get(campaign::get_campaign), Read, Resource::Campaign))
		.route("/api/campaigns/{id}", cap(put(campaign::put_campaign), Update, Resource::Campaign))
		.route(
			"/api/campaigns/{id}",
			cap(delete(campaign::delete_campaign), Delete, Resource::Campaign),
		)
		// Cohorts
		.route("/api/cohorts", cap(get(cohort::list_cohorts), Read, Resource::Cohort))
		.route("/api/cohorts", cap(post(cohort::post_cohort), Create, Resource::Cohort))
		.route("/api/cohorts/{id}", cap(get(cohort::get_cohort), Read, Resource::Cohort))
		.route("/api/cohorts/{id}", cap(put(cohort::put_cohort), Update, Resource::Cohort))
		.route("/api/cohorts/{id}", cap(delete(cohort::delete_cohort), Delete, Resource::Cohort))
		.route("/api/cohorts/{id}/members", cap(get(cohort::list_members), Read, Resource::Cohort))
		.route(
			"/api/cohorts/{id}/members",
			cap(post(cohort::post_member), AddMember, Resource::Cohort),
		)
		.route(
			"/api/cohorts/{id}/members/import",
			cap(post(cohort::post_import_members), Import, Resource::Cohort),
		)
		.route(
			"/api/cohorts/{id}/members/{member_id}",
			cap(delete(cohort::delete_member), DeleteMember, Resource::Cohort),
		)
		.route("/api/cohorts/{id}/streams", cap(get(cohort::list_streams), Read, Resource::Cohort))
		.route(
			"/api/cohorts/{id}/streams",
			cap(post(cohort::post_stream), AssignStream, Resource::Cohort),
		)
		.route(
			"/api/cohorts/{id}/streams/{campaign_id}",
			cap(delete(cohort::delete_stream), DeleteStreamAssignment, Resource::Cohort),
		)
		// Organizations, creation is checked in the handler (owners only)
		.route(
			"/api/organizations",
			cap(get(organization::list_organizations), Read, Resource::Organization),
		)
		.route("/api/organizations", post(organization::post_organization))
}

fn init_team() -> Router<App> {
	Router::new()
		.route("/api/team", cap(get(team::list_team), Action::Read, Resource::Team))
		.route("/api/team", cap(post(team::post_invite), Action::InviteTeamUser, Resource::Team))
		.route("/api/team/{id}", cap(put(team::put_member), Action::InviteTeamUser, Resource::Team))
		.route(
			"/api/team/{id}",
			cap(delete(team::delete_member), Action::RemoveTeamUser, Resource::Team),
		)
}

fn init_admin() -> Router<App> {
	Router::new()
		.route(
			"/api/admin/settings",
			get(admin::settings::get_settings).put(admin::settings::put_settings),
		)
		.route("/api/admin/users", get(admin::user::list_users).post(admin::user::post_user))
		.route("/api/admin/users/{id}/status", put(admin::user::put_user_status))
		.route_layer(middleware::from_fn(admin::perm::require_admin))
}

fn init_cors(origin: &str) -> OiResult<CorsLayer> {
	let origin = HeaderValue::from_str(origin)
		.map_err(|_| Error::ConfigError(format!("invalid CORS origin: {}", origin)))?;
	Ok(CorsLayer::new().allow_origin(origin).allow_methods(Any).allow_headers(Any))
}

pub fn init(app: App) -> OiResult<Router> {
	let audit = AuditLayer::new(app.audit.clone(), app.clock.clone(), app.opts.audit.clone());

	let protected_router = Router::new()
		.route("/api/me", get(handler::get_me))
		.merge(init_content())
		.merge(init_team())
		.merge(init_admin())
		.layer(audit)
		.layer(middleware::from_fn_with_state(app.clone(), require_auth));

	let public_router = Router::new()
		.route("/api/health", get(handler::get_health))
		.route("/api/platform/status", get(handler::get_platform_status));

	let router = Router::new()
		.merge(public_router)
		.merge(protected_router)
		.layer(TraceLayer::new_for_http())
		.layer(middleware::from_fn(request_id));

	let router = match app.opts.cors_origin.as_deref() {
		Some(origin) => router.layer(init_cors(origin)?),
		None => router,
	};

	Ok(router.with_state(app))
}

// vim: ts=4
