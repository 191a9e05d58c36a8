//! App state type

use std::sync::Arc;

use outbound_types::auth_adapter::AuthAdapter;
use outbound_types::meta_adapter::MetaAdapter;

use crate::audit::{AuditConfig, AuditQueue};
use crate::clock::Clock;
use crate::settings::SettingsCache;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub struct AppState {
	pub opts: AppBuilderOpts,
	pub clock: Arc<dyn Clock>,
	pub settings: Arc<SettingsCache>,
	pub audit: AuditQueue,

	pub auth_adapter: Arc<dyn AuthAdapter>,
	pub meta_adapter: Arc<dyn MetaAdapter>,
}

pub type App = Arc<AppState>;

#[derive(Debug, Clone)]
pub struct AppBuilderOpts {
	pub listen: Box<str>,
	pub audit: AuditConfig,
	/// Allowed CORS origin, no CORS headers when unset
	pub cors_origin: Option<Box<str>>,
}

impl Default for AppBuilderOpts {
	fn default() -> Self {
		Self {
			listen: "127.0.0.1:8080".into(),
			audit: AuditConfig::default(),
			cors_origin: None,
		}
	}
}

// vim: ts=4
