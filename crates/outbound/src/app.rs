//! App builder - constructs and runs the Outbound Impact application

use axum::Router;
use std::{net::SocketAddr, sync::Arc};

use crate::auth_adapter::AuthAdapter;
use crate::meta_adapter::MetaAdapter;
use crate::prelude::*;
use crate::routes;
pub use outbound_core::app::{App, AppBuilderOpts, AppState, VERSION};
use outbound_core::audit::AuditRecorder;
use outbound_core::clock::{Clock, SystemClock};
use outbound_core::settings::SettingsCache;

pub struct AppBuilder {
	opts: AppBuilderOpts,
	clock: Arc<dyn Clock>,
	auth_adapter: Option<Arc<dyn AuthAdapter>>,
	meta_adapter: Option<Arc<dyn MetaAdapter>>,
}

impl AppBuilder {
	pub fn new() -> Self {
		AppBuilder {
			opts: AppBuilderOpts::default(),
			clock: Arc::new(SystemClock),
			auth_adapter: None,
			meta_adapter: None,
		}
	}

	// Opts
	pub fn listen(&mut self, listen: impl Into<Box<str>>) -> &mut Self {
		self.opts.listen = listen.into();
		self
	}
	/// Path prefixes excluded from auditing on top of the defaults
	pub fn audit_exclude(&mut self, prefixes: impl IntoIterator<Item = impl Into<Box<str>>>) -> &mut Self {
		let mut excluded = self.opts.audit.excluded_prefixes.to_vec();
		excluded.extend(prefixes.into_iter().map(Into::into));
		self.opts.audit.excluded_prefixes = excluded.into();
		self
	}
	/// Largest request body captured into audit metadata, in bytes
	pub fn audit_body_limit(&mut self, limit: usize) -> &mut Self {
		self.opts.audit.body_limit = limit;
		self
	}
	pub fn cors_origin(&mut self, origin: impl Into<Box<str>>) -> &mut Self {
		self.opts.cors_origin = Some(origin.into());
		self
	}
	pub fn clock(&mut self, clock: Arc<dyn Clock>) -> &mut Self {
		self.clock = clock;
		self
	}

	// Adapters
	pub fn auth_adapter(&mut self, auth_adapter: Arc<dyn AuthAdapter>) -> &mut Self {
		self.auth_adapter = Some(auth_adapter);
		self
	}
	pub fn meta_adapter(&mut self, meta_adapter: Arc<dyn MetaAdapter>) -> &mut Self {
		self.meta_adapter = Some(meta_adapter);
		self
	}

	/// Creates the app state and router without starting anything.
	///
	/// The returned `AuditRecorder` must be run (or drained) for audit entries to be
	/// persisted.
	pub fn build(self) -> OiResult<(App, Router, AuditRecorder)> {
		let Some(auth_adapter) = self.auth_adapter else {
			error!("FATAL: No auth adapter configured");
			return Err(Error::ConfigError("No auth adapter configured".into()));
		};
		let Some(meta_adapter) = self.meta_adapter else {
			error!("FATAL: No meta adapter configured");
			return Err(Error::ConfigError("No meta adapter configured".into()));
		};

		let settings = Arc::new(SettingsCache::new(meta_adapter.clone(), self.clock.clone()));
		let (audit, recorder) = AuditRecorder::new(meta_adapter.clone());

		let app: App = Arc::new(AppState {
			opts: self.opts,
			clock: self.clock,
			settings,
			audit,
			auth_adapter,
			meta_adapter,
		});
		let router = routes::init(app.clone())?;

		Ok((app, router, recorder))
	}

	pub async fn run(self) -> OiResult<()> {
		info!("Outbound Impact V{}", VERSION);

		let (app, router, recorder) = self.build()?;
		let recorder = tokio::spawn(recorder.run());

		let listener = tokio::net::TcpListener::bind(app.opts.listen.as_ref()).await.map_err(|e| {
			error!("FATAL: Cannot listen on {}: {}", app.opts.listen, e);
			e
		})?;
		info!("Listening on {}", app.opts.listen);

		axum::serve(listener, router.into_make_service_with_connect_info::<SocketAddr>())
			.with_graceful_shutdown(shutdown_signal())
			.await?;

		// The recorder stops once the last queue handle is gone
		drop(app);
		if let Err(e) = recorder.await {
			warn!("Audit recorder task failed: {}", e);
		}
		info!("Shut down");

		Ok(())
	}
}

impl Default for AppBuilder {
	fn default() -> Self {
		Self::new()
	}
}

async fn shutdown_signal() {
	if let Err(e) = tokio::signal::ctrl_c().await {
		warn!("Failed to listen for shutdown signal: {}", e);
		std::future::pending::<()>().await;
	}
	info!("Shutdown signal received");
}

// vim: ts=4
