//! Audit recording of successful write operations
//!
//! `AuditLayer` wraps the authenticated routes. After the inner service produced a 2xx
//! response to a mutating request, it resolves an action name for the route and
//! enqueues an `AuditLogEntry`. `AuditRecorder` drains the queue in the background,
//! so a slow or failing audit store never delays or fails the request.

use std::net::SocketAddr;
use std::sync::Arc;
use std::task::{Context, Poll};

use axum::body::Body;
use axum::extract::ConnectInfo;
use axum::http::{HeaderMap, Method, Request, header};
use axum::response::{IntoResponse, Response};
use futures::future::BoxFuture;
use serde_json::{Map, Value};
use tower::{Layer, Service};

use outbound_types::meta_adapter::{AuditLogEntry, AuditStore};

use crate::clock::Clock;
use crate::extract::Auth;
use crate::prelude::*;

/// Path prefixes never audited: noisy, sensitive or outside the content domain
pub const DEFAULT_EXCLUDED_PREFIXES: &[&str] = &[
	"/api/auth",
	"/api/analytics",
	"/api/admin",
	"/api/track",
	"/api/health",
	"/api/platform",
];

/// Largest request body captured for metadata
pub const DEFAULT_BODY_LIMIT: usize = 64 * 1024;

/// Request body fields safe to copy into audit metadata
const SAFE_BODY_FIELDS: &[&str] = &["title", "name", "email", "role", "type", "status"];

const MAX_DEVICE_LEN: usize = 255;

/// Route to action table. `*` matches exactly one path segment.
const ROUTE_ACTIONS: &[(&str, &str, &str)] = &[
	("POST", "/api/items", "CREATE_ITEM"),
	("POST", "/api/campaigns", "CREATE_CAMPAIGN"),
	("POST", "/api/cohorts", "CREATE_COHORT"),
	("POST", "/api/organizations", "CREATE_ORGANIZATION"),
	("POST", "/api/team", "INVITE_TEAM_MEMBER"),
	("PUT", "/api/items/*", "UPDATE_ITEM"),
	("DELETE", "/api/items/*", "DELETE_ITEM"),
	("PUT", "/api/campaigns/*", "UPDATE_CAMPAIGN"),
	("DELETE", "/api/campaigns/*", "DELETE_CAMPAIGN"),
	("PUT", "/api/cohorts/*", "UPDATE_COHORT"),
	("DELETE", "/api/cohorts/*", "DELETE_COHORT"),
	("PUT", "/api/team/*", "UPDATE_TEAM_MEMBER"),
	("DELETE", "/api/team/*", "REMOVE_TEAM_MEMBER"),
	("POST", "/api/cohorts/*/members", "ADD_COHORT_MEMBER"),
	("POST", "/api/cohorts/*/members/import", "IMPORT_COHORT_MEMBERS"),
	("DELETE", "/api/cohorts/*/members/*", "REMOVE_COHORT_MEMBER"),
	("POST", "/api/cohorts/*/streams", "ASSIGN_COHORT_STREAM"),
	("DELETE", "/api/cohorts/*/streams/*", "UNASSIGN_COHORT_STREAM"),
];

/// Response extension naming the resource a create handler produced
#[derive(Clone, Debug)]
pub struct CreatedResource(pub Box<str>);

fn matches_pattern(pattern: &str, path: &str) -> bool {
	let mut pattern = pattern.split('/');
	let mut path = path.split('/');
	loop {
		match (pattern.next(), path.next()) {
			(None, None) => return true,
			(Some("*"), Some(seg)) if !seg.is_empty() => {}
			(Some(p), Some(seg)) if p == seg => {}
			_ => return false,
		}
	}
}

/// Action name of a mutating route, `None` if the route is not audited
pub fn resolve_action(method: &Method, path: &str) -> Option<&'static str> {
	let path = path.trim_end_matches('/');
	// PATCH is audited like PUT
	let method = if method == Method::PATCH { "PUT" } else { method.as_str() };

	ROUTE_ACTIONS
		.iter()
		.find(|(m, pattern, _)| *m == method && matches_pattern(pattern, path))
		.map(|(_, _, action)| *action)
}

/// Whether a path falls under one of the excluded prefixes
pub fn is_excluded(path: &str, excluded: &[Box<str>]) -> bool {
	excluded.iter().any(|prefix| {
		path.strip_prefix(prefix.as_ref()).is_some_and(|rest| rest.is_empty() || rest.starts_with('/'))
	})
}

/// Resource id from `/api/<collection>/<id>/...`
fn resource_id_from_path(path: &str) -> Option<&str> {
	path.trim_start_matches('/').split('/').nth(2).filter(|seg| !seg.is_empty())
}

/// Copies the safe subset of a JSON request body
fn safe_body_subset(body: &Value) -> Option<Value> {
	match body {
		Value::Object(obj) => {
			let subset: Map<String, Value> = SAFE_BODY_FIELDS
				.iter()
				.filter_map(|field| obj.get(*field).map(|v| ((*field).to_string(), v.clone())))
				.collect();
			(!subset.is_empty()).then_some(Value::Object(subset))
		}
		Value::Array(rows) => Some(serde_json::json!({ "count": rows.len() })),
		_ => None,
	}
}

/// Client address, preferring proxy headers over the socket peer
fn client_ip(headers: &HeaderMap, peer: Option<SocketAddr>) -> Option<Box<str>> {
	headers
		.get("x-forwarded-for")
		.and_then(|h| h.to_str().ok())
		.and_then(|h| h.split(',').next())
		.map(str::trim)
		.filter(|ip| !ip.is_empty())
		.or_else(|| {
			headers.get("x-real-ip").and_then(|h| h.to_str().ok()).map(str::trim)
		})
		.map(Box::<str>::from)
		.or_else(|| peer.map(|addr| addr.ip().to_string().into_boxed_str()))
}

fn client_device(headers: &HeaderMap) -> Option<Box<str>> {
	headers
		.get(header::USER_AGENT)
		.and_then(|h| h.to_str().ok())
		.map(|ua| ua.chars().take(MAX_DEVICE_LEN).collect::<String>().into_boxed_str())
}

fn is_json(headers: &HeaderMap) -> bool {
	headers
		.get(header::CONTENT_TYPE)
		.and_then(|h| h.to_str().ok())
		.is_some_and(|ct| ct.starts_with("application/json"))
}

fn content_length(headers: &HeaderMap) -> Option<usize> {
	headers.get(header::CONTENT_LENGTH).and_then(|h| h.to_str().ok()).and_then(|h| h.parse().ok())
}

// AuditQueue //
//************//
/// Sending half of the audit queue. Enqueueing never blocks.
#[derive(Clone, Debug)]
pub struct AuditQueue {
	tx: flume::Sender<AuditLogEntry>,
}

impl AuditQueue {
	pub fn push(&self, entry: AuditLogEntry) {
		if let Err(err) = self.tx.send(entry) {
			warn!(action = %err.0.action, "Audit recorder is not running, entry dropped");
		}
	}
}

// AuditRecorder //
//***************//
/// Background consumer of the audit queue
#[derive(Debug)]
pub struct AuditRecorder {
	rx: flume::Receiver<AuditLogEntry>,
	store: Arc<dyn AuditStore>,
}

impl AuditRecorder {
	pub fn new(store: Arc<dyn AuditStore>) -> (AuditQueue, AuditRecorder) {
		let (tx, rx) = flume::unbounded();
		(AuditQueue { tx }, AuditRecorder { rx, store })
	}

	/// Persists queued entries until every `AuditQueue` is dropped
	pub async fn run(self) {
		debug!("Audit recorder started");
		while let Ok(entry) = self.rx.recv_async().await {
			if let Err(err) = self.store.create_audit_entry(&entry).await {
				warn!(user_id = %entry.user_id, action = %entry.action, "Audit write failed: {}", err);
			}
		}
		debug!("Audit recorder stopped");
	}

	/// Persists everything currently queued, then returns
	pub async fn drain(&self) -> usize {
		let mut count = 0;
		while let Ok(entry) = self.rx.try_recv() {
			if let Err(err) = self.store.create_audit_entry(&entry).await {
				warn!(user_id = %entry.user_id, action = %entry.action, "Audit write failed: {}", err);
			}
			count += 1;
		}
		count
	}
}

// AuditLayer //
//************//
#[derive(Clone, Debug)]
pub struct AuditConfig {
	pub excluded_prefixes: Arc<[Box<str>]>,
	pub body_limit: usize,
}

impl Default for AuditConfig {
	fn default() -> Self {
		Self {
			excluded_prefixes: DEFAULT_EXCLUDED_PREFIXES.iter().map(|p| (*p).into()).collect(),
			body_limit: DEFAULT_BODY_LIMIT,
		}
	}
}

/// Audit middleware layer
#[derive(Clone)]
pub struct AuditLayer {
	queue: AuditQueue,
	clock: Arc<dyn Clock>,
	config: AuditConfig,
}

impl AuditLayer {
	pub fn new(queue: AuditQueue, clock: Arc<dyn Clock>, config: AuditConfig) -> Self {
		Self { queue, clock, config }
	}
}

impl<S> Layer<S> for AuditLayer {
	type Service = AuditService<S>;

	fn layer(&self, inner: S) -> Self::Service {
		AuditService {
			inner,
			queue: self.queue.clone(),
			clock: self.clock.clone(),
			config: self.config.clone(),
		}
	}
}

/// Audit middleware service
#[derive(Clone)]
pub struct AuditService<S> {
	inner: S,
	queue: AuditQueue,
	clock: Arc<dyn Clock>,
	config: AuditConfig,
}

impl<S> Service<Request<Body>> for AuditService<S>
where
	S: Service<Request<Body>, Response = Response> + Clone + Send + 'static,
	S::Future: Send + 'static,
{
	type Response = S::Response;
	type Error = S::Error;
	type Future = BoxFuture<'static, Result<Self::Response, Self::Error>>;

	fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
		self.inner.poll_ready(cx)
	}

	fn call(&mut self, req: Request<Body>) -> Self::Future {
		let queue = self.queue.clone();
		let clock = self.clock.clone();
		let config = self.config.clone();
		let mut inner = self.inner.clone();

		Box::pin(async move {
			let method = req.method().clone();
			let path = req.uri().path().to_string();

			if matches!(method, Method::GET | Method::HEAD)
				|| is_excluded(&path, &config.excluded_prefixes)
			{
				return inner.call(req).await;
			}
			let Some(action) = resolve_action(&method, &path) else {
				return inner.call(req).await;
			};
			let Some(Auth(ctx)) = req.extensions().get::<Auth>().cloned() else {
				return inner.call(req).await;
			};

			let peer = req.extensions().get::<ConnectInfo<SocketAddr>>().map(|ci| ci.0);
			let ip_address = client_ip(req.headers(), peer);
			let device = client_device(req.headers());

			// Capture small JSON bodies, the request is rebuilt from the buffered bytes
			let capture = is_json(req.headers())
				&& content_length(req.headers()).is_some_and(|len| len <= config.body_limit);
			let (req, body) = if capture {
				let (parts, body) = req.into_parts();
				let bytes = match axum::body::to_bytes(body, config.body_limit).await {
					Ok(bytes) => bytes,
					Err(err) => {
						debug!("Failed to buffer request body: {}", err);
						return Ok(Error::ValidationError("invalid request body".into())
							.into_response());
					}
				};
				let body = serde_json::from_slice::<Value>(&bytes).ok().and_then(|v| safe_body_subset(&v));
				(Request::from_parts(parts, Body::from(bytes)), body)
			} else {
				(req, None)
			};

			let res = inner.call(req).await?;
			if !res.status().is_success() {
				return Ok(res);
			}

			let resource_id = resource_id_from_path(&path)
				.map(Box::<str>::from)
				.or_else(|| res.extensions().get::<CreatedResource>().map(|r| r.0.clone()));

			let mut metadata = Map::new();
			metadata.insert("method".into(), method.as_str().into());
			metadata.insert("path".into(), path.into());
			metadata.insert("status".into(), res.status().as_u16().into());
			if let Some(resource_id) = resource_id {
				metadata.insert("resourceId".into(), resource_id.as_ref().into());
			}
			if ctx.effective_user_id != ctx.user_id {
				metadata.insert("effectiveUserId".into(), ctx.effective_user_id.as_str().into());
			}
			if let Some(body) = body {
				metadata.insert("body".into(), body);
			}

			queue.push(AuditLogEntry {
				user_id: ctx.user_id,
				action: action.into(),
				ip_address,
				device,
				metadata: Value::Object(metadata),
				created_at: clock.now(),
			});

			Ok(res)
		})
	}
}


// vim: ts=4
