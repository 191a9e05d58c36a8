//! Shared setup for end-to-end router tests

#![allow(dead_code)]

use axum::{
	Router,
	body::Body,
	extract::Request,
	http::{StatusCode, header},
};
use http_body_util::BodyExt;
use serde_json::Value;
use std::sync::Arc;
use tempfile::TempDir;
use tower::ServiceExt;

use outbound::App;
use outbound::AppBuilder;
use outbound::auth_adapter::AuthAdapter;
use outbound::clock::MockClock;
use outbound_core::audit::AuditRecorder;
use outbound::meta_adapter::{CreateUserData, User, UserStore};
use outbound::prelude::*;
use outbound_auth_adapter_jwt::AuthAdapterJwt;
use outbound_meta_adapter_sqlite::MetaAdapterSqlite;

pub const SECRET: &[u8] = b"test-secret-at-least-16-bytes";

pub struct TestEnv {
	pub app: App,
	pub router: Router,
	pub recorder: AuditRecorder,
	pub meta: Arc<MetaAdapterSqlite>,
	pub jwt: Arc<AuthAdapterJwt>,
	pub clock: MockClock,
	_tmp: TempDir,
}

pub async fn setup() -> TestEnv {
	let tmp = TempDir::new().expect("Failed to create temp directory");
	let meta = Arc::new(MetaAdapterSqlite::new(tmp.path()).await.expect("Failed to create adapter"));
	let jwt = Arc::new(AuthAdapterJwt::new(SECRET).expect("Failed to create JWT adapter"));
	let clock = MockClock::new(Timestamp::now());

	let mut builder = AppBuilder::new();
	builder.auth_adapter(jwt.clone()).meta_adapter(meta.clone()).clock(Arc::new(clock.clone()));
	let (app, router, recorder) = builder.build().expect("Failed to build app");

	TestEnv { app, router, recorder, meta, jwt, clock, _tmp: tmp }
}

impl TestEnv {
	pub async fn user(&self, email: &str, role: Role) -> User {
		self.meta
			.create_user(&CreateUserData { email, name: "Test User", role })
			.await
			.expect("Failed to create user")
	}

	pub async fn token(&self, user: &User) -> String {
		self.jwt.create_access_token(&user.id, user.role, 3600).await.expect("token").into()
	}

	pub async fn send(
		&self,
		method: &str,
		uri: &str,
		token: Option<&str>,
		body: Option<Value>,
	) -> (StatusCode, Value) {
		let mut req = Request::builder().method(method).uri(uri);
		if let Some(token) = token {
			req = req.header(header::AUTHORIZATION, format!("Bearer {}", token));
		}
		let req = match body {
			Some(body) => {
				let bytes = body.to_string();
				req.header(header::CONTENT_TYPE, "application/json")
					.header(header::CONTENT_LENGTH, bytes.len())
					.body(Body::from(bytes))
			}
			None => req.body(Body::empty()),
		}
		.expect("request");

		let res = self.router.clone().oneshot(req).await.expect("response");
		let status = res.status();
		let bytes = res.into_body().collect().await.expect("body").to_bytes();
		let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
		(status, value)
	}

	pub async fn get(&self, uri: &str, token: &str) -> (StatusCode, Value) {
		self.send("GET", uri, Some(token), None).await
	}

	pub async fn post(&self, uri: &str, token: &str, body: Value) -> (StatusCode, Value) {
		self.send("POST", uri, Some(token), Some(body)).await
	}

	pub async fn put(&self, uri: &str, token: &str, body: Value) -> (StatusCode, Value) {
		self.send("PUT", uri, Some(token), Some(body)).await
	}

	pub async fn delete(&self, uri: &str, token: &str) -> (StatusCode, Value) {
		self.send("DELETE", uri, Some(token), None).await
	}
}

/// Error code of an error response body
pub fn code(body: &Value) -> &str {
	body["error"]["code"].as_str().unwrap_or_default()
}

// vim: ts=4
