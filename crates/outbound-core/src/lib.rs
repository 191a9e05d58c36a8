//! Core infrastructure for the Outbound Impact platform.
//!
//! Every authenticated request flows through the same pipeline:
//! `require_auth` (credential, session age, suspension, maintenance), effective
//! identity resolution, then per-route organization scoping and capability checks,
//! and finally the audit layer once a write succeeded.

#![deny(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![forbid(unsafe_code)]

pub mod app;
pub mod audit;
pub mod clock;
pub mod extract;
pub mod identity;
pub mod middleware;
pub mod org_scope;
pub mod prelude;
pub mod roles;
pub mod settings;

// Re-export commonly used types
pub use app::{App, AppBuilderOpts, AppState};
pub use extract::{Auth, OptionalRequestId};
pub use identity::RequestCtx;
pub use middleware::PermissionCheckOutput;
pub use org_scope::OrgScope;
pub use roles::{Action, Capability, Resource};

// vim: ts=4
