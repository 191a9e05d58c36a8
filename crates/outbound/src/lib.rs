//! Outbound Impact is a multi-tenant content distribution platform.
//!
//! This crate wires the pieces together: adapters, the platform settings cache, the
//! audit recorder and the HTTP router with its middleware stack.
//!
//! # Request pipeline
//!
//! - request id and tracing
//! - `require_auth`: bearer token, session age, suspension, maintenance mode, then
//!   effective identity resolution
//! - audit layer (successful writes only)
//! - per-route capability checks
//! - handler, scoped to the effective owner and organization scope

#![deny(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![forbid(unsafe_code)]

// Re-export shared types and adapter traits from outbound-types
pub use outbound_types::auth_adapter;
pub use outbound_types::error;
pub use outbound_types::meta_adapter;
pub use outbound_types::types;
pub use outbound_types::utils;

// Core and feature crate re-exports
pub use outbound_admin as admin;
pub use outbound_content as content;
pub use outbound_core::clock;
pub use outbound_core::settings;
pub use outbound_team as team;

// Local modules
pub mod app;
pub mod handler;
pub mod prelude;
pub mod routes;

pub use crate::app::{App, AppBuilder};

// vim: ts=4
