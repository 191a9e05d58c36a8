//! Content API handlers
//!
//! Every handler works on the resources of the effective user and narrows its queries
//! to the organization scope of the request. Capability checks are attached to the
//! routes with `outbound_core::roles::require_capability`.

#![deny(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![forbid(unsafe_code)]

pub mod campaign;
pub mod cohort;
pub mod item;
pub mod organization;

mod prelude;
mod query;

// vim: ts=4
