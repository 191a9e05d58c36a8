//! Team membership handlers
//!
//! A team member acts for the account owner that invited them. Memberships carry a
//! team role and an optional list of organizations the member is restricted to.

#![deny(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![forbid(unsafe_code)]

pub mod handler;

mod prelude;

// vim: ts=4
