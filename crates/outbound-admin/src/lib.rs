//! Admin API handlers for platform operators

#![deny(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![forbid(unsafe_code)]

pub mod perm;
pub mod settings;
pub mod user;

mod prelude;

// vim: ts=4
