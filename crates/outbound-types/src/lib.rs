//! Shared types, adapter traits, and utilities for the Outbound Impact platform.
//!
//! Everything the adapter crates need lives here, so adapters compile without
//! depending on the HTTP layer.

pub mod auth_adapter;
pub mod error;
pub mod meta_adapter;
pub mod prelude;
pub mod types;
pub mod utils;

// vim: ts=4
