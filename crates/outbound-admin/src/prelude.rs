pub use outbound_core::prelude::*;

// vim: ts=4
