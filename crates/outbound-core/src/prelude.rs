pub use crate::app::App;
pub use outbound_types::prelude::*;

// vim: ts=4
