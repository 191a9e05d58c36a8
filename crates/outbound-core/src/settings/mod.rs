//! Platform settings: typed record and process-wide cache

pub mod cache;
pub mod types;

pub use cache::{SETTINGS_TTL_SECS, SettingsCache};
pub use types::PlatformSettings;

// vim: ts=4
