//! Process-wide platform settings cache
//!
//! Reads are best-effort and always available: a failing store yields the defaults,
//! which are cached for the normal TTL like any other value.

use std::sync::Arc;

use outbound_types::meta_adapter::SettingsStore;

use super::types::PlatformSettings;
use crate::clock::Clock;
use crate::prelude::*;

pub const SETTINGS_TTL_SECS: i64 = 30;

#[derive(Debug)]
struct Cached {
	settings: Arc<PlatformSettings>,
	fetched_at: Timestamp,
}

#[derive(Debug, Default)]
struct CacheState {
	cached: Option<Cached>,
	/// Bumped on every invalidation. A fetch started under an older generation
	/// is not allowed to repopulate the cache.
	generation: u64,
}

#[derive(Debug)]
pub struct SettingsCache {
	store: Arc<dyn SettingsStore>,
	clock: Arc<dyn Clock>,
	ttl: i64,
	state: parking_lot::RwLock<CacheState>,
}

impl SettingsCache {
	pub fn new(store: Arc<dyn SettingsStore>, clock: Arc<dyn Clock>) -> Self {
		Self::with_ttl(store, clock, SETTINGS_TTL_SECS)
	}

	pub fn with_ttl(store: Arc<dyn SettingsStore>, clock: Arc<dyn Clock>, ttl: i64) -> Self {
		Self { store, clock, ttl, state: parking_lot::RwLock::new(CacheState::default()) }
	}

	/// Current settings, refetched when older than the TTL. Never fails.
	pub async fn get(&self) -> Arc<PlatformSettings> {
		let now = self.clock.now();
		let generation = {
			let state = self.state.read();
			if let Some(cached) = &state.cached
				&& now.seconds_since(cached.fetched_at) < self.ttl
			{
				return cached.settings.clone();
			}
			state.generation
		};

		let settings = Arc::new(self.fetch().await);

		let mut state = self.state.write();
		if state.generation == generation {
			state.cached = Some(Cached { settings: settings.clone(), fetched_at: now });
		} else {
			debug!("Settings invalidated during fetch, not caching");
		}
		settings
	}

	/// Reads the store directly, bypassing and not touching the cache
	pub async fn fetch(&self) -> PlatformSettings {
		match self.store.read_platform_settings().await {
			Ok(Some(stored)) => PlatformSettings::merge_stored(&stored).unwrap_or_else(|err| {
				warn!("Stored platform settings are invalid, using defaults: {}", err);
				PlatformSettings::default()
			}),
			Ok(None) => PlatformSettings::default(),
			Err(err) => {
				warn!("Failed to read platform settings, using defaults: {}", err);
				PlatformSettings::default()
			}
		}
	}

	/// Drops the cached value, the next `get()` refetches
	pub fn invalidate(&self) {
		let mut state = self.state.write();
		state.cached = None;
		state.generation = state.generation.wrapping_add(1);
		debug!("Platform settings cache invalidated");
	}
}


// vim: ts=4
