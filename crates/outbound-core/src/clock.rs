//! Time source abstraction
//!
//! Everything time-dependent in the request path (session expiry, settings staleness)
//! reads the time through a `Clock` so tests can pin it.

use std::fmt::Debug;
use std::sync::Arc;
use std::sync::atomic::{AtomicI64, Ordering};

use outbound_types::types::Timestamp;

pub trait Clock: Debug + Send + Sync {
	fn now(&self) -> Timestamp;
}

/// Wall clock
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
	fn now(&self) -> Timestamp {
		Timestamp::now()
	}
}

/// Manually driven clock. Clones share the same time.
#[derive(Debug, Clone)]
pub struct MockClock {
	now: Arc<AtomicI64>,
}

impl MockClock {
	pub fn new(now: Timestamp) -> Self {
		Self { now: Arc::new(AtomicI64::new(now.0)) }
	}

	pub fn set(&self, now: Timestamp) {
		self.now.store(now.0, Ordering::SeqCst);
	}

	pub fn advance(&self, seconds: i64) {
		self.now.fetch_add(seconds, Ordering::SeqCst);
	}
}

impl Clock for MockClock {
	fn now(&self) -> Timestamp {
		Timestamp(self.now.load(Ordering::SeqCst))
	}
}


// vim: ts=4
