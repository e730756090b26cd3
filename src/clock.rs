/* src/clock.rs */

use std::time::{SystemTime, UNIX_EPOCH};

/// Source of wall-clock timestamps, in milliseconds since the Unix epoch.
pub trait Clock: Send + Sync {
	fn now_millis(&self) -> u64;
}

/// The system wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
	fn now_millis(&self) -> u64 {
		SystemTime::now()
			.duration_since(UNIX_EPOCH)
			.map(|d| d.as_millis() as u64)
			.unwrap_or(0)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn system_clock_is_past_epoch() {
		assert!(SystemClock.now_millis() > 0);
	}
}
