/* src/status/snapshot.rs */

use std::fmt;
use std::sync::Arc;

use super::{LifecycleStatus, StatusRecord};

/// The capability that produces limiter factories for enforcement.
///
/// Opaque to this crate: it is created by a
/// [`SnapshotMapper`](crate::reload::SnapshotMapper) and handed to a
/// [`FactorySink`](crate::reload::FactorySink) inside each snapshot.
pub trait LimiterFactories: fmt::Debug + Send + Sync {
	/// Whether these factories actually limit anything.
	fn is_active(&self) -> bool;
}

/// Factories that never limit.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopFactories;

impl LimiterFactories for NoopFactories {
	fn is_active(&self) -> bool {
		false
	}
}

/// An immutable pairing of limiter factories with their status.
///
/// Snapshots are replaced wholesale, never mutated.
#[derive(Debug, Clone)]
pub struct ConfigSnapshot {
	factories: Arc<dyn LimiterFactories>,
	status: StatusRecord,
}

impl ConfigSnapshot {
	pub fn new(factories: Arc<dyn LimiterFactories>, status: StatusRecord) -> Self {
		Self { factories, status }
	}

	/// Everything off: no-op factories, both statuses disabled.
	pub fn disabled(source_label: impl Into<String>, as_of: u64) -> Self {
		Self::new(
			Arc::new(NoopFactories),
			StatusRecord::new(
				LifecycleStatus::disabled(as_of),
				LifecycleStatus::disabled(as_of),
				source_label,
			),
		)
	}

	pub fn factories(&self) -> &Arc<dyn LimiterFactories> {
		&self.factories
	}

	pub fn status(&self) -> &StatusRecord {
		&self.status
	}

	pub fn is_rate_limiting_enabled(&self) -> bool {
		self.factories.is_active()
	}

	/// Successor carrying newly mapped factories, with both statuses active.
	pub fn activated(&self, factories: Arc<dyn LimiterFactories>, as_of: u64) -> Self {
		Self::new(
			factories,
			StatusRecord::new(
				LifecycleStatus::active(as_of),
				LifecycleStatus::active(as_of),
				self.status.source_label.clone(),
			),
		)
	}

	/// Successor that keeps the working factories but reports a failed update.
	pub fn update_error(&self, message: impl Into<String>, as_of: u64) -> Self {
		Self::new(
			Arc::clone(&self.factories),
			self.status.with_update(LifecycleStatus::failed(message, as_of)),
		)
	}

	/// Same snapshot with no status older than `min_as_of`.
	pub(crate) fn restamped(&self, min_as_of: u64) -> Self {
		Self::new(
			Arc::clone(&self.factories),
			StatusRecord::new(
				self.status.current.not_before(min_as_of),
				self.status.update.not_before(min_as_of),
				self.status.source_label.clone(),
			),
		)
	}

	pub fn status_json(&self) -> String {
		self.status.to_json()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::status::LifecycleState;

	#[derive(Debug)]
	struct Live;

	impl LimiterFactories for Live {
		fn is_active(&self) -> bool {
			true
		}
	}

	#[test]
	fn update_error_retains_factories() {
		let base = ConfigSnapshot::disabled("src", 1).activated(Arc::new(Live), 2);
		let degraded = base.update_error("bad document", 3);

		assert!(Arc::ptr_eq(base.factories(), degraded.factories()));
		assert!(degraded.is_rate_limiting_enabled());
		assert_eq!(degraded.status().current, base.status().current);
		assert_eq!(degraded.status().update.state(), LifecycleState::Error);
		assert_eq!(degraded.status().update.error(), Some("bad document"));
		assert_eq!(degraded.status().source_label, "src");
	}

	#[test]
	fn restamped_only_moves_forward() {
		let snapshot = ConfigSnapshot::disabled("src", 1)
			.activated(Arc::new(Live), 100)
			.update_error("late", 300);
		let moved = snapshot.restamped(200);

		assert!(Arc::ptr_eq(snapshot.factories(), moved.factories()));
		assert_eq!(moved.status().current.as_of(), 200);
		assert_eq!(moved.status().update.as_of(), 300);
		assert_eq!(moved.status().update.error(), Some("late"));
		assert_eq!(moved.status().current.state(), LifecycleState::Active);
	}

	#[test]
	fn disabled_is_not_enabled() {
		let snapshot = ConfigSnapshot::disabled("src", 5);
		assert!(!snapshot.is_rate_limiting_enabled());
		assert_eq!(snapshot.status().current.state(), LifecycleState::Disabled);
		assert_eq!(snapshot.status().update.state(), LifecycleState::Disabled);
	}
}
