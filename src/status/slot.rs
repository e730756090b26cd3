/* src/status/slot.rs */

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use arc_swap::ArcSwap;

use super::ConfigSnapshot;

/// Holds the snapshot currently in effect.
///
/// Reads are wait-free and always observe a fully built snapshot. Only the
/// reload loop stores into the slot.
pub struct SnapshotSlot {
	inner: ArcSwap<ConfigSnapshot>,
	version: AtomicU64,
}

impl SnapshotSlot {
	pub fn new(initial: Arc<ConfigSnapshot>) -> Self {
		Self {
			inner: ArcSwap::new(initial),
			version: AtomicU64::new(0),
		}
	}

	/// Returns the snapshot in effect.
	pub fn load(&self) -> Arc<ConfigSnapshot> {
		self.inner.load_full()
	}

	/// Number of snapshots published since construction.
	pub fn version(&self) -> u64 {
		self.version.load(Ordering::Acquire)
	}

	pub(crate) fn publish(&self, snapshot: Arc<ConfigSnapshot>) {
		self.inner.store(snapshot);
		self.version.fetch_add(1, Ordering::AcqRel);
	}
}

impl std::fmt::Debug for SnapshotSlot {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("SnapshotSlot")
			.field("version", &self.version())
			.field("status", self.inner.load().status())
			.finish()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn publish_replaces_and_counts() {
		let slot = SnapshotSlot::new(Arc::new(ConfigSnapshot::disabled("a", 1)));
		assert_eq!(slot.version(), 0);

		let next = Arc::new(ConfigSnapshot::disabled("b", 2));
		slot.publish(Arc::clone(&next));

		assert!(Arc::ptr_eq(&slot.load(), &next));
		assert_eq!(slot.version(), 1);
	}
}
