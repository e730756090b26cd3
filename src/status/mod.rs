/* src/status/mod.rs */

mod lifecycle;
mod record;
mod slot;
mod snapshot;

pub use lifecycle::{LifecycleState, LifecycleStatus};
pub use record::StatusRecord;
pub use slot::SnapshotSlot;
pub use snapshot::{ConfigSnapshot, LimiterFactories, NoopFactories};
