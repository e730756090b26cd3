/* src/reload/mod.rs */

//!
//! Background polling that refreshes the published configuration snapshot.
//!
//! - [`Poller`] - one fetch/compare/parse/map/publish pass
//! - [`HotReloadLoop`] - owns the snapshot slot and drives a `Poller` on a task

mod capability;
mod error;
#[cfg(feature = "http")]
mod http;
mod poller;
mod task;

pub use capability::{FactorySink, LogStatusLogger, SnapshotMapper, StatusLogger, TextFetcher};
pub use error::{EmptyReason, FetchError, MappingError, ReloadError};
#[cfg(feature = "http")]
pub use http::HttpFetcher;
pub use poller::{CycleOutcome, Poller};
pub use task::{HotReloadLoop, ReloadConfig};

use std::sync::Arc;

use crate::clock::{Clock, SystemClock};

/// Collaborators shared by every cycle.
#[derive(Clone)]
pub struct Collaborators {
	pub mapper: Arc<dyn SnapshotMapper>,
	pub sink: Arc<dyn FactorySink>,
	pub logger: Arc<dyn StatusLogger>,
	pub clock: Arc<dyn Clock>,
}

impl Collaborators {
	/// Uses [`LogStatusLogger`] and the system clock.
	pub fn new(mapper: Arc<dyn SnapshotMapper>, sink: Arc<dyn FactorySink>) -> Self {
		Self {
			mapper,
			sink,
			logger: Arc::new(LogStatusLogger),
			clock: Arc::new(SystemClock),
		}
	}

	pub fn with_logger(mut self, logger: Arc<dyn StatusLogger>) -> Self {
		self.logger = logger;
		self
	}

	pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
		self.clock = clock;
		self
	}
}
