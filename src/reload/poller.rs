/* src/reload/poller.rs */

use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use super::{
	Collaborators, EmptyReason, FactorySink, ReloadError, SnapshotMapper, StatusLogger, TextFetcher,
};
use crate::binder::{RateLimitDocument, YamlBinder, remove_leading_empty_documents};
use crate::clock::Clock;
use crate::status::{ConfigSnapshot, SnapshotSlot};

/// Result of one fetch/parse/map pass.
#[derive(Debug)]
pub enum CycleOutcome {
	/// The source served the same text as last time.
	Unchanged,
	/// The mapper produced a new snapshot.
	Applied(Arc<ConfigSnapshot>),
	/// The cycle failed; the current snapshot is still good.
	Failed(ReloadError),
}

/// State and collaborators of a single reload cycle.
///
/// All fields are touched only by the task driving the poller.
pub struct Poller {
	fetcher: Arc<dyn TextFetcher>,
	mapper: Arc<dyn SnapshotMapper>,
	sink: Arc<dyn FactorySink>,
	logger: Arc<dyn StatusLogger>,
	clock: Arc<dyn Clock>,
	slot: Arc<SnapshotSlot>,
	binder: YamlBinder<RateLimitDocument>,
	url: String,
	current: Arc<ConfigSnapshot>,
	last_fetched: String,
	last_as_of: u64,
	cancel: CancellationToken,
}

impl Poller {
	/// Starts from the snapshot currently held in `slot`.
	pub fn new(
		fetcher: Arc<dyn TextFetcher>,
		url: impl Into<String>,
		collaborators: &Collaborators,
		slot: Arc<SnapshotSlot>,
	) -> Self {
		let url = url.into();
		let current = slot.load();
		Self {
			fetcher,
			mapper: Arc::clone(&collaborators.mapper),
			sink: Arc::clone(&collaborators.sink),
			logger: Arc::clone(&collaborators.logger),
			clock: Arc::clone(&collaborators.clock),
			slot,
			binder: YamlBinder::new(url.as_str()),
			url,
			last_as_of: current.status().latest_as_of(),
			current,
			last_fetched: String::new(),
			cancel: CancellationToken::new(),
		}
	}

	/// Once `token` is cancelled no further snapshot is published.
	pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
		self.cancel = token;
		self
	}

	pub fn current(&self) -> &Arc<ConfigSnapshot> {
		&self.current
	}

	pub fn last_fetched(&self) -> &str {
		&self.last_fetched
	}

	/// Fetches the document and rejects empty ones.
	///
	/// Emptiness is judged on a cleaned copy; the original text is returned.
	pub async fn load_text(&self) -> Result<String, ReloadError> {
		let original = self
			.fetcher
			.fetch_yaml()
			.await
			.map_err(ReloadError::FetchFailed)?
			.ok_or_else(|| ReloadError::empty(EmptyReason::Null, None))?;

		let trimmed = original.trim_start();
		if trimmed.is_empty() {
			return Err(ReloadError::empty(EmptyReason::Empty, Some(&original)));
		}
		if remove_leading_empty_documents(trimmed).is_empty() {
			return Err(ReloadError::empty(EmptyReason::NoData, Some(&original)));
		}
		Ok(original)
	}

	/// Runs one pass without publishing anything.
	pub async fn run_cycle(&mut self) -> CycleOutcome {
		let text = match self.load_text().await {
			Ok(text) => text,
			Err(e) => return CycleOutcome::Failed(e),
		};
		if text == self.last_fetched {
			return CycleOutcome::Unchanged;
		}
		// Remember the text before parsing so a bad document is reported once.
		self.last_fetched = text;

		let document = match self.binder.bind(Some(self.last_fetched.as_str())) {
			Ok(document) => document.unwrap_or_default(),
			Err(e) => return CycleOutcome::Failed(e.into()),
		};
		match self.mapper.map(&self.current, &self.url, &document) {
			Ok(Some(snapshot)) => CycleOutcome::Applied(Arc::new(snapshot)),
			Ok(None) => CycleOutcome::Unchanged,
			Err(e) => CycleOutcome::Failed(e.into()),
		}
	}

	/// Runs one pass and publishes its result. Returns whether a snapshot
	/// was published.
	pub async fn check_for_update(&mut self) -> bool {
		let snapshot = match self.run_cycle().await {
			CycleOutcome::Unchanged => return false,
			CycleOutcome::Applied(snapshot) => {
				// The mapper stamps with its own clock.
				let snapshot = if snapshot.status().current.as_of() < self.last_as_of
					|| snapshot.status().update.as_of() < self.last_as_of
				{
					Arc::new(snapshot.restamped(self.last_as_of))
				} else {
					snapshot
				};
				self.last_as_of = snapshot.status().latest_as_of();
				snapshot
			}
			CycleOutcome::Failed(e) => {
				let now = self.stamp();
				Arc::new(self.current.update_error(e.to_string(), now))
			}
		};
		if self.cancel.is_cancelled() {
			return false;
		}
		self.publish(snapshot);
		true
	}

	fn publish(&mut self, snapshot: Arc<ConfigSnapshot>) {
		self.current = Arc::clone(&snapshot);
		self.slot.publish(Arc::clone(&snapshot));
		self.sink.update(&snapshot);
		self.logger.log_update(&format!("Update: {}", snapshot.status_json()));
	}

	/// Current time, never earlier than a timestamp already handed out.
	fn stamp(&mut self) -> u64 {
		self.last_as_of = self.last_as_of.max(self.clock.now_millis());
		self.last_as_of
	}
}

impl std::fmt::Debug for Poller {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Poller")
			.field("url", &self.url)
			.field("current", self.current.status())
			.field("last_fetched_len", &self.last_fetched.len())
			.finish_non_exhaustive()
	}
}
