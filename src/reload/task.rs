/* src/reload/task.rs */

use std::any::Any;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use futures_util::FutureExt;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio::time::{Instant, sleep, sleep_until};
use tokio_util::sync::CancellationToken;

use super::{Collaborators, FactorySink, Poller, ReloadError, StatusLogger, TextFetcher};
use crate::status::{ConfigSnapshot, SnapshotSlot};

/// Timing of the polling loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReloadConfig {
	/// Time from the start of one cycle to the start of the next.
	pub poll_interval: Duration,
	/// Wait before fetching within each cycle.
	pub initial_delay: Duration,
}

impl Default for ReloadConfig {
	fn default() -> Self {
		Self {
			poll_interval: Duration::from_secs(15),
			initial_delay: Duration::from_secs(2),
		}
	}
}

/// Owns the published snapshot and the background task that refreshes it.
///
/// Without a fetcher the loop is passive: it holds the initial snapshot and
/// never polls.
pub struct HotReloadLoop {
	slot: Arc<SnapshotSlot>,
	url: Option<String>,
	sink: Arc<dyn FactorySink>,
	cancel: CancellationToken,
	task: Mutex<Option<JoinHandle<()>>>,
}

impl HotReloadLoop {
	/// Builds the loop and, when `fetcher` is present, tells the sink that
	/// background processing starts and spawns the polling task.
	///
	/// Polling needs a Tokio runtime; without one this fails before the sink
	/// is touched.
	pub fn new(
		fetcher: Option<Arc<dyn TextFetcher>>,
		url: Option<String>,
		initial: Arc<ConfigSnapshot>,
		collaborators: Collaborators,
		config: ReloadConfig,
	) -> Result<Self, ReloadError> {
		let slot = Arc::new(SnapshotSlot::new(initial));
		let cancel = CancellationToken::new();

		let mut task = None;
		if let Some(fetcher) = fetcher {
			let runtime = Handle::try_current()?;
			let poller = Poller::new(
				fetcher,
				url.clone().unwrap_or_default(),
				&collaborators,
				Arc::clone(&slot),
			)
			.with_cancellation(cancel.clone());

			collaborators.sink.start_background_processing();
			task = Some(runtime.spawn(poll(
				poller,
				Arc::clone(&collaborators.logger),
				config,
				cancel.clone(),
			)));
		}

		Ok(Self {
			slot,
			url,
			sink: collaborators.sink,
			cancel,
			task: Mutex::new(task),
		})
	}

	/// The snapshot currently in effect.
	pub fn current(&self) -> Arc<ConfigSnapshot> {
		self.slot.load()
	}

	pub fn slot(&self) -> &Arc<SnapshotSlot> {
		&self.slot
	}

	pub fn url(&self) -> Option<&str> {
		self.url.as_deref()
	}

	/// True while the polling task is alive.
	pub fn is_running(&self) -> bool {
		self.task
			.lock()
			.unwrap_or_else(PoisonError::into_inner)
			.as_ref()
			.is_some_and(|handle| !handle.is_finished())
	}

	/// Stops polling and waits for the task to exit, then stops the sink's
	/// background processing. Later calls do nothing.
	pub async fn shutdown(&self) {
		self.cancel.cancel();
		let handle = self
			.task
			.lock()
			.unwrap_or_else(PoisonError::into_inner)
			.take();
		if let Some(handle) = handle {
			if let Err(e) = handle.await {
				log::warn!("Polling task ended abnormally: {}", e);
			}
			self.sink.shutdown_background_processing();
		}
	}
}

impl Drop for HotReloadLoop {
	fn drop(&mut self) {
		self.cancel.cancel();
		if let Some(handle) = self.task.get_mut().unwrap_or_else(PoisonError::into_inner).take() {
			handle.abort();
		}
	}
}

impl std::fmt::Debug for HotReloadLoop {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("HotReloadLoop")
			.field("url", &self.url)
			.field("slot", &self.slot)
			.field("running", &self.is_running())
			.finish_non_exhaustive()
	}
}

/// Waits for `wait`; false if cancelled first.
async fn wait_or_cancel(cancel: &CancellationToken, wait: impl Future<Output = ()>) -> bool {
	tokio::select! {
		biased;
		_ = cancel.cancelled() => false,
		_ = wait => true,
	}
}

async fn poll(mut poller: Poller, logger: Arc<dyn StatusLogger>, config: ReloadConfig, cancel: CancellationToken) {
	logger.log_update("Polling Background thread started");
	while !cancel.is_cancelled() {
		let next_run = Instant::now() + config.poll_interval;
		if !wait_or_cancel(&cancel, sleep(config.initial_delay)).await {
			break;
		}

		let cycle = AssertUnwindSafe(poller.check_for_update()).catch_unwind();
		tokio::select! {
			biased;
			_ = cancel.cancelled() => break,
			result = cycle => {
				if let Err(payload) = result {
					logger.log_unhandled_error(&ReloadError::Panicked(panic_message(&*payload)));
				}
			}
		}

		if !wait_or_cancel(&cancel, sleep_until(next_run)).await {
			break;
		}
	}
	logger.log_update("Polling Background thread stopping");
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
	if let Some(s) = payload.downcast_ref::<&str>() {
		s.to_string()
	} else if let Some(s) = payload.downcast_ref::<String>() {
		s.clone()
	} else {
		"unknown panic".to_string()
	}
}
