/* src/controller/live.rs */

//!
//! Composition of bootstrap resolution and the hot reload loop.

use std::path::PathBuf;
use std::sync::Arc;

use super::LiveError;
use crate::bootstrap::{self, BootstrapDecision, LocalResource, SourcedText};
use crate::clock::{Clock, SystemClock};
use crate::reload::{
	Collaborators, FactorySink, HotReloadLoop, LogStatusLogger, ReloadConfig, SnapshotMapper, StatusLogger,
	TextFetcher,
};
use crate::status::ConfigSnapshot;

/// Rate-limiting configuration resolved at startup and kept fresh in the
/// background.
pub struct LiveLimits {
	decision: BootstrapDecision,
	reload: HotReloadLoop,
}

/// Builder for [`LiveLimits`].
pub struct LiveLimitsBuilder {
	env_url: Option<String>,
	read_environment: bool,
	local_file: Option<SourcedText>,
	resource_dir: Option<PathBuf>,
	fetcher: Option<Arc<dyn TextFetcher>>,
	mapper: Option<Arc<dyn SnapshotMapper>>,
	sink: Option<Arc<dyn FactorySink>>,
	logger: Arc<dyn StatusLogger>,
	clock: Arc<dyn Clock>,
	config: ReloadConfig,
}

impl LiveLimitsBuilder {
	pub fn new() -> Self {
		Self {
			env_url: None,
			read_environment: false,
			local_file: None,
			resource_dir: None,
			fetcher: None,
			mapper: None,
			sink: None,
			logger: Arc::new(LogStatusLogger),
			clock: Arc::new(SystemClock),
			config: ReloadConfig::default(),
		}
	}

	/// Dynamic config URL, taking precedence over the environment and the
	/// local file.
	pub fn env_url(mut self, url: impl Into<String>) -> Self {
		self.env_url = Some(url.into());
		self
	}

	/// Reads the URL from `RateLimiterConfigUrl` when none was given.
	pub fn read_environment(mut self) -> Self {
		self.read_environment = true;
		self
	}

	pub fn local_file(mut self, file: SourcedText) -> Self {
		self.local_file = Some(file);
		self
	}

	/// Directory holding `RateLimiterConfig.yml`, used when no local file
	/// was given.
	pub fn resource_dir(mut self, dir: impl Into<PathBuf>) -> Self {
		self.resource_dir = Some(dir.into());
		self
	}

	pub fn fetcher(mut self, fetcher: Arc<dyn TextFetcher>) -> Self {
		self.fetcher = Some(fetcher);
		self
	}

	pub fn mapper(mut self, mapper: Arc<dyn SnapshotMapper>) -> Self {
		self.mapper = Some(mapper);
		self
	}

	pub fn sink(mut self, sink: Arc<dyn FactorySink>) -> Self {
		self.sink = Some(sink);
		self
	}

	pub fn logger(mut self, logger: Arc<dyn StatusLogger>) -> Self {
		self.logger = logger;
		self
	}

	pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
		self.clock = clock;
		self
	}

	pub fn config(mut self, config: ReloadConfig) -> Self {
		self.config = config;
		self
	}

	/// Resolves the bootstrap decision and starts polling if it enables
	/// dynamic updates. Polling without a Tokio runtime is a builder error.
	pub async fn build(self) -> Result<LiveLimits, LiveError> {
		let mapper = self
			.mapper
			.ok_or_else(|| LiveError::Builder("mapper is required".to_string()))?;
		let sink = self
			.sink
			.ok_or_else(|| LiveError::Builder("sink is required".to_string()))?;

		let env_url = match self.env_url {
			Some(url) => bootstrap::normalize_to_none(Some(url.as_str())),
			None if self.read_environment => bootstrap::dynamic_url_from_env(),
			None => None,
		};
		let local_file = match (self.local_file, self.resource_dir) {
			(Some(file), _) => Some(file),
			(None, Some(dir)) => LocalResource::new(dir).load().await?,
			(None, None) => None,
		};

		let decision = bootstrap::resolve(env_url.as_deref(), local_file.as_ref(), self.clock.as_ref());

		let fetcher = match decision.dynamic_update_url.as_deref() {
			Some(url) => Some(select_fetcher(self.fetcher, url)?),
			None => None,
		};

		let collaborators = Collaborators::new(mapper, sink)
			.with_logger(self.logger)
			.with_clock(self.clock);
		let reload = HotReloadLoop::new(
			fetcher,
			decision.dynamic_update_url.clone(),
			Arc::clone(&decision.initial_snapshot),
			collaborators,
			self.config,
		)
		.map_err(|e| LiveError::Builder(e.to_string()))?;

		Ok(LiveLimits { decision, reload })
	}
}

impl Default for LiveLimitsBuilder {
	fn default() -> Self {
		Self::new()
	}
}

#[cfg(feature = "http")]
fn select_fetcher(explicit: Option<Arc<dyn TextFetcher>>, url: &str) -> Result<Arc<dyn TextFetcher>, LiveError> {
	Ok(explicit.unwrap_or_else(|| Arc::new(crate::reload::HttpFetcher::new(url))))
}

#[cfg(not(feature = "http"))]
fn select_fetcher(explicit: Option<Arc<dyn TextFetcher>>, url: &str) -> Result<Arc<dyn TextFetcher>, LiveError> {
	explicit.ok_or_else(|| LiveError::Builder(format!("fetcher is required to poll {url}")))
}

impl LiveLimits {
	pub fn builder() -> LiveLimitsBuilder {
		LiveLimitsBuilder::new()
	}

	pub fn decision(&self) -> &BootstrapDecision {
		&self.decision
	}

	/// The snapshot currently in effect.
	pub fn current(&self) -> Arc<ConfigSnapshot> {
		self.reload.current()
	}

	pub fn is_rate_limiting_enabled(&self) -> bool {
		self.reload.current().is_rate_limiting_enabled()
	}

	/// Returns true if the background poller is running.
	pub fn is_polling(&self) -> bool {
		self.reload.is_running()
	}

	/// Stops polling. Safe to call more than once.
	pub async fn shutdown(&self) {
		self.reload.shutdown().await;
	}
}

impl std::fmt::Debug for LiveLimits {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		let mut s = f.debug_struct("LiveLimits");
		s.field("dynamic_update_url", &self.decision.dynamic_update_url);
		s.field("reload", &self.reload);
		s.finish_non_exhaustive()
	}
}
