/* tests/common/mod.rs */

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use ratelimit_live::binder::RateLimitDocument;
use ratelimit_live::clock::Clock;
use ratelimit_live::reload::{
	Collaborators, FactorySink, FetchError, MappingError, SnapshotMapper, StatusLogger, TextFetcher,
};
use ratelimit_live::status::{ConfigSnapshot, LimiterFactories};

pub const URL: &str = "https://config.example.com/limits.yml";

pub const VALID_YAML: &str = "\
loggingOption: AllCalls
credentialID: 'JWT:Claims+\"email\"'
limiterMappings:
  - name: Info
    global: 50r/s
    pathSelectors:
      - equals:/info
";

#[derive(Debug, Default)]
pub struct ManualClock(AtomicU64);

impl ManualClock {
	pub fn at(millis: u64) -> Arc<Self> {
		Arc::new(Self(AtomicU64::new(millis)))
	}

	pub fn set(&self, millis: u64) {
		self.0.store(millis, Ordering::SeqCst);
	}
}

impl Clock for ManualClock {
	fn now_millis(&self) -> u64 {
		self.0.load(Ordering::SeqCst)
	}
}

pub enum Step {
	Text(&'static str),
	Nothing,
	Fail,
}

/// Plays back a script of responses; the last one repeats.
pub struct ScriptedFetcher {
	steps: Mutex<VecDeque<Step>>,
	calls: AtomicUsize,
}

impl ScriptedFetcher {
	pub fn new(steps: Vec<Step>) -> Arc<Self> {
		Arc::new(Self {
			steps: Mutex::new(steps.into()),
			calls: AtomicUsize::new(0),
		})
	}

	pub fn calls(&self) -> usize {
		self.calls.load(Ordering::SeqCst)
	}
}

#[async_trait]
impl TextFetcher for ScriptedFetcher {
	async fn fetch_yaml(&self) -> Result<Option<String>, FetchError> {
		self.calls.fetch_add(1, Ordering::SeqCst);
		let mut steps = self.steps.lock().unwrap();
		let step = if steps.len() > 1 {
			steps.pop_front()
		} else {
			None
		};
		let current = step.as_ref().or_else(|| steps.front());
		match current {
			Some(Step::Text(text)) => Ok(Some(text.to_string())),
			Some(Step::Nothing) | None => Ok(None),
			Some(Step::Fail) => Err(FetchError::Io(std::io::Error::new(
				std::io::ErrorKind::ConnectionRefused,
				"connection refused",
			))),
		}
	}
}

#[derive(Debug)]
pub struct TestFactories {
	pub document: RateLimitDocument,
}

impl LimiterFactories for TestFactories {
	fn is_active(&self) -> bool {
		!self.document.limiter_mappings.is_empty()
	}
}

/// Activates every document; rejects mappings named `bad`, panics on `panic`.
pub struct TestMapper {
	pub clock: Arc<ManualClock>,
	pub unchanged: bool,
}

impl TestMapper {
	pub fn new(clock: Arc<ManualClock>) -> Arc<Self> {
		Arc::new(Self { clock, unchanged: false })
	}
}

impl SnapshotMapper for TestMapper {
	fn map(
		&self,
		previous: &ConfigSnapshot,
		_url: &str,
		document: &RateLimitDocument,
	) -> Result<Option<ConfigSnapshot>, MappingError> {
		for mapping in &document.limiter_mappings {
			match mapping.name.as_deref() {
				Some("bad") => return Err(MappingError::new("mapping 'bad' has no selectors")),
				Some("panic") => panic!("mapper exploded"),
				_ => {}
			}
		}
		if self.unchanged {
			return Ok(None);
		}
		let factories = Arc::new(TestFactories {
			document: document.clone(),
		});
		Ok(Some(previous.activated(factories, self.clock.now_millis())))
	}
}

#[derive(Default)]
pub struct RecordingSink {
	pub starts: AtomicUsize,
	pub shutdowns: AtomicUsize,
	pub updates: Mutex<Vec<Arc<ConfigSnapshot>>>,
}

impl RecordingSink {
	pub fn updates(&self) -> Vec<Arc<ConfigSnapshot>> {
		self.updates.lock().unwrap().clone()
	}

	pub fn starts(&self) -> usize {
		self.starts.load(Ordering::SeqCst)
	}

	pub fn shutdowns(&self) -> usize {
		self.shutdowns.load(Ordering::SeqCst)
	}
}

impl FactorySink for RecordingSink {
	fn start_background_processing(&self) {
		self.starts.fetch_add(1, Ordering::SeqCst);
	}

	fn update(&self, snapshot: &Arc<ConfigSnapshot>) {
		self.updates.lock().unwrap().push(Arc::clone(snapshot));
	}

	fn shutdown_background_processing(&self) {
		self.shutdowns.fetch_add(1, Ordering::SeqCst);
	}
}

#[derive(Default)]
pub struct RecordingLogger {
	pub messages: Mutex<Vec<String>>,
	pub errors: Mutex<Vec<String>>,
}

impl RecordingLogger {
	pub fn messages(&self) -> Vec<String> {
		self.messages.lock().unwrap().clone()
	}

	pub fn errors(&self) -> Vec<String> {
		self.errors.lock().unwrap().clone()
	}
}

impl StatusLogger for RecordingLogger {
	fn log_update(&self, message: &str) {
		self.messages.lock().unwrap().push(message.to_string());
	}

	fn log_unhandled_error(&self, error: &(dyn std::error::Error + 'static)) {
		self.errors.lock().unwrap().push(error.to_string());
	}
}

pub struct Harness {
	pub clock: Arc<ManualClock>,
	pub sink: Arc<RecordingSink>,
	pub logger: Arc<RecordingLogger>,
	pub collaborators: Collaborators,
}

impl Harness {
	pub fn new() -> Self {
		Self::with_mapper(TestMapper::new)
	}

	pub fn with_mapper(make: impl FnOnce(Arc<ManualClock>) -> Arc<TestMapper>) -> Self {
		let clock = ManualClock::at(1_000);
		let sink = Arc::new(RecordingSink::default());
		let logger = Arc::new(RecordingLogger::default());
		let collaborators = Collaborators::new(make(Arc::clone(&clock)), sink.clone())
			.with_logger(logger.clone())
			.with_clock(clock.clone());
		Self {
			clock,
			sink,
			logger,
			collaborators,
		}
	}
}
