/* demos/basic.rs */

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use ratelimit_live::binder::RateLimitDocument;
use ratelimit_live::bootstrap::SourcedText;
use ratelimit_live::clock::{Clock, SystemClock};
use ratelimit_live::controller::LiveLimits;
use ratelimit_live::reload::{FactorySink, FetchError, MappingError, ReloadConfig, SnapshotMapper, TextFetcher};
use ratelimit_live::status::{ConfigSnapshot, LimiterFactories};

/// Serves a file on disk as if it were the remote document.
struct FileFetcher(PathBuf);

#[async_trait]
impl TextFetcher for FileFetcher {
	async fn fetch_yaml(&self) -> Result<Option<String>, FetchError> {
		Ok(Some(tokio::fs::read_to_string(&self.0).await?))
	}
}

#[derive(Debug)]
struct NamedLimiters(Vec<String>);

impl LimiterFactories for NamedLimiters {
	fn is_active(&self) -> bool {
		!self.0.is_empty()
	}
}

struct NameMapper;

impl SnapshotMapper for NameMapper {
	fn map(
		&self,
		previous: &ConfigSnapshot,
		_url: &str,
		document: &RateLimitDocument,
	) -> Result<Option<ConfigSnapshot>, MappingError> {
		let mut names = Vec::new();
		for mapping in &document.limiter_mappings {
			let name = mapping
				.name
				.clone()
				.ok_or_else(|| MappingError::new("every limiter mapping needs a name"))?;
			names.push(name);
		}
		Ok(Some(previous.activated(Arc::new(NamedLimiters(names)), SystemClock.now_millis())))
	}
}

struct PrintSink;

impl FactorySink for PrintSink {
	fn start_background_processing(&self) {
		println!("sink: background processing started");
	}

	fn update(&self, snapshot: &Arc<ConfigSnapshot>) {
		println!("sink: {:?}", snapshot.factories());
	}

	fn shutdown_background_processing(&self) {
		println!("sink: background processing stopped");
	}
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
	let remote = "example_limits.yml";
	std::fs::write(
		remote,
		"limiterMappings:\n  - name: Info\n    global: 10r/s\n    pathSelectors:\n      - equals:/info\n",
	)?;

	let live = LiveLimits::builder()
		.local_file(SourcedText::new(
			"dynamicConfigUrl: https://config.example.com/limits.yml\n",
			"demo resource",
		))
		.fetcher(Arc::new(FileFetcher(PathBuf::from(remote))))
		.mapper(Arc::new(NameMapper))
		.sink(Arc::new(PrintSink))
		.config(ReloadConfig {
			poll_interval: Duration::from_secs(3),
			initial_delay: Duration::from_millis(200),
		})
		.build()
		.await?;

	println!("Initial status: {}", live.current().status_json());
	println!("Edit {} to see updates. Waiting 15 seconds...", remote);

	for _ in 0..5 {
		tokio::time::sleep(Duration::from_secs(3)).await;
		println!("Current status: {}", live.current().status_json());
	}

	live.shutdown().await;
	std::fs::remove_file(remote)?;
	println!("Done.");
	Ok(())
}
