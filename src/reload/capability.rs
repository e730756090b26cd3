/* src/reload/capability.rs */

use async_trait::async_trait;

use super::{FetchError, MappingError};
use crate::binder::RateLimitDocument;
use crate::status::ConfigSnapshot;

/// Retrieves the remote configuration text.
#[async_trait]
pub trait TextFetcher: Send + Sync {
	/// `Ok(None)` means the source answered without a document.
	async fn fetch_yaml(&self) -> Result<Option<String>, FetchError>;
}

/// Observability sink for the reload loop. Calls must return promptly.
pub trait StatusLogger: Send + Sync {
	fn log_update(&self, message: &str);

	fn log_unhandled_error(&self, error: &(dyn std::error::Error + 'static));
}

/// Turns a parsed document into a snapshot with working factories.
pub trait SnapshotMapper: Send + Sync {
	/// Returns `Ok(None)` when the document brings no material change.
	fn map(
		&self,
		previous: &ConfigSnapshot,
		url: &str,
		document: &RateLimitDocument,
	) -> Result<Option<ConfigSnapshot>, MappingError>;
}

/// Receives every published snapshot.
pub trait FactorySink: Send + Sync {
	fn start_background_processing(&self);

	fn update(&self, snapshot: &std::sync::Arc<ConfigSnapshot>);

	fn shutdown_background_processing(&self);
}

/// [`StatusLogger`] backed by the `log` facade.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogStatusLogger;

impl StatusLogger for LogStatusLogger {
	fn log_update(&self, message: &str) {
		log::info!("{}", message);
	}

	fn log_unhandled_error(&self, error: &(dyn std::error::Error + 'static)) {
		log::error!("Unhandled error in rate limiting config loader: {}", error);
	}
}
