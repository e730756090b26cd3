/* src/bootstrap/mod.rs */

//!
//! One-time resolution of where configuration comes from and the state
//! enforcement starts in.

mod resource;

pub use resource::{LocalResource, SourcedText};

use std::sync::Arc;

use crate::binder::{BootstrapDocument, ConfigParseError, YamlBinder};
use crate::clock::Clock;
use crate::status::{ConfigSnapshot, LifecycleStatus, NoopFactories, StatusRecord};

/// Environment variable naming the dynamic configuration URL.
pub const ENVIRONMENT_CONFIG_URL: &str = "RateLimiterConfigUrl";

/// File name of the packaged configuration resource.
pub const LOCAL_RESOURCE_CONFIG_FILE: &str = "RateLimiterConfig.yml";

/// Source label used when no local resource was loaded.
pub const BOOTSTRAP_SOURCE_LABEL: &str = "InitialConfig";

/// URL schemes accepted for dynamic updates, in the order they are checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UrlPrefix {
	Https,
	Http,
}

impl UrlPrefix {
	pub const ALL: [UrlPrefix; 2] = [UrlPrefix::Https, UrlPrefix::Http];

	pub fn as_prefix(self) -> &'static str {
		match self {
			UrlPrefix::Https => "https://",
			UrlPrefix::Http => "http://",
		}
	}

	/// Case-sensitive scheme check.
	pub fn is_acceptable(url: &str) -> bool {
		Self::ALL.iter().any(|p| url.starts_with(p.as_prefix()))
	}
}

/// The outcome of bootstrap resolution. Produced once, never changed.
#[derive(Debug, Clone)]
pub struct BootstrapDecision {
	/// Failure to parse the local resource, if any.
	pub initial_error: Option<ConfigParseError>,
	/// The accepted URL to poll, if dynamic updates are enabled.
	pub dynamic_update_url: Option<String>,
	/// The parsed local resource, if it bound successfully.
	pub local_document: Option<BootstrapDocument>,
	pub initial_snapshot: Arc<ConfigSnapshot>,
}

impl BootstrapDecision {
	pub fn is_rate_limiting_enabled(&self) -> bool {
		self.initial_snapshot.is_rate_limiting_enabled()
	}
}

/// Trims a value, treating empty as absent.
pub fn normalize_to_none(value: Option<&str>) -> Option<String> {
	value.map(str::trim).filter(|v| !v.is_empty()).map(str::to_string)
}

/// Reads [`ENVIRONMENT_CONFIG_URL`] from the process environment.
pub fn dynamic_url_from_env() -> Option<String> {
	normalize_to_none(std::env::var(ENVIRONMENT_CONFIG_URL).ok().as_deref())
}

/// Decides whether dynamic configuration is enabled, from where, and the
/// initial snapshot.
///
/// The environment URL takes precedence over a `dynamicConfigUrl` declared in
/// the local file. Failures are recorded in the decision, never returned.
pub fn resolve(env_url: Option<&str>, local_file: Option<&SourcedText>, clock: &dyn Clock) -> BootstrapDecision {
	let now = clock.now_millis();

	if env_url.is_none() && local_file.is_none() {
		return BootstrapDecision {
			initial_error: None,
			dynamic_update_url: None,
			local_document: None,
			initial_snapshot: Arc::new(ConfigSnapshot::disabled(BOOTSTRAP_SOURCE_LABEL, now)),
		};
	}

	let mut url = env_url.map(str::to_string);
	let mut initial_error = None;
	let mut local_document = None;
	let mut current = LifecycleStatus::disabled(now);
	let mut update = LifecycleStatus::disabled(now);
	let mut source_label = BOOTSTRAP_SOURCE_LABEL.to_string();

	if let Some(file) = local_file {
		source_label = file.source.clone();
		let binder = YamlBinder::<BootstrapDocument>::new(file.source.as_str());
		match binder.bind(Some(file.body.as_str())) {
			Ok(document) => {
				let document = document.unwrap_or_default();
				if url.is_none() {
					url = document.dynamic_config_url.clone();
				}
				local_document = Some(document);
				current = LifecycleStatus::pending(now);
			}
			Err(e) => {
				log::warn!("Unable to parse {}", e);
				current = LifecycleStatus::failed(e.to_string(), now);
				initial_error = Some(e);
			}
		}
	}

	let mut dynamic_update_url = None;
	if let Some(candidate) = url {
		let candidate = candidate.trim();
		if UrlPrefix::is_acceptable(candidate) {
			dynamic_update_url = Some(candidate.to_string());
			// A local file that failed to parse stays reported on `current`.
			if initial_error.is_none() {
				current = LifecycleStatus::pending(now);
			}
			update = LifecycleStatus::pending(now);
		} else {
			// Discarded without a status error; kept visible in the log only.
			log::debug!("Ignoring dynamic config url without http(s) scheme: {candidate:?}");
		}
	}

	let initial_snapshot = Arc::new(ConfigSnapshot::new(
		Arc::new(NoopFactories),
		StatusRecord::new(current, update, source_label),
	));

	BootstrapDecision {
		initial_error,
		dynamic_update_url,
		local_document,
		initial_snapshot,
	}
}
