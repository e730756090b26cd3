/* src/status/record.rs */

use serde::Serialize;

use super::LifecycleStatus;

/// Diagnostic status carried by every snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusRecord {
	/// Whether enforcement is using configuration.
	pub current: LifecycleStatus,
	/// Health of the refresh mechanism.
	pub update: LifecycleStatus,
	/// Where configuration came from; fixed at bootstrap.
	#[serde(rename = "fromSource")]
	pub source_label: String,
}

impl StatusRecord {
	pub fn new(current: LifecycleStatus, update: LifecycleStatus, source_label: impl Into<String>) -> Self {
		Self {
			current,
			update,
			source_label: source_label.into(),
		}
	}

	/// Same record with the update status replaced.
	pub fn with_update(&self, update: LifecycleStatus) -> Self {
		Self {
			current: self.current.clone(),
			update,
			source_label: self.source_label.clone(),
		}
	}

	/// Latest timestamp recorded in either status.
	pub fn latest_as_of(&self) -> u64 {
		self.current.as_of().max(self.update.as_of())
	}

	/// Renders the record as JSON for log lines and status endpoints.
	pub fn to_json(&self) -> String {
		serde_json::to_string(self).unwrap_or_else(|e| format!("{{\"error\":\"{e}\"}}"))
	}
}
