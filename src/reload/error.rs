/* src/reload/error.rs */

use std::fmt;

use crate::binder::ConfigParseError;

/// Transport-level failure reaching the dynamic source.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
	#[error("io error: {0}")]
	Io(#[from] std::io::Error),

	#[error("unexpected HTTP status {0}")]
	Status(u16),

	#[error("transport error: {0}")]
	Transport(String),
}

/// Why fetched text was rejected before parsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmptyReason {
	/// The fetcher returned no text at all.
	Null,
	/// The text was whitespace only.
	Empty,
	/// Nothing remained after removing placeholder documents.
	NoData,
}

impl EmptyReason {
	pub fn as_str(self) -> &'static str {
		match self {
			EmptyReason::Null => "null",
			EmptyReason::Empty => "empty",
			EmptyReason::NoData => "no data",
		}
	}
}

impl fmt::Display for EmptyReason {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// A parsed document could not be turned into limiter factories.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unacceptable/incompatible limiter mappings: {message}")]
pub struct MappingError {
	pub message: String,
}

impl MappingError {
	pub fn new(message: impl Into<String>) -> Self {
		Self {
			message: message.into(),
		}
	}
}

/// Failure of one reload cycle. All variants are recoverable.
#[derive(Debug, thiserror::Error)]
pub enum ReloadError {
	#[error("Fetch Failed: {0}")]
	FetchFailed(#[source] FetchError),

	#[error("{reason}")]
	EmptyResult {
		reason: EmptyReason,
		raw_text: Option<String>,
	},

	#[error(transparent)]
	Parse(#[from] ConfigParseError),

	#[error(transparent)]
	Mapping(#[from] MappingError),

	#[error("reload cycle panicked: {0}")]
	Panicked(String),

	#[error("no Tokio runtime to run the polling task: {0}")]
	NoRuntime(#[from] tokio::runtime::TryCurrentError),
}

impl ReloadError {
	pub(crate) fn empty(reason: EmptyReason, raw_text: Option<&str>) -> Self {
		ReloadError::EmptyResult {
			reason,
			raw_text: raw_text.map(str::to_string),
		}
	}
}
