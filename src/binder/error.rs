/* src/binder/error.rs */

/// A document was present but could not be bound onto the target schema.
///
/// At bootstrap this is recorded in the initial snapshot; during reload it
/// degrades the update status of the current snapshot.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{source_label}: {message}")]
pub struct ConfigParseError {
	/// Where the document came from (a resource description or a URL).
	pub source_label: String,
	/// The text that failed to bind, when available.
	pub raw_text: Option<String>,
	/// The parser's message with internal type paths shortened.
	pub message: String,
}
