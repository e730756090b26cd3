/* src/binder/mod.rs */

//!
//! Binding of YAML text onto typed configuration documents.

mod document;
mod error;

pub use document::{BootstrapDocument, LimiterMapping, RateLimitDocument};
pub use error::ConfigParseError;

use std::marker::PhantomData;

use serde::de::DeserializeOwned;

const DOCUMENT_SEPARATOR: &str = "---";
const EMPTY_MAPPING: &str = "{}";

/// Strips placeholder documents (`---` optionally followed by `{}`) that some
/// templating pipelines emit ahead of the real payload.
///
/// Leading whitespace is removed along the way, so a document made only of
/// placeholders normalizes to the empty string.
pub fn remove_leading_empty_documents(text: &str) -> &str {
	let mut rest = text.trim_start();
	while let Some(after) = rest.strip_prefix(DOCUMENT_SEPARATOR) {
		rest = after.trim_start();
		if let Some(after) = rest.strip_prefix(EMPTY_MAPPING) {
			rest = after.trim_start();
		}
	}
	rest
}

/// Parses text into `T`, labelling failures with where the text came from.
pub struct YamlBinder<T> {
	source_label: String,
	_target: PhantomData<fn() -> T>,
}

impl<T> YamlBinder<T>
where
	T: DeserializeOwned,
{
	pub fn new(source_label: impl Into<String>) -> Self {
		Self {
			source_label: source_label.into(),
			_target: PhantomData,
		}
	}

	pub fn source_label(&self) -> &str {
		&self.source_label
	}

	/// Binds `text` onto `T`.
	///
	/// Absent or whitespace-only text is "no document" and yields `Ok(None)`.
	pub fn bind(&self, text: Option<&str>) -> Result<Option<T>, ConfigParseError> {
		let Some(text) = text else {
			return Ok(None);
		};
		if text.trim().is_empty() {
			return Ok(None);
		}
		serde_yaml::from_str::<T>(text)
			.map(Some)
			.map_err(|e| ConfigParseError {
				source_label: self.source_label.clone(),
				raw_text: Some(text.to_string()),
				message: shorten_type_names::<T>(&e.to_string()),
			})
	}
}

impl<T> std::fmt::Debug for YamlBinder<T> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("YamlBinder")
			.field("source_label", &self.source_label)
			.field("target", &std::any::type_name::<T>())
			.finish()
	}
}

fn shorten_type_names<T>(message: &str) -> String {
	let full = std::any::type_name::<T>();
	match full.rsplit("::").next() {
		Some(simple) if simple != full => message.replace(full, simple),
		_ => message.to_string(),
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn strips_placeholder_documents() {
		assert_eq!(
			remove_leading_empty_documents("---\n{}\n---\nreal: 1\n"),
			"real: 1\n"
		);
		assert_eq!(remove_leading_empty_documents("---\n{}\n"), "");
		assert_eq!(remove_leading_empty_documents("  \n---\n---\n"), "");
		assert_eq!(remove_leading_empty_documents("a: 1\n---\n"), "a: 1\n---\n");
	}

	#[test]
	fn shortens_qualified_type_names() {
		let full = std::any::type_name::<RateLimitDocument>();
		let msg = format!("expected {full} here");
		assert_eq!(
			shorten_type_names::<RateLimitDocument>(&msg),
			"expected RateLimitDocument here"
		);
	}

	#[test]
	fn absent_and_blank_text_is_no_document() {
		let binder = YamlBinder::<RateLimitDocument>::new("test");
		assert_eq!(binder.bind(None), Ok(None));
		assert_eq!(binder.bind(Some("  \n\t")), Ok(None));
	}
}
