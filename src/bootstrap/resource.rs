/* src/bootstrap/resource.rs */

use std::io;
use std::path::{Path, PathBuf};

use tokio::fs;

use super::LOCAL_RESOURCE_CONFIG_FILE;
use crate::binder::remove_leading_empty_documents;

/// Text plus a description of where it was read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourcedText {
	pub body: String,
	pub source: String,
}

impl SourcedText {
	pub fn new(body: impl Into<String>, source: impl Into<String>) -> Self {
		Self {
			body: body.into(),
			source: source.into(),
		}
	}
}

/// The packaged configuration file, looked up under a resource directory.
#[derive(Debug, Clone)]
pub struct LocalResource {
	root: PathBuf,
}

impl LocalResource {
	pub fn new(root: impl Into<PathBuf>) -> Self {
		Self { root: root.into() }
	}

	pub fn path(&self) -> PathBuf {
		self.root.join(LOCAL_RESOURCE_CONFIG_FILE)
	}

	/// Reads the resource file.
	///
	/// A missing file, or one holding only placeholder documents, is absent.
	/// The returned body has leading placeholder documents removed.
	pub async fn load(&self) -> io::Result<Option<SourcedText>> {
		read_normalized(&self.path()).await.map(|body| {
			body.map(|body| SourcedText::new(body, format!("resource file(/{LOCAL_RESOURCE_CONFIG_FILE})")))
		})
	}
}

async fn read_normalized(path: &Path) -> io::Result<Option<String>> {
	let text = match fs::read_to_string(path).await {
		Ok(text) => text,
		Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
		Err(e) => return Err(e),
	};
	let body = remove_leading_empty_documents(&text);
	Ok((!body.is_empty()).then(|| body.to_string()))
}
