/* src/controller/error.rs */

use thiserror::Error;

/// Errors raised while composing a [`LiveLimits`](super::LiveLimits).
#[derive(Debug, Error)]
pub enum LiveError {
	#[error("IO error reading local resource: {0}")]
	Io(#[from] std::io::Error),

	#[error("Builder error: {0}")]
	Builder(String),
}
