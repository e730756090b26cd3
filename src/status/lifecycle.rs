/* src/status/lifecycle.rs */

use serde::Serialize;

/// Where a configuration or its refresh mechanism stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LifecycleState {
	#[default]
	Disabled,
	Pending,
	Active,
	Error,
}

/// A state, when it was entered, and the failure behind it if any.
///
/// Built only through the constructors so that `error` is set exactly when
/// `state` is [`LifecycleState::Error`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LifecycleStatus {
	state: LifecycleState,
	as_of: u64,
	#[serde(skip_serializing_if = "Option::is_none")]
	error: Option<String>,
}

impl LifecycleStatus {
	/// A non-error state. Passing [`LifecycleState::Error`] records an
	/// unspecified failure.
	pub fn new(state: LifecycleState, as_of: u64) -> Self {
		let error = (state == LifecycleState::Error).then(|| "unknown error".to_string());
		Self { state, as_of, error }
	}

	pub fn disabled(as_of: u64) -> Self {
		Self::new(LifecycleState::Disabled, as_of)
	}

	pub fn pending(as_of: u64) -> Self {
		Self::new(LifecycleState::Pending, as_of)
	}

	pub fn active(as_of: u64) -> Self {
		Self::new(LifecycleState::Active, as_of)
	}

	pub fn failed(message: impl Into<String>, as_of: u64) -> Self {
		Self {
			state: LifecycleState::Error,
			as_of,
			error: Some(message.into()),
		}
	}

	pub fn state(&self) -> LifecycleState {
		self.state
	}

	pub fn as_of(&self) -> u64 {
		self.as_of
	}

	pub fn error(&self) -> Option<&str> {
		self.error.as_deref()
	}

	/// Same status, moved forward to `min_as_of` if it is older.
	pub(crate) fn not_before(&self, min_as_of: u64) -> Self {
		Self {
			as_of: self.as_of.max(min_as_of),
			..self.clone()
		}
	}
}
