/* src/binder/document.rs */

use serde::{Deserialize, Serialize};

/// The rate-limiting configuration document served by the dynamic source.
///
/// Only the shape is checked here; the meaning of each field belongs to the
/// mapper that turns a document into limiter factories.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields, default)]
pub struct RateLimitDocument {
	#[serde(skip_serializing_if = "Option::is_none")]
	pub logging_option: Option<String>,
	#[serde(rename = "credentialID", skip_serializing_if = "Option::is_none")]
	pub credential_id: Option<String>,
	#[serde(skip_serializing_if = "Vec::is_empty")]
	pub limiter_mappings: Vec<LimiterMapping>,
}

/// One named limiter and the request paths it applies to.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields, default)]
pub struct LimiterMapping {
	#[serde(skip_serializing_if = "Option::is_none")]
	pub name: Option<String>,
	#[serde(rename = "withCallerCredentialsID", skip_serializing_if = "Option::is_none")]
	pub with_caller_credentials_id: Option<String>,
	#[serde(rename = "withCallerRemoteAddressID", skip_serializing_if = "Option::is_none")]
	pub with_caller_remote_address_id: Option<String>,
	#[serde(rename = "withoutCallerID", skip_serializing_if = "Option::is_none")]
	pub without_caller_id: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub global: Option<String>,
	#[serde(skip_serializing_if = "Vec::is_empty")]
	pub path_selectors: Vec<String>,
}

/// The packaged local document: the base schema plus the URL to poll.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields, default)]
pub struct BootstrapDocument {
	#[serde(skip_serializing_if = "Option::is_none")]
	pub logging_option: Option<String>,
	#[serde(rename = "credentialID", skip_serializing_if = "Option::is_none")]
	pub credential_id: Option<String>,
	#[serde(skip_serializing_if = "Vec::is_empty")]
	pub limiter_mappings: Vec<LimiterMapping>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub dynamic_config_url: Option<String>,
}

impl BootstrapDocument {
	/// Drops the bootstrap-only field.
	pub fn into_base(self) -> RateLimitDocument {
		RateLimitDocument {
			logging_option: self.logging_option,
			credential_id: self.credential_id,
			limiter_mappings: self.limiter_mappings,
		}
	}
}
