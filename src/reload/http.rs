/* src/reload/http.rs */

use async_trait::async_trait;

use super::{FetchError, TextFetcher};

/// Fetches the configuration document with an HTTP GET.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
	client: reqwest::Client,
	url: String,
}

impl HttpFetcher {
	pub fn new(url: impl Into<String>) -> Self {
		Self::with_client(reqwest::Client::new(), url)
	}

	pub fn with_client(client: reqwest::Client, url: impl Into<String>) -> Self {
		Self {
			client,
			url: url.into(),
		}
	}

	pub fn url(&self) -> &str {
		&self.url
	}
}

impl From<reqwest::Error> for FetchError {
	fn from(e: reqwest::Error) -> Self {
		match e.status() {
			Some(status) => FetchError::Status(status.as_u16()),
			None => FetchError::Transport(e.to_string()),
		}
	}
}

#[async_trait]
impl TextFetcher for HttpFetcher {
	async fn fetch_yaml(&self) -> Result<Option<String>, FetchError> {
		let response = self.client.get(&self.url).send().await?.error_for_status()?;
		Ok(Some(response.text().await?))
	}
}
