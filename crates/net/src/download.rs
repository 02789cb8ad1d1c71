use anyhow::Context;
use reqwest::{IntoUrl, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// Re-export of reqwest::Client for users of this download module
pub use reqwest::Client;

/// Errors for requests that reached the server but were refused
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
	/// The server answered with a status outside of the 2xx range
	#[error("Request to {url} failed with status {status}")]
	RequestFailed {
		/// The URL that was requested
		url: String,
		/// The status the server responded with
		status: StatusCode,
	},
}

/// The envelope that the API wraps all of its GET responses in
#[derive(Deserialize, Serialize, Clone, Debug)]
pub struct ApiResponse<T> {
	/// The status code the API reports in the body
	#[serde(default)]
	pub status: u16,
	/// The actual payload
	pub data: T,
}

/// The default User-Agent header for requests
pub fn user_agent() -> String {
	let version = env!("CARGO_PKG_VERSION");
	format!("dsktcc_{version}")
}

/// Sends a GET request and makes sure the server reported success
pub async fn download(url: impl IntoUrl, client: &Client) -> anyhow::Result<reqwest::Response> {
	let resp = client
		.get(url)
		.send()
		.await
		.context("Failed to send request")?;

	let status = resp.status();
	if !status.is_success() {
		return Err(FetchError::RequestFailed {
			url: resp.url().to_string(),
			status,
		}
		.into());
	}

	Ok(resp)
}

/// Downloads and returns text
pub async fn text(url: impl IntoUrl, client: &Client) -> anyhow::Result<String> {
	let text = download(url, client)
		.await
		.context("Failed to download")?
		.text()
		.await
		.context("Failed to convert download to text")?;

	Ok(text)
}

/// Downloads and deserializes the contents into JSON
pub async fn json<T: DeserializeOwned>(url: impl IntoUrl, client: &Client) -> anyhow::Result<T> {
	download(url, client)
		.await
		.context("Failed to download JSON data")?
		.json()
		.await
		.context("Failed to parse JSON")
}

/// Downloads a JSON envelope and unwraps the data inside of it
pub async fn envelope<T: DeserializeOwned>(
	url: impl IntoUrl,
	client: &Client,
) -> anyhow::Result<T> {
	let response: ApiResponse<T> = json(url, client).await?;
	Ok(response.data)
}

/// Sends a PUT request with no body. The status of the response is not checked
pub async fn put(url: impl IntoUrl, client: &Client) -> anyhow::Result<reqwest::Response> {
	client
		.put(url)
		.send()
		.await
		.context("Failed to send request")
}

/// Sends a PUT request and deserializes the response body, whatever its status
pub async fn put_json<T: DeserializeOwned>(
	url: impl IntoUrl,
	client: &Client,
) -> anyhow::Result<T> {
	put(url, client)
		.await?
		.json()
		.await
		.context("Failed to parse JSON")
}

/// Validates a URL with a helpful error message
pub fn validate_url(url: &str) -> anyhow::Result<()> {
	Url::parse(url).context(
		"It may help to make sure that either http:// or https:// is before the domain name",
	)?;

	Ok(())
}
