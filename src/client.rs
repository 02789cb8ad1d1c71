use anyhow::Context;
use reqwest::Client;

use crate::config::Configuration;
use crate::net::download::validate_url;
use crate::net::mods::{self, Counter, Mod, ModStats, ModsQuery};
use crate::rate_limit::RateLimitResult;
use crate::shared::output::{MessageContents, MessageLevel, ModsOutput};

/// Client for the mod listing service.
///
/// Every call is its own round trip. Nothing is cached between calls and the
/// client holds no mutable state, so it can be cloned and shared between tasks freely.
#[derive(Clone)]
pub struct ModsClient {
	client: Client,
	config: Configuration,
}

impl ModsClient {
	/// Create a new client with the given configuration
	pub fn new(config: Configuration) -> anyhow::Result<Self> {
		validate_url(&config.api_url).context("API URL is invalid")?;
		let client = Client::builder()
			.user_agent(config.user_agent.clone())
			.build()
			.context("Failed to create HTTP client")?;

		Ok(Self { client, config })
	}

	/// List the mods matching a query
	pub async fn fetch_mods(&self, query: &ModsQuery) -> anyhow::Result<Vec<Mod>> {
		mods::get_mods(query, &self.config.api_url, &self.client).await
	}

	/// List the featured mods
	pub async fn fetch_featured_mods(&self) -> anyhow::Result<Vec<Mod>> {
		mods::get_featured_mods(&self.config.api_url, &self.client).await
	}

	/// Get a single mod by name
	pub async fn fetch_mod_by_name(&self, name: &str) -> anyhow::Result<Mod> {
		mods::get_mod(name, &self.config.api_url, &self.client).await
	}

	/// Get the raw response for a single mod, envelope included
	pub async fn fetch_mod_raw(&self, name: &str) -> anyhow::Result<String> {
		mods::get_mod_raw(name, &self.config.api_url, &self.client).await
	}

	/// Get the view and download counts of all mods
	pub async fn fetch_mod_stats(&self) -> anyhow::Result<Vec<ModStats>> {
		mods::get_mod_stats(&self.config.api_url, &self.client).await
	}

	/// Count a view of a mod. Never fails; errors are sent to the output
	/// and reported as an unsuccessful result
	pub async fn increment_mod_views(
		&self,
		name: &str,
		o: &mut impl ModsOutput,
	) -> RateLimitResult {
		self.increment(name, Counter::View, o).await
	}

	/// Count a download of a mod. Never fails; errors are sent to the output
	/// and reported as an unsuccessful result
	pub async fn increment_mod_downloads(
		&self,
		name: &str,
		o: &mut impl ModsOutput,
	) -> RateLimitResult {
		self.increment(name, Counter::Download, o).await
	}

	async fn increment(
		&self,
		name: &str,
		counter: Counter,
		o: &mut impl ModsOutput,
	) -> RateLimitResult {
		o.display(
			MessageContents::StartProcess(format!("Incrementing {counter} of mod '{name}'")),
			MessageLevel::Trace,
		);

		match mods::put_counter(name, counter, &self.config.api_url, &self.client).await {
			Ok(response) => RateLimitResult::from_response(&response),
			Err(e) => {
				o.display(
					MessageContents::Error(format!("Error incrementing {counter}: {e:?}")),
					MessageLevel::Important,
				);
				RateLimitResult::failed()
			}
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	use serde_json::json;
	use wiremock::matchers::{method, path, query_param};
	use wiremock::{Mock, MockServer, ResponseTemplate};

	use crate::net::download::FetchError;
	use crate::shared::output::{Collect, NoOp};

	fn test_client(server: &MockServer) -> ModsClient {
		let config = Configuration::builder().api_url(server.uri()).build();
		ModsClient::new(config).expect("Client should be created")
	}

	fn envelope(data: serde_json::Value) -> ResponseTemplate {
		ResponseTemplate::new(200).set_body_json(json!({"status": 200, "data": data}))
	}

	#[tokio::test]
	async fn test_fetch_mods_returns_data() -> anyhow::Result<()> {
		let server = MockServer::start().await;
		let data = json!([
			{"name": "foo", "type": "texture", "downloads": 5},
			{"name": "bar", "category": "ui"},
		]);
		Mock::given(method("GET"))
			.and(path("/mods"))
			.and(query_param("search", "foo"))
			.and(query_param("category", "bar"))
			.respond_with(envelope(data.clone()))
			.expect(1)
			.mount(&server)
			.await;

		let client = test_client(&server);
		let query = ModsQuery::new().search("foo").category("bar");
		let out = client.fetch_mods(&query).await?;
		assert_eq!(serde_json::to_value(&out)?, data);

		let requests = server.received_requests().await.unwrap_or_default();
		assert_eq!(requests.len(), 1);
		assert_eq!(requests[0].url.query(), Some("search=foo&category=bar"));

		Ok(())
	}

	#[tokio::test]
	async fn test_fetch_single_endpoints() -> anyhow::Result<()> {
		let server = MockServer::start().await;
		Mock::given(method("GET"))
			.and(path("/mods/featured"))
			.respond_with(envelope(json!([{"name": "featured"}])))
			.mount(&server)
			.await;
		Mock::given(method("GET"))
			.and(path("/mod/foo"))
			.respond_with(envelope(json!({"name": "foo", "author": "someone"})))
			.mount(&server)
			.await;
		Mock::given(method("GET"))
			.and(path("/mods/stats"))
			.respond_with(envelope(json!([
				{"_id": "1", "name": "foo", "downloads": 12, "views": 40}
			])))
			.mount(&server)
			.await;

		let client = test_client(&server);

		let featured = client.fetch_featured_mods().await?;
		assert_eq!(featured.len(), 1);
		assert_eq!(featured[0].name, "featured");

		let foo = client.fetch_mod_by_name("foo").await?;
		assert_eq!(foo.name, "foo");
		assert_eq!(foo.metadata.get("author"), Some(&json!("someone")));

		let raw = client.fetch_mod_raw("foo").await?;
		let raw: serde_json::Value = serde_json::from_str(&raw)?;
		assert_eq!(raw["data"]["name"], json!("foo"));

		let stats = client.fetch_mod_stats().await?;
		assert_eq!(
			stats,
			vec![ModStats {
				id: "1".into(),
				name: "foo".into(),
				downloads: 12,
				views: 40,
			}]
		);

		Ok(())
	}

	#[tokio::test]
	async fn test_fetch_failed_status() {
		let server = MockServer::start().await;
		Mock::given(method("GET"))
			.and(path("/mod/missing"))
			.respond_with(
				ResponseTemplate::new(503).set_body_json(json!({"status": 200, "data": {"name": "x"}})),
			)
			.mount(&server)
			.await;

		let client = test_client(&server);
		let err = client
			.fetch_mod_by_name("missing")
			.await
			.expect_err("Fetch should fail");
		assert!(matches!(
			err.downcast_ref::<FetchError>(),
			Some(FetchError::RequestFailed { status, .. }) if status.as_u16() == 503
		));
	}

	#[tokio::test]
	async fn test_fetch_malformed_json() {
		let server = MockServer::start().await;
		Mock::given(method("GET"))
			.and(path("/mods/featured"))
			.respond_with(ResponseTemplate::new(200).set_body_string("not json"))
			.mount(&server)
			.await;

		let client = test_client(&server);
		assert!(client.fetch_featured_mods().await.is_err());
	}

	#[tokio::test]
	async fn test_increment_rate_limited() {
		let server = MockServer::start().await;
		Mock::given(method("PUT"))
			.and(path("/mod/foo/view"))
			.respond_with(
				ResponseTemplate::new(200)
					.set_body_json(json!({"status": 429, "remainingTime": 7_200_000})),
			)
			.mount(&server)
			.await;

		let client = test_client(&server);
		let result = client.increment_mod_views("foo", &mut NoOp).await;
		assert_eq!(
			result,
			RateLimitResult {
				success: false,
				remaining_time: Some(2)
			}
		);
	}

	#[tokio::test]
	async fn test_increment_ignores_http_status() {
		let server = MockServer::start().await;
		Mock::given(method("PUT"))
			.and(path("/mod/foo/download"))
			.respond_with(ResponseTemplate::new(500).set_body_json(json!({})))
			.expect(1)
			.mount(&server)
			.await;

		let client = test_client(&server);
		let result = client.increment_mod_downloads("foo", &mut NoOp).await;
		assert_eq!(result, RateLimitResult::succeeded());
	}

	#[tokio::test]
	async fn test_increment_swallows_errors() {
		let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("Failed to bind");
		let addr = listener.local_addr().expect("Failed to get address");
		// Nothing listens on the port once the listener is gone
		drop(listener);
		let config = Configuration::builder()
			.api_url(format!("http://{addr}"))
			.build();
		let client = ModsClient::new(config).expect("Client should be created");

		let mut o = Collect::default();
		let result = client.increment_mod_views("foo", &mut o).await;
		assert_eq!(result, RateLimitResult::failed());
		assert_eq!(
			serde_json::to_value(result).expect("Should serialize"),
			json!({"success": false})
		);
		assert!(o
			.messages
			.iter()
			.any(|(text, level)| text.starts_with("Error: Error incrementing views")
				&& *level == MessageLevel::Important));
	}

	#[tokio::test]
	async fn test_increment_malformed_body() {
		let server = MockServer::start().await;
		Mock::given(method("PUT"))
			.respond_with(ResponseTemplate::new(200).set_body_string("<html></html>"))
			.mount(&server)
			.await;

		let client = test_client(&server);
		let mut o = Collect::default();
		let result = client.increment_mod_downloads("foo", &mut o).await;
		assert_eq!(result, RateLimitResult::failed());
		assert!(o
			.messages
			.iter()
			.any(|(text, _)| text.contains("Error incrementing downloads")));
	}

	#[tokio::test]
	async fn test_concurrent_calls() -> anyhow::Result<()> {
		let server = MockServer::start().await;
		for name in ["a", "b", "c"] {
			Mock::given(method("GET"))
				.and(path(format!("/mod/{name}")))
				.respond_with(envelope(json!({ "name": name })))
				.mount(&server)
				.await;
		}

		let client = test_client(&server);
		let (a, b, c) = tokio::join!(
			client.fetch_mod_by_name("a"),
			client.fetch_mod_by_name("b"),
			client.fetch_mod_by_name("c"),
		);
		assert_eq!(a?.name, "a");
		assert_eq!(b?.name, "b");
		assert_eq!(c?.name, "c");

		Ok(())
	}

	#[tokio::test]
	async fn test_increment_lenient_bodies() {
		let cases = [
			(json!({"status": "success"}), RateLimitResult::succeeded()),
			(
				json!({"status": 200, "remainingTime": "soon"}),
				RateLimitResult::succeeded(),
			),
			(json!({"status": -1}), RateLimitResult::succeeded()),
			(
				json!({"status": 429.0, "remainingTime": 7_200_000}),
				RateLimitResult {
					success: false,
					remaining_time: Some(2),
				},
			),
		];

		for (body, expected) in cases {
			let server = MockServer::start().await;
			Mock::given(method("PUT"))
				.and(path("/mod/foo/view"))
				.respond_with(ResponseTemplate::new(200).set_body_json(body.clone()))
				.mount(&server)
				.await;

			let client = test_client(&server);
			let mut o = Collect::default();
			let result = client.increment_mod_views("foo", &mut o).await;
			assert_eq!(result, expected, "Unexpected result for body {body}");
			assert!(
				o.messages.iter().all(|(_, level)| *level == MessageLevel::Trace),
				"Body {body} should not have been reported as an error"
			);
		}
	}

	#[tokio::test]
	async fn test_increment_downloads_rate_limited() {
		let server = MockServer::start().await;
		Mock::given(method("PUT"))
			.and(path("/mod/foo/download"))
			.respond_with(
				ResponseTemplate::new(429)
					.set_body_json(json!({"status": 429, "remainingTime": 3_600_001})),
			)
			.expect(1)
			.mount(&server)
			.await;

		let client = test_client(&server);
		let result = client.increment_mod_downloads("foo", &mut NoOp).await;
		assert_eq!(
			result,
			RateLimitResult {
				success: false,
				remaining_time: Some(2)
			}
		);
	}

	#[tokio::test]
	async fn test_increment_views_empty_body() {
		let server = MockServer::start().await;
		Mock::given(method("PUT"))
			.and(path("/mod/foo/view"))
			.respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
			.mount(&server)
			.await;

		let client = test_client(&server);
		let result = client.increment_mod_views("foo", &mut NoOp).await;
		assert_eq!(result, RateLimitResult::succeeded());
	}

	#[tokio::test]
	async fn test_concurrent_increments() {
		let server = MockServer::start().await;
		Mock::given(method("PUT"))
			.and(path("/mod/limited/view"))
			.respond_with(
				ResponseTemplate::new(200)
					.set_body_json(json!({"status": 429, "remainingTime": 7_200_000})),
			)
			.mount(&server)
			.await;
		Mock::given(method("PUT"))
			.and(path("/mod/open/download"))
			.respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
			.mount(&server)
			.await;

		let client = test_client(&server);
		let mut views_output = Collect::default();
		let mut downloads_output = Collect::default();
		let (views, downloads) = tokio::join!(
			client.increment_mod_views("limited", &mut views_output),
			client.increment_mod_downloads("open", &mut downloads_output),
		);

		assert_eq!(
			views,
			RateLimitResult {
				success: false,
				remaining_time: Some(2)
			}
		);
		assert_eq!(downloads, RateLimitResult::succeeded());

		assert_eq!(views_output.messages.len(), 1);
		assert!(views_output.messages[0].0.contains("views of mod 'limited'"));
		assert_eq!(downloads_output.messages.len(), 1);
		assert!(downloads_output.messages[0]
			.0
			.contains("downloads of mod 'open'"));
	}
}
