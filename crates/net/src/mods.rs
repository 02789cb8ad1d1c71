use std::fmt::Display;

use anyhow::Context;
use reqwest::{Client, Url};
use serde::{Deserialize, Serialize};

use crate::download;

/// Base URL of the mod listing service
pub const API_URL: &str = "https://dsktcc.dvh.sh";

/// The status that the service puts in a counter response when the caller is rate limited
pub const RATE_LIMITED_STATUS: f64 = 429.0;

/// A mod listed on the service. Only the name is understood, everything
/// else is kept as-is and in the order the service sent it
#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
pub struct Mod {
	/// The unique name of the mod
	pub name: String,
	/// All other fields of the mod
	#[serde(flatten)]
	pub metadata: serde_json::Map<String, serde_json::Value>,
}

/// Aggregate counters for a single mod
#[derive(Deserialize, Serialize, Clone, Debug, PartialEq, Eq)]
pub struct ModStats {
	/// The ID of the mod in the service's database
	#[serde(rename = "_id", alias = "id")]
	pub id: String,
	/// The name of the mod
	pub name: String,
	/// How many times the mod has been downloaded
	pub downloads: u64,
	/// How many times the mod page has been viewed
	pub views: u64,
}

/// Filters for listing mods. Empty fields are left out of the request
#[derive(Deserialize, Serialize, Clone, Debug, Default)]
pub struct ModsQuery {
	/// Text to search for
	pub search: Option<String>,
	/// The sort order
	pub sort: Option<String>,
	/// The type of mod
	#[serde(rename = "type")]
	pub mod_type: Option<String>,
	/// The category of mod
	pub category: Option<String>,
}

impl ModsQuery {
	/// Create an empty query that lists all mods
	pub fn new() -> Self {
		Self::default()
	}

	/// Set the search text
	pub fn search(mut self, search: impl Into<String>) -> Self {
		self.search = Some(search.into());
		self
	}

	/// Set the sort order
	pub fn sort(mut self, sort: impl Into<String>) -> Self {
		self.sort = Some(sort.into());
		self
	}

	/// Set the mod type
	pub fn mod_type(mut self, mod_type: impl Into<String>) -> Self {
		self.mod_type = Some(mod_type.into());
		self
	}

	/// Set the category
	pub fn category(mut self, category: impl Into<String>) -> Self {
		self.category = Some(category.into());
		self
	}

	/// The query parameters to send, in request order
	pub fn params(&self) -> impl Iterator<Item = (&'static str, &str)> + '_ {
		[
			("search", &self.search),
			("sort", &self.sort),
			("type", &self.mod_type),
			("category", &self.category),
		]
		.into_iter()
		.filter_map(|(key, value)| {
			value
				.as_deref()
				.filter(|value| !value.is_empty())
				.map(|value| (key, value))
		})
	}
}

/// Get the list of mods matching a query
pub async fn get_mods(
	query: &ModsQuery,
	api_url: &str,
	client: &Client,
) -> anyhow::Result<Vec<Mod>> {
	let url = format_mods_url(api_url, query)?;
	download::envelope(url, client)
		.await
		.context("Failed to fetch mod list")
}

/// Format the URL for the mod list API
pub fn format_mods_url(api_url: &str, query: &ModsQuery) -> anyhow::Result<Url> {
	let mut url = Url::parse(&format!("{api_url}/mods")).context("Invalid API URL")?;
	url.query_pairs_mut().extend_pairs(query.params());
	Ok(url)
}

/// Get the featured mods
pub async fn get_featured_mods(api_url: &str, client: &Client) -> anyhow::Result<Vec<Mod>> {
	let url = format!("{api_url}/mods/featured");
	download::envelope(url, client)
		.await
		.context("Failed to fetch featured mods")
}

/// Get a single mod by its name
pub async fn get_mod(name: &str, api_url: &str, client: &Client) -> anyhow::Result<Mod> {
	let url = format_get_mod_url(api_url, name);
	download::envelope(url, client)
		.await
		.with_context(|| format!("Failed to fetch mod '{name}'"))
}

/// Get the raw response of a mod from the API
pub async fn get_mod_raw(name: &str, api_url: &str, client: &Client) -> anyhow::Result<String> {
	let url = format_get_mod_url(api_url, name);
	download::text(url, client)
		.await
		.with_context(|| format!("Failed to fetch mod '{name}'"))
}

/// Format the URL for the get_mod API
fn format_get_mod_url(api_url: &str, name: &str) -> String {
	format!("{api_url}/mod/{name}")
}

/// Get the stats for all mods
pub async fn get_mod_stats(api_url: &str, client: &Client) -> anyhow::Result<Vec<ModStats>> {
	let url = format!("{api_url}/mods/stats");
	download::envelope(url, client)
		.await
		.context("Failed to fetch mod stats")
}

/// A counter on a mod that can be incremented
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Counter {
	/// Page views
	View,
	/// Downloads
	Download,
}

impl Counter {
	/// The path segment of this counter in the API
	pub fn path(&self) -> &'static str {
		match self {
			Self::View => "view",
			Self::Download => "download",
		}
	}
}

impl Display for Counter {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Self::View => write!(f, "views"),
			Self::Download => write!(f, "downloads"),
		}
	}
}

/// The body the service answers counter increments with. Anything other than
/// a rate limit status means the increment went through
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CounterResponse {
	/// The status code reported in the body, if it is a number
	pub status: Option<f64>,
	/// How long until the counter can be incremented again, in milliseconds
	pub remaining_time: Option<f64>,
}

impl CounterResponse {
	/// Read the fields out of a response body. Missing or mistyped fields are
	/// left empty instead of failing
	pub fn from_body(body: &serde_json::Value) -> Self {
		Self {
			status: body.get("status").and_then(serde_json::Value::as_f64),
			remaining_time: body
				.get("remainingTime")
				.and_then(serde_json::Value::as_f64),
		}
	}

	/// Check whether this response reports a rate limit
	pub fn is_rate_limited(&self) -> bool {
		self.status == Some(RATE_LIMITED_STATUS)
	}
}

/// Increment a counter on a mod. The HTTP status is ignored and only the
/// body is looked at
pub async fn put_counter(
	name: &str,
	counter: Counter,
	api_url: &str,
	client: &Client,
) -> anyhow::Result<CounterResponse> {
	let url = format_counter_url(api_url, name, counter);
	let body: serde_json::Value = download::put_json(url, client)
		.await
		.with_context(|| format!("Failed to increment {counter} of mod '{name}'"))?;

	Ok(CounterResponse::from_body(&body))
}

/// Format the URL for the counter APIs
fn format_counter_url(api_url: &str, name: &str, counter: Counter) -> String {
	format!("{api_url}/mod/{name}/{}", counter.path())
}
