use crate::net::download::user_agent;
use crate::net::mods::API_URL;

macro_rules! builder_method {
	($name:ident, $ty:ty, $doc:literal) => {
		#[doc = $doc]
		pub fn $name(mut self, $name: $ty) -> Self {
			self.config.$name = $name;
			self
		}
	};
}

/// Configuration for the mod listing client
#[derive(Clone, Debug)]
pub struct Configuration {
	/// The base URL of the API. Always the public service unless
	/// pointed at a mirror or a test server
	pub(crate) api_url: String,
	/// The User-Agent header to send with every request
	pub(crate) user_agent: String,
}

impl Default for Configuration {
	fn default() -> Self {
		Self::new()
	}
}

impl Configuration {
	/// Construct the default configuration
	pub fn new() -> Self {
		Self {
			api_url: API_URL.into(),
			user_agent: user_agent(),
		}
	}

	/// Get a builder for the configuration
	pub fn builder() -> ConfigBuilder {
		ConfigBuilder::new()
	}

	/// The base URL requests are sent to
	pub fn api_url(&self) -> &str {
		&self.api_url
	}
}

/// Simple builder for the configuration
pub struct ConfigBuilder {
	config: Configuration,
}

impl ConfigBuilder {
	/// Start a new ConfigBuilder with default configuration
	pub fn new() -> Self {
		Self {
			config: Configuration::new(),
		}
	}

	/// Finish building and get the configuration
	pub fn build(self) -> Configuration {
		let mut config = self.config;
		// Paths are appended directly to the base
		while config.api_url.ends_with('/') {
			config.api_url.pop();
		}
		config
	}

	builder_method!(
		api_url,
		String,
		"Set the base URL of the API. Only needed for mirrors and testing"
	);

	builder_method!(user_agent, String, "Set the User-Agent header sent with requests");
}

impl Default for ConfigBuilder {
	fn default() -> Self {
		Self::new()
	}
}
