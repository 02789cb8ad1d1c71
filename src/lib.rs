//! Client for the dsktcc mod listing service.
//!
//! Lists mods, fetches single mods and their stats, and counts views and
//! downloads. Counter increments are rate limited by the service and never
//! return an error; see [`RateLimitResult`].

pub use dsktcc_net as net;
pub use dsktcc_shared as shared;

/// The client that calls the API
pub mod client;
/// Configuration for the client
pub mod config;
/// Results of counter increments
pub mod rate_limit;

pub use client::ModsClient;
pub use config::{ConfigBuilder, Configuration};
pub use net::mods::{Mod, ModStats, ModsQuery, API_URL};
pub use rate_limit::RateLimitResult;

/// The version of the library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
