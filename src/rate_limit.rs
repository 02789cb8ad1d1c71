use serde::{Deserialize, Serialize};

use crate::net::mods::CounterResponse;

/// Milliseconds in an hour
const MS_PER_HOUR: f64 = 1000.0 * 60.0 * 60.0;

/// The outcome of incrementing a counter on a mod
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RateLimitResult {
	/// Whether the increment went through
	pub success: bool,
	/// Whole hours until the counter can be incremented again. Only present
	/// when the service rate limited the request
	#[serde(skip_serializing_if = "Option::is_none")]
	pub remaining_time: Option<u64>,
}

impl RateLimitResult {
	/// A successful increment
	pub fn succeeded() -> Self {
		Self {
			success: true,
			remaining_time: None,
		}
	}

	/// An increment that failed for a reason other than rate limiting
	pub fn failed() -> Self {
		Self {
			success: false,
			remaining_time: None,
		}
	}

	/// Interpret the body the service answered an increment with
	pub fn from_response(response: &CounterResponse) -> Self {
		if response.is_rate_limited() {
			Self {
				success: false,
				remaining_time: response.remaining_time.map(ms_to_hours),
			}
		} else {
			Self::succeeded()
		}
	}
}

/// Converts milliseconds to whole hours, rounding up
pub fn ms_to_hours(ms: f64) -> u64 {
	// Float to int casts saturate, so negative and NaN values become zero
	(ms / MS_PER_HOUR).ceil() as u64
}
