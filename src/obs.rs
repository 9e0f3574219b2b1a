//! Optional observability helpers for exchanges and scenarios.
//!
//! # Feature Flags
//!
//! - Enable `tracing` to emit one `gateway_probe.exchange` span per exchange (fields `scenario`,
//!   `path`, and the answered `status`) and per-outcome events from the scenario driver.
//! - Enable `metrics` to increment the `gateway_probe_exchange_total` counter for every
//!   attempt/outcome, labeled by `scenario`, `path`, and `outcome`, and to record
//!   `gateway_probe_exchange_seconds` per exchange.

mod metrics;
mod tracing;

pub use metrics::*;
pub use tracing::*;

// self
use crate::_prelude::*;

/// Outcome labels recorded for each exchange.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ExchangeOutcome {
	/// Request is about to be sent.
	Attempt,
	/// Gateway answered with a 2xx status.
	Accepted,
	/// Gateway answered with any other status.
	Rejected,
	/// No response was received.
	Failure,
}
impl ExchangeOutcome {
	/// Classifies an HTTP status code.
	pub const fn from_status(status: u16) -> Self {
		if matches!(status, 200..=299) { Self::Accepted } else { Self::Rejected }
	}

	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			ExchangeOutcome::Attempt => "attempt",
			ExchangeOutcome::Accepted => "accepted",
			ExchangeOutcome::Rejected => "rejected",
			ExchangeOutcome::Failure => "failure",
		}
	}
}
impl Display for ExchangeOutcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
