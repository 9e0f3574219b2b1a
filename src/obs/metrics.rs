// std
use std::time::Duration as StdDuration;
// self
use crate::obs::ExchangeOutcome;

/// Counts an exchange outcome for `scenario`, labeled by gateway path (when enabled).
pub fn record_exchange_outcome(scenario: &'static str, path: &str, outcome: ExchangeOutcome) {
	#[cfg(feature = "metrics")]
	{
		metrics::counter!(
			"gateway_probe_exchange_total",
			"scenario" => scenario,
			"path" => path.to_owned(),
			"outcome" => outcome.as_str()
		)
		.increment(1);
	}

	#[cfg(not(feature = "metrics"))]
	{
		let _ = (scenario, path, outcome);
	}
}

/// Records how long the gateway took to answer (or fail) one exchange.
pub fn record_exchange_latency(scenario: &'static str, elapsed: StdDuration) {
	#[cfg(feature = "metrics")]
	{
		metrics::histogram!("gateway_probe_exchange_seconds", "scenario" => scenario)
			.record(elapsed.as_secs_f64());
	}

	#[cfg(not(feature = "metrics"))]
	{
		let _ = (scenario, elapsed);
	}
}
