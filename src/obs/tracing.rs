// self
use crate::_prelude::*;

/// Type alias that resolves to an instrumented future when tracing is enabled.
#[cfg(feature = "tracing")]
pub type InstrumentedExchange<F> = tracing::instrument::Instrumented<F>;
/// Passthrough future type when tracing is disabled.
#[cfg(not(feature = "tracing"))]
pub type InstrumentedExchange<F> = F;

/// Span covering one exchange: which scenario sent the token, where, and what came back.
///
/// `status` starts empty and is filled by [`ProbeSpan::record_status`] once the gateway answers;
/// a span that closes without it marks a transport failure.
#[derive(Clone, Debug)]
pub struct ProbeSpan {
	#[cfg(feature = "tracing")]
	span: tracing::Span,
}
impl ProbeSpan {
	/// Opens a span for sending the `scenario` token to `path`.
	pub fn new(scenario: &'static str, path: &str) -> Self {
		#[cfg(feature = "tracing")]
		{
			let span = tracing::info_span!(
				"gateway_probe.exchange",
				scenario,
				path,
				status = tracing::field::Empty
			);

			Self { span }
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = (scenario, path);

			Self {}
		}
	}

	/// Records the status code the gateway answered with.
	pub fn record_status(&self, status: u16) {
		#[cfg(feature = "tracing")]
		self.span.record("status", status);
		#[cfg(not(feature = "tracing"))]
		let _ = status;
	}

	/// Instruments an async block without holding a guard across `.await` points.
	pub fn instrument<Fut>(&self, fut: Fut) -> InstrumentedExchange<Fut>
	where
		Fut: Future,
	{
		#[cfg(feature = "tracing")]
		{
			use tracing::Instrument;

			fut.instrument(self.span.clone())
		}
		#[cfg(not(feature = "tracing"))]
		{
			fut
		}
	}
}
