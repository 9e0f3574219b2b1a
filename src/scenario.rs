//! Fixed sequence of gateway smoke-test scenarios.
//!
//! [`ScenarioDriver::run`] issues a valid token, an already expired token, and a tampered copy of
//! the valid token, then exchanges them in order: valid, expired, tampered, and finally the valid
//! token against every configured endpoint. Each exchange is awaited before the next one starts.
//! Exchange failures are recorded in the [`ScenarioReport`] and never stop the run; only
//! issuance failures are returned as errors.

// std
use std::time::Instant;
// self
use crate::{
	_prelude::*,
	exchange::{ExchangeResult, Exerciser},
	http::GatewayTransport,
	obs::{self, ExchangeOutcome, ProbeSpan},
	token::{IssueOptions, SignedToken, TokenIssuer},
};

/// The four scenarios, in execution order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Scenario {
	/// Fresh token against the default path.
	ValidToken,
	/// Token issued with a negative lifetime against the default path.
	ExpiredToken,
	/// Valid token with its final character replaced against the default path.
	InvalidSignature,
	/// Valid token against every configured endpoint.
	MultipleEndpoints,
}
impl Scenario {
	/// Every scenario in execution order.
	pub const ALL: [Scenario; 4] =
		[Self::ValidToken, Self::ExpiredToken, Self::InvalidSignature, Self::MultipleEndpoints];

	/// One-based position in the run.
	pub const fn number(self) -> u8 {
		match self {
			Self::ValidToken => 1,
			Self::ExpiredToken => 2,
			Self::InvalidSignature => 3,
			Self::MultipleEndpoints => 4,
		}
	}

	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			Self::ValidToken => "valid_token",
			Self::ExpiredToken => "expired_token",
			Self::InvalidSignature => "invalid_signature",
			Self::MultipleEndpoints => "multiple_endpoints",
		}
	}

	/// Human-readable description used in reports.
	pub const fn description(self) -> &'static str {
		match self {
			Self::ValidToken => "Testing with valid token",
			Self::ExpiredToken => "Testing with expired token",
			Self::InvalidSignature => "Testing with invalid signature",
			Self::MultipleEndpoints => "Testing different endpoints",
		}
	}
}
impl Display for Scenario {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// One exchange performed during a scenario.
#[derive(Debug)]
pub struct ScenarioExchange {
	/// Path the token was sent to.
	pub path: String,
	/// Response, or the error that prevented one.
	pub outcome: Result<ExchangeResult>,
}
impl ScenarioExchange {
	/// Status code, if a response arrived.
	pub fn status(&self) -> Option<u16> {
		self.outcome.as_ref().ok().map(ExchangeResult::status)
	}
}

/// Everything observed while running one scenario.
#[derive(Debug)]
pub struct ScenarioReport {
	/// Scenario that ran.
	pub scenario: Scenario,
	/// Exchanges in the order they were performed.
	pub exchanges: Vec<ScenarioExchange>,
}
impl ScenarioReport {
	/// Status codes per exchange; `None` marks a transport failure.
	pub fn statuses(&self) -> Vec<Option<u16>> {
		self.exchanges.iter().map(ScenarioExchange::status).collect()
	}

	/// Returns `true` if any exchange failed without a response.
	pub fn has_failures(&self) -> bool {
		self.exchanges.iter().any(|exchange| exchange.outcome.is_err())
	}
}
impl Display for ScenarioReport {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		write!(f, "Test {}: {}", self.scenario.number(), self.scenario.description())?;

		for exchange in &self.exchanges {
			f.write_str("\n\n")?;

			if self.scenario == Scenario::MultipleEndpoints {
				writeln!(f, "Testing endpoint: {}", exchange.path)?;
			}

			match &exchange.outcome {
				Ok(result) => Display::fmt(result, f)?,
				Err(e) => write!(f, "Error: {e}")?,
			}
		}

		Ok(())
	}
}

/// Runs the fixed scenario sequence against one gateway.
pub struct ScenarioDriver<T>
where
	T: ?Sized + GatewayTransport,
{
	issuer: TokenIssuer,
	exerciser: Exerciser<T>,
	expired_ttl: Duration,
}
impl<T> ScenarioDriver<T>
where
	T: ?Sized + GatewayTransport,
{
	/// Lifetime used for the expired-token scenario (one hour in the past).
	pub const DEFAULT_EXPIRED_TTL: Duration = Duration::seconds(-3_600);

	/// Creates a driver from an issuer and an exerciser.
	pub fn new(issuer: TokenIssuer, exerciser: Exerciser<T>) -> Self {
		Self { issuer, exerciser, expired_ttl: Self::DEFAULT_EXPIRED_TTL }
	}

	/// Overrides the lifetime used for the expired-token scenario.
	pub fn with_expired_ttl(mut self, ttl: Duration) -> Self {
		self.expired_ttl = ttl;

		self
	}

	/// Runs all scenarios and returns their reports.
	pub async fn run(&self) -> Result<Vec<ScenarioReport>> {
		self.run_each(|_| {}).await
	}

	/// Runs all scenarios, handing each report to `on_report` as soon as it completes.
	pub async fn run_each<F>(&self, mut on_report: F) -> Result<Vec<ScenarioReport>>
	where
		F: FnMut(&ScenarioReport),
	{
		let config = self.exerciser.config();
		let default_paths = std::slice::from_ref(&config.default_path);
		let mut valid = None::<SignedToken>;
		let mut reports = Vec::with_capacity(Scenario::ALL.len());

		for scenario in Scenario::ALL {
			let (token, paths) = match scenario {
				Scenario::ValidToken => (self.valid_token(&mut valid)?, default_paths),
				Scenario::ExpiredToken => (
					self.issuer.issue(IssueOptions::new().with_ttl(self.expired_ttl))?,
					default_paths,
				),
				Scenario::InvalidSignature =>
					(self.valid_token(&mut valid)?.with_last_char_replaced(), default_paths),
				Scenario::MultipleEndpoints =>
					(self.valid_token(&mut valid)?, config.endpoints.as_slice()),
			};
			let report = self.run_scenario(scenario, &token, paths).await;

			on_report(&report);
			reports.push(report);
		}

		Ok(reports)
	}

	fn valid_token(&self, slot: &mut Option<SignedToken>) -> Result<SignedToken> {
		if let Some(token) = slot {
			return Ok(token.clone());
		}

		let token = self.issuer.issue(IssueOptions::new())?;

		*slot = Some(token.clone());

		Ok(token)
	}

	async fn run_scenario(
		&self,
		scenario: Scenario,
		token: &SignedToken,
		paths: &[String],
	) -> ScenarioReport {
		let mut exchanges = Vec::with_capacity(paths.len());

		for path in paths {
			let span = ProbeSpan::new(scenario.as_str(), path);
			let outcome = span.instrument(self.run_exchange(scenario, token, path, &span)).await;

			exchanges.push(ScenarioExchange { path: path.clone(), outcome });
		}

		ScenarioReport { scenario, exchanges }
	}

	async fn run_exchange(
		&self,
		scenario: Scenario,
		token: &SignedToken,
		path: &str,
		span: &ProbeSpan,
	) -> Result<ExchangeResult> {
		obs::record_exchange_outcome(scenario.as_str(), path, ExchangeOutcome::Attempt);

		let started = Instant::now();
		let outcome = self.exerciser.exchange(token.as_str(), path).await;
		let observed = match &outcome {
			Ok(result) => {
				span.record_status(result.status());

				ExchangeOutcome::from_status(result.status())
			},
			Err(_) => ExchangeOutcome::Failure,
		};

		obs::record_exchange_latency(scenario.as_str(), started.elapsed());
		obs::record_exchange_outcome(scenario.as_str(), path, observed);

		#[cfg(feature = "tracing")]
		{
			match &outcome {
				Ok(result) => tracing::info!(
					status = result.status(),
					outcome = observed.as_str(),
					"exchange completed"
				),
				Err(e) => tracing::warn!(error = %e, "exchange failed"),
			}
		}

		outcome
	}
}
impl<T> Debug for ScenarioDriver<T>
where
	T: ?Sized + GatewayTransport,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("ScenarioDriver")
			.field("issuer", &self.issuer)
			.field("exerciser", &self.exerciser)
			.field("expired_ttl", &self.expired_ttl)
			.finish()
	}
}
