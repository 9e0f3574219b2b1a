//! Explicit configuration for the issuer and the gateway exerciser.
//!
//! Every value the probe needs lives in [`ProbeConfig`]; nothing is read from process-wide state.
//! Defaults mirror a local Kong gateway with a JWT credential registered as `user-key` /
//! `user-secret`, so `ProbeConfig::default()` works against a stock development setup.

// std
use std::time::Duration as StdDuration;
// self
use crate::{
	_prelude::*,
	error::ConfigError,
	token::{ReservedClaimPolicy, SigningSecret},
};

/// Top-level configuration combining the issuer credential and the gateway target.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProbeConfig {
	/// Credential used to mint tokens.
	pub issuer: IssuerConfig,
	/// Gateway the exerciser talks to.
	pub gateway: GatewayConfig,
}
impl ProbeConfig {
	/// Parses a JSON configuration document; missing fields fall back to defaults.
	pub fn from_json_str(raw: &str) -> Result<Self, ConfigError> {
		let de = &mut serde_json::Deserializer::from_str(raw);
		let config: Self = serde_path_to_error::deserialize(de)?;

		config.validate()?;

		Ok(config)
	}

	/// Validates both halves of the configuration.
	pub fn validate(&self) -> Result<(), ConfigError> {
		self.issuer.validate()?;
		self.gateway.validate()
	}
}

/// Credential material and issuance defaults.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct IssuerConfig {
	/// Credential identifier written to the `iss` claim; must match the gateway's key.
	pub issuer: String,
	/// Key identifier written to the `kid` claim; falls back to [`IssuerConfig::issuer`].
	pub key_id: Option<String>,
	/// Shared HMAC secret.
	pub secret: SigningSecret,
	/// Lifetime applied when the caller does not pass one.
	pub default_ttl_seconds: i64,
	/// Whether caller claims may replace the reserved ones.
	pub reserved_claims: ReservedClaimPolicy,
}
impl IssuerConfig {
	/// Default lifetime of a freshly issued token (24 hours).
	pub const DEFAULT_TTL_SECONDS: i64 = 60 * 60 * 24;

	/// Creates a configuration for the given credential with default lifetime and policy.
	pub fn new(issuer: impl Into<String>, secret: impl Into<String>) -> Self {
		Self {
			issuer: issuer.into(),
			key_id: None,
			secret: SigningSecret::new(secret),
			default_ttl_seconds: Self::DEFAULT_TTL_SECONDS,
			reserved_claims: ReservedClaimPolicy::default(),
		}
	}

	/// Sets a key identifier distinct from the issuer.
	pub fn with_key_id(mut self, key_id: impl Into<String>) -> Self {
		self.key_id = Some(key_id.into());

		self
	}

	/// Overrides the default token lifetime.
	pub fn with_default_ttl(mut self, ttl: Duration) -> Self {
		self.default_ttl_seconds = ttl.whole_seconds();

		self
	}

	/// Overrides the reserved-claim policy.
	pub fn with_reserved_claims(mut self, policy: ReservedClaimPolicy) -> Self {
		self.reserved_claims = policy;

		self
	}

	/// Returns the effective key identifier.
	pub fn key_id(&self) -> &str {
		self.key_id.as_deref().unwrap_or(&self.issuer)
	}

	/// Returns the default lifetime as a signed duration.
	pub fn default_ttl(&self) -> Duration {
		Duration::seconds(self.default_ttl_seconds)
	}

	/// Rejects empty credentials.
	pub fn validate(&self) -> Result<(), ConfigError> {
		if self.issuer.trim().is_empty() {
			return Err(ConfigError::MissingIssuer);
		}
		if self.secret.is_empty() {
			return Err(ConfigError::MissingSecret);
		}

		Ok(())
	}
}
impl Default for IssuerConfig {
	fn default() -> Self {
		Self::new("user-key", "user-secret")
	}
}

/// Gateway location and per-call transport settings.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct GatewayConfig {
	/// Gateway host name or address.
	pub host: String,
	/// Gateway port.
	pub port: u16,
	/// Path used when the caller does not name one.
	pub default_path: String,
	/// Paths visited by the multiple-endpoints scenario.
	pub endpoints: Vec<String>,
	/// Per-request timeout in milliseconds.
	pub timeout_ms: u64,
}
impl GatewayConfig {
	/// Default per-request timeout.
	pub const DEFAULT_TIMEOUT_MS: u64 = 30_000;

	/// Creates a configuration for the given host and port with default paths.
	pub fn new(host: impl Into<String>, port: u16) -> Self {
		Self { host: host.into(), port, ..Self::default() }
	}

	/// Overrides the default path.
	pub fn with_default_path(mut self, path: impl Into<String>) -> Self {
		self.default_path = path.into();

		self
	}

	/// Replaces the endpoints visited by the multiple-endpoints scenario.
	pub fn with_endpoints<I, S>(mut self, endpoints: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		self.endpoints = endpoints.into_iter().map(Into::into).collect();

		self
	}

	/// Overrides the per-request timeout.
	pub fn with_timeout(mut self, timeout: StdDuration) -> Self {
		self.timeout_ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX);

		self
	}

	/// Returns the per-request timeout.
	pub fn timeout(&self) -> StdDuration {
		StdDuration::from_millis(self.timeout_ms)
	}

	/// Resolves `path` against the gateway host and port.
	///
	/// IPv6 literals may be given with or without brackets.
	pub fn url_for(&self, path: &str) -> Result<Url, ConfigError> {
		let host = if self.host.contains(':') && !self.host.starts_with('[') {
			format!("[{}]", self.host)
		} else {
			self.host.clone()
		};
		let target = if path.starts_with('/') {
			format!("http://{host}:{}{path}", self.port)
		} else {
			format!("http://{host}:{}/{path}", self.port)
		};

		Url::parse(&target).map_err(|source| ConfigError::InvalidTarget { target, source })
	}

	/// Renders a ready-to-paste `curl` invocation carrying `token`.
	pub fn curl_command(&self, token: &str, path: &str) -> Result<String, ConfigError> {
		let url = self.url_for(path)?;

		Ok(format!("curl -i -X GET {url} -H \"Authorization: Bearer {token}\""))
	}

	/// Ensures the default path resolves to a URL.
	pub fn validate(&self) -> Result<(), ConfigError> {
		self.url_for(&self.default_path).map(|_| ())
	}
}
impl Default for GatewayConfig {
	fn default() -> Self {
		Self {
			host: "localhost".into(),
			port: 8000,
			default_path: "/api/v1/products".into(),
			endpoints: vec![
				"/api/v1/products".into(),
				"/api/v1/orders".into(),
				"/api/v1/auth/profile".into(),
			],
			timeout_ms: Self::DEFAULT_TIMEOUT_MS,
		}
	}
}
