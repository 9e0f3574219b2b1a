//! Token issuance: reserved claims, caller claim merge, and HS256 signing.

// self
use crate::{
	_prelude::*,
	config::IssuerConfig,
	token::{self, ClaimsSet, EXPIRES_AT, ISSUED_AT, ISSUER, KEY_ID, SignedToken, TokenHeader},
};

/// Per-call issuance options.
#[derive(Clone, Debug, Default)]
pub struct IssueOptions {
	/// Token lifetime; falls back to [`IssuerConfig::default_ttl`]. Negative values produce an
	/// already expired token.
	pub ttl: Option<Duration>,
	/// Claims merged on top of the reserved ones.
	pub claims: ClaimsSet,
}
impl IssueOptions {
	/// Options that use the configured lifetime and no extra claims.
	pub fn new() -> Self {
		Self::default()
	}

	/// Sets the token lifetime.
	pub fn with_ttl(mut self, ttl: Duration) -> Self {
		self.ttl = Some(ttl);

		self
	}

	/// Sets the token lifetime in whole seconds.
	pub fn with_ttl_seconds(self, seconds: i64) -> Self {
		self.with_ttl(Duration::seconds(seconds))
	}

	/// Replaces the caller claims.
	pub fn with_claims(mut self, claims: ClaimsSet) -> Self {
		self.claims = claims;

		self
	}

	/// Adds a single caller claim.
	pub fn with_claim(mut self, name: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
		self.claims.insert(name, value);

		self
	}
}

/// Mints HS256 tokens for one configured credential.
#[derive(Clone, Debug)]
pub struct TokenIssuer {
	config: IssuerConfig,
}
impl TokenIssuer {
	/// Creates an issuer, rejecting an empty issuer id or secret.
	pub fn new(config: IssuerConfig) -> Result<Self> {
		config.validate()?;

		Ok(Self { config })
	}

	/// Returns the credential configuration.
	pub fn config(&self) -> &IssuerConfig {
		&self.config
	}

	/// Issues a token stamped with the current UTC time.
	pub fn issue(&self, options: IssueOptions) -> Result<SignedToken> {
		self.issue_at(options, OffsetDateTime::now_utc())
	}

	/// Issues a token as if the current time were `now`.
	///
	/// `exp` is exactly `iat + ttl` in whole seconds, including for negative lifetimes.
	pub fn issue_at(&self, options: IssueOptions, now: OffsetDateTime) -> Result<SignedToken> {
		let issued_at = now.unix_timestamp();
		let ttl = options.ttl.unwrap_or_else(|| self.config.default_ttl());
		let expires_at = issued_at.saturating_add(ttl.whole_seconds());
		let claims = ClaimsSet::new()
			.with(ISSUER, self.config.issuer.as_str())
			.with(KEY_ID, self.config.key_id())
			.with(ISSUED_AT, issued_at)
			.with(EXPIRES_AT, expires_at)
			.merge(options.claims, self.config.reserved_claims)?;

		self.sign(&claims)
	}

	/// Signs an arbitrary claims set with the configured secret.
	pub fn sign(&self, claims: &ClaimsSet) -> Result<SignedToken> {
		let header = serde_json::to_vec(&TokenHeader::hs256()).map_err(Error::Encode)?;
		let payload = serde_json::to_vec(claims).map_err(Error::Encode)?;
		let signing_input =
			format!("{}.{}", token::encode_segment(&header), token::encode_segment(&payload));
		let signature = token::signature_for(&self.config.secret, &signing_input)?;

		Ok(SignedToken::new(format!("{signing_input}.{signature}")))
	}
}
