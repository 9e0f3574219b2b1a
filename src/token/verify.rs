//! Verification of compact HS256 tokens by a party holding the shared secret.

// self
use crate::{
	_prelude::*,
	token::{self, ALGORITHM, ClaimsSet, SigningSecret, TokenHeader},
};

/// Reasons a token fails verification.
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
pub enum VerifyError {
	/// Token does not have three base64url segments with JSON header and claims.
	#[error("Token is malformed.")]
	Malformed,
	/// Header names an algorithm other than HS256.
	#[error("Token algorithm `{alg}` is not supported.")]
	UnsupportedAlgorithm {
		/// Algorithm label found in the header.
		alg: String,
	},
	/// Signature does not match the header and claims.
	#[error("Token signature is invalid.")]
	InvalidSignature,
	/// Token expiry is at or before the verification instant.
	#[error("Token expired at {expires_at}.")]
	Expired {
		/// `exp` claim in epoch seconds.
		expires_at: i64,
	},
}

/// Verifies tokens minted with a given secret.
#[derive(Clone, Debug)]
pub struct TokenVerifier {
	secret: SigningSecret,
}
impl TokenVerifier {
	/// Creates a verifier for `secret`.
	pub fn new(secret: impl Into<SigningSecret>) -> Self {
		Self { secret: secret.into() }
	}

	/// Verifies `raw` against the current UTC time.
	pub fn verify(&self, raw: &str) -> Result<ClaimsSet, VerifyError> {
		self.verify_at(raw, OffsetDateTime::now_utc())
	}

	/// Verifies `raw` as if the current time were `now`.
	///
	/// The signature is checked before the claims are parsed. Tokens without `exp` never expire.
	pub fn verify_at(&self, raw: &str, now: OffsetDateTime) -> Result<ClaimsSet, VerifyError> {
		let (header_segment, claims_segment, signature) =
			token::split_compact(raw).ok_or(VerifyError::Malformed)?;
		let header: TokenHeader = token::decode_segment(header_segment)
			.and_then(|bytes| serde_json::from_slice(&bytes).ok())
			.ok_or(VerifyError::Malformed)?;

		if header.alg != ALGORITHM {
			return Err(VerifyError::UnsupportedAlgorithm { alg: header.alg });
		}

		let signature = token::decode_segment(signature).ok_or(VerifyError::InvalidSignature)?;
		let signing_input = &raw[..header_segment.len() + 1 + claims_segment.len()];

		if !token::signature_matches(&self.secret, signing_input, &signature) {
			return Err(VerifyError::InvalidSignature);
		}

		let claims: ClaimsSet = token::decode_segment(claims_segment)
			.and_then(|bytes| serde_json::from_slice(&bytes).ok())
			.ok_or(VerifyError::Malformed)?;

		if let Some(expires_at) = claims.expires_at() {
			if now.unix_timestamp() >= expires_at {
				return Err(VerifyError::Expired { expires_at });
			}
		}

		Ok(claims)
	}
}

#[cfg(test)]
mod tests {
	// crates.io
	use time::macros::datetime;
	// self
	use super::*;
	use crate::{
		config::IssuerConfig,
		token::{IssueOptions, SignedToken, TokenIssuer},
	};

	const BASE64URL: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789-_";

	fn issue(ttl: i64, now: OffsetDateTime) -> SignedToken {
		TokenIssuer::new(IssuerConfig::default())
			.expect("Default issuer config should be valid.")
			.issue_at(IssueOptions::new().with_ttl_seconds(ttl), now)
			.expect("Issuance should succeed.")
	}

	#[test]
	fn valid_token_round_trips_claims() {
		let now = datetime!(2025-06-01 12:00 UTC);
		let token = issue(60, now);
		let claims = TokenVerifier::new("user-secret")
			.verify_at(token.as_str(), now)
			.expect("Fresh token should verify.");

		assert_eq!(claims.issuer(), Some("user-key"));
		assert_eq!(claims.expires_at(), Some(now.unix_timestamp() + 60));
	}

	#[test]
	fn any_signature_mutation_fails_verification() {
		let now = datetime!(2025-06-01 12:00 UTC);
		let token = issue(3_600, now);
		let verifier = TokenVerifier::new("user-secret");
		let (header, claims, signature) = token.segments().expect("Token should have three segments.");

		for (idx, original) in signature.char_indices() {
			for replacement in BASE64URL.chars().filter(|c| *c != original) {
				let mut mutated = signature.to_owned();

				mutated.replace_range(idx..idx + 1, &replacement.to_string());

				let raw = format!("{header}.{claims}.{mutated}");

				assert_eq!(
					verifier.verify_at(&raw, now),
					Err(VerifyError::InvalidSignature),
					"mutation {original}->{replacement} at {idx} must fail"
				);
			}
		}
	}

	#[test]
	fn tampered_last_char_fails_verification() {
		let now = datetime!(2025-06-01 12:00 UTC);
		let token = issue(3_600, now).with_last_char_replaced();

		assert_eq!(
			TokenVerifier::new("user-secret").verify_at(token.as_str(), now),
			Err(VerifyError::InvalidSignature)
		);
	}

	#[test]
	fn wrong_secret_fails_verification() {
		let now = datetime!(2025-06-01 12:00 UTC);
		let token = issue(3_600, now);

		assert_eq!(
			TokenVerifier::new("other-secret").verify_at(token.as_str(), now),
			Err(VerifyError::InvalidSignature)
		);
	}

	#[test]
	fn expiry_boundary_is_exclusive() {
		let now = datetime!(2025-06-01 12:00 UTC);
		let token = issue(10, now);
		let verifier = TokenVerifier::new("user-secret");

		assert!(verifier.verify_at(token.as_str(), now + Duration::seconds(9)).is_ok());
		assert_eq!(
			verifier.verify_at(token.as_str(), now + Duration::seconds(10)),
			Err(VerifyError::Expired { expires_at: now.unix_timestamp() + 10 })
		);
	}

	#[test]
	fn malformed_tokens_are_rejected() {
		let verifier = TokenVerifier::new("user-secret");

		assert_eq!(verifier.verify("not-a-token"), Err(VerifyError::Malformed));
		assert_eq!(verifier.verify("a.b.c.d"), Err(VerifyError::Malformed));
		assert_eq!(verifier.verify("%%%.e30.AAAA"), Err(VerifyError::Malformed));
	}

	#[test]
	fn foreign_algorithms_are_rejected() {
		// {"alg":"none"}
		let raw = "eyJhbGciOiJub25lIn0.e30.";

		assert_eq!(
			TokenVerifier::new("user-secret").verify(raw),
			Err(VerifyError::UnsupportedAlgorithm { alg: "none".into() })
		);
	}
}
