//! Compact three-segment token artifact.

// self
use crate::{_prelude::*, token::ClaimsSet};

/// Compact `header.claims.signature` token.
///
/// The wrapper does not validate its contents: tampered and malformed tokens are legitimate
/// values for the exerciser to send. Use [`TokenVerifier`](crate::token::TokenVerifier) to check
/// one.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SignedToken(String);
impl SignedToken {
	/// Wraps a raw compact token.
	pub fn new(raw: impl Into<String>) -> Self {
		Self(raw.into())
	}

	/// Returns the compact form. It is a bearer credential; avoid logging it.
	pub fn as_str(&self) -> &str {
		&self.0
	}

	/// Consumes the wrapper.
	pub fn into_string(self) -> String {
		self.0
	}

	/// Splits into `(header, claims, signature)` if the token has exactly three segments.
	pub fn segments(&self) -> Option<(&str, &str, &str)> {
		super::split_compact(&self.0)
	}

	/// Returns a copy whose final character is replaced, so its signature no longer matches.
	pub fn with_last_char_replaced(&self) -> Self {
		let mut raw = self.0.clone();
		let replacement = match raw.pop() {
			Some('X') => 'Y',
			_ => 'X',
		};

		raw.push(replacement);

		Self(raw)
	}

	/// Decodes the claims segment without checking the signature.
	pub fn decode_claims_unverified(&self) -> Option<ClaimsSet> {
		let (_, claims, _) = self.segments()?;
		let bytes = super::decode_segment(claims)?;

		serde_json::from_slice(&bytes).ok()
	}
}
impl AsRef<str> for SignedToken {
	fn as_ref(&self) -> &str {
		self.as_str()
	}
}
impl Debug for SignedToken {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_tuple("SignedToken").field(&"<redacted>").finish()
	}
}
