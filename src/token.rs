//! Claims, signing, and verification for compact HS256 tokens.

pub mod claims;
pub mod issuer;
pub mod secret;
pub mod signed;
pub mod verify;

pub use claims::*;
pub use issuer::*;
pub use secret::*;
pub use signed::*;
pub use verify::*;

// crates.io
use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use hmac::{Hmac, Mac};
use sha2::Sha256;
// self
use crate::{_prelude::*, error::ConfigError};

type HmacSha256 = Hmac<Sha256>;

/// Algorithm label written to, and required in, the token header.
pub const ALGORITHM: &str = "HS256";

/// Signs the `header.claims` input and returns the encoded signature segment.
fn signature_for(secret: &SigningSecret, signing_input: &str) -> Result<String, ConfigError> {
	Ok(encode_segment(&mac_for(secret, signing_input)?.finalize().into_bytes()))
}

/// Checks `signature` against the `header.claims` input in constant time.
fn signature_matches(secret: &SigningSecret, signing_input: &str, signature: &[u8]) -> bool {
	mac_for(secret, signing_input).is_ok_and(|mac| mac.verify_slice(signature).is_ok())
}

fn mac_for(secret: &SigningSecret, signing_input: &str) -> Result<HmacSha256, ConfigError> {
	let mut mac = <HmacSha256 as Mac>::new_from_slice(secret.expose().as_bytes())
		.map_err(|_| ConfigError::InvalidSigningKey)?;

	mac.update(signing_input.as_bytes());

	Ok(mac)
}

fn encode_segment(bytes: &[u8]) -> String {
	URL_SAFE_NO_PAD.encode(bytes)
}

fn decode_segment(segment: &str) -> Option<Vec<u8>> {
	URL_SAFE_NO_PAD.decode(segment).ok()
}

/// Token header: algorithm and type labels.
#[derive(Debug, Serialize, Deserialize)]
struct TokenHeader {
	alg: String,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	typ: Option<String>,
}
impl TokenHeader {
	fn hs256() -> Self {
		Self { alg: ALGORITHM.into(), typ: Some("JWT".into()) }
	}
}

fn split_compact(raw: &str) -> Option<(&str, &str, &str)> {
	let mut parts = raw.split('.');
	let header = parts.next()?;
	let claims = parts.next()?;
	let signature = parts.next()?;

	if parts.next().is_some() {
		return None;
	}

	Some((header, claims, signature))
}
