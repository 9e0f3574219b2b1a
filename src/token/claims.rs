//! Claims set model, reserved claim names, and the merge policy for caller claims.

// crates.io
use serde_json::{Map, Value};
// self
use crate::{_prelude::*, error::ConfigError};

/// Claim carrying the credential identifier.
pub const ISSUER: &str = "iss";
/// Claim carrying the issue instant in epoch seconds.
pub const ISSUED_AT: &str = "iat";
/// Claim carrying the expiry instant in epoch seconds.
pub const EXPIRES_AT: &str = "exp";
/// Claim carrying the key identifier the gateway looks the secret up by.
pub const KEY_ID: &str = "kid";
/// Claims the issuer always writes.
pub const RESERVED_CLAIMS: [&str; 4] = [ISSUER, ISSUED_AT, EXPIRES_AT, KEY_ID];

/// Decides what happens when caller claims name a reserved claim.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReservedClaimPolicy {
	/// Caller claims are merged last and win, so `iss`, `exp`, and friends can be forged.
	#[default]
	Override,
	/// Issuance fails when a caller claim names a reserved claim.
	Protect,
}

/// Ordered mapping from claim name to JSON value.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClaimsSet(Map<String, Value>);
impl ClaimsSet {
	/// Creates an empty claims set.
	pub fn new() -> Self {
		Self::default()
	}

	/// Returns `true` if `name` is written by the issuer itself.
	pub fn is_reserved(name: &str) -> bool {
		RESERVED_CLAIMS.contains(&name)
	}

	/// Inserts a claim, returning the previous value.
	pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
		self.0.insert(name.into(), value.into())
	}

	/// Builder-style variant of [`ClaimsSet::insert`].
	pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
		self.insert(name, value);

		self
	}

	/// Looks up a claim by name.
	pub fn get(&self, name: &str) -> Option<&Value> {
		self.0.get(name)
	}

	/// Returns the `iss` claim.
	pub fn issuer(&self) -> Option<&str> {
		self.get(ISSUER).and_then(Value::as_str)
	}

	/// Returns the `kid` claim.
	pub fn key_id(&self) -> Option<&str> {
		self.get(KEY_ID).and_then(Value::as_str)
	}

	/// Returns the `iat` claim.
	pub fn issued_at(&self) -> Option<i64> {
		self.get(ISSUED_AT).and_then(Value::as_i64)
	}

	/// Returns the `exp` claim.
	pub fn expires_at(&self) -> Option<i64> {
		self.get(EXPIRES_AT).and_then(Value::as_i64)
	}

	/// Iterates claims in key order.
	pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
		self.0.iter()
	}

	/// Number of claims.
	pub fn len(&self) -> usize {
		self.0.len()
	}

	/// Returns `true` if no claims are present.
	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	/// Merges `extra` on top of `self`; last write wins unless `policy` protects reserved claims.
	pub fn merge(mut self, extra: ClaimsSet, policy: ReservedClaimPolicy) -> Result<Self, ConfigError> {
		if policy == ReservedClaimPolicy::Protect {
			if let Some(claim) = extra.0.keys().find(|name| Self::is_reserved(name)) {
				return Err(ConfigError::ReservedClaim { claim: claim.clone() });
			}
		}

		self.0.extend(extra.0);

		Ok(self)
	}
}
impl From<Map<String, Value>> for ClaimsSet {
	fn from(value: Map<String, Value>) -> Self {
		Self(value)
	}
}
impl<K, V> FromIterator<(K, V)> for ClaimsSet
where
	K: Into<String>,
	V: Into<Value>,
{
	fn from_iter<I>(iter: I) -> Self
	where
		I: IntoIterator<Item = (K, V)>,
	{
		Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
	}
}
