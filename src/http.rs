//! Transport primitives for gateway exchanges.
//!
//! [`GatewayTransport`] is the crate's only dependency on an HTTP stack. The exerciser hands it a
//! fully resolved [`GatewayRequest`] and receives the raw [`GatewayResponse`]; status, header,
//! and body interpretation happen above this layer so alternative transports (and test fakes)
//! only need to move bytes.

// std
#[cfg(feature = "reqwest")] use std::ops::Deref;
// self
#[cfg(feature = "reqwest")] use crate::{config::GatewayConfig, error::ConfigError};
use crate::{_prelude::*, error::TransportError};

/// Future returned by [`GatewayTransport::send`].
pub type TransportFuture<'a> =
	Pin<Box<dyn Future<Output = Result<GatewayResponse, TransportError>> + 'a + Send>>;

/// Abstraction over HTTP clients able to perform one bearer-authenticated GET.
///
/// Implementations must consume the whole response body before resolving and must not retry.
pub trait GatewayTransport
where
	Self: 'static + Send + Sync,
{
	/// Sends `request` and resolves once the full response has been read.
	fn send(&self, request: GatewayRequest) -> TransportFuture<'_>;
}

/// Outbound GET request carrying a bearer token.
#[derive(Clone)]
pub struct GatewayRequest {
	/// Absolute target URL.
	pub url: Url,
	/// Token placed in `Authorization: Bearer <token>`; sent verbatim, never validated.
	pub bearer: String,
}
impl GatewayRequest {
	/// Returns the `Authorization` header value.
	pub fn authorization(&self) -> String {
		format!("Bearer {}", self.bearer)
	}
}
impl Debug for GatewayRequest {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("GatewayRequest")
			.field("url", &self.url.as_str())
			.field("bearer", &"<redacted>")
			.finish()
	}
}

/// Raw response as read off the wire.
#[derive(Clone, Debug, Default)]
pub struct GatewayResponse {
	/// HTTP status code.
	pub status: u16,
	/// Header name/value pairs in arrival order; names may repeat.
	pub headers: Vec<(String, String)>,
	/// Complete response body.
	pub body: Vec<u8>,
}

/// Thin wrapper around [`ReqwestClient`] so shared HTTP behavior lives in one place.
#[cfg(feature = "reqwest")]
#[derive(Clone, Debug, Default)]
pub struct ReqwestTransport(pub ReqwestClient);
#[cfg(feature = "reqwest")]
impl ReqwestTransport {
	/// Builds a client applying the gateway's per-request timeout.
	///
	/// Redirects are never followed: a `3xx` from the gateway is the exchange's answer, and the
	/// bearer token is not replayed to the redirect target.
	pub fn new(config: &GatewayConfig) -> Result<Self, ConfigError> {
		let client = ReqwestClient::builder()
			.timeout(config.timeout())
			.redirect(reqwest::redirect::Policy::none())
			.build()?;

		Ok(Self(client))
	}

	/// Wraps an existing reqwest [`ReqwestClient`].
	///
	/// The client is used as-is. Build it with `redirect(Policy::none())` to keep one request per
	/// exchange; reqwest's default policy follows up to ten redirects.
	pub fn with_client(client: ReqwestClient) -> Self {
		Self(client)
	}
}
#[cfg(feature = "reqwest")]
impl AsRef<ReqwestClient> for ReqwestTransport {
	fn as_ref(&self) -> &ReqwestClient {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl Deref for ReqwestTransport {
	type Target = ReqwestClient;

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl GatewayTransport for ReqwestTransport {
	fn send(&self, request: GatewayRequest) -> TransportFuture<'_> {
		Box::pin(async move {
			let response = self.0.get(request.url).bearer_auth(request.bearer).send().await?;
			let status = response.status().as_u16();
			let headers = response
				.headers()
				.iter()
				.map(|(name, value)| {
					(name.as_str().to_owned(), String::from_utf8_lossy(value.as_bytes()).into_owned())
				})
				.collect();
			let body = response.bytes().await?.to_vec();

			Ok(GatewayResponse { status, headers, body })
		})
	}
}
