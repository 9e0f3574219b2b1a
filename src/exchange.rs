//! One bearer-authenticated request/response round-trip against the gateway.
//!
//! [`Exerciser::exchange`] resolves the target URL, hands the request to a
//! [`GatewayTransport`], and turns whatever comes back into an immutable [`ExchangeResult`].
//! A body that is not JSON is not an error: it is reported as [`ResponseBody::Raw`].

// crates.io
use serde_json::Value;
// self
#[cfg(feature = "reqwest")] use crate::http::ReqwestTransport;
use crate::{
	_prelude::*,
	config::GatewayConfig,
	http::{GatewayRequest, GatewayResponse, GatewayTransport},
};

/// Value of a response header; repeated headers keep every value.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum HeaderValue {
	/// Header appeared once.
	Single(String),
	/// Header appeared more than once, values in arrival order.
	Multiple(Vec<String>),
}
impl HeaderValue {
	fn push(&mut self, value: String) {
		match self {
			Self::Single(first) => {
				let first = std::mem::take(first);

				*self = Self::Multiple(vec![first, value]);
			},
			Self::Multiple(values) => values.push(value),
		}
	}

	/// Returns the first value.
	pub fn first(&self) -> &str {
		match self {
			Self::Single(value) => value,
			Self::Multiple(values) => values.first().map_or("", String::as_str),
		}
	}

	/// Iterates all values.
	pub fn iter(&self) -> impl Iterator<Item = &str> {
		let values: &[String] = match self {
			Self::Single(value) => std::slice::from_ref(value),
			Self::Multiple(values) => values,
		};

		values.iter().map(String::as_str)
	}
}
impl Display for HeaderValue {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		match self {
			Self::Single(value) => f.write_str(value),
			Self::Multiple(values) => f.write_str(&values.join(", ")),
		}
	}
}

/// Response body, tagged by how it could be interpreted.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum ResponseBody {
	/// Body parsed as JSON.
	Structured(Value),
	/// Body that is not JSON, decoded lossily as UTF-8.
	Raw(String),
	/// No body bytes were received.
	Empty,
}
impl ResponseBody {
	/// Interprets raw body bytes: empty, JSON, or raw text, in that order.
	pub fn from_bytes(bytes: &[u8]) -> Self {
		if bytes.is_empty() {
			return Self::Empty;
		}

		match serde_json::from_slice(bytes) {
			Ok(value) => Self::Structured(value),
			Err(_) => Self::Raw(String::from_utf8_lossy(bytes).into_owned()),
		}
	}

	/// Returns `true` when the body parsed as JSON.
	pub fn is_structured(&self) -> bool {
		matches!(self, Self::Structured(_))
	}

	/// Returns the parsed JSON value, if any.
	pub fn as_structured(&self) -> Option<&Value> {
		match self {
			Self::Structured(value) => Some(value),
			_ => None,
		}
	}

	/// Returns the raw text, if the body was not JSON.
	pub fn as_raw(&self) -> Option<&str> {
		match self {
			Self::Raw(text) => Some(text),
			_ => None,
		}
	}
}

/// Status, headers, and body of a single exchange.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ExchangeResult {
	status: u16,
	headers: BTreeMap<String, HeaderValue>,
	body: ResponseBody,
}
impl ExchangeResult {
	/// Builds a result from a raw transport response.
	pub fn from_response(response: GatewayResponse) -> Self {
		let mut headers = BTreeMap::<String, HeaderValue>::new();

		for (name, value) in response.headers {
			match headers.get_mut(&name.to_ascii_lowercase()) {
				Some(existing) => existing.push(value),
				None => {
					headers.insert(name.to_ascii_lowercase(), HeaderValue::Single(value));
				},
			}
		}

		Self { status: response.status, headers, body: ResponseBody::from_bytes(&response.body) }
	}

	/// HTTP status code.
	pub fn status(&self) -> u16 {
		self.status
	}

	/// Returns `true` for 2xx statuses.
	pub fn is_success(&self) -> bool {
		matches!(self.status, 200..=299)
	}

	/// Headers keyed by lowercase name.
	pub fn headers(&self) -> &BTreeMap<String, HeaderValue> {
		&self.headers
	}

	/// Looks up a header case-insensitively.
	pub fn header(&self, name: &str) -> Option<&HeaderValue> {
		self.headers.get(&name.to_ascii_lowercase())
	}

	/// Interpreted body.
	pub fn body(&self) -> &ResponseBody {
		&self.body
	}
}
impl Display for ExchangeResult {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		writeln!(f, "Response Status: {}", self.status)?;
		writeln!(f, "Response Headers:")?;

		for (name, value) in &self.headers {
			writeln!(f, "  {name}: {value}")?;
		}

		match &self.body {
			ResponseBody::Structured(value) => {
				let pretty = serde_json::to_string_pretty(value).map_err(|_| std::fmt::Error)?;

				write!(f, "Response Body: {pretty}")
			},
			ResponseBody::Raw(text) => write!(f, "Raw Response: {text}"),
			ResponseBody::Empty => write!(f, "Response Body: <empty>"),
		}
	}
}

/// Sends tokens to the configured gateway, one request at a time.
pub struct Exerciser<T>
where
	T: ?Sized + GatewayTransport,
{
	config: GatewayConfig,
	transport: Arc<T>,
}
impl<T> Exerciser<T>
where
	T: ?Sized + GatewayTransport,
{
	/// Creates an exerciser over an arbitrary transport.
	pub fn with_transport(config: GatewayConfig, transport: Arc<T>) -> Self {
		Self { config, transport }
	}

	/// Gateway configuration in use.
	pub fn config(&self) -> &GatewayConfig {
		&self.config
	}

	/// Sends `token` to [`GatewayConfig::default_path`].
	pub async fn exchange_default(&self, token: &str) -> Result<ExchangeResult> {
		self.exchange(token, &self.config.default_path).await
	}

	/// Sends one GET to `path` with `Authorization: Bearer <token>` and reads the full response.
	///
	/// The token is sent as-is. Transport failures are returned once, without retry.
	pub async fn exchange(&self, token: &str, path: &str) -> Result<ExchangeResult> {
		let url = self.config.url_for(path)?;
		let request = GatewayRequest { url, bearer: token.to_owned() };
		let response = self.transport.send(request).await?;
		let result = ExchangeResult::from_response(response);

		#[cfg(feature = "tracing")]
		tracing::debug!(path, status = result.status(), "gateway responded");

		Ok(result)
	}
}
#[cfg(feature = "reqwest")]
impl Exerciser<ReqwestTransport> {
	/// Creates an exerciser backed by reqwest with the configured timeout.
	pub fn new(config: GatewayConfig) -> Result<Self> {
		let transport = ReqwestTransport::new(&config)?;

		Ok(Self::with_transport(config, Arc::new(transport)))
	}
}
impl<T> Debug for Exerciser<T>
where
	T: ?Sized + GatewayTransport,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Exerciser").field("config", &self.config).finish_non_exhaustive()
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::{error::TransportError, http::TransportFuture};

	struct StaticTransport(GatewayResponse);
	impl GatewayTransport for StaticTransport {
		fn send(&self, request: GatewayRequest) -> TransportFuture<'_> {
			let mut response = self.0.clone();

			response.headers.push(("x-seen-url".into(), request.url.to_string()));
			response.headers.push(("x-seen-auth".into(), request.authorization()));

			Box::pin(async move { Ok(response) })
		}
	}

	struct RefusingTransport;
	impl GatewayTransport for RefusingTransport {
		fn send(&self, _request: GatewayRequest) -> TransportFuture<'_> {
			Box::pin(async {
				Err(TransportError::network(std::io::Error::new(
					std::io::ErrorKind::ConnectionRefused,
					"connection refused",
				)))
			})
		}
	}

	fn exerciser(response: GatewayResponse) -> Exerciser<StaticTransport> {
		Exerciser::with_transport(GatewayConfig::default(), Arc::new(StaticTransport(response)))
	}

	#[test]
	fn body_interpretation_covers_all_shapes() {
		assert_eq!(ResponseBody::from_bytes(b""), ResponseBody::Empty);
		assert_eq!(
			ResponseBody::from_bytes(b"{\"message\":\"Unauthorized\"}"),
			ResponseBody::Structured(serde_json::json!({ "message": "Unauthorized" }))
		);
		assert_eq!(
			ResponseBody::from_bytes(b"<html>bad gateway</html>"),
			ResponseBody::Raw("<html>bad gateway</html>".into())
		);
		assert_eq!(ResponseBody::from_bytes(b"  "), ResponseBody::Raw("  ".into()));
	}

	#[test]
	fn repeated_headers_are_grouped() {
		let result = ExchangeResult::from_response(GatewayResponse {
			status: 200,
			headers: vec![
				("Set-Cookie".into(), "a=1".into()),
				("content-type".into(), "text/plain".into()),
				("set-cookie".into(), "b=2".into()),
			],
			body: Vec::new(),
		});

		assert_eq!(
			result.header("set-cookie"),
			Some(&HeaderValue::Multiple(vec!["a=1".into(), "b=2".into()]))
		);
		assert_eq!(result.header("Content-Type"), Some(&HeaderValue::Single("text/plain".into())));
		assert_eq!(
			result.header("set-cookie").map(|value| value.iter().collect::<Vec<_>>()),
			Some(vec!["a=1", "b=2"])
		);
	}

	#[tokio::test]
	async fn exchange_sends_bearer_to_resolved_path() {
		let exerciser = exerciser(GatewayResponse {
			status: 200,
			headers: vec![("content-type".into(), "application/json".into())],
			body: b"[1,2]".to_vec(),
		});
		let result =
			exerciser.exchange("a.b.c", "/api/v1/orders").await.expect("Exchange should succeed.");

		assert!(result.is_success());
		assert_eq!(result.body().as_structured(), Some(&serde_json::json!([1, 2])));
		assert_eq!(
			result.header("x-seen-url").map(HeaderValue::first),
			Some("http://localhost:8000/api/v1/orders")
		);
		assert_eq!(result.header("x-seen-auth").map(HeaderValue::first), Some("Bearer a.b.c"));
	}

	#[tokio::test]
	async fn exchange_default_uses_configured_path() {
		let exerciser = exerciser(GatewayResponse { status: 401, ..GatewayResponse::default() });
		let result = exerciser.exchange_default("x").await.expect("Exchange should succeed.");

		assert_eq!(result.status(), 401);
		assert_eq!(result.body(), &ResponseBody::Empty);
		assert_eq!(
			result.header("x-seen-url").map(HeaderValue::first),
			Some("http://localhost:8000/api/v1/products")
		);
	}

	#[tokio::test]
	async fn transport_failures_surface_the_message() {
		let exerciser =
			Exerciser::with_transport(GatewayConfig::default(), Arc::new(RefusingTransport));
		let err = exerciser.exchange("x", "/").await.expect_err("Exchange should fail.");

		match err {
			Error::Transport(TransportError::Network { message, .. }) =>
				assert_eq!(message, "connection refused"),
			other => panic!("Unexpected error variant: {other:?}."),
		}
	}

	#[test]
	fn display_renders_console_report() {
		let result = ExchangeResult::from_response(GatewayResponse {
			status: 401,
			headers: vec![("content-type".into(), "text/plain".into())],
			body: b"Unauthorized".to_vec(),
		});

		assert_eq!(
			result.to_string(),
			"Response Status: 401\nResponse Headers:\n  content-type: text/plain\nRaw Response: Unauthorized"
		);
	}
}
