//! Crate-level error types shared by the issuer, the exerciser, and the scenario driver.

// self
use crate::_prelude::*;

/// Crate-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical error exposed by public APIs.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Local configuration problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Transport failure (DNS, TCP, TLS, timeout).
	#[error(transparent)]
	Transport(#[from] TransportError),
	/// Claims or header could not be serialized into the token.
	#[error("Token segment could not be encoded.")]
	Encode(#[source] serde_json::Error),
}

/// Configuration and validation failures.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// Signing secret is absent or empty.
	#[error("Signing secret must not be empty.")]
	MissingSecret,
	/// Signing secret was rejected by the MAC implementation.
	#[error("Signing secret cannot be used as an HMAC-SHA256 key.")]
	InvalidSigningKey,
	/// Issuer identifier is absent or empty.
	#[error("Issuer identifier must not be empty.")]
	MissingIssuer,
	/// Caller claims attempted to replace a reserved claim while protection is enabled.
	#[error("Claim `{claim}` is reserved and cannot be overridden.")]
	ReservedClaim {
		/// Reserved claim name supplied by the caller.
		claim: String,
	},
	/// Gateway host, port, and path do not form a valid URL.
	#[error("Gateway target `{target}` is not a valid URL.")]
	InvalidTarget {
		/// Target string that failed to parse.
		target: String,
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// Configuration document could not be parsed.
	#[error("Configuration is invalid at `{path}`.")]
	Parse {
		/// Field path where parsing failed.
		path: String,
		/// Underlying parsing failure.
		#[source]
		source: serde_json::Error,
	},
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
}
impl ConfigError {
	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for ConfigError {
	fn from(e: ReqwestError) -> Self {
		Self::http_client_build(e)
	}
}
impl From<serde_path_to_error::Error<serde_json::Error>> for ConfigError {
	fn from(e: serde_path_to_error::Error<serde_json::Error>) -> Self {
		let path = e.path().to_string();

		Self::Parse { path, source: e.into_inner() }
	}
}

/// Transport-level failures.
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while calling the gateway: {message}")]
	Network {
		/// Rendered message of the underlying failure.
		message: String,
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
}
impl TransportError {
	/// Wraps a transport-specific network error, keeping its message for reporting.
	///
	/// The message joins every layer of the source chain, so the root cause (refused connection,
	/// DNS failure, timeout) survives wrappers that only describe the request.
	pub fn network(src: impl 'static + Send + Sync + StdError) -> Self {
		let message = render_chain(&src);

		Self::Network { message, source: Box::new(src) }
	}
}

fn render_chain(err: &(dyn 'static + StdError)) -> String {
	let mut message = err.to_string();
	let mut cause = err.source();

	while let Some(layer) = cause {
		let text = layer.to_string();

		// Some wrappers already repeat their cause in their own message.
		if !message.contains(&text) {
			message.push_str(": ");
			message.push_str(&text);
		}

		cause = layer.source();
	}

	message
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for TransportError {
	fn from(e: ReqwestError) -> Self {
		Self::network(e)
	}
}
