//! Mint HS256 JSON Web Tokens for an API gateway credential and exercise the gateway with valid,
//! expired, and tampered tokens.
//!
//! The crate is split into a token side ([`token`]), which builds, signs, and verifies compact
//! tokens from an explicit [`config::IssuerConfig`], and an exchange side ([`exchange`],
//! [`scenario`]), which sends those tokens to the gateway one request at a time and reports what
//! came back.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod config;
pub mod error;
pub mod exchange;
pub mod http;
pub mod obs;
pub mod scenario;
pub mod token;

mod _prelude {
	pub use std::{
		collections::BTreeMap,
		error::Error as StdError,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		pin::Pin,
		sync::Arc,
	};

	#[cfg(feature = "reqwest")]
	pub use reqwest::{Client as ReqwestClient, Error as ReqwestError};
	pub use serde::{Deserialize, Serialize};
	pub use thiserror::Error as ThisError;
	pub use time::{Duration, OffsetDateTime};
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

#[cfg(feature = "reqwest")] pub use reqwest;
pub use url;
#[cfg(test)] use {color_eyre as _, httpmock as _, tracing_subscriber as _};
