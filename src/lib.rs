//! Async client for the Baidu AI Platform (AIP) HTTP API: client-credentials tokens, BCE request
//! signing for accounts without the all-APIs scope, and the face and feedback endpoints.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod api;
pub mod auth;
pub mod config;
pub mod endpoint;
pub mod error;
pub mod http;
pub mod obs;
pub mod sign;
pub mod transport;
#[cfg(all(any(test, feature = "test"), feature = "reqwest"))]
pub mod _preludet {
	//! Convenience re-exports and helpers for integration tests; enabled via `cfg(test)` or the
	//! `test` crate feature.

	pub use crate::_prelude::*;

	// self
	use crate::{
		api::ReqwestAipClient,
		auth::Credentials,
		config::ClientConfig,
		endpoint::Endpoints,
		http::{self, ReqwestHttpClient},
		transport::ReqwestTransportErrorMapper,
	};

	/// App id used by test clients.
	pub const TEST_APP_ID: &str = "10000000";
	/// API key used by test clients.
	pub const TEST_API_KEY: &str = "ak-test";
	/// Secret key used by test clients.
	pub const TEST_SECRET_KEY: &str = "sk-test";

	/// Credentials shared by test clients.
	pub fn test_credentials() -> Credentials {
		Credentials::new(TEST_APP_ID, TEST_API_KEY, TEST_SECRET_KEY)
	}

	/// Builds a reqwest HTTP client that accepts the self-signed certificates produced by
	/// `httpmock` during tests.
	pub fn test_reqwest_http_client() -> ReqwestHttpClient {
		test_reqwest_http_client_with(&ClientConfig::default())
	}

	/// Same as [`test_reqwest_http_client`] but honoring the timeouts and proxies of `config`.
	pub fn test_reqwest_http_client_with(config: &ClientConfig) -> ReqwestHttpClient {
		let client = http::configure(ReqwestClient::builder(), config)
			.expect("Failed to apply test client config.")
			.danger_accept_invalid_certs(true)
			.danger_accept_invalid_hostnames(true)
			.build()
			.expect("Failed to build insecure Reqwest client for tests.");

		ReqwestHttpClient::with_client(client)
	}

	/// Constructs a [`ReqwestAipClient`] whose endpoints all live under `base_url` (usually a
	/// mock server).
	pub fn build_reqwest_test_client(base_url: &str, config: &ClientConfig) -> ReqwestAipClient {
		let endpoints =
			Endpoints::with_base(base_url).expect("Failed to build test endpoint table.");

		ReqwestAipClient::with_http_client(
			test_credentials(),
			endpoints,
			test_reqwest_http_client_with(config),
			Arc::new(ReqwestTransportErrorMapper),
		)
	}
}

mod _prelude {
	pub use std::{
		collections::BTreeMap,
		error::Error as StdError,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		pin::Pin,
		str::FromStr,
		sync::Arc,
	};

	pub use parking_lot::RwLock;
	#[cfg(feature = "reqwest")]
	pub use reqwest::{Client as ReqwestClient, Error as ReqwestError};
	pub use serde::{Deserialize, Serialize};
	pub use thiserror::Error as ThisError;
	pub use time::OffsetDateTime;
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

#[cfg(feature = "reqwest")] pub use reqwest;
pub use url;
#[cfg(test)] use {color_eyre as _, httpmock as _};
