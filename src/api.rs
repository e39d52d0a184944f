//! The AIP client and its endpoint methods.
//!
//! [`AipClient`] owns the credentials, endpoint table, and transport. Every endpoint method funnels
//! into [`AipClient::request`], which fetches a token, picks the [`AuthMode`], signs when required,
//! and decodes the JSON reply.

pub mod common;
pub mod face;
pub mod feedback;
pub mod token;

pub use common::*;
pub use face::*;

// self
use crate::{
	_prelude::*,
	auth::{AuthMode, Credentials},
	endpoint::Endpoints,
	http::AipHttpClient,
	transport::TransportErrorMapper,
};
#[cfg(feature = "reqwest")]
use crate::{config::ClientConfig, http::ReqwestHttpClient, transport::ReqwestTransportErrorMapper};

/// Version marker reported to the API through the `aipSdkVersion` parameter.
pub const SDK_VERSION: &str = "2_2_20";
/// Value of the `aipSdk` parameter.
pub const SDK_NAME: &str = "rust";

#[cfg(feature = "reqwest")]
/// Client specialized for the crate's default reqwest transport stack.
pub type ReqwestAipClient = AipClient<ReqwestHttpClient, ReqwestTransportErrorMapper>;

/// Client for the AIP HTTP API.
///
/// The client is cheap to clone and safe to share across tasks; the only mutable state is the
/// most recently observed [`AuthMode`].
#[derive(Clone)]
pub struct AipClient<C, M>
where
	C: ?Sized + AipHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	/// HTTP client wrapper used for every outbound request.
	pub http_client: Arc<C>,
	/// Mapper applied to transport-layer errors before surfacing them to callers.
	pub transport_mapper: Arc<M>,
	/// Account credentials.
	pub credentials: Credentials,
	/// Endpoint table.
	pub endpoints: Endpoints,
	auth_mode: Arc<RwLock<Option<AuthMode>>>,
}
impl<C, M> AipClient<C, M>
where
	C: ?Sized + AipHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	/// Creates a client that reuses the caller-provided transport + mapper pair.
	pub fn with_http_client(
		credentials: Credentials,
		endpoints: Endpoints,
		http_client: impl Into<Arc<C>>,
		mapper: impl Into<Arc<M>>,
	) -> Self {
		Self {
			http_client: http_client.into(),
			transport_mapper: mapper.into(),
			credentials,
			endpoints,
			auth_mode: Default::default(),
		}
	}

	/// Replaces the endpoint table.
	pub fn with_endpoints(mut self, endpoints: Endpoints) -> Self {
		self.endpoints = endpoints;

		self
	}

	/// Version marker sent with every request.
	pub fn version(&self) -> &'static str {
		SDK_VERSION
	}

	/// Authentication mode chosen by the most recent call, if any call has fetched a token yet.
	pub fn auth_mode(&self) -> Option<AuthMode> {
		*self.auth_mode.read()
	}

	pub(crate) fn remember_auth_mode(&self, mode: AuthMode) {
		*self.auth_mode.write() = Some(mode);
	}
}
#[cfg(feature = "reqwest")]
impl AipClient<ReqwestHttpClient, ReqwestTransportErrorMapper> {
	/// Creates a client for the public endpoints with a default reqwest transport.
	pub fn new(credentials: Credentials) -> Result<Self> {
		Self::with_config(credentials, &ClientConfig::default())
	}

	/// Creates a client for the public endpoints with timeouts and proxies from `config`.
	pub fn with_config(credentials: Credentials, config: &ClientConfig) -> Result<Self> {
		Ok(Self::with_http_client(
			credentials,
			Endpoints::public()?,
			ReqwestHttpClient::from_config(config)?,
			Arc::new(ReqwestTransportErrorMapper),
		))
	}
}
impl<C, M> Debug for AipClient<C, M>
where
	C: ?Sized + AipHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("AipClient")
			.field("credentials", &self.credentials)
			.field("endpoints", &self.endpoints)
			.field("auth_mode", &self.auth_mode())
			.finish()
	}
}
