//! Transport primitives for AIP calls.
//!
//! The module exposes [`AipHttpClient`] so downstream crates can plug in their own HTTP stack
//! (or a fake one in tests). The client only ever asks the transport to execute a fully built
//! [`HttpRequest`]: URL with query string, validated headers, and an optional body. Transport
//! failures stay in the transport's own error type until a
//! [`TransportErrorMapper`](crate::transport::TransportErrorMapper) classifies them.

// std
#[cfg(feature = "reqwest")] use std::ops::Deref;
// crates.io
use ::http::{HeaderMap, HeaderName, HeaderValue};
#[cfg(feature = "reqwest")] use reqwest::{Method, Proxy};
// self
use crate::{_prelude::*, error::ConfigError};
#[cfg(feature = "reqwest")] use crate::config::{ClientConfig, ProxyConfig, ProxyScheme};

/// Boxed future returned by [`AipHttpClient::execute`].
pub type HttpFuture<'a, E> = Pin<Box<dyn Future<Output = Result<HttpResponse, E>> + 'a + Send>>;

/// HTTP methods used by the client.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HttpMethod {
	/// `GET`, used by the token endpoint.
	Get,
	/// `POST`, used by every API endpoint.
	Post,
}
impl HttpMethod {
	/// Upper-case method name as it appears on the wire and in signatures.
	pub const fn as_str(self) -> &'static str {
		match self {
			HttpMethod::Get => "GET",
			HttpMethod::Post => "POST",
		}
	}
}
impl Display for HttpMethod {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Fully assembled outbound request.
#[derive(Clone, Debug)]
pub struct HttpRequest {
	/// Request method.
	pub method: HttpMethod,
	/// Target URL including the query string.
	pub url: Url,
	/// Validated headers, at most one value per name.
	pub headers: HeaderMap,
	/// Raw body bytes.
	pub body: Option<Vec<u8>>,
}
impl HttpRequest {
	/// Creates a bodiless `GET` request.
	pub fn get(url: Url) -> Self {
		Self { method: HttpMethod::Get, url, headers: HeaderMap::new(), body: None }
	}

	/// Creates a `POST` request with the provided body.
	pub fn post(url: Url, body: Vec<u8>) -> Self {
		Self { method: HttpMethod::Post, url, headers: HeaderMap::new(), body: Some(body) }
	}

	/// Replaces the header map.
	pub fn with_headers(mut self, headers: HeaderMap) -> Self {
		self.headers = headers;

		self
	}

	/// Case-insensitive header lookup; values that are not visible ASCII read as `None`.
	pub fn header(&self, name: &str) -> Option<&str> {
		self.headers.get(name).and_then(|value| value.to_str().ok())
	}
}

/// Response as seen by the pipeline: status plus raw body.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HttpResponse {
	/// HTTP status code.
	pub status: u16,
	/// Raw body bytes.
	pub body: Vec<u8>,
}
impl HttpResponse {
	/// Creates a response.
	pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
		Self { status, body: body.into() }
	}
}

/// Abstraction over HTTP transports capable of executing AIP calls.
///
/// Implementations must be `Send + Sync + 'static` so one transport can back many clients, and
/// the futures they return must be `Send` so calls can hop executors. Non-2xx statuses are not
/// errors: the API reports failures inside the JSON body, so the transport hands every response
/// back as-is and only fails when no response was received.
pub trait AipHttpClient
where
	Self: 'static + Send + Sync,
{
	/// Concrete error emitted by the underlying transport.
	type TransportError: 'static + Send + Sync + StdError;

	/// Sends `request` and collects the full response body.
	fn execute(&self, request: HttpRequest) -> HttpFuture<'_, Self::TransportError>;
}

/// Thin wrapper around [`ReqwestClient`] so shared HTTP behavior lives in one place.
#[cfg(feature = "reqwest")]
#[derive(Clone, Debug, Default)]
pub struct ReqwestHttpClient(pub ReqwestClient);
#[cfg(feature = "reqwest")]
impl ReqwestHttpClient {
	/// Wraps an existing reqwest [`ReqwestClient`].
	pub fn with_client(client: ReqwestClient) -> Self {
		Self(client)
	}

	/// Builds a reqwest client honoring the configured timeouts and proxies.
	pub fn from_config(config: &ClientConfig) -> Result<Self, ConfigError> {
		Ok(Self(configure(ReqwestClient::builder(), config)?.build()?))
	}
}
#[cfg(feature = "reqwest")]
impl AsRef<ReqwestClient> for ReqwestHttpClient {
	fn as_ref(&self) -> &ReqwestClient {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl Deref for ReqwestHttpClient {
	type Target = ReqwestClient;

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl AipHttpClient for ReqwestHttpClient {
	type TransportError = ReqwestError;

	fn execute(&self, request: HttpRequest) -> HttpFuture<'_, Self::TransportError> {
		let client = self.0.clone();

		Box::pin(async move {
			let method = match request.method {
				HttpMethod::Get => Method::GET,
				HttpMethod::Post => Method::POST,
			};
			let mut builder = client.request(method, request.url).headers(request.headers);

			if let Some(body) = request.body {
				builder = builder.body(body);
			}

			let response = builder.send().await?;
			let status = response.status().as_u16();
			let body = response.bytes().await?.to_vec();

			Ok::<_, ReqwestError>(HttpResponse { status, body })
		})
	}
}

/// Applies [`ClientConfig`] to a reqwest builder.
///
/// Exposed so callers that need extra reqwest settings (custom roots, user agent) can start from
/// their own builder and still pick up the shared timeout and proxy handling.
#[cfg(feature = "reqwest")]
pub fn configure(
	mut builder: reqwest::ClientBuilder,
	config: &ClientConfig,
) -> Result<reqwest::ClientBuilder, ConfigError> {
	if let Some(timeout) = config.connection_timeout() {
		builder = builder.connect_timeout(timeout);
	}
	if let Some(timeout) = config.socket_timeout() {
		builder = builder.timeout(timeout);
	}

	for proxy in &config.proxies {
		builder = builder.proxy(build_proxy(proxy)?);
	}

	Ok(builder)
}

#[cfg(feature = "reqwest")]
fn build_proxy(config: &ProxyConfig) -> Result<Proxy, ConfigError> {
	let proxy = match config.scheme {
		ProxyScheme::All => Proxy::all(&config.url),
		ProxyScheme::Http => Proxy::http(&config.url),
		ProxyScheme::Https => Proxy::https(&config.url),
	}
	.map_err(|e| ConfigError::InvalidProxy { url: config.url.clone(), source: Box::new(e) })?;

	Ok(match (&config.username, &config.password) {
		(Some(username), password) =>
			proxy.basic_auth(username, password.as_deref().unwrap_or_default()),
		(None, _) => proxy,
	})
}

/// Converts pipeline headers into a [`HeaderMap`].
///
/// Fails on names or values HTTP cannot carry, and on two names that differ only in letter case:
/// the wire keeps one of them while a signature would cover both.
pub fn header_map(headers: &BTreeMap<String, String>) -> Result<HeaderMap, ConfigError> {
	let mut map = HeaderMap::with_capacity(headers.len());

	for (name, value) in headers {
		let header_name = HeaderName::from_bytes(name.as_bytes()).map_err(|e| {
			ConfigError::InvalidHeader { name: name.clone(), source: Box::new(e) }
		})?;
		let header_value = HeaderValue::from_str(value).map_err(|e| {
			ConfigError::InvalidHeader { name: name.clone(), source: Box::new(e) }
		})?;

		if map.contains_key(&header_name) {
			return Err(ConfigError::DuplicateHeader { name: header_name.as_str().to_owned() });
		}

		map.insert(header_name, header_value);
	}

	Ok(map)
}
