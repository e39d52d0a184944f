//! Transport configuration: timeouts and proxies.
//!
//! [`ClientConfig`] is plain serde data so it can be loaded from whatever configuration format the
//! host application already uses, or assembled with the chaining setters.

// std
use std::time::Duration as StdDuration;
// self
use crate::_prelude::*;

/// Connection, read, and proxy settings handed to the HTTP transport.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
	/// Deadline for establishing the TCP/TLS connection, in milliseconds.
	pub connection_timeout_ms: Option<u64>,
	/// Deadline for the whole request (including reading the body), in milliseconds.
	pub socket_timeout_ms: Option<u64>,
	/// Proxies applied in order.
	pub proxies: Vec<ProxyConfig>,
}
impl ClientConfig {
	/// Sets the connection timeout.
	pub fn with_connection_timeout_ms(mut self, ms: u64) -> Self {
		self.connection_timeout_ms = Some(ms);

		self
	}

	/// Sets the socket (read) timeout.
	pub fn with_socket_timeout_ms(mut self, ms: u64) -> Self {
		self.socket_timeout_ms = Some(ms);

		self
	}

	/// Appends a proxy.
	pub fn with_proxy(mut self, proxy: ProxyConfig) -> Self {
		self.proxies.push(proxy);

		self
	}

	/// Connection timeout as a [`std::time::Duration`].
	pub fn connection_timeout(&self) -> Option<StdDuration> {
		self.connection_timeout_ms.map(StdDuration::from_millis)
	}

	/// Socket timeout as a [`std::time::Duration`].
	pub fn socket_timeout(&self) -> Option<StdDuration> {
		self.socket_timeout_ms.map(StdDuration::from_millis)
	}
}

/// Which request schemes a proxy intercepts.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProxyScheme {
	#[default]
	/// Every request.
	All,
	/// Plain HTTP requests only.
	Http,
	/// HTTPS requests only.
	Https,
}

/// A single proxy entry.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProxyConfig {
	/// Proxy URL, e.g. `http://10.0.0.1:3128`.
	pub url: String,
	/// Request schemes routed through the proxy.
	#[serde(default)]
	pub scheme: ProxyScheme,
	/// Basic-auth user name.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub username: Option<String>,
	/// Basic-auth password.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub password: Option<String>,
}
impl ProxyConfig {
	/// Creates a proxy entry that applies to every request.
	pub fn new(url: impl Into<String>) -> Self {
		Self { url: url.into(), scheme: ProxyScheme::All, username: None, password: None }
	}

	/// Restricts the proxy to one request scheme.
	pub fn scheme(mut self, scheme: ProxyScheme) -> Self {
		self.scheme = scheme;

		self
	}

	/// Attaches basic-auth credentials.
	pub fn basic_auth(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
		self.username = Some(username.into());
		self.password = Some(password.into());

		self
	}
}
impl Debug for ProxyConfig {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("ProxyConfig")
			.field("url", &self.url)
			.field("scheme", &self.scheme)
			.field("username", &self.username)
			.field("password_set", &self.password.is_some())
			.finish()
	}
}
