//! Client-level error types shared across the token fetcher, signer, and endpoint calls.

// self
use crate::{_prelude::*, obs::CallStage};

/// Client-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Error code returned in place of a response when the transport fails.
pub const SDK_TIMEOUT_ERROR_CODE: &str = "SDK108";
/// Message paired with [`SDK_TIMEOUT_ERROR_CODE`].
pub const SDK_TIMEOUT_ERROR_MSG: &str = "connection or read data timeout";

/// Canonical client error exposed by public APIs.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Local configuration problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Transport failure (DNS, TCP, TLS, timeouts).
	#[error(transparent)]
	Transport(#[from] TransportError),
	/// Request signature could not be produced.
	#[error(transparent)]
	Sign(#[from] crate::sign::SignError),
	/// Response body could not be decoded.
	#[error(transparent)]
	Decode(#[from] DecodeError),
}
impl Error {
	/// Returns `true` when the error originated in the transport layer.
	pub fn is_transport(&self) -> bool {
		matches!(self, Self::Transport(_))
	}
}

/// Configuration and validation failures raised by the client.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
	/// A configured or caller-supplied URL cannot be parsed.
	#[error("URL `{url}` is invalid.")]
	InvalidUrl {
		/// Offending URL string.
		url: String,
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// URL parsed but cannot be used for requests (no host, not a base).
	#[error("URL `{url}` cannot be used as a request target.")]
	UnsupportedUrl {
		/// Offending URL string.
		url: String,
	},
	/// Proxy settings were rejected by the transport.
	#[error("Proxy `{url}` is invalid.")]
	InvalidProxy {
		/// Proxy URL string.
		url: String,
		/// Underlying transport failure.
		#[source]
		source: BoxError,
	},
	/// Header name or value cannot be sent over HTTP.
	#[error("Header `{name}` is invalid.")]
	InvalidHeader {
		/// Header name.
		name: String,
		/// Rejection reported by the header types.
		#[source]
		source: BoxError,
	},
	/// Two headers share a name once letter case is ignored.
	#[error("Header `{name}` is set more than once.")]
	DuplicateHeader {
		/// Lower-cased header name.
		name: String,
	},
	/// Request body could not be serialized to JSON.
	#[error("Request body could not be serialized to JSON.")]
	SerializeBody(#[from] serde_json::Error),
	/// Environment variable required for credentials is not set.
	#[error("Environment variable `{name}` is not set.")]
	MissingEnv {
		/// Variable name.
		name: &'static str,
	},
}
impl ConfigError {
	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}

	/// Wraps a URL parsing failure together with the offending input.
	pub fn invalid_url(url: impl Into<String>, source: url::ParseError) -> Self {
		Self::InvalidUrl { url: url.into(), source }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for ConfigError {
	fn from(e: ReqwestError) -> Self {
		Self::http_client_build(e)
	}
}

/// Transport-level failures (network, IO).
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Connect or read deadline elapsed.
	#[error("Timed out while calling {url} during the {stage} stage.")]
	Timeout {
		/// Pipeline stage the failure happened in.
		stage: CallStage,
		/// Target URL without query string.
		url: String,
		/// Transport-specific timeout error.
		#[source]
		source: BoxError,
	},
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while calling {url} during the {stage} stage.")]
	Network {
		/// Pipeline stage the failure happened in.
		stage: CallStage,
		/// Target URL without query string.
		url: String,
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// Underlying IO failure surfaced during transport.
	#[error("I/O error occurred during transport.")]
	Io(#[from] std::io::Error),
}
impl TransportError {
	/// Wraps a transport-specific timeout.
	pub fn timeout(
		stage: CallStage,
		url: &Url,
		src: impl 'static + Send + Sync + std::error::Error,
	) -> Self {
		Self::Timeout { stage, url: redact_query(url), source: Box::new(src) }
	}

	/// Wraps a transport-specific network error.
	pub fn network(
		stage: CallStage,
		url: &Url,
		src: impl 'static + Send + Sync + std::error::Error,
	) -> Self {
		Self::Network { stage, url: redact_query(url), source: Box::new(src) }
	}

	/// Stage the failure happened in, when the transport reported one.
	pub fn stage(&self) -> Option<CallStage> {
		match self {
			Self::Timeout { stage, .. } | Self::Network { stage, .. } => Some(*stage),
			Self::Io(_) => None,
		}
	}
}

/// Response decoding failures.
#[derive(Debug, ThisError)]
pub enum DecodeError {
	/// Body is not valid JSON.
	#[error("Response from {url} is not valid JSON (status {status}): {preview}")]
	Json {
		/// Target URL without query string.
		url: String,
		/// HTTP status code.
		status: u16,
		/// Leading part of the body for diagnostics.
		preview: String,
		/// Structured parsing failure.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
	},
}

/// Fixed error body produced by the SDK itself rather than the remote API.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
	/// SDK error code.
	pub error_code: String,
	/// Human readable message.
	pub error_msg: String,
}
impl ErrorResponse {
	/// Response returned when the connection or read timed out (or otherwise failed).
	pub fn timeout() -> Self {
		Self { error_code: SDK_TIMEOUT_ERROR_CODE.into(), error_msg: SDK_TIMEOUT_ERROR_MSG.into() }
	}

	/// Converts the response into the JSON shape callers receive from endpoint methods.
	pub fn into_value(self) -> serde_json::Value {
		let mut body = serde_json::Map::new();

		body.insert("error_code".into(), self.error_code.into());
		body.insert("error_msg".into(), self.error_msg.into());

		body.into()
	}
}

// Keeps credentials carried in query strings (`client_secret`, `access_token`) out of errors.
pub(crate) fn redact_query(url: &Url) -> String {
	let mut url = url.clone();

	url.set_query(None);

	url.to_string()
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn timeout_response_matches_fixed_shape() {
		let value = ErrorResponse::timeout().into_value();

		assert_eq!(
			value,
			serde_json::json!({
				"error_code": "SDK108",
				"error_msg": "connection or read data timeout",
			})
		);
	}

	#[test]
	fn transport_errors_drop_query_strings() {
		let url = Url::parse("https://aip.baidubce.com/oauth/2.0/token?client_secret=s3cr3t")
			.expect("Failed to parse token URL.");
		let err = TransportError::network(CallStage::Token, &url, std::io::Error::other("reset"));
		let rendered = err.to_string();

		assert!(rendered.contains("https://aip.baidubce.com/oauth/2.0/token"));
		assert!(rendered.contains("token stage"));
		assert!(!rendered.contains("s3cr3t"));
	}
}
