//! Endpoint table for the AIP HTTP API.
//!
//! [`Endpoints::public`] points at the public `aip.baidubce.com` host. [`EndpointsBuilder`]
//! overrides single endpoints or rebases the whole table onto another origin (a private
//! deployment or a mock server) while keeping the standard paths.

// self
use crate::{_prelude::*, error::ConfigError};

/// Public API origin.
pub const DEFAULT_BASE_URL: &str = "https://aip.baidubce.com";
/// OAuth token path.
pub const TOKEN_PATH: &str = "/oauth/2.0/token";
/// Feedback report path.
pub const FEEDBACK_PATH: &str = "/rpc/2.0/feedback/v1/report";
/// Face comparison path.
pub const FACE_MATCH_PATH: &str = "/rest/2.0/face/v3/match";
/// Face detection path.
pub const FACE_DETECT_PATH: &str = "/rest/2.0/face/v3/detect";

/// Resolved endpoint URLs.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Endpoints {
	/// OAuth client-credentials token endpoint.
	pub token: Url,
	/// Feedback report endpoint.
	pub feedback: Url,
	/// Face comparison endpoint.
	pub face_match: Url,
	/// Face detection endpoint.
	pub face_detect: Url,
}
impl Endpoints {
	/// Creates a builder seeded with the public endpoints.
	pub fn builder() -> EndpointsBuilder {
		EndpointsBuilder::default()
	}

	/// Builds the public endpoint table.
	pub fn public() -> Result<Self, ConfigError> {
		Self::builder().build()
	}

	/// Builds the standard endpoint table under `base`.
	pub fn with_base(base: &str) -> Result<Self, ConfigError> {
		Self::builder().base_url(base).build()
	}
}
/// Builder for [`Endpoints`].
#[derive(Debug, Default)]
pub struct EndpointsBuilder {
	/// Origin every unset endpoint is resolved against.
	pub base_url: Option<String>,
	/// Explicit token endpoint.
	pub token: Option<String>,
	/// Explicit feedback endpoint.
	pub feedback: Option<String>,
	/// Explicit face comparison endpoint.
	pub face_match: Option<String>,
	/// Explicit face detection endpoint.
	pub face_detect: Option<String>,
}
impl EndpointsBuilder {
	/// Rebases every endpoint that is not set explicitly.
	pub fn base_url(mut self, base: impl Into<String>) -> Self {
		self.base_url = Some(base.into());

		self
	}

	/// Overrides the token endpoint.
	pub fn token(mut self, url: impl Into<String>) -> Self {
		self.token = Some(url.into());

		self
	}

	/// Overrides the feedback endpoint.
	pub fn feedback(mut self, url: impl Into<String>) -> Self {
		self.feedback = Some(url.into());

		self
	}

	/// Overrides the face comparison endpoint.
	pub fn face_match(mut self, url: impl Into<String>) -> Self {
		self.face_match = Some(url.into());

		self
	}

	/// Overrides the face detection endpoint.
	pub fn face_detect(mut self, url: impl Into<String>) -> Self {
		self.face_detect = Some(url.into());

		self
	}

	/// Consumes the builder and validates every URL.
	pub fn build(self) -> Result<Endpoints, ConfigError> {
		let base = parse_target(self.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL))?;

		Ok(Endpoints {
			token: resolve(&base, self.token, TOKEN_PATH)?,
			feedback: resolve(&base, self.feedback, FEEDBACK_PATH)?,
			face_match: resolve(&base, self.face_match, FACE_MATCH_PATH)?,
			face_detect: resolve(&base, self.face_detect, FACE_DETECT_PATH)?,
		})
	}
}

/// Parses a request target, rejecting URLs without a host.
pub(crate) fn parse_target(raw: &str) -> Result<Url, ConfigError> {
	let url = Url::parse(raw).map_err(|source| ConfigError::invalid_url(raw, source))?;

	if url.cannot_be_a_base() || url.host_str().is_none() {
		return Err(ConfigError::UnsupportedUrl { url: raw.to_owned() });
	}

	Ok(url)
}

fn resolve(base: &Url, explicit: Option<String>, path: &str) -> Result<Url, ConfigError> {
	match explicit {
		Some(raw) => parse_target(&raw),
		None => base.join(path).map_err(|source| ConfigError::invalid_url(path, source)),
	}
}
