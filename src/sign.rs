//! BCE `bce-auth-v1` request signing for accounts without the `brain_all_scope` grant.
//!
//! The signature covers the HTTP method, the canonical path, the canonical query string, and the
//! selected headers:
//!
//! ```text
//! prefix        = bce-auth-v1/{access_key}/{timestamp}/{expiration}
//! signing_key   = hex(HMAC-SHA256(secret_key, prefix))
//! signature     = hex(HMAC-SHA256(signing_key, "{METHOD}\n{uri}\n{query}\n{headers}"))
//! authorization = {prefix}/{signed_headers}/{signature}
//! ```

pub mod canonical;

pub use canonical::*;

// crates.io
use hmac::{Hmac, Mac, digest::InvalidLength};
use sha2::Sha256;
use time::{UtcOffset, format_description::FormatItem, macros::format_description};
// self
use crate::{_prelude::*, auth::Credentials};

type HmacSha256 = Hmac<Sha256>;

/// Authentication scheme version string.
pub const BCE_AUTH_VERSION: &str = "bce-auth-v1";
/// Default validity window of a signature.
pub const DEFAULT_EXPIRATION_IN_SECONDS: u32 = 1800;
/// Header carrying the host the request is sent to.
pub const HOST_HEADER: &str = "Host";
/// Header carrying the signing timestamp.
pub const BCE_DATE_HEADER: &str = "x-bce-date";
/// Header carrying the signature.
pub const AUTHORIZATION_HEADER: &str = "authorization";

const BCE_TIMESTAMP: &[FormatItem<'static>] =
	format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]Z");

/// Failures while producing a signature.
#[derive(Debug, ThisError)]
pub enum SignError {
	/// HMAC rejected the key.
	#[error("HMAC key has an invalid length.")]
	InvalidKey(#[from] InvalidLength),
	/// Timestamp could not be rendered.
	#[error("Signing timestamp could not be formatted.")]
	Timestamp(#[from] time::error::Format),
}

/// Tunables of a single signature.
#[derive(Clone, Debug)]
pub struct SignOptions {
	/// Signing instant; rendered in UTC.
	pub timestamp: OffsetDateTime,
	/// Seconds the signature stays valid.
	pub expiration_in_seconds: u32,
	/// Header names to sign; `None` signs every header present on the request.
	pub headers_to_sign: Option<Vec<String>>,
}
impl SignOptions {
	/// Options for a signature taken at `timestamp`.
	pub fn at(timestamp: OffsetDateTime) -> Self {
		Self {
			timestamp,
			expiration_in_seconds: DEFAULT_EXPIRATION_IN_SECONDS,
			headers_to_sign: None,
		}
	}
}
impl Default for SignOptions {
	fn default() -> Self {
		Self::at(OffsetDateTime::now_utc())
	}
}

/// Signs requests with an account's API key and secret key.
#[derive(Clone, Copy, Debug)]
pub struct BceSigner<'a> {
	credentials: &'a Credentials,
}
impl<'a> BceSigner<'a> {
	/// Creates a signer borrowing the account credentials.
	pub fn new(credentials: &'a Credentials) -> Self {
		Self { credentials }
	}

	/// Adds `Host`, `x-bce-date`, and `authorization` to `headers` for a request to `url`.
	///
	/// Existing headers with those names (in any letter case) are replaced. Query parameters of
	/// `url` are part of the signature, so `url` must already carry every parameter that will be
	/// sent.
	pub fn sign(
		&self,
		method: &str,
		url: &Url,
		headers: &mut BTreeMap<String, String>,
		options: &SignOptions,
	) -> Result<(), SignError> {
		let timestamp = format_timestamp(options.timestamp)?;

		headers.retain(|name, _| {
			![HOST_HEADER, BCE_DATE_HEADER, AUTHORIZATION_HEADER]
				.iter()
				.any(|reserved| name.trim().eq_ignore_ascii_case(reserved))
		});
		headers.insert(HOST_HEADER.into(), host_header(url));
		headers.insert(BCE_DATE_HEADER.into(), timestamp);

		let params = url.query_pairs().into_owned().collect::<Vec<_>>();
		let names = match &options.headers_to_sign {
			Some(names) => names.clone(),
			None => headers.keys().cloned().collect(),
		};
		let options = SignOptions { headers_to_sign: Some(names), ..options.clone() };
		let authorization = self.authorization(method, url.path(), &params, headers, &options)?;

		headers.insert(AUTHORIZATION_HEADER.into(), authorization);

		Ok(())
	}

	/// Computes the `authorization` header value.
	pub fn authorization(
		&self,
		method: &str,
		path: &str,
		params: &[(String, String)],
		headers: &BTreeMap<String, String>,
		options: &SignOptions,
	) -> Result<String, SignError> {
		let timestamp = format_timestamp(options.timestamp)?;
		let prefix = format!(
			"{BCE_AUTH_VERSION}/{}/{timestamp}/{}",
			self.credentials.api_key(),
			options.expiration_in_seconds
		);
		let signing_key = hmac_hex(self.credentials.secret_key().expose().as_bytes(), &prefix)?;
		let canonical_headers = CanonicalHeaders::new(headers, options.headers_to_sign.as_deref());
		let canonical_request = format!(
			"{}\n{}\n{}\n{}",
			method.to_ascii_uppercase(),
			canonical_uri(path),
			canonical_query(params),
			canonical_headers.canonical
		);
		let signature = hmac_hex(signing_key.as_bytes(), &canonical_request)?;

		Ok(format!("{prefix}/{}/{signature}", canonical_headers.signed_headers()))
	}
}

/// Renders `instant` as `YYYY-MM-DDTHH:MM:SSZ` in UTC.
pub fn format_timestamp(instant: OffsetDateTime) -> Result<String, SignError> {
	Ok(instant.to_offset(UtcOffset::UTC).format(BCE_TIMESTAMP)?)
}

/// `host[:port]` as it should appear in the `Host` header.
pub fn host_header(url: &Url) -> String {
	let host = url.host_str().unwrap_or_default();

	match url.port() {
		Some(port) => format!("{host}:{port}"),
		None => host.to_owned(),
	}
}

fn hmac_hex(key: &[u8], message: &str) -> Result<String, SignError> {
	let mut mac = <HmacSha256 as Mac>::new_from_slice(key)?;

	mac.update(message.as_bytes());

	Ok(hex::encode(mac.finalize().into_bytes()))
}
