//! Canonical forms of the request parts covered by a `bce-auth-v1` signature.

// std
use std::collections::BTreeSet;
// self
use crate::_prelude::*;

/// Headers signed when the caller does not name an explicit list (besides every `x-bce-*`).
pub const DEFAULT_HEADERS_TO_SIGN: [&str; 4] =
	["host", "content-length", "content-type", "content-md5"];
/// Prefix of vendor headers that are always signed by default.
pub const BCE_HEADER_PREFIX: &str = "x-bce-";

/// RFC 3986 percent-encoding: only `A-Z a-z 0-9 - _ . ~` pass through.
pub fn uri_encode(value: &str) -> String {
	urlencoding::encode(value).into_owned()
}

/// Encodes a URL path segment by segment, keeping the `/` separators.
///
/// Segments are decoded first so an already-encoded path is not encoded twice.
pub fn canonical_uri(path: &str) -> String {
	if path.is_empty() {
		return "/".into();
	}

	let encoded = path
		.split('/')
		.map(|segment| match urlencoding::decode(segment) {
			Ok(decoded) => uri_encode(&decoded),
			Err(_) => uri_encode(segment),
		})
		.collect::<Vec<_>>()
		.join("/");

	if encoded.starts_with('/') { encoded } else { format!("/{encoded}") }
}

/// Sorted `key=value` pairs joined by `&`, skipping any `authorization` parameter.
pub fn canonical_query(params: &[(String, String)]) -> String {
	let mut pairs = params
		.iter()
		.filter(|(key, _)| !key.eq_ignore_ascii_case("authorization"))
		.map(|(key, value)| format!("{}={}", uri_encode(key), uri_encode(value)))
		.collect::<Vec<_>>();

	pairs.sort();

	pairs.join("&")
}

/// Canonical header block together with the names it covers.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CanonicalHeaders {
	/// Sorted `name:value` lines joined by `\n`.
	pub canonical: String,
	/// Sorted, lower-cased names of the signed headers.
	pub signed: Vec<String>,
}
impl CanonicalHeaders {
	/// Selects and canonicalizes the headers to sign.
	///
	/// Headers with blank values are never signed. With `headers_to_sign` unset, the
	/// [`DEFAULT_HEADERS_TO_SIGN`] plus every `x-bce-*` header are used.
	pub fn new(headers: &BTreeMap<String, String>, headers_to_sign: Option<&[String]>) -> Self {
		let wanted = headers_to_sign.map(|names| {
			names.iter().map(|name| name.trim().to_ascii_lowercase()).collect::<BTreeSet<_>>()
		});
		let mut lines = Vec::new();
		let mut signed = BTreeSet::new();

		for (name, value) in headers {
			let value = value.trim();

			if value.is_empty() {
				continue;
			}

			let name = name.trim().to_ascii_lowercase();
			let selected = match &wanted {
				Some(wanted) => wanted.contains(&name),
				None => is_default_header_to_sign(&name),
			};

			if selected {
				lines.push(format!("{}:{}", uri_encode(&name), uri_encode(value)));
				signed.insert(name);
			}
		}

		lines.sort();

		Self { canonical: lines.join("\n"), signed: signed.into_iter().collect() }
	}

	/// Signed header names joined by `;`.
	pub fn signed_headers(&self) -> String {
		self.signed.join(";")
	}
}

fn is_default_header_to_sign(lower_name: &str) -> bool {
	DEFAULT_HEADERS_TO_SIGN.contains(&lower_name) || lower_name.starts_with(BCE_HEADER_PREFIX)
}
