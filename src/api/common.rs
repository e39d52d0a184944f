//! The shared request pipeline every endpoint method goes through.

// crates.io
use serde_json::Value;
// self
use crate::{
	_prelude::*,
	api::{AipClient, SDK_NAME, SDK_VERSION, token::Authentication},
	auth::AuthMode,
	endpoint,
	error::{ConfigError, DecodeError, ErrorResponse, redact_query},
	http::{self, AipHttpClient, HttpMethod, HttpRequest, HttpResponse},
	obs::{self, CallKind, CallOutcome, CallSpan, CallStage, warn_event},
	sign::{BceSigner, SignOptions},
	transport::TransportErrorMapper,
};

const BODY_PREVIEW_LIMIT: usize = 256;
const CONTENT_TYPE_HEADER: &str = "Content-Type";
const JSON_CONTENT_TYPE: &str = "application/json";

/// One API call as assembled by an endpoint method.
#[derive(Clone, Debug, PartialEq)]
pub struct AipRequest {
	/// Endpoint family, used for spans and metrics.
	pub kind: CallKind,
	/// Target URL; may already carry query parameters.
	pub url: Url,
	/// Extra query parameters appended after the URL's own.
	pub params: Vec<(String, String)>,
	/// Caller headers.
	pub headers: BTreeMap<String, String>,
	/// JSON body.
	pub body: Value,
}
impl AipRequest {
	/// Creates a request with no extra params or headers.
	pub fn new(kind: CallKind, url: Url, body: Value) -> Self {
		Self { kind, url, params: Vec::new(), headers: BTreeMap::new(), body }
	}

	/// Appends a query parameter.
	pub fn with_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
		self.params.push((key.into(), value.into()));

		self
	}

	/// Sets a header.
	pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
		self.headers.insert(name.into(), value.into());

		self
	}

	/// Merges a header map into the request.
	pub fn with_headers(mut self, headers: BTreeMap<String, String>) -> Self {
		self.headers.extend(headers);

		self
	}
}

impl<C, M> AipClient<C, M>
where
	C: ?Sized + AipHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	/// POSTs `body` as JSON to an arbitrary AIP URL.
	pub async fn post<B>(
		&self,
		url: &str,
		body: &B,
		headers: BTreeMap<String, String>,
	) -> Result<Value>
	where
		B: ?Sized + Serialize,
	{
		let url = endpoint::parse_target(url)?;
		let body = serde_json::to_value(body).map_err(ConfigError::from)?;

		self.request(AipRequest::new(CallKind::Generic, url, body).with_headers(headers)).await
	}

	/// Runs the pipeline and reports transport failures as the SDK108 response.
	///
	/// Connection and read failures (during the token fetch or the call itself) come back as
	/// `Ok({"error_code": "SDK108", "error_msg": "connection or read data timeout"})`. API-level
	/// errors are part of the decoded body and pass through untouched. Configuration, signing, and
	/// decoding failures are still returned as `Err`.
	pub async fn request(&self, request: AipRequest) -> Result<Value> {
		match self.execute(request).await {
			Err(Error::Transport(e)) => {
				warn_event!(error = %e, "Transport failure reported as SDK108.");

				#[cfg(not(feature = "tracing"))]
				let _ = e;

				Ok(ErrorResponse::timeout().into_value())
			},
			other => other,
		}
	}

	/// Runs the pipeline and returns transport failures as [`Error::Transport`].
	pub async fn execute(&self, request: AipRequest) -> Result<Value> {
		let kind = request.kind;
		let span = CallSpan::new(kind, "execute");

		obs::record_call_outcome(kind, CallOutcome::Attempt);

		let result = span
			.instrument(async move {
				let authentication = self.authenticate().await?;
				let http_request = self.prepare(request, &authentication)?;
				let url = http_request.url.clone();
				let response = self.http_client.execute(http_request).await.map_err(|e| {
					self.transport_mapper.map_transport_error(CallStage::Api, &url, e)
				})?;

				decode_body(&url, &response)
			})
			.await;

		match &result {
			Ok(_) => obs::record_call_outcome(kind, CallOutcome::Success),
			Err(_) => obs::record_call_outcome(kind, CallOutcome::Failure),
		}

		result
	}

	/// Turns an [`AipRequest`] into the exact HTTP request sent for `authentication`.
	///
	/// Adds the `access_token` (token mode) and SDK marker parameters, defaults the content type
	/// to JSON, and signs the request in [`AuthMode::Signature`]. Headers HTTP cannot carry, or
	/// names repeated in another letter case, are rejected with a [`ConfigError`].
	pub fn prepare(
		&self,
		request: AipRequest,
		authentication: &Authentication,
	) -> Result<HttpRequest> {
		let AipRequest { mut url, mut params, mut headers, body, .. } = request;

		if let Some(access_token) = authentication.access_token() {
			params.push(("access_token".into(), access_token.into()));
		}

		params.push(("aipSdk".into(), SDK_NAME.into()));
		params.push(("aipSdkVersion".into(), SDK_VERSION.into()));

		url.query_pairs_mut().extend_pairs(params.iter().map(|(k, v)| (k.as_str(), v.as_str())));

		if !headers.keys().any(|name| name.trim().eq_ignore_ascii_case(CONTENT_TYPE_HEADER)) {
			headers.insert(CONTENT_TYPE_HEADER.into(), JSON_CONTENT_TYPE.into());
		}
		if authentication.mode == AuthMode::Signature {
			BceSigner::new(&self.credentials).sign(
				HttpMethod::Post.as_str(),
				&url,
				&mut headers,
				&SignOptions::default(),
			)?;
		}

		let headers = http::header_map(&headers)?;
		let body = serde_json::to_vec(&body).map_err(ConfigError::from)?;

		Ok(HttpRequest::post(url, body).with_headers(headers))
	}
}

/// Decodes any JSON document, regardless of the HTTP status.
pub(crate) fn decode_body(url: &Url, response: &HttpResponse) -> Result<Value> {
	let mut de = serde_json::Deserializer::from_slice(&response.body);

	serde_path_to_error::deserialize(&mut de).map_err(|source| {
		DecodeError::Json {
			url: redact_query(url),
			status: response.status,
			preview: body_preview(&response.body),
			source,
		}
		.into()
	})
}

fn body_preview(body: &[u8]) -> String {
	let end = body.len().min(BODY_PREVIEW_LIMIT);

	String::from_utf8_lossy(&body[..end]).into_owned()
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	fn url() -> Url {
		Url::parse("https://aip.baidubce.com/rest/2.0/face/v3/match").expect("Failed to parse URL.")
	}

	#[test]
	fn decode_body_accepts_any_json_document() {
		let body = r#"{"error_code":0,"result":{"score":99.5}}"#;
		let object = decode_body(&url(), &HttpResponse::new(200, body))
			.expect("Object bodies should decode.");
		let array = decode_body(&url(), &HttpResponse::new(500, "[1,\"two\",null]"))
			.expect("Array bodies should decode even with error statuses.");

		assert_eq!(object["result"]["score"], serde_json::json!(99.5));
		assert_eq!(array, serde_json::json!([1, "two", null]));
	}

	#[test]
	fn decode_body_reports_malformed_json() {
		let err = decode_body(&url(), &HttpResponse::new(502, "<html>bad gateway</html>"))
			.expect_err("HTML bodies must not decode.");

		match err {
			Error::Decode(DecodeError::Json { status, preview, url, .. }) => {
				assert_eq!(status, 502);
				assert_eq!(preview, "<html>bad gateway</html>");
				assert_eq!(url, "https://aip.baidubce.com/rest/2.0/face/v3/match");
			},
			other => panic!("Unexpected error variant: {other:?}."),
		}
	}

	#[test]
	fn request_builders_accumulate() {
		let request = AipRequest::new(CallKind::Generic, url(), Value::Null)
			.with_param("q", "1")
			.with_header("X-A", "1")
			.with_headers(BTreeMap::from([("X-B".to_owned(), "2".to_owned())]));

		assert_eq!(request.params, vec![("q".to_owned(), "1".to_owned())]);
		assert_eq!(request.headers.len(), 2);
	}
}
