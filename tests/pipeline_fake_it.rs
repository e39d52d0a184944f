// std
use std::{io, sync::Arc};
// crates.io
use parking_lot::Mutex;
use serde_json::{Value, json};
// self
use aip_client::{
	api::{AipClient, AipRequest, MatchImage},
	auth::{AuthMode, Credentials},
	endpoint::Endpoints,
	error::{ConfigError, Error},
	http::{AipHttpClient, HttpFuture, HttpMethod, HttpRequest, HttpResponse},
	obs::{CallKind, CallStage},
	transport::NetworkErrorMapper,
};

/// Transport that records every request and answers from a fixed script.
#[derive(Default)]
struct ScriptedTransport {
	token_body: Option<&'static str>,
	api_body: &'static str,
	fail_api: bool,
	requests: Mutex<Vec<HttpRequest>>,
}
impl ScriptedTransport {
	fn new(token_body: &'static str, api_body: &'static str) -> Self {
		Self { token_body: Some(token_body), api_body, ..Default::default() }
	}

	fn requests(&self) -> Vec<HttpRequest> {
		self.requests.lock().clone()
	}
}
impl AipHttpClient for ScriptedTransport {
	type TransportError = io::Error;

	fn execute(&self, request: HttpRequest) -> HttpFuture<'_, Self::TransportError> {
		let is_token = request.url.path() == "/oauth/2.0/token";

		self.requests.lock().push(request);

		Box::pin(async move {
			match (is_token, self.token_body) {
				(true, Some(body)) => Ok(HttpResponse::new(200, body)),
				(true, None) => Err(io::Error::new(io::ErrorKind::TimedOut, "token timed out")),
				(false, _) if self.fail_api =>
					Err(io::Error::new(io::ErrorKind::ConnectionReset, "connection reset")),
				(false, _) => Ok(HttpResponse::new(200, self.api_body)),
			}
		})
	}
}

type ScriptedClient = AipClient<ScriptedTransport, NetworkErrorMapper>;

fn client(transport: &Arc<ScriptedTransport>) -> ScriptedClient {
	ScriptedClient::with_http_client(
		Credentials::new("10000000", "ak-test", "sk-test"),
		Endpoints::public().expect("Public endpoints should build."),
		transport.clone(),
		Arc::new(NetworkErrorMapper),
	)
}

fn query(request: &HttpRequest, key: &str) -> Option<String> {
	request.url.query_pairs().find(|(k, _)| k == key).map(|(_, v)| v.into_owned())
}

fn timeout_value() -> Value {
	json!({ "error_code": "SDK108", "error_msg": "connection or read data timeout" })
}

#[tokio::test]
async fn token_request_uses_client_credentials_grant() {
	let transport = Arc::new(ScriptedTransport::new(r#"{"scope":"public"}"#, "{}"));
	let _ = client(&transport).report(&json!([])).await.expect("Report should succeed.");
	let requests = transport.requests();
	let token = &requests[0];

	assert_eq!(token.method, HttpMethod::Get);
	assert_eq!(token.body, None);
	assert_eq!(query(token, "grant_type").as_deref(), Some("client_credentials"));
	assert_eq!(query(token, "client_id").as_deref(), Some("ak-test"));
	assert_eq!(query(token, "client_secret").as_deref(), Some("sk-test"));
}

#[tokio::test]
async fn token_mode_never_signs() {
	let transport = Arc::new(ScriptedTransport::new(
		r#"{"access_token":"24.abc","scope":"brain_all_scope vis-faceverify_faceverify"}"#,
		r#"{"result":null}"#,
	));
	let client = client(&transport);
	let value = client
		.face_match(&[MatchImage::face_token("a"), MatchImage::face_token("b")])
		.await
		.expect("Face match should succeed.");
	let requests = transport.requests();
	let api = &requests[1];

	assert_eq!(value, json!({ "result": null }));
	assert_eq!(requests.len(), 2);
	assert_eq!(api.method, HttpMethod::Post);
	assert_eq!(api.url.path(), "/rest/2.0/face/v3/match");
	assert_eq!(query(api, "access_token").as_deref(), Some("24.abc"));
	assert_eq!(query(api, "aipSdk").as_deref(), Some("rust"));
	assert_eq!(query(api, "aipSdkVersion").as_deref(), Some(client.version()));
	assert_eq!(api.header("content-type"), Some("application/json"));
	assert_eq!(api.header("authorization"), None);
	assert_eq!(api.header("x-bce-date"), None);
	assert_eq!(client.auth_mode(), Some(AuthMode::AccessToken));
}

#[tokio::test]
async fn signature_mode_signs_and_omits_access_token() {
	let transport = Arc::new(ScriptedTransport::new(
		r#"{"access_token":"24.abc","scope":"public"}"#,
		r#"{"error_code":0}"#,
	));
	let client = client(&transport);
	let request = AipRequest::new(
		CallKind::Generic,
		client.endpoints.face_match.clone(),
		json!([{ "image": "a", "image_type": "FACE_TOKEN" }]),
	)
	.with_header("content-type", "application/json; charset=utf-8");
	let _ = client.request(request).await.expect("Signed request should succeed.");
	let requests = transport.requests();
	let api = &requests[1];
	let authorization = api.header("authorization").expect("Signed requests carry authorization.");

	assert_eq!(query(api, "access_token"), None);
	assert_eq!(api.header("host"), Some("aip.baidubce.com"));
	assert!(api.header("x-bce-date").is_some());
	assert!(authorization.starts_with("bce-auth-v1/ak-test/"));
	assert!(authorization.contains("/1800/content-type;host;x-bce-date/"));
	assert_eq!(api.header("content-type"), Some("application/json; charset=utf-8"));
	assert_eq!(api.headers.get_all("content-type").iter().count(), 1);
	assert_eq!(client.auth_mode(), Some(AuthMode::Signature));
}

#[tokio::test]
async fn undecodable_token_falls_back_to_signature() {
	let transport = Arc::new(ScriptedTransport::new("not json", r#"{"ok":true}"#));
	let client = client(&transport);
	let value = client.report(&json!({})).await.expect("Report should succeed.");

	assert_eq!(value, json!({ "ok": true }));
	assert!(transport.requests()[1].header("authorization").is_some());
	assert_eq!(client.auth_mode(), Some(AuthMode::Signature));
}

#[tokio::test]
async fn string_expiry_keeps_token_mode() {
	let transport = Arc::new(ScriptedTransport::new(
		r#"{"access_token":"24.x","scope":"public brain_all_scope","expires_in":"2592000"}"#,
		"{}",
	));
	let client = client(&transport);
	let _ = client.report(&json!([])).await.expect("Report should succeed.");
	let requests = transport.requests();

	assert_eq!(client.auth_mode(), Some(AuthMode::AccessToken));
	assert_eq!(query(&requests[1], "access_token").as_deref(), Some("24.x"));
	assert_eq!(requests[1].header("authorization"), None);
}

#[tokio::test]
async fn granted_scope_without_token_falls_back_to_signature() {
	let transport = Arc::new(ScriptedTransport::new(r#"{"scope":"brain_all_scope"}"#, "{}"));
	let client = client(&transport);
	let _ = client.report(&json!({})).await.expect("Report should succeed.");

	assert_eq!(client.auth_mode(), Some(AuthMode::Signature));
}

#[tokio::test]
async fn transport_failures_become_sdk_timeout() {
	let transport = Arc::new(ScriptedTransport {
		token_body: Some(r#"{"access_token":"24.abc","scope":"brain_all_scope"}"#),
		fail_api: true,
		..Default::default()
	});
	let client = client(&transport);
	let value = client.report(&json!([])).await.expect("Transport failures should be a value.");
	let err = client
		.execute(AipRequest::new(CallKind::Feedback, client.endpoints.feedback.clone(), json!({})))
		.await
		.expect_err("The strict pipeline should surface the transport error.");

	assert_eq!(value, timeout_value());
	assert!(matches!(err, Error::Transport(_)));
}

#[tokio::test]
async fn token_transport_failure_skips_api_call() {
	let transport = Arc::new(ScriptedTransport::default());
	let client = client(&transport);
	let value = client.report(&json!([])).await.expect("Token failures should be a value.");

	assert_eq!(value, timeout_value());
	assert_eq!(transport.requests().len(), 1);
	assert_eq!(client.auth_mode(), None);

	let err = client
		.execute(AipRequest::new(CallKind::Feedback, client.endpoints.feedback.clone(), json!({})))
		.await
		.expect_err("The strict pipeline should surface the token failure.");

	match err {
		Error::Transport(e) => assert_eq!(e.stage(), Some(CallStage::Token)),
		other => panic!("Unexpected error variant: {other:?}."),
	}
}

#[tokio::test]
async fn case_duplicate_headers_are_rejected_before_sending() {
	let transport = Arc::new(ScriptedTransport::new(r#"{"scope":"public"}"#, "{}"));
	let client = client(&transport);
	let request = AipRequest::new(CallKind::Generic, client.endpoints.feedback.clone(), json!({}))
		.with_header("X-Tag", "a")
		.with_header("x-tag", "b");
	let err = client.request(request).await.expect_err("Case-duplicate headers must be rejected.");

	assert!(matches!(err, Error::Config(ConfigError::DuplicateHeader { name }) if name == "x-tag"));
	assert_eq!(transport.requests().len(), 1);
}

#[tokio::test]
async fn unsendable_header_values_are_rejected() {
	let transport = Arc::new(ScriptedTransport::new(
		r#"{"access_token":"24.abc","scope":"brain_all_scope"}"#,
		"{}",
	));
	let client = client(&transport);
	let request = AipRequest::new(CallKind::Generic, client.endpoints.feedback.clone(), json!({}))
		.with_header("X-Trace", "line\r\nInjected: 1");
	let err = client.request(request).await.expect_err("Control characters must be rejected.");

	assert!(matches!(
		err,
		Error::Config(ConfigError::InvalidHeader { name, .. }) if name == "X-Trace"
	));
	assert_eq!(transport.requests().len(), 1);
}

#[tokio::test]
async fn invalid_generic_url_is_a_config_error() {
	let transport = Arc::new(ScriptedTransport::new("{}", "{}"));
	let err = client(&transport)
		.post("not a url", &json!({}), Default::default())
		.await
		.expect_err("Unparseable URLs must be rejected.");

	assert!(matches!(err, Error::Config(_)));
	assert!(transport.requests().is_empty());
}
