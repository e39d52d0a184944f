//! Compares two faces by URL.
//!
//! With `AIP_APP_ID`, `AIP_API_KEY`, and `AIP_SECRET_KEY` set, the call goes to the public API.
//! Otherwise a local mock server stands in for it.

// std
use std::sync::Arc;
// crates.io
use color_eyre::Result;
use httpmock::prelude::*;
use serde_json::json;
// self
use aip_client::{
	api::{MatchImage, ReqwestAipClient},
	auth::Credentials,
	config::ClientConfig,
	endpoint::Endpoints,
	http::ReqwestHttpClient,
	transport::ReqwestTransportErrorMapper,
};

const FACE_A: &str = "https://moyou-asset.oss-cn-hangzhou.aliyuncs.com/23.png";
const FACE_B: &str = "https://moyou-asset.oss-cn-hangzhou.aliyuncs.com/24.png";

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let config =
		ClientConfig::default().with_connection_timeout_ms(5_000).with_socket_timeout_ms(10_000);
	let images = [MatchImage::url(FACE_A), MatchImage::url(FACE_B)];

	if let Ok(credentials) = Credentials::from_env() {
		let client = ReqwestAipClient::with_config(credentials, &config)?;

		println!("{:#}", client.face_match(&images).await?);

		return Ok(());
	}

	let server = MockServer::start_async().await;
	let token_mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/oauth/2.0/token");
			then.status(200).header("content-type", "application/json").body(
				"{\"access_token\":\"24.demo\",\"scope\":\"public brain_all_scope\",\"expires_in\":2592000}",
			);
		})
		.await;
	let match_mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/rest/2.0/face/v3/match").query_param("access_token", "24.demo");
			then.status(200).json_body(json!({
				"error_code": 0,
				"error_msg": "SUCCESS",
				"result": { "score": 92.4, "face_list": [] },
			}));
		})
		.await;
	let client = ReqwestAipClient::with_http_client(
		Credentials::new("demo-app", "demo-key", "demo-secret"),
		Endpoints::with_base(&server.base_url())?,
		ReqwestHttpClient::from_config(&config)?,
		Arc::new(ReqwestTransportErrorMapper),
	);
	let result = client.face_match(&images).await?;

	token_mock.assert_async().await;
	match_mock.assert_async().await;

	println!("auth mode: {:?}", client.auth_mode());
	println!("{result:#}");

	Ok(())
}
