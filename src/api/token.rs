//! Client-credentials token fetch and authentication-mode selection.

// self
use crate::{
	_prelude::*,
	api::AipClient,
	auth::{AuthMode, TokenResponse},
	http::{AipHttpClient, HttpRequest, HttpResponse},
	obs::{CallStage, debug_event, warn_event},
	transport::TransportErrorMapper,
};

/// OAuth grant used for every token request.
pub const GRANT_TYPE: &str = "client_credentials";

/// Outcome of the token step of a call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Authentication {
	/// Mode the call is sent with.
	pub mode: AuthMode,
	/// Decoded token body, or `None` when the body was not a JSON object.
	pub token: Option<TokenResponse>,
}
impl Authentication {
	/// Builds the authentication outcome for a (possibly missing) token body.
	pub fn from_token(token: Option<TokenResponse>) -> Self {
		Self { mode: AuthMode::from_token(token.as_ref()), token }
	}

	/// Access token to put in the query string, present only in [`AuthMode::AccessToken`].
	pub fn access_token(&self) -> Option<&str> {
		match self.mode {
			AuthMode::AccessToken =>
				self.token.as_ref().and_then(|token| token.access_token.as_ref()).map(|t| t.expose()),
			AuthMode::Signature => None,
		}
	}
}

impl<C, M> AipClient<C, M>
where
	C: ?Sized + AipHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	/// Requests a token with the client-credentials grant.
	///
	/// A body that cannot be decoded is not an error: it yields `Ok(None)` and the call falls back
	/// to signing. Only transport failures are returned as errors.
	pub async fn fetch_token(&self) -> Result<Option<TokenResponse>> {
		let url = self.token_url();
		let response = self
			.http_client
			.execute(HttpRequest::get(url.clone()))
			.await
			.map_err(|e| self.transport_mapper.map_transport_error(CallStage::Token, &url, e))?;

		Ok(decode_token(&response))
	}

	/// Fetches a token, decides the [`AuthMode`], and records it on the client.
	pub async fn authenticate(&self) -> Result<Authentication> {
		let authentication = Authentication::from_token(self.fetch_token().await?);

		debug_event!(auth_mode = authentication.mode.as_str(), "Selected authentication mode.");

		self.remember_auth_mode(authentication.mode);

		Ok(authentication)
	}

	fn token_url(&self) -> Url {
		let mut url = self.endpoints.token.clone();

		url.query_pairs_mut()
			.append_pair("grant_type", GRANT_TYPE)
			.append_pair("client_id", self.credentials.api_key())
			.append_pair("client_secret", self.credentials.secret_key().expose());

		url
	}
}

fn decode_token(response: &HttpResponse) -> Option<TokenResponse> {
	let mut de = serde_json::Deserializer::from_slice(&response.body);

	let decoded: Result<TokenResponse, _> = serde_path_to_error::deserialize(&mut de);

	match decoded {
		Ok(token) => Some(token),
		Err(e) => {
			warn_event!(
				status = response.status,
				path = %e.path(),
				"Token response could not be decoded; falling back to request signing."
			);

			#[cfg(not(feature = "tracing"))]
			let _ = e;

			None
		},
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn undecodable_token_bodies_fall_back_to_signing() {
		let response = HttpResponse::new(502, "<html>bad gateway</html>");

		assert_eq!(decode_token(&response), None);
		assert_eq!(Authentication::from_token(None).mode, AuthMode::Signature);
		assert_eq!(Authentication::from_token(None).access_token(), None);
	}

	#[test]
	fn string_expiry_keeps_token_mode() {
		let token = decode_token(&HttpResponse::new(
			200,
			r#"{"access_token":"24.x","scope":"public brain_all_scope","expires_in":"2592000"}"#,
		));
		let authentication = Authentication::from_token(token);

		assert_eq!(authentication.mode, AuthMode::AccessToken);
		assert_eq!(authentication.access_token(), Some("24.x"));
	}

	#[test]
	fn access_token_is_exposed_only_for_token_mode() {
		let granted = decode_token(&HttpResponse::new(
			200,
			r#"{"access_token":"24.granted","scope":"public brain_all_scope","expires_in":2592000}"#,
		));
		let authentication = Authentication::from_token(granted);

		assert_eq!(authentication.mode, AuthMode::AccessToken);
		assert_eq!(authentication.access_token(), Some("24.granted"));

		let limited = decode_token(&HttpResponse::new(
			200,
			r#"{"access_token":"24.limited","scope":"public"}"#,
		));

		assert_eq!(Authentication::from_token(limited).access_token(), None);
	}
}
