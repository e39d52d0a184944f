//! Token endpoint responses and the authentication mode they select.

// self
use crate::{
	_prelude::*,
	auth::{GrantedScopes, Secret},
};

/// Body returned by the OAuth token endpoint.
///
/// Every field is optional: error bodies (`{"error": "invalid_client", ...}`) decode into the same
/// type so the caller can still pick an [`AuthMode`]. Only `access_token` and `scope` decide the
/// mode, so every other field drops a value of an unexpected type instead of failing the decode.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenResponse {
	/// Bearer access token.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub access_token: Option<Secret>,
	/// Space-delimited granted scopes.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub scope: Option<GrantedScopes>,
	/// Lifetime of the access token in seconds; numeric strings are accepted.
	#[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "lenient_seconds")]
	pub expires_in: Option<u64>,
	/// Refresh token, when issued.
	#[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "lenient")]
	pub refresh_token: Option<Secret>,
	/// Legacy session key.
	#[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "lenient")]
	pub session_key: Option<Secret>,
	/// Legacy session secret.
	#[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "lenient")]
	pub session_secret: Option<Secret>,
	/// OAuth error code.
	#[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "lenient")]
	pub error: Option<String>,
	/// OAuth error description.
	#[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "lenient")]
	pub error_description: Option<String>,
}
impl TokenResponse {
	/// Returns `true` when the grant includes `brain_all_scope`.
	pub fn has_permission(&self) -> bool {
		self.scope.as_ref().is_some_and(GrantedScopes::grants_brain_all)
	}

	/// Returns the authentication mode selected by this grant.
	pub fn auth_mode(&self) -> AuthMode {
		AuthMode::from_token(Some(self))
	}
}

// Keeps a field that does not decode as `T` from failing the whole body.
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
	D: serde::Deserializer<'de>,
	T: serde::de::DeserializeOwned,
{
	let value = serde_json::Value::deserialize(deserializer)?;

	Ok(serde_json::from_value(value).ok())
}

fn lenient_seconds<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
	D: serde::Deserializer<'de>,
{
	Ok(match serde_json::Value::deserialize(deserializer)? {
		serde_json::Value::Number(n) => n.as_u64(),
		serde_json::Value::String(s) => s.trim().parse().ok(),
		_ => None,
	})
}

/// How API requests are authenticated.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthMode {
	/// Cloud account: the `access_token` query parameter authorizes the call.
	AccessToken,
	/// Legacy account: every request carries a `bce-auth-v1` signature.
	Signature,
}
impl AuthMode {
	/// Decides the mode from an optional (possibly undecodable) token response.
	pub fn from_token(token: Option<&TokenResponse>) -> Self {
		match token {
			Some(token) if token.has_permission() && token.access_token.is_some() =>
				Self::AccessToken,
			_ => Self::Signature,
		}
	}

	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			AuthMode::AccessToken => "access_token",
			AuthMode::Signature => "signature",
		}
	}
}
impl Display for AuthMode {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	fn decode(body: &str) -> TokenResponse {
		serde_json::from_str(body).expect("Token body should decode.")
	}

	#[test]
	fn brain_all_scope_selects_access_token_mode() {
		let token = decode(
			r#"{
				"access_token": "24.abc",
				"expires_in": 2592000,
				"scope": "public brain_all_scope",
				"session_key": "x",
				"session_secret": "y",
				"refresh_token": "25.def"
			}"#,
		);

		assert!(token.has_permission());
		assert_eq!(token.auth_mode(), AuthMode::AccessToken);
		assert_eq!(token.expires_in, Some(2_592_000));
	}

	#[test]
	fn missing_scope_or_token_selects_signature_mode() {
		assert_eq!(
			decode(r#"{"access_token":"24.abc","scope":"public"}"#).auth_mode(),
			AuthMode::Signature
		);
		assert_eq!(decode(r#"{"scope":"brain_all_scope"}"#).auth_mode(), AuthMode::Signature);
		assert_eq!(
			decode(r#"{"error":"invalid_client","error_description":"unknown client id"}"#)
				.auth_mode(),
			AuthMode::Signature
		);
		assert_eq!(AuthMode::from_token(None), AuthMode::Signature);
	}

	#[test]
	fn mistyped_extra_fields_do_not_change_the_mode() {
		let token = decode(
			r#"{
				"access_token": "24.x",
				"scope": "public brain_all_scope",
				"expires_in": "2592000",
				"refresh_token": 25,
				"session_key": ["x"],
				"error": null
			}"#,
		);

		assert_eq!(token.auth_mode(), AuthMode::AccessToken);
		assert_eq!(token.expires_in, Some(2_592_000));
		assert_eq!(token.refresh_token, None);
		assert_eq!(token.session_key, None);
		assert_eq!(token.error, None);
		assert_eq!(
			decode(r#"{"access_token":"24.x","scope":"brain_all_scope","expires_in":-1}"#)
				.expires_in,
			None
		);
	}

	#[test]
	fn debug_output_redacts_tokens() {
		let token = decode(r#"{"access_token":"24.abc","scope":"brain_all_scope"}"#);

		assert!(!format!("{token:?}").contains("24.abc"));
	}
}
