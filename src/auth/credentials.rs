//! Application credentials issued by the AIP console.

// self
use crate::{_prelude::*, auth::Secret, error::ConfigError};

/// Environment variable holding the application id.
pub const ENV_APP_ID: &str = "AIP_APP_ID";
/// Environment variable holding the API key.
pub const ENV_API_KEY: &str = "AIP_API_KEY";
/// Environment variable holding the secret key.
pub const ENV_SECRET_KEY: &str = "AIP_SECRET_KEY";

/// Immutable `(app_id, api_key, secret_key)` triple.
///
/// Values are trimmed on construction; the API key doubles as the OAuth `client_id` and the BCE
/// access key, the secret key as the OAuth `client_secret` and the BCE signing secret.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
	app_id: String,
	api_key: String,
	secret_key: Secret,
}
impl Credentials {
	/// Creates credentials, trimming surrounding whitespace from every value.
	pub fn new(
		app_id: impl AsRef<str>,
		api_key: impl AsRef<str>,
		secret_key: impl AsRef<str>,
	) -> Self {
		Self {
			app_id: app_id.as_ref().trim().to_owned(),
			api_key: api_key.as_ref().trim().to_owned(),
			secret_key: Secret::new(secret_key.as_ref().trim()),
		}
	}

	/// Reads credentials from `AIP_APP_ID`, `AIP_API_KEY`, and `AIP_SECRET_KEY`.
	pub fn from_env() -> Result<Self> {
		let read = |name: &'static str| {
			std::env::var(name).map_err(|_| Error::from(ConfigError::MissingEnv { name }))
		};

		Ok(Self::new(read(ENV_APP_ID)?, read(ENV_API_KEY)?, read(ENV_SECRET_KEY)?))
	}

	/// Application id shown in the console.
	pub fn app_id(&self) -> &str {
		&self.app_id
	}

	/// API key (OAuth client id, BCE access key).
	pub fn api_key(&self) -> &str {
		&self.api_key
	}

	/// Secret key (OAuth client secret, BCE secret access key).
	pub fn secret_key(&self) -> &Secret {
		&self.secret_key
	}
}
#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn values_are_trimmed() {
		let credentials = Credentials::new(" 10001 ", "\tapi-key\n", "  secret ");

		assert_eq!(credentials.app_id(), "10001");
		assert_eq!(credentials.api_key(), "api-key");
		assert_eq!(credentials.secret_key().expose(), "secret");
	}

	#[test]
	fn debug_hides_secret_key() {
		let rendered = format!("{:?}", Credentials::new("1", "ak", "do-not-print"));

		assert!(rendered.contains("ak"));
		assert!(!rendered.contains("do-not-print"));
	}
}
