//! Feedback reporting endpoint.

// crates.io
use serde_json::{Map, Value};
// self
use crate::{
	_prelude::*,
	api::{AipClient, AipRequest},
	error::ConfigError,
	http::AipHttpClient,
	obs::CallKind,
	transport::TransportErrorMapper,
};

impl<C, M> AipClient<C, M>
where
	C: ?Sized + AipHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	/// Reports feedback on earlier results; the body is `{"feedback": feedback}`.
	pub async fn report<F>(&self, feedback: &F) -> Result<Value>
	where
		F: ?Sized + Serialize,
	{
		let body = feedback_body(feedback)?;

		self.request(AipRequest::new(CallKind::Feedback, self.endpoints.feedback.clone(), body)).await
	}
}

fn feedback_body<F>(feedback: &F) -> Result<Value>
where
	F: ?Sized + Serialize,
{
	let mut body = Map::new();

	body.insert("feedback".into(), serde_json::to_value(feedback).map_err(ConfigError::from)?);

	Ok(body.into())
}
