//! Classification of transport failures into client errors.

// self
use crate::{_prelude::*, error::TransportError, obs::CallStage};
#[cfg(feature = "reqwest")] use crate::error::ConfigError;

/// Maps HTTP transport failures into client [`Error`] values.
///
/// Every [`Error::Transport`] produced here is reported to callers of
/// [`AipClient::request`](crate::api::AipClient::request) as the SDK108 response, so mappers
/// decide which failures count as "connection or read data timeout" and which are local
/// configuration mistakes.
pub trait TransportErrorMapper<E>
where
	Self: 'static + Send + Sync,
	E: 'static + Send + Sync + StdError,
{
	/// Converts an error emitted by the transport into a client error.
	fn map_transport_error(&self, stage: CallStage, url: &Url, error: E) -> Error;
}

/// Default mapper for reqwest-backed transports.
#[cfg(feature = "reqwest")]
#[derive(Clone, Debug, Default)]
pub struct ReqwestTransportErrorMapper;
#[cfg(feature = "reqwest")]
impl TransportErrorMapper<ReqwestError> for ReqwestTransportErrorMapper {
	fn map_transport_error(&self, stage: CallStage, url: &Url, err: ReqwestError) -> Error {
		if err.is_builder() {
			return ConfigError::from(err).into();
		}
		if err.is_timeout() {
			return TransportError::timeout(stage, url, err).into();
		}

		TransportError::network(stage, url, err).into()
	}
}

/// Mapper that treats every failure as a network error; useful for custom transports whose
/// errors carry no further structure.
#[derive(Clone, Debug, Default)]
pub struct NetworkErrorMapper;
impl<E> TransportErrorMapper<E> for NetworkErrorMapper
where
	E: 'static + Send + Sync + StdError,
{
	fn map_transport_error(&self, stage: CallStage, url: &Url, err: E) -> Error {
		TransportError::network(stage, url, err).into()
	}
}
