//! Face comparison and detection endpoints.

// crates.io
use base64::{Engine, engine::general_purpose::STANDARD};
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

/// How the `image` field of a face request is interpreted.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ImageType {
	/// Base64-encoded image bytes.
	Base64,
	/// Publicly reachable image URL.
	Url,
	/// Token of a face detected earlier.
	FaceToken,
}

/// Kind of picture a face comes from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FaceType {
	/// Everyday photo.
	Live,
	/// ID card photo.
	Idcard,
	/// Watermarked ID photo.
	Watermark,
	/// Certificate photo.
	Cert,
	/// Infrared photo.
	Infrared,
}

/// Strictness for quality and liveness checks.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ControlLevel {
	/// No check.
	None,
	/// Lenient.
	Low,
	/// Balanced.
	Normal,
	/// Strict.
	High,
}

/// One side of a face comparison.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchImage {
	/// Image payload, read according to [`MatchImage::image_type`].
	pub image: String,
	/// Payload kind.
	pub image_type: ImageType,
	/// Picture kind; the API assumes [`FaceType::Live`] when absent.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub face_type: Option<FaceType>,
	/// Quality filter.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub quality_control: Option<ControlLevel>,
	/// Liveness filter.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub liveness_control: Option<ControlLevel>,
}
impl MatchImage {
	/// Creates an entry from raw parts.
	pub fn new(image: impl Into<String>, image_type: ImageType) -> Self {
		Self {
			image: image.into(),
			image_type,
			face_type: None,
			quality_control: None,
			liveness_control: None,
		}
	}

	/// References an image by URL.
	pub fn url(url: impl Into<String>) -> Self {
		Self::new(url, ImageType::Url)
	}

	/// Embeds image bytes as standard base64.
	pub fn base64(bytes: &[u8]) -> Self {
		Self::new(STANDARD.encode(bytes), ImageType::Base64)
	}

	/// References a previously detected face.
	pub fn face_token(token: impl Into<String>) -> Self {
		Self::new(token, ImageType::FaceToken)
	}

	/// Sets the picture kind.
	pub fn with_face_type(mut self, face_type: FaceType) -> Self {
		self.face_type = Some(face_type);

		self
	}

	/// Sets the quality filter.
	pub fn with_quality_control(mut self, level: ControlLevel) -> Self {
		self.quality_control = Some(level);

		self
	}

	/// Sets the liveness filter.
	pub fn with_liveness_control(mut self, level: ControlLevel) -> Self {
		self.liveness_control = Some(level);

		self
	}
}

/// Optional parameters of a face detection call.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct DetectOptions {
	/// Extra attributes to return (`age`, `beauty`, `landmark`, ...); sent comma-joined.
	#[serde(
		default,
		skip_serializing_if = "Vec::is_empty",
		serialize_with = "serialize_face_fields",
		deserialize_with = "deserialize_face_fields"
	)]
	pub face_field: Vec<String>,
	/// Maximum number of faces to return.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub max_face_num: Option<u32>,
	/// Picture kind.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub face_type: Option<FaceType>,
	/// Liveness filter.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub liveness_control: Option<ControlLevel>,
	/// Parameters not modelled above, merged into the body as-is.
	#[serde(flatten)]
	pub extra: Map<String, Value>,
}
impl DetectOptions {
	/// Requests an extra attribute.
	pub fn with_face_field(mut self, field: impl Into<String>) -> Self {
		self.face_field.push(field.into());

		self
	}

	/// Caps the number of returned faces.
	pub fn with_max_face_num(mut self, max: u32) -> Self {
		self.max_face_num = Some(max);

		self
	}

	/// Sets the picture kind.
	pub fn with_face_type(mut self, face_type: FaceType) -> Self {
		self.face_type = Some(face_type);

		self
	}

	/// Sets the liveness filter.
	pub fn with_liveness_control(mut self, level: ControlLevel) -> Self {
		self.liveness_control = Some(level);

		self
	}

	/// Adds a raw body parameter.
	pub fn with_extra(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
		self.extra.insert(key.into(), value.into());

		self
	}
}

fn serialize_face_fields<S>(fields: &[String], serializer: S) -> Result<S::Ok, S::Error>
where
	S: serde::Serializer,
{
	serializer.serialize_str(&fields.join(","))
}

fn deserialize_face_fields<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
	D: serde::Deserializer<'de>,
{
	let raw = String::deserialize(deserializer)?;

	Ok(raw.split(',').map(str::trim).filter(|f| !f.is_empty()).map(str::to_owned).collect())
}

impl<C, M> AipClient<C, M>
where
	C: ?Sized + AipHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	/// Compares the faces in `images` (normally two) and returns the similarity result.
	pub async fn face_match(&self, images: &[MatchImage]) -> Result<Value> {
		let body = serde_json::to_value(images).map_err(ConfigError::from)?;

		self.request(AipRequest::new(CallKind::FaceMatch, self.endpoints.face_match.clone(), body))
			.await
	}

	/// Detects faces in `image`.
	pub async fn face_detect(
		&self,
		image: &str,
		image_type: ImageType,
		options: &DetectOptions,
	) -> Result<Value> {
		let body = detect_body(image, image_type, options)?;

		self.request(AipRequest::new(CallKind::FaceDetect, self.endpoints.face_detect.clone(), body))
			.await
	}
}

fn detect_body(image: &str, image_type: ImageType, options: &DetectOptions) -> Result<Value> {
	let mut body = match serde_json::to_value(options).map_err(ConfigError::from)? {
		Value::Object(map) => map,
		_ => Map::new(),
	};

	body.insert("image".into(), image.into());
	body.insert("image_type".into(), serde_json::to_value(image_type).map_err(ConfigError::from)?);

	Ok(body.into())
}
