//! One token-exchange round trip: request construction, transport call, and response
//! classification into the client's error taxonomy.

// crates.io
use oauth2::{
	AsyncHttpClient, HttpClientError, HttpRequest, HttpResponse,
	http::{
		Method, Request,
		header::{ACCEPT, CONTENT_TYPE, HeaderValue},
	},
};
// self
use crate::{
	_prelude::*,
	auth::{AuthorizationCredentials, TokenSecret},
	error::{BoxError, ResponseParseError, TransportError},
	http::{ResponseMetadata, ResponseMetadataSlot, TokenHttpClient},
	request::{self, TokenRequestMeta},
};

/// Response field carrying the access token.
pub const ACCESS_TOKEN_KEY: &str = "access_token";
/// Response field carrying the token lifetime in seconds.
pub const ACCESS_TOKEN_EXPIRE_KEY: &str = "expires_in";
/// Media type of the request body.
pub const JSON_MEDIA_TYPE: &str = "application/json; charset=utf-8";

/// Maps HTTP transport failures into client [`Error`] values.
pub trait TransportErrorMapper<E>
where
	Self: 'static + Send + Sync,
	E: 'static + Send + Sync + StdError,
{
	/// Converts an [`HttpClientError`] emitted by the transport into a client error.
	///
	/// `metadata` is whatever the transport stored in its [`ResponseMetadataSlot`] before
	/// failing; a recorded status means the response started arriving.
	fn map_transport_error(
		&self,
		metadata: Option<&ResponseMetadata>,
		error: HttpClientError<E>,
	) -> Error;
}

/// Transport-agnostic mapper suitable for custom [`TokenHttpClient`] implementations.
#[derive(Clone, Copy, Debug, Default)]
pub struct DefaultTransportErrorMapper;
impl<E> TransportErrorMapper<E> for DefaultTransportErrorMapper
where
	E: 'static + Send + Sync + StdError,
{
	fn map_transport_error(
		&self,
		metadata: Option<&ResponseMetadata>,
		error: HttpClientError<E>,
	) -> Error {
		match error {
			HttpClientError::Reqwest(inner) => map_network_error(metadata, inner),
			other => map_common_error(metadata, other),
		}
	}
}

/// Default mapper for reqwest-backed transports.
#[cfg(feature = "reqwest")]
#[derive(Clone, Copy, Debug, Default)]
pub struct ReqwestTransportErrorMapper;
#[cfg(feature = "reqwest")]
impl TransportErrorMapper<ReqwestError> for ReqwestTransportErrorMapper {
	fn map_transport_error(
		&self,
		metadata: Option<&ResponseMetadata>,
		error: HttpClientError<ReqwestError>,
	) -> Error {
		match error {
			HttpClientError::Reqwest(inner) if inner.is_builder() => Error::acquisition(inner),
			HttpClientError::Reqwest(inner) => map_network_error(metadata, inner),
			other => map_common_error(metadata, other),
		}
	}
}

/// Access token and lifetime extracted from a successful exchange.
#[derive(Clone, Debug)]
pub struct TokenGrant {
	/// Newly issued access token.
	pub access_token: TokenSecret,
	/// Lifetime reported by the authorization service.
	pub expires_in: Duration,
}

#[derive(Deserialize)]
struct TokenResponseBody {
	access_token: String,
	expires_in: ExpiresIn,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ExpiresIn {
	Seconds(i64),
	Text(String),
}
impl ExpiresIn {
	fn seconds(self) -> Result<i64, ResponseParseError> {
		match self {
			Self::Seconds(value) => Ok(value),
			Self::Text(raw) => raw
				.trim()
				.parse::<i64>()
				.map_err(|_| ResponseParseError::InvalidExpiresIn { value: raw }),
		}
	}
}

/// Performs one exchange against the credentials' endpoint.
///
/// The caller owns cache bookkeeping; this function has no side effects beyond the HTTP call.
pub async fn exchange<C, M>(
	credentials: &AuthorizationCredentials,
	http_client: &C,
	mapper: &M,
) -> Result<TokenGrant>
where
	C: ?Sized + TokenHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	let meta = request::build(credentials);
	let request = build_http_request(&credentials.endpoint, &meta)?;
	let slot = ResponseMetadataSlot::default();
	let handle = http_client.with_metadata(slot.clone());
	let response = handle
		.call(request)
		.await
		.map_err(|err| mapper.map_transport_error(slot.take().as_ref(), err))?;

	classify_response(slot.take(), response)
}

/// Builds the POST request for `meta` against the endpoint's authority and path.
pub fn build_http_request(endpoint: &Url, meta: &TokenRequestMeta) -> Result<HttpRequest> {
	let body = meta.to_json().map_err(Error::acquisition)?;

	Request::builder()
		.method(Method::POST)
		.uri(request_url(endpoint).as_str())
		.header(CONTENT_TYPE, HeaderValue::from_static(JSON_MEDIA_TYPE))
		.header(ACCEPT, HeaderValue::from_static("application/json"))
		.body(body)
		.map_err(Error::acquisition)
}

/// Parses a successful token endpoint body.
pub fn parse_token_response(body: &[u8]) -> Result<TokenGrant, ResponseParseError> {
	let mut deserializer = serde_json::Deserializer::from_slice(body);
	let parsed: TokenResponseBody = serde_path_to_error::deserialize(&mut deserializer)
		.map_err(|source| ResponseParseError::Malformed { source })?;

	if parsed.access_token.is_empty() {
		return Err(ResponseParseError::EmptyAccessToken);
	}

	let expires_in = parsed.expires_in.seconds()?;
	let expires_in =
		i32::try_from(expires_in).map_err(|_| ResponseParseError::ExpiresInOutOfRange)?;

	if expires_in <= 0 {
		return Err(ResponseParseError::NonPositiveExpiresIn);
	}

	Ok(TokenGrant {
		access_token: TokenSecret::new(parsed.access_token),
		expires_in: Duration::seconds(i64::from(expires_in)),
	})
}

fn classify_response(
	meta: Option<ResponseMetadata>,
	response: HttpResponse,
) -> Result<TokenGrant> {
	let status = response.status();

	if !status.is_success() || meta.is_some_and(|meta| meta.is_incomplete()) {
		return Err(Error::TokenExchange { status: Some(status.as_u16()), source: None });
	}

	Ok(parse_token_response(response.body())?)
}

fn request_url(endpoint: &Url) -> Url {
	let mut url = endpoint.clone();

	url.set_query(None);
	url.set_fragment(None);

	url
}

fn map_network_error<E>(metadata: Option<&ResponseMetadata>, error: Box<E>) -> Error
where
	E: 'static + Send + Sync + StdError,
{
	let source: BoxError = error;

	match metadata.and_then(|meta| meta.status) {
		Some(status) => Error::TokenExchange { status: Some(status), source: Some(source) },
		None => TransportError::Network { source }.into(),
	}
}

fn map_common_error<E>(metadata: Option<&ResponseMetadata>, error: HttpClientError<E>) -> Error
where
	E: 'static + Send + Sync + StdError,
{
	match error {
		HttpClientError::Io(inner) => match metadata.and_then(|meta| meta.status) {
			Some(status) => {
				let source: BoxError = Box::new(inner);

				Error::TokenExchange { status: Some(status), source: Some(source) }
			},
			None => TransportError::Io(inner).into(),
		},
		HttpClientError::Reqwest(inner) => map_network_error(metadata, inner),
		HttpClientError::Http(inner) => Error::acquisition(inner),
		HttpClientError::Other(message) => Error::acquisition(message),
		other => Error::acquisition(other),
	}
}
