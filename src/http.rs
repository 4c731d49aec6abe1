//! Transport primitives for upstream API calls.
//!
//! [`ApiHttpClient`] is the crate's only dependency on an HTTP stack. The fetch layer builds an
//! [`ApiRequest`] (method, absolute URL, headers, optional body), hands it to the transport, and
//! receives a [`RawResponse`] that the envelope decoder classifies. Transport errors never carry
//! HTTP statuses: any response that reached the client, successful or not, is returned as a
//! [`RawResponse`].

// crates.io
use http::{HeaderMap, HeaderValue, Method, header::AUTHORIZATION};
// self
use crate::{
	_prelude::*,
	auth::TokenSecret,
	error::{ConfigError, TransportError},
};

/// Boxed future returned by [`ApiHttpClient::execute`].
pub type HttpFuture<'a, E> = Pin<Box<dyn Future<Output = Result<RawResponse, E>> + 'a + Send>>;

/// Abstraction over HTTP transports capable of executing upstream API calls.
///
/// Implementations must be `Send + Sync + 'static` so a single transport can be shared by every
/// clone of an [`ApiClient`](crate::fetch::ApiClient), and the returned future must be `Send`
/// so callers can drive it from any executor.
pub trait ApiHttpClient
where
	Self: 'static + Send + Sync,
{
	/// Concrete error emitted by the underlying transport.
	type TransportError: 'static + Send + Sync + StdError;

	/// Executes `request`, returning the response whatever its status.
	fn execute(&self, request: ApiRequest) -> HttpFuture<'_, Self::TransportError>;

	/// Classifies a transport failure; defaults to [`TransportError::Network`].
	fn map_transport_error(&self, err: Self::TransportError) -> TransportError {
		TransportError::network(err)
	}
}

/// Fully resolved outbound request.
#[derive(Clone, Debug)]
pub struct ApiRequest {
	/// HTTP method.
	pub method: Method,
	/// Absolute request URL.
	pub url: Url,
	/// Request headers, including `Authorization` when a token was resolved.
	pub headers: HeaderMap,
	/// JSON body bytes, if any.
	pub body: Option<Vec<u8>>,
}
impl ApiRequest {
	/// Creates a request without headers or body.
	pub fn new(method: Method, url: Url) -> Self {
		Self { method, url, headers: HeaderMap::new(), body: None }
	}

	/// Sets `Authorization: Bearer <token>`, replacing any existing value.
	pub fn with_bearer(mut self, token: &TokenSecret) -> Result<Self, ConfigError> {
		let mut value = HeaderValue::try_from(format!("Bearer {}", token.expose()))
			.map_err(|_| ConfigError::InvalidHeader { name: "authorization" })?;

		value.set_sensitive(true);
		self.headers.insert(AUTHORIZATION, value);

		Ok(self)
	}

	/// Removes any `Authorization` header so the call goes out as a guest.
	pub fn without_bearer(mut self) -> Self {
		self.headers.remove(AUTHORIZATION);

		self
	}

	/// Returns the bearer token carried in the `Authorization` header, if any.
	pub fn bearer(&self) -> Option<&str> {
		bearer_from_headers(&self.headers)
	}
}

/// Response as observed on the wire, before envelope decoding.
#[derive(Clone, Debug, Default)]
pub struct RawResponse {
	/// HTTP status code.
	pub status: u16,
	/// Response headers.
	pub headers: HeaderMap,
	/// Raw body bytes.
	pub body: Vec<u8>,
}
impl RawResponse {
	/// Creates a response with no headers.
	pub fn new(status: u16, body: Vec<u8>) -> Self {
		Self { status, headers: HeaderMap::new(), body }
	}

	/// Returns `true` for 2xx statuses.
	pub fn is_success(&self) -> bool {
		(200..300).contains(&self.status)
	}
}

/// Extracts the token from an `Authorization: Bearer <token>` header.
pub fn bearer_from_headers(headers: &HeaderMap) -> Option<&str> {
	let raw = headers.get(AUTHORIZATION)?.to_str().ok()?.trim();
	let (scheme, token) = raw.split_once(' ')?;

	if !scheme.eq_ignore_ascii_case("bearer") {
		return None;
	}

	let token = token.trim();

	if token.is_empty() { None } else { Some(token) }
}

/// Thin wrapper around [`ReqwestClient`] so shared HTTP behavior lives in one place.
#[cfg(feature = "reqwest")]
#[derive(Clone, Default)]
pub struct ReqwestHttpClient(pub ReqwestClient);
#[cfg(feature = "reqwest")]
impl ReqwestHttpClient {
	/// Wraps an existing reqwest [`ReqwestClient`].
	pub fn with_client(client: ReqwestClient) -> Self {
		Self(client)
	}

	/// Builds a client with connect and overall request timeouts.
	pub fn with_timeouts(
		connect: std::time::Duration,
		request: std::time::Duration,
	) -> Result<Self, ConfigError> {
		let client = ReqwestClient::builder()
			.connect_timeout(connect)
			.timeout(request)
			.build()
			.map_err(ConfigError::http_client_build)?;

		Ok(Self(client))
	}
}
#[cfg(feature = "reqwest")]
impl AsRef<ReqwestClient> for ReqwestHttpClient {
	fn as_ref(&self) -> &ReqwestClient {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl ApiHttpClient for ReqwestHttpClient {
	type TransportError = ReqwestError;

	fn execute(&self, request: ApiRequest) -> HttpFuture<'_, Self::TransportError> {
		let client = self.0.clone();

		Box::pin(async move {
			let mut builder = client.request(request.method, request.url).headers(request.headers);

			if let Some(body) = request.body {
				builder = builder.body(body);
			}

			let response = builder.send().await?;
			let status = response.status().as_u16();
			let headers = response.headers().to_owned();
			let body = response.bytes().await?.to_vec();

			Ok(RawResponse { status, headers, body })
		})
	}

	fn map_transport_error(&self, err: Self::TransportError) -> TransportError {
		err.into()
	}
}
