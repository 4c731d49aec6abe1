//! Route-boundary translation for BFF handlers.
//!
//! A route calls the upstream through [`ApiClient`](crate::fetch::ApiClient), then hands the
//! result to [`respond`]. Successes become `200 OK` envelopes; business errors keep their code,
//! message, and payload with a status derived from the code; anything else becomes a generic
//! `500 INTERNAL_SERVER_ERROR` that never exposes internals.

// self
use crate::{
	_prelude::*,
	envelope::{ApiResponse, code},
	error::ConfigError,
	store::CookieStore,
};

/// Message returned with `INTERNAL_SERVER_ERROR` envelopes.
pub const INTERNAL_ERROR_MESSAGE: &str = "An unexpected error occurred.";

/// Status, envelope, and cookies a BFF route answers with.
#[derive(Clone, Debug, PartialEq)]
pub struct BffResponse {
	/// HTTP status code.
	pub status: u16,
	/// Response envelope.
	pub envelope: ApiResponse<JsonValue>,
	/// `Set-Cookie` header values to attach.
	pub set_cookies: Vec<String>,
}
impl BffResponse {
	/// Builds a `200 OK` response around `data`.
	pub fn ok(data: JsonValue) -> Self {
		Self { status: 200, envelope: ApiResponse::ok(data), set_cookies: Vec::new() }
	}

	/// Builds the response for a business error.
	pub fn business(err: &BusinessError) -> Self {
		Self {
			status: code::status_for_code(&err.code),
			envelope: ApiResponse {
				code: err.code.clone(),
				message: err.message.clone(),
				data: err.data.clone(),
			},
			set_cookies: Vec::new(),
		}
	}

	/// Builds the generic `500` response.
	pub fn internal() -> Self {
		Self {
			status: 500,
			envelope: ApiResponse::empty(code::INTERNAL_SERVER_ERROR, INTERNAL_ERROR_MESSAGE),
			set_cookies: Vec::new(),
		}
	}

	/// Attaches every cookie changed through `store`.
	pub fn with_cookies(mut self, store: &CookieStore) -> Self {
		self.set_cookies.extend(store.set_cookie_headers());

		self
	}

	/// Serializes the envelope as the response body.
	pub fn body(&self) -> Result<Vec<u8>> {
		Ok(serde_json::to_vec(&self.envelope).map_err(ConfigError::from)?)
	}
}

/// Translates a route result into the response the BFF sends.
pub fn respond<T>(result: Result<T>) -> BffResponse
where
	T: Serialize,
{
	match result {
		Ok(data) => match serde_json::to_value(data) {
			Ok(data) => BffResponse::ok(data),
			Err(_) => BffResponse::internal(),
		},
		Err(Error::Business(err)) => BffResponse::business(&err),
		Err(_) => BffResponse::internal(),
	}
}
