//! Logical API call description consumed by [`ApiClient::call`](crate::fetch::ApiClient::call).

// crates.io
use http::{HeaderMap, HeaderName, HeaderValue, Method};
// self
use crate::{_prelude::*, auth::TokenSecret, error::ConfigError};

/// One logical upstream call: what to send, which token to prefer, and how failures are named.
#[derive(Clone, Debug)]
pub struct ApiCall {
	/// HTTP method.
	pub method: Method,
	/// Path relative to the descriptor's base URL.
	pub path: String,
	/// Query pairs appended to the URL in order.
	pub query: Vec<(String, String)>,
	/// Extra request headers. `Authorization` is managed by the token provider chain.
	pub headers: HeaderMap,
	/// JSON body.
	pub body: Option<JsonValue>,
	/// Token forced by the caller; disables refresh-and-retry.
	pub token_override: Option<TokenSecret>,
	/// Whether an auth failure may trigger one refresh-and-retry cycle.
	pub allow_refresh: bool,
	/// Skips the provider chain entirely; the request goes out without `Authorization`.
	pub guest: bool,
	/// `<ENDPOINT>_FAILED` code used when an error body carries no code.
	pub fallback_code: String,
}
impl ApiCall {
	/// Fallback code used when the caller does not name one.
	pub const DEFAULT_FALLBACK_CODE: &'static str = "REQUEST_FAILED";

	/// Creates a call for `method` + `path`.
	pub fn new(method: Method, path: impl Into<String>) -> Self {
		Self {
			method,
			path: path.into(),
			query: Vec::new(),
			headers: HeaderMap::new(),
			body: None,
			token_override: None,
			allow_refresh: true,
			guest: false,
			fallback_code: Self::DEFAULT_FALLBACK_CODE.into(),
		}
	}

	/// Shorthand for a `GET` call.
	pub fn get(path: impl Into<String>) -> Self {
		Self::new(Method::GET, path)
	}

	/// Shorthand for a `POST` call.
	pub fn post(path: impl Into<String>) -> Self {
		Self::new(Method::POST, path)
	}

	/// Shorthand for a `PUT` call.
	pub fn put(path: impl Into<String>) -> Self {
		Self::new(Method::PUT, path)
	}

	/// Shorthand for a `PATCH` call.
	pub fn patch(path: impl Into<String>) -> Self {
		Self::new(Method::PATCH, path)
	}

	/// Shorthand for a `DELETE` call.
	pub fn delete(path: impl Into<String>) -> Self {
		Self::new(Method::DELETE, path)
	}

	/// Appends a query pair.
	pub fn query(mut self, key: impl Into<String>, value: impl ToString) -> Self {
		self.query.push((key.into(), value.to_string()));

		self
	}

	/// Appends a query pair when `value` is present.
	pub fn query_opt(self, key: impl Into<String>, value: Option<impl ToString>) -> Self {
		match value {
			Some(value) => self.query(key, value),
			None => self,
		}
	}

	/// Adds or replaces a request header.
	pub fn header(mut self, name: HeaderName, value: HeaderValue) -> Self {
		self.headers.insert(name, value);

		self
	}

	/// Serializes `body` as the JSON request body.
	pub fn json<T>(mut self, body: &T) -> Result<Self, ConfigError>
	where
		T: ?Sized + Serialize,
	{
		self.body = Some(serde_json::to_value(body)?);

		Ok(self)
	}

	/// Forces `token` for this call; auth failures then propagate without a refresh.
	pub fn with_token(mut self, token: impl Into<TokenSecret>) -> Self {
		self.token_override = Some(token.into());

		self
	}

	/// Marks the call as unauthenticated: no bearer is resolved or forwarded, and auth failures
	/// propagate without a refresh.
	pub fn guest(mut self) -> Self {
		self.guest = true;
		self.allow_refresh = false;

		self
	}

	/// Overrides whether an auth failure may trigger a refresh-and-retry cycle.
	pub fn allow_refresh(mut self, allow: bool) -> Self {
		self.allow_refresh = allow;

		self
	}

	/// Names the `<ENDPOINT>_FAILED` fallback code.
	pub fn fallback_code(mut self, code: impl Into<String>) -> Self {
		self.fallback_code = code.into();

		self
	}

	/// Returns the retry form of this call, which never triggers another refresh.
	pub fn without_refresh(self) -> Self {
		self.allow_refresh(false)
	}
}

#[cfg(test)]
mod tests {
	// crates.io
	use serde_json::json;
	// self
	use super::*;

	#[test]
	fn builder_accumulates_parts() {
		let call = ApiCall::get("chats")
			.query("size", 20)
			.query_opt("cursor", None::<String>)
			.query_opt("keyword", Some("rust"))
			.fallback_code("CHAT_LIST_FAILED");

		assert_eq!(call.method, Method::GET);
		assert_eq!(
			call.query,
			vec![("size".to_owned(), "20".to_owned()), ("keyword".to_owned(), "rust".to_owned())]
		);
		assert!(call.allow_refresh);
		assert_eq!(call.fallback_code, "CHAT_LIST_FAILED");
		assert!(!call.without_refresh().allow_refresh);
	}

	#[test]
	fn json_bodies_are_captured_as_values() {
		let call = ApiCall::post("auth/login")
			.json(&json!({ "email": "a@b.c" }))
			.expect("JSON literal should serialize.");

		assert_eq!(call.body, Some(json!({ "email": "a@b.c" })));
		assert!(call.token_override.is_none());
		assert!(ApiCall::get("x").with_token("t").token_override.is_some());
	}

	#[test]
	fn guest_calls_never_refresh() {
		let call = ApiCall::post("auth/login").guest();

		assert!(call.guest);
		assert!(!call.allow_refresh);
		assert!(!ApiCall::get("chats").guest);
	}
}
