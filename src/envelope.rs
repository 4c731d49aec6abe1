//! Response envelope decoding.
//!
//! Every upstream and BFF response carries a `{code, message, data}` JSON envelope. Decoding is
//! split in two steps: [`classify`] turns status + body into a tagged [`Decoded`] value, and
//! [`decode`] converts a successful payload into the endpoint's concrete type. A 2xx response
//! whose code is outside the success set is classified as a [`BusinessError`], exactly like a
//! non-2xx response.

pub mod code;

// self
use crate::{_prelude::*, http::RawResponse};

/// Uniform `{code, message, data}` wrapper returned by every endpoint.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse<T> {
	/// Success or business-error code.
	pub code: String,
	/// Human-readable message.
	pub message: String,
	/// Payload, present only for success codes that document one.
	pub data: Option<T>,
}
impl<T> ApiResponse<T> {
	/// Builds an `OK` envelope around `data`.
	pub fn ok(data: T) -> Self {
		Self { code: code::OK.into(), message: code::OK.into(), data: Some(data) }
	}

	/// Builds a payload-less envelope with the provided code and message.
	pub fn empty(code: impl Into<String>, message: impl Into<String>) -> Self {
		Self { code: code.into(), message: message.into(), data: None }
	}
}

/// Tagged classification of a raw response.
#[derive(Clone, Debug, PartialEq)]
pub enum Decoded {
	/// Envelope carried a success code.
	Success {
		/// Success code (`OK`, `CREATED`, ...).
		code: String,
		/// Upstream message.
		message: String,
		/// Raw payload; `Null` when absent.
		data: JsonValue,
	},
	/// Envelope or status signaled a business failure.
	Failure(BusinessError),
}

/// Parses a response body, treating empty or invalid JSON as `null`.
pub fn parse_body(body: &[u8]) -> JsonValue {
	if body.iter().all(u8::is_ascii_whitespace) {
		return JsonValue::Null;
	}

	serde_json::from_slice(body).unwrap_or(JsonValue::Null)
}

/// Classifies a status + parsed body pair.
///
/// `fallback_code` names the `<ENDPOINT>_FAILED` code used when the body has no string `code`.
pub fn classify(status: u16, mut body: JsonValue, fallback_code: &str) -> Decoded {
	let is_2xx = (200..300).contains(&status);

	if is_2xx
		&& let Some(code) = body.get("code").and_then(JsonValue::as_str)
		&& code::is_success(code)
	{
		let code = code.to_owned();
		let message = message_or(&body, &code);
		let data = body.get_mut("data").map(JsonValue::take).unwrap_or(JsonValue::Null);

		return Decoded::Success { code, message, data };
	}

	Decoded::Failure(business_error(status, body, fallback_code))
}

/// Decodes a raw response into `T`, surfacing business failures as [`Error::Business`].
pub fn decode<T>(response: &RawResponse, fallback_code: &str) -> Result<T>
where
	T: DeserializeOwned,
{
	match classify(response.status, parse_body(&response.body), fallback_code) {
		Decoded::Success { data, .. } => serde_path_to_error::deserialize(data)
			.map_err(|source| Error::Decode { source, status: response.status }),
		Decoded::Failure(err) => Err(err.into()),
	}
}

fn business_error(status: u16, mut body: JsonValue, fallback_code: &str) -> BusinessError {
	let err = match body.get("code").and_then(JsonValue::as_str) {
		Some(code) => {
			let code = code.to_owned();
			let message = message_or(&body, &code);
			let err = BusinessError::new(code, message);

			match body.get_mut("data").map(JsonValue::take) {
				Some(JsonValue::Null) | None => err,
				Some(data) => err.with_data(data),
			}
		},
		None => BusinessError::fallback(fallback_code),
	};

	err.with_status(status)
}

fn message_or(body: &JsonValue, code: &str) -> String {
	body.get("message").and_then(JsonValue::as_str).unwrap_or(code).to_owned()
}

#[cfg(test)]
mod tests {
	// crates.io
	use serde_json::json;
	// self
	use super::*;

	fn raw(status: u16, body: &str) -> RawResponse {
		RawResponse::new(status, body.as_bytes().to_vec())
	}

	#[test]
	fn forbidden_inside_200_is_a_business_error() {
		let response = raw(200, r#"{"code":"FORBIDDEN","message":"No access.","data":null}"#);
		let err = decode::<JsonValue>(&response, "CHAT_FAILED")
			.expect_err("A 200 carrying FORBIDDEN must not decode as success.");
		let business = err.as_business().expect("Error should be a business error.");

		assert_eq!(business.code, "FORBIDDEN");
		assert_eq!(business.message, "No access.");
		assert_eq!(business.status, Some(200));
		assert!(business.data.is_none());
	}

	#[test]
	fn success_codes_yield_data() {
		let response = raw(201, r#"{"code":"CREATED","message":"done","data":{"id":7}}"#);
		let data: JsonValue = decode(&response, "CREATE_FAILED").expect("CREATED should decode.");

		assert_eq!(data, json!({ "id": 7 }));

		let response = raw(200, r#"{"code":"DELETED","message":"gone"}"#);

		decode::<()>(&response, "DELETE_FAILED").expect("Missing data should decode into unit.");
	}

	#[test]
	fn non_2xx_without_code_uses_fallback() {
		let err = decode::<JsonValue>(&raw(502, "<html>bad gateway</html>"), "CHAT_LIST_FAILED")
			.expect_err("Invalid body on 502 should fail.");
		let business = err.as_business().expect("Error should be a business error.");

		assert_eq!(business.code, "CHAT_LIST_FAILED");
		assert_eq!(business.message, "CHAT_LIST_FAILED");
		assert_eq!(business.status, Some(502));
	}

	#[test]
	fn non_2xx_with_code_keeps_payload() {
		let response = raw(
			404,
			r#"{"code":"MESSAGE_NOT_FOUND","message":"Missing.","data":{"messageId":"m-1"}}"#,
		);
		let err = decode::<JsonValue>(&response, "CHAT_MESSAGES_FAILED")
			.expect_err("404 should fail.");
		let business = err.as_business().expect("Error should be a business error.");

		assert_eq!(business.code, "MESSAGE_NOT_FOUND");
		assert_eq!(business.data, Some(json!({ "messageId": "m-1" })));
	}

	#[test]
	fn empty_2xx_body_is_a_fallback_failure() {
		assert!(matches!(
			classify(200, parse_body(b"  "), "LOGOUT_FAILED"),
			Decoded::Failure(BusinessError { ref code, .. }) if code == "LOGOUT_FAILED"
		));
	}

	#[test]
	fn mismatched_payload_reports_path() {
		#[derive(Debug, Deserialize)]
		struct Profile {
			#[allow(dead_code)]
			nickname: String,
		}

		let response = raw(200, r#"{"code":"OK","message":"OK","data":{"nickname":5}}"#);
		let err = decode::<Profile>(&response, "USER_PROFILE_FAILED")
			.expect_err("Numeric nickname should fail to decode.");

		match err {
			Error::Decode { source, status } => {
				assert_eq!(status, 200);
				assert_eq!(source.path().to_string(), "nickname");
			},
			other => panic!("Unexpected error: {other:?}"),
		}
	}
}
