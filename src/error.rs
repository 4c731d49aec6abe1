//! Crate-level error types shared across the envelope decoder, fetch layer, and stores.

// self
use crate::{_prelude::*, envelope::code, refresh::RefreshFailure};

/// Crate-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical error exposed by public APIs.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Upstream reported a business failure through the envelope or a non-2xx status.
	#[error(transparent)]
	Business(#[from] BusinessError),
	/// Transport failure (DNS, TCP, TLS, timeout).
	#[error(transparent)]
	Transport(#[from] TransportError),
	/// Envelope payload did not match the shape the endpoint expects.
	#[error("Response payload does not match the expected shape.")]
	Decode {
		/// Structured parsing failure, including the JSON path of the mismatch.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
		/// HTTP status code of the decoded response.
		status: u16,
	},
	/// Token refresh failed without ending the session.
	#[error(transparent)]
	Refresh(RefreshFailure),
	/// Token storage failure.
	#[error("{0}")]
	Storage(
		#[from]
		#[source]
		crate::store::StoreError,
	),
	/// Local configuration problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
}
impl Error {
	/// Returns the business error, if this is one.
	pub fn as_business(&self) -> Option<&BusinessError> {
		match self {
			Self::Business(err) => Some(err),
			_ => None,
		}
	}

	/// Returns `true` when the error signals an unauthorized, invalid, or expired token.
	pub fn is_auth_failure(&self) -> bool {
		self.as_business().is_some_and(BusinessError::is_auth_failure)
	}
}
impl From<RefreshFailure> for Error {
	fn from(failure: RefreshFailure) -> Self {
		match failure {
			RefreshFailure::SessionEnded(err) => Self::Business(err),
			other => Self::Refresh(other),
		}
	}
}

/// Business failure reported by the upstream, carrying its code unchanged.
#[derive(Clone, Debug, PartialEq, ThisError)]
#[error("{code}: {message}")]
pub struct BusinessError {
	/// Upstream business code (e.g. `FORBIDDEN`).
	pub code: String,
	/// Human-readable message supplied by the upstream.
	pub message: String,
	/// Optional error payload.
	pub data: Option<JsonValue>,
	/// HTTP status the error arrived with, when observed on the wire.
	pub status: Option<u16>,
}
impl BusinessError {
	/// Creates an error without payload or status.
	pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
		Self { code: code.into(), message: message.into(), data: None, status: None }
	}

	/// Builds the generic `<ENDPOINT>_FAILED` error used when a body carries no code.
	pub fn fallback(code: &str) -> Self {
		Self::new(code, code)
	}

	/// Attaches a payload.
	pub fn with_data(mut self, data: JsonValue) -> Self {
		self.data = Some(data);

		self
	}

	/// Attaches the observed HTTP status.
	pub fn with_status(mut self, status: u16) -> Self {
		self.status = Some(status);

		self
	}

	/// Returns `true` for unauthorized/invalid/expired token signals.
	pub fn is_auth_failure(&self) -> bool {
		code::is_auth_failure(&self.code) || self.status == Some(401)
	}
}

/// Configuration and request-construction failures.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
	/// Request path could not be joined onto the base URL.
	#[error("Request path `{path}` cannot be joined onto the base URL.")]
	InvalidPath {
		/// Offending relative path.
		path: String,
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// A header value contained characters HTTP does not allow.
	#[error("Header `{name}` has an invalid value.")]
	InvalidHeader {
		/// Header name.
		name: &'static str,
	},
	/// Request body could not be serialized.
	#[error("Request body could not be serialized.")]
	Body(#[from] serde_json::Error),
}
impl ConfigError {
	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}
}

/// Transport-level failures (network, IO).
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while calling the upstream API.")]
	Network {
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// The upstream did not answer in time.
	#[error("The upstream API did not respond in time.")]
	Timeout {
		/// Transport-specific timeout error.
		#[source]
		source: BoxError,
	},
	/// Underlying IO failure surfaced during transport.
	#[error("I/O error occurred while calling the upstream API.")]
	Io(#[from] std::io::Error),
}
impl TransportError {
	/// Wraps a transport-specific network error.
	pub fn network(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Network { source: Box::new(src) }
	}

	/// Wraps a transport-specific timeout.
	pub fn timeout(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Timeout { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for TransportError {
	fn from(e: ReqwestError) -> Self {
		if e.is_timeout() { Self::timeout(e) } else { Self::network(e) }
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn session_ended_refresh_failures_surface_as_business_errors() {
		let err: Error =
			RefreshFailure::SessionEnded(BusinessError::new("AUTH_UNAUTHORIZED", "expired"))
				.into();

		assert!(err.is_auth_failure());
		assert_eq!(err.as_business().map(|b| b.code.as_str()), Some("AUTH_UNAUTHORIZED"));

		let err: Error = RefreshFailure::Abandoned.into();

		assert!(matches!(err, Error::Refresh(RefreshFailure::Abandoned)));
		assert!(!err.is_auth_failure());
	}

	#[test]
	fn bare_401_counts_as_auth_failure() {
		let err = BusinessError::fallback("CHAT_LIST_FAILED").with_status(401);

		assert!(err.is_auth_failure());
		assert!(!BusinessError::fallback("CHAT_LIST_FAILED").with_status(500).is_auth_failure());
		assert_eq!(err.to_string(), "CHAT_LIST_FAILED: CHAT_LIST_FAILED");
	}
}
