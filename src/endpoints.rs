//! Typed wrappers for the upstream endpoints a BFF forwards.
//!
//! Each wrapper builds an [`ApiCall`](crate::fetch::ApiCall) with its `<ENDPOINT>_FAILED`
//! fallback code and decodes the envelope payload into a concrete type. Payloads use the
//! upstream's camelCase field names.

pub mod auth;
pub mod chat;
pub mod expert;
pub mod onboarding;
pub mod profile;
pub mod resume;

pub use auth::*;
pub use chat::*;
pub use expert::*;
pub use onboarding::*;
pub use profile::*;
pub use resume::*;

// self
use crate::_prelude::*;

/// Cursor-paginated list.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
	/// Items on this page.
	#[serde(default = "Vec::new")]
	pub items: Vec<T>,
	/// Cursor for the next page; `None` on the last page.
	#[serde(default)]
	pub next_cursor: Option<String>,
}
impl<T> Page<T> {
	/// Returns `true` when no further page exists.
	pub fn is_last(&self) -> bool {
		self.next_cursor.is_none()
	}
}

/// Cursor + size pagination parameters.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PageRequest {
	/// Cursor returned by the previous page.
	pub cursor: Option<String>,
	/// Requested page size; the upstream default applies when absent.
	pub size: Option<u32>,
}
impl PageRequest {
	/// First page with the given size.
	pub fn first(size: u32) -> Self {
		Self { cursor: None, size: Some(size) }
	}

	/// Page following `cursor`.
	pub fn after(cursor: impl Into<String>, size: u32) -> Self {
		Self { cursor: Some(cursor.into()), size: Some(size) }
	}
}
