//! Validated client configuration: upstream endpoints, cookie policy, and token lifetimes.

/// Builder API for assembling client descriptors.
pub mod builder;

pub use builder::*;

// crates.io
use cookie::SameSite;
// self
use crate::{_prelude::*, auth::TokenLifetimes};

/// Cookie attributes applied by [`CookieStore`](crate::store::CookieStore).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CookiePolicy {
	/// Name of the access token cookie.
	pub access_cookie: String,
	/// Name of the refresh token cookie.
	pub refresh_cookie: String,
	/// Adds the `Secure` attribute; disable only for local plain-HTTP development.
	pub secure: bool,
	/// `SameSite` attribute.
	pub same_site: SameSite,
	/// `Path` attribute.
	pub path: String,
	/// Optional `Domain` attribute.
	pub domain: Option<String>,
}
impl CookiePolicy {
	/// Default access cookie name.
	pub const ACCESS_COOKIE: &'static str = "access_token";
	/// Default refresh cookie name.
	pub const REFRESH_COOKIE: &'static str = "refresh_token";

	/// Toggles the `Secure` attribute.
	pub fn with_secure(mut self, secure: bool) -> Self {
		self.secure = secure;

		self
	}

	/// Sets the `Domain` attribute.
	pub fn with_domain(mut self, domain: impl Into<String>) -> Self {
		self.domain = Some(domain.into());

		self
	}
}
impl Default for CookiePolicy {
	fn default() -> Self {
		Self {
			access_cookie: Self::ACCESS_COOKIE.into(),
			refresh_cookie: Self::REFRESH_COOKIE.into(),
			secure: true,
			same_site: SameSite::Lax,
			path: "/".into(),
			domain: None,
		}
	}
}

/// Immutable client descriptor consumed by [`ApiClient`](crate::fetch::ApiClient).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClientDescriptor {
	/// Upstream base URL; always ends with `/` so relative paths join beneath it.
	pub base_url: Url,
	/// Endpoint that exchanges a refresh token for a new pair.
	pub refresh_endpoint: Url,
	/// Destination the error handler redirects to once a session ends.
	pub guest_destination: String,
	/// Cookie attributes for cookie-backed token stores.
	pub cookie: CookiePolicy,
	/// Lifetimes applied when persisting token pairs.
	pub lifetimes: TokenLifetimes,
}
impl ClientDescriptor {
	/// Creates a new builder for the provided upstream base URL.
	pub fn builder(base_url: Url) -> ClientDescriptorBuilder {
		ClientDescriptorBuilder::new(base_url)
	}
}
