//! Bearer credentials for real-time (publish/subscribe) connections.

// crates.io
use http::HeaderValue;
// self
use crate::{
	_prelude::*,
	auth::TokenSecret,
	error::ConfigError,
	fetch::ApiClient,
	http::ApiHttpClient,
	obs,
};

/// Token and `Authorization` value a real-time connection authenticates with.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RealtimeCredentials {
	/// Access token to present.
	pub token: TokenSecret,
	/// Ready-to-use `Authorization` header value (marked sensitive).
	pub authorization: HeaderValue,
}
impl RealtimeCredentials {
	fn new(token: TokenSecret) -> Result<Self, ConfigError> {
		let mut authorization = HeaderValue::try_from(format!("Bearer {}", token.expose()))
			.map_err(|_| ConfigError::InvalidHeader { name: "authorization" })?;

		authorization.set_sensitive(true);

		Ok(Self { token, authorization })
	}
}

impl<C> ApiClient<C>
where
	C: ?Sized + ApiHttpClient,
{
	/// Returns credentials for (re)establishing a real-time connection.
	///
	/// Uses the stored access token unless `force_refresh` is set or none is stored, in which
	/// case the session is refreshed through the single-flight coordinator first. Reconnects
	/// after a server-side auth rejection should pass `force_refresh = true`.
	pub async fn realtime_token(&self, force_refresh: bool) -> Result<RealtimeCredentials> {
		let stored = if force_refresh { None } else { self.store.read().await.access_token };
		let token = match stored {
			Some(token) => token,
			None => self.refresh_tokens().await?.access_token,
		};

		obs::token_event("Issuing real-time credentials.", Some(&token.fingerprint()));

		Ok(RealtimeCredentials::new(token)?)
	}
}
