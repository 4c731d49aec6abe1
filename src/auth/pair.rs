//! Access/refresh token pairs, lifetimes, and store snapshots.

// self
use crate::{_prelude::*, auth::TokenSecret};

/// Access + refresh credentials issued together by the upstream.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenPair {
	/// Short-lived bearer credential.
	#[serde(alias = "accessToken")]
	pub access_token: TokenSecret,
	/// Long-lived credential exchanged for new pairs.
	#[serde(alias = "refreshToken")]
	pub refresh_token: TokenSecret,
}
impl TokenPair {
	/// Creates a pair from raw token strings.
	pub fn new(access: impl Into<TokenSecret>, refresh: impl Into<TokenSecret>) -> Self {
		Self { access_token: access.into(), refresh_token: refresh.into() }
	}
}

/// Lifetimes applied when persisting a [`TokenPair`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TokenLifetimes {
	/// Access token lifetime.
	pub access: Duration,
	/// Refresh token lifetime.
	pub refresh: Duration,
}
impl TokenLifetimes {
	/// Default access token lifetime (15 minutes).
	pub const DEFAULT_ACCESS: Duration = Duration::minutes(15);
	/// Default refresh token lifetime (14 days).
	pub const DEFAULT_REFRESH: Duration = Duration::days(14);
}
impl Default for TokenLifetimes {
	fn default() -> Self {
		Self { access: Self::DEFAULT_ACCESS, refresh: Self::DEFAULT_REFRESH }
	}
}

/// Snapshot of whatever tokens the active store currently holds.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StoredTokens {
	/// Stored access token, if any.
	pub access_token: Option<TokenSecret>,
	/// Stored refresh token, if any.
	pub refresh_token: Option<TokenSecret>,
}
impl StoredTokens {
	/// Returns the complete pair when both tokens are present.
	pub fn pair(&self) -> Option<TokenPair> {
		match (&self.access_token, &self.refresh_token) {
			(Some(access), Some(refresh)) =>
				Some(TokenPair { access_token: access.clone(), refresh_token: refresh.clone() }),
			_ => None,
		}
	}

	/// Returns `true` when no token is stored.
	pub fn is_empty(&self) -> bool {
		self.access_token.is_none() && self.refresh_token.is_none()
	}
}
impl From<TokenPair> for StoredTokens {
	fn from(pair: TokenPair) -> Self {
		Self { access_token: Some(pair.access_token), refresh_token: Some(pair.refresh_token) }
	}
}
