//! Signed-in user's profile.

// self
use crate::{
	_prelude::*,
	auth::UserId,
	fetch::{ApiCall, ApiClient},
	http::ApiHttpClient,
};

/// Fallback code for `GET users/me`.
pub const USER_PROFILE_FAILED: &str = "USER_PROFILE_FAILED";

/// Profile of the signed-in user.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
	/// User id.
	pub user_id: UserId,
	/// Display name.
	pub nickname: String,
	/// Account e-mail.
	#[serde(default)]
	pub email: Option<String>,
	/// Avatar URL.
	#[serde(default)]
	pub image_url: Option<String>,
	/// Selected job categories.
	#[serde(default)]
	pub job_categories: Vec<String>,
	/// Whether onboarding is complete.
	#[serde(default)]
	pub onboarded: bool,
}

impl<C> ApiClient<C>
where
	C: ?Sized + ApiHttpClient,
{
	/// Fetches the signed-in user's profile.
	pub async fn profile(&self) -> Result<UserProfile> {
		self.call(ApiCall::get("users/me").fallback_code(USER_PROFILE_FAILED)).await
	}
}
