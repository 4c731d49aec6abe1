//! Login, logout, token refresh, and account restore.

// self
use crate::{
	_prelude::*,
	auth::{TokenPair, TokenSecret, UserId},
	envelope::code,
	fetch::{ApiCall, ApiClient},
	http::ApiHttpClient,
};

/// Fallback code for `POST auth/login`.
pub const LOGIN_FAILED: &str = "LOGIN_FAILED";
/// Fallback code for `POST auth/logout`.
pub const LOGOUT_FAILED: &str = "LOGOUT_FAILED";
/// Fallback code for `POST auth/refresh`.
pub const TOKEN_REFRESH_FAILED: &str = code::TOKEN_REFRESH_FAILED;
/// Fallback code for `POST auth/restore`.
pub const RESTORE_ACCOUNT_FAILED: &str = "RESTORE_ACCOUNT_FAILED";
/// Auxiliary value holding the signed-in user's id.
pub const USER_ID_AUXILIARY: &str = "user_id";

/// Credentials accepted by `POST auth/login`.
#[derive(Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
	/// Account e-mail.
	pub email: String,
	/// Account password.
	pub password: TokenSecret,
}
impl Debug for LoginRequest {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("LoginRequest").field("email", &self.email).finish_non_exhaustive()
	}
}

/// Token pair plus the signed-in user, returned by login and restore.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
	/// Issued tokens.
	#[serde(flatten)]
	pub tokens: TokenPair,
	/// Signed-in user.
	pub user_id: UserId,
	/// `true` when the account still has to finish onboarding.
	#[serde(default)]
	pub is_new_user: bool,
}

/// Request accepted by `POST auth/restore` for a withdrawn account still in its grace period.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RestoreRequest {
	/// Account to restore.
	pub user_id: UserId,
}

impl<C> ApiClient<C>
where
	C: ?Sized + ApiHttpClient,
{
	/// Signs in without a bearer and persists the issued session.
	pub async fn login(&self, request: &LoginRequest) -> Result<Session> {
		let call = ApiCall::post("auth/login")
			.fallback_code(LOGIN_FAILED)
			.guest()
			.json(request)?;

		self.establish_session(call).await
	}

	/// Restores a withdrawn account and persists the issued session.
	pub async fn restore_account(&self, request: &RestoreRequest) -> Result<Session> {
		let call = ApiCall::post("auth/restore")
			.fallback_code(RESTORE_ACCOUNT_FAILED)
			.guest()
			.json(request)?;

		self.establish_session(call).await
	}

	/// Signs out upstream and clears the store whatever the upstream answers.
	pub async fn logout(&self) -> Result<()> {
		let result = self
			.call::<Option<JsonValue>>(
				ApiCall::post("auth/logout").fallback_code(LOGOUT_FAILED).allow_refresh(false),
			)
			.await;

		self.store.clear().await?;

		result.map(|_| ())
	}

	/// Exchanges the stored refresh token for a new pair (`POST auth/refresh`).
	pub async fn refresh_session(&self) -> Result<TokenPair> {
		self.refresh_tokens().await
	}

	async fn establish_session(&self, call: ApiCall) -> Result<Session> {
		let session = self.call::<Session>(call).await?;

		self.store.write(session.tokens.clone(), self.descriptor.lifetimes).await?;
		self.store
			.write_auxiliary(USER_ID_AUXILIARY, &session.user_id, self.descriptor.lifetimes.refresh)
			.await?;

		Ok(session)
	}
}
