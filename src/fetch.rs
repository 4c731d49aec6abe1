//! Authenticated fetch with refresh-and-retry-once semantics.
//!
//! [`ApiClient::call`] resolves a bearer token through the provider chain, issues the request,
//! and decodes the envelope. When the decoded error is an auth failure and the call allows it,
//! the client obtains a new access token (reusing a token another call already rotated into the
//! store, or joining the single in-flight refresh cycle) and re-issues the request exactly once
//! with refresh disabled. The refreshed pair is persisted before the retry goes out.

pub mod call;
pub mod provider;

pub use call::ApiCall;
pub use provider::*;

// crates.io
use http::{
	HeaderValue,
	header::{ACCEPT, CONTENT_TYPE},
};
// self
use crate::{
	_prelude::*,
	auth::{TokenPair, TokenSecret},
	config::ClientDescriptor,
	envelope::{self, code},
	error::ConfigError,
	http::{ApiHttpClient, ApiRequest},
	obs::{self, CallKind, CallOutcome, CallSpan},
	refresh::{RefreshCoordinator, RefreshFailure, RefreshMetrics, RefreshOutcome},
	store::TokenStore,
};
#[cfg(feature = "reqwest")] use crate::http::ReqwestHttpClient;

#[cfg(feature = "reqwest")]
/// Client specialized for the crate's default reqwest transport.
pub type ReqwestApiClient = ApiClient<ReqwestHttpClient>;

#[derive(Serialize)]
struct RefreshRequest<'a> {
	refresh_token: &'a str,
}

/// Envelope-aware API client bound to one session's token store.
///
/// The refresh coordinator is owned per client, so every clone shares the same single-flight
/// guard. A BFF serving many users derives a per-request client with [`ApiClient::with_store`],
/// which keeps the transport and descriptor but starts a fresh coordinator for that session.
pub struct ApiClient<C>
where
	C: ?Sized + ApiHttpClient,
{
	/// HTTP transport used for every upstream call.
	pub http_client: Arc<C>,
	/// Validated endpoints, cookie policy, and lifetimes.
	pub descriptor: ClientDescriptor,
	/// Session token store; the only writer of tokens.
	pub store: Arc<dyn TokenStore>,
	providers: TokenProviders,
	coordinator: Arc<RefreshCoordinator>,
}
impl<C> ApiClient<C>
where
	C: ?Sized + ApiHttpClient,
{
	/// Creates a client that reuses the caller-provided transport.
	pub fn with_http_client(
		descriptor: ClientDescriptor,
		store: Arc<dyn TokenStore>,
		http_client: impl Into<Arc<C>>,
	) -> Self {
		Self {
			http_client: http_client.into(),
			descriptor,
			providers: TokenProviders::standard(store.clone()),
			store,
			coordinator: Default::default(),
		}
	}

	/// Replaces the token provider chain.
	pub fn with_token_providers(mut self, providers: TokenProviders) -> Self {
		self.providers = providers;

		self
	}

	/// Derives a client for another session: same transport and descriptor, new store, standard
	/// provider chain, and an independent refresh coordinator.
	pub fn with_store(&self, store: Arc<dyn TokenStore>) -> Self {
		Self {
			http_client: self.http_client.clone(),
			descriptor: self.descriptor.clone(),
			providers: TokenProviders::standard(store.clone()),
			store,
			coordinator: Default::default(),
		}
	}

	/// Returns the refresh coordinator shared by this client's clones.
	pub fn coordinator(&self) -> &RefreshCoordinator {
		&self.coordinator
	}

	/// Returns the refresh counters.
	pub fn refresh_metrics(&self) -> &RefreshMetrics {
		self.coordinator.metrics()
	}

	/// Returns the provider chain.
	pub fn token_providers(&self) -> &TokenProviders {
		&self.providers
	}

	/// Issues `call` and decodes its payload, refreshing and retrying once on an auth failure.
	pub async fn call<T>(&self, call: ApiCall) -> Result<T>
	where
		T: DeserializeOwned,
	{
		const KIND: CallKind = CallKind::Request;

		let span = CallSpan::new(KIND, "call");

		obs::record_call_outcome(KIND, CallOutcome::Attempt);

		let result = span
			.instrument(async move {
				let resolved =
					if call.guest { None } else { self.providers.resolve(&call).await };
				let token = resolved.as_ref().map(|token| &token.secret);
				let err = match self.send(&call, token).await {
					Ok(data) => return Ok(data),
					Err(err) => err,
				};

				if !Self::should_refresh(&call, resolved.as_ref(), &err) {
					return Err(err);
				}

				let token = self.recover_access_token(resolved.as_ref()).await?;

				self.retry(call.without_refresh(), &token).await
			})
			.await;

		obs::record_result(KIND, &result);

		result
	}

	/// Obtains a new token pair through the single-flight coordinator.
	///
	/// Concurrent callers share one upstream exchange. A missing or rejected refresh token clears
	/// the store and surfaces as an auth-class [`Error::Business`]; other failures surface as
	/// [`Error::Refresh`] and leave the store untouched.
	pub async fn refresh_tokens(&self) -> Result<TokenPair> {
		const KIND: CallKind = CallKind::Refresh;

		let span = CallSpan::new(KIND, "refresh_tokens");

		obs::record_call_outcome(KIND, CallOutcome::Attempt);

		let result = span
			.instrument(self.coordinator.run(|| self.exchange_refresh_token()))
			.await
			.map_err(Error::from);

		obs::record_result(KIND, &result);

		result
	}

	fn should_refresh(call: &ApiCall, resolved: Option<&ResolvedToken>, err: &Error) -> bool {
		call.allow_refresh
			&& err.is_auth_failure()
			&& resolved.is_none_or(|token| token.origin.permits_refresh())
	}

	async fn recover_access_token(&self, failed: Option<&ResolvedToken>) -> Result<TokenSecret> {
		if let Some(failed) = failed.filter(|token| token.origin == TokenOrigin::Store)
			&& let Some(current) = self.store.read().await.access_token
			&& current != failed.secret
		{
			obs::token_event(
				"Access token was rotated by a concurrent call; reusing it.",
				Some(&current.fingerprint()),
			);

			return Ok(current);
		}

		Ok(self.refresh_tokens().await?.access_token)
	}

	async fn retry<T>(&self, call: ApiCall, token: &TokenSecret) -> Result<T>
	where
		T: DeserializeOwned,
	{
		const KIND: CallKind = CallKind::Retry;

		obs::record_call_outcome(KIND, CallOutcome::Attempt);

		let result = CallSpan::new(KIND, "retry").instrument(self.send(&call, Some(token))).await;

		obs::record_result(KIND, &result);

		result
	}

	async fn exchange_refresh_token(&self) -> RefreshOutcome {
		let Some(refresh_token) = self.store.read().await.refresh_token else {
			self.clear_ended_session().await;

			return Err(RefreshFailure::SessionEnded(
				BusinessError::new(code::AUTH_UNAUTHORIZED, "No refresh token is available.")
					.with_status(401),
			));
		};

		obs::token_event("Exchanging refresh token.", Some(&refresh_token.fingerprint()));

		let call = ApiCall::post(self.descriptor.refresh_endpoint.path())
			.fallback_code(code::TOKEN_REFRESH_FAILED)
			.json(&RefreshRequest { refresh_token: refresh_token.expose() })
			.map_err(|err| RefreshFailure::Failed { reason: err.to_string(), code: None })?;
		let result = self
			.send_to::<TokenPair>(self.descriptor.refresh_endpoint.clone(), &call, None)
			.await;

		match result {
			Ok(pair) => {
				self.store
					.write(pair.clone(), self.descriptor.lifetimes)
					.await
					.map_err(|err| RefreshFailure::Failed { reason: err.to_string(), code: None })?;

				obs::token_event("Token pair rotated.", Some(&pair.access_token.fingerprint()));

				Ok(pair)
			},
			Err(Error::Business(err)) if err.is_auth_failure() => {
				self.clear_ended_session().await;

				obs::token_event("Refresh token was rejected; session ended.", None);

				Err(RefreshFailure::SessionEnded(err))
			},
			Err(err) => Err(RefreshFailure::Failed {
				reason: err.to_string(),
				code: err.as_business().map(|business| business.code.clone()),
			}),
		}
	}

	async fn clear_ended_session(&self) {
		// The session is over either way; a failed clear is only reported.
		if let Err(err) = self.store.clear().await {
			obs::store_failure("Failed to clear tokens of an ended session.", &err);
		}
	}

	async fn send<T>(&self, call: &ApiCall, token: Option<&TokenSecret>) -> Result<T>
	where
		T: DeserializeOwned,
	{
		let url = self.url_for(call)?;

		self.send_to(url, call, token).await
	}

	async fn send_to<T>(&self, url: Url, call: &ApiCall, token: Option<&TokenSecret>) -> Result<T>
	where
		T: DeserializeOwned,
	{
		let request = build_request(url, call, token)?;
		let response = self
			.http_client
			.execute(request)
			.await
			.map_err(|err| self.http_client.map_transport_error(err))?;

		envelope::decode(&response, &call.fallback_code)
	}

	fn url_for(&self, call: &ApiCall) -> Result<Url, ConfigError> {
		let mut url = self
			.descriptor
			.base_url
			.join(call.path.trim_start_matches('/'))
			.map_err(|source| ConfigError::InvalidPath { path: call.path.clone(), source })?;

		if !call.query.is_empty() {
			url.query_pairs_mut().extend_pairs(&call.query);
		}

		Ok(url)
	}
}
#[cfg(feature = "reqwest")]
impl ApiClient<ReqwestHttpClient> {
	/// Creates a client backed by a default reqwest transport.
	pub fn new(descriptor: ClientDescriptor, store: Arc<dyn TokenStore>) -> Self {
		Self::with_http_client(descriptor, store, ReqwestHttpClient::default())
	}
}
impl<C> Clone for ApiClient<C>
where
	C: ?Sized + ApiHttpClient,
{
	fn clone(&self) -> Self {
		Self {
			http_client: self.http_client.clone(),
			descriptor: self.descriptor.clone(),
			store: self.store.clone(),
			providers: self.providers.clone(),
			coordinator: self.coordinator.clone(),
		}
	}
}
impl<C> Debug for ApiClient<C>
where
	C: ?Sized + ApiHttpClient,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("ApiClient")
			.field("base_url", &self.descriptor.base_url.as_str())
			.field("providers", &self.providers)
			.field("refreshing", &self.coordinator.is_refreshing())
			.finish()
	}
}

fn build_request(url: Url, call: &ApiCall, token: Option<&TokenSecret>) -> Result<ApiRequest> {
	let mut request = ApiRequest::new(call.method.clone(), url);

	request.headers = call.headers.clone();
	request.headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

	if let Some(body) = &call.body {
		request.body = Some(serde_json::to_vec(body).map_err(ConfigError::from)?);
		request.headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
	}

	let request = match token {
		Some(token) => request.with_bearer(token)?,
		None => request.without_bearer(),
	};

	Ok(request)
}
