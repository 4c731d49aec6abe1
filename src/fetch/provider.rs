//! Ordered bearer-token providers.
//!
//! [`TokenProviders`] evaluates its providers in order and uses the first token found. The
//! standard chain is: explicit per-call override, then the call's own `Authorization` header,
//! then the token store.

// self
use crate::{
	_prelude::*,
	auth::TokenSecret,
	fetch::ApiCall,
	http::bearer_from_headers,
	store::TokenStore,
};

/// Boxed future returned by [`TokenProvider::provide`].
pub type ProviderFuture<'a> = Pin<Box<dyn Future<Output = Option<TokenSecret>> + 'a + Send>>;

/// Where a resolved bearer token came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TokenOrigin {
	/// Forced by the caller through [`ApiCall::with_token`].
	Override,
	/// Taken from the call's `Authorization` header.
	RequestHeader,
	/// Read from the token store.
	Store,
	/// Supplied by a caller-defined provider.
	Custom(&'static str),
}
impl TokenOrigin {
	/// Returns `true` when an auth failure on this token may trigger a refresh.
	pub fn permits_refresh(self) -> bool {
		!matches!(self, Self::Override)
	}
}

/// Token chosen for a call together with its origin.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResolvedToken {
	/// Bearer credential.
	pub secret: TokenSecret,
	/// Provider origin.
	pub origin: TokenOrigin,
}

/// Source of bearer tokens for outgoing calls.
pub trait TokenProvider
where
	Self: Send + Sync,
{
	/// Origin reported for tokens this provider yields.
	fn origin(&self) -> TokenOrigin;

	/// Returns a token for `call`, if this provider has one.
	fn provide<'a>(&'a self, call: &'a ApiCall) -> ProviderFuture<'a>;
}

/// Yields the per-call override.
#[derive(Clone, Copy, Debug, Default)]
pub struct OverrideProvider;
impl TokenProvider for OverrideProvider {
	fn origin(&self) -> TokenOrigin {
		TokenOrigin::Override
	}

	fn provide<'a>(&'a self, call: &'a ApiCall) -> ProviderFuture<'a> {
		Box::pin(async move { call.token_override.clone() })
	}
}

/// Yields the bearer token already present on the call's headers.
#[derive(Clone, Copy, Debug, Default)]
pub struct HeaderProvider;
impl TokenProvider for HeaderProvider {
	fn origin(&self) -> TokenOrigin {
		TokenOrigin::RequestHeader
	}

	fn provide<'a>(&'a self, call: &'a ApiCall) -> ProviderFuture<'a> {
		Box::pin(async move { bearer_from_headers(&call.headers).map(TokenSecret::from) })
	}
}

/// Yields the access token held by a [`TokenStore`].
#[derive(Clone)]
pub struct StoreProvider(pub Arc<dyn TokenStore>);
impl TokenProvider for StoreProvider {
	fn origin(&self) -> TokenOrigin {
		TokenOrigin::Store
	}

	fn provide<'a>(&'a self, _call: &'a ApiCall) -> ProviderFuture<'a> {
		Box::pin(async move { self.0.read().await.access_token })
	}
}
impl Debug for StoreProvider {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("StoreProvider(..)")
	}
}

/// Ordered provider chain evaluated once per call.
#[derive(Clone, Default)]
pub struct TokenProviders(Vec<Arc<dyn TokenProvider>>);
impl TokenProviders {
	/// Override, then request header, then `store`.
	pub fn standard(store: Arc<dyn TokenStore>) -> Self {
		Self(vec![
			Arc::new(OverrideProvider),
			Arc::new(HeaderProvider),
			Arc::new(StoreProvider(store)),
		])
	}

	/// Appends a provider with the lowest precedence so far.
	pub fn push(mut self, provider: Arc<dyn TokenProvider>) -> Self {
		self.0.push(provider);

		self
	}

	/// Returns the origins in evaluation order.
	pub fn origins(&self) -> Vec<TokenOrigin> {
		self.0.iter().map(|provider| provider.origin()).collect()
	}

	/// Returns the first token any provider yields.
	pub async fn resolve(&self, call: &ApiCall) -> Option<ResolvedToken> {
		for provider in &self.0 {
			if let Some(secret) = provider.provide(call).await {
				return Some(ResolvedToken { secret, origin: provider.origin() });
			}
		}

		None
	}
}
impl Debug for TokenProviders {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_tuple("TokenProviders").field(&self.origins()).finish()
	}
}
