//! Request-scoped [`TokenStore`] backed by a cookie jar.
//!
//! A BFF route builds one [`CookieStore`] per incoming request from its `Cookie` header, hands
//! it to the client, and copies [`CookieStore::set_cookie_headers`] onto the outgoing response.
//! Token cookies are always `HttpOnly`; only values written through
//! [`TokenStore::write_auxiliary`] are readable by page scripts.

// crates.io
use cookie::{Cookie, CookieJar};
// self
use crate::{
	_prelude::*,
	auth::{StoredTokens, TokenLifetimes, TokenPair, TokenSecret},
	config::CookiePolicy,
	store::{ReadFuture, StoreFuture, TokenStore},
};

/// Cookie-jar token store for server-side request handling.
#[derive(Clone, Debug)]
pub struct CookieStore {
	jar: Arc<Mutex<CookieJar>>,
	policy: Arc<CookiePolicy>,
}
impl CookieStore {
	/// Creates an empty store.
	pub fn new(policy: CookiePolicy) -> Self {
		Self { jar: Default::default(), policy: Arc::new(policy) }
	}

	/// Seeds the jar from an incoming `Cookie` header; malformed pairs are skipped.
	pub fn from_cookie_header(header: &str, policy: CookiePolicy) -> Self {
		let store = Self::new(policy);

		{
			let mut jar = store.jar.lock();

			for cookie in Cookie::split_parse(header.to_owned()).flatten() {
				jar.add_original(cookie);
			}
		}

		store
	}

	/// Returns the `Set-Cookie` header values for every cookie changed through this store.
	pub fn set_cookie_headers(&self) -> Vec<String> {
		self.jar.lock().delta().map(ToString::to_string).collect()
	}

	/// Returns the current value of an arbitrary cookie.
	pub fn get(&self, name: &str) -> Option<String> {
		self.jar.lock().get(name).map(|cookie| cookie.value().to_owned())
	}

	/// Returns the policy applied to written cookies.
	pub fn policy(&self) -> &CookiePolicy {
		&self.policy
	}

	fn build(&self, name: &str, value: &str, ttl: Duration, http_only: bool) -> Cookie<'static> {
		let mut builder = Cookie::build((name.to_owned(), value.to_owned()))
			.path(self.policy.path.clone())
			.secure(self.policy.secure)
			.http_only(http_only)
			.same_site(self.policy.same_site)
			.max_age(ttl);

		if let Some(domain) = &self.policy.domain {
			builder = builder.domain(domain.clone());
		}
		if ttl.is_zero() {
			builder = builder.expires(OffsetDateTime::UNIX_EPOCH);
		}

		builder.build()
	}

	fn token(&self, name: &str) -> Option<TokenSecret> {
		self.jar
			.lock()
			.get(name)
			.map(Cookie::value)
			.filter(|value| !value.is_empty())
			.map(TokenSecret::from)
	}

	fn read_now(&self) -> StoredTokens {
		StoredTokens {
			access_token: self.token(&self.policy.access_cookie),
			refresh_token: self.token(&self.policy.refresh_cookie),
		}
	}

	fn write_now(&self, pair: &TokenPair, lifetimes: TokenLifetimes) {
		let access = self.build(
			&self.policy.access_cookie,
			pair.access_token.expose(),
			lifetimes.access,
			true,
		);
		let refresh = self.build(
			&self.policy.refresh_cookie,
			pair.refresh_token.expose(),
			lifetimes.refresh,
			true,
		);
		let mut jar = self.jar.lock();

		jar.add(access);
		jar.add(refresh);
	}

	fn clear_now(&self) {
		let access = self.build(&self.policy.access_cookie, "", Duration::ZERO, true);
		let refresh = self.build(&self.policy.refresh_cookie, "", Duration::ZERO, true);
		let mut jar = self.jar.lock();

		jar.add(access);
		jar.add(refresh);
	}
}
impl TokenStore for CookieStore {
	fn read(&self) -> ReadFuture<'_> {
		Box::pin(async move { self.read_now() })
	}

	fn write(&self, pair: TokenPair, lifetimes: TokenLifetimes) -> StoreFuture<'_, ()> {
		Box::pin(async move {
			self.write_now(&pair, lifetimes);

			Ok(())
		})
	}

	fn clear(&self) -> StoreFuture<'_, ()> {
		Box::pin(async move {
			self.clear_now();

			Ok(())
		})
	}

	fn write_auxiliary<'a>(
		&'a self,
		name: &'a str,
		value: &'a str,
		ttl: Duration,
	) -> StoreFuture<'a, ()> {
		Box::pin(async move {
			let cookie = self.build(name, value, ttl, false);

			self.jar.lock().add(cookie);

			Ok(())
		})
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn incoming_header_seeds_tokens_without_emitting_cookies() {
		let store = CookieStore::from_cookie_header(
			"access_token=a-1; theme=dark; refresh_token=r-1",
			CookiePolicy::default(),
		);
		let tokens = store.read_now();

		assert_eq!(tokens.pair(), Some(TokenPair::new("a-1", "r-1")));
		assert_eq!(store.get("theme").as_deref(), Some("dark"));
		assert!(store.set_cookie_headers().is_empty());
	}

	#[test]
	fn empty_cookie_values_read_as_absent() {
		let store = CookieStore::from_cookie_header(
			"access_token=; refresh_token=r-1",
			CookiePolicy::default(),
		);
		let tokens = store.read_now();

		assert!(tokens.access_token.is_none());
		assert_eq!(tokens.refresh_token, Some(TokenSecret::new("r-1")));
	}

	#[test]
	fn domain_attribute_is_applied_when_configured() {
		let store = CookieStore::new(CookiePolicy::default().with_domain("example.com"));

		store.write_now(&TokenPair::new("a", "r"), TokenLifetimes::default());

		let headers = store.set_cookie_headers();

		assert_eq!(headers.len(), 2);
		assert!(headers.iter().all(|header| header.contains("Domain=example.com")));
	}
}
