//! Thread-safe in-memory [`TokenStore`] for native clients, local development, and tests.

// self
use crate::{
	_prelude::*,
	auth::{StoredTokens, TokenLifetimes, TokenPair},
	store::{ReadFuture, StoreFuture, TokenStore},
};

#[derive(Debug, Default)]
struct MemoryState {
	tokens: StoredTokens,
	auxiliary: HashMap<String, String>,
	writes: u64,
}

/// Transient storage backend that keeps the token pair in-process.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore(Arc<RwLock<MemoryState>>);
impl MemoryStore {
	/// Creates a store pre-seeded with `pair`.
	pub fn with_pair(pair: TokenPair) -> Self {
		let store = Self::default();

		store.0.write().tokens = pair.into();

		store
	}

	/// Returns a synchronous snapshot of the stored tokens.
	pub fn snapshot(&self) -> StoredTokens {
		self.0.read().tokens.clone()
	}

	/// Returns an auxiliary value previously written via [`TokenStore::write_auxiliary`].
	pub fn auxiliary(&self, name: &str) -> Option<String> {
		self.0.read().auxiliary.get(name).cloned()
	}

	/// Number of successful token writes since creation.
	pub fn write_count(&self) -> u64 {
		self.0.read().writes
	}
}
impl TokenStore for MemoryStore {
	fn read(&self) -> ReadFuture<'_> {
		let state = self.0.clone();

		Box::pin(async move { state.read().tokens.clone() })
	}

	fn write(&self, pair: TokenPair, _lifetimes: TokenLifetimes) -> StoreFuture<'_, ()> {
		let state = self.0.clone();

		Box::pin(async move {
			let mut guard = state.write();

			guard.tokens = pair.into();
			guard.writes += 1;

			Ok(())
		})
	}

	fn clear(&self) -> StoreFuture<'_, ()> {
		let state = self.0.clone();

		Box::pin(async move {
			state.write().tokens = StoredTokens::default();

			Ok(())
		})
	}

	fn write_auxiliary<'a>(
		&'a self,
		name: &'a str,
		value: &'a str,
		_ttl: Duration,
	) -> StoreFuture<'a, ()> {
		let state = self.0.clone();

		Box::pin(async move {
			state.write().auxiliary.insert(name.to_owned(), value.to_owned());

			Ok(())
		})
	}
}
