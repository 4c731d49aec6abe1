//! Token storage contracts and built-in store implementations.

pub mod jar;
pub mod memory;

pub use jar::CookieStore;
pub use memory::MemoryStore;

// self
use crate::{
	_prelude::*,
	auth::{StoredTokens, TokenLifetimes, TokenPair},
};

/// Boxed future returned by fallible [`TokenStore`] operations.
pub type StoreFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, StoreError>> + 'a + Send>>;
/// Boxed future returned by [`TokenStore::read`], which never fails.
pub type ReadFuture<'a> = Pin<Box<dyn Future<Output = StoredTokens> + 'a + Send>>;

/// Storage backend contract for the active access/refresh token pair.
///
/// The store is the sole writer of tokens; callers read a snapshot per call.
pub trait TokenStore
where
	Self: Send + Sync,
{
	/// Returns the current tokens. Absent or unreadable tokens yield `None` fields.
	fn read(&self) -> ReadFuture<'_>;

	/// Persists both tokens with the provided lifetimes.
	fn write(&self, pair: TokenPair, lifetimes: TokenLifetimes) -> StoreFuture<'_, ()>;

	/// Overwrites both tokens with immediately expired values.
	fn clear(&self) -> StoreFuture<'_, ()>;

	/// Persists a client-visible auxiliary value (e.g. a user id) next to the tokens.
	///
	/// Stores without a client-visible medium ignore the value.
	fn write_auxiliary<'a>(
		&'a self,
		name: &'a str,
		value: &'a str,
		ttl: Duration,
	) -> StoreFuture<'a, ()> {
		let _ = (name, value, ttl);

		Box::pin(async { Ok(()) })
	}
}

/// Error type produced by [`TokenStore`] implementations.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ThisError)]
pub enum StoreError {
	/// A value could not be encoded for the storage medium.
	#[error("Serialization error: {message}.")]
	Serialization {
		/// Human-readable error payload.
		message: String,
	},
	/// Backend-level failure for the storage medium.
	#[error("Backend failure: {message}.")]
	Backend {
		/// Human-readable error payload.
		message: String,
	},
}
