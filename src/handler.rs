//! UI-facing error policy.
//!
//! [`CommonErrorHandler`] is the single place that decides what an error means for the session:
//! an auth-class business error ends it (tokens cleared, caller redirected to the guest
//! destination), any other error is left for local handling.

// self
use crate::{_prelude::*, obs, store::TokenStore};

/// Generic text shown for failures that carry no user-facing message.
pub const GENERIC_FAILURE_MESSAGE: &str = "Something went wrong. Please try again later.";

/// Navigation hook invoked when a session ends.
pub trait Redirector
where
	Self: Send + Sync,
{
	/// Sends the user to `destination`.
	fn redirect(&self, destination: &str);
}

/// What the UI should do with an error.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorDisposition {
	/// The session is over; tokens are cleared and the user is redirected.
	SessionEnded,
	/// A business error the caller handles locally (toast, inline message, ...).
	Business,
	/// Transport, decode, refresh, storage, or configuration failure.
	Unexpected,
}

/// Shared handler applying the session-ending policy.
#[derive(Clone)]
pub struct CommonErrorHandler {
	store: Arc<dyn TokenStore>,
	redirector: Arc<dyn Redirector>,
	guest_destination: String,
}
impl CommonErrorHandler {
	/// Creates a handler that clears `store` and redirects through `redirector`.
	pub fn new(
		store: Arc<dyn TokenStore>,
		redirector: Arc<dyn Redirector>,
		guest_destination: impl Into<String>,
	) -> Self {
		Self { store, redirector, guest_destination: guest_destination.into() }
	}

	/// Classifies `err` without side effects.
	pub fn classify(err: &Error) -> ErrorDisposition {
		match err.as_business() {
			Some(business) if business.is_auth_failure() => ErrorDisposition::SessionEnded,
			Some(_) => ErrorDisposition::Business,
			None => ErrorDisposition::Unexpected,
		}
	}

	/// Applies the policy. Returns `true` when the error was consumed (session ended).
	pub async fn handle(&self, err: &Error) -> bool {
		if Self::classify(err) != ErrorDisposition::SessionEnded {
			return false;
		}

		// A failed clear still redirects.
		if let Err(err) = self.store.clear().await {
			obs::store_failure("Failed to clear tokens before redirecting.", &err);
		}

		self.redirector.redirect(&self.guest_destination);

		true
	}

	/// Returns text safe to show to an end user.
	pub fn user_message(err: &Error) -> &str {
		match err.as_business() {
			Some(business) if !business.message.is_empty() => &business.message,
			_ => GENERIC_FAILURE_MESSAGE,
		}
	}
}
impl Debug for CommonErrorHandler {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("CommonErrorHandler")
			.field("guest_destination", &self.guest_destination)
			.finish()
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::{
		auth::{StoredTokens, TokenLifetimes, TokenPair},
		error::TransportError,
		refresh::RefreshFailure,
		store::{MemoryStore, ReadFuture, StoreError, StoreFuture},
	};

	#[derive(Default)]
	struct RecordingRedirector(Mutex<Vec<String>>);
	impl Redirector for RecordingRedirector {
		fn redirect(&self, destination: &str) {
			self.0.lock().push(destination.to_owned());
		}
	}

	struct UnclearableStore;
	impl TokenStore for UnclearableStore {
		fn read(&self) -> ReadFuture<'_> {
			Box::pin(async { StoredTokens::from(TokenPair::new("a", "r")) })
		}

		fn write(&self, _pair: TokenPair, _lifetimes: TokenLifetimes) -> StoreFuture<'_, ()> {
			Box::pin(async { Ok(()) })
		}

		fn clear(&self) -> StoreFuture<'_, ()> {
			Box::pin(async { Err(StoreError::Backend { message: "jar is read-only".into() }) })
		}
	}

	fn handler() -> (CommonErrorHandler, MemoryStore, Arc<RecordingRedirector>) {
		let store = MemoryStore::with_pair(TokenPair::new("a", "r"));
		let redirector = Arc::new(RecordingRedirector::default());
		let handler =
			CommonErrorHandler::new(Arc::new(store.clone()), redirector.clone(), "/login");

		(handler, store, redirector)
	}

	#[tokio::test]
	async fn auth_failures_end_the_session() {
		let (handler, store, redirector) = handler();
		let err = Error::from(BusinessError::new("TOKEN_EXPIRED", "Expired."));

		assert!(handler.handle(&err).await);
		assert!(store.snapshot().is_empty());
		assert_eq!(*redirector.0.lock(), vec!["/login".to_owned()]);
	}

	#[tokio::test]
	async fn failed_clear_still_redirects() {
		let redirector = Arc::new(RecordingRedirector::default());
		let handler =
			CommonErrorHandler::new(Arc::new(UnclearableStore), redirector.clone(), "/login");
		let err = Error::from(BusinessError::new("AUTH_UNAUTHORIZED", "Sign in."));

		assert!(handler.handle(&err).await);
		assert_eq!(*redirector.0.lock(), vec!["/login".to_owned()]);
	}

	#[tokio::test]
	async fn other_errors_are_left_to_the_caller() {
		let (handler, store, redirector) = handler();
		let forbidden = Error::from(BusinessError::new("FORBIDDEN", "No access."));
		let refresh = Error::from(RefreshFailure::Failed { reason: "timeout".into(), code: None });

		assert!(!handler.handle(&forbidden).await);
		assert!(!handler.handle(&refresh).await);
		assert_eq!(store.snapshot().pair(), Some(TokenPair::new("a", "r")));
		assert!(redirector.0.lock().is_empty());
		assert_eq!(CommonErrorHandler::classify(&forbidden), ErrorDisposition::Business);
		assert_eq!(CommonErrorHandler::classify(&refresh), ErrorDisposition::Unexpected);
	}

	#[test]
	fn user_messages_never_leak_internals() {
		let io = std::io::Error::other("connection reset by 10.0.0.7");
		let err = Error::from(TransportError::from(io));

		assert_eq!(CommonErrorHandler::user_message(&err), GENERIC_FAILURE_MESSAGE);
		assert_eq!(
			CommonErrorHandler::user_message(&BusinessError::new("FORBIDDEN", "No access.").into()),
			"No access."
		);
	}
}
