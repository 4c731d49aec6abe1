// self
use session_relay::{
	_preludet::*,
	auth::{TokenLifetimes, TokenPair},
	store::{MemoryStore, TokenStore},
};

#[tokio::test]
async fn read_is_idempotent() {
	let store = MemoryStore::with_pair(TokenPair::new("access-1", "refresh-1"));
	let first = store.read().await;
	let second = store.read().await;

	assert_eq!(first, second);
	assert_eq!(store.write_count(), 0);
}

#[tokio::test]
async fn write_then_read_round_trips() {
	let store = MemoryStore::default();

	assert!(store.read().await.is_empty());

	store
		.write(TokenPair::new("access-2", "refresh-2"), TokenLifetimes::default())
		.await
		.expect("Writing into the memory store should succeed.");

	assert_eq!(store.read().await.pair(), Some(TokenPair::new("access-2", "refresh-2")));
	assert_eq!(store.write_count(), 1);
}

#[tokio::test]
async fn clear_removes_both_tokens_and_keeps_auxiliary_values() {
	let store = MemoryStore::with_pair(TokenPair::new("access-3", "refresh-3"));

	store
		.write_auxiliary("user_id", "u-3", Duration::days(14))
		.await
		.expect("Auxiliary writes should succeed.");
	store.clear().await.expect("Clearing the memory store should succeed.");

	assert!(store.read().await.is_empty());
	assert_eq!(store.auxiliary("user_id").as_deref(), Some("u-3"));
}

#[tokio::test]
async fn clones_share_state_across_tasks() {
	let store = MemoryStore::default();
	let writer = store.clone();

	tokio::spawn(async move {
		writer
			.write(TokenPair::new("access-4", "refresh-4"), TokenLifetimes::default())
			.await
			.expect("Writing from a spawned task should succeed.");
	})
	.await
	.expect("Writer task should not panic.");

	assert_eq!(store.snapshot().pair(), Some(TokenPair::new("access-4", "refresh-4")));
}
