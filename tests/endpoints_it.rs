#![cfg(feature = "reqwest")]

// crates.io
use httpmock::prelude::*;
use serde_json::json;
// self
use session_relay::{
	_preludet::*,
	auth::{ChatId, ResumeId, TokenPair, UserId},
	bff,
	endpoints::{ExpertQuery, LoginRequest, PageRequest, ReadReceipt, RestoreRequest},
	store::MemoryStore,
};

fn ok(data: JsonValue) -> JsonValue {
	json!({ "code": "OK", "message": "OK", "data": data })
}

fn seeded(server: &MockServer) -> (ReqwestTestClient, Arc<MemoryStore>) {
	let (client, _) = build_reqwest_test_client(test_descriptor(&server.base_url()));
	let store = Arc::new(MemoryStore::with_pair(TokenPair::new("access-1", "refresh-1")));
	let client = client.with_store(store.clone());

	(client, store)
}

#[tokio::test]
async fn login_persists_the_session_and_user_id() {
	let server = MockServer::start_async().await;
	let (client, store) = build_reqwest_test_client(test_descriptor(&server.base_url()));
	let login = server
		.mock_async(|when, then| {
			when.method(POST)
				.path("/auth/login")
				.json_body(json!({ "email": "kim@example.com", "password": "pw" }));
			then.status(200).json_body(ok(json!({
				"accessToken": "access-login",
				"refreshToken": "refresh-login",
				"userId": "u-7"
			})));
		})
		.await;
	let session = client
		.login(&LoginRequest { email: "kim@example.com".into(), password: "pw".into() })
		.await
		.expect("Login should succeed.");

	login.assert_async().await;

	assert_eq!(session.user_id, UserId::new("u-7").expect("Fixture id should be valid."));
	assert_eq!(store.snapshot().pair(), Some(TokenPair::new("access-login", "refresh-login")));
	assert_eq!(store.auxiliary("user_id").as_deref(), Some("u-7"));
}

#[tokio::test]
async fn failed_login_never_refreshes() {
	let server = MockServer::start_async().await;
	let (client, store) = build_reqwest_test_client(test_descriptor(&server.base_url()));
	let login = server
		.mock_async(|when, then| {
			when.method(POST).path("/auth/login");
			then.status(401)
				.json_body(json!({ "code": "AUTH_UNAUTHORIZED", "message": "Bad credentials." }));
		})
		.await;
	let refresh = server
		.mock_async(|when, then| {
			when.method(POST).path("/auth/refresh");
			then.status(500);
		})
		.await;
	let err = client
		.login(&LoginRequest { email: "kim@example.com".into(), password: "wrong".into() })
		.await
		.expect_err("Rejected credentials must fail.");

	assert_eq!(err.as_business().map(|b| b.message.as_str()), Some("Bad credentials."));
	assert_eq!(login.hits_async().await, 1);
	assert_eq!(refresh.hits_async().await, 0);
	assert!(store.snapshot().is_empty());
}

#[tokio::test]
async fn session_calls_never_forward_a_stale_bearer() {
	let server = MockServer::start_async().await;
	let (client, store) = seeded(&server);
	let session = |access: &str, refresh: &str| {
		ok(json!({ "accessToken": access, "refreshToken": refresh, "userId": "u-7" }))
	};
	let login = server
		.mock_async(|when, then| {
			when.method(POST).path("/auth/login").header_missing("authorization");
			then.status(200).json_body(session("access-login", "refresh-login"));
		})
		.await;
	let restore = server
		.mock_async(|when, then| {
			when.method(POST).path("/auth/restore").header_missing("authorization");
			then.status(200).json_body(session("access-restored", "refresh-restored"));
		})
		.await;

	client
		.login(&LoginRequest { email: "kim@example.com".into(), password: "pw".into() })
		.await
		.expect("Login should go out without the stored bearer.");

	assert_eq!(store.snapshot().pair(), Some(TokenPair::new("access-login", "refresh-login")));

	let user_id = UserId::new("u-7").expect("Fixture id should be valid.");

	client
		.restore_account(&RestoreRequest { user_id })
		.await
		.expect("Restore should go out without the stored bearer.");

	assert_eq!(login.hits_async().await, 1);
	assert_eq!(restore.hits_async().await, 1);
	assert_eq!(
		store.snapshot().pair(),
		Some(TokenPair::new("access-restored", "refresh-restored"))
	);
}

#[tokio::test]
async fn logout_clears_the_store_even_when_upstream_fails() {
	let server = MockServer::start_async().await;
	let (client, store) = seeded(&server);
	let _logout = server
		.mock_async(|when, then| {
			when.method(POST).path("/auth/logout").header("authorization", "Bearer access-1");
			then.status(502).body("bad gateway");
		})
		.await;
	let err = client.logout().await.expect_err("Upstream failure should surface.");

	assert_eq!(err.as_business().map(|b| b.code.as_str()), Some("LOGOUT_FAILED"));
	assert!(store.snapshot().is_empty());
}

#[tokio::test]
async fn chat_endpoints_forward_paths_and_pagination() {
	let server = MockServer::start_async().await;
	let (client, _store) = seeded(&server);
	let chat_id = ChatId::new("c-1").expect("Fixture id should be valid.");
	let messages = server
		.mock_async(|when, then| {
			when.method(GET)
				.path("/chats/c-1/messages")
				.query_param("cursor", "m-10")
				.query_param("size", "2");
			then.status(200).json_body(ok(json!({
				"items": [
					{
						"messageId": "m-9",
						"senderId": "u-1",
						"content": "hi",
						"sentAt": "2026-03-01T09:00:00Z"
					},
					{
						"messageId": "m-8",
						"senderId": "u-2",
						"content": "hey",
						"sentAt": "2026-03-01T08:59:00Z",
						"read": true
					}
				],
				"nextCursor": "m-8"
			})));
		})
		.await;
	let read = server
		.mock_async(|when, then| {
			when.method(POST)
				.path("/chats/c-1/read")
				.json_body(json!({ "lastReadMessageId": "m-9" }));
			then.status(200).json_body(json!({ "code": "UPDATED", "message": "UPDATED" }));
		})
		.await;
	let page = client
		.chat_messages(&chat_id, &PageRequest::after("m-10", 2))
		.await
		.expect("Messages should load.");

	assert_eq!(page.items.len(), 2);
	assert_eq!(page.next_cursor.as_deref(), Some("m-8"));
	assert!(page.items[1].read);

	let receipt = ReadReceipt { last_read_message_id: page.items[0].message_id.clone() };

	client.mark_chat_read(&chat_id, &receipt).await.expect("Read receipt should be accepted.");

	messages.assert_async().await;
	read.assert_async().await;
}

#[tokio::test]
async fn expert_search_sends_keyword_and_page() {
	let server = MockServer::start_async().await;
	let (client, _store) = seeded(&server);
	let search = server
		.mock_async(|when, then| {
			when.method(GET)
				.path("/experts/search")
				.query_param("keyword", "backend")
				.query_param("page", "0");
			then.status(200).json_body(ok(json!({
				"experts": [{ "expertId": "e-1", "nickname": "Lee", "yearsOfExperience": 8 }],
				"totalCount": 1,
				"hasNext": false
			})));
		})
		.await;
	let page = client
		.search_experts(&ExpertQuery::new("backend"))
		.await
		.expect("Search should succeed.");

	search.assert_async().await;

	assert_eq!(page.total_count, 1);
	assert_eq!(page.experts[0].years_of_experience, Some(8));
}

#[tokio::test]
async fn bff_translates_upstream_not_found() {
	let server = MockServer::start_async().await;
	let (client, _store) = seeded(&server);
	let _resume = server
		.mock_async(|when, then| {
			when.method(GET).path("/resumes/r-404");
			then.status(404).json_body(json!({
				"code": "RESUME_NOT_FOUND",
				"message": "Resume does not exist.",
				"data": { "resumeId": "r-404" }
			}));
		})
		.await;
	let resume_id = ResumeId::new("r-404").expect("Fixture id should be valid.");
	let result = client.resume(&resume_id).await;
	let response = bff::respond(result);

	assert_eq!(response.status, 404);
	assert_eq!(response.envelope.code, "RESUME_NOT_FOUND");
	assert_eq!(response.envelope.data, Some(json!({ "resumeId": "r-404" })));
}

#[tokio::test]
async fn guest_endpoints_work_without_tokens() {
	let server = MockServer::start_async().await;
	let (client, _store) = build_reqwest_test_client(test_descriptor(&server.base_url()));
	let metadata = server
		.mock_async(|when, then| {
			when.method(GET).path("/onboarding/metadata").header_missing("authorization");
			then.status(200).json_body(ok(json!({
				"jobCategories": [{ "code": "DEV", "label": "Development" }]
			})));
		})
		.await;
	let catalog = client.onboarding_metadata().await.expect("Metadata should load for guests.");

	metadata.assert_async().await;

	assert_eq!(catalog.job_categories[0].code, "DEV");
	assert!(catalog.interests.is_empty());
}
