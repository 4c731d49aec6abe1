//! Demonstrates a BFF route that forwards the browser's cookies to the upstream API, survives an
//! expired access token through the shared refresh, and answers with the envelope, the derived
//! status, and the rotated `Set-Cookie` headers.
//!
//! The upstream is an in-process mock, so the example runs offline.

// std
use std::sync::Arc;
// crates.io
use color_eyre::Result;
use httpmock::prelude::*;
use serde_json::json;
use url::Url;
// self
use session_relay::{
	auth::ChatId,
	bff::{self, BffResponse},
	config::{ClientDescriptor, CookiePolicy},
	endpoints::PageRequest,
	fetch::ReqwestApiClient,
	store::CookieStore,
};

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let server = MockServer::start_async().await;
	let _expired = server
		.mock_async(|when, then| {
			when.method(GET).path("/chats").header("authorization", "Bearer access-old");
			then.status(401).json_body(json!({ "code": "TOKEN_EXPIRED", "message": "Expired." }));
		})
		.await;
	let refresh = server
		.mock_async(|when, then| {
			when.method(POST).path("/auth/refresh");
			then.status(200).json_body(json!({
				"code": "OK",
				"message": "OK",
				"data": { "accessToken": "access-new", "refreshToken": "refresh-new" }
			}));
		})
		.await;
	let _chats = server
		.mock_async(|when, then| {
			when.method(GET).path("/chats").header("authorization", "Bearer access-new");
			then.status(200).json_body(json!({
				"code": "OK",
				"message": "OK",
				"data": {
					"items": [{ "chatId": "c-1", "partnerName": "Kim", "unreadCount": 3 }],
					"nextCursor": null
				}
			}));
		})
		.await;
	let _missing = server
		.mock_async(|when, then| {
			when.method(GET).path("/chats/c-404");
			then.status(404)
				.json_body(json!({ "code": "CHAT_NOT_FOUND", "message": "No such chat." }));
		})
		.await;
	let descriptor = ClientDescriptor::builder(Url::parse(&server.base_url())?)
		.cookie(CookiePolicy::default().with_secure(false))
		.allow_insecure_http(true)
		.build()?;
	// Shared across requests: transport and descriptor only.
	let client = ReqwestApiClient::new(descriptor, Arc::new(CookieStore::new(Default::default())));
	let response = list_chats(&client, "access_token=access-old; refresh_token=refresh-old").await;

	print_response("GET /api/chats", &response)?;
	println!("Upstream refresh exchanges: {}.", refresh.hits_async().await);

	let store = CookieStore::from_cookie_header(
		"access_token=access-new; refresh_token=refresh-new",
		client.descriptor.cookie.clone(),
	);
	let session = client.with_store(Arc::new(store.clone()));
	let chat_id = ChatId::new("c-404")?;
	let response = bff::respond(session.chat(&chat_id).await).with_cookies(&store);

	print_response("GET /api/chats/c-404", &response)?;

	Ok(())
}

/// One route invocation: a request-scoped cookie store and a per-session client.
async fn list_chats(client: &ReqwestApiClient, cookie_header: &str) -> BffResponse {
	let store = CookieStore::from_cookie_header(cookie_header, client.descriptor.cookie.clone());
	let session = client.with_store(Arc::new(store.clone()));

	bff::respond(session.chats(&PageRequest::first(20)).await).with_cookies(&store)
}

fn print_response(route: &str, response: &BffResponse) -> Result<()> {
	println!("{route} -> {}", response.status);
	println!("  body: {}", String::from_utf8(response.body()?)?);

	for cookie in &response.set_cookies {
		println!("  set-cookie: {cookie}");
	}

	Ok(())
}
