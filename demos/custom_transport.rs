//! Demonstrates plugging a non-reqwest transport into [`ApiClient::with_http_client`].
//!
//! 1. Implement [`ApiHttpClient`] and return every upstream answer, whatever its status, as a
//!    [`RawResponse`]; only failures that never reached the upstream are transport errors.
//! 2. Override [`ApiHttpClient::map_transport_error`] so timeouts stay distinguishable from
//!    other network failures.
//! 3. Match on the crate's [`Error`] to see how each failure class surfaces.

// std
use std::{
	error::Error as StdError,
	fmt::{Display, Formatter, Result as FmtResult},
	sync::Arc,
};
// crates.io
use color_eyre::Result;
use serde_json::json;
use url::Url;
// self
use session_relay::{
	auth::TokenPair,
	config::ClientDescriptor,
	error::{Error, TransportError},
	fetch::ApiClient,
	http::{ApiHttpClient, ApiRequest, HttpFuture, RawResponse},
	store::MemoryStore,
};

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let descriptor = ClientDescriptor::builder(Url::parse("https://api.example.com/v1/")?).build()?;
	let store = Arc::new(MemoryStore::with_pair(TokenPair::new("demo-access", "demo-refresh")));
	let client: ApiClient<CannedHttpClient> = ApiClient::with_http_client(
		descriptor.clone(),
		store.clone(),
		CannedHttpClient::new(CannedBehavior::Answer),
	);
	let profile = client.profile().await?;

	println!("Profile served by the canned transport: {}.", profile.nickname);

	let failures =
		[CannedBehavior::Timeout, CannedBehavior::Unreachable, CannedBehavior::Maintenance];

	for behavior in failures {
		let client: ApiClient<CannedHttpClient> = ApiClient::with_http_client(
			descriptor.clone(),
			store.clone(),
			CannedHttpClient::new(behavior),
		);

		match client.profile().await {
			Ok(_) => println!("{behavior:?}: unexpectedly succeeded."),
			Err(Error::Transport(TransportError::Timeout { .. })) =>
				println!("{behavior:?}: mapped to a timeout."),
			Err(Error::Transport(e)) => println!("{behavior:?}: transport failure: {e}"),
			Err(Error::Business(e)) =>
				println!("{behavior:?}: business error {} ({}).", e.code, e.message),
			Err(e) => println!("{behavior:?}: other failure: {e}"),
		}
	}

	Ok(())
}

#[derive(Clone, Copy, Debug)]
enum CannedBehavior {
	Answer,
	Timeout,
	Unreachable,
	Maintenance,
}

#[derive(Debug)]
enum CannedTransportError {
	DeadlineExceeded,
	HostUnreachable { host: String },
}
impl Display for CannedTransportError {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		match self {
			Self::DeadlineExceeded => write!(f, "Deadline exceeded"),
			Self::HostUnreachable { host } => write!(f, "Host {host} is unreachable"),
		}
	}
}
impl StdError for CannedTransportError {}

struct CannedHttpClient {
	behavior: CannedBehavior,
}
impl CannedHttpClient {
	fn new(behavior: CannedBehavior) -> Self {
		Self { behavior }
	}
}
impl ApiHttpClient for CannedHttpClient {
	type TransportError = CannedTransportError;

	fn execute(&self, request: ApiRequest) -> HttpFuture<'_, Self::TransportError> {
		let behavior = self.behavior;

		Box::pin(async move {
			let body = match behavior {
				CannedBehavior::Answer => json!({
					"code": "OK",
					"message": "OK",
					"data": {
						"userId": "u-1",
						"nickname": format!("bearer {}", request.bearer().unwrap_or("none")),
						"jobCategories": ["backend"]
					}
				}),
				CannedBehavior::Timeout => return Err(CannedTransportError::DeadlineExceeded),
				CannedBehavior::Unreachable =>
					return Err(CannedTransportError::HostUnreachable {
						host: request.url.host_str().unwrap_or_default().to_owned(),
					}),
				// Business failures arrive as a normal response, here inside a `503`.
				CannedBehavior::Maintenance => {
					let body = json!({ "code": "MAINTENANCE", "message": "Back soon." });

					return Ok(RawResponse::new(503, serde_json::to_vec(&body).unwrap_or_default()));
				},
			};

			Ok(RawResponse::new(200, serde_json::to_vec(&body).unwrap_or_default()))
		})
	}

	fn map_transport_error(&self, err: Self::TransportError) -> TransportError {
		match err {
			CannedTransportError::DeadlineExceeded => TransportError::timeout(err),
			CannedTransportError::HostUnreachable { .. } => TransportError::network(err),
		}
	}
}
