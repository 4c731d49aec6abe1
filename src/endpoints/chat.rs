//! Chat list, detail, messages, and read receipts.

// self
use crate::{
	_prelude::*,
	auth::{ChatId, MessageId, UserId},
	endpoints::{Page, PageRequest},
	fetch::{ApiCall, ApiClient},
	http::ApiHttpClient,
};

/// Fallback code for `GET chats`.
pub const CHAT_LIST_FAILED: &str = "CHAT_LIST_FAILED";
/// Fallback code for `GET chats/{id}`.
pub const CHAT_DETAIL_FAILED: &str = "CHAT_DETAIL_FAILED";
/// Fallback code for `GET chats/{id}/messages`.
pub const CHAT_MESSAGES_FAILED: &str = "CHAT_MESSAGES_FAILED";
/// Fallback code for `POST chats/{id}/read`.
pub const CHAT_READ_FAILED: &str = "CHAT_READ_FAILED";

/// Chat room as shown in the list.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatSummary {
	/// Room identifier.
	pub chat_id: ChatId,
	/// Display name of the other participant.
	pub partner_name: String,
	/// Avatar of the other participant.
	#[serde(default)]
	pub partner_image_url: Option<String>,
	/// Preview of the latest message.
	#[serde(default)]
	pub last_message: Option<String>,
	/// Time of the latest message.
	#[serde(default, with = "time::serde::rfc3339::option")]
	pub last_message_at: Option<OffsetDateTime>,
	/// Messages the caller has not read yet.
	#[serde(default)]
	pub unread_count: u32,
}

/// Full chat room.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatDetail {
	/// Room identifier.
	pub chat_id: ChatId,
	/// Participants, caller included.
	pub participants: Vec<ChatParticipant>,
	/// Publish/subscribe channel carrying live messages for this room.
	#[serde(default)]
	pub channel: Option<String>,
	/// Room creation time.
	#[serde(with = "time::serde::rfc3339")]
	pub created_at: OffsetDateTime,
}

/// Member of a chat room.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatParticipant {
	/// Participant's user id.
	pub user_id: UserId,
	/// Display name.
	pub nickname: String,
	/// Avatar URL.
	#[serde(default)]
	pub image_url: Option<String>,
}

/// Single chat message.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
	/// Message identifier.
	pub message_id: MessageId,
	/// Author.
	pub sender_id: UserId,
	/// Text body.
	pub content: String,
	/// Send time.
	#[serde(with = "time::serde::rfc3339")]
	pub sent_at: OffsetDateTime,
	/// Whether the recipient has read it.
	#[serde(default)]
	pub read: bool,
}

/// Body of `POST chats/{id}/read`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadReceipt {
	/// Newest message the caller has seen.
	pub last_read_message_id: MessageId,
}

impl<C> ApiClient<C>
where
	C: ?Sized + ApiHttpClient,
{
	/// Lists the caller's chat rooms.
	pub async fn chats(&self, page: &PageRequest) -> Result<Page<ChatSummary>> {
		self.call(paged(ApiCall::get("chats"), page).fallback_code(CHAT_LIST_FAILED)).await
	}

	/// Fetches one chat room.
	pub async fn chat(&self, chat_id: &ChatId) -> Result<ChatDetail> {
		self.call(ApiCall::get(format!("chats/{chat_id}")).fallback_code(CHAT_DETAIL_FAILED)).await
	}

	/// Lists messages of a room, newest first.
	pub async fn chat_messages(
		&self,
		chat_id: &ChatId,
		page: &PageRequest,
	) -> Result<Page<ChatMessage>> {
		let call = paged(ApiCall::get(format!("chats/{chat_id}/messages")), page)
			.fallback_code(CHAT_MESSAGES_FAILED);

		self.call(call).await
	}

	/// Marks messages up to `receipt.last_read_message_id` as read.
	pub async fn mark_chat_read(&self, chat_id: &ChatId, receipt: &ReadReceipt) -> Result<()> {
		let call = ApiCall::post(format!("chats/{chat_id}/read"))
			.fallback_code(CHAT_READ_FAILED)
			.json(receipt)?;

		self.call::<Option<JsonValue>>(call).await.map(|_| ())
	}
}

fn paged(call: ApiCall, page: &PageRequest) -> ApiCall {
	call.query_opt("cursor", page.cursor.as_deref()).query_opt("size", page.size)
}
