//! Expert search and recommendations.

// self
use crate::{
	_prelude::*,
	auth::ExpertId,
	fetch::{ApiCall, ApiClient},
	http::ApiHttpClient,
};

/// Fallback code for `GET experts/search`.
pub const EXPERT_SEARCH_FAILED: &str = "EXPERT_SEARCH_FAILED";
/// Fallback code for `GET experts/recommendations`.
pub const EXPERT_RECOMMEND_FAILED: &str = "EXPERT_RECOMMEND_FAILED";

/// Search parameters for `GET experts/search`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ExpertQuery {
	/// Free-text keyword.
	pub keyword: String,
	/// Zero-based page index.
	pub page: u32,
	/// Page size; the upstream default applies when absent.
	pub size: Option<u32>,
}
impl ExpertQuery {
	/// First page of results for `keyword`.
	pub fn new(keyword: impl Into<String>) -> Self {
		Self { keyword: keyword.into(), ..Default::default() }
	}
}

/// Expert card.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpertSummary {
	/// Expert id.
	pub expert_id: ExpertId,
	/// Display name.
	pub nickname: String,
	/// Current company or affiliation.
	#[serde(default)]
	pub company: Option<String>,
	/// Job title.
	#[serde(default)]
	pub job_title: Option<String>,
	/// Avatar URL.
	#[serde(default)]
	pub image_url: Option<String>,
	/// Years of experience.
	#[serde(default)]
	pub years_of_experience: Option<u32>,
}

/// Page of expert search results.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpertSearchPage {
	/// Matching experts.
	#[serde(default)]
	pub experts: Vec<ExpertSummary>,
	/// Total number of matches.
	#[serde(default)]
	pub total_count: u64,
	/// Whether another page exists.
	#[serde(default)]
	pub has_next: bool,
}

impl<C> ApiClient<C>
where
	C: ?Sized + ApiHttpClient,
{
	/// Searches experts by keyword.
	pub async fn search_experts(&self, query: &ExpertQuery) -> Result<ExpertSearchPage> {
		let call = ApiCall::get("experts/search")
			.query("keyword", &query.keyword)
			.query("page", query.page)
			.query_opt("size", query.size)
			.fallback_code(EXPERT_SEARCH_FAILED);

		self.call(call).await
	}

	/// Lists experts recommended for the caller; guests receive a generic selection.
	pub async fn recommended_experts(&self) -> Result<Vec<ExpertSummary>> {
		self.call(ApiCall::get("experts/recommendations").fallback_code(EXPERT_RECOMMEND_FAILED))
			.await
	}
}
