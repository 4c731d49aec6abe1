//! Resume detail.

// self
use crate::{
	_prelude::*,
	auth::{ResumeId, UserId},
	fetch::{ApiCall, ApiClient},
	http::ApiHttpClient,
};

/// Fallback code for `GET resumes/{id}`.
pub const RESUME_DETAIL_FAILED: &str = "RESUME_DETAIL_FAILED";

/// Resume with its career history.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResumeDetail {
	/// Resume id.
	pub resume_id: ResumeId,
	/// Owner.
	pub user_id: UserId,
	/// Headline.
	pub title: String,
	/// Free-form introduction.
	#[serde(default)]
	pub summary: Option<String>,
	/// Career history, most recent first.
	#[serde(default)]
	pub careers: Vec<CareerEntry>,
	/// Listed skills.
	#[serde(default)]
	pub skills: Vec<String>,
	/// Last modification time.
	#[serde(default, with = "time::serde::rfc3339::option")]
	pub updated_at: Option<OffsetDateTime>,
}

/// One position in a resume's career history.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CareerEntry {
	/// Employer.
	pub company: String,
	/// Role held.
	pub position: String,
	/// Start month, `YYYY-MM`.
	pub started_on: String,
	/// End month, `YYYY-MM`; `None` while current.
	#[serde(default)]
	pub ended_on: Option<String>,
	/// Description of the work.
	#[serde(default)]
	pub description: Option<String>,
}
impl CareerEntry {
	/// Returns `true` for the position currently held.
	pub fn is_current(&self) -> bool {
		self.ended_on.is_none()
	}
}

impl<C> ApiClient<C>
where
	C: ?Sized + ApiHttpClient,
{
	/// Fetches one resume.
	pub async fn resume(&self, resume_id: &ResumeId) -> Result<ResumeDetail> {
		self.call(ApiCall::get(format!("resumes/{resume_id}")).fallback_code(RESUME_DETAIL_FAILED))
			.await
	}
}
