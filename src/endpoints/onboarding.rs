//! Option catalogs shown during onboarding.

// self
use crate::{
	_prelude::*,
	fetch::{ApiCall, ApiClient},
	http::ApiHttpClient,
};

/// Fallback code for `GET onboarding/metadata`.
pub const ONBOARDING_METADATA_FAILED: &str = "ONBOARDING_METADATA_FAILED";

/// Selectable option.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OnboardingOption {
	/// Stable code submitted back to the upstream.
	pub code: String,
	/// Display label.
	pub label: String,
}

/// Catalogs offered during onboarding.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OnboardingMetadata {
	/// Job categories.
	#[serde(default)]
	pub job_categories: Vec<OnboardingOption>,
	/// Career stages.
	#[serde(default)]
	pub career_levels: Vec<OnboardingOption>,
	/// Interests.
	#[serde(default)]
	pub interests: Vec<OnboardingOption>,
}

impl<C> ApiClient<C>
where
	C: ?Sized + ApiHttpClient,
{
	/// Fetches the onboarding catalogs. Works for guests.
	pub async fn onboarding_metadata(&self) -> Result<OnboardingMetadata> {
		self.call(ApiCall::get("onboarding/metadata").fallback_code(ONBOARDING_METADATA_FAILED))
			.await
	}
}
