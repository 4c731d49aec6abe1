// self
use crate::{
	_prelude::*,
	auth::TokenLifetimes,
	config::{ClientDescriptor, CookiePolicy},
};

/// Errors raised while constructing or validating descriptors.
#[derive(Debug, PartialEq, Eq, ThisError)]
pub enum ClientDescriptorError {
	/// Endpoints must use HTTPS unless plain HTTP was explicitly allowed.
	#[error("The {endpoint} endpoint must use HTTPS: {url}.")]
	InsecureEndpoint {
		/// Which endpoint failed validation.
		endpoint: &'static str,
		/// Endpoint URL that failed validation.
		url: String,
	},
	/// The base URL cannot carry relative paths (e.g. `mailto:` or `data:` URLs).
	#[error("Base URL cannot be used as a base for request paths: {url}.")]
	CannotBeABase {
		/// Base URL that failed validation.
		url: String,
	},
	/// The refresh path could not be joined onto the base URL.
	#[error("Refresh path `{path}` is invalid.")]
	InvalidRefreshPath {
		/// Offending path.
		path: String,
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// Token lifetimes must be strictly positive.
	#[error("The {token} token lifetime must be positive.")]
	NonPositiveLifetime {
		/// Which lifetime failed validation.
		token: &'static str,
	},
	/// The guest redirect destination must not be empty.
	#[error("Guest destination cannot be empty.")]
	EmptyGuestDestination,
}

/// Builder for [`ClientDescriptor`] values.
#[derive(Debug)]
pub struct ClientDescriptorBuilder {
	/// Upstream base URL.
	pub base_url: Url,
	/// Refresh endpoint path relative to the base URL.
	pub refresh_path: String,
	/// Redirect destination for ended sessions.
	pub guest_destination: String,
	/// Cookie attributes.
	pub cookie: CookiePolicy,
	/// Token lifetimes.
	pub lifetimes: TokenLifetimes,
	/// Accepts `http://` endpoints (local development and mock servers).
	pub allow_insecure_http: bool,
}
impl ClientDescriptorBuilder {
	/// Default refresh endpoint path.
	pub const DEFAULT_REFRESH_PATH: &'static str = "auth/refresh";
	/// Default guest destination.
	pub const DEFAULT_GUEST_DESTINATION: &'static str = "/";

	/// Creates a new builder seeded with the provided base URL.
	pub fn new(base_url: Url) -> Self {
		Self {
			base_url,
			refresh_path: Self::DEFAULT_REFRESH_PATH.into(),
			guest_destination: Self::DEFAULT_GUEST_DESTINATION.into(),
			cookie: CookiePolicy::default(),
			lifetimes: TokenLifetimes::default(),
			allow_insecure_http: false,
		}
	}

	/// Overrides the refresh endpoint path.
	pub fn refresh_path(mut self, path: impl Into<String>) -> Self {
		self.refresh_path = path.into();

		self
	}

	/// Overrides the guest redirect destination.
	pub fn guest_destination(mut self, destination: impl Into<String>) -> Self {
		self.guest_destination = destination.into();

		self
	}

	/// Overrides the cookie policy.
	pub fn cookie(mut self, policy: CookiePolicy) -> Self {
		self.cookie = policy;

		self
	}

	/// Overrides the token lifetimes.
	pub fn lifetimes(mut self, lifetimes: TokenLifetimes) -> Self {
		self.lifetimes = lifetimes;

		self
	}

	/// Allows plain-HTTP endpoints.
	pub fn allow_insecure_http(mut self, allow: bool) -> Self {
		self.allow_insecure_http = allow;

		self
	}

	/// Consumes the builder and validates the resulting descriptor.
	pub fn build(self) -> Result<ClientDescriptor, ClientDescriptorError> {
		let mut base_url = self.base_url;

		if base_url.cannot_be_a_base() {
			return Err(ClientDescriptorError::CannotBeABase { url: base_url.to_string() });
		}
		if !base_url.path().ends_with('/') {
			let path = format!("{}/", base_url.path());

			base_url.set_path(&path);
		}

		let refresh_endpoint = base_url
			.join(self.refresh_path.trim_start_matches('/'))
			.map_err(|source| ClientDescriptorError::InvalidRefreshPath {
				path: self.refresh_path.clone(),
				source,
			})?;
		let descriptor = ClientDescriptor {
			base_url,
			refresh_endpoint,
			guest_destination: self.guest_destination,
			cookie: self.cookie,
			lifetimes: self.lifetimes,
		};

		descriptor.validate(self.allow_insecure_http)?;

		Ok(descriptor)
	}
}

impl ClientDescriptor {
	/// Validates invariants for the descriptor.
	fn validate(&self, allow_insecure_http: bool) -> Result<(), ClientDescriptorError> {
		validate_endpoint("base", &self.base_url, allow_insecure_http)?;
		validate_endpoint("refresh", &self.refresh_endpoint, allow_insecure_http)?;

		if !self.lifetimes.access.is_positive() {
			return Err(ClientDescriptorError::NonPositiveLifetime { token: "access" });
		}
		if !self.lifetimes.refresh.is_positive() {
			return Err(ClientDescriptorError::NonPositiveLifetime { token: "refresh" });
		}
		if self.guest_destination.trim().is_empty() {
			return Err(ClientDescriptorError::EmptyGuestDestination);
		}

		Ok(())
	}
}

fn validate_endpoint(
	name: &'static str,
	url: &Url,
	allow_insecure_http: bool,
) -> Result<(), ClientDescriptorError> {
	match url.scheme() {
		"https" => Ok(()),
		"http" if allow_insecure_http => Ok(()),
		_ => Err(ClientDescriptorError::InsecureEndpoint { endpoint: name, url: url.to_string() }),
	}
}
