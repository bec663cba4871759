//! Connector configuration sourced from the environment and validated at startup.
//!
//! Build a [`HubSpotConfig`] once at process start with [`HubSpotConfig::from_env`] and hand it
//! to the connector. Missing client credentials are reported together in a single
//! [`ConfigError::MissingEnvironment`].

// self
use crate::{_prelude::*, error::ConfigError};

/// Environment variable holding the OAuth client identifier (required).
pub const ENV_CLIENT_ID: &str = "HUBSPOT_CLIENT_ID";
/// Environment variable holding the OAuth client secret (required).
pub const ENV_CLIENT_SECRET: &str = "HUBSPOT_CLIENT_SECRET";
/// Environment variable overriding the token endpoint.
pub const ENV_TOKEN_URL: &str = "HUBSPOT_TOKEN_URL";
/// Environment variable overriding the authorization endpoint.
pub const ENV_AUTH_URL: &str = "HUBSPOT_AUTH_URL";
/// Environment variable overriding the redirect URI.
pub const ENV_REDIRECT_URI: &str = "HUBSPOT_REDIRECT_URI";
/// Environment variable holding comma-separated scopes.
pub const ENV_SCOPES: &str = "HUBSPOT_SCOPES";
/// Environment variable overriding the API base URL.
pub const ENV_BASE_URL: &str = "HUBSPOT_BASE_URL";
/// Environment variable overriding the web app URL used for record links.
pub const ENV_APP_URL: &str = "HUBSPOT_APP_URL";

const DEFAULT_TOKEN_URL: &str = "https://api.hubapi.com/oauth/v1/token";
const DEFAULT_AUTH_URL: &str = "https://app.hubspot.com/oauth/authorize";
const DEFAULT_REDIRECT_URI: &str = "http://localhost:8000/integrations/hubspot/oauth2callback";
const DEFAULT_SCOPES: &str = "crm.objects.contacts.read";
const DEFAULT_BASE_URL: &str = "https://api.hubapi.com";
const DEFAULT_APP_URL: &str = "https://app.hubspot.com";

/// Validated HubSpot OAuth client configuration.
#[derive(Clone, PartialEq, Eq)]
pub struct HubSpotConfig {
	/// OAuth client identifier.
	pub client_id: String,
	/// OAuth client secret, sent in the token request body.
	pub client_secret: String,
	/// Token endpoint for code exchanges and refreshes.
	pub token_url: Url,
	/// Authorization endpoint users are redirected to.
	pub auth_url: Url,
	/// Redirect URI registered with the HubSpot app.
	pub redirect_uri: Url,
	/// Requested scopes, joined with spaces in the authorization URL.
	pub scopes: Vec<String>,
	/// CRM API base URL.
	pub base_url: Url,
	/// Web app base URL used to build record links.
	pub app_url: Url,
	/// Timeout applied to every provider request.
	pub http_timeout: Duration,
	/// Lifetime of a pending PKCE verifier.
	pub pkce_ttl: Duration,
}
impl HubSpotConfig {
	/// Default provider request timeout.
	pub const DEFAULT_HTTP_TIMEOUT: Duration = Duration::seconds(30);
	/// Default PKCE verifier lifetime.
	pub const DEFAULT_PKCE_TTL: Duration = Duration::seconds(600);

	/// Creates a configuration with HubSpot's public endpoints and the provided credentials.
	///
	/// Blank credentials are rejected with [`ConfigError::MissingEnvironment`], naming the
	/// variable each one would normally come from.
	pub fn new(
		client_id: impl Into<String>,
		client_secret: impl Into<String>,
	) -> Result<Self, ConfigError> {
		Self::resolve(client_id.into(), client_secret.into(), |_| None)
	}

	/// Reads the configuration from the process environment.
	///
	/// With the `dotenv` feature, a `.env` file in the working directory (or its parents) is
	/// loaded first; variables already present in the environment win.
	pub fn from_env() -> Result<Self, ConfigError> {
		#[cfg(feature = "dotenv")]
		let _ = dotenvy::dotenv();

		Self::from_lookup(|name| std::env::var(name).ok())
	}

	/// Builds the configuration from an arbitrary variable lookup.
	///
	/// Empty values are treated as absent so `HUBSPOT_CLIENT_ID=` still fails validation.
	pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
	where
		F: Fn(&str) -> Option<String>,
	{
		let read = |name: &str| lookup(name).map(|v| v.trim().to_owned()).filter(|v| !v.is_empty());

		Self::resolve(
			read(ENV_CLIENT_ID).unwrap_or_default(),
			read(ENV_CLIENT_SECRET).unwrap_or_default(),
			read,
		)
	}

	fn resolve<F>(client_id: String, client_secret: String, read: F) -> Result<Self, ConfigError>
	where
		F: Fn(&str) -> Option<String>,
	{
		let client_id = client_id.trim().to_owned();
		let client_secret = client_secret.trim().to_owned();
		let vars = [(ENV_CLIENT_ID, &client_id), (ENV_CLIENT_SECRET, &client_secret)]
			.into_iter()
			.filter_map(|(name, value)| value.is_empty().then_some(name))
			.collect::<Vec<_>>();

		if !vars.is_empty() {
			return Err(ConfigError::MissingEnvironment { vars });
		}

		let url_or = |field: &'static str, name: &str, default: &str| {
			let value = read(name).unwrap_or_else(|| default.to_owned());

			Url::parse(&value).map_err(|source| ConfigError::InvalidUrl { field, value, source })
		};
		let scopes = parse_scopes(&read(ENV_SCOPES).unwrap_or_else(|| DEFAULT_SCOPES.to_owned()));

		if scopes.is_empty() {
			return Err(ConfigError::EmptyScopes);
		}

		Ok(Self {
			client_id,
			client_secret,
			token_url: url_or("token URL", ENV_TOKEN_URL, DEFAULT_TOKEN_URL)?,
			auth_url: url_or("authorization URL", ENV_AUTH_URL, DEFAULT_AUTH_URL)?,
			redirect_uri: url_or("redirect URI", ENV_REDIRECT_URI, DEFAULT_REDIRECT_URI)?,
			scopes,
			base_url: url_or("base URL", ENV_BASE_URL, DEFAULT_BASE_URL)?,
			app_url: url_or("app URL", ENV_APP_URL, DEFAULT_APP_URL)?,
			http_timeout: Self::DEFAULT_HTTP_TIMEOUT,
			pkce_ttl: Self::DEFAULT_PKCE_TTL,
		})
	}

	/// Overrides the token endpoint.
	pub fn with_token_url(mut self, url: Url) -> Self {
		self.token_url = url;

		self
	}

	/// Overrides the authorization endpoint.
	pub fn with_auth_url(mut self, url: Url) -> Self {
		self.auth_url = url;

		self
	}

	/// Overrides the redirect URI.
	pub fn with_redirect_uri(mut self, url: Url) -> Self {
		self.redirect_uri = url;

		self
	}

	/// Overrides the CRM API base URL.
	pub fn with_base_url(mut self, url: Url) -> Self {
		self.base_url = url;

		self
	}

	/// Overrides the web app URL used for record links.
	pub fn with_app_url(mut self, url: Url) -> Self {
		self.app_url = url;

		self
	}

	/// Replaces the requested scopes.
	pub fn with_scopes<I, S>(mut self, scopes: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		self.scopes = scopes.into_iter().map(Into::into).collect();

		self
	}

	/// Overrides the provider request timeout.
	pub fn with_http_timeout(mut self, timeout: Duration) -> Self {
		self.http_timeout = timeout;

		self
	}

	/// Overrides how long a pending PKCE verifier stays valid.
	pub fn with_pkce_ttl(mut self, ttl: Duration) -> Self {
		self.pkce_ttl = ttl;

		self
	}

	/// Space-delimited scope string for the authorization URL.
	pub fn scope_param(&self) -> String {
		self.scopes.join(" ")
	}

	/// Absolute URL of a CRM API path (e.g. `/crm/v3/objects/contacts`).
	pub fn api_url(&self, path: &str) -> Result<Url, ConfigError> {
		join_path(&self.base_url, "base URL", path)
	}

	/// Link to a record in the HubSpot web app (e.g. `contacts/123`).
	pub fn app_link(&self, path: &str) -> Result<Url, ConfigError> {
		join_path(&self.app_url, "app URL", path)
	}
}
impl Debug for HubSpotConfig {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("HubSpotConfig")
			.field("client_id", &self.client_id)
			.field("client_secret", &"<redacted>")
			.field("token_url", &self.token_url.as_str())
			.field("auth_url", &self.auth_url.as_str())
			.field("redirect_uri", &self.redirect_uri.as_str())
			.field("scopes", &self.scopes)
			.field("base_url", &self.base_url.as_str())
			.field("app_url", &self.app_url.as_str())
			.field("http_timeout", &self.http_timeout)
			.field("pkce_ttl", &self.pkce_ttl)
			.finish()
	}
}

fn parse_scopes(raw: &str) -> Vec<String> {
	raw.split(',').map(str::trim).filter(|scope| !scope.is_empty()).map(str::to_owned).collect()
}

fn join_path(base: &Url, field: &'static str, path: &str) -> Result<Url, ConfigError> {
	let joined = format!("{}/{}", base.as_str().trim_end_matches('/'), path.trim_start_matches('/'));

	Url::parse(&joined).map_err(|source| ConfigError::InvalidUrl { field, value: joined, source })
}
