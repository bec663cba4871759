//! Connector-level error types shared across flows, transports, and stores.

// self
use crate::{_prelude::*, auth::GrantType};

/// Connector-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical connector error exposed by public APIs.
///
/// Every variant maps onto an HTTP-style status via [`Error::status`] so route layers can
/// forward failures without re-classifying them.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Storage-layer failure.
	#[error("{0}")]
	Storage(
		#[from]
		#[source]
		crate::store::StoreError,
	),
	/// Local configuration problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Authentication failure (missing state, rejected grant, absent credentials).
	#[error(transparent)]
	Auth(#[from] AuthError),
	/// Provider answered with a payload that could not be understood.
	#[error(transparent)]
	Transient(#[from] TransientError),
	/// Transport failure (DNS, TCP, TLS, timeout).
	#[error(transparent)]
	Transport(#[from] TransportError),
}
impl Error {
	/// HTTP-style status code describing the failure.
	pub fn status(&self) -> u16 {
		match self {
			Self::Storage(_) | Self::Config(_) => 500,
			Self::Auth(err) => err.status(),
			Self::Transient(_) => 502,
			Self::Transport(TransportError::Timeout { .. }) => 504,
			Self::Transport(_) => 502,
		}
	}
}

/// Configuration and validation failures.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// Required environment variables are absent or empty.
	#[error("Missing required environment variables: {}.", vars.join(", "))]
	MissingEnvironment {
		/// Names of the missing variables.
		vars: Vec<&'static str>,
	},
	/// A configured URL could not be parsed.
	#[error("Configured {field} is not a valid URL: {value}.")]
	InvalidUrl {
		/// Configuration field label.
		field: &'static str,
		/// Raw value that failed to parse.
		value: String,
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// Scope list resolved to nothing.
	#[error("At least one scope must be configured.")]
	EmptyScopes,
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
	/// A user identifier failed validation.
	#[error(transparent)]
	InvalidIdentifier(#[from] crate::auth::IdentifierError),
}
impl ConfigError {
	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for ConfigError {
	fn from(e: ReqwestError) -> Self {
		Self::http_client_build(e)
	}
}

/// Authentication failures surfaced to callers with an HTTP-style status.
#[derive(Debug, ThisError)]
pub enum AuthError {
	/// No PKCE verifier is stored for the returned state (never issued, or expired).
	#[error("PKCE code_verifier not found or expired for user {user}.")]
	PkceStateMissing {
		/// Identity derived from the callback `state`.
		user: String,
	},
	/// The provider redirected back with an OAuth error instead of a code.
	#[error("Authorization was denied by the provider: {error}.")]
	AuthorizationDenied {
		/// OAuth `error` parameter.
		error: String,
		/// Optional OAuth `error_description` parameter.
		description: Option<String>,
	},
	/// The callback carried neither a code nor an error.
	#[error("Authorization callback is missing the code parameter.")]
	MissingCode,
	/// The token endpoint rejected a grant.
	#[error("{} failed with status {status}: {body}", grant.failure_label())]
	ProviderRejected {
		/// Grant that was attempted.
		grant: GrantType,
		/// HTTP status returned by the provider.
		status: u16,
		/// Raw response body returned by the provider.
		body: String,
	},
	/// No token bundle is stored for the user.
	#[error("No HubSpot credentials stored.")]
	MissingCredentials,
	/// Stored bundle is expired and carries no refresh token.
	#[error("Missing refresh_token.")]
	MissingRefreshToken,
}
impl AuthError {
	/// HTTP-style status code describing the failure.
	pub fn status(&self) -> u16 {
		match self {
			Self::PkceStateMissing { .. } | Self::AuthorizationDenied { .. } | Self::MissingCode =>
				400,
			Self::ProviderRejected { status, .. } => *status,
			Self::MissingCredentials | Self::MissingRefreshToken => 401,
		}
	}
}

/// Provider responses that could not be interpreted.
#[derive(Debug, ThisError)]
pub enum TransientError {
	/// Provider responded with malformed JSON.
	#[error("{endpoint} endpoint returned malformed JSON.")]
	ResponseParse {
		/// Endpoint label (`token` or `contacts`).
		endpoint: &'static str,
		/// Structured parsing failure.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
		/// HTTP status code of the response.
		status: u16,
	},
	/// Token endpoint returned a lifetime that cannot be applied to the current time.
	#[error("The expires_in value {value} is out of range.")]
	ExpiresInOutOfRange {
		/// Lifetime in seconds as reported.
		value: i64,
	},
	/// Token endpoint returned a zero or negative lifetime.
	#[error("The expires_in value must be positive, got {value}.")]
	NonPositiveExpiresIn {
		/// Lifetime in seconds as reported.
		value: i64,
	},
}

/// Transport-level failures (network, IO, timeout).
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while calling {url}.")]
	Network {
		/// Request URL without query.
		url: String,
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// Request exceeded the configured timeout.
	#[error("Request to {url} timed out.")]
	Timeout {
		/// Request URL without query.
		url: String,
	},
}
impl TransportError {
	/// Wraps a transport-specific network error.
	pub fn network(url: &Url, src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Network { url: endpoint_label(url), source: Box::new(src) }
	}

	/// Builds a timeout error for the provided URL.
	pub fn timeout(url: &Url) -> Self {
		Self::Timeout { url: endpoint_label(url) }
	}
}

fn endpoint_label(url: &Url) -> String {
	let mut label = url.clone();

	label.set_query(None);

	label.to_string()
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn auth_errors_carry_http_statuses() {
		assert_eq!(Error::from(AuthError::PkceStateMissing { user: "u".into() }).status(), 400);
		assert_eq!(Error::from(AuthError::MissingCredentials).status(), 401);
		assert_eq!(Error::from(AuthError::MissingRefreshToken).status(), 401);

		let rejected = AuthError::ProviderRejected {
			grant: GrantType::RefreshToken,
			status: 403,
			body: "{\"status\":\"BAD_REFRESH_TOKEN\"}".into(),
		};

		assert_eq!(rejected.status(), 403);
		assert_eq!(
			rejected.to_string(),
			"Refresh failed with status 403: {\"status\":\"BAD_REFRESH_TOKEN\"}"
		);
	}

	#[test]
	fn missing_environment_lists_every_variable() {
		let err =
			ConfigError::MissingEnvironment { vars: vec!["HUBSPOT_CLIENT_ID", "HUBSPOT_CLIENT_SECRET"] };

		assert_eq!(
			err.to_string(),
			"Missing required environment variables: HUBSPOT_CLIENT_ID, HUBSPOT_CLIENT_SECRET."
		);
		assert_eq!(Error::from(err).status(), 500);
	}

	#[test]
	fn transport_labels_strip_queries() {
		let url = Url::parse("https://api.hubapi.com/crm/v3/objects/contacts?limit=10")
			.expect("Fixture URL should parse.");
		let err = TransportError::timeout(&url);

		assert_eq!(err.to_string(), "Request to https://api.hubapi.com/crm/v3/objects/contacts timed out.");
		assert_eq!(Error::from(err).status(), 504);
	}
}
