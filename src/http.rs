//! Transport primitives for HubSpot token and CRM calls.
//!
//! [`ProviderHttpClient`] is the connector's only dependency on an HTTP stack. It exposes the
//! two request shapes the flows need (form POST to the token endpoint, bearer GET against the
//! CRM API) and hands back the raw status and body so provider rejections can be surfaced
//! verbatim. Non-success statuses are *not* errors at this layer; only transport failures are.

// crates.io
use serde::de::DeserializeOwned;
#[cfg(feature = "reqwest")] use reqwest::redirect::Policy;
// self
use crate::{
	_prelude::*,
	error::{TransientError, TransportError},
};

/// Boxed future returned by [`ProviderHttpClient`] requests.
pub type HttpFuture<'a> = Pin<Box<dyn Future<Output = Result<HttpReply, TransportError>> + 'a + Send>>;

/// HTTP transport used for every outbound provider request.
///
/// Implementations must be `Send + Sync + 'static` so a single transport can back many
/// connector clones, and their futures must be `Send` so flows can hop executors.
pub trait ProviderHttpClient
where
	Self: 'static + Send + Sync,
{
	/// Sends `form` as an `application/x-www-form-urlencoded` POST body.
	fn post_form<'a>(&'a self, url: &'a Url, form: &'a [(&'a str, &'a str)]) -> HttpFuture<'a>;

	/// Sends a GET with `Authorization: Bearer <token>`. Query parameters are already on `url`.
	fn get_bearer<'a>(&'a self, url: &'a Url, token: &'a str) -> HttpFuture<'a>;
}

/// Status and body of a completed provider response.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HttpReply {
	/// HTTP status code.
	pub status: u16,
	/// Response body decoded as text.
	pub body: String,
}
impl HttpReply {
	/// Creates a reply from raw parts.
	pub fn new(status: u16, body: impl Into<String>) -> Self {
		Self { status, body: body.into() }
	}

	/// Returns `true` for 2xx statuses.
	pub fn is_success(&self) -> bool {
		(200..300).contains(&self.status)
	}

	/// Deserializes the body as JSON, reporting the failing path on error.
	pub fn json<T>(&self, endpoint: &'static str) -> Result<T, TransientError>
	where
		T: DeserializeOwned,
	{
		let de = &mut serde_json::Deserializer::from_str(&self.body);

		serde_path_to_error::deserialize(de).map_err(|source| TransientError::ResponseParse {
			endpoint,
			source,
			status: self.status,
		})
	}
}

/// Thin wrapper around [`ReqwestClient`] so shared HTTP behavior lives in one place.
///
/// Clients built through [`ReqwestHttpClient::with_timeout`] never follow redirects, so client
/// credentials only reach the configured token endpoint. Configure any custom client passed to
/// [`ReqwestHttpClient::with_client`] the same way.
#[cfg(feature = "reqwest")]
#[derive(Clone, Debug)]
pub struct ReqwestHttpClient(pub ReqwestClient);
#[cfg(feature = "reqwest")]
impl ReqwestHttpClient {
	/// Wraps an existing reqwest [`ReqwestClient`].
	pub fn with_client(client: ReqwestClient) -> Self {
		Self(client)
	}

	/// Builds a client that gives up after `timeout` and never follows redirects.
	pub fn with_timeout(timeout: Duration) -> Result<Self, crate::error::ConfigError> {
		let client =
			ReqwestClient::builder().timeout(timeout.unsigned_abs()).redirect(Policy::none()).build()?;

		Ok(Self(client))
	}

	async fn send(url: &Url, request: reqwest::RequestBuilder) -> Result<HttpReply, TransportError> {
		let response = request.send().await.map_err(|e| map_reqwest_error(url, e))?;
		let status = response.status().as_u16();
		let body = response.text().await.map_err(|e| map_reqwest_error(url, e))?;

		Ok(HttpReply { status, body })
	}
}
#[cfg(feature = "reqwest")]
impl AsRef<ReqwestClient> for ReqwestHttpClient {
	fn as_ref(&self) -> &ReqwestClient {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl ProviderHttpClient for ReqwestHttpClient {
	fn post_form<'a>(&'a self, url: &'a Url, form: &'a [(&'a str, &'a str)]) -> HttpFuture<'a> {
		Box::pin(Self::send(url, self.0.post(url.clone()).form(form)))
	}

	fn get_bearer<'a>(&'a self, url: &'a Url, token: &'a str) -> HttpFuture<'a> {
		Box::pin(Self::send(url, self.0.get(url.clone()).bearer_auth(token)))
	}
}

#[cfg(feature = "reqwest")]
fn map_reqwest_error(url: &Url, err: ReqwestError) -> TransportError {
	if err.is_timeout() { TransportError::timeout(url) } else { TransportError::network(url, err) }
}
