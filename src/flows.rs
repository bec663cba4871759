//! HubSpot connector flows: authorization, callback exchange, refresh, status, and item listing.

pub mod authorize;
pub mod callback;
pub mod items;
pub mod refresh;
pub mod status;

pub use authorize::*;
pub use callback::*;
pub use items::*;
pub use refresh::*;
pub use status::*;

// self
#[cfg(feature = "reqwest")] use crate::http::ReqwestHttpClient;
use crate::{
	_prelude::*,
	auth::{GrantType, TokenBundle, UserId},
	config::HubSpotConfig,
	error::AuthError,
	http::ProviderHttpClient,
	store::{KeyValueStore, StoreError, StoreKey},
};

#[cfg(feature = "reqwest")]
/// Connector specialized for the crate's default reqwest transport.
pub type ReqwestConnector = HubSpotConnector<ReqwestHttpClient>;

/// Coordinates the HubSpot OAuth flows for many users.
///
/// The connector owns the HTTP transport, the credential store, and the validated configuration.
/// It is cheap to clone; clones share all three plus the refresh counters. No per-user
/// coordination happens here: concurrent refreshes for the same user may both hit the provider,
/// and the last store write wins.
pub struct HubSpotConnector<C>
where
	C: ?Sized + ProviderHttpClient,
{
	/// HTTP transport used for every outbound provider request.
	pub http_client: Arc<C>,
	/// Credential store holding PKCE verifiers and token bundles.
	pub store: Arc<dyn KeyValueStore>,
	/// Validated client configuration.
	pub config: Arc<HubSpotConfig>,
	/// Shared counters for refresh outcomes.
	pub refresh_metrics: Arc<RefreshMetrics>,
}
impl<C> HubSpotConnector<C>
where
	C: ?Sized + ProviderHttpClient,
{
	/// Creates a connector around a caller-provided transport.
	pub fn with_http_client(
		store: Arc<dyn KeyValueStore>,
		config: HubSpotConfig,
		http_client: impl Into<Arc<C>>,
	) -> Self {
		Self {
			http_client: http_client.into(),
			store,
			config: Arc::new(config),
			refresh_metrics: Default::default(),
		}
	}

	pub(crate) async fn load_bundle(&self, user: &UserId) -> Result<Option<TokenBundle>> {
		let Some(raw) = self.store.get(&StoreKey::tokens(user)).await? else {
			return Ok(None);
		};
		let bundle = serde_json::from_str(&raw)
			.map_err(|e| StoreError::Serialization { message: e.to_string() })?;

		Ok(Some(bundle))
	}

	pub(crate) async fn save_bundle(&self, user: &UserId, bundle: &TokenBundle) -> Result<()> {
		let payload = serde_json::to_string(bundle)
			.map_err(|e| StoreError::Serialization { message: e.to_string() })?;

		self.store.set(&StoreKey::tokens(user), payload, bundle.store_ttl()).await?;

		Ok(())
	}

	/// POSTs a grant to the token endpoint and returns the stamped bundle.
	pub(crate) async fn request_token(
		&self,
		grant: GrantType,
		form: &[(&str, &str)],
	) -> Result<TokenBundle> {
		let reply = self.http_client.post_form(&self.config.token_url, form).await?;

		if reply.status != 200 {
			flow_event!(
				warn,
				grant = grant.as_str(),
				status = reply.status,
				"Token endpoint rejected the grant."
			);

			return Err(AuthError::ProviderRejected {
				grant,
				status: reply.status,
				body: reply.body,
			}
			.into());
		}

		let mut bundle = reply.json::<TokenBundle>("token")?;

		bundle.stamp(OffsetDateTime::now_utc())?;

		Ok(bundle)
	}
}
#[cfg(feature = "reqwest")]
impl HubSpotConnector<ReqwestHttpClient> {
	/// Creates a connector with its own reqwest transport bounded by
	/// [`HubSpotConfig::http_timeout`].
	pub fn new(store: Arc<dyn KeyValueStore>, config: HubSpotConfig) -> Result<Self> {
		let http_client = ReqwestHttpClient::with_timeout(config.http_timeout)?;

		Ok(Self::with_http_client(store, config, http_client))
	}
}
impl<C> Clone for HubSpotConnector<C>
where
	C: ?Sized + ProviderHttpClient,
{
	fn clone(&self) -> Self {
		Self {
			http_client: self.http_client.clone(),
			store: self.store.clone(),
			config: self.config.clone(),
			refresh_metrics: self.refresh_metrics.clone(),
		}
	}
}
impl<C> Debug for HubSpotConnector<C>
where
	C: ?Sized + ProviderHttpClient,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("HubSpotConnector")
			.field("config", &self.config)
			.field("refresh_metrics", &self.refresh_metrics)
			.finish()
	}
}
