//! Refresh-on-demand for stored token bundles.
//!
//! [`HubSpotConnector::refresh_access_token`] hands back a bundle whose access token is usable
//! right now. A bundle that is still inside its lifetime (minus the 60 s safety margin) is
//! returned untouched without any network traffic; otherwise a single
//! `grant_type=refresh_token` call replaces it. There is no per-user guard, so two concurrent
//! callers holding the same stale bundle may both refresh and the last write wins.

mod metrics;

pub use metrics::RefreshMetrics;

// self
use crate::{
	_prelude::*,
	auth::{GrantType, TokenBundle, UserId},
	error::AuthError,
	flows::HubSpotConnector,
	http::ProviderHttpClient,
	obs::{self, FlowKind},
};

enum Freshness {
	Cached(TokenBundle),
	Rotated(TokenBundle),
}

impl<C> HubSpotConnector<C>
where
	C: ?Sized + ProviderHttpClient,
{
	/// Returns a currently valid bundle for `user`, refreshing it first when expired.
	///
	/// Fails with [`AuthError::MissingCredentials`] when nothing is stored, with
	/// [`AuthError::MissingRefreshToken`] when the stale bundle cannot be renewed, and with
	/// [`AuthError::ProviderRejected`] when HubSpot refuses the refresh token. The stored bundle
	/// is left in place on every failure path.
	pub async fn refresh_access_token(&self, user: &UserId) -> Result<TokenBundle> {
		obs::observe(FlowKind::Refresh, "refresh_access_token", async move {
			self.refresh_metrics.record_attempt();

			match self.ensure_fresh(user).await {
				Ok(Freshness::Cached(bundle)) => {
					self.refresh_metrics.record_reuse();

					Ok(bundle)
				},
				Ok(Freshness::Rotated(bundle)) => {
					self.refresh_metrics.record_success();

					Ok(bundle)
				},
				Err(e) => {
					self.refresh_metrics.record_failure();

					Err(e)
				},
			}
		})
		.await
	}

	async fn ensure_fresh(&self, user: &UserId) -> Result<Freshness> {
		let current = self.load_bundle(user).await?.ok_or(AuthError::MissingCredentials)?;

		if !current.needs_refresh_at(OffsetDateTime::now_utc()) {
			return Ok(Freshness::Cached(current));
		}

		let refresh_token = current.refresh_token.as_ref().ok_or(AuthError::MissingRefreshToken)?;

		flow_event!(debug, user = %user, "Access token expired; refreshing.");

		let form = [
			("grant_type", GrantType::RefreshToken.as_str()),
			("client_id", self.config.client_id.as_str()),
			("client_secret", self.config.client_secret.as_str()),
			("refresh_token", refresh_token.expose()),
		];
		let mut bundle = self.request_token(GrantType::RefreshToken, &form).await?;

		bundle.inherit_from(&current);
		self.save_bundle(user, &bundle).await?;

		flow_event!(info, user = %user, "Refreshed HubSpot tokens.");

		Ok(Freshness::Rotated(bundle))
	}
}
