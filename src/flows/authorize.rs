//! Authorization URL construction backed by a stored PKCE verifier.

// self
use crate::{
	_prelude::*,
	auth::{PkceCodeChallengeMethod, PkcePair, UserId},
	config::HubSpotConfig,
	flows::HubSpotConnector,
	http::ProviderHttpClient,
	obs::{self, FlowKind},
	store::StoreKey,
};

/// Authorization redirect returned by [`HubSpotConnector::start_authorization`].
///
/// Serializes as `{"auth_url": "..."}` so route layers can return it directly.
#[derive(Clone, Debug, Serialize)]
pub struct AuthorizationRequest {
	/// Fully-formed authorization URL the user's browser should open.
	pub auth_url: Url,
	/// Identity carried in the `state` parameter.
	#[serde(skip)]
	pub user: UserId,
	/// PKCE challenge embedded in [`auth_url`](Self::auth_url).
	#[serde(skip)]
	pub code_challenge: String,
}
impl AuthorizationRequest {
	/// Challenge method advertised in the URL.
	pub fn code_challenge_method(&self) -> PkceCodeChallengeMethod {
		PkceCodeChallengeMethod::S256
	}
}

impl<C> HubSpotConnector<C>
where
	C: ?Sized + ProviderHttpClient,
{
	/// Generates a PKCE pair, stores its verifier for [`HubSpotConfig::pkce_ttl`], and returns
	/// the authorization URL with `state` set to `user`.
	///
	/// A previous pending verifier for the same user is overwritten. Store failures propagate;
	/// nothing is retried.
	pub async fn start_authorization(&self, user: &UserId) -> Result<AuthorizationRequest> {
		obs::observe(FlowKind::Authorize, "start_authorization", async move {
			let pkce = PkcePair::generate();

			self.store
				.set(&StoreKey::pkce(user), pkce.verifier().to_owned(), self.config.pkce_ttl)
				.await?;

			flow_event!(debug, user = %user, "Stored PKCE verifier.");

			Ok(AuthorizationRequest {
				auth_url: build_authorize_url(&self.config, user, &pkce),
				user: user.clone(),
				code_challenge: pkce.challenge().to_owned(),
			})
		})
		.await
	}
}

fn build_authorize_url(config: &HubSpotConfig, user: &UserId, pkce: &PkcePair) -> Url {
	let mut url = config.auth_url.clone();
	let mut pairs = url.query_pairs_mut();

	pairs.append_pair("client_id", &config.client_id);
	pairs.append_pair("redirect_uri", config.redirect_uri.as_str());
	pairs.append_pair("scope", &config.scope_param());
	pairs.append_pair("response_type", "code");
	pairs.append_pair("state", user);
	pairs.append_pair("code_challenge", pkce.challenge());
	pairs.append_pair("code_challenge_method", pkce.method().as_str());

	drop(pairs);

	url
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn authorize_url_carries_every_parameter() {
		let config = HubSpotConfig::new("client-1", "secret-1")
			.expect("Config fixture should be valid.")
			.with_scopes(["crm.objects.contacts.read", "oauth"]);
		let user = UserId::new("user-9").expect("User fixture should be valid.");
		let pkce = PkcePair::from_verifier("abc123");
		let url = build_authorize_url(&config, &user, &pkce);
		let params = url.query_pairs().into_owned().collect::<HashMap<_, _>>();

		assert_eq!(url.host_str(), Some("app.hubspot.com"));
		assert_eq!(url.path(), "/oauth/authorize");
		assert_eq!(params["client_id"], "client-1");
		assert_eq!(params["redirect_uri"], config.redirect_uri.as_str());
		assert_eq!(params["scope"], "crm.objects.contacts.read oauth");
		assert_eq!(params["response_type"], "code");
		assert_eq!(params["state"], "user-9");
		assert_eq!(params["code_challenge"], "bKE9UspwyIPg8LsQHkJaiehiTeUdstI5JZOvaoQRgJA");
		assert_eq!(params["code_challenge_method"], "S256");
		assert_eq!(params.len(), 7);
	}
}
