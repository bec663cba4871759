//! Redirect handling: verifier lookup, code exchange, and token persistence.

// self
use crate::{
	_prelude::*,
	auth::{GrantType, TokenBundle, UserId},
	error::AuthError,
	flows::HubSpotConnector,
	http::ProviderHttpClient,
	obs::{self, FlowKind},
	store::StoreKey,
};

/// Page returned to the popup window once the connection is stored.
pub const CLOSE_WINDOW_HTML: &str = "<html>
	<head><title>HubSpot Connected</title></head>
	<body>
		<script>
			window.close();
		</script>
		<p>You can close this window now.</p>
	</body>
</html>
";

/// Query parameters HubSpot appends to the redirect URI.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct CallbackParams {
	/// Authorization code, present on success.
	#[serde(default)]
	pub code: Option<String>,
	/// Echoed `state`, i.e. the user identity sent with the authorization URL.
	#[serde(default)]
	pub state: Option<String>,
	/// OAuth error code, present when the user or provider refused.
	#[serde(default)]
	pub error: Option<String>,
	/// Human-readable companion to [`error`](Self::error).
	#[serde(default)]
	pub error_description: Option<String>,
}
impl CallbackParams {
	/// Parameters for a successful redirect.
	pub fn with_code(code: impl Into<String>, state: Option<&str>) -> Self {
		Self { code: Some(code.into()), state: state.map(ToOwned::to_owned), ..Default::default() }
	}
}

/// Result of a completed callback.
#[derive(Clone, Debug)]
pub struct CallbackOutcome {
	/// Identity the tokens were stored under.
	pub user: UserId,
	/// Instant after which the new access token needs a refresh.
	pub expires_at: Option<OffsetDateTime>,
}
impl CallbackOutcome {
	/// HTML page that closes the popup window.
	pub fn html(&self) -> &'static str {
		CLOSE_WINDOW_HTML
	}
}

impl<C> HubSpotConnector<C>
where
	C: ?Sized + ProviderHttpClient,
{
	/// Exchanges the callback's code for tokens and stores them for the `state` identity.
	///
	/// The `state` is trusted as-is; an absent or empty value resolves to
	/// [`UserId::DEFAULT`]. Without a pending verifier the call fails with
	/// [`AuthError::PkceStateMissing`] and the token endpoint is never contacted. A redirect
	/// carrying an error or no code discards the verifier, and so does any exchange attempt
	/// whether it succeeded or not, including a failed token write.
	pub async fn handle_callback(&self, params: CallbackParams) -> Result<CallbackOutcome> {
		obs::observe(FlowKind::Callback, "handle_callback", async move {
			let CallbackParams { code, state, error, error_description } = params;
			let user = UserId::from_state(state.as_deref()).map_err(|_| {
				AuthError::PkceStateMissing { user: state.clone().unwrap_or_default() }
			})?;
			let key = StoreKey::pkce(&user);

			if let Some(error) = error {
				flow_event!(info, user = %user, error = %error, "Authorization denied.");

				self.discard_verifier(&key).await;

				return Err(AuthError::AuthorizationDenied { error, description: error_description }
					.into());
			}

			let Some(code) = code.filter(|code| !code.is_empty()) else {
				self.discard_verifier(&key).await;

				return Err(AuthError::MissingCode.into());
			};
			let Some(verifier) = self.store.get(&key).await? else {
				flow_event!(warn, user = %user, "PKCE verifier not found or expired.");

				return Err(AuthError::PkceStateMissing { user: user.to_string() }.into());
			};
			let bundle = match self.exchange_code(&code, &verifier).await {
				Ok(bundle) => bundle,
				Err(e) => {
					self.discard_verifier(&key).await;

					return Err(e);
				},
			};

			if let Err(e) = self.save_bundle(&user, &bundle).await {
				self.discard_verifier(&key).await;

				return Err(e);
			}

			self.store.delete(&key).await?;

			flow_event!(info, user = %user, "Stored HubSpot tokens.");

			Ok(CallbackOutcome { user, expires_at: bundle.expires_at })
		})
		.await
	}

	async fn exchange_code(&self, code: &str, verifier: &str) -> Result<TokenBundle> {
		let redirect_uri = self.config.redirect_uri.as_str();
		let form = [
			("grant_type", GrantType::AuthorizationCode.as_str()),
			("client_id", self.config.client_id.as_str()),
			("client_secret", self.config.client_secret.as_str()),
			("redirect_uri", redirect_uri),
			("code", code),
			("code_verifier", verifier),
		];

		self.request_token(GrantType::AuthorizationCode, &form).await
	}

	// Delete failures are logged and dropped; the verifier still expires with its TTL.
	async fn discard_verifier(&self, key: &StoreKey) {
		if let Err(_e) = self.store.delete(key).await {
			flow_event!(warn, key = %key, error = %_e, "Failed to discard PKCE verifier.");
		}
	}
}
