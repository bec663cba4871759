//! Connection status checks.

// self
use crate::{
	_prelude::*, auth::UserId, flows::HubSpotConnector, http::ProviderHttpClient, store::StoreKey,
};

/// JSON-ready connection status for a user.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionStatus {
	/// Identity that was checked.
	pub user_id: UserId,
	/// Whether a token bundle is stored.
	pub connected: bool,
}

impl<C> HubSpotConnector<C>
where
	C: ?Sized + ProviderHttpClient,
{
	/// Reports whether tokens are stored for `user`.
	///
	/// Expiry is not checked and the provider is not contacted; a stored but stale bundle still
	/// counts as connected because it can be refreshed on the next data call.
	pub async fn is_connected(&self, user: &UserId) -> Result<bool> {
		Ok(self.store.get(&StoreKey::tokens(user)).await?.is_some())
	}

	/// [`is_connected`](Self::is_connected) wrapped with the user identity.
	pub async fn connection_status(&self, user: &UserId) -> Result<ConnectionStatus> {
		let connected = self.is_connected(user).await?;

		Ok(ConnectionStatus { user_id: user.clone(), connected })
	}
}
