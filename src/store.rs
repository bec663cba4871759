//! Key-value credential store contract with per-key TTL, plus the built-in in-memory backend.

pub mod memory;

pub use memory::MemoryStore;

// self
use crate::{_prelude::*, auth::UserId};

/// Boxed future returned by [`KeyValueStore`] operations.
pub type StoreFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, StoreError>> + 'a + Send>>;

/// Transient key-value cache with per-key expiry.
///
/// Writes are atomic per key; nothing is transactional across keys or across a read followed by
/// a write.
pub trait KeyValueStore
where
	Self: Send + Sync,
{
	/// Returns the value for `key`, or `None` when absent or expired.
	fn get<'a>(&'a self, key: &'a StoreKey) -> StoreFuture<'a, Option<String>>;

	/// Stores `value` under `key`, replacing any previous value, expiring after `ttl`.
	fn set<'a>(&'a self, key: &'a StoreKey, value: String, ttl: Duration) -> StoreFuture<'a, ()>;

	/// Removes `key`. Deleting an absent key is not an error.
	fn delete<'a>(&'a self, key: &'a StoreKey) -> StoreFuture<'a, ()>;
}

/// Error type produced by [`KeyValueStore`] implementations.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ThisError)]
pub enum StoreError {
	/// Stored payload could not be encoded or decoded.
	#[error("Serialization error: {message}.")]
	Serialization {
		/// Human-readable error payload.
		message: String,
	},
	/// Backend-level failure for the storage engine.
	#[error("Backend failure: {message}.")]
	Backend {
		/// Human-readable error payload.
		message: String,
	},
}

/// Namespaced store key (`hubspot:<kind>:<user_id>`).
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StoreKey(String);
impl StoreKey {
	const NAMESPACE: &'static str = "hubspot";

	/// Key holding the pending PKCE verifier for `user`.
	pub fn pkce(user: &UserId) -> Self {
		Self::scoped("pkce", user)
	}

	/// Key holding the token bundle for `user`.
	pub fn tokens(user: &UserId) -> Self {
		Self::scoped("tokens", user)
	}

	/// Raw key string.
	pub fn as_str(&self) -> &str {
		&self.0
	}

	fn scoped(kind: &str, user: &UserId) -> Self {
		Self(format!("{}:{kind}:{user}", Self::NAMESPACE))
	}
}
impl AsRef<str> for StoreKey {
	fn as_ref(&self) -> &str {
		&self.0
	}
}
impl Display for StoreKey {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(&self.0)
	}
}
