//! Thread-safe in-memory [`KeyValueStore`] with lazy TTL expiry.

// self
use crate::{
	_prelude::*,
	store::{KeyValueStore, StoreError, StoreFuture, StoreKey},
};

type StoreMap = Arc<RwLock<HashMap<StoreKey, Entry>>>;

#[derive(Clone, Debug)]
struct Entry {
	value: String,
	expires_at: OffsetDateTime,
}
impl Entry {
	fn is_live_at(&self, now: OffsetDateTime) -> bool {
		now < self.expires_at
	}
}

/// In-process TTL cache for local development, single-node deployments, and tests.
///
/// Expired entries are invisible to reads and dropped on the next access of the same key or on
/// [`purge_expired`](Self::purge_expired).
#[derive(Clone, Debug, Default)]
pub struct MemoryStore(StoreMap);
impl MemoryStore {
	/// Time left before `key` expires, or `None` when absent or already expired.
	pub fn remaining_ttl(&self, key: &StoreKey) -> Option<Duration> {
		let now = OffsetDateTime::now_utc();

		self.0
			.read()
			.get(key)
			.filter(|entry| entry.is_live_at(now))
			.map(|entry| entry.expires_at - now)
	}

	/// Drops every expired entry, returning how many were removed.
	pub fn purge_expired(&self) -> usize {
		let now = OffsetDateTime::now_utc();
		let mut guard = self.0.write();
		let before = guard.len();

		guard.retain(|_, entry| entry.is_live_at(now));

		before - guard.len()
	}

	/// Number of live entries.
	pub fn len(&self) -> usize {
		let now = OffsetDateTime::now_utc();

		self.0.read().values().filter(|entry| entry.is_live_at(now)).count()
	}

	/// Returns `true` when no live entry exists.
	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}

	fn get_now(map: StoreMap, key: &StoreKey) -> Option<String> {
		let now = OffsetDateTime::now_utc();

		{
			let guard = map.read();

			match guard.get(key) {
				Some(entry) if entry.is_live_at(now) => return Some(entry.value.clone()),
				Some(_) => {},
				None => return None,
			}
		}

		let mut guard = map.write();

		if guard.get(key).is_some_and(|entry| !entry.is_live_at(now)) {
			guard.remove(key);
		}

		None
	}

	fn set_now(map: StoreMap, key: StoreKey, value: String, ttl: Duration) -> Result<(), StoreError> {
		if !ttl.is_positive() {
			return Err(StoreError::Backend {
				message: format!("TTL for {key} must be positive, got {ttl}"),
			});
		}

		let expires_at = OffsetDateTime::now_utc().saturating_add(ttl);

		map.write().insert(key, Entry { value, expires_at });

		Ok(())
	}
}
impl KeyValueStore for MemoryStore {
	fn get<'a>(&'a self, key: &'a StoreKey) -> StoreFuture<'a, Option<String>> {
		let map = self.0.clone();

		Box::pin(async move { Ok(Self::get_now(map, key)) })
	}

	fn set<'a>(&'a self, key: &'a StoreKey, value: String, ttl: Duration) -> StoreFuture<'a, ()> {
		let map = self.0.clone();
		let key = key.to_owned();

		Box::pin(async move { Self::set_now(map, key, value, ttl) })
	}

	fn delete<'a>(&'a self, key: &'a StoreKey) -> StoreFuture<'a, ()> {
		let map = self.0.clone();

		Box::pin(async move {
			map.write().remove(key);

			Ok(())
		})
	}
}
