//! Token bundles as issued by the HubSpot token endpoint plus expiry bookkeeping.

// self
use crate::{_prelude::*, auth::TokenSecret, error::TransientError};

/// Seconds subtracted from `expires_in` so refreshes happen before the provider's deadline.
pub const EXPIRY_SAFETY_MARGIN: Duration = Duration::seconds(60);
/// Extra lifetime granted to stored bundles beyond `expires_in`, keeping the refresh token
/// reachable after the access token lapses.
pub const STORE_TTL_GRACE: Duration = Duration::seconds(300);
/// Lifetime assumed when the provider omits `expires_in`.
pub const DEFAULT_EXPIRES_IN_SECS: i64 = 3_600;

/// Access/refresh token pair with derived expiry bookkeeping.
///
/// The bundle is persisted as JSON. Fields the provider returns beyond the modeled ones are
/// kept in [`extra`](Self::extra) and written back untouched.
#[derive(Clone, Serialize, Deserialize)]
pub struct TokenBundle {
	/// Bearer token for resource calls.
	pub access_token: TokenSecret,
	/// Refresh token, when the provider issued (or previously issued) one.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub refresh_token: Option<TokenSecret>,
	/// Lifetime in seconds reported by the provider.
	#[serde(default = "default_expires_in")]
	pub expires_in: i64,
	/// Token type reported by the provider (usually `bearer`).
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub token_type: Option<String>,
	/// Instant the bundle was received.
	#[serde(default, with = "time::serde::timestamp::option", skip_serializing_if = "Option::is_none")]
	pub obtained_at: Option<OffsetDateTime>,
	/// Instant after which the access token is treated as expired.
	#[serde(default, with = "time::serde::timestamp::option", skip_serializing_if = "Option::is_none")]
	pub expires_at: Option<OffsetDateTime>,
	/// Unmodeled provider fields.
	#[serde(flatten)]
	pub extra: BTreeMap<String, serde_json::Value>,
}
impl TokenBundle {
	/// Creates an unstamped bundle.
	pub fn new(access_token: impl Into<String>, expires_in: i64) -> Self {
		Self {
			access_token: TokenSecret::new(access_token),
			refresh_token: None,
			expires_in,
			token_type: None,
			obtained_at: None,
			expires_at: None,
			extra: BTreeMap::new(),
		}
	}

	/// Attaches a refresh token.
	pub fn with_refresh_token(mut self, token: impl Into<String>) -> Self {
		self.refresh_token = Some(TokenSecret::new(token));

		self
	}

	/// Overrides the expiry instant, bypassing [`stamp`](Self::stamp).
	pub fn with_expires_at(mut self, instant: OffsetDateTime) -> Self {
		self.expires_at = Some(instant);

		self
	}

	/// Records `obtained_at = now` and `expires_at = now + expires_in - 60s`.
	///
	/// Both instants are truncated to whole seconds so they survive the JSON round-trip
	/// unchanged. The bundle is left untouched when `expires_in` is not positive or pushes the
	/// expiry past the representable range.
	pub fn stamp(&mut self, now: OffsetDateTime) -> Result<(), TransientError> {
		let value = self.expires_in;

		if value <= 0 {
			return Err(TransientError::NonPositiveExpiresIn { value });
		}

		let now = whole_seconds(now);
		let expires_at = now
			.checked_add(Duration::seconds(value))
			.and_then(|instant| instant.checked_sub(EXPIRY_SAFETY_MARGIN))
			.ok_or(TransientError::ExpiresInOutOfRange { value })?;

		self.obtained_at = Some(now);
		self.expires_at = Some(expires_at);

		Ok(())
	}

	/// Returns `true` when the access token must be refreshed before use.
	///
	/// A bundle without `expires_at` is always considered stale.
	pub fn needs_refresh_at(&self, now: OffsetDateTime) -> bool {
		match self.expires_at {
			Some(expires_at) => expires_at <= now,
			None => true,
		}
	}

	/// Merges a refresh response over the bundle it replaces.
	///
	/// Fields the provider re-sent win. The refresh token, token type, and unmodeled fields of
	/// `previous` survive when the response omits them.
	pub fn inherit_from(&mut self, previous: &TokenBundle) {
		if self.refresh_token.is_none() {
			self.refresh_token = previous.refresh_token.clone();
		}
		if self.token_type.is_none() {
			self.token_type = previous.token_type.clone();
		}

		for (key, value) in &previous.extra {
			self.extra.entry(key.clone()).or_insert_with(|| value.clone());
		}
	}

	/// TTL applied when persisting the bundle (`expires_in + 300s`, saturating).
	pub fn store_ttl(&self) -> Duration {
		Duration::seconds(self.expires_in.max(0)).saturating_add(STORE_TTL_GRACE)
	}
}
impl Debug for TokenBundle {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("TokenBundle")
			.field("access_token", &self.access_token)
			.field("refresh_token", &self.refresh_token)
			.field("expires_in", &self.expires_in)
			.field("token_type", &self.token_type)
			.field("obtained_at", &self.obtained_at)
			.field("expires_at", &self.expires_at)
			.field("extra", &self.extra.keys().collect::<Vec<_>>())
			.finish()
	}
}

fn default_expires_in() -> i64 {
	DEFAULT_EXPIRES_IN_SECS
}

fn whole_seconds(instant: OffsetDateTime) -> OffsetDateTime {
	instant - Duration::nanoseconds(i64::from(instant.nanosecond()))
}

#[cfg(test)]
mod tests {
	// crates.io
	use time::macros;
	// self
	use super::*;

	#[test]
	fn stamp_applies_safety_margin() {
		let now = macros::datetime!(2025-06-01 12:00:00.750 UTC);
		let mut bundle = TokenBundle::new("access", 1_800);

		bundle.stamp(now).expect("Stamping should succeed.");

		assert_eq!(bundle.obtained_at, Some(macros::datetime!(2025-06-01 12:00:00 UTC)));
		assert_eq!(bundle.expires_at, Some(macros::datetime!(2025-06-01 12:29:00 UTC)));
		assert_eq!(bundle.store_ttl(), Duration::seconds(2_100));
	}

	#[test]
	fn refresh_needed_when_expired_or_unset() {
		let now = macros::datetime!(2025-06-01 12:00 UTC);
		let unset = TokenBundle::new("access", 3_600);

		assert!(unset.needs_refresh_at(now));
		assert!(unset.clone().with_expires_at(now).needs_refresh_at(now));
		assert!(unset.clone().with_expires_at(now - Duration::SECOND).needs_refresh_at(now));
		assert!(!unset.with_expires_at(now + Duration::SECOND).needs_refresh_at(now));
	}

	#[test]
	fn inherit_keeps_rotated_token() {
		let mut previous = TokenBundle::new("old", 60).with_refresh_token("refresh-old");

		previous.token_type = Some("bearer".into());
		previous.extra.insert("hub_id".into(), serde_json::json!(7));

		let mut rotated = TokenBundle::new("a", 60).with_refresh_token("refresh-new");
		let mut bare = TokenBundle::new("b", 60);

		bare.extra.insert("hub_id".into(), serde_json::json!(8));
		rotated.inherit_from(&previous);
		bare.inherit_from(&previous);

		assert_eq!(rotated.refresh_token.map(|s| s.expose().to_owned()), Some("refresh-new".into()));
		assert_eq!(bare.refresh_token.map(|s| s.expose().to_owned()), Some("refresh-old".into()));
		assert_eq!(bare.token_type.as_deref(), Some("bearer"));
		assert_eq!(bare.extra.get("hub_id"), Some(&serde_json::json!(8)));
		assert_eq!(rotated.extra.get("hub_id"), Some(&serde_json::json!(7)));
	}

	#[test]
	fn provider_json_round_trips_with_unknown_fields() {
		let body = r#"{"access_token":"CJ","refresh_token":"r-1","expires_in":1800,"token_type":"bearer","hub_id":123}"#;
		let mut bundle: TokenBundle = serde_json::from_str(body).expect("Bundle should parse.");

		assert_eq!(bundle.extra.get("hub_id"), Some(&serde_json::json!(123)));
		assert!(bundle.obtained_at.is_none());

		bundle.stamp(macros::datetime!(2025-06-01 12:00 UTC)).expect("Stamping should succeed.");

		let stored = serde_json::to_value(&bundle).expect("Bundle should serialize.");

		assert_eq!(stored["hub_id"], 123);
		assert_eq!(stored["obtained_at"], macros::datetime!(2025-06-01 12:00 UTC).unix_timestamp());
		assert_eq!(stored["expires_at"], macros::datetime!(2025-06-01 12:29 UTC).unix_timestamp());

		let reloaded: TokenBundle =
			serde_json::from_value(stored).expect("Stored bundle should reload.");

		assert_eq!(reloaded.expires_at, bundle.expires_at);
		assert_eq!(reloaded.access_token.expose(), "CJ");
	}

	#[test]
	fn stamp_rejects_unusable_lifetimes() {
		let now = macros::datetime!(2025-06-01 12:00 UTC);
		let mut huge = TokenBundle::new("access", i64::MAX);
		let mut zero = TokenBundle::new("access", 0);
		let mut negative = TokenBundle::new("access", -5);

		assert!(matches!(
			huge.stamp(now),
			Err(TransientError::ExpiresInOutOfRange { value: i64::MAX })
		));
		assert!(matches!(zero.stamp(now), Err(TransientError::NonPositiveExpiresIn { value: 0 })));
		assert!(matches!(
			negative.stamp(now),
			Err(TransientError::NonPositiveExpiresIn { value: -5 })
		));
		assert!(huge.expires_at.is_none() && huge.obtained_at.is_none());
		assert_eq!(huge.store_ttl(), Duration::MAX);
		assert_eq!(negative.store_ttl(), STORE_TTL_GRACE);
	}

	#[test]
	fn missing_expires_in_defaults_to_an_hour() {
		let bundle: TokenBundle =
			serde_json::from_str(r#"{"access_token":"X"}"#).expect("Bundle should parse.");

		assert_eq!(bundle.expires_in, DEFAULT_EXPIRES_IN_SECS);
		assert!(bundle.refresh_token.is_none());
	}
}
