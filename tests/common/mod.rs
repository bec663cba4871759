//! Fixtures shared by the connector integration tests.

#![allow(dead_code)]

// std
use std::{collections::VecDeque, sync::Arc};
// crates.io
use hubspot_oauth::{
	auth::{TokenBundle, UserId},
	config::HubSpotConfig,
	flows::HubSpotConnector,
	http::{HttpFuture, HttpReply, ProviderHttpClient},
	store::{KeyValueStore, MemoryStore, StoreKey},
	url::Url,
};
#[cfg(feature = "reqwest")]
use hubspot_oauth::{flows::ReqwestConnector, http::ReqwestHttpClient, reqwest::Client};
use parking_lot::Mutex;
use time::{Duration, OffsetDateTime};

pub const CLIENT_ID: &str = "client-it";
pub const CLIENT_SECRET: &str = "secret-it";
pub const TOKEN_PATH: &str = "/oauth/v1/token";
pub const CONTACTS_PATH: &str = "/crm/v3/objects/contacts";

pub fn user(id: &str) -> UserId {
	UserId::new(id).expect("User fixture should be valid.")
}

/// Configuration whose token and API endpoints live under `base`.
pub fn config_for(base: &str) -> HubSpotConfig {
	let base = base.trim_end_matches('/');

	HubSpotConfig::new(CLIENT_ID, CLIENT_SECRET)
		.expect("Config fixture should be valid.")
		.with_token_url(
			Url::parse(&format!("{base}{TOKEN_PATH}")).expect("Token URL fixture should parse."),
		)
		.with_base_url(Url::parse(base).expect("Base URL fixture should parse."))
}

/// A single outbound request captured by [`RecordingHttpClient`].
#[derive(Clone, Debug)]
pub struct RecordedCall {
	pub url: Url,
	pub form: Vec<(String, String)>,
	pub bearer: Option<String>,
}
impl RecordedCall {
	pub fn form_value(&self, key: &str) -> Option<&str> {
		self.form.iter().find(|(k, _)| k == key).map(|(_, v)| v.as_str())
	}
}

/// In-process transport answering from a script and recording every request.
///
/// Requests beyond the script are answered with a 599 so unexpected calls fail loudly.
#[derive(Debug, Default)]
pub struct RecordingHttpClient {
	replies: Mutex<VecDeque<HttpReply>>,
	calls: Mutex<Vec<RecordedCall>>,
}
impl RecordingHttpClient {
	pub fn with_reply(self, status: u16, body: &str) -> Self {
		self.push_reply(status, body);

		self
	}

	pub fn push_reply(&self, status: u16, body: &str) {
		self.replies.lock().push_back(HttpReply::new(status, body));
	}

	pub fn calls(&self) -> Vec<RecordedCall> {
		self.calls.lock().clone()
	}

	pub fn token_calls(&self) -> usize {
		self.calls.lock().iter().filter(|call| call.bearer.is_none()).count()
	}

	fn answer(&self, call: RecordedCall) -> HttpReply {
		self.calls.lock().push(call);
		self.replies
			.lock()
			.pop_front()
			.unwrap_or_else(|| HttpReply::new(599, "no scripted reply"))
	}
}
impl ProviderHttpClient for RecordingHttpClient {
	fn post_form<'a>(&'a self, url: &'a Url, form: &'a [(&'a str, &'a str)]) -> HttpFuture<'a> {
		let reply = self.answer(RecordedCall {
			url: url.clone(),
			form: form.iter().map(|(k, v)| ((*k).to_owned(), (*v).to_owned())).collect(),
			bearer: None,
		});

		Box::pin(async move { Ok(reply) })
	}

	fn get_bearer<'a>(&'a self, url: &'a Url, token: &'a str) -> HttpFuture<'a> {
		let reply = self.answer(RecordedCall {
			url: url.clone(),
			form: Vec::new(),
			bearer: Some(token.to_owned()),
		});

		Box::pin(async move { Ok(reply) })
	}
}

pub type FakeConnector = HubSpotConnector<RecordingHttpClient>;

/// Connector over the recording transport, an in-memory store, and endpoints on `example.test`.
pub fn fake_connector(
	http: RecordingHttpClient,
) -> (FakeConnector, Arc<RecordingHttpClient>, Arc<MemoryStore>) {
	let http = Arc::new(http);
	let store = Arc::new(MemoryStore::default());
	let connector = HubSpotConnector::with_http_client(
		store.clone(),
		config_for("https://api.example.test"),
		http.clone(),
	);

	(connector, http, store)
}

/// Reqwest-backed connector pointed at a mock server base URL.
#[cfg(feature = "reqwest")]
pub fn reqwest_connector(base: &str) -> (ReqwestConnector, Arc<MemoryStore>) {
	let client = Client::builder()
		.danger_accept_invalid_certs(true)
		.danger_accept_invalid_hostnames(true)
		.build()
		.expect("Failed to build insecure Reqwest client for tests.");
	let store = Arc::new(MemoryStore::default());
	let connector = HubSpotConnector::with_http_client(
		store.clone(),
		config_for(base),
		ReqwestHttpClient::with_client(client),
	);

	(connector, store)
}

/// Stores `bundle` exactly as the connector would after a callback.
pub async fn seed_tokens(store: &MemoryStore, user: &UserId, bundle: &TokenBundle) {
	let payload = serde_json::to_string(bundle).expect("Bundle fixture should serialize.");

	store
		.set(&StoreKey::tokens(user), payload, bundle.store_ttl())
		.await
		.expect("Seeding tokens should succeed.");
}

/// Reads back the stored bundle for `user`.
pub async fn stored_tokens(store: &MemoryStore, user: &UserId) -> Option<TokenBundle> {
	store
		.get(&StoreKey::tokens(user))
		.await
		.expect("Reading tokens should succeed.")
		.map(|raw| serde_json::from_str(&raw).expect("Stored bundle should parse."))
}

/// A bundle whose access token is already past its refresh deadline.
pub fn expired_bundle(access: &str, refresh: Option<&str>) -> TokenBundle {
	let mut bundle = TokenBundle::new(access, 3_600)
		.with_expires_at(OffsetDateTime::now_utc() - Duration::SECOND);

	if let Some(refresh) = refresh {
		bundle = bundle.with_refresh_token(refresh);
	}

	bundle
}

/// A bundle that stays valid for the next hour.
pub fn fresh_bundle(access: &str, refresh: &str) -> TokenBundle {
	let mut bundle = TokenBundle::new(access, 3_600).with_refresh_token(refresh);

	bundle.stamp(OffsetDateTime::now_utc()).expect("Fixture lifetime should be valid.");

	bundle
}
