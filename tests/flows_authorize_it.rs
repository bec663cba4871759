mod common;

// crates.io
use hubspot_oauth::{
	auth::compute_pkce_challenge,
	store::{KeyValueStore, StoreKey},
};
use time::Duration;
// self
use common::*;

#[tokio::test]
async fn start_authorization_stores_verifier_and_builds_url() {
	let (connector, http, store) = fake_connector(RecordingHttpClient::default());
	let user = user("user-auth");
	let request =
		connector.start_authorization(&user).await.expect("Starting authorization should succeed.");
	let key = StoreKey::pkce(&user);
	let verifier = store
		.get(&key)
		.await
		.expect("Reading the verifier should succeed.")
		.expect("Verifier should be stored.");
	let params = request.auth_url.query_pairs().into_owned().collect::<Vec<_>>();
	let param = |name: &str| {
		params.iter().find(|(k, _)| k == name).map(|(_, v)| v.clone()).unwrap_or_default()
	};

	assert_eq!(verifier.len(), 43);
	assert_eq!(param("state"), "user-auth");
	assert_eq!(param("code_challenge_method"), "S256");
	assert_eq!(param("code_challenge"), compute_pkce_challenge(&verifier));
	assert_eq!(request.code_challenge, compute_pkce_challenge(&verifier));
	assert_eq!(param("client_id"), CLIENT_ID);
	assert_eq!(param("response_type"), "code");
	assert!(!request.auth_url.as_str().contains(&verifier));

	let ttl = store.remaining_ttl(&key).expect("Verifier should carry a TTL.");

	assert!(ttl <= Duration::seconds(600) && ttl > Duration::seconds(590));
	assert!(http.calls().is_empty(), "Authorization must not contact the provider.");
}

#[tokio::test]
async fn authorization_request_serializes_as_auth_url_only() {
	let (connector, _, _) = fake_connector(RecordingHttpClient::default());
	let request = connector
		.start_authorization(&user("user-json"))
		.await
		.expect("Starting authorization should succeed.");
	let json = serde_json::to_value(&request).expect("Request should serialize.");
	let object = json.as_object().expect("Request should serialize as an object.");

	assert_eq!(object.len(), 1);
	assert_eq!(object["auth_url"], request.auth_url.as_str());
}

#[tokio::test]
async fn restarting_authorization_replaces_the_pending_verifier() {
	let (connector, _, store) = fake_connector(RecordingHttpClient::default());
	let user = user("user-restart");
	let first = connector.start_authorization(&user).await.expect("First start should succeed.");
	let second = connector.start_authorization(&user).await.expect("Second start should succeed.");
	let verifier = store
		.get(&StoreKey::pkce(&user))
		.await
		.expect("Reading the verifier should succeed.")
		.expect("Verifier should be stored.");

	assert_ne!(first.code_challenge, second.code_challenge);
	assert_eq!(compute_pkce_challenge(&verifier), second.code_challenge);
	assert_eq!(store.len(), 1);
}
