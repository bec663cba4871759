//! Connects a HubSpot account end to end from a terminal.
//!
//! Set `HUBSPOT_CLIENT_ID` and `HUBSPOT_CLIENT_SECRET` (and `HUBSPOT_REDIRECT_URI` if your app
//! registers a different one), open the printed URL, approve access, then paste the full URL the
//! browser was redirected to. The demo exchanges the code and lists a few contacts.

// std
use std::{io, sync::Arc};
// crates.io
use color_eyre::{Result, eyre::eyre};
// self
use hubspot_oauth::{
	auth::UserId,
	config::HubSpotConfig,
	flows::{CallbackParams, HubSpotConnector},
	store::MemoryStore,
	url::Url,
};

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let config = HubSpotConfig::from_env()?;
	let connector = HubSpotConnector::new(Arc::new(MemoryStore::default()), config)?;
	let user = UserId::new("demo-user")?;
	let request = connector.start_authorization(&user).await?;

	println!("Open this URL and approve access:\n\n{}\n", request.auth_url);
	println!("Paste the URL you were redirected to:");

	let mut line = String::new();

	io::stdin().read_line(&mut line)?;

	let redirected = Url::parse(line.trim())?;
	let mut params = CallbackParams::default();

	for (key, value) in redirected.query_pairs() {
		match key.as_ref() {
			"code" => params.code = Some(value.into_owned()),
			"state" => params.state = Some(value.into_owned()),
			"error" => params.error = Some(value.into_owned()),
			"error_description" => params.error_description = Some(value.into_owned()),
			_ => {},
		}
	}

	let outcome = connector
		.handle_callback(params)
		.await
		.map_err(|e| eyre!("Callback failed ({}): {e}", e.status()))?;

	println!("Connected {} until {:?}.", outcome.user, outcome.expires_at);
	println!("Status: {:?}.", connector.connection_status(&outcome.user).await?);

	for item in connector.fetch_items(&outcome.user, Some(5)).await? {
		println!(
			"- {} ({})",
			item.title().unwrap_or("<untitled>"),
			item.url().map(Url::as_str).unwrap_or_default()
		);
	}

	Ok(())
}
