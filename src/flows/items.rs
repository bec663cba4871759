//! Contact listing projected into [`IntegrationItem`]s.

// crates.io
use serde_json::Value;
use time::format_description::well_known::Rfc3339;
// self
use crate::{
	_prelude::*,
	auth::UserId,
	config::HubSpotConfig,
	flows::HubSpotConnector,
	http::ProviderHttpClient,
	item::IntegrationItem,
	obs::{self, FlowKind},
};

/// Page size used when the caller does not pass one.
pub const DEFAULT_ITEM_LIMIT: u32 = 10;
/// Largest page size HubSpot accepts for contact listing.
pub const MAX_ITEM_LIMIT: u32 = 100;

const CONTACTS_PATH: &str = "/crm/v3/objects/contacts";
const CONTACT_PROPERTIES: &str = "firstname,lastname,email";
const SOURCE: &str = "hubspot";
const CONTACT_TYPE: &str = "contact";

#[derive(Debug, Deserialize)]
struct ContactPage {
	#[serde(default)]
	results: Vec<Contact>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Contact {
	id: String,
	#[serde(default)]
	properties: BTreeMap<String, Value>,
	#[serde(default)]
	created_at: Option<String>,
	#[serde(default)]
	updated_at: Option<String>,
}

impl<C> HubSpotConnector<C>
where
	C: ?Sized + ProviderHttpClient,
{
	/// Lists one page of contacts for `user` as integration items.
	///
	/// The access token is refreshed first when needed, so every failure of
	/// [`refresh_access_token`](Self::refresh_access_token) surfaces here unchanged. `limit`
	/// defaults to [`DEFAULT_ITEM_LIMIT`] and is clamped to `1..=`[`MAX_ITEM_LIMIT`]. Only the
	/// first page is read.
	///
	/// A non-success status from the contacts endpoint is logged and yields an empty list.
	/// Transport failures and malformed success bodies are returned as errors.
	pub async fn fetch_items(
		&self,
		user: &UserId,
		limit: Option<u32>,
	) -> Result<Vec<IntegrationItem>> {
		obs::observe(FlowKind::FetchItems, "fetch_items", async move {
			let bundle = self.refresh_access_token(user).await?;
			let limit = limit.unwrap_or(DEFAULT_ITEM_LIMIT).clamp(1, MAX_ITEM_LIMIT);
			let mut url = self.config.api_url(CONTACTS_PATH)?;

			url.query_pairs_mut()
				.append_pair("limit", &limit.to_string())
				.append_pair("properties", CONTACT_PROPERTIES);

			let reply = self.http_client.get_bearer(&url, bundle.access_token.expose()).await?;

			if !reply.is_success() {
				flow_event!(
					warn,
					user = %user,
					status = reply.status,
					body = %reply.body,
					"Contacts request failed; returning no items."
				);

				return Ok(Vec::new());
			}

			let page = reply.json::<ContactPage>("contacts")?;
			let items = page
				.results
				.into_iter()
				.map(|contact| contact_item(&self.config, contact))
				.collect::<Result<Vec<_>>>()?;

			flow_event!(debug, user = %user, count = items.len(), "Listed HubSpot contacts.");

			Ok(items)
		})
		.await
	}
}

fn contact_item(config: &HubSpotConfig, contact: Contact) -> Result<IntegrationItem> {
	let url = config.app_link(&format!("contacts/{}", contact.id))?;
	let full_name =
		format!("{} {}", text(&contact.properties, "firstname"), text(&contact.properties, "lastname"));
	let title = match full_name.trim() {
		"" => contact.properties.get("email").and_then(Value::as_str).map(ToOwned::to_owned),
		name => Some(name.to_owned()),
	};

	Ok(IntegrationItem::builder()
		.source(SOURCE)
		.kind(CONTACT_TYPE)
		.external_id(contact.id)
		.title(title)
		.url(url)
		.creation_time(contact.created_at.as_deref().and_then(rfc3339))
		.last_modified_time(contact.updated_at.as_deref().and_then(rfc3339))
		.metadata(contact.properties)
		.build())
}

fn text<'a>(properties: &'a BTreeMap<String, Value>, key: &str) -> &'a str {
	properties.get(key).and_then(Value::as_str).unwrap_or_default()
}

fn rfc3339(value: &str) -> Option<OffsetDateTime> {
	OffsetDateTime::parse(value, &Rfc3339).ok()
}
