//! Provider-neutral projection of remote objects handed to downstream consumers.

// self
use crate::_prelude::*;

/// Normalized view of a remote record (a HubSpot contact, in this crate).
///
/// Items are immutable once built: construct them through [`IntegrationItem::builder`] and read
/// them through the accessors. Identity is [`external_id`](Self::external_id) within
/// [`source`](Self::source); no other field participates in equality semantics downstream.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct IntegrationItem {
	#[serde(default, skip_serializing_if = "Option::is_none")]
	id: Option<String>,
	#[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
	kind: Option<String>,
	#[serde(default)]
	directory: bool,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	parent_path_or_name: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	parent_id: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	name: Option<String>,
	#[serde(default, with = "time::serde::rfc3339::option", skip_serializing_if = "Option::is_none")]
	creation_time: Option<OffsetDateTime>,
	#[serde(default, with = "time::serde::rfc3339::option", skip_serializing_if = "Option::is_none")]
	last_modified_time: Option<OffsetDateTime>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	url: Option<Url>,
	#[serde(default, skip_serializing_if = "Vec::is_empty")]
	children: Vec<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	title: Option<String>,
	#[serde(default = "visible")]
	visibility: bool,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	external_id: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	source: Option<String>,
	#[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
	metadata: BTreeMap<String, serde_json::Value>,
}
impl IntegrationItem {
	/// Starts an empty, visible item.
	pub fn builder() -> IntegrationItemBuilder {
		IntegrationItemBuilder::default()
	}

	/// Connector-assigned identifier.
	pub fn id(&self) -> Option<&str> {
		self.id.as_deref()
	}

	/// Object type (serialized as `type`), e.g. `contact`.
	pub fn kind(&self) -> Option<&str> {
		self.kind.as_deref()
	}

	/// Whether the item groups other items.
	pub fn is_directory(&self) -> bool {
		self.directory
	}

	/// Parent path or display name.
	pub fn parent_path_or_name(&self) -> Option<&str> {
		self.parent_path_or_name.as_deref()
	}

	/// Parent identifier.
	pub fn parent_id(&self) -> Option<&str> {
		self.parent_id.as_deref()
	}

	/// Short name.
	pub fn name(&self) -> Option<&str> {
		self.name.as_deref()
	}

	/// Creation instant reported by the provider.
	pub fn creation_time(&self) -> Option<OffsetDateTime> {
		self.creation_time
	}

	/// Last modification instant reported by the provider.
	pub fn last_modified_time(&self) -> Option<OffsetDateTime> {
		self.last_modified_time
	}

	/// Link to the record in the provider's UI.
	pub fn url(&self) -> Option<&Url> {
		self.url.as_ref()
	}

	/// Identifiers of child items.
	pub fn children(&self) -> &[String] {
		&self.children
	}

	/// Display title.
	pub fn title(&self) -> Option<&str> {
		self.title.as_deref()
	}

	/// Whether the item should be shown to users.
	pub fn visibility(&self) -> bool {
		self.visibility
	}

	/// Provider-side identifier.
	pub fn external_id(&self) -> Option<&str> {
		self.external_id.as_deref()
	}

	/// Provider tag, e.g. `hubspot`.
	pub fn source(&self) -> Option<&str> {
		self.source.as_deref()
	}

	/// Raw provider properties.
	pub fn metadata(&self) -> &BTreeMap<String, serde_json::Value> {
		&self.metadata
	}
}

/// Builder for [`IntegrationItem`].
#[derive(Clone, Debug)]
pub struct IntegrationItemBuilder {
	item: IntegrationItem,
}
impl IntegrationItemBuilder {
	/// Sets the connector-assigned identifier.
	pub fn id(mut self, id: impl Into<String>) -> Self {
		self.item.id = Some(id.into());

		self
	}

	/// Sets the object type.
	pub fn kind(mut self, kind: impl Into<String>) -> Self {
		self.item.kind = Some(kind.into());

		self
	}

	/// Marks the item as a directory.
	pub fn directory(mut self, directory: bool) -> Self {
		self.item.directory = directory;

		self
	}

	/// Sets the parent path or name.
	pub fn parent_path_or_name(mut self, value: impl Into<String>) -> Self {
		self.item.parent_path_or_name = Some(value.into());

		self
	}

	/// Sets the parent identifier.
	pub fn parent_id(mut self, value: impl Into<String>) -> Self {
		self.item.parent_id = Some(value.into());

		self
	}

	/// Sets the short name.
	pub fn name(mut self, name: impl Into<String>) -> Self {
		self.item.name = Some(name.into());

		self
	}

	/// Sets the creation instant.
	pub fn creation_time(mut self, instant: Option<OffsetDateTime>) -> Self {
		self.item.creation_time = instant;

		self
	}

	/// Sets the last modification instant.
	pub fn last_modified_time(mut self, instant: Option<OffsetDateTime>) -> Self {
		self.item.last_modified_time = instant;

		self
	}

	/// Sets the UI link.
	pub fn url(mut self, url: Url) -> Self {
		self.item.url = Some(url);

		self
	}

	/// Appends a child identifier.
	pub fn child(mut self, child: impl Into<String>) -> Self {
		self.item.children.push(child.into());

		self
	}

	/// Sets the display title.
	pub fn title(mut self, title: Option<String>) -> Self {
		self.item.title = title;

		self
	}

	/// Overrides visibility (defaults to `true`).
	pub fn visibility(mut self, visible: bool) -> Self {
		self.item.visibility = visible;

		self
	}

	/// Sets the provider-side identifier.
	pub fn external_id(mut self, id: impl Into<String>) -> Self {
		self.item.external_id = Some(id.into());

		self
	}

	/// Sets the provider tag.
	pub fn source(mut self, source: impl Into<String>) -> Self {
		self.item.source = Some(source.into());

		self
	}

	/// Replaces the raw provider properties.
	pub fn metadata(mut self, metadata: BTreeMap<String, serde_json::Value>) -> Self {
		self.item.metadata = metadata;

		self
	}

	/// Finalizes the item.
	pub fn build(self) -> IntegrationItem {
		self.item
	}
}
impl Default for IntegrationItemBuilder {
	fn default() -> Self {
		Self {
			item: IntegrationItem {
				id: None,
				kind: None,
				directory: false,
				parent_path_or_name: None,
				parent_id: None,
				name: None,
				creation_time: None,
				last_modified_time: None,
				url: None,
				children: Vec::new(),
				title: None,
				visibility: true,
				external_id: None,
				source: None,
				metadata: BTreeMap::new(),
			},
		}
	}
}

fn visible() -> bool {
	true
}
