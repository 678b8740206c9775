//! JSON:API document adapter
//!
//! [`JsonApiAdapter`] is the render primitive that turns a payload and
//! prepared [`RenderOptions`] into a JSON:API document:
//!
//! - error payloads render as `{"errors": [...]}`
//! - resource payloads render as `{"data": ...}` with resource objects
//! - associations named in the include tree are side-loaded into `included`
//! - top-level `links`, `meta` and `jsonapi` members are added when present

use serde_json::{Map, Value};
use std::collections::HashSet;
use std::sync::Arc;

use crate::error::{RenderError, RenderResult};
use crate::include::IncludeTree;
use crate::lookup::SerializerLookup;
use crate::relationship::{RelationshipRenderer, ResourceIdentifier};
use crate::renderer::{Adapter, RenderOptions, RenderPrimitive};
use crate::resource::{Item, Payload, Resource};
use crate::serializer::{
	Association, DefaultSerializer, ErrorSerializer, SerializerChoice, SerializerContext,
	SharedSerializer,
};
use crate::settings::JsonApiSettings;

/// Renders JSON:API documents.
///
/// Related records are rendered with serializers from the attached
/// [`SerializerLookup`], or with [`DefaultSerializer`] when there is none.
///
/// # Examples
///
/// ```
/// use reinhardt_jsonapi_core::{
///     Adapter, JsonApiAdapter, JsonApiSettings, Payload, RenderOptions, RenderPrimitive, Resource,
/// };
/// use serde_json::json;
///
/// let adapter = JsonApiAdapter::new(JsonApiSettings::default());
/// let options = RenderOptions::new().with_adapter(Adapter::JsonApi);
/// let tag = Resource::new("Tag").with_id(3).with_attribute("label", "new");
///
/// assert_eq!(
///     adapter.render(&Payload::from(tag), &options).unwrap(),
///     json!({ "data": { "type": "tags", "id": "3", "attributes": { "label": "new" } } })
/// );
/// ```
#[derive(Debug, Clone, Default)]
pub struct JsonApiAdapter {
	settings: JsonApiSettings,
	lookup: Option<SerializerLookup>,
}

impl JsonApiAdapter {
	/// Create an adapter rendering related records with [`DefaultSerializer`].
	pub fn new(settings: JsonApiSettings) -> Self {
		Self {
			settings,
			lookup: None,
		}
	}

	/// Resolve serializers of related records through `lookup`.
	pub fn with_lookup(mut self, lookup: SerializerLookup) -> Self {
		self.lookup = Some(lookup);
		self
	}

	/// Settings in effect.
	pub fn settings(&self) -> &JsonApiSettings {
		&self.settings
	}

	fn resolve(&self, record: &Resource) -> SharedSerializer {
		match &self.lookup {
			Some(lookup) => lookup.resolve_or_default(record),
			None => Arc::new(DefaultSerializer),
		}
	}

	fn relationships(&self) -> RelationshipRenderer {
		RelationshipRenderer::new(self.settings.optimize_relationships)
	}

	fn render_errors(&self, items: &[&Item]) -> RenderResult<Vec<Value>> {
		items
			.iter()
			.map(|item| match item {
				Item::Error(error) => ErrorSerializer.serialize(error),
				Item::Resource(_) => Err(RenderError::UnexpectedItem {
					expected: "error",
					found: item.kind(),
				}),
			})
			.collect()
	}

	fn render_data(
		&self,
		payload: &Payload,
		items: &[&Item],
		choice: Option<&SerializerChoice>,
		include: &IncludeTree,
	) -> RenderResult<(Value, Vec<Value>)> {
		let mut primaries = Vec::with_capacity(items.len());
		for item in items {
			match item {
				Item::Resource(record) => primaries.push(self.primary_context(record, choice)),
				Item::Error(_) => {
					return Err(RenderError::UnexpectedItem {
						expected: "resource",
						found: item.kind(),
					});
				}
			}
		}

		let mut included = Included::default();
		for context in &primaries {
			included.mark(context.identifier());
		}

		let mut data = Vec::with_capacity(primaries.len());
		for context in &primaries {
			data.push(self.resource_object(context, include)?);
			self.collect_included(context, include, &mut included)?;
		}

		let data = match payload {
			Payload::Null => Value::Null,
			Payload::One(_) => data.into_iter().next().unwrap_or(Value::Null),
			Payload::Many(_) => Value::Array(data),
		};
		Ok((data, included.resources))
	}

	fn primary_context<'r>(
		&self,
		record: &'r Resource,
		choice: Option<&SerializerChoice>,
	) -> SerializerContext<'r> {
		let serializer = match choice {
			Some(SerializerChoice::Resource { serializer, .. }) => Arc::clone(serializer),
			_ => self.resolve(record),
		};
		SerializerContext::new(serializer, record)
	}

	/// Resource object for `context`. Associations named at the top of
	/// `include` count as explicitly included.
	fn resource_object(
		&self,
		context: &SerializerContext<'_>,
		include: &IncludeTree,
	) -> RenderResult<Value> {
		let mut object = Map::new();
		object.insert("type".to_string(), Value::String(context.json_type()));
		if let Some(id) = context.id() {
			object.insert("id".to_string(), Value::String(id));
		}

		let attributes = context.attributes();
		if !attributes.is_empty() {
			object.insert("attributes".to_string(), Value::Object(attributes));
		}

		let renderer = self.relationships();
		let mut relationships = Map::new();
		for config in context.associations() {
			let association = Association::bind(&config, context.resource(), |r| self.resolve(r));
			let relationship =
				renderer.render(&association, context, include.contains(config.name()))?;
			if !relationship.is_empty() {
				relationships.insert(config.name().to_string(), Value::Object(relationship));
			}
		}
		if !relationships.is_empty() {
			object.insert("relationships".to_string(), Value::Object(relationships));
		}

		let links: Map<String, Value> = context
			.serializer()
			.links(context.resource())
			.into_iter()
			.filter_map(|(name, link)| link.render(context).map(|value| (name, value)))
			.collect();
		if !links.is_empty() {
			object.insert("links".to_string(), Value::Object(links));
		}

		Ok(Value::Object(object))
	}

	fn collect_included(
		&self,
		context: &SerializerContext<'_>,
		include: &IncludeTree,
		included: &mut Included,
	) -> RenderResult<()> {
		for config in context.associations() {
			let Some(subtree) = include.child(config.name()) else {
				continue;
			};

			let association = Association::bind(&config, context.resource(), |r| self.resolve(r));
			for related in association.contexts() {
				if included.mark(related.identifier()) {
					let object = self.resource_object(related, subtree)?;
					included.resources.push(object);
				}
				self.collect_included(related, subtree, included)?;
			}
		}
		Ok(())
	}
}

impl RenderPrimitive for JsonApiAdapter {
	fn render(&self, payload: &Payload, options: &RenderOptions) -> RenderResult<Value> {
		if options.adapter != Adapter::JsonApi {
			return Err(RenderError::UnsupportedAdapter(options.adapter));
		}

		let (items, choice): (Vec<&Item>, _) = match payload {
			Payload::Null => (Vec::new(), options.serializer.as_ref()),
			Payload::One(item) => (vec![item], options.serializer.as_ref()),
			Payload::Many(items) => (items.iter().collect(), options.each_serializer.as_ref()),
		};

		let errors = match choice {
			Some(choice) => choice.is_error(),
			None => matches!(payload.first(), Some(Item::Error(_))),
		};

		let mut document = Map::new();
		if errors {
			let errors = self.render_errors(&items)?;
			document.insert("errors".to_string(), Value::Array(errors));
		} else {
			let (data, included) = self.render_data(payload, &items, choice, &options.include)?;
			document.insert("data".to_string(), data);
			if !included.is_empty() {
				document.insert("included".to_string(), Value::Array(included));
			}
		}

		if !options.links.is_empty() {
			document.insert("links".to_string(), Value::Object(options.links.clone()));
		}
		if let Some(meta) = &options.meta
			&& !meta.is_empty()
		{
			document.insert("meta".to_string(), Value::Object(meta.clone()));
		}
		if let Some(version) = &self.settings.jsonapi_version {
			let mut jsonapi = Map::new();
			jsonapi.insert("version".to_string(), Value::String(version.clone()));
			document.insert("jsonapi".to_string(), Value::Object(jsonapi));
		}

		Ok(Value::Object(document))
	}
}

/// Side-loaded resources, unique by identifier.
#[derive(Default)]
struct Included {
	seen: HashSet<ResourceIdentifier>,
	resources: Vec<Value>,
}

impl Included {
	/// Record `identifier`, returning whether it was new.
	///
	/// Records without an id cannot be told apart and are always new.
	fn mark(&mut self, identifier: ResourceIdentifier) -> bool {
		if identifier.id.is_none() {
			return true;
		}
		self.seen.insert(identifier)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::resource::ErrorObject;
	use crate::serializer::{AssociationConfig, DeclaredSerializer, LinkSpec};
	use rstest::{fixture, rstest};
	use serde_json::json;

	fn options() -> RenderOptions {
		RenderOptions::new().with_adapter(Adapter::JsonApi)
	}

	#[fixture]
	fn adapter() -> JsonApiAdapter {
		JsonApiAdapter::new(JsonApiSettings::default())
	}

	fn author(id: u32) -> Resource {
		Resource::new("Author").with_id(id).with_attribute("name", format!("author-{id}"))
	}

	fn comment(id: u32, by: u32) -> Resource {
		Resource::new("Comment").with_id(id).with_one("author", author(by))
	}

	fn article() -> Resource {
		Resource::new("Article")
			.with_id(1)
			.with_attribute("title", "Rust")
			.with_one("author", author(9))
			.with_many("comments", vec![comment(5, 9), comment(6, 12)])
	}

	#[rstest]
	fn test_rejects_other_adapters(adapter: JsonApiAdapter) {
		let result = adapter.render(&Payload::Null, &RenderOptions::new());
		assert!(matches!(
			result,
			Err(RenderError::UnsupportedAdapter(Adapter::Attributes))
		));
	}

	#[rstest]
	fn test_null_and_empty_payloads(adapter: JsonApiAdapter) {
		assert_eq!(
			adapter.render(&Payload::Null, &options()).unwrap(),
			json!({ "data": null })
		);
		assert_eq!(
			adapter.render(&Payload::Many(Vec::new()), &options()).unwrap(),
			json!({ "data": [] })
		);
	}

	#[rstest]
	fn test_errors_document(adapter: JsonApiAdapter) {
		let payload = Payload::from(vec![
			ErrorObject::new().with_status(422).with_code("blank"),
			ErrorObject::new().with_status(422).with_code("taken"),
		]);
		let options = options().with_each_serializer(SerializerChoice::Error);

		assert_eq!(
			adapter.render(&payload, &options).unwrap(),
			json!({
				"errors": [
					{ "status": "422", "code": "blank" },
					{ "status": "422", "code": "taken" }
				]
			})
		);
	}

	#[rstest]
	fn test_mismatched_items_are_rejected(adapter: JsonApiAdapter) {
		let mixed = Payload::Many(vec![
			Item::Error(ErrorObject::new()),
			Item::Resource(author(1)),
		]);
		let result = adapter.render(&mixed, &options().with_each_serializer(SerializerChoice::Error));
		assert!(matches!(
			result,
			Err(RenderError::UnexpectedItem { expected: "error", found: "resource" })
		));

		let serializer = SerializerChoice::resource("V1::AuthorSerializer", Arc::new(DefaultSerializer));
		let result = adapter.render(&Payload::from(ErrorObject::new()), &options().with_serializer(serializer));
		assert!(matches!(
			result,
			Err(RenderError::UnexpectedItem { expected: "resource", found: "error" })
		));
	}

	#[rstest]
	fn test_resource_object_members(adapter: JsonApiAdapter) {
		let serializer = DeclaredSerializer::new()
			.with_type("articles")
			.with_fields(["title"])
			.with_association(AssociationConfig::new("author"))
			.with_link("self", LinkSpec::href("/articles/{id}"));
		let options = options().with_serializer(SerializerChoice::resource("Articles", Arc::new(serializer)));

		assert_eq!(
			adapter.render(&Payload::from(article()), &options).unwrap(),
			json!({
				"data": {
					"type": "articles",
					"id": "1",
					"attributes": { "title": "Rust" },
					"relationships": {
						"author": { "data": { "type": "authors", "id": "9" } }
					},
					"links": { "self": "/articles/1" }
				}
			})
		);
	}

	#[rstest]
	fn test_compound_document_deduplicates(adapter: JsonApiAdapter) {
		let options = options().with_include("author,comments.author");
		let document = adapter.render(&Payload::from(article()), &options).unwrap();

		let included: Vec<(String, String)> = document["included"]
			.as_array()
			.unwrap()
			.iter()
			.map(|r| (r["type"].as_str().unwrap().to_string(), r["id"].as_str().unwrap().to_string()))
			.collect();
		assert_eq!(
			included,
			vec![
				("authors".to_string(), "9".to_string()),
				("comments".to_string(), "5".to_string()),
				("comments".to_string(), "6".to_string()),
				("authors".to_string(), "12".to_string()),
			]
		);
	}

	#[rstest]
	fn test_primary_data_is_not_included(adapter: JsonApiAdapter) {
		let first = Resource::new("Person").with_id(1).with_one("friend", Resource::new("Person").with_id(2));
		let second = Resource::new("Person").with_id(2).with_one("friend", Resource::new("Person").with_id(1));
		let document = adapter
			.render(&Payload::from(vec![first, second]), &options().with_include("friend"))
			.unwrap();

		assert!(document.get("included").is_none());
		assert_eq!(document["data"].as_array().unwrap().len(), 2);
	}

	#[rstest]
	fn test_optimized_relationships_follow_include() {
		let adapter = JsonApiAdapter::new(JsonApiSettings::new().with_optimize_relationships(true));
		let document = adapter
			.render(&Payload::from(article()), &options().with_include("comments"))
			.unwrap();

		let relationships = &document["data"]["relationships"];
		assert!(relationships.get("author").is_none());
		assert_eq!(relationships["comments"]["data"].as_array().unwrap().len(), 2);

		// Included comments render their own author linkage only when nested.
		assert!(document["included"][0].get("relationships").is_none());
	}

	#[rstest]
	fn test_top_level_members() {
		let adapter = JsonApiAdapter::new(JsonApiSettings::new().with_jsonapi_version("1.1"));
		let mut meta = Map::new();
		meta.insert("total".to_string(), json!(0));
		let options = options()
			.with_meta(meta)
			.with_link("self", "/articles?page=1");

		assert_eq!(
			adapter.render(&Payload::Many(Vec::new()), &options).unwrap(),
			json!({
				"data": [],
				"links": { "self": "/articles?page=1" },
				"meta": { "total": 0 },
				"jsonapi": { "version": "1.1" }
			})
		);
	}

	#[rstest]
	fn test_empty_meta_is_omitted(adapter: JsonApiAdapter) {
		let document = adapter
			.render(&Payload::Null, &options().with_meta(Map::new()))
			.unwrap();
		assert_eq!(document, json!({ "data": null }));
	}
}
