//! Relationship objects
//!
//! Renders one bound [`Association`] into the JSON:API relationship shape
//! (`data`, `links`, `meta`). Keys that produce nothing are left out.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::RenderResult;
use crate::serializer::{Association, AssociationTarget, SerializerContext, is_blank};

/// Minimal `{type, id}` reference to a resource.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct ResourceIdentifier {
	/// JSON:API `type`.
	#[serde(rename = "type")]
	pub json_type: String,
	/// JSON:API `id`; omitted for records that were never persisted.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub id: Option<String>,
}

impl ResourceIdentifier {
	/// Identifier of the record bound to `context`.
	pub fn from_context(context: &SerializerContext<'_>) -> Self {
		Self {
			json_type: context.json_type(),
			id: context.id(),
		}
	}

	/// JSON form of the identifier.
	pub fn to_value(&self) -> Value {
		let mut identifier = Map::new();
		identifier.insert("type".to_string(), Value::String(self.json_type.clone()));
		if let Some(id) = &self.id {
			identifier.insert("id".to_string(), Value::String(id.clone()));
		}
		Value::Object(identifier)
	}
}

/// Builds relationship objects.
///
/// With `optimize_relationships` enabled, linkage data is only emitted for
/// associations that were explicitly included in the render.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use reinhardt_jsonapi_core::{
///     Association, AssociationConfig, DefaultSerializer, RelationshipRenderer, Resource,
///     SerializerContext, SharedSerializer,
/// };
/// use serde_json::json;
///
/// let order = Resource::new("Order")
///     .with_id(1)
///     .with_one("customer", Resource::new("Customer").with_id(7));
/// let parent = SerializerContext::new(Arc::new(DefaultSerializer), &order);
/// let config = AssociationConfig::new("customer");
/// let association = Association::bind(&config, &order, |_| -> SharedSerializer {
///     Arc::new(DefaultSerializer)
/// });
///
/// let relationship = RelationshipRenderer::new(false)
///     .render(&association, &parent, false)
///     .unwrap();
/// assert_eq!(
///     serde_json::Value::Object(relationship),
///     json!({ "data": { "type": "customers", "id": "7" } })
/// );
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct RelationshipRenderer {
	optimize_relationships: bool,
}

impl RelationshipRenderer {
	/// Create a renderer.
	pub fn new(optimize_relationships: bool) -> Self {
		Self {
			optimize_relationships,
		}
	}

	/// Whether linkage is limited to included associations.
	pub fn optimize_relationships(&self) -> bool {
		self.optimize_relationships
	}

	/// Render `association` of the record bound to `parent`.
	///
	/// `included` tells whether the association was explicitly included in
	/// this render. Errors from deferred meta propagate.
	pub fn render(
		&self,
		association: &Association<'_>,
		parent: &SerializerContext<'_>,
		included: bool,
	) -> RenderResult<Map<String, Value>> {
		let mut relationship = Map::new();

		if self.emits_data(association, included) {
			relationship.insert("data".to_string(), data_for(association));
		}

		let links = links_for(association, parent);
		if !links.is_empty() {
			relationship.insert("links".to_string(), Value::Object(links));
		}

		if let Some(meta) = association.config().meta() {
			let meta = meta.evaluate(parent)?;
			if !meta.is_null() {
				relationship.insert("meta".to_string(), meta);
			}
		}

		Ok(relationship)
	}

	fn emits_data(&self, association: &Association<'_>, included: bool) -> bool {
		association.config().include_data() && (!self.optimize_relationships || included)
	}
}

/// Linkage data of an association.
///
/// Collections map to identifier arrays, a configured virtual value is used
/// verbatim, a loaded to-one record maps to its identifier, and an empty
/// to-one relationship is `null`.
pub fn data_for(association: &Association<'_>) -> Value {
	match association.target() {
		AssociationTarget::Collection(contexts) => Value::Array(
			contexts
				.iter()
				.map(|context| context.identifier().to_value())
				.collect(),
		),
		AssociationTarget::Single(context) => {
			if let Some(value) = association.config().virtual_value() {
				return value.clone();
			}
			match context {
				Some(context) => context.identifier().to_value(),
				None => Value::Null,
			}
		}
	}
}

fn links_for(association: &Association<'_>, parent: &SerializerContext<'_>) -> Map<String, Value> {
	association
		.config()
		.links()
		.iter()
		.filter_map(|(name, link)| link.render(parent).map(|value| (name.clone(), value)))
		.filter(|(_, value)| !is_blank(value))
		.collect()
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::error::RenderError;
	use crate::resource::Resource;
	use crate::serializer::{
		AssociationConfig, DefaultSerializer, LinkSpec, MetaSpec, SharedSerializer,
	};
	use rstest::{fixture, rstest};
	use serde_json::json;
	use std::sync::Arc;

	fn resolve(_: &Resource) -> SharedSerializer {
		Arc::new(DefaultSerializer)
	}

	#[fixture]
	fn order() -> Resource {
		Resource::new("Order")
			.with_id(1)
			.with_attribute("comments_count", 4)
			.with_one("customer", Resource::new("Customer").with_id(7))
			.with_many(
				"tags",
				vec![Resource::new("Tag").with_id("a"), Resource::new("Tag").with_id("b")],
			)
			.with_null("shipment")
	}

	fn render(
		record: &Resource,
		config: &AssociationConfig,
		optimize: bool,
		included: bool,
	) -> RenderResult<Value> {
		let parent = SerializerContext::new(Arc::new(DefaultSerializer), record);
		let association = Association::bind(config, record, resolve);
		RelationshipRenderer::new(optimize)
			.render(&association, &parent, included)
			.map(Value::Object)
	}

	#[rstest]
	fn test_to_one_linkage(order: Resource) {
		let config = AssociationConfig::new("customer");
		assert_eq!(
			render(&order, &config, false, false).unwrap(),
			json!({ "data": { "type": "customers", "id": "7" } })
		);
	}

	#[rstest]
	fn test_to_many_linkage(order: Resource) {
		let config = AssociationConfig::new("tags");
		assert_eq!(
			render(&order, &config, false, false).unwrap(),
			json!({ "data": [{ "type": "tags", "id": "a" }, { "type": "tags", "id": "b" }] })
		);
	}

	#[rstest]
	fn test_empty_to_one_is_null(order: Resource) {
		let config = AssociationConfig::new("shipment");
		assert_eq!(render(&order, &config, false, false).unwrap(), json!({ "data": null }));
	}

	#[rstest]
	fn test_virtual_value_used_verbatim(order: Resource) {
		let virtual_value = json!({ "type": "warehouses", "id": "main" });
		let config = AssociationConfig::new("warehouse").with_virtual_value(virtual_value.clone());
		let association = Association::bind(&config, &order, resolve);

		assert_eq!(data_for(&association), virtual_value);
	}

	#[rstest]
	#[case(false, false, true)]
	#[case(true, false, false)]
	#[case(true, true, true)]
	#[case(false, true, true)]
	fn test_optimization_suppresses_data_unless_included(
		order: Resource,
		#[case] optimize: bool,
		#[case] included: bool,
		#[case] has_data: bool,
	) {
		let config = AssociationConfig::new("customer");
		let relationship = render(&order, &config, optimize, included).unwrap();
		assert_eq!(relationship.get("data").is_some(), has_data);
	}

	#[rstest]
	fn test_include_data_false_suppresses_data(order: Resource) {
		let config = AssociationConfig::new("customer")
			.with_include_data(false)
			.with_link("related", LinkSpec::href("/orders/{id}/customer"));
		assert_eq!(
			render(&order, &config, false, true).unwrap(),
			json!({ "links": { "related": "/orders/1/customer" } })
		);
	}

	#[rstest]
	fn test_empty_links_are_dropped(order: Resource) {
		let config = AssociationConfig::new("customer")
			.with_include_data(false)
			.with_link("self", LinkSpec::href(""))
			.with_link("related", LinkSpec::computed(|_| None));
		assert_eq!(render(&order, &config, false, false).unwrap(), json!({}));
	}

	#[rstest]
	fn test_deferred_meta_reads_parent_attributes(order: Resource) {
		let config = AssociationConfig::new("comments")
			.with_include_data(false)
			.with_meta(MetaSpec::deferred(|parent| {
				Ok(json!({ "count": parent.attribute("comments_count") }))
			}));
		assert_eq!(
			render(&order, &config, false, false).unwrap(),
			json!({ "meta": { "count": 4 } })
		);
	}

	#[rstest]
	fn test_null_meta_is_omitted(order: Resource) {
		let config = AssociationConfig::new("customer").with_meta(MetaSpec::Static(Value::Null));
		let relationship = render(&order, &config, false, false).unwrap();
		assert!(relationship.get("meta").is_none());
	}

	#[rstest]
	fn test_meta_failure_propagates(order: Resource) {
		let config = AssociationConfig::new("customer")
			.with_meta(MetaSpec::deferred(|_| Err(RenderError::meta("customer", "unavailable"))));
		assert!(matches!(
			render(&order, &config, false, false),
			Err(RenderError::Meta { .. })
		));
	}

	#[rstest]
	fn test_identifier_without_id() {
		let draft = Resource::new("Order");
		let context = SerializerContext::new(Arc::new(DefaultSerializer), &draft);
		assert_eq!(context.identifier().to_value(), json!({ "type": "orders" }));
	}
}
