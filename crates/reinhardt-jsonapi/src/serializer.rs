//! Serializers and the associations they declare
//!
//! A [`ResourceSerializer`] describes how one kind of record renders. At
//! render time it is bound to a record as a [`SerializerContext`], and each
//! declared [`AssociationConfig`] is bound to the record's loaded target as an
//! [`Association`].

use reinhardt_naming::inflector::plural_name;
use serde_json::{Map, Value};
use std::fmt;
use std::sync::Arc;

use crate::error::RenderResult;
use crate::relationship::ResourceIdentifier;
use crate::resource::{ErrorObject, Related, Resource};

/// Serializer shared between registry, lookup and render options.
pub type SharedSerializer = Arc<dyn ResourceSerializer>;

/// Describes how a record is exposed as a JSON:API resource object.
///
/// Every method has a default that exposes the record as-is, so an empty
/// implementation behaves like [`DefaultSerializer`].
///
/// # Examples
///
/// ```
/// use reinhardt_jsonapi_core::{AssociationConfig, Resource, ResourceSerializer};
/// use serde_json::{Map, Value};
///
/// struct OrderSerializer;
///
/// impl ResourceSerializer for OrderSerializer {
///     fn json_type(&self, _resource: &Resource) -> String {
///         "orders".to_string()
///     }
///
///     fn attributes(&self, resource: &Resource) -> Map<String, Value> {
///         let mut attributes = Map::new();
///         if let Some(total) = resource.attribute("total") {
///             attributes.insert("total".to_string(), total.clone());
///         }
///         attributes
///     }
///
///     fn associations(&self, _resource: &Resource) -> Vec<AssociationConfig> {
///         vec![AssociationConfig::new("customer")]
///     }
/// }
/// ```
pub trait ResourceSerializer: Send + Sync {
	/// JSON:API `type` member.
	fn json_type(&self, resource: &Resource) -> String {
		plural_name(resource.type_path())
	}

	/// JSON:API `id` member.
	fn id(&self, resource: &Resource) -> Option<String> {
		resource.id().map(str::to_string)
	}

	/// Exposed attributes.
	fn attributes(&self, resource: &Resource) -> Map<String, Value> {
		resource.attributes().clone()
	}

	/// One exposed attribute, `None` when the serializer does not expose it.
	///
	/// The default renders all [`ResourceSerializer::attributes`]; serializers
	/// that know their field set should override it.
	fn exposed_attribute(&self, resource: &Resource, name: &str) -> Option<Value> {
		self.attributes(resource).remove(name)
	}

	/// Declared associations, in render order.
	fn associations(&self, resource: &Resource) -> Vec<AssociationConfig> {
		resource
			.associations()
			.map(|(name, _)| AssociationConfig::new(name))
			.collect()
	}

	/// Resource level links such as `self`.
	fn links(&self, _resource: &Resource) -> Vec<(String, LinkSpec)> {
		Vec::new()
	}
}

/// Serializer used when no versioned serializer is registered for a record.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultSerializer;

impl ResourceSerializer for DefaultSerializer {
	fn exposed_attribute(&self, resource: &Resource, name: &str) -> Option<Value> {
		resource.attribute(name).cloned()
	}
}

/// Serializer configured through builder methods instead of a trait impl.
///
/// # Examples
///
/// ```
/// use reinhardt_jsonapi_core::{AssociationConfig, DeclaredSerializer, LinkSpec};
///
/// let serializer = DeclaredSerializer::new()
///     .with_type("orders")
///     .with_fields(["total", "state"])
///     .with_association(AssociationConfig::new("customer"))
///     .with_link("self", LinkSpec::href("/v1/orders/{id}"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct DeclaredSerializer {
	json_type: Option<String>,
	fields: Option<Vec<String>>,
	associations: Option<Vec<AssociationConfig>>,
	links: Vec<(String, LinkSpec)>,
}

impl DeclaredSerializer {
	/// Create a serializer that exposes everything.
	pub fn new() -> Self {
		Self::default()
	}

	/// Fix the JSON:API `type` instead of deriving it from the type path.
	pub fn with_type(mut self, json_type: impl Into<String>) -> Self {
		self.json_type = Some(json_type.into());
		self
	}

	/// Only expose the listed attributes.
	pub fn with_fields<I, S>(mut self, fields: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		self.fields = Some(fields.into_iter().map(Into::into).collect());
		self
	}

	/// Declare an association. Once one is declared, undeclared ones are not rendered.
	pub fn with_association(mut self, association: AssociationConfig) -> Self {
		self.associations
			.get_or_insert_with(Vec::new)
			.push(association);
		self
	}

	/// Add a resource level link.
	pub fn with_link(mut self, name: impl Into<String>, link: LinkSpec) -> Self {
		self.links.push((name.into(), link));
		self
	}
}

impl ResourceSerializer for DeclaredSerializer {
	fn json_type(&self, resource: &Resource) -> String {
		self.json_type
			.clone()
			.unwrap_or_else(|| plural_name(resource.type_path()))
	}

	fn attributes(&self, resource: &Resource) -> Map<String, Value> {
		match &self.fields {
			Some(fields) => fields
				.iter()
				.filter_map(|f| resource.attribute(f).map(|v| (f.clone(), v.clone())))
				.collect(),
			None => resource.attributes().clone(),
		}
	}

	fn exposed_attribute(&self, resource: &Resource, name: &str) -> Option<Value> {
		let exposed = self
			.fields
			.as_ref()
			.is_none_or(|fields| fields.iter().any(|field| field == name));
		if exposed {
			resource.attribute(name).cloned()
		} else {
			None
		}
	}

	fn associations(&self, resource: &Resource) -> Vec<AssociationConfig> {
		match &self.associations {
			Some(associations) => associations.clone(),
			None => DefaultSerializer.associations(resource),
		}
	}

	fn links(&self, _resource: &Resource) -> Vec<(String, LinkSpec)> {
		self.links.clone()
	}
}

/// Fixed serializer for error objects. Never resolved by naming lookup.
#[derive(Debug, Clone, Copy, Default)]
pub struct ErrorSerializer;

impl ErrorSerializer {
	/// Render one error object.
	pub fn serialize(&self, error: &ErrorObject) -> RenderResult<Value> {
		Ok(serde_json::to_value(error)?)
	}
}

/// Serializer selected for a payload item.
#[derive(Clone)]
pub enum SerializerChoice {
	/// The fixed [`ErrorSerializer`].
	Error,
	/// A resource serializer, with the name it was resolved under.
	Resource {
		/// Fully qualified serializer name, e.g. `V1::OrderSerializer`.
		name: String,
		/// The serializer itself.
		serializer: SharedSerializer,
	},
}

impl SerializerChoice {
	/// Choose a resource serializer.
	pub fn resource(name: impl Into<String>, serializer: SharedSerializer) -> Self {
		SerializerChoice::Resource {
			name: name.into(),
			serializer,
		}
	}

	/// Name of the chosen serializer.
	pub fn name(&self) -> &str {
		match self {
			SerializerChoice::Error => "ErrorSerializer",
			SerializerChoice::Resource { name, .. } => name,
		}
	}

	/// Whether the error serializer was chosen.
	pub fn is_error(&self) -> bool {
		matches!(self, SerializerChoice::Error)
	}
}

impl fmt::Debug for SerializerChoice {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			SerializerChoice::Error => f.write_str("SerializerChoice::Error"),
			SerializerChoice::Resource { name, .. } => f
				.debug_struct("SerializerChoice::Resource")
				.field("name", name)
				.finish(),
		}
	}
}

/// A serializer bound to one record.
#[derive(Clone)]
pub struct SerializerContext<'a> {
	serializer: SharedSerializer,
	resource: &'a Resource,
}

impl<'a> SerializerContext<'a> {
	/// Bind a serializer to a record.
	pub fn new(serializer: SharedSerializer, resource: &'a Resource) -> Self {
		Self {
			serializer,
			resource,
		}
	}

	/// The bound record.
	pub fn resource(&self) -> &'a Resource {
		self.resource
	}

	/// The bound serializer.
	pub fn serializer(&self) -> &SharedSerializer {
		&self.serializer
	}

	/// JSON:API `type` of the bound record.
	pub fn json_type(&self) -> String {
		self.serializer.json_type(self.resource)
	}

	/// JSON:API `id` of the bound record.
	pub fn id(&self) -> Option<String> {
		self.serializer.id(self.resource)
	}

	/// Attributes exposed by the serializer.
	pub fn attributes(&self) -> Map<String, Value> {
		self.serializer.attributes(self.resource)
	}

	/// One attribute, looked up in the exposed attributes first and the raw record second.
	pub fn attribute(&self, name: &str) -> Option<Value> {
		self.serializer
			.exposed_attribute(self.resource, name)
			.or_else(|| self.resource.attribute(name).cloned())
	}

	/// Associations declared by the serializer.
	pub fn associations(&self) -> Vec<AssociationConfig> {
		self.serializer.associations(self.resource)
	}

	/// Resource identifier of the bound record.
	pub fn identifier(&self) -> ResourceIdentifier {
		ResourceIdentifier::from_context(self)
	}
}

impl fmt::Debug for SerializerContext<'_> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("SerializerContext")
			.field("resource", self.resource)
			.finish_non_exhaustive()
	}
}

type LinkFn = dyn Fn(&SerializerContext<'_>) -> Option<Value> + Send + Sync;
type MetaFn = dyn Fn(&SerializerContext<'_>) -> RenderResult<Value> + Send + Sync;

/// How a link is produced.
///
/// `{id}` and `{type}` in hrefs are replaced with the bound record's values.
#[derive(Clone)]
pub enum LinkSpec {
	/// A plain href.
	Href(String),
	/// A link object with meta.
	Object {
		/// Target of the link.
		href: String,
		/// Link meta.
		meta: Value,
	},
	/// A link computed from the parent serializer context.
	Computed(Arc<LinkFn>),
}

impl LinkSpec {
	/// A plain href link.
	pub fn href(href: impl Into<String>) -> Self {
		LinkSpec::Href(href.into())
	}

	/// A link object with meta.
	pub fn object(href: impl Into<String>, meta: Value) -> Self {
		LinkSpec::Object {
			href: href.into(),
			meta,
		}
	}

	/// A computed link.
	pub fn computed<F>(f: F) -> Self
	where
		F: Fn(&SerializerContext<'_>) -> Option<Value> + Send + Sync + 'static,
	{
		LinkSpec::Computed(Arc::new(f))
	}

	/// Render against a serializer context. Empty results yield `None`.
	pub fn render(&self, context: &SerializerContext<'_>) -> Option<Value> {
		let value = match self {
			LinkSpec::Href(href) => Value::String(interpolate(href, context)),
			LinkSpec::Object { href, meta } => {
				let href = interpolate(href, context);
				if href.is_empty() {
					return None;
				}
				let mut link = Map::new();
				link.insert("href".to_string(), Value::String(href));
				if !meta.is_null() {
					link.insert("meta".to_string(), meta.clone());
				}
				Value::Object(link)
			}
			LinkSpec::Computed(f) => f(context)?,
		};
		(!is_blank(&value)).then_some(value)
	}
}

impl fmt::Debug for LinkSpec {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			LinkSpec::Href(href) => f.debug_tuple("Href").field(href).finish(),
			LinkSpec::Object { href, meta } => f
				.debug_struct("Object")
				.field("href", href)
				.field("meta", meta)
				.finish(),
			LinkSpec::Computed(_) => f.write_str("Computed(..)"),
		}
	}
}

fn interpolate(href: &str, context: &SerializerContext<'_>) -> String {
	let mut href = href.to_string();
	if href.contains("{id}") {
		href = href.replace("{id}", &context.id().unwrap_or_default());
	}
	if href.contains("{type}") {
		href = href.replace("{type}", &context.json_type());
	}
	href
}

pub(crate) fn is_blank(value: &Value) -> bool {
	match value {
		Value::Null => true,
		Value::String(s) => s.is_empty(),
		Value::Array(a) => a.is_empty(),
		Value::Object(o) => o.is_empty(),
		_ => false,
	}
}

/// Relationship meta, either fixed or computed when the relationship renders.
#[derive(Clone)]
pub enum MetaSpec {
	/// A fixed value.
	Static(Value),
	/// Evaluated against the parent serializer context.
	Deferred(Arc<MetaFn>),
}

impl MetaSpec {
	/// A deferred computation.
	///
	/// # Examples
	///
	/// ```
	/// use reinhardt_jsonapi_core::MetaSpec;
	/// use serde_json::json;
	///
	/// let meta = MetaSpec::deferred(|parent| {
	///     Ok(json!({ "count": parent.attribute("comments_count") }))
	/// });
	/// ```
	pub fn deferred<F>(f: F) -> Self
	where
		F: Fn(&SerializerContext<'_>) -> RenderResult<Value> + Send + Sync + 'static,
	{
		MetaSpec::Deferred(Arc::new(f))
	}

	/// Produce the meta value for a parent context.
	pub fn evaluate(&self, parent: &SerializerContext<'_>) -> RenderResult<Value> {
		match self {
			MetaSpec::Static(value) => Ok(value.clone()),
			MetaSpec::Deferred(f) => f(parent),
		}
	}
}

impl fmt::Debug for MetaSpec {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			MetaSpec::Static(value) => f.debug_tuple("Static").field(value).finish(),
			MetaSpec::Deferred(_) => f.write_str("Deferred(..)"),
		}
	}
}

/// An association declared on a serializer.
#[derive(Clone)]
pub struct AssociationConfig {
	name: String,
	include_data: bool,
	virtual_value: Option<Value>,
	links: Vec<(String, LinkSpec)>,
	meta: Option<MetaSpec>,
	serializer: Option<SharedSerializer>,
}

impl AssociationConfig {
	/// Declare an association that includes linkage data.
	pub fn new(name: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			include_data: true,
			virtual_value: None,
			links: Vec::new(),
			meta: None,
			serializer: None,
		}
	}

	/// Allow or suppress linkage data.
	pub fn with_include_data(mut self, include_data: bool) -> Self {
		self.include_data = include_data;
		self
	}

	/// Use a precomputed linkage value instead of the loaded record.
	pub fn with_virtual_value(mut self, value: Value) -> Self {
		self.virtual_value = Some(value);
		self
	}

	/// Add a relationship link.
	pub fn with_link(mut self, name: impl Into<String>, link: LinkSpec) -> Self {
		self.links.push((name.into(), link));
		self
	}

	/// Set relationship meta.
	pub fn with_meta(mut self, meta: MetaSpec) -> Self {
		self.meta = Some(meta);
		self
	}

	/// Render related records with this serializer instead of looking one up.
	pub fn with_serializer(mut self, serializer: SharedSerializer) -> Self {
		self.serializer = Some(serializer);
		self
	}

	/// Association name.
	pub fn name(&self) -> &str {
		&self.name
	}

	/// Whether linkage data may be emitted.
	pub fn include_data(&self) -> bool {
		self.include_data
	}

	/// Precomputed linkage value.
	pub fn virtual_value(&self) -> Option<&Value> {
		self.virtual_value.as_ref()
	}

	/// Relationship links.
	pub fn links(&self) -> &[(String, LinkSpec)] {
		&self.links
	}

	/// Relationship meta.
	pub fn meta(&self) -> Option<&MetaSpec> {
		self.meta.as_ref()
	}

	/// Explicit serializer for related records.
	pub fn serializer(&self) -> Option<&SharedSerializer> {
		self.serializer.as_ref()
	}
}

impl fmt::Debug for AssociationConfig {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("AssociationConfig")
			.field("name", &self.name)
			.field("include_data", &self.include_data)
			.field("virtual_value", &self.virtual_value)
			.field("links", &self.links)
			.field("meta", &self.meta)
			.finish_non_exhaustive()
	}
}

/// Related records of an association, each bound to its serializer.
#[derive(Debug, Clone)]
pub enum AssociationTarget<'a> {
	/// To-one; `None` when nothing is loaded.
	Single(Option<SerializerContext<'a>>),
	/// To-many.
	Collection(Vec<SerializerContext<'a>>),
}

/// An association bound to the record being rendered.
#[derive(Debug, Clone)]
pub struct Association<'a> {
	config: &'a AssociationConfig,
	target: AssociationTarget<'a>,
}

impl<'a> Association<'a> {
	/// Bind `config` to the target loaded on `record`.
	///
	/// Related records use the association's explicit serializer when set and
	/// `resolve` otherwise.
	pub fn bind<F>(config: &'a AssociationConfig, record: &'a Resource, resolve: F) -> Self
	where
		F: Fn(&Resource) -> SharedSerializer,
	{
		let context = |related: &'a Resource| {
			let serializer = config
				.serializer()
				.cloned()
				.unwrap_or_else(|| resolve(related));
			SerializerContext::new(serializer, related)
		};

		let target = match record.association(config.name()) {
			Some(Related::One(related)) => AssociationTarget::Single(Some(context(related.as_ref()))),
			Some(Related::Many(related)) => {
				AssociationTarget::Collection(related.iter().map(|r| context(r)).collect())
			}
			Some(Related::Null) | None => AssociationTarget::Single(None),
		};

		Self { config, target }
	}

	/// Association name.
	pub fn name(&self) -> &str {
		self.config.name()
	}

	/// Declared configuration.
	pub fn config(&self) -> &'a AssociationConfig {
		self.config
	}

	/// Bound target.
	pub fn target(&self) -> &AssociationTarget<'a> {
		&self.target
	}

	/// Bound related records, in order.
	pub fn contexts(&self) -> Vec<&SerializerContext<'a>> {
		match &self.target {
			AssociationTarget::Single(context) => context.iter().collect(),
			AssociationTarget::Collection(contexts) => contexts.iter().collect(),
		}
	}
}
