//! Document rendering entry point
//!
//! [`VersionedRenderer`] classifies the payload, selects serializers through
//! the owner's [`SerializerLookup`], attaches request meta and delegates the
//! document structure to a [`RenderPrimitive`] (by default the
//! [`JsonApiAdapter`]).

use reinhardt_naming::{Namer, Namespaced};
use serde_json::{Map, Value};

use crate::adapter::JsonApiAdapter;
use crate::error::RenderResult;
use crate::include::IncludeTree;
use crate::lookup::SerializerLookup;
use crate::meta::RequestMeta;
use crate::registry::{SerializerRegistry, global_registry};
use crate::resource::{Item, Payload};
use crate::serializer::SerializerChoice;
use crate::settings::{JsonApiSettings, settings};

/// Output adapter requested by the render options.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Adapter {
	/// Flat attribute hashes.
	#[default]
	Attributes,
	/// JSON:API documents.
	JsonApi,
}

/// Options passed to a render call.
#[derive(Debug, Clone, Default)]
pub struct RenderOptions {
	/// Output adapter. Forced to [`Adapter::JsonApi`] by [`VersionedRenderer`].
	pub adapter: Adapter,
	/// Top-level meta.
	pub meta: Option<Map<String, Value>>,
	/// Serializer for a single item.
	pub serializer: Option<SerializerChoice>,
	/// Serializer for every item of a collection.
	pub each_serializer: Option<SerializerChoice>,
	/// Associations to side-load into `included`.
	pub include: IncludeTree,
	/// Top-level links.
	pub links: Map<String, Value>,
}

impl RenderOptions {
	/// Default options.
	pub fn new() -> Self {
		Self::default()
	}

	/// Set the adapter.
	pub fn with_adapter(mut self, adapter: Adapter) -> Self {
		self.adapter = adapter;
		self
	}

	/// Set top-level meta.
	pub fn with_meta(mut self, meta: Map<String, Value>) -> Self {
		self.meta = Some(meta);
		self
	}

	/// Override the single-item serializer.
	pub fn with_serializer(mut self, serializer: SerializerChoice) -> Self {
		self.serializer = Some(serializer);
		self
	}

	/// Override the collection item serializer.
	pub fn with_each_serializer(mut self, serializer: SerializerChoice) -> Self {
		self.each_serializer = Some(serializer);
		self
	}

	/// Include associations, e.g. `"customer,items.product"`.
	pub fn with_include(mut self, include: &str) -> Self {
		self.include = IncludeTree::parse(include);
		self
	}

	/// Add a top-level link.
	pub fn with_link(mut self, name: impl Into<String>, href: impl Into<Value>) -> Self {
		self.links.insert(name.into(), href.into());
		self
	}
}

/// Something that can render a payload into a response document.
pub trait Renderer {
	/// Render `payload` with `options`.
	fn render(&self, payload: &Payload, options: RenderOptions) -> RenderResult<Value>;
}

/// The generic render step that turns selected options into a document.
pub trait RenderPrimitive {
	/// Render `payload` exactly as `options` describe.
	fn render(&self, payload: &Payload, options: &RenderOptions) -> RenderResult<Value>;
}

/// Renders payloads with serializers chosen from the owner's API version.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use reinhardt_jsonapi_core::{
///     DeclaredSerializer, JsonApiSettings, Payload, RenderOptions, Renderer, Resource,
///     SerializerRegistry, SharedSerializer, VersionedRenderer,
/// };
/// use reinhardt_naming::Namer;
/// use serde_json::json;
///
/// fn order_serializer() -> SharedSerializer {
///     Arc::new(DeclaredSerializer::new().with_type("orders").with_fields(["total"]))
/// }
///
/// let registry = SerializerRegistry::new().with("V1::OrderSerializer", order_serializer);
/// let namer = Namer::new("API::V1::OrdersController").with_isolated_namespace("API");
/// let mut renderer = VersionedRenderer::new(namer, registry, JsonApiSettings::default());
/// renderer.meta_mut().insert("redirect_url", "/v1/orders/1");
///
/// let order = Resource::new("Order").with_id(1).with_attribute("total", 10);
/// let document = renderer.render(&Payload::from(order), RenderOptions::new()).unwrap();
///
/// assert_eq!(
///     document,
///     json!({
///         "data": { "type": "orders", "id": "1", "attributes": { "total": 10 } },
///         "meta": { "redirect_url": "/v1/orders/1" }
///     })
/// );
/// ```
#[derive(Debug)]
pub struct VersionedRenderer<P = JsonApiAdapter> {
	lookup: SerializerLookup,
	primitive: P,
	meta: RequestMeta,
}

impl VersionedRenderer<JsonApiAdapter> {
	/// Renderer for `namer`'s owner, rendering through a [`JsonApiAdapter`].
	///
	/// The isolated namespace from `settings` applies unless `namer` already
	/// carries one.
	pub fn new(namer: Namer, registry: SerializerRegistry, settings: JsonApiSettings) -> Self {
		let namer = match (&settings.isolated_namespace, namer.isolated_namespace()) {
			(Some(token), None) => namer.with_isolated_namespace(token.clone()),
			_ => namer,
		};
		let lookup = SerializerLookup::new(namer, registry);
		let adapter = JsonApiAdapter::new(settings).with_lookup(lookup.clone());
		Self::with_primitive(lookup, adapter)
	}

	/// Renderer for `T` using the process-wide settings and registry.
	pub fn for_owner<T: Namespaced>() -> Self {
		Self::new(T::namer(), global_registry(), settings())
	}
}

impl<P: RenderPrimitive> VersionedRenderer<P> {
	/// Renderer delegating to a custom primitive.
	pub fn with_primitive(lookup: SerializerLookup, primitive: P) -> Self {
		Self {
			lookup,
			primitive,
			meta: RequestMeta::new(),
		}
	}

	/// Serializer lookup for the owner.
	pub fn lookup(&self) -> &SerializerLookup {
		&self.lookup
	}

	/// The primitive rendering is delegated to.
	pub fn primitive(&self) -> &P {
		&self.primitive
	}

	/// Request meta accumulated so far.
	pub fn meta(&self) -> &RequestMeta {
		&self.meta
	}

	/// Write access to the request meta.
	pub fn meta_mut(&mut self) -> &mut RequestMeta {
		&mut self.meta
	}

	/// Options handed to the primitive for `payload`.
	///
	/// Forces the JSON:API adapter, attaches non-empty request meta and
	/// selects serializers from the payload shape.
	pub fn prepare_options(&self, payload: &Payload, mut options: RenderOptions) -> RenderOptions {
		options.adapter = Adapter::JsonApi;

		if let Some(meta) = self.meta.to_map() {
			options.meta = Some(meta);
		}

		match payload {
			Payload::Many(items) => match items.first() {
				Some(Item::Error(_)) => {
					options.each_serializer = Some(SerializerChoice::Error);
				}
				Some(Item::Resource(first)) => {
					if let Some(choice) = self.lookup.serializer_for(first) {
						tracing::trace!(serializer = choice.name(), "Selected collection serializer");
						options.each_serializer = Some(choice);
					}
				}
				None => {}
			},
			Payload::One(Item::Error(_)) => {
				options.serializer = Some(SerializerChoice::Error);
			}
			Payload::One(Item::Resource(record)) => {
				if let Some(choice) = self.lookup.serializer_for(record) {
					tracing::trace!(serializer = choice.name(), "Selected serializer");
					options.serializer = Some(choice);
				}
			}
			Payload::Null => {}
		}

		options
	}
}

impl<P: RenderPrimitive> Renderer for VersionedRenderer<P> {
	fn render(&self, payload: &Payload, options: RenderOptions) -> RenderResult<Value> {
		let options = self.prepare_options(payload, options);
		self.primitive.render(payload, &options)
	}
}
