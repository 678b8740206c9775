//! Versioned JSON:API rendering for the Reinhardt framework.
//!
//! This crate renders records, collections and error lists as JSON:API
//! documents, choosing each record's serializer from the API version of the
//! view that renders it:
//!
//! - **Serializer Lookup**: `Shop::Order` rendered by `API::V1::OrdersController`
//!   resolves `V1::Shop::OrderSerializer` from a [`SerializerRegistry`]
//! - **Relationships**: linkage data, links and deferred meta per association
//! - **Documents**: primary data, compound `included` resources, top-level
//!   links and request meta
//!
//! # Quick Start
//!
//! ```
//! use std::sync::Arc;
//! use reinhardt_jsonapi_core::prelude::*;
//! use reinhardt_naming::Namer;
//! use serde_json::json;
//!
//! fn order_serializer() -> SharedSerializer {
//!     Arc::new(
//!         DeclaredSerializer::new()
//!             .with_type("orders")
//!             .with_association(AssociationConfig::new("customer")),
//!     )
//! }
//!
//! let registry = SerializerRegistry::new().with("V1::OrderSerializer", order_serializer);
//! let namer = Namer::new("API::V1::OrdersController").with_isolated_namespace("API");
//! let renderer = VersionedRenderer::new(namer, registry, JsonApiSettings::default());
//!
//! let order = Resource::new("Order")
//!     .with_id(1)
//!     .with_one("customer", Resource::new("Customer").with_id(7));
//! let document = renderer
//!     .render(&Payload::from(order), RenderOptions::new().with_include("customer"))
//!     .unwrap();
//!
//! assert_eq!(document["data"]["relationships"]["customer"]["data"]["id"], "7");
//! assert_eq!(document["included"][0]["type"], "customers");
//! ```
//!
//! # Architecture
//!
//! - [`VersionedRenderer`] - classifies payloads and selects serializers
//! - [`SerializerLookup`] - resolves versioned serializer names
//! - [`SerializerRegistry`] - serializer constructors, registered explicitly
//!   or with [`submit_serializer!`]
//! - [`RelationshipRenderer`] - renders one association
//! - [`JsonApiAdapter`] - builds the document
//! - [`JsonApiSettings`] - rendering settings from code, environment or files

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod adapter;
pub mod error;
pub mod include;
pub mod lookup;
pub mod meta;
pub mod prelude;
pub mod registry;
pub mod relationship;
pub mod renderer;
pub mod resource;
pub mod serializer;
pub mod settings;

// Re-export commonly used types at crate root
pub use adapter::JsonApiAdapter;
pub use error::{RenderError, RenderResult, SettingsError};
pub use include::IncludeTree;
pub use lookup::{SerializerLookup, ValidityPredicate, valid_for_serialization};
pub use meta::RequestMeta;
pub use registry::{
	SerializerConstructor, SerializerRegistration, SerializerRegistry, global_registry,
	register_serializer,
};
pub use relationship::{RelationshipRenderer, ResourceIdentifier, data_for};
pub use renderer::{Adapter, RenderOptions, RenderPrimitive, Renderer, VersionedRenderer};
pub use resource::{ErrorObject, ErrorSource, Item, Payload, Related, Resource};
pub use serializer::{
	Association, AssociationConfig, AssociationTarget, DeclaredSerializer, DefaultSerializer,
	ErrorSerializer, LinkSpec, MetaSpec, ResourceSerializer, SerializerChoice, SerializerContext,
	SharedSerializer,
};
pub use settings::{JsonApiSettings, configure, settings};

// Used by `submit_serializer!`
#[doc(hidden)]
pub use inventory;
