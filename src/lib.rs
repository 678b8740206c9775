//! # Reinhardt JSON:API
//!
//! Versioned JSON:API rendering for Reinhardt.
//!
//! A view living under a versioned namespace (`API::V1::OrdersController`)
//! renders its records with the serializers of its own API version
//! (`V1::OrderSerializer`), so several versions can share one model layer.
//!
//! ## Crates
//!
//! - [`naming`] - namespace and API version aware naming (`reinhardt-naming`)
//! - the crate root - serializer lookup, relationship and document rendering
//!   (`reinhardt-jsonapi-core`)
//!
//! ## Quick Example
//!
//! ```
//! use std::sync::Arc;
//! use reinhardt_jsonapi::prelude::*;
//! use serde_json::json;
//!
//! fn order_serializer() -> SharedSerializer {
//!     Arc::new(DeclaredSerializer::new().with_type("orders").with_fields(["total"]))
//! }
//!
//! let registry = SerializerRegistry::new().with("V1::OrderSerializer", order_serializer);
//! let namer = Namer::new("API::V1::OrdersController").with_isolated_namespace("API");
//! let renderer = VersionedRenderer::new(namer, registry, JsonApiSettings::default());
//!
//! let errors = Payload::from(vec![ErrorObject::new().with_status(404)]);
//! assert_eq!(
//!     renderer.render(&errors, RenderOptions::new()).unwrap(),
//!     json!({ "errors": [{ "status": "404" }] })
//! );
//! ```
//!
//! ## Configuration
//!
//! Settings are read with [`JsonApiSettings::from_env`] or
//! [`JsonApiSettings::from_file`] and installed process-wide with
//! [`configure`]:
//!
//! ```toml
//! optimize_relationships = true
//! isolated_namespace = "API"
//! jsonapi_version = "1.1"
//! ```

pub use reinhardt_jsonapi_core::*;

/// Namespace and API version aware naming.
pub use reinhardt_naming as naming;
