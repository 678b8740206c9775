//! Convenience re-exports for common usage.
//!
//! ```
//! use reinhardt_jsonapi_core::prelude::*;
//!
//! let renderer_options = RenderOptions::new().with_include("customer");
//! assert!(renderer_options.include.contains("customer"));
//! ```

// Error types
pub use crate::error::{RenderError, RenderResult, SettingsError};

// Records and payloads
pub use crate::resource::{ErrorObject, Item, Payload, Related, Resource};

// Serializers
pub use crate::serializer::{
	AssociationConfig, DeclaredSerializer, DefaultSerializer, LinkSpec, MetaSpec,
	ResourceSerializer, SerializerChoice, SerializerContext, SharedSerializer,
};

// Lookup and registration
pub use crate::lookup::SerializerLookup;
pub use crate::registry::{SerializerRegistry, register_serializer};

// Rendering
pub use crate::adapter::JsonApiAdapter;
pub use crate::meta::RequestMeta;
pub use crate::renderer::{Adapter, RenderOptions, RenderPrimitive, Renderer, VersionedRenderer};
pub use crate::settings::JsonApiSettings;

// Naming
pub use reinhardt_naming::{Namer, Namespaced};
