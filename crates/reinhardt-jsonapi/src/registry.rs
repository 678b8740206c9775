//! Serializer registry
//!
//! Maps fully qualified, versioned serializer names (`V1::OrderSerializer`)
//! to constructors. Serializers are registered explicitly or collected at link
//! time with the `inventory` crate.
//!
//! ## Static registration
//!
//! ```ignore
//! use std::sync::Arc;
//! use reinhardt_jsonapi_core::{DeclaredSerializer, SharedSerializer, submit_serializer};
//!
//! fn v1_order() -> SharedSerializer {
//!     Arc::new(DeclaredSerializer::new().with_type("orders"))
//! }
//!
//! submit_serializer!("V1::OrderSerializer", v1_order);
//! ```

use once_cell::sync::Lazy;
use parking_lot::RwLock;
use std::collections::HashMap;

use crate::serializer::SharedSerializer;

/// Constructor stored in the registry.
pub type SerializerConstructor = fn() -> SharedSerializer;

/// Link-time registration entry.
///
/// This struct is used with `inventory::collect!` to gather serializers
/// submitted through [`submit_serializer!`](crate::submit_serializer).
pub struct SerializerRegistration {
	/// Fully qualified serializer name.
	pub name: &'static str,
	/// Constructor for the serializer.
	pub constructor: SerializerConstructor,
}

inventory::collect!(SerializerRegistration);

/// Register a serializer at link time.
#[macro_export]
macro_rules! submit_serializer {
	($name:expr, $constructor:expr) => {
		$crate::inventory::submit! {
			$crate::registry::SerializerRegistration {
				name: $name,
				constructor: $constructor,
			}
		}
	};
}

/// Serializer constructors keyed by fully qualified name.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use reinhardt_jsonapi_core::{DefaultSerializer, SerializerRegistry, SharedSerializer};
///
/// fn order_serializer() -> SharedSerializer {
///     Arc::new(DefaultSerializer)
/// }
///
/// let registry = SerializerRegistry::new().with("V1::OrderSerializer", order_serializer);
/// assert!(registry.contains("V1::OrderSerializer"));
/// assert!(registry.get("V2::OrderSerializer").is_none());
/// ```
#[derive(Debug, Clone, Default)]
pub struct SerializerRegistry {
	constructors: HashMap<String, SerializerConstructor>,
}

impl SerializerRegistry {
	/// An empty registry.
	pub fn new() -> Self {
		Self::default()
	}

	/// A registry holding every serializer submitted with `submit_serializer!`.
	pub fn from_inventory() -> Self {
		let mut registry = Self::new();
		for registration in inventory::iter::<SerializerRegistration> {
			registry.register(registration.name, registration.constructor);
		}
		tracing::debug!(count = registry.len(), "Collected serializer registrations");
		registry
	}

	/// Register a constructor, replacing any previous one under the same name.
	pub fn register(&mut self, name: impl Into<String>, constructor: SerializerConstructor) {
		let name = name.into();
		if self.constructors.insert(name.clone(), constructor).is_some() {
			tracing::debug!(serializer = %name, "Replaced serializer registration");
		}
	}

	/// Builder form of [`SerializerRegistry::register`].
	pub fn with(mut self, name: impl Into<String>, constructor: SerializerConstructor) -> Self {
		self.register(name, constructor);
		self
	}

	/// Construct the serializer registered under `name`.
	pub fn get(&self, name: &str) -> Option<SharedSerializer> {
		self.constructors.get(name).map(|constructor| constructor())
	}

	/// Whether `name` is registered.
	pub fn contains(&self, name: &str) -> bool {
		self.constructors.contains_key(name)
	}

	/// Registered names, sorted.
	pub fn names(&self) -> Vec<String> {
		let mut names: Vec<String> = self.constructors.keys().cloned().collect();
		names.sort();
		names
	}

	/// Number of registrations.
	pub fn len(&self) -> usize {
		self.constructors.len()
	}

	/// Whether nothing is registered.
	pub fn is_empty(&self) -> bool {
		self.constructors.is_empty()
	}
}

static GLOBAL_REGISTRY: Lazy<RwLock<SerializerRegistry>> =
	Lazy::new(|| RwLock::new(SerializerRegistry::from_inventory()));

/// Snapshot of the process-wide registry.
pub fn global_registry() -> SerializerRegistry {
	GLOBAL_REGISTRY.read().clone()
}

/// Register a serializer in the process-wide registry.
pub fn register_serializer(name: impl Into<String>, constructor: SerializerConstructor) {
	GLOBAL_REGISTRY.write().register(name, constructor);
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::serializer::{DeclaredSerializer, DefaultSerializer};
	use rstest::rstest;
	use serial_test::serial;
	use std::sync::Arc;

	fn linked_comment() -> SharedSerializer {
		Arc::new(DeclaredSerializer::new().with_type("comments"))
	}

	crate::submit_serializer!("Linked::CommentSerializer", linked_comment);

	fn default_serializer() -> SharedSerializer {
		Arc::new(DefaultSerializer)
	}

	#[rstest]
	fn test_register_and_get() {
		let mut registry = SerializerRegistry::new();
		assert!(registry.is_empty());

		registry.register("V1::OrderSerializer", default_serializer);
		assert_eq!(registry.len(), 1);
		assert!(registry.get("V1::OrderSerializer").is_some());
		assert!(registry.get("OrderSerializer").is_none());
	}

	#[rstest]
	fn test_names_are_sorted() {
		let registry = SerializerRegistry::new()
			.with("V2::OrderSerializer", default_serializer)
			.with("V1::OrderSerializer", default_serializer);
		assert_eq!(
			registry.names(),
			vec!["V1::OrderSerializer", "V2::OrderSerializer"]
		);
	}

	#[rstest]
	fn test_from_inventory_collects_submissions() {
		let registry = SerializerRegistry::from_inventory();
		assert!(registry.contains("Linked::CommentSerializer"));
	}

	#[rstest]
	#[serial(serializer_registry)]
	fn test_global_registry_accepts_runtime_registrations() {
		register_serializer("Runtime::TagSerializer", default_serializer);
		let registry = global_registry();

		assert!(registry.contains("Runtime::TagSerializer"));
		assert!(registry.contains("Linked::CommentSerializer"));
	}
}
