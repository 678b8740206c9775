//! Versioned serializer lookup
//!
//! Resolves the serializer for a record from the rendering owner's version
//! namespace: a `Shop::Order` rendered by `API::V1::OrdersController` (with
//! `API` isolated) resolves `V1::Shop::OrderSerializer`.

use reinhardt_naming::Namer;
use std::fmt;
use std::sync::Arc;

use crate::registry::SerializerRegistry;
use crate::resource::Resource;
use crate::serializer::{DefaultSerializer, SerializerChoice, SharedSerializer};

/// Decides whether a record may be rendered by a looked-up serializer.
pub type ValidityPredicate = Arc<dyn Fn(&Resource) -> bool + Send + Sync>;

/// Default validity predicate: the record must carry a type path.
pub fn valid_for_serialization(record: &Resource) -> bool {
	!record.type_path().is_empty()
}

/// Resolves versioned serializers for records.
///
/// Names are resolved relative to the owner's version namespace rather than
/// the namespace the serializer itself lives in.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use reinhardt_jsonapi_core::{
///     DefaultSerializer, Resource, SerializerLookup, SerializerRegistry, SharedSerializer,
/// };
/// use reinhardt_naming::Namer;
///
/// fn order_serializer() -> SharedSerializer {
///     Arc::new(DefaultSerializer)
/// }
///
/// let registry = SerializerRegistry::new().with("V1::OrderSerializer", order_serializer);
/// let namer = Namer::new("API::V1::OrdersController").with_isolated_namespace("API");
/// let lookup = SerializerLookup::new(namer, registry);
///
/// let choice = lookup.serializer_for(&Resource::new("Order")).unwrap();
/// assert_eq!(choice.name(), "V1::OrderSerializer");
/// assert!(lookup.serializer_for(&Resource::new("Invoice")).is_none());
/// ```
#[derive(Clone)]
pub struct SerializerLookup {
	namer: Namer,
	registry: Arc<SerializerRegistry>,
	predicate: ValidityPredicate,
}

impl SerializerLookup {
	/// Create a lookup using [`valid_for_serialization`].
	pub fn new(namer: Namer, registry: SerializerRegistry) -> Self {
		Self {
			namer,
			registry: Arc::new(registry),
			predicate: Arc::new(valid_for_serialization),
		}
	}

	/// Replace the validity predicate.
	pub fn with_predicate<F>(mut self, predicate: F) -> Self
	where
		F: Fn(&Resource) -> bool + Send + Sync + 'static,
	{
		self.predicate = Arc::new(predicate);
		self
	}

	/// Namer of the rendering owner.
	pub fn namer(&self) -> &Namer {
		&self.namer
	}

	/// Registry serializers are resolved from.
	pub fn registry(&self) -> &SerializerRegistry {
		&self.registry
	}

	/// Fully qualified versioned serializer name for `record`.
	pub fn serializer_name_for(&self, record: &Resource) -> String {
		let suffix = format!("{}Serializer", record.type_path());
		self.namer.version_module(Some(&suffix))
	}

	/// Serializer for `record`, if one is registered and the record is valid.
	///
	/// `None` means the caller should not override the serializer and let
	/// the default resolution apply.
	pub fn serializer_for(&self, record: &Resource) -> Option<SerializerChoice> {
		let name = self.serializer_name_for(record);

		let Some(serializer) = self.registry.get(&name) else {
			tracing::debug!(serializer = %name, "No versioned serializer registered");
			return None;
		};

		if !(self.predicate)(record) {
			tracing::debug!(
				serializer = %name,
				type_path = record.type_path(),
				"Record rejected for serialization"
			);
			return None;
		}

		Some(SerializerChoice::resource(name, serializer))
	}

	/// Serializer for `record`, falling back to [`DefaultSerializer`].
	pub fn resolve_or_default(&self, record: &Resource) -> SharedSerializer {
		match self.serializer_for(record) {
			Some(SerializerChoice::Resource { serializer, .. }) => serializer,
			_ => Arc::new(DefaultSerializer),
		}
	}
}

impl fmt::Debug for SerializerLookup {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("SerializerLookup")
			.field("namer", &self.namer)
			.field("registry", &self.registry)
			.field("predicate", &"<dyn Fn>")
			.finish()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::serializer::DeclaredSerializer;
	use rstest::{fixture, rstest};

	fn v1_order() -> SharedSerializer {
		Arc::new(DeclaredSerializer::new().with_type("v1-orders"))
	}

	fn v2_order() -> SharedSerializer {
		Arc::new(DeclaredSerializer::new().with_type("v2-orders"))
	}

	fn shop_line_item() -> SharedSerializer {
		Arc::new(DeclaredSerializer::new().with_type("line-items"))
	}

	#[fixture]
	fn registry() -> SerializerRegistry {
		SerializerRegistry::new()
			.with("V1::OrderSerializer", v1_order)
			.with("V2::OrderSerializer", v2_order)
			.with("V1::Shop::LineItemSerializer", shop_line_item)
			.with("API::V1::OrderSerializer", v2_order)
	}

	fn lookup(owner: &str, registry: SerializerRegistry) -> SerializerLookup {
		SerializerLookup::new(Namer::new(owner).with_isolated_namespace("API"), registry)
	}

	#[rstest]
	#[case("API::V1::OrdersController", "V1::OrderSerializer")]
	#[case("API::V2::OrdersController", "V2::OrderSerializer")]
	fn test_resolves_by_owner_version(
		registry: SerializerRegistry,
		#[case] owner: &str,
		#[case] expected: &str,
	) {
		let choice = lookup(owner, registry)
			.serializer_for(&Resource::new("Order"))
			.unwrap();
		assert_eq!(choice.name(), expected);
	}

	#[rstest]
	fn test_namespaced_record(registry: SerializerRegistry) {
		let lookup = lookup("API::V1::OrdersController", registry);
		let record = Resource::new("Shop::LineItem");

		assert_eq!(lookup.serializer_name_for(&record), "V1::Shop::LineItemSerializer");
		assert!(lookup.serializer_for(&record).is_some());
	}

	#[rstest]
	fn test_without_isolated_namespace_uses_full_namespace(registry: SerializerRegistry) {
		let lookup = SerializerLookup::new(Namer::new("API::V1::OrdersController"), registry);
		let record = Resource::new("Order");

		assert_eq!(lookup.serializer_name_for(&record), "API::V1::OrderSerializer");
		let serializer = lookup.resolve_or_default(&record);
		assert_eq!(serializer.json_type(&record), "v2-orders");
	}

	#[rstest]
	fn test_unregistered_version_yields_none(registry: SerializerRegistry) {
		let lookup = lookup("API::V3::OrdersController", registry);
		assert!(lookup.serializer_for(&Resource::new("Order")).is_none());
	}

	#[rstest]
	fn test_predicate_rejection_yields_none(registry: SerializerRegistry) {
		let lookup = lookup("API::V1::OrdersController", registry)
			.with_predicate(|record| record.id().is_some());

		assert!(lookup.serializer_for(&Resource::new("Order")).is_none());
		assert!(lookup.serializer_for(&Resource::new("Order").with_id(1)).is_some());
	}

	#[rstest]
	fn test_default_predicate_rejects_untyped_records() {
		assert!(!valid_for_serialization(&Resource::default()));
		assert!(valid_for_serialization(&Resource::new("Order")));
	}

	#[rstest]
	fn test_resolve_or_default_falls_back(registry: SerializerRegistry) {
		let lookup = lookup("API::V1::OrdersController", registry);
		let record = Resource::new("Invoice");
		assert_eq!(lookup.resolve_or_default(&record).json_type(&record), "invoices");
	}
}
