//! Records, error objects and render payloads
//!
//! A [`Resource`] is an already loaded record: a type path, an optional id,
//! attributes and named associations. Renderers only borrow it.

use serde::Serialize;
use serde_json::{Map, Value};

/// Loaded target of an association.
#[derive(Debug, Clone, PartialEq)]
pub enum Related {
	/// A single related record.
	One(Box<Resource>),
	/// A collection of related records.
	Many(Vec<Resource>),
	/// No related record, or the association was not loaded.
	Null,
}

impl Related {
	/// Related records, empty for [`Related::Null`].
	pub fn records(&self) -> Vec<&Resource> {
		match self {
			Related::One(record) => vec![record.as_ref()],
			Related::Many(records) => records.iter().collect(),
			Related::Null => Vec::new(),
		}
	}
}

/// An in-memory record with a class identity, attributes and associations.
///
/// # Examples
///
/// ```
/// use reinhardt_jsonapi_core::Resource;
///
/// let customer = Resource::new("Customer").with_id(7).with_attribute("name", "Ada");
/// let order = Resource::new("Shop::Order")
///     .with_id(1)
///     .with_attribute("total", 42)
///     .with_one("customer", customer);
///
/// assert_eq!(order.type_path(), "Shop::Order");
/// assert_eq!(order.id(), Some("1"));
/// assert!(order.association("customer").is_some());
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Resource {
	type_path: String,
	id: Option<String>,
	attributes: Map<String, Value>,
	associations: Vec<(String, Related)>,
}

impl Resource {
	/// Create a record of the given type path (segments separated by `::`).
	pub fn new(type_path: impl Into<String>) -> Self {
		Self {
			type_path: type_path.into(),
			..Self::default()
		}
	}

	/// Set the record id.
	pub fn with_id(mut self, id: impl ToString) -> Self {
		self.id = Some(id.to_string());
		self
	}

	/// Add or replace an attribute.
	pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
		self.attributes.insert(name.into(), value.into());
		self
	}

	/// Add or replace an association.
	pub fn with_related(mut self, name: impl Into<String>, related: Related) -> Self {
		let name = name.into();
		match self.associations.iter_mut().find(|(n, _)| *n == name) {
			Some(slot) => slot.1 = related,
			None => self.associations.push((name, related)),
		}
		self
	}

	/// Add a to-one association.
	pub fn with_one(self, name: impl Into<String>, record: Resource) -> Self {
		self.with_related(name, Related::One(Box::new(record)))
	}

	/// Add a to-many association.
	pub fn with_many(self, name: impl Into<String>, records: Vec<Resource>) -> Self {
		self.with_related(name, Related::Many(records))
	}

	/// Add an empty association.
	pub fn with_null(self, name: impl Into<String>) -> Self {
		self.with_related(name, Related::Null)
	}

	/// Fully qualified type path.
	pub fn type_path(&self) -> &str {
		&self.type_path
	}

	/// Record id, if persisted.
	pub fn id(&self) -> Option<&str> {
		self.id.as_deref()
	}

	/// All attributes in insertion order.
	pub fn attributes(&self) -> &Map<String, Value> {
		&self.attributes
	}

	/// A single attribute.
	pub fn attribute(&self, name: &str) -> Option<&Value> {
		self.attributes.get(name)
	}

	/// A single association target.
	pub fn association(&self, name: &str) -> Option<&Related> {
		self.associations
			.iter()
			.find(|(n, _)| n == name)
			.map(|(_, related)| related)
	}

	/// All associations in insertion order.
	pub fn associations(&self) -> impl Iterator<Item = (&str, &Related)> {
		self.associations.iter().map(|(n, r)| (n.as_str(), r))
	}
}

/// Location of the request data an error refers to.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ErrorSource {
	/// JSON pointer into the request document.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub pointer: Option<String>,
	/// Query parameter that caused the error.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub parameter: Option<String>,
}

/// A JSON:API error object.
///
/// # Examples
///
/// ```
/// use reinhardt_jsonapi_core::ErrorObject;
///
/// let error = ErrorObject::new()
///     .with_status(422)
///     .with_title("Invalid attribute")
///     .with_pointer("/data/attributes/total");
///
/// assert_eq!(error.status.as_deref(), Some("422"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ErrorObject {
	/// Unique identifier of this occurrence.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub id: Option<String>,
	/// HTTP status code, as a string.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub status: Option<String>,
	/// Application specific error code.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub code: Option<String>,
	/// Short summary of the problem.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub title: Option<String>,
	/// Explanation specific to this occurrence.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub detail: Option<String>,
	/// Source of the error in the request.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub source: Option<ErrorSource>,
	/// Non-standard meta information.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub meta: Option<Map<String, Value>>,
}

impl ErrorObject {
	/// Create an empty error object.
	pub fn new() -> Self {
		Self::default()
	}

	/// Set the occurrence id.
	pub fn with_id(mut self, id: impl Into<String>) -> Self {
		self.id = Some(id.into());
		self
	}

	/// Set the HTTP status code.
	pub fn with_status(mut self, status: u16) -> Self {
		self.status = Some(status.to_string());
		self
	}

	/// Set the application error code.
	pub fn with_code(mut self, code: impl Into<String>) -> Self {
		self.code = Some(code.into());
		self
	}

	/// Set the title.
	pub fn with_title(mut self, title: impl Into<String>) -> Self {
		self.title = Some(title.into());
		self
	}

	/// Set the detail.
	pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
		self.detail = Some(detail.into());
		self
	}

	/// Point at a member of the request document.
	pub fn with_pointer(mut self, pointer: impl Into<String>) -> Self {
		self.source.get_or_insert_with(ErrorSource::default).pointer = Some(pointer.into());
		self
	}

	/// Point at a query parameter.
	pub fn with_parameter(mut self, parameter: impl Into<String>) -> Self {
		self.source.get_or_insert_with(ErrorSource::default).parameter = Some(parameter.into());
		self
	}

	/// Add a meta entry.
	pub fn with_meta(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
		self.meta
			.get_or_insert_with(Map::new)
			.insert(key.into(), value.into());
		self
	}
}

/// One element of a render payload.
#[derive(Debug, Clone, PartialEq)]
pub enum Item {
	/// A record.
	Resource(Resource),
	/// An error object.
	Error(ErrorObject),
}

impl Item {
	/// Kind name used in diagnostics.
	pub fn kind(&self) -> &'static str {
		match self {
			Item::Resource(_) => "resource",
			Item::Error(_) => "error",
		}
	}
}

impl From<Resource> for Item {
	fn from(resource: Resource) -> Self {
		Item::Resource(resource)
	}
}

impl From<ErrorObject> for Item {
	fn from(error: ErrorObject) -> Self {
		Item::Error(error)
	}
}

/// Everything a renderer accepts: nothing, one item, or a sequence of items.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
	/// An absent record.
	Null,
	/// A single record or error.
	One(Item),
	/// A sequence of records or errors.
	Many(Vec<Item>),
}

impl Payload {
	/// Build a sequence payload from anything convertible to items.
	pub fn many<I, T>(items: I) -> Self
	where
		I: IntoIterator<Item = T>,
		T: Into<Item>,
	{
		Payload::Many(items.into_iter().map(Into::into).collect())
	}

	/// First item of the payload.
	pub fn first(&self) -> Option<&Item> {
		match self {
			Payload::Null => None,
			Payload::One(item) => Some(item),
			Payload::Many(items) => items.first(),
		}
	}
}

impl From<Resource> for Payload {
	fn from(resource: Resource) -> Self {
		Payload::One(Item::Resource(resource))
	}
}

impl From<ErrorObject> for Payload {
	fn from(error: ErrorObject) -> Self {
		Payload::One(Item::Error(error))
	}
}

impl From<Option<Resource>> for Payload {
	fn from(resource: Option<Resource>) -> Self {
		resource.map_or(Payload::Null, Payload::from)
	}
}

impl From<Vec<Resource>> for Payload {
	fn from(resources: Vec<Resource>) -> Self {
		Payload::many(resources)
	}
}

impl From<Vec<ErrorObject>> for Payload {
	fn from(errors: Vec<ErrorObject>) -> Self {
		Payload::many(errors)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;
	use serde_json::json;

	#[rstest]
	fn test_with_related_replaces_existing_association() {
		let order = Resource::new("Order")
			.with_null("customer")
			.with_one("customer", Resource::new("Customer").with_id(1));

		assert_eq!(order.associations().count(), 1);
		assert!(matches!(order.association("customer"), Some(Related::One(_))));
	}

	#[rstest]
	fn test_related_records() {
		let many = Related::Many(vec![Resource::new("Tag"), Resource::new("Tag")]);
		assert_eq!(many.records().len(), 2);
		assert!(Related::Null.records().is_empty());
	}

	#[rstest]
	fn test_error_object_serialization_skips_empty_members() {
		let error = ErrorObject::new()
			.with_status(404)
			.with_title("Not found")
			.with_parameter("id");

		assert_eq!(
			serde_json::to_value(&error).unwrap(),
			json!({
				"status": "404",
				"title": "Not found",
				"source": { "parameter": "id" }
			})
		);
	}

	#[rstest]
	fn test_payload_conversions() {
		assert_eq!(Payload::from(None::<Resource>), Payload::Null);
		assert!(matches!(
			Payload::from(vec![ErrorObject::new()]).first(),
			Some(Item::Error(_))
		));
		assert_eq!(Payload::from(Vec::<Resource>::new()).first(), None);
	}
}
