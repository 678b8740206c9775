//! Per-request top-level meta

use serde_json::{Map, Value};

/// Top-level `meta` accumulated while handling one request.
///
/// Starts out unallocated and grows through explicit writes. The renderer
/// attaches it to the document only when it holds at least one entry.
///
/// # Examples
///
/// ```
/// use reinhardt_jsonapi_core::RequestMeta;
///
/// let mut meta = RequestMeta::new();
/// assert!(meta.is_empty());
///
/// meta.insert("redirect_url", "/v1/orders/42");
/// assert_eq!(meta.get("redirect_url").unwrap(), "/v1/orders/42");
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequestMeta {
	values: Option<Map<String, Value>>,
}

impl RequestMeta {
	/// An empty accumulator.
	pub fn new() -> Self {
		Self::default()
	}

	/// Set an entry, returning the previous value.
	pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
		self.values_mut().insert(key.into(), value.into())
	}

	/// Remove an entry.
	pub fn remove(&mut self, key: &str) -> Option<Value> {
		self.values.as_mut()?.remove(key)
	}

	/// Read an entry.
	pub fn get(&self, key: &str) -> Option<&Value> {
		self.values.as_ref()?.get(key)
	}

	/// Mutable access to the entries, allocating them on first use.
	pub fn values_mut(&mut self) -> &mut Map<String, Value> {
		self.values.get_or_insert_with(Map::new)
	}

	/// Whether no entry has been written.
	pub fn is_empty(&self) -> bool {
		self.values.as_ref().is_none_or(Map::is_empty)
	}

	/// Entries as a map, `None` when empty.
	pub fn to_map(&self) -> Option<Map<String, Value>> {
		self.values.clone().filter(|values| !values.is_empty())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;
	use serde_json::json;

	#[rstest]
	fn test_starts_unallocated() {
		let meta = RequestMeta::new();
		assert!(meta.is_empty());
		assert_eq!(meta.to_map(), None);
		assert_eq!(meta.get("anything"), None);
	}

	#[rstest]
	fn test_insert_and_remove() {
		let mut meta = RequestMeta::new();
		assert_eq!(meta.insert("page", 1), None);
		assert_eq!(meta.insert("page", 2), Some(json!(1)));
		assert_eq!(meta.to_map().unwrap().len(), 1);

		assert_eq!(meta.remove("page"), Some(json!(2)));
		assert!(meta.is_empty());
		assert_eq!(meta.to_map(), None);
	}

	#[rstest]
	fn test_values_mut_allocates_without_entries() {
		let mut meta = RequestMeta::new();
		meta.values_mut();
		assert!(meta.is_empty());
	}
}
