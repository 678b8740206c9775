//! Namespaced and versioned names derived from an owner type path
//!
//! A [`Namer`] is built from the fully qualified path of the type that asks
//! for names (usually a view or controller such as `API::V1::OrdersController`).
//! The enclosing namespace of that path (`API::V1`) prefixes every name it
//! produces. When an isolated namespace is configured (for example `API`, the
//! segment an application is mounted under), the versioned forms drop it so
//! that only the version segment remains (`V1`).

use crate::inflector::{deconstantize, underscore};
use crate::{SEPARATOR, isolated_namespace};

/// Computes module paths, URL paths, route names and translation keys for an owner type.
///
/// # Examples
///
/// ```
/// use reinhardt_naming::Namer;
///
/// let namer = Namer::new("API::V1::OrdersController").with_isolated_namespace("API");
///
/// assert_eq!(namer.namespaced_module(Some("OrderSerializer")), "API::V1::OrderSerializer");
/// assert_eq!(namer.version_module(Some("OrderSerializer")), "V1::OrderSerializer");
/// assert_eq!(namer.version_path(Some("orders")), "v1/orders");
/// assert_eq!(namer.namespaced_dot_path(Some("orders")), "api.v1.orders");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Namer {
	owner: String,
	isolated_namespace: Option<String>,
}

impl Namer {
	/// Create a namer for the given owner type path without an isolated namespace.
	pub fn new(owner: impl Into<String>) -> Self {
		Self {
			owner: owner.into(),
			isolated_namespace: None,
		}
	}

	/// Create a namer using the process-wide isolated namespace.
	pub fn with_global_config(owner: impl Into<String>) -> Self {
		let namer = Self::new(owner);
		match isolated_namespace() {
			Some(token) => namer.with_isolated_namespace(token),
			None => namer,
		}
	}

	/// Set the isolated namespace token. An empty token disables isolation.
	///
	/// The token is one or more whole segments (`API`, `Shop::API`).
	pub fn with_isolated_namespace(mut self, token: impl Into<String>) -> Self {
		let token = token.into();
		self.isolated_namespace = if token.is_empty() { None } else { Some(token) };
		self
	}

	/// The owner type path this namer derives names from.
	pub fn owner(&self) -> &str {
		&self.owner
	}

	/// The configured isolated namespace token, if any.
	pub fn isolated_namespace(&self) -> Option<&str> {
		self.isolated_namespace.as_deref()
	}

	/// Enclosing namespace of the owner; empty for top-level owners.
	pub fn namespace(&self) -> &str {
		deconstantize(&self.owner)
	}

	/// Module path for `suffix` inside the owner's namespace.
	///
	/// `None` or an empty suffix describes the namespace itself. A suffix that
	/// already lives in the namespace is returned unchanged.
	pub fn namespaced_module(&self, suffix: Option<&str>) -> String {
		join_module(self.namespace(), suffix)
	}

	/// Slash separated, lower-cased form of [`Namer::namespaced_module`].
	pub fn namespaced_path(&self, suffix: Option<&str>) -> String {
		underscore(&self.namespaced_module(suffix))
	}

	/// Underscore separated form, used for route and action names.
	pub fn namespaced_name(&self, suffix: Option<&str>) -> String {
		self.namespaced_path(suffix).replace('/', "_")
	}

	/// Dot separated form, used for translation keys.
	pub fn namespaced_dot_path(&self, suffix: Option<&str>) -> String {
		self.namespaced_path(suffix).replace('/', ".")
	}

	/// Remove the namespace prefix from `value`.
	///
	/// The module, path, name and dot path prefixes are tried in that order,
	/// each followed by its own separator. Input without any of them is
	/// returned unchanged. Running this twice over overlapping prefixes is
	/// not supported.
	///
	/// # Examples
	///
	/// ```
	/// use reinhardt_naming::Namer;
	///
	/// let namer = Namer::new("API::V1::OrdersController");
	/// assert_eq!(namer.unnamespace("api/v1/orders"), "orders");
	/// assert_eq!(namer.unnamespace("API::V1::OrderSerializer"), "OrderSerializer");
	/// assert_eq!(namer.unnamespace("admin/orders"), "admin/orders");
	/// ```
	pub fn unnamespace(&self, value: &str) -> String {
		strip_prefixes(
			value,
			[
				(self.namespaced_module(None), SEPARATOR),
				(self.namespaced_path(None), "/"),
				(self.namespaced_name(None), "_"),
				(self.namespaced_dot_path(None), "."),
			],
		)
	}

	/// [`Namer::namespaced_module`] with the isolated namespace segment removed.
	///
	/// Only whole segments equal to the token, followed by a separator, are
	/// removed, and only their first occurrence. A token such as `Shop::API`
	/// matches a contiguous run of segments.
	pub fn version_module(&self, suffix: Option<&str>) -> String {
		let module = self.namespaced_module(suffix);
		match self.isolated_namespace() {
			Some(token) => remove_segments(&module, token),
			None => module,
		}
	}

	/// Slash separated, lower-cased form of [`Namer::version_module`].
	pub fn version_path(&self, suffix: Option<&str>) -> String {
		underscore(&self.version_module(suffix))
	}

	/// Underscore separated form of [`Namer::version_path`].
	pub fn version_name(&self, suffix: Option<&str>) -> String {
		self.version_path(suffix).replace('/', "_")
	}

	/// Dot separated form of [`Namer::version_path`].
	pub fn version_dot_path(&self, suffix: Option<&str>) -> String {
		self.version_path(suffix).replace('/', ".")
	}

	/// Remove the version prefix from `value`, analogous to [`Namer::unnamespace`].
	pub fn unversion(&self, value: &str) -> String {
		strip_prefixes(
			value,
			[
				(self.version_module(None), SEPARATOR),
				(self.version_path(None), "/"),
				(self.version_name(None), "_"),
				(self.version_dot_path(None), "."),
			],
		)
	}
}

fn join_module(namespace: &str, suffix: Option<&str>) -> String {
	let Some(suffix) = suffix.filter(|s| !s.is_empty()) else {
		return namespace.to_string();
	};

	let already_prefixed =
		suffix == namespace || suffix.starts_with(&format!("{}{}", namespace, SEPARATOR));
	if namespace.is_empty() || already_prefixed {
		suffix.to_string()
	} else {
		format!("{}{}{}", namespace, SEPARATOR, suffix)
	}
}

fn remove_segments(module: &str, token: &str) -> String {
	let mut segments: Vec<&str> = module.split(SEPARATOR).collect();
	let run: Vec<&str> = token.split(SEPARATOR).collect();
	// The last segment has no trailing separator and is never removed.
	let candidates = segments.len().saturating_sub(1);
	if run.len() <= candidates
		&& let Some(pos) = segments[..candidates]
			.windows(run.len())
			.position(|window| window == run.as_slice())
	{
		segments.drain(pos..pos + run.len());
	}
	segments.join(SEPARATOR)
}

fn strip_prefixes(value: &str, forms: [(String, &str); 4]) -> String {
	let mut result = value.to_string();
	for (prefix, separator) in forms {
		if prefix.is_empty() {
			continue;
		}
		if result == prefix {
			result.clear();
			continue;
		}
		if let Some(rest) = result.strip_prefix(&format!("{}{}", prefix, separator)) {
			result = rest.to_string();
		}
	}
	result
}

/// Types that know their fully qualified path and can derive names from it.
///
/// # Examples
///
/// ```
/// use reinhardt_naming::Namespaced;
///
/// struct OrdersController;
///
/// impl Namespaced for OrdersController {
///     const TYPE_PATH: &'static str = "Store::V2::OrdersController";
/// }
///
/// assert_eq!(OrdersController::namer().namespaced_path(Some("orders")), "store/v2/orders");
/// ```
pub trait Namespaced {
	/// Fully qualified path, segments separated by `::`.
	const TYPE_PATH: &'static str;

	/// Namer for this type using the process-wide isolated namespace.
	fn namer() -> Namer {
		Namer::with_global_config(Self::TYPE_PATH)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::{fixture, rstest};

	#[fixture]
	fn namer() -> Namer {
		Namer::new("API::V1::OrdersController").with_isolated_namespace("API")
	}

	#[rstest]
	fn test_namespace_of_owner(namer: Namer) {
		assert_eq!(namer.namespace(), "API::V1");
	}

	#[rstest]
	#[case(None, "API::V1")]
	#[case(Some(""), "API::V1")]
	#[case(Some("OrderSerializer"), "API::V1::OrderSerializer")]
	#[case(Some("API::V1::OrderSerializer"), "API::V1::OrderSerializer")]
	#[case(Some("API::V10::OrderSerializer"), "API::V1::API::V10::OrderSerializer")]
	fn test_namespaced_module(namer: Namer, #[case] suffix: Option<&str>, #[case] expected: &str) {
		assert_eq!(namer.namespaced_module(suffix), expected);
	}

	#[rstest]
	fn test_namespaced_forms(namer: Namer) {
		assert_eq!(namer.namespaced_path(Some("orders")), "api/v1/orders");
		assert_eq!(namer.namespaced_name(Some("orders")), "api_v1_orders");
		assert_eq!(namer.namespaced_dot_path(Some("orders")), "api.v1.orders");
	}

	#[rstest]
	fn test_versioned_forms(namer: Namer) {
		assert_eq!(namer.version_module(None), "V1");
		assert_eq!(namer.version_path(Some("orders")), "v1/orders");
		assert_eq!(namer.version_name(Some("orders")), "v1_orders");
		assert_eq!(namer.version_dot_path(Some("orders")), "v1.orders");
	}

	#[rstest]
	#[case("Shop::API::V1::OrdersController", "Shop::API", None, "V1")]
	#[case("Shop::API::V1::OrdersController", "Shop::API", Some("OrderSerializer"), "V1::OrderSerializer")]
	#[case("Shop::API::V1::OrdersController", "Shop::V1", None, "Shop::API::V1")]
	#[case("API::V1::OrdersController", "API::V1", None, "API::V1")]
	#[case("API::V1::OrdersController", "API::V1", Some("OrderSerializer"), "OrderSerializer")]
	fn test_multi_segment_isolated_namespace(
		#[case] owner: &str,
		#[case] token: &str,
		#[case] suffix: Option<&str>,
		#[case] expected: &str,
	) {
		let namer = Namer::new(owner).with_isolated_namespace(token);
		assert_eq!(namer.version_module(suffix), expected);
	}

	#[rstest]
	fn test_top_level_owner_has_empty_namespace() {
		let namer = Namer::new("OrdersController").with_isolated_namespace("API");
		assert_eq!(namer.namespace(), "");
		assert_eq!(namer.namespaced_module(None), "");
		assert_eq!(namer.namespaced_module(Some("OrderSerializer")), "OrderSerializer");
		assert_eq!(namer.unnamespace("orders"), "orders");
	}

	#[rstest]
	fn test_isolated_token_must_match_whole_segment() {
		let namer = Namer::new("MyAPI::V1::OrdersController").with_isolated_namespace("API");
		assert_eq!(namer.version_module(None), "MyAPI::V1");
	}

	#[rstest]
	fn test_trailing_isolated_segment_is_kept() {
		let namer = Namer::new("API::OrdersController").with_isolated_namespace("API");
		assert_eq!(namer.version_module(None), "API");
		assert_eq!(namer.version_module(Some("OrderSerializer")), "OrderSerializer");
	}

	#[rstest]
	fn test_empty_isolated_namespace_is_ignored() {
		let namer = Namer::new("API::V1::OrdersController").with_isolated_namespace("");
		assert_eq!(namer.isolated_namespace(), None);
		assert_eq!(namer.version_module(None), "API::V1");
	}

	#[rstest]
	#[case("API::V1::OrderSerializer", "OrderSerializer")]
	#[case("api/v1/orders", "orders")]
	#[case("api_v1_orders", "orders")]
	#[case("api.v1.orders.title", "orders.title")]
	#[case("api/v1", "")]
	#[case("v2/orders", "v2/orders")]
	fn test_unnamespace(namer: Namer, #[case] input: &str, #[case] expected: &str) {
		assert_eq!(namer.unnamespace(input), expected);
	}

	#[rstest]
	#[case("V1::OrderSerializer", "OrderSerializer")]
	#[case("v1/orders", "orders")]
	#[case("v1_orders_index", "orders_index")]
	#[case("v1.orders", "orders")]
	#[case("api/v1/orders", "api/v1/orders")]
	fn test_unversion(namer: Namer, #[case] input: &str, #[case] expected: &str) {
		assert_eq!(namer.unversion(input), expected);
	}
}
