//! String inflections for type paths
//!
//! Converts `::`-delimited type paths such as `API::V1::OrdersController`
//! into the lower-cased forms used for URL paths, route names and JSON:API
//! resource types.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::SEPARATOR;

static ACRONYM_BOUNDARY: Lazy<Regex> =
	Lazy::new(|| Regex::new(r"([A-Z\d]+)([A-Z][a-z])").expect("acronym boundary pattern"));

static WORD_BOUNDARY: Lazy<Regex> =
	Lazy::new(|| Regex::new(r"([a-z\d])([A-Z])").expect("word boundary pattern"));

/// Convert a CamelCase type path into its snake_case path form.
///
/// `::` becomes `/`, acronym runs stay together and dashes become underscores.
///
/// # Examples
///
/// ```
/// use reinhardt_naming::inflector::underscore;
///
/// assert_eq!(underscore("API::V1::OrdersController"), "api/v1/orders_controller");
/// assert_eq!(underscore("APIKey"), "api_key");
/// assert_eq!(underscore("orders"), "orders");
/// ```
pub fn underscore(word: &str) -> String {
	let word = word.replace(SEPARATOR, "/");
	let word = ACRONYM_BOUNDARY.replace_all(&word, "${1}_${2}");
	let word = WORD_BOUNDARY.replace_all(&word, "${1}_${2}");
	word.replace('-', "_").to_lowercase()
}

/// Last segment of a type path.
///
/// # Examples
///
/// ```
/// use reinhardt_naming::inflector::demodulize;
///
/// assert_eq!(demodulize("Shop::Order"), "Order");
/// assert_eq!(demodulize("Order"), "Order");
/// ```
pub fn demodulize(path: &str) -> &str {
	match path.rfind(SEPARATOR) {
		Some(idx) => &path[idx + SEPARATOR.len()..],
		None => path,
	}
}

/// Everything before the last segment of a type path.
///
/// Top-level names have no enclosing namespace and yield an empty string.
///
/// # Examples
///
/// ```
/// use reinhardt_naming::inflector::deconstantize;
///
/// assert_eq!(deconstantize("API::V1::OrdersController"), "API::V1");
/// assert_eq!(deconstantize("OrdersController"), "");
/// ```
pub fn deconstantize(path: &str) -> &str {
	match path.rfind(SEPARATOR) {
		Some(idx) => &path[..idx],
		None => "",
	}
}

/// Pluralize a lower-cased English word using the regular rules only.
pub fn pluralize(word: &str) -> String {
	if word.is_empty() {
		return String::new();
	}

	if let Some(stem) = word.strip_suffix('y') {
		let vowel_before = stem
			.chars()
			.last()
			.is_some_and(|c| matches!(c, 'a' | 'e' | 'i' | 'o' | 'u'));
		if !stem.is_empty() && !vowel_before {
			return format!("{}ies", stem);
		}
	}

	let sibilant = ["s", "x", "z", "ch", "sh"]
		.iter()
		.any(|ending| word.ends_with(ending));
	if sibilant {
		format!("{}es", word)
	} else {
		format!("{}s", word)
	}
}

/// Plural, underscored name of a type path, used as the default JSON:API `type`.
///
/// # Examples
///
/// ```
/// use reinhardt_naming::inflector::plural_name;
///
/// assert_eq!(plural_name("Order"), "orders");
/// assert_eq!(plural_name("Shop::LineItem"), "shop_line_items");
/// assert_eq!(plural_name("Category"), "categories");
/// ```
pub fn plural_name(path: &str) -> String {
	pluralize(&underscore(path).replace('/', "_"))
}
