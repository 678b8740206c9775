//! # Reinhardt Naming
//!
//! Namespace and API version aware naming for Reinhardt types.
//!
//! Views and serializers in a versioned API live under paths such as
//! `API::V1::OrdersController`. This crate derives the names that such an
//! owner needs (module paths for serializer lookup, URL paths, route names and
//! translation keys) and strips those prefixes again.
//!
//! ## Quick Example
//!
//! ```
//! use reinhardt_naming::Namer;
//!
//! let namer = Namer::new("API::V1::OrdersController").with_isolated_namespace("API");
//!
//! assert_eq!(namer.namespaced_path(Some("orders")), "api/v1/orders");
//! assert_eq!(namer.version_path(Some("orders")), "v1/orders");
//! assert_eq!(namer.unversion("v1/orders"), "orders");
//! ```
//!
//! ## Isolated namespace
//!
//! The isolated namespace is a structural segment (for example the mount
//! point of an embedded application) excluded from versioned names. It can be
//! given per [`Namer`] or configured process-wide with
//! [`set_isolated_namespace`], which [`Namespaced::namer`] picks up.

pub mod inflector;
pub mod namer;

pub use namer::{Namer, Namespaced};

use once_cell::sync::Lazy;
use parking_lot::RwLock;

/// Separator between type path segments.
pub const SEPARATOR: &str = "::";

static ISOLATED_NAMESPACE: Lazy<RwLock<Option<String>>> = Lazy::new(|| RwLock::new(None));

/// Configure the process-wide isolated namespace token.
///
/// `None` or an empty token disables isolation.
pub fn set_isolated_namespace(token: Option<impl Into<String>>) {
	let token = token.map(Into::into).filter(|t: &String| !t.is_empty());
	*ISOLATED_NAMESPACE.write() = token;
}

/// Currently configured process-wide isolated namespace token.
pub fn isolated_namespace() -> Option<String> {
	ISOLATED_NAMESPACE.read().clone()
}
