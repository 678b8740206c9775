//! Error types for JSON:API rendering.

use thiserror::Error;

use crate::renderer::Adapter;

/// Errors that abort a render.
///
/// Serializer lookup misses are not errors; they fall back to the default
/// serializer instead.
#[derive(Debug, Error)]
pub enum RenderError {
	/// An item does not match the serializer chosen for it.
	#[error("Cannot render {found} item with the {expected} serializer")]
	UnexpectedItem {
		/// Kind of serializer that was selected.
		expected: &'static str,
		/// Kind of item that was encountered.
		found: &'static str,
	},

	/// The render primitive was asked for an adapter it does not implement.
	#[error("Unsupported adapter: {0:?}")]
	UnsupportedAdapter(Adapter),

	/// A deferred meta computation failed.
	#[error("Meta evaluation failed for '{association}': {message}")]
	Meta {
		/// Association whose meta was being evaluated.
		association: String,
		/// Failure reported by the computation.
		message: String,
	},

	/// JSON conversion failed.
	#[error("JSON error: {0}")]
	Json(#[from] serde_json::Error),
}

impl RenderError {
	/// Failure of a deferred meta computation.
	pub fn meta(association: impl Into<String>, message: impl Into<String>) -> Self {
		Self::Meta {
			association: association.into(),
			message: message.into(),
		}
	}
}

/// Result type alias for rendering operations.
pub type RenderResult<T> = Result<T, RenderError>;

/// Errors raised while loading [`JsonApiSettings`](crate::settings::JsonApiSettings).
#[derive(Debug, Error)]
pub enum SettingsError {
	/// The settings file could not be read.
	#[error("File error: {0}")]
	FileError(String),

	/// The settings document could not be parsed.
	#[error("Parse error: {0}")]
	ParseError(String),

	/// The settings file has an extension we cannot load.
	#[error("Unsupported format: {0}")]
	UnsupportedFormat(String),

	/// A setting holds a value that cannot be used.
	#[error("Invalid value for {key}: {message}")]
	InvalidValue {
		/// Setting name.
		key: String,
		/// Why the value was rejected.
		message: String,
	},
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	fn test_unexpected_item_message() {
		let err = RenderError::UnexpectedItem {
			expected: "error",
			found: "resource",
		};
		assert_eq!(err.to_string(), "Cannot render resource item with the error serializer");
	}

	#[rstest]
	fn test_meta_error_names_association() {
		let err = RenderError::meta("customer", "missing total");
		assert_eq!(
			err.to_string(),
			"Meta evaluation failed for 'customer': missing total"
		);
	}
}
