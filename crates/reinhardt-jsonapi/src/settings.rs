//! JSON:API rendering settings
//!
//! Settings can be built in code, loaded from environment variables, or read
//! from a TOML or JSON file. A process-wide copy is kept for code that has no
//! settings value at hand; [`configure`] also forwards the isolated namespace
//! to `reinhardt-naming`.

use once_cell::sync::Lazy;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::SettingsError;
use reinhardt_naming::SEPARATOR;

/// Settings consumed by the JSON:API renderer.
#[non_exhaustive]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JsonApiSettings {
	/// Emit relationship linkage only for explicitly included associations.
	#[serde(default)]
	pub optimize_relationships: bool,

	/// Namespace segment excluded from versioned names (e.g. `API`).
	#[serde(default)]
	pub isolated_namespace: Option<String>,

	/// Value of the top-level `jsonapi.version` member, omitted when unset.
	#[serde(default)]
	pub jsonapi_version: Option<String>,
}

impl JsonApiSettings {
	/// Create settings with defaults.
	pub fn new() -> Self {
		Self::default()
	}

	/// Enable or disable relationship optimization.
	pub fn with_optimize_relationships(mut self, optimize: bool) -> Self {
		self.optimize_relationships = optimize;
		self
	}

	/// Set the isolated namespace token.
	pub fn with_isolated_namespace(mut self, token: impl Into<String>) -> Self {
		self.isolated_namespace = Some(token.into());
		self
	}

	/// Set the advertised JSON:API version.
	pub fn with_jsonapi_version(mut self, version: impl Into<String>) -> Self {
		self.jsonapi_version = Some(version.into());
		self
	}

	/// Validate settings.
	pub fn validate(&self) -> Result<(), SettingsError> {
		if let Some(token) = &self.isolated_namespace {
			if token.split(SEPARATOR).any(|segment| segment.trim().is_empty()) {
				return Err(SettingsError::InvalidValue {
					key: "isolated_namespace".to_string(),
					message: format!("'{}' must consist of non-empty segments", token),
				});
			}
		}
		Ok(())
	}

	/// Load settings from environment variables.
	///
	/// Reads `REINHARDT_JSONAPI_OPTIMIZE_RELATIONSHIPS`,
	/// `REINHARDT_JSONAPI_ISOLATED_NAMESPACE` and `REINHARDT_JSONAPI_VERSION`.
	/// Unparseable booleans are ignored with a warning.
	pub fn from_env() -> Result<Self, SettingsError> {
		let mut settings = Self::default();

		if let Ok(value) = std::env::var("REINHARDT_JSONAPI_OPTIMIZE_RELATIONSHIPS") {
			match parse_bool(&value) {
				Some(optimize) => settings.optimize_relationships = optimize,
				None => tracing::warn!(
					value = %value,
					"Ignoring invalid REINHARDT_JSONAPI_OPTIMIZE_RELATIONSHIPS"
				),
			}
		}

		if let Ok(token) = std::env::var("REINHARDT_JSONAPI_ISOLATED_NAMESPACE") {
			let token = token.trim();
			if !token.is_empty() {
				settings.isolated_namespace = Some(token.to_string());
			}
		}

		if let Ok(version) = std::env::var("REINHARDT_JSONAPI_VERSION") {
			settings.jsonapi_version = Some(version);
		}

		settings.validate()?;
		Ok(settings)
	}

	/// Parse settings from a TOML document.
	pub fn from_toml_str(contents: &str) -> Result<Self, SettingsError> {
		let settings: JsonApiSettings = toml::from_str(contents)
			.map_err(|e| SettingsError::ParseError(format!("TOML parse error: {}", e)))?;
		settings.validate()?;
		Ok(settings)
	}

	/// Load settings from a `.toml` or `.json` file.
	pub fn from_file(path: impl Into<PathBuf>) -> Result<Self, SettingsError> {
		let path = path.into();
		let contents = std::fs::read_to_string(&path).map_err(|e| {
			SettingsError::FileError(format!("Failed to read {}: {}", path.display(), e))
		})?;

		match path.extension().and_then(|s| s.to_str()) {
			Some("toml") => Self::from_toml_str(&contents),
			Some("json") => {
				let settings: JsonApiSettings = serde_json::from_str(&contents)
					.map_err(|e| SettingsError::ParseError(format!("JSON parse error: {}", e)))?;
				settings.validate()?;
				Ok(settings)
			}
			_ => Err(SettingsError::UnsupportedFormat(
				"Supported formats: .toml, .json".to_string(),
			)),
		}
	}
}

fn parse_bool(value: &str) -> Option<bool> {
	match value.trim().to_lowercase().as_str() {
		"true" | "1" | "yes" | "on" => Some(true),
		"false" | "0" | "no" | "off" => Some(false),
		_ => None,
	}
}

static SETTINGS: Lazy<RwLock<JsonApiSettings>> =
	Lazy::new(|| RwLock::new(JsonApiSettings::default()));

/// Snapshot of the process-wide settings.
pub fn settings() -> JsonApiSettings {
	SETTINGS.read().clone()
}

/// Replace the process-wide settings.
pub fn configure(settings: JsonApiSettings) {
	reinhardt_naming::set_isolated_namespace(settings.isolated_namespace.clone());
	*SETTINGS.write() = settings;
}
