//! Settings structures and their sources.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Prefix shared by every environment override.
pub const ENV_PREFIX: &str = "WAYFARER_";

/// Error type for loading and validating settings
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
	#[error("IO error: {0}")]
	Io(#[from] std::io::Error),

	#[error("TOML error: {0}")]
	Toml(#[from] toml::de::Error),

	#[error("Invalid value for {key}: {value:?}")]
	InvalidValue { key: String, value: String },

	#[error("Invalid settings: {0}")]
	Invalid(String),
}

/// Pattern compilation limits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RouterSettings {
	/// Longest accepted route pattern, in bytes.
	pub max_pattern_length: usize,
	/// Most path segments a pattern may have.
	pub max_path_segments: usize,
	/// Size limit for a compiled pattern regex, in bytes.
	pub max_regex_size: usize,
}

impl Default for RouterSettings {
	fn default() -> Self {
		Self {
			max_pattern_length: 1024,
			max_path_segments: 32,
			max_regex_size: 1 << 20,
		}
	}
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverSettings {
	/// Deepest dependency chain the resolver will build.
	pub max_resolution_depth: usize,
}

impl Default for ResolverSettings {
	fn default() -> Self {
		Self {
			max_resolution_depth: 100,
		}
	}
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
	/// Filter directive, e.g. `info` or `wayfarer::router=trace`.
	pub level: String,
	/// Whether log lines include their target.
	pub with_target: bool,
}

impl Default for LoggingSettings {
	fn default() -> Self {
		Self {
			level: "info".to_string(),
			with_target: true,
		}
	}
}

/// All Wayfarer settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
	pub router: RouterSettings,
	pub resolver: ResolverSettings,
	pub logging: LoggingSettings,
}

impl Settings {
	/// Parses settings from TOML text. Missing keys keep their defaults.
	pub fn from_toml_str(text: &str) -> Result<Self, SettingsError> {
		Ok(toml::from_str(text)?)
	}

	/// Reads and parses a TOML file.
	pub fn from_file(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
		let text = fs::read_to_string(path)?;
		Self::from_toml_str(&text)
	}

	/// Builds the full layered configuration: defaults, then `path` if
	/// given, then the process environment. The result is validated.
	pub fn load(path: Option<&Path>) -> Result<Self, SettingsError> {
		let mut settings = match path {
			Some(path) => Self::from_file(path)?,
			None => Self::default(),
		};
		settings.apply_env_from(std::env::vars())?;
		settings.validate()?;
		Ok(settings)
	}

	/// Applies `WAYFARER_*` overrides from `vars`.
	///
	/// Recognised keys:
	///
	/// - `WAYFARER_ROUTER_MAX_PATTERN_LENGTH`
	/// - `WAYFARER_ROUTER_MAX_PATH_SEGMENTS`
	/// - `WAYFARER_ROUTER_MAX_REGEX_SIZE`
	/// - `WAYFARER_RESOLVER_MAX_RESOLUTION_DEPTH`
	/// - `WAYFARER_LOG_LEVEL`
	/// - `WAYFARER_LOG_WITH_TARGET`
	///
	/// Variables without the prefix and unknown keys are ignored.
	pub fn apply_env_from<I, K, V>(&mut self, vars: I) -> Result<(), SettingsError>
	where
		I: IntoIterator<Item = (K, V)>,
		K: AsRef<str>,
		V: AsRef<str>,
	{
		for (key, value) in vars {
			let (key, value) = (key.as_ref(), value.as_ref());
			let Some(name) = key.strip_prefix(ENV_PREFIX) else {
				continue;
			};
			match name {
				"ROUTER_MAX_PATTERN_LENGTH" => self.router.max_pattern_length = parse_number(key, value)?,
				"ROUTER_MAX_PATH_SEGMENTS" => self.router.max_path_segments = parse_number(key, value)?,
				"ROUTER_MAX_REGEX_SIZE" => self.router.max_regex_size = parse_number(key, value)?,
				"RESOLVER_MAX_RESOLUTION_DEPTH" => {
					self.resolver.max_resolution_depth = parse_number(key, value)?
				}
				"LOG_LEVEL" => self.logging.level = value.trim().to_string(),
				"LOG_WITH_TARGET" => self.logging.with_target = parse_bool(key, value)?,
				_ => {}
			}
		}
		Ok(())
	}

	/// Rejects zero limits and an empty log filter.
	pub fn validate(&self) -> Result<(), SettingsError> {
		let limits = [
			("router.max_pattern_length", self.router.max_pattern_length),
			("router.max_path_segments", self.router.max_path_segments),
			("router.max_regex_size", self.router.max_regex_size),
			("resolver.max_resolution_depth", self.resolver.max_resolution_depth),
		];
		if let Some((key, _)) = limits.iter().find(|(_, value)| *value == 0) {
			return Err(SettingsError::Invalid(format!("{} must be greater than zero", key)));
		}
		if self.logging.level.trim().is_empty() {
			return Err(SettingsError::Invalid("logging.level must not be empty".to_string()));
		}
		Ok(())
	}
}

fn parse_number(key: &str, value: &str) -> Result<usize, SettingsError> {
	value.trim().parse().map_err(|_| SettingsError::InvalidValue {
		key: key.to_string(),
		value: value.to_string(),
	})
}

fn parse_bool(key: &str, value: &str) -> Result<bool, SettingsError> {
	match value.trim().to_ascii_lowercase().as_str() {
		"1" | "true" | "yes" | "on" => Ok(true),
		"0" | "false" | "no" | "off" => Ok(false),
		_ => Err(SettingsError::InvalidValue {
			key: key.to_string(),
			value: value.to_string(),
		}),
	}
}
