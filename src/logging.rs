//! `tracing-subscriber` setup driven by [`LoggingSettings`].

use crate::error::{Error, Result};
use tracing_subscriber::EnvFilter;
use wayfarer_conf::LoggingSettings;

/// Installs a global `fmt` subscriber filtered by `settings.level`.
///
/// Returns `Ok(false)` when a global subscriber is already set, so calling it
/// more than once is harmless.
///
/// # Errors
///
/// [`Error::Logging`] if the level is not a valid filter directive.
pub fn init(settings: &LoggingSettings) -> Result<bool> {
	let filter = EnvFilter::try_new(&settings.level).map_err(|e| Error::Logging {
		directive: settings.level.clone(),
		reason: e.to_string(),
	})?;

	let installed = tracing_subscriber::fmt()
		.with_env_filter(filter)
		.with_target(settings.with_target)
		.try_init()
		.is_ok();
	if installed {
		tracing::debug!(target: "wayfarer", level = %settings.level, "logging initialised");
	}
	Ok(installed)
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	fn test_init_is_idempotent() {
		// Arrange
		let settings = LoggingSettings {
			level: "wayfarer=debug".to_string(),
			with_target: false,
		};

		// Act
		let _ = init(&settings).unwrap();
		let second = init(&settings).unwrap();

		// Assert
		assert!(!second);
	}

	#[rstest]
	fn test_bad_level_is_rejected() {
		let settings = LoggingSettings {
			level: "wayfarer=loudest".to_string(),
			with_target: true,
		};

		let result = init(&settings);

		assert!(matches!(
			result,
			Err(Error::Logging { ref directive, .. }) if directive == "wayfarer=loudest"
		));
	}
}
