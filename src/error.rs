//! Top-level error type for the facade.

use wayfarer_conf::SettingsError;
use wayfarer_controllers::ControllerError;
use wayfarer_urls::RouterError;

/// Any failure surfaced by [`Application`](crate::Application).
#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error(transparent)]
	Settings(#[from] SettingsError),

	#[error(transparent)]
	Router(#[from] RouterError),

	#[error(transparent)]
	Controller(#[from] ControllerError),

	#[cfg(feature = "logging")]
	#[error("Invalid log filter {directive:?}: {reason}")]
	Logging { directive: String, reason: String },
}

pub type Result<T> = std::result::Result<T, Error>;
