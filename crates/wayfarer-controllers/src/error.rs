//! Controller errors.

use wayfarer_di::DiError;
use wayfarer_urls::RouterError;

/// Errors raised while registering or executing controllers.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ControllerError {
	/// A default prefix was requested for a type not named `...Controller`.
	#[error("{0} is not a valid controller type name")]
	InvalidControllerName(String),

	/// An action tried to dispatch back into the controller it is running in.
	#[error("Controller manager is busy executing an action")]
	Busy,

	/// The router the manager was attached to has been dropped.
	#[error("Router is no longer available")]
	RouterUnavailable,

	/// Route registration failed.
	#[error(transparent)]
	Router(#[from] RouterError),

	/// The controller could not be constructed.
	#[error(transparent)]
	Dependency(#[from] DiError),
}

impl From<ControllerError> for RouterError {
	fn from(err: ControllerError) -> Self {
		match err {
			ControllerError::Router(err) => err,
			ControllerError::Dependency(err) => RouterError::Dependency(err),
			other => RouterError::Handler(other.to_string()),
		}
	}
}
