//! Error types for routing.

use wayfarer_di::DiError;

/// Errors raised while registering routes, dispatching or reversing URIs.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RouterError {
	/// The pattern could not be compiled.
	#[error("Invalid route pattern \"{pattern}\": {reason}")]
	InvalidPattern {
		/// The offending pattern.
		pattern: String,
		/// Why it was rejected.
		reason: String,
	},

	/// A route with an identical pattern is already registered.
	#[error("Duplicate route pattern: {0}")]
	DuplicatePattern(String),

	/// A where condition was already set for this parameter.
	#[error("Duplicate where condition for parameter: {0}")]
	DuplicateWhere(String),

	/// A default was already set for this parameter.
	#[error("Duplicate default for parameter: {0}")]
	DuplicateDefault(String),

	/// The route already carries a name.
	#[error("Route name already set: {0}")]
	NameAlreadySet(String),

	/// A where condition or default names a parameter the pattern lacks.
	#[error("Unknown parameter \"{param}\" for pattern \"{pattern}\"")]
	UnknownParameter {
		/// Parameter that was referenced.
		param: String,
		/// Pattern of the route.
		pattern: String,
	},

	/// A value failed its where condition during URI generation.
	#[error("Unmet where condition for parameter {param}: \"{value}\"")]
	UnmetCondition {
		/// Parameter being validated.
		param: String,
		/// Rejected value.
		value: String,
	},

	/// A required parameter had neither a value nor a default.
	#[error("Missing parameter: {0}")]
	MissingParameter(String),

	/// A value cannot be substituted into its placeholder.
	#[error("Invalid value for parameter {param}: \"{value}\"")]
	InvalidParameterValue {
		/// Parameter being substituted.
		param: String,
		/// Rejected value.
		value: String,
	},

	/// A declared dependency could not be resolved.
	#[error("Dependency resolution failed: {0}")]
	Dependency(#[from] DiError),

	/// Something needs the resolver but the router was built without one.
	#[error("\"{0}\" requires a resolver but the router has none")]
	NoResolver(String),

	/// A handler failed while executing an action.
	#[error("Handler failed: {0}")]
	Handler(String),

	/// A callable action failed.
	#[error("Action failed: {0}")]
	Action(String),
}

impl RouterError {
	pub(crate) fn invalid_pattern(pattern: &str, reason: impl Into<String>) -> Self {
		Self::InvalidPattern {
			pattern: pattern.to_string(),
			reason: reason.into(),
		}
	}
}

/// Result alias for routing operations.
pub type RouterResult<T> = Result<T, RouterError>;
