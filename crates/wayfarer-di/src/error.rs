//! Error types for dependency resolution

/// Errors raised while registering or resolving dependencies.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DiError {
	/// A registration already exists under this name
	#[error("Already registered dependency: \"{0}\"")]
	AlreadyRegistered(String),

	/// No registration exists under this name
	#[error("Cannot resolve dependency \"{0}\"")]
	NotRegistered(String),

	/// Circular dependency detected
	#[error(
		"Circular dependency detected: {name}\n  Path: {path}\nThis forms a cycle that cannot be resolved."
	)]
	CircularDependency {
		/// Name that was re-entered
		name: String,
		/// Circular path (format: a -> b -> c -> a)
		path: String,
	},

	/// Maximum resolution depth exceeded
	#[error(
		"Maximum resolution depth exceeded: {0}\nThis likely indicates an extremely deep dependency chain."
	)]
	MaxDepthExceeded(usize),

	/// A resolved value is not of the requested type
	#[error("Dependency \"{name}\" is not of type {expected}")]
	TypeMismatch {
		/// Name of the dependency
		name: String,
		/// Requested type name
		expected: &'static str,
	},

	/// A dependency index was requested that the provider never declared
	#[error("No dependency at position {index} (provider declared {declared})")]
	MissingArgument {
		/// Requested position
		index: usize,
		/// Number of declared dependencies
		declared: usize,
	},

	/// The provider itself failed to build the value
	#[error("Failed to construct \"{name}\": {message}")]
	Construction {
		/// Name (or type name) being constructed
		name: String,
		/// Failure description
		message: String,
	},
}

impl DiError {
	/// Creates a construction error for use inside provider factories.
	pub fn construction(name: impl Into<String>, message: impl std::fmt::Display) -> Self {
		Self::Construction {
			name: name.into(),
			message: message.to_string(),
		}
	}
}

/// Result alias used throughout the container.
pub type DiResult<T> = Result<T, DiError>;
