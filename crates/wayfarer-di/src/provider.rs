//! Providers and their explicit dependency descriptors

use crate::error::{DiError, DiResult};
use std::any::{Any, type_name};
use std::fmt;
use std::sync::Arc;

/// A resolved, type-erased value handed out by the container.
pub type Instance = Arc<dyn Any + Send + Sync>;

type FactoryFn = dyn Fn(&Dependencies) -> DiResult<Instance> + Send + Sync;

/// Resolved dependencies, in the order the provider declared them.
#[derive(Clone, Default)]
pub struct Dependencies {
	entries: Vec<(String, Instance)>,
}

impl Dependencies {
	/// Creates an empty dependency list.
	pub fn new() -> Self {
		Self::default()
	}

	pub(crate) fn push(&mut self, name: impl Into<String>, instance: Instance) {
		self.entries.push((name.into(), instance));
	}

	/// Number of resolved dependencies.
	pub fn len(&self) -> usize {
		self.entries.len()
	}

	/// Returns `true` when nothing was declared.
	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	/// Dependency names in declaration order.
	pub fn names(&self) -> impl Iterator<Item = &str> {
		self.entries.iter().map(|(name, _)| name.as_str())
	}

	/// Untyped access by position.
	pub fn raw(&self, index: usize) -> Option<&Instance> {
		self.entries.get(index).map(|(_, instance)| instance)
	}

	/// Typed access by position.
	///
	/// # Errors
	///
	/// [`DiError::MissingArgument`] when `index` is out of range and
	/// [`DiError::TypeMismatch`] when the value is not a `T`.
	pub fn get<T: Any + Send + Sync>(&self, index: usize) -> DiResult<Arc<T>> {
		let (name, instance) = self
			.entries
			.get(index)
			.ok_or(DiError::MissingArgument {
				index,
				declared: self.entries.len(),
			})?;
		downcast(name, instance)
	}

	/// Typed access by dependency name.
	pub fn by_name<T: Any + Send + Sync>(&self, name: &str) -> DiResult<Arc<T>> {
		let (name, instance) = self
			.entries
			.iter()
			.find(|(entry, _)| entry == name)
			.ok_or_else(|| DiError::NotRegistered(name.to_string()))?;
		downcast(name, instance)
	}

	/// Iterates over `(name, instance)` pairs in declaration order.
	pub fn iter(&self) -> impl Iterator<Item = (&str, &Instance)> {
		self.entries
			.iter()
			.map(|(name, instance)| (name.as_str(), instance))
	}
}

impl<S: Into<String>> FromIterator<(S, Instance)> for Dependencies {
	fn from_iter<I: IntoIterator<Item = (S, Instance)>>(iter: I) -> Self {
		Self {
			entries: iter
				.into_iter()
				.map(|(name, instance)| (name.into(), instance))
				.collect(),
		}
	}
}

impl fmt::Debug for Dependencies {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_list().entries(self.names()).finish()
	}
}

pub(crate) fn downcast<T: Any + Send + Sync>(name: &str, instance: &Instance) -> DiResult<Arc<T>> {
	Arc::clone(instance)
		.downcast::<T>()
		.map_err(|_| DiError::TypeMismatch {
			name: name.to_string(),
			expected: type_name::<T>(),
		})
}

/// Types that can be built by the container from declared dependencies.
///
/// The dependency list is part of the type's contract, so the container
/// never has to guess what a constructor needs.
///
/// # Example
///
/// ```rust
/// use std::sync::Arc;
/// use wayfarer_di::{Dependencies, DiResult, Injectable};
///
/// struct Session;
///
/// struct Dashboard {
///     session: Arc<Session>,
/// }
///
/// impl Injectable for Dashboard {
///     const DEPENDENCIES: &'static [&'static str] = &["session"];
///
///     fn construct(deps: &Dependencies) -> DiResult<Self> {
///         Ok(Self {
///             session: deps.get::<Session>(0)?,
///         })
///     }
/// }
/// ```
pub trait Injectable: Sized + 'static {
	/// Names of the registrations this type consumes, in argument order.
	const DEPENDENCIES: &'static [&'static str] = &[];

	/// Builds the value from its resolved dependencies.
	fn construct(deps: &Dependencies) -> DiResult<Self>;
}

/// A factory paired with the ordered dependency names it consumes.
#[derive(Clone)]
pub struct Provider {
	dependencies: Vec<String>,
	factory: Arc<FactoryFn>,
	type_name: &'static str,
}

impl Provider {
	/// Creates a provider from a closure and an explicit dependency list.
	///
	/// # Examples
	///
	/// ```
	/// use wayfarer_di::Provider;
	///
	/// let provider = Provider::factory(&["clock", "config"], |deps| Ok(deps.len()));
	/// assert_eq!(provider.dependencies(), &["clock", "config"]);
	/// ```
	pub fn factory<T, F>(dependencies: &[&str], factory: F) -> Self
	where
		T: Any + Send + Sync,
		F: Fn(&Dependencies) -> DiResult<T> + Send + Sync + 'static,
	{
		Self {
			dependencies: dependencies.iter().map(|name| name.to_string()).collect(),
			factory: Arc::new(move |deps| factory(deps).map(|value| Arc::new(value) as Instance)),
			type_name: type_name::<T>(),
		}
	}

	/// Creates a provider from an [`Injectable`] type.
	pub fn constructor<T>() -> Self
	where
		T: Injectable + Send + Sync,
	{
		Self::factory(T::DEPENDENCIES, T::construct)
	}

	/// Creates a provider that always hands out the same pre-built value.
	pub fn value<T: Any + Send + Sync>(value: Arc<T>) -> Self {
		let instance: Instance = value;
		Self {
			dependencies: Vec::new(),
			factory: Arc::new(move |_| Ok(Arc::clone(&instance))),
			type_name: type_name::<T>(),
		}
	}

	/// Declared dependency names in argument order.
	pub fn dependencies(&self) -> &[String] {
		&self.dependencies
	}

	/// Name of the produced type, for diagnostics.
	pub fn type_name(&self) -> &'static str {
		self.type_name
	}

	pub(crate) fn build(&self, deps: &Dependencies) -> DiResult<Instance> {
		(self.factory)(deps)
	}
}

impl fmt::Debug for Provider {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Provider")
			.field("type_name", &self.type_name)
			.field("dependencies", &self.dependencies)
			.finish()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	struct Widget {
		size: usize,
	}

	impl Injectable for Widget {
		const DEPENDENCIES: &'static [&'static str] = &["size"];

		fn construct(deps: &Dependencies) -> DiResult<Self> {
			Ok(Self {
				size: *deps.get::<usize>(0)?,
			})
		}
	}

	fn deps_with_size(size: usize) -> Dependencies {
		let mut deps = Dependencies::new();
		deps.push("size", Arc::new(size));
		deps
	}

	#[rstest]
	fn test_typed_access_by_index_and_name() {
		// Arrange
		let deps = deps_with_size(7);

		// Act
		let by_index = deps.get::<usize>(0).unwrap();
		let by_name = deps.by_name::<usize>("size").unwrap();

		// Assert
		assert_eq!(*by_index, 7);
		assert!(Arc::ptr_eq(&by_index, &by_name));
	}

	#[rstest]
	fn test_collected_dependencies_keep_order() {
		// Arrange
		let first: Instance = Arc::new(1usize);
		let second: Instance = Arc::new(String::from("two"));
		let pairs = vec![("first", first), ("second", second)];

		// Act
		let deps: Dependencies = pairs.into_iter().collect();

		// Assert
		assert_eq!(deps.names().collect::<Vec<_>>(), ["first", "second"]);
		assert_eq!(*deps.get::<usize>(0).unwrap(), 1);
		assert_eq!(deps.by_name::<String>("second").unwrap().as_str(), "two");
	}

	#[rstest]
	fn test_wrong_type_is_mismatch() {
		let deps = deps_with_size(7);

		let result = deps.get::<String>(0);

		assert!(matches!(result, Err(DiError::TypeMismatch { ref name, .. }) if name == "size"));
	}

	#[rstest]
	fn test_out_of_range_is_missing_argument() {
		let deps = deps_with_size(7);

		let result = deps.get::<usize>(3);

		assert_eq!(
			result.err(),
			Some(DiError::MissingArgument {
				index: 3,
				declared: 1
			})
		);
	}

	#[rstest]
	fn test_constructor_provider_uses_declared_dependencies() {
		// Arrange
		let provider = Provider::constructor::<Widget>();

		// Act
		let instance = provider.build(&deps_with_size(3)).unwrap();

		// Assert
		assert_eq!(provider.dependencies(), &["size".to_string()]);
		assert_eq!(instance.downcast::<Widget>().ok().map(|w| w.size), Some(3));
	}

	#[rstest]
	fn test_value_provider_returns_same_instance() {
		let provider = Provider::value(Arc::new(String::from("shared")));

		let first = provider.build(&Dependencies::new()).unwrap();
		let second = provider.build(&Dependencies::new()).unwrap();

		assert!(Arc::ptr_eq(&first, &second));
	}
}
