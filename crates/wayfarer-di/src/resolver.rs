//! The name-keyed container

use crate::cycle_detection::{DEFAULT_MAX_RESOLUTION_DEPTH, ResolutionStack};
use crate::error::{DiError, DiResult};
use crate::provider::{Dependencies, Injectable, Instance, Provider, downcast};
use parking_lot::{Mutex, RwLock};
use std::any::{Any, type_name};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

struct Registration {
	provider: Provider,
	shared: bool,
	instance: Mutex<Option<Instance>>,
}

impl Registration {
	fn cached(&self) -> Option<Instance> {
		if !self.shared {
			return None;
		}
		self.instance.lock().clone()
	}
}

/// Dependency injection container keyed by registration name.
///
/// Registrations are shared through interior locks so a `Resolver` can sit
/// behind an `Arc` and be used from handlers while it is being read. Locks
/// are released before any provider runs, which allows providers to call
/// back into the resolver.
pub struct Resolver {
	registrations: RwLock<HashMap<String, Arc<Registration>>>,
	max_depth: usize,
}

impl Resolver {
	/// Creates an empty resolver with the default depth cap.
	pub fn new() -> Self {
		Self::with_max_depth(DEFAULT_MAX_RESOLUTION_DEPTH)
	}

	/// Creates an empty resolver that rejects chains deeper than `max_depth`.
	pub fn with_max_depth(max_depth: usize) -> Self {
		Self {
			registrations: RwLock::new(HashMap::new()),
			max_depth,
		}
	}

	/// Configured depth cap.
	pub fn max_depth(&self) -> usize {
		self.max_depth
	}

	/// Registers `provider` under `name`.
	///
	/// When `shared` is set, the first built value is cached and handed out
	/// on every later [`make`](Self::make).
	///
	/// # Errors
	///
	/// [`DiError::AlreadyRegistered`] if `name` is taken.
	pub fn register(&self, name: impl Into<String>, provider: Provider, shared: bool) -> DiResult<()> {
		self.insert(name.into(), provider, shared, None)
	}

	/// Registers a shared provider.
	pub fn singleton(&self, name: impl Into<String>, provider: Provider) -> DiResult<()> {
		self.register(name, provider, true)
	}

	/// Registers an already built value as a shared registration.
	pub fn instance<T: Any + Send + Sync>(&self, name: impl Into<String>, value: Arc<T>) -> DiResult<()> {
		let cached: Instance = value.clone();
		self.insert(name.into(), Provider::value(value), true, Some(cached))
	}

	fn insert(
		&self,
		name: String,
		provider: Provider,
		shared: bool,
		cached: Option<Instance>,
	) -> DiResult<()> {
		let mut registrations = self.registrations.write();
		if registrations.contains_key(&name) {
			return Err(DiError::AlreadyRegistered(name));
		}

		tracing::debug!(
			target: "wayfarer::di",
			name = %name,
			type_name = provider.type_name(),
			shared,
			dependencies = ?provider.dependencies(),
			"registered dependency"
		);

		registrations.insert(
			name,
			Arc::new(Registration {
				provider,
				shared,
				instance: Mutex::new(cached),
			}),
		);
		Ok(())
	}

	/// Whether `name` has a registration.
	pub fn is_registered(&self, name: &str) -> bool {
		self.registrations.read().contains_key(name)
	}

	/// Declared dependency names of a registration.
	pub fn dependency_names(&self, name: &str) -> Option<Vec<String>> {
		self.registrations
			.read()
			.get(name)
			.map(|registration| registration.provider.dependencies().to_vec())
	}

	/// Builds (or fetches the cached) value registered under `name`.
	///
	/// # Errors
	///
	/// - [`DiError::NotRegistered`] if `name` or any transitive dependency is
	///   unknown
	/// - [`DiError::CircularDependency`] if the graph loops back on itself
	/// - [`DiError::MaxDepthExceeded`] if the chain is deeper than the cap
	/// - whatever the provider itself returns
	pub fn make(&self, name: &str) -> DiResult<Instance> {
		let mut stack = ResolutionStack::new(self.max_depth);
		self.resolve(name, &mut stack)
	}

	/// Typed variant of [`make`](Self::make).
	pub fn make_as<T: Any + Send + Sync>(&self, name: &str) -> DiResult<Arc<T>> {
		let instance = self.make(name)?;
		downcast(name, &instance)
	}

	/// Builds a `T` whose dependencies are registered, without `T` itself
	/// being registered.
	///
	/// The returned value is always fresh and never cached.
	pub fn make_from_constructor<T: Injectable>(&self) -> DiResult<T> {
		let key = type_name::<T>();
		let mut stack = ResolutionStack::new(self.max_depth);
		stack.enter(key)?;
		let deps = self.resolve_all(T::DEPENDENCIES.iter().copied(), &mut stack);
		stack.exit(key);

		tracing::trace!(target: "wayfarer::di", type_name = key, "constructing unregistered type");
		T::construct(&deps?)
	}

	fn resolve(&self, name: &str, stack: &mut ResolutionStack) -> DiResult<Instance> {
		let registration = self
			.registrations
			.read()
			.get(name)
			.cloned()
			.ok_or_else(|| DiError::NotRegistered(name.to_string()))?;

		if let Some(instance) = registration.cached() {
			tracing::trace!(target: "wayfarer::di", name, "using cached instance");
			return Ok(instance);
		}

		stack.enter(name)?;
		tracing::trace!(target: "wayfarer::di", name, depth = stack.depth(), "resolving");
		let deps = self.resolve_all(
			registration.provider.dependencies().iter().map(String::as_str),
			stack,
		);
		stack.exit(name);

		let built = registration.provider.build(&deps?)?;
		if !registration.shared {
			return Ok(built);
		}

		// Another caller may have finished first while this one was building.
		let mut slot = registration.instance.lock();
		match slot.as_ref() {
			Some(existing) => Ok(Arc::clone(existing)),
			None => {
				*slot = Some(Arc::clone(&built));
				Ok(built)
			}
		}
	}

	fn resolve_all<'a>(
		&self,
		names: impl Iterator<Item = &'a str>,
		stack: &mut ResolutionStack,
	) -> DiResult<Dependencies> {
		let mut deps = Dependencies::new();
		for name in names {
			let instance = self.resolve(name, stack)?;
			deps.push(name, instance);
		}
		Ok(deps)
	}
}

impl Default for Resolver {
	fn default() -> Self {
		Self::new()
	}
}

impl fmt::Debug for Resolver {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let registrations = self.registrations.read();
		let mut names: Vec<&String> = registrations.keys().collect();
		names.sort();
		f.debug_struct("Resolver")
			.field("registrations", &names)
			.field("max_depth", &self.max_depth)
			.finish()
	}
}
