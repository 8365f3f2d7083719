//! Route tokens pointing at controller methods.

use crate::controller::{ActionSpec, Controller, ControllerActions, MethodFn};
use std::any::{Any, TypeId, type_name};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use wayfarer_di::{DiResult, Injectable, Resolver};
use wayfarer_urls::{Invocation, Response, RouterError, RouterResult};

/// Identity of a controller type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ControllerType {
	id: TypeId,
	name: &'static str,
}

impl ControllerType {
	/// The identity of `C`.
	pub fn of<C: 'static>() -> Self {
		Self {
			id: TypeId::of::<C>(),
			name: type_name::<C>(),
		}
	}

	/// The type's [`TypeId`].
	pub fn id(&self) -> TypeId {
		self.id
	}

	/// The type's name, for diagnostics.
	pub fn name(&self) -> &'static str {
		self.name
	}
}

impl fmt::Display for ControllerType {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.name)
	}
}

pub(crate) type Instance = Box<dyn Any + Send>;

/// Lifecycle and dispatch for one controller type, with the type erased.
pub(crate) trait ActionTable: Send + Sync {
	fn controller(&self) -> ControllerType;

	fn construct(&self, resolver: &Resolver) -> DiResult<Instance>;

	fn load(&self, instance: &mut Instance);

	fn unload(&self, instance: &mut Instance);

	/// Whether `method` (or a catch-all) can serve the call.
	fn serves(&self, method: &str) -> bool;

	fn invoke(&self, instance: &mut Instance, method: &str, invocation: &Invocation) -> RouterResult<Option<Response>>;
}

pub(crate) struct TypedTable<C> {
	methods: HashMap<String, Arc<MethodFn<C>>>,
	missing: Option<Arc<MethodFn<C>>>,
}

impl<C: Controller + Injectable> TypedTable<C> {
	/// Splits `actions` into the erased table and the route specs to register.
	pub(crate) fn build(actions: ControllerActions<C>) -> (Arc<dyn ActionTable>, Vec<(String, Vec<String>)>, bool) {
		let (specs, missing) = actions.into_parts();
		let mut methods = HashMap::with_capacity(specs.len());
		let mut routes = Vec::with_capacity(specs.len());
		for ActionSpec { method, params, handler } in specs {
			routes.push((method.clone(), params));
			methods.insert(method, handler);
		}
		let has_missing = missing.is_some();
		let table: Arc<dyn ActionTable> = Arc::new(Self { methods, missing });
		(table, routes, has_missing)
	}

	fn typed<'a>(&self, instance: &'a mut Instance) -> RouterResult<&'a mut C> {
		instance.downcast_mut::<C>().ok_or_else(|| {
			RouterError::Handler(format!("active instance is not a {}", type_name::<C>()))
		})
	}
}

impl<C: Controller + Injectable> ActionTable for TypedTable<C> {
	fn controller(&self) -> ControllerType {
		ControllerType::of::<C>()
	}

	fn construct(&self, resolver: &Resolver) -> DiResult<Instance> {
		let controller = resolver.make_from_constructor::<C>()?;
		Ok(Box::new(controller))
	}

	fn load(&self, instance: &mut Instance) {
		if let Some(controller) = instance.downcast_mut::<C>() {
			controller.load();
		}
	}

	fn unload(&self, instance: &mut Instance) {
		if let Some(controller) = instance.downcast_mut::<C>() {
			controller.unload();
		}
	}

	fn serves(&self, method: &str) -> bool {
		self.methods.contains_key(method) || self.missing.is_some()
	}

	fn invoke(&self, instance: &mut Instance, method: &str, invocation: &Invocation) -> RouterResult<Option<Response>> {
		let handler = match self.methods.get(method).or(self.missing.as_ref()) {
			Some(handler) => Arc::clone(handler),
			None => return Ok(None),
		};
		let controller = self.typed(instance)?;
		handler(controller, invocation)
	}
}

/// The token stored on routes generated from a controller.
#[derive(Clone)]
pub struct ControllerAction {
	controller: ControllerType,
	method: String,
	pub(crate) table: Arc<dyn ActionTable>,
}

impl ControllerAction {
	pub(crate) fn new(table: &Arc<dyn ActionTable>, method: impl Into<String>) -> Self {
		Self {
			controller: table.controller(),
			method: method.into(),
			table: Arc::clone(table),
		}
	}

	/// The controller type this route targets.
	pub fn controller(&self) -> ControllerType {
		self.controller
	}

	/// The method this route invokes.
	pub fn method(&self) -> &str {
		&self.method
	}
}

impl fmt::Debug for ControllerAction {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}::{}", self.controller, self.method)
	}
}
