//! Route generation and the single-active-controller lifecycle.

use crate::action::{ActionTable, ControllerAction, ControllerType, Instance, TypedTable};
use crate::controller::{
	Controller, ControllerActions, MISSING_METHOD, action_name, build_pattern, default_prefix,
};
use crate::error::ControllerError;
use parking_lot::{Mutex, RwLock};
use std::any::type_name;
use std::fmt;
use std::sync::{Arc, Weak};
use std::thread::{self, ThreadId};
use wayfarer_di::{Injectable, Resolver};
use wayfarer_urls::{
	Action, HandlerRef, Invocation, Response, Route, RouteHandler, Router, RouterResult,
};

struct ActiveController {
	controller: ControllerType,
	table: Arc<dyn ActionTable>,
	instance: Instance,
}

/// Turns controller action tables into routes and keeps at most one
/// controller instance alive.
///
/// The manager registers itself as a handler on its router when created, and
/// only holds a weak reference back to it.
pub struct ControllerManager {
	resolver: Arc<Resolver>,
	router: Weak<Router>,
	active: Mutex<Option<ActiveController>>,
	// Readable while an action holds `active`.
	active_type: RwLock<Option<ControllerType>>,
	// Thread currently holding `active`.
	running_on: Mutex<Option<ThreadId>>,
}

/// Clears `running_on` when the action finishes, even by unwinding.
struct RunningGuard<'a>(&'a Mutex<Option<ThreadId>>);

impl Drop for RunningGuard<'_> {
	fn drop(&mut self) {
		*self.0.lock() = None;
	}
}

impl ControllerManager {
	/// Creates a manager and adds it to `router`'s handler chain.
	pub fn new(resolver: Arc<Resolver>, router: &Arc<Router>) -> Arc<Self> {
		let manager = Arc::new(Self {
			resolver,
			router: Arc::downgrade(router),
			active: Mutex::new(None),
			active_type: RwLock::new(None),
			running_on: Mutex::new(None),
		});
		router.add_handler(HandlerRef::instance(Arc::clone(&manager)));
		manager
	}

	/// Registers one route per action of `C`, under `prefix`.
	///
	/// Routes are registered in table order; a catch-all, if present, adds a
	/// trailing `prefix/{rest...?}` route. Either every route is registered
	/// or none is.
	///
	/// # Errors
	///
	/// - [`ControllerError::RouterUnavailable`] if the router was dropped
	/// - [`ControllerError::Router`] if a generated pattern is invalid or taken
	pub fn register_controller<C>(
		&self,
		prefix: &str,
		actions: ControllerActions<C>,
	) -> Result<Vec<Arc<Route>>, ControllerError>
	where
		C: Controller + Injectable,
	{
		let router = self.router.upgrade().ok_or(ControllerError::RouterUnavailable)?;
		let (table, specs, has_missing) = TypedTable::build(actions);

		let mut pending = Vec::with_capacity(specs.len() + 1);
		for (method, params) in specs {
			let pattern = build_pattern(prefix, action_name(&method), &params);
			pending.push((pattern, method));
		}
		if has_missing {
			pending.push((build_pattern(prefix, "", &["_rest".to_string()]), MISSING_METHOD.to_string()));
		}

		// Compile everything before touching the router so a bad pattern
		// registers nothing.
		let limits = router.limits();
		let mut built = Vec::with_capacity(pending.len());
		for (pattern, method) in pending {
			let action = Action::token(ControllerAction::new(&table, method));
			built.push(Route::with_limits(&pattern, action, limits)?);
		}
		let routes = router.add_routes(built)?;

		tracing::debug!(
			target: "wayfarer::controllers",
			controller = type_name::<C>(),
			prefix,
			routes = routes.len(),
			"registered controller"
		);
		Ok(routes)
	}

	/// Like [`register_controller`](Self::register_controller), deriving the
	/// prefix from the type name (`UserProfileController` -> `user-profile`).
	pub fn register_default<C>(&self, actions: ControllerActions<C>) -> Result<Vec<Arc<Route>>, ControllerError>
	where
		C: Controller + Injectable,
	{
		let prefix = default_prefix(type_name::<C>())?;
		self.register_controller(&prefix, actions)
	}

	/// The type of the currently active controller, if any.
	pub fn active_controller(&self) -> Option<ControllerType> {
		*self.active_type.read()
	}

	/// Runs `action`, swapping the active controller first if it targets a
	/// different type.
	///
	/// Calls from other threads wait for the running action to finish. A call
	/// made from inside a running action (its own call stack) is refused,
	/// since the active controller is exclusively borrowed until it returns.
	///
	/// A method that returns nothing yields an empty response, so the handler
	/// chain stops here either way.
	///
	/// # Errors
	///
	/// - [`ControllerError::Busy`] when called from inside a running action
	/// - [`ControllerError::Dependency`] if the controller cannot be built
	pub fn execute(&self, action: &ControllerAction, invocation: &Invocation) -> RouterResult<Option<Response>> {
		if !action.table.serves(action.method()) {
			return Ok(None);
		}
		let caller = thread::current().id();
		if *self.running_on.lock() == Some(caller) {
			return Err(ControllerError::Busy.into());
		}
		let mut active = self.active.lock();
		*self.running_on.lock() = Some(caller);
		let _running = RunningGuard(&self.running_on);

		let reuse = active
			.as_ref()
			.is_some_and(|current| current.controller == action.controller());
		if !reuse {
			self.swap(&mut active, action)?;
		}

		let Some(current) = active.as_mut() else {
			return Ok(None);
		};
		let response = action
			.table
			.invoke(&mut current.instance, action.method(), invocation)?;
		Ok(Some(response.unwrap_or_else(Response::empty)))
	}

	fn swap(&self, active: &mut Option<ActiveController>, action: &ControllerAction) -> Result<(), ControllerError> {
		if let Some(mut previous) = active.take() {
			tracing::debug!(target: "wayfarer::controllers", controller = %previous.controller, "unloading controller");
			*self.active_type.write() = None;
			previous.table.unload(&mut previous.instance);
		}

		let mut instance = action.table.construct(&self.resolver)?;
		tracing::debug!(target: "wayfarer::controllers", controller = %action.controller(), "loading controller");
		action.table.load(&mut instance);

		*active = Some(ActiveController {
			controller: action.controller(),
			table: Arc::clone(&action.table),
			instance,
		});
		*self.active_type.write() = Some(action.controller());
		Ok(())
	}
}

impl RouteHandler for ControllerManager {
	fn execute_action(&self, route: &Route, invocation: &Invocation) -> RouterResult<Option<Response>> {
		match route.action().as_token::<ControllerAction>() {
			Some(action) => self.execute(action, invocation),
			None => Ok(None),
		}
	}
}

impl fmt::Debug for ControllerManager {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("ControllerManager")
			.field("active", &self.active_controller())
			.finish()
	}
}
