//! Route registry and dispatcher.

use crate::action::{Action, Invocation, Response};
use crate::error::{RouterError, RouterResult};
use crate::handler::{HandlerRef, RouteHandler};
use crate::pattern::PatternLimits;
use crate::route::{Route, RouteMatch};
use parking_lot::RwLock;
use std::fmt;
use std::sync::Arc;
use wayfarer_di::{Dependencies, Resolver};

/// Ordered routes plus an ordered handler chain.
///
/// Dispatch is strict first-match in registration order. Locks are only held
/// long enough to snapshot the routes and handlers, so actions and handlers
/// may register routes or dispatch again.
pub struct Router {
	routes: RwLock<Vec<Arc<Route>>>,
	handlers: RwLock<Vec<HandlerRef>>,
	resolver: Option<Arc<Resolver>>,
	limits: PatternLimits,
}

impl Router {
	/// Creates a router without a resolver.
	pub fn new() -> Self {
		Self {
			routes: RwLock::new(Vec::new()),
			handlers: RwLock::new(Vec::new()),
			resolver: None,
			limits: PatternLimits::default(),
		}
	}

	/// Creates a router that resolves dependencies through `resolver`.
	pub fn with_resolver(resolver: Arc<Resolver>) -> Self {
		Self {
			resolver: Some(resolver),
			..Self::new()
		}
	}

	/// Replaces the limits applied to patterns compiled by
	/// [`create_route`](Self::create_route).
	pub fn with_limits(mut self, limits: PatternLimits) -> Self {
		self.limits = limits;
		self
	}

	/// The resolver, if any.
	pub fn resolver(&self) -> Option<&Arc<Resolver>> {
		self.resolver.as_ref()
	}

	/// Pattern limits in effect.
	pub fn limits(&self) -> &PatternLimits {
		&self.limits
	}

	/// Compiles `pattern` and appends the resulting route.
	///
	/// # Errors
	///
	/// [`RouterError::InvalidPattern`] if the pattern does not compile and
	/// [`RouterError::DuplicatePattern`] if it is already registered.
	pub fn create_route(&self, pattern: &str, action: Action) -> RouterResult<Arc<Route>> {
		let route = Route::with_limits(pattern, action, &self.limits)?;
		self.add_route(route)
	}

	/// Appends an already built route.
	pub fn add_route(&self, route: impl Into<Arc<Route>>) -> RouterResult<Arc<Route>> {
		let route = route.into();
		let mut routes = self.routes.write();
		if routes.iter().any(|existing| existing.pattern() == route.pattern()) {
			return Err(RouterError::DuplicatePattern(route.pattern().to_string()));
		}

		tracing::debug!(
			target: "wayfarer::router",
			pattern = route.pattern(),
			action = ?route.action(),
			"registered route"
		);
		routes.push(Arc::clone(&route));
		Ok(route)
	}

	/// Appends `routes` in order, or none of them.
	///
	/// # Errors
	///
	/// [`RouterError::DuplicatePattern`] if any pattern is already registered
	/// or repeated within `routes`; the router is left unchanged.
	pub fn add_routes<I>(&self, routes: I) -> RouterResult<Vec<Arc<Route>>>
	where
		I: IntoIterator,
		I::Item: Into<Arc<Route>>,
	{
		let batch: Vec<Arc<Route>> = routes.into_iter().map(Into::into).collect();
		let mut registered = self.routes.write();
		for (index, route) in batch.iter().enumerate() {
			let taken = registered
				.iter()
				.chain(&batch[..index])
				.any(|existing| existing.pattern() == route.pattern());
			if taken {
				return Err(RouterError::DuplicatePattern(route.pattern().to_string()));
			}
		}

		for route in &batch {
			tracing::debug!(target: "wayfarer::router", pattern = route.pattern(), action = ?route.action(), "registered route");
		}
		registered.extend(batch.iter().cloned());
		Ok(batch)
	}

	/// Snapshot of the registered routes, in priority order.
	pub fn routes(&self) -> Vec<Arc<Route>> {
		self.routes.read().clone()
	}

	/// Appends a handler unless it is already registered.
	///
	/// Instances compare by pointer, tokens by name.
	pub fn add_handler(&self, handler: impl Into<HandlerRef>) -> bool {
		let handler = handler.into();
		let mut handlers = self.handlers.write();
		if handlers.contains(&handler) {
			return false;
		}

		tracing::debug!(target: "wayfarer::router", handler = ?handler, "registered handler");
		handlers.push(handler);
		true
	}

	/// Number of registered handlers.
	pub fn handler_count(&self) -> usize {
		self.handlers.read().len()
	}

	/// Finds the first route matching `uri` without executing it.
	pub fn find_route(&self, uri: &str) -> Option<(Arc<Route>, RouteMatch)> {
		self.routes().into_iter().find_map(|route| {
			tracing::trace!(target: "wayfarer::router", uri, pattern = route.pattern(), "trying route");
			let route_match = route.params_from_uri(uri)?;
			Some((route, route_match))
		})
	}

	/// Dispatches `uri` to the first matching route.
	///
	/// Returns `Ok(None)` when nothing matched or nothing produced a response.
	/// A non-empty response is offered to the handler chain before being
	/// returned.
	///
	/// # Errors
	///
	/// - [`RouterError::Dependency`] if a declared dependency cannot be resolved
	/// - [`RouterError::NoResolver`] if dependencies are declared without a resolver
	/// - any error returned by the action or a handler
	pub fn dispatch(&self, uri: &str) -> RouterResult<Option<Response>> {
		let Some((route, route_match)) = self.find_route(uri) else {
			tracing::debug!(target: "wayfarer::router", uri, "no route matched");
			return Ok(None);
		};
		tracing::debug!(target: "wayfarer::router", uri, pattern = route.pattern(), "matched route");

		let dependencies = self.resolve_dependencies(&route)?;
		let invocation = Invocation::new(route_match, dependencies);

		let response = match route.action() {
			Action::Callable(action) => action(&invocation)?,
			Action::Token(_) => self.execute_with_handlers(&route, &invocation)?,
		};

		if let Some(response) = &response {
			if !response.is_empty() {
				self.offer_response(response)?;
			}
		}
		Ok(response)
	}

	/// Generates a URI for the first route named `name`.
	///
	/// Returns `Ok(None)` if no route carries that name.
	pub fn get_url<I, K, V>(&self, name: &str, params: I) -> RouterResult<Option<String>>
	where
		I: IntoIterator<Item = (K, V)>,
		K: Into<String>,
		V: ToString,
	{
		let route = self
			.routes()
			.into_iter()
			.find(|route| route.name().as_deref() == Some(name));
		match route {
			Some(route) => route.uri_from_params(params).map(Some),
			None => Ok(None),
		}
	}

	fn resolve_dependencies(&self, route: &Route) -> RouterResult<Dependencies> {
		let names = route.dependency_names();
		if names.is_empty() {
			return Ok(Dependencies::new());
		}
		let resolver = self
			.resolver
			.as_ref()
			.ok_or_else(|| RouterError::NoResolver(route.pattern().to_string()))?;

		names
			.into_iter()
			.map(|name| {
				let instance = resolver.make(&name)?;
				Ok::<_, RouterError>((name, instance))
			})
			.collect()
	}

	fn execute_with_handlers(&self, route: &Route, invocation: &Invocation) -> RouterResult<Option<Response>> {
		let handlers = self.handlers.read().clone();
		for handler in &handlers {
			let handler = self.materialize(handler)?;
			if let Some(response) = handler.execute_action(route, invocation)? {
				return Ok(Some(response));
			}
		}
		tracing::debug!(target: "wayfarer::router", pattern = route.pattern(), "no handler produced a response");
		Ok(None)
	}

	fn offer_response(&self, response: &Response) -> RouterResult<()> {
		let handlers = self.handlers.read().clone();
		for handler in &handlers {
			if self.materialize(handler)?.handle_response(response) {
				return Ok(());
			}
		}
		tracing::trace!(target: "wayfarer::router", "response left unhandled");
		Ok(())
	}

	fn materialize(&self, handler: &HandlerRef) -> RouterResult<Arc<dyn RouteHandler>> {
		match handler {
			HandlerRef::Instance(handler) => Ok(Arc::clone(handler)),
			HandlerRef::Token(name) => {
				let resolver = self
					.resolver
					.as_ref()
					.ok_or_else(|| RouterError::NoResolver(name.clone()))?;
				let handler = resolver.make_as::<Arc<dyn RouteHandler>>(name)?;
				Ok(Arc::clone(&*handler))
			}
		}
	}
}

impl Default for Router {
	fn default() -> Self {
		Self::new()
	}
}

impl fmt::Debug for Router {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let patterns: Vec<String> = self
			.routes
			.read()
			.iter()
			.map(|route| route.pattern().to_string())
			.collect();
		f.debug_struct("Router")
			.field("routes", &patterns)
			.field("handlers", &self.handlers.read().len())
			.field("has_resolver", &self.resolver.is_some())
			.finish()
	}
}
