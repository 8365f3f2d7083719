//! The application facade wiring a resolver, a router and a controller
//! manager together.

use crate::error::Result;
use std::fmt;
use std::path::Path;
use std::sync::Arc;
use wayfarer_conf::Settings;
use wayfarer_controllers::{Controller, ControllerActions, ControllerError, ControllerManager};
use wayfarer_di::{Injectable, Resolver};
use wayfarer_urls::{Action, PatternLimits, Response, Route, Router, RouterResult};

/// One resolver, one router using it, and one controller manager attached to
/// both.
///
/// The router holds the resolver strongly and the manager as a handler; the
/// manager only holds the router weakly, so dropping the application frees
/// all three.
pub struct Application {
	settings: Settings,
	resolver: Arc<Resolver>,
	router: Arc<Router>,
	controllers: Arc<ControllerManager>,
}

impl Application {
	/// An application with default settings.
	pub fn new() -> Self {
		Self::assemble(Settings::default())
	}

	/// An application configured from `settings`.
	///
	/// # Errors
	///
	/// [`Error::Settings`](crate::Error::Settings) if the settings fail
	/// validation.
	pub fn with_settings(settings: Settings) -> Result<Self> {
		settings.validate()?;
		Ok(Self::assemble(settings))
	}

	/// Loads layered settings (defaults, optional TOML file, `WAYFARER_*`
	/// environment) and builds the application from them.
	pub fn load(path: Option<&Path>) -> Result<Self> {
		let settings = Settings::load(path)?;
		Ok(Self::assemble(settings))
	}

	fn assemble(settings: Settings) -> Self {
		let limits = PatternLimits {
			max_length: settings.router.max_pattern_length,
			max_segments: settings.router.max_path_segments,
			max_regex_size: settings.router.max_regex_size,
		};
		let resolver = Arc::new(Resolver::with_max_depth(settings.resolver.max_resolution_depth));
		let router = Arc::new(Router::with_resolver(Arc::clone(&resolver)).with_limits(limits));
		let controllers = ControllerManager::new(Arc::clone(&resolver), &router);

		tracing::debug!(
			target: "wayfarer",
			max_pattern_length = limits.max_length,
			max_resolution_depth = settings.resolver.max_resolution_depth,
			"application assembled"
		);
		Self {
			settings,
			resolver,
			router,
			controllers,
		}
	}

	pub fn settings(&self) -> &Settings {
		&self.settings
	}

	/// The resolver shared by routes and controllers.
	pub fn resolver(&self) -> &Arc<Resolver> {
		&self.resolver
	}

	pub fn router(&self) -> &Arc<Router> {
		&self.router
	}

	pub fn controllers(&self) -> &Arc<ControllerManager> {
		&self.controllers
	}

	/// Registers a route. See [`Router::create_route`].
	pub fn route(&self, pattern: &str, action: Action) -> RouterResult<Arc<Route>> {
		self.router.create_route(pattern, action)
	}

	/// Registers the routes of controller `C` under `prefix`.
	pub fn controller<C>(&self, prefix: &str, actions: ControllerActions<C>) -> std::result::Result<Vec<Arc<Route>>, ControllerError>
	where
		C: Controller + Injectable,
	{
		self.controllers.register_controller(prefix, actions)
	}

	/// Dispatches `uri` through the router.
	pub fn dispatch(&self, uri: &str) -> RouterResult<Option<Response>> {
		self.router.dispatch(uri)
	}

	/// Reverse-routes the route named `name`.
	pub fn url<I, K, V>(&self, name: &str, params: I) -> RouterResult<Option<String>>
	where
		I: IntoIterator<Item = (K, V)>,
		K: Into<String>,
		V: ToString,
	{
		self.router.get_url(name, params)
	}
}

impl Default for Application {
	fn default() -> Self {
		Self::new()
	}
}

impl fmt::Debug for Application {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Application")
			.field("settings", &self.settings)
			.field("routes", &self.router.routes().len())
			.field("active_controller", &self.controllers.active_controller())
			.finish()
	}
}
