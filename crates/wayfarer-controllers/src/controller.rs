//! Controllers and their explicit action tables.

use crate::error::ControllerError;
use std::fmt;
use std::sync::Arc;
use wayfarer_urls::{IntoResponse, Invocation, Response, RouterResult};

/// Method name recorded on the catch-all route.
pub const MISSING_METHOD: &str = "missing_method";

/// A stateful object whose methods serve routes.
///
/// At most one controller is active per manager. `load` runs once when an
/// instance becomes active and `unload` once before it is replaced.
pub trait Controller: Send + 'static {
	/// Called after construction, before the first action runs.
	fn load(&mut self) {}

	/// Called before a controller of another type replaces this one.
	fn unload(&mut self) {}
}

/// Type-erased controller method.
pub type MethodFn<C> = dyn Fn(&mut C, &Invocation) -> RouterResult<Option<Response>> + Send + Sync;

pub(crate) struct ActionSpec<C> {
	pub(crate) method: String,
	pub(crate) params: Vec<String>,
	pub(crate) handler: Arc<MethodFn<C>>,
}

/// The routes a controller exposes, declared once at startup.
///
/// Parameter names follow two conventions: a leading `_` makes the
/// placeholder optional, and a parameter named `rest` spans the remaining
/// segments.
///
/// ```
/// use wayfarer_controllers::{Controller, ControllerActions};
///
/// struct Users;
///
/// impl Controller for Users {}
///
/// let actions = ControllerActions::<Users>::new()
///     .action("index", &[], |_, _| "all users")
///     .action("showAction", &["id", "_tab"], |_, inv| {
///         format!("user {}", inv.arg(0).unwrap_or_default())
///     });
/// assert_eq!(actions.methods().collect::<Vec<_>>(), ["index", "showAction"]);
/// ```
pub struct ControllerActions<C> {
	actions: Vec<ActionSpec<C>>,
	missing: Option<Arc<MethodFn<C>>>,
}

impl<C: Controller> ControllerActions<C> {
	/// An empty table.
	pub fn new() -> Self {
		Self {
			actions: Vec::new(),
			missing: None,
		}
	}

	/// Adds (or replaces) `method`, taking the declared URI parameters.
	pub fn action<F, R>(mut self, method: &str, params: &[&str], f: F) -> Self
	where
		F: Fn(&mut C, &Invocation) -> R + Send + Sync + 'static,
		R: IntoResponse,
	{
		let spec = ActionSpec {
			method: method.to_string(),
			params: params.iter().map(|p| p.to_string()).collect(),
			handler: Arc::new(move |controller: &mut C, invocation: &Invocation| {
				f(controller, invocation).into_response()
			}),
		};
		match self.actions.iter_mut().find(|a| a.method == method) {
			Some(existing) => *existing = spec,
			None => self.actions.push(spec),
		}
		self
	}

	/// Sets the catch-all invoked for methods the table does not define.
	///
	/// Registering a controller with a catch-all also registers a
	/// `prefix/{rest...?}` route for it.
	pub fn missing_method<F, R>(mut self, f: F) -> Self
	where
		F: Fn(&mut C, &Invocation) -> R + Send + Sync + 'static,
		R: IntoResponse,
	{
		self.missing = Some(Arc::new(move |controller: &mut C, invocation: &Invocation| {
			f(controller, invocation).into_response()
		}));
		self
	}

	/// Declared method names in order.
	pub fn methods(&self) -> impl Iterator<Item = &str> {
		self.actions.iter().map(|a| a.method.as_str())
	}

	/// Whether a catch-all is set.
	pub fn has_missing_method(&self) -> bool {
		self.missing.is_some()
	}

	pub(crate) fn into_parts(self) -> (Vec<ActionSpec<C>>, Option<Arc<MethodFn<C>>>) {
		(self.actions, self.missing)
	}
}

impl<C: Controller> Default for ControllerActions<C> {
	fn default() -> Self {
		Self::new()
	}
}

impl<C> fmt::Debug for ControllerActions<C> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("ControllerActions")
			.field(
				"actions",
				&self.actions.iter().map(|a| &a.method).collect::<Vec<_>>(),
			)
			.field("missing_method", &self.missing.is_some())
			.finish()
	}
}

/// Route segment for a method: the `Action`/`_action` suffix is dropped and
/// `index` maps to the empty string.
pub fn action_name(method: &str) -> &str {
	let name = method
		.strip_suffix("_action")
		.or_else(|| method.strip_suffix("Action"))
		.unwrap_or(method);
	if name == "index" { "" } else { name }
}

/// Placeholder for a declared parameter.
pub fn placeholder(param: &str) -> String {
	let (name, optional) = match param.strip_prefix('_') {
		Some(name) if !name.is_empty() => (name, true),
		_ => (param, false),
	};
	let rest = if name == "rest" { "..." } else { "" };
	let marker = if optional { "?" } else { "" };
	format!("{{{}{}{}}}", name, rest, marker)
}

/// Joins the pieces of a controller route, collapsing repeated separators
/// and trimming stray ones.
pub fn build_pattern(prefix: &str, action: &str, params: &[String]) -> String {
	let mut pieces = vec![prefix.to_string(), action.to_string()];
	pieces.extend(params.iter().map(|p| placeholder(p)));
	pieces
		.iter()
		.flat_map(|piece| piece.split('/'))
		.filter(|segment| !segment.is_empty())
		.collect::<Vec<_>>()
		.join("/")
}

/// Route prefix derived from a controller type name:
/// `UserProfileController` becomes `user-profile`.
///
/// # Errors
///
/// [`ControllerError::InvalidControllerName`] if the name does not end in
/// `Controller` or has nothing before it.
pub fn default_prefix(type_name: &str) -> Result<String, ControllerError> {
	let base = type_name.split('<').next().unwrap_or(type_name);
	let short = base.rsplit("::").next().unwrap_or(base);
	let stem = match short.strip_suffix("Controller") {
		Some(stem) if !stem.is_empty() => stem,
		_ => return Err(ControllerError::InvalidControllerName(type_name.to_string())),
	};

	let mut prefix = String::with_capacity(stem.len() + 4);
	let mut previous: Option<char> = None;
	for c in stem.chars() {
		if c.is_ascii_uppercase() && previous.is_some_and(|p| p.is_ascii_lowercase()) {
			prefix.push('-');
		}
		prefix.push(c.to_ascii_lowercase());
		previous = Some(c);
	}
	Ok(prefix)
}
