//! Route actions, invocations and responses.

use crate::error::{RouterError, RouterResult};
use crate::route::RouteMatch;
use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use wayfarer_di::{Dependencies, Instance};

/// Signature of a directly invocable action.
pub type ActionFn = dyn Fn(&Invocation) -> RouterResult<Option<Response>> + Send + Sync;

/// What a route does when it wins a dispatch.
#[derive(Clone)]
pub enum Action {
	/// Invoked directly by the router.
	Callable(Arc<ActionFn>),
	/// Opaque value interpreted by the handler chain.
	Token(Arc<dyn Any + Send + Sync>),
}

impl Action {
	/// Wraps a closure as a callable action.
	///
	/// # Examples
	///
	/// ```
	/// use wayfarer_urls::{Action, Response};
	///
	/// let action = Action::callable(|inv| Response::new(inv.args().len()));
	/// assert!(action.is_callable());
	/// ```
	pub fn callable<F, R>(f: F) -> Self
	where
		F: Fn(&Invocation) -> R + Send + Sync + 'static,
		R: IntoResponse,
	{
		Self::Callable(Arc::new(move |invocation| f(invocation).into_response()))
	}

	/// Wraps an arbitrary value as a token for the handler chain.
	pub fn token<T: Any + Send + Sync>(token: T) -> Self {
		Self::Token(Arc::new(token))
	}

	/// Whether this action is invoked directly.
	pub fn is_callable(&self) -> bool {
		matches!(self, Self::Callable(_))
	}

	/// Returns the token as a `T`, if this is a token of that type.
	pub fn as_token<T: Any>(&self) -> Option<&T> {
		match self {
			Self::Token(token) => token.downcast_ref::<T>(),
			Self::Callable(_) => None,
		}
	}
}

impl fmt::Debug for Action {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Callable(_) => f.write_str("Action::Callable"),
			Self::Token(_) => f.write_str("Action::Token"),
		}
	}
}

/// A value produced by an action.
///
/// An empty response still counts as "produced": it stops the action chain
/// but is never offered to response handlers.
#[derive(Default)]
pub struct Response {
	value: Option<Box<dyn Any + Send + Sync>>,
}

impl Response {
	/// Wraps `value`.
	pub fn new<T: Any + Send + Sync>(value: T) -> Self {
		Self {
			value: Some(Box::new(value)),
		}
	}

	/// A response that carries nothing.
	pub fn empty() -> Self {
		Self::default()
	}

	/// Whether the response carries no value.
	pub fn is_empty(&self) -> bool {
		self.value.is_none()
	}

	/// Whether the carried value is a `T`.
	pub fn is<T: Any>(&self) -> bool {
		self.value.as_ref().is_some_and(|value| value.is::<T>())
	}

	/// Borrows the carried value as a `T`.
	pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
		self.value.as_ref()?.downcast_ref::<T>()
	}

	/// Takes the carried value as a `T`.
	pub fn into_inner<T: Any>(self) -> Option<T> {
		self.value?.downcast::<T>().ok().map(|value| *value)
	}
}

impl fmt::Debug for Response {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Response")
			.field("empty", &self.is_empty())
			.finish()
	}
}

/// Conversion of action return values into a dispatch result.
pub trait IntoResponse {
	/// `Ok(None)` means "no response".
	fn into_response(self) -> RouterResult<Option<Response>>;
}

impl IntoResponse for () {
	fn into_response(self) -> RouterResult<Option<Response>> {
		Ok(None)
	}
}

impl IntoResponse for Response {
	fn into_response(self) -> RouterResult<Option<Response>> {
		Ok(Some(self))
	}
}

impl IntoResponse for Option<Response> {
	fn into_response(self) -> RouterResult<Option<Response>> {
		Ok(self)
	}
}

impl IntoResponse for String {
	fn into_response(self) -> RouterResult<Option<Response>> {
		Ok(Some(Response::new(self)))
	}
}

impl IntoResponse for &'static str {
	fn into_response(self) -> RouterResult<Option<Response>> {
		Ok(Some(Response::new(self)))
	}
}

impl<T, E> IntoResponse for Result<T, E>
where
	T: IntoResponse,
	E: Into<RouterError>,
{
	fn into_response(self) -> RouterResult<Option<Response>> {
		match self {
			Ok(value) => value.into_response(),
			Err(err) => Err(err.into()),
		}
	}
}

/// Everything an action receives for one dispatch.
#[derive(Debug, Clone)]
pub struct Invocation {
	route_match: RouteMatch,
	dependencies: Dependencies,
}

impl Invocation {
	/// Creates an invocation from a match and its resolved dependencies.
	pub fn new(route_match: RouteMatch, dependencies: Dependencies) -> Self {
		Self {
			route_match,
			dependencies,
		}
	}

	/// Positional arguments in parameter order, defaults applied.
	pub fn args(&self) -> &[Option<String>] {
		self.route_match.args()
	}

	/// The positional argument at `index`, if present.
	pub fn arg(&self, index: usize) -> Option<&str> {
		self.route_match.args().get(index)?.as_deref()
	}

	/// The named parameter, if present.
	pub fn param(&self, name: &str) -> Option<&str> {
		self.route_match.get(name)
	}

	/// All present parameters.
	pub fn params(&self) -> &HashMap<String, String> {
		self.route_match.params()
	}

	/// The underlying match.
	pub fn route_match(&self) -> &RouteMatch {
		&self.route_match
	}

	/// A resolved dependency by its declared name.
	pub fn dependency<T: Any + Send + Sync>(&self, name: &str) -> RouterResult<Arc<T>> {
		Ok(self.dependencies.by_name::<T>(name)?)
	}

	/// A resolved dependency by declaration position.
	pub fn dependency_at(&self, index: usize) -> Option<&Instance> {
		self.dependencies.raw(index)
	}

	/// All resolved dependencies in declaration order.
	pub fn dependencies(&self) -> &Dependencies {
		&self.dependencies
	}
}
