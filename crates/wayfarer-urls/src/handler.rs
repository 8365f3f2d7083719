//! The pluggable handler chain.
//!
//! Handlers are consulted in registration order for two things: executing
//! token actions and consuming the produced response.

use crate::action::{Invocation, Response};
use crate::error::RouterResult;
use crate::route::Route;
use std::fmt;
use std::sync::Arc;

/// A participant in the router's handler chain.
///
/// Both methods have "not mine" defaults, so a handler only implements the
/// phase it cares about.
pub trait RouteHandler: Send + Sync {
	/// Executes a token action.
	///
	/// Returning `Ok(None)` passes the action to the next handler.
	fn execute_action(&self, _route: &Route, _invocation: &Invocation) -> RouterResult<Option<Response>> {
		Ok(None)
	}

	/// Consumes a produced response.
	///
	/// Returning `true` marks the response as handled and stops the chain.
	fn handle_response(&self, _response: &Response) -> bool {
		false
	}
}

/// A handler registered directly or by resolver name.
#[derive(Clone)]
pub enum HandlerRef {
	/// A live handler.
	Instance(Arc<dyn RouteHandler>),
	/// A resolver registration producing an `Arc<dyn RouteHandler>`,
	/// resolved on every use.
	Token(String),
}

impl HandlerRef {
	/// Wraps a concrete handler.
	pub fn instance<H: RouteHandler + 'static>(handler: Arc<H>) -> Self {
		Self::Instance(handler)
	}

	/// Wraps a resolver name.
	pub fn token(name: impl Into<String>) -> Self {
		Self::Token(name.into())
	}
}

impl PartialEq for HandlerRef {
	fn eq(&self, other: &Self) -> bool {
		match (self, other) {
			(Self::Instance(a), Self::Instance(b)) => {
				Arc::as_ptr(a) as *const () == Arc::as_ptr(b) as *const ()
			}
			(Self::Token(a), Self::Token(b)) => a == b,
			_ => false,
		}
	}
}

impl Eq for HandlerRef {}

impl From<Arc<dyn RouteHandler>> for HandlerRef {
	fn from(handler: Arc<dyn RouteHandler>) -> Self {
		Self::Instance(handler)
	}
}

impl From<&str> for HandlerRef {
	fn from(name: &str) -> Self {
		Self::Token(name.to_string())
	}
}

impl From<String> for HandlerRef {
	fn from(name: String) -> Self {
		Self::Token(name)
	}
}

impl fmt::Debug for HandlerRef {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Instance(handler) => f
				.debug_tuple("Instance")
				.field(&(Arc::as_ptr(handler) as *const ()))
				.finish(),
			Self::Token(name) => f.debug_tuple("Token").field(name).finish(),
		}
	}
}
