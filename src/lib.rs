//! # Wayfarer
//!
//! Client-side routing and dependency injection for MVC style applications.
//!
//! Wayfarer maps URI strings to actions through ordered route patterns,
//! builds the services those actions need through a name-keyed resolver, and
//! keeps a single stateful controller active at a time.
//!
//! ## Crates
//!
//! - [`di`]: name-keyed dependency resolver with cycle detection
//! - [`urls`]: route patterns, the router and its handler chain
//! - [`controllers`]: controller action tables and lifecycle
//! - [`conf`]: layered settings (defaults, TOML, environment)
//!
//! ## Feature Flags
//!
//! - `logging` (default): [`logging::init`] installs a `tracing-subscriber`
//!   formatter configured from [`conf::LoggingSettings`]
//!
//! ## Example
//!
//! ```rust
//! use wayfarer::prelude::*;
//!
//! let app = Application::new();
//! app.route("hello/{name?}", Action::callable(|inv| {
//!     format!("hello {}", inv.arg(0).unwrap_or("world"))
//! }))
//! .unwrap()
//! .named("hello")
//! .unwrap();
//!
//! let response = app.dispatch("hello").unwrap().unwrap();
//! assert_eq!(response.into_inner::<String>().as_deref(), Some("hello world"));
//! assert_eq!(app.url("hello", [("name", "ann")]).unwrap().as_deref(), Some("hello/ann"));
//! ```

pub mod app;
pub mod error;
#[cfg(feature = "logging")]
pub mod logging;

pub use app::Application;
pub use error::{Error, Result};

pub use wayfarer_conf as conf;
pub use wayfarer_controllers as controllers;
pub use wayfarer_di as di;
pub use wayfarer_urls as urls;

/// Re-exports of the types most applications touch.
pub mod prelude {
	pub use crate::app::Application;
	pub use crate::error::{Error, Result};
	pub use wayfarer_conf::Settings;
	pub use wayfarer_controllers::{Controller, ControllerActions, ControllerError};
	pub use wayfarer_di::{Dependencies, DiError, DiResult, Injectable, Provider};
	pub use wayfarer_urls::{
		Action, Condition, HandlerRef, IntoResponse, Invocation, Response, RouteHandler,
		RouterError, RouterResult,
	};
}
