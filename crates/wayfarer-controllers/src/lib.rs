//! # Wayfarer Controllers
//!
//! Controllers group related actions behind one stateful object. Their
//! routes are generated from an explicit [`ControllerActions`] table, and a
//! [`ControllerManager`] keeps a single controller instance active at a time:
//! dispatching to a different controller type unloads the current one before
//! the next is built (through the resolver) and loaded.
//!
//! ## Example
//!
//! ```rust
//! use std::sync::Arc;
//! use wayfarer_controllers::{Controller, ControllerActions, ControllerManager};
//! use wayfarer_di::{Dependencies, DiResult, Injectable, Resolver};
//! use wayfarer_urls::Router;
//!
//! struct BlogController {
//!     title: Arc<String>,
//! }
//!
//! impl Controller for BlogController {}
//!
//! impl Injectable for BlogController {
//!     const DEPENDENCIES: &'static [&'static str] = &["title"];
//!
//!     fn construct(deps: &Dependencies) -> DiResult<Self> {
//!         Ok(Self { title: deps.get::<String>(0)? })
//!     }
//! }
//!
//! let resolver = Arc::new(Resolver::new());
//! resolver.instance("title", Arc::new("My blog".to_string())).unwrap();
//! let router = Arc::new(Router::with_resolver(Arc::clone(&resolver)));
//! let manager = ControllerManager::new(resolver, &router);
//!
//! manager
//!     .register_default(
//!         ControllerActions::<BlogController>::new()
//!             .action("postAction", &["slug"], |blog, inv| {
//!                 format!("{}: {}", blog.title, inv.arg(0).unwrap_or_default())
//!             }),
//!     )
//!     .unwrap();
//!
//! let response = router.dispatch("blog/post/hello").unwrap().unwrap();
//! assert_eq!(response.into_inner::<String>().as_deref(), Some("My blog: hello"));
//! ```

pub mod action;
pub mod controller;
pub mod error;
pub mod manager;

pub use action::{ControllerAction, ControllerType};
pub use controller::{
	Controller, ControllerActions, MISSING_METHOD, MethodFn, action_name, build_pattern,
	default_prefix, placeholder,
};
pub use error::ControllerError;
pub use manager::ControllerManager;
