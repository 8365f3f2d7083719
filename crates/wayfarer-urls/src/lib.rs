//! # Wayfarer URLs
//!
//! Route pattern compilation, first-match dispatch and the pluggable handler
//! chain.
//!
//! ## Pattern syntax
//!
//! | Token | Meaning |
//! |---|---|
//! | `{name}` | required single segment |
//! | `{name?}` | optional single segment |
//! | `{name...}` | required, spans separators |
//! | `{name...?}` | optional, spans separators |
//!
//! Leading and trailing `/` are ignored on both patterns and URIs.
//!
//! ## Example
//!
//! ```rust
//! use wayfarer_urls::{Action, Condition, Router};
//!
//! let router = Router::new();
//! router
//!     .create_route(
//!         "user/{id}/{tab?}",
//!         Action::callable(|inv| format!("user {}", inv.arg(0).unwrap_or_default())),
//!     )
//!     .unwrap()
//!     .where_("id", Condition::regex(r"^\d+$").unwrap())
//!     .unwrap()
//!     .default("tab", "profile")
//!     .unwrap()
//!     .named("user")
//!     .unwrap();
//!
//! let response = router.dispatch("/user/42").unwrap().unwrap();
//! assert_eq!(response.downcast_ref::<String>().map(String::as_str), Some("user 42"));
//!
//! let url = router.get_url("user", [("id", 7)]).unwrap();
//! assert_eq!(url.as_deref(), Some("user/7/profile"));
//! ```

pub mod action;
pub mod error;
pub mod handler;
pub mod pattern;
pub mod route;
pub mod router;

pub use action::{Action, ActionFn, IntoResponse, Invocation, Response};
pub use error::{RouterError, RouterResult};
pub use handler::{HandlerRef, RouteHandler};
pub use pattern::{PathPattern, PatternLimits, PlaceholderKind};
pub use route::{Condition, Route, RouteMatch};
pub use router::Router;
