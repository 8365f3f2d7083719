//! # Wayfarer Dependency Injection
//!
//! A name-keyed dependency injection container.
//!
//! Every registration pairs a name with a [`Provider`]: a factory plus the
//! ordered list of dependency names it consumes. Resolving a name resolves
//! those dependencies depth-first, hands them to the factory in declaration
//! order, and optionally caches the result for the lifetime of the
//! [`Resolver`] (shared registrations).
//!
//! ## Features
//!
//! - **Explicit descriptors**: dependencies are declared, never inferred
//! - **Shared or transient**: singletons are built once and reused
//! - **Ad hoc construction**: [`Resolver::make_from_constructor`] builds types
//!   that are not themselves registered
//! - **Cycle detection**: circular graphs fail fast with the offending path
//!
//! ## Example
//!
//! ```rust
//! use std::sync::Arc;
//! use wayfarer_di::{Dependencies, DiResult, Injectable, Provider, Resolver};
//!
//! struct Config {
//!     base_url: String,
//! }
//!
//! struct ApiClient {
//!     config: Arc<Config>,
//! }
//!
//! impl Injectable for ApiClient {
//!     const DEPENDENCIES: &'static [&'static str] = &["config"];
//!
//!     fn construct(deps: &Dependencies) -> DiResult<Self> {
//!         Ok(Self {
//!             config: deps.get::<Config>(0)?,
//!         })
//!     }
//! }
//!
//! let resolver = Resolver::new();
//! resolver
//!     .singleton(
//!         "config",
//!         Provider::factory(&[], |_| {
//!             Ok(Config {
//!                 base_url: "https://example.com".to_string(),
//!             })
//!         }),
//!     )
//!     .unwrap();
//! resolver
//!     .register("api", Provider::constructor::<ApiClient>(), false)
//!     .unwrap();
//!
//! let api = resolver.make_as::<ApiClient>("api").unwrap();
//! assert_eq!(api.config.base_url, "https://example.com");
//! ```

pub mod cycle_detection;
pub mod error;
pub mod provider;
pub mod resolver;

pub use cycle_detection::{DEFAULT_MAX_RESOLUTION_DEPTH, ResolutionStack};
pub use error::{DiError, DiResult};
pub use provider::{Dependencies, Injectable, Instance, Provider};
pub use resolver::Resolver;
