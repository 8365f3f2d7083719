//! # Wayfarer Conf
//!
//! Settings for the router, the resolver and logging, layered in priority
//! order: environment variables > TOML file > defaults.
//!
//! ## Example
//!
//! ```rust
//! use wayfarer_conf::Settings;
//!
//! let mut settings = Settings::from_toml_str(
//!     r#"
//!     [router]
//!     max_path_segments = 16
//!     "#,
//! )
//! .unwrap();
//! settings
//!     .apply_env_from([("WAYFARER_LOG_LEVEL", "debug")])
//!     .unwrap();
//!
//! assert_eq!(settings.router.max_path_segments, 16);
//! assert_eq!(settings.router.max_pattern_length, 1024);
//! assert_eq!(settings.logging.level, "debug");
//! ```

pub mod settings;

pub use settings::{
	ENV_PREFIX, LoggingSettings, ResolverSettings, RouterSettings, Settings, SettingsError,
};
