//! Routes: a compiled pattern plus its per-parameter configuration.

use crate::action::Action;
use crate::error::{RouterError, RouterResult};
use crate::pattern::{PathPattern, PatternLimits};
use parking_lot::RwLock;
use regex::Regex;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Validation applied to a single parameter value.
#[derive(Clone)]
pub enum Condition {
	/// The value must match the regex.
	Regex(Regex),
	/// The predicate must return `true`.
	Predicate(Arc<dyn Fn(&str) -> bool + Send + Sync>),
}

impl Condition {
	/// Compiles `pattern` into a regex condition.
	pub fn regex(pattern: &str) -> RouterResult<Self> {
		Regex::new(pattern)
			.map(Self::Regex)
			.map_err(|e| RouterError::invalid_pattern(pattern, e.to_string()))
	}

	/// Wraps a predicate.
	pub fn predicate<F>(f: F) -> Self
	where
		F: Fn(&str) -> bool + Send + Sync + 'static,
	{
		Self::Predicate(Arc::new(f))
	}

	/// Evaluates the condition against `value`.
	pub fn check(&self, value: &str) -> bool {
		match self {
			Self::Regex(regex) => regex.is_match(value),
			Self::Predicate(predicate) => predicate(value),
		}
	}
}

impl From<Regex> for Condition {
	fn from(regex: Regex) -> Self {
		Self::Regex(regex)
	}
}

impl fmt::Debug for Condition {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Regex(regex) => f.debug_tuple("Regex").field(&regex.as_str()).finish(),
			Self::Predicate(_) => f.write_str("Predicate"),
		}
	}
}

/// Parameters extracted from a matched URI.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouteMatch {
	params: HashMap<String, String>,
	args: Vec<Option<String>>,
}

impl RouteMatch {
	/// Present parameters by name.
	pub fn params(&self) -> &HashMap<String, String> {
		&self.params
	}

	/// One named parameter.
	pub fn get(&self, name: &str) -> Option<&str> {
		self.params.get(name).map(String::as_str)
	}

	/// Values in parameter order; absent optionals are `None`.
	pub fn args(&self) -> &[Option<String>] {
		&self.args
	}

	/// Consumes the match, returning the parameter map.
	pub fn into_params(self) -> HashMap<String, String> {
		self.params
	}
}

#[derive(Debug, Default)]
struct RouteConfig {
	defaults: HashMap<String, String>,
	wheres: HashMap<String, Condition>,
	name: Option<String>,
	dependencies: Vec<String>,
}

/// A pattern bound to an action.
///
/// Configuration methods take `&self` and return `&Self` so a route handed
/// back from [`Router::create_route`](crate::Router::create_route) can be
/// configured in a chain:
///
/// ```
/// use wayfarer_urls::{Action, Condition, Router};
///
/// let router = Router::new();
/// router
///     .create_route("user/{id}/{action?}", Action::token("users"))?
///     .where_("id", Condition::regex(r"^\d+$")?)?
///     .default("action", "profile")?
///     .named("user")?;
/// # Ok::<(), wayfarer_urls::RouterError>(())
/// ```
pub struct Route {
	pattern: PathPattern,
	action: Action,
	config: RwLock<RouteConfig>,
}

impl Route {
	/// Compiles `pattern` with the default limits.
	pub fn new(pattern: &str, action: Action) -> RouterResult<Self> {
		Self::with_limits(pattern, action, &PatternLimits::default())
	}

	/// Compiles `pattern` under `limits`.
	pub fn with_limits(pattern: &str, action: Action, limits: &PatternLimits) -> RouterResult<Self> {
		Ok(Self {
			pattern: PathPattern::with_limits(pattern, limits)?,
			action,
			config: RwLock::new(RouteConfig::default()),
		})
	}

	/// Requires `param` to satisfy `condition`.
	pub fn where_(&self, param: &str, condition: impl Into<Condition>) -> RouterResult<&Self> {
		self.ensure_parameter(param)?;
		let mut config = self.config.write();
		if config.wheres.contains_key(param) {
			return Err(RouterError::DuplicateWhere(param.to_string()));
		}
		config.wheres.insert(param.to_string(), condition.into());
		Ok(self)
	}

	/// Supplies a value for `param` when the URI does not.
	pub fn default(&self, param: &str, value: impl ToString) -> RouterResult<&Self> {
		self.ensure_parameter(param)?;
		let mut config = self.config.write();
		if config.defaults.contains_key(param) {
			return Err(RouterError::DuplicateDefault(param.to_string()));
		}
		config.defaults.insert(param.to_string(), value.to_string());
		Ok(self)
	}

	/// Labels the route for reverse routing.
	pub fn named(&self, name: impl Into<String>) -> RouterResult<&Self> {
		let mut config = self.config.write();
		if let Some(existing) = &config.name {
			return Err(RouterError::NameAlreadySet(existing.clone()));
		}
		config.name = Some(name.into());
		Ok(self)
	}

	/// Declares dependencies to resolve on every dispatch. Names already
	/// declared are ignored.
	pub fn with<I, S>(&self, dependencies: I) -> &Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		let mut config = self.config.write();
		for dependency in dependencies {
			let dependency = dependency.into();
			if !config.dependencies.contains(&dependency) {
				config.dependencies.push(dependency);
			}
		}
		self
	}

	fn ensure_parameter(&self, param: &str) -> RouterResult<()> {
		if self.pattern.param_names().iter().any(|name| name == param) {
			Ok(())
		} else {
			Err(RouterError::UnknownParameter {
				param: param.to_string(),
				pattern: self.pattern.pattern().to_string(),
			})
		}
	}

	/// Matches `uri` against this route.
	///
	/// Defaults fill absent parameters, then every where condition is
	/// checked against the present values. Any failure is `None`.
	pub fn params_from_uri(&self, uri: &str) -> Option<RouteMatch> {
		let captures = self.pattern.captures(uri)?;
		let config = self.config.read();

		let args: Vec<Option<String>> = self
			.pattern
			.param_names()
			.iter()
			.zip(captures)
			.map(|(name, captured)| captured.or_else(|| config.defaults.get(name).cloned()))
			.collect();

		let params: HashMap<String, String> = self
			.pattern
			.param_names()
			.iter()
			.zip(&args)
			.filter_map(|(name, value)| value.as_ref().map(|v| (name.clone(), v.clone())))
			.collect();

		let rejected = config.wheres.iter().any(|(param, condition)| {
			params
				.get(param)
				.is_some_and(|value| !condition.check(value))
		});
		if rejected {
			return None;
		}

		Some(RouteMatch { params, args })
	}

	/// Builds a URI from `params` merged over the defaults.
	///
	/// # Errors
	///
	/// - [`RouterError::UnmetCondition`] if a value fails its where condition
	/// - [`RouterError::MissingParameter`] if a required placeholder has no value
	/// - [`RouterError::InvalidParameterValue`] if a value cannot be substituted
	pub fn uri_from_params<I, K, V>(&self, params: I) -> RouterResult<String>
	where
		I: IntoIterator<Item = (K, V)>,
		K: Into<String>,
		V: ToString,
	{
		let config = self.config.read();
		let mut merged = config.defaults.clone();
		for (key, value) in params {
			merged.insert(key.into(), value.to_string());
		}

		for (param, condition) in &config.wheres {
			if let Some(value) = merged.get(param) {
				if !condition.check(value) {
					return Err(RouterError::UnmetCondition {
						param: param.clone(),
						value: value.clone(),
					});
				}
			}
		}

		self.pattern.generate(&merged)
	}

	/// The original pattern string.
	pub fn pattern(&self) -> &str {
		self.pattern.pattern()
	}

	/// The compiled pattern.
	pub fn path_pattern(&self) -> &PathPattern {
		&self.pattern
	}

	/// The anchored regex used for matching.
	pub fn matcher(&self) -> &Regex {
		self.pattern.regex()
	}

	/// Parameter names in capture order.
	pub fn parameter_names(&self) -> &[String] {
		self.pattern.param_names()
	}

	/// The bound action.
	pub fn action(&self) -> &Action {
		&self.action
	}

	/// The route name, if set.
	pub fn name(&self) -> Option<String> {
		self.config.read().name.clone()
	}

	/// Declared dependency names in order.
	pub fn dependency_names(&self) -> Vec<String> {
		self.config.read().dependencies.clone()
	}

	/// The default for `param`, if any.
	pub fn default_for(&self, param: &str) -> Option<String> {
		self.config.read().defaults.get(param).cloned()
	}
}

impl fmt::Debug for Route {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let config = self.config.read();
		f.debug_struct("Route")
			.field("pattern", &self.pattern.pattern())
			.field("action", &self.action)
			.field("name", &config.name)
			.field("defaults", &config.defaults)
			.field("wheres", &config.wheres)
			.field("dependencies", &config.dependencies)
			.finish()
	}
}
