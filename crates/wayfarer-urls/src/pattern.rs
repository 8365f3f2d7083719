//! Route pattern compilation.
//!
//! A pattern is a `/`-separated list of segments. Each segment is either
//! literal text or exactly one placeholder:
//!
//! - `{name}` - required single segment
//! - `{name?}` - optional single segment
//! - `{name...}` - required, spans any number of segments
//! - `{name...?}` - optional, spans any number of segments
//!
//! Leading and trailing `/` are insignificant on both the pattern and the
//! matched input.

use crate::error::{RouterError, RouterResult};
use regex::{Regex, RegexBuilder};
use std::collections::HashMap;
use std::fmt;

/// Maximum allowed length for a pattern string in bytes.
pub const DEFAULT_MAX_PATTERN_LENGTH: usize = 1024;

/// Maximum allowed number of path segments in a pattern.
pub const DEFAULT_MAX_PATH_SEGMENTS: usize = 32;

/// Maximum allowed size for a compiled pattern regex (in bytes).
pub const DEFAULT_MAX_REGEX_SIZE: usize = 1 << 20; // 1 MiB

/// Bounds applied when compiling a pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PatternLimits {
	/// Longest accepted pattern, in bytes.
	pub max_length: usize,
	/// Largest accepted number of segments.
	pub max_segments: usize,
	/// Size limit handed to the regex compiler.
	pub max_regex_size: usize,
}

impl Default for PatternLimits {
	fn default() -> Self {
		Self {
			max_length: DEFAULT_MAX_PATTERN_LENGTH,
			max_segments: DEFAULT_MAX_PATH_SEGMENTS,
			max_regex_size: DEFAULT_MAX_REGEX_SIZE,
		}
	}
}

/// The four placeholder flavours.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaceholderKind {
	/// `{name}`
	Required,
	/// `{name?}`
	Optional,
	/// `{name...}`
	Rest,
	/// `{name...?}`
	OptionalRest,
}

impl PlaceholderKind {
	/// Whether the placeholder may be absent.
	pub fn is_optional(self) -> bool {
		matches!(self, Self::Optional | Self::OptionalRest)
	}

	/// Whether the placeholder spans separators.
	pub fn is_rest(self) -> bool {
		matches!(self, Self::Rest | Self::OptionalRest)
	}

	fn capture(self) -> &'static str {
		if self.is_rest() { "(.+)" } else { "([^/]+)" }
	}
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
	Literal(String),
	Placeholder { name: String, kind: PlaceholderKind },
}

/// A compiled route pattern.
#[derive(Debug, Clone)]
pub struct PathPattern {
	/// The original pattern string.
	pattern: String,
	segments: Vec<Segment>,
	regex: Regex,
	/// Parameter names in capture order.
	param_names: Vec<String>,
}

impl PathPattern {
	/// Compiles `pattern` with the default limits.
	pub fn new(pattern: &str) -> RouterResult<Self> {
		Self::with_limits(pattern, &PatternLimits::default())
	}

	/// Compiles `pattern`, rejecting it if it exceeds `limits`.
	///
	/// # Errors
	///
	/// Returns [`RouterError::InvalidPattern`] if:
	/// - the pattern is longer than `limits.max_length`
	/// - it has more segments than `limits.max_segments`
	/// - a `{` is never closed
	/// - a placeholder shares its segment with literal text
	/// - a parameter name is empty or repeated
	/// - the compiled regex exceeds `limits.max_regex_size`
	pub fn with_limits(pattern: &str, limits: &PatternLimits) -> RouterResult<Self> {
		// Reject patterns exceeding the maximum length to prevent ReDoS
		if pattern.len() > limits.max_length {
			return Err(RouterError::invalid_pattern(
				pattern,
				format!(
					"length {} exceeds maximum allowed length of {} bytes",
					pattern.len(),
					limits.max_length
				),
			));
		}

		let trimmed = pattern.trim_matches('/');
		let raw_segments: Vec<&str> = if trimmed.is_empty() {
			Vec::new()
		} else {
			trimmed.split('/').collect()
		};
		if raw_segments.len() > limits.max_segments {
			return Err(RouterError::invalid_pattern(
				pattern,
				format!(
					"{} path segments, exceeding maximum of {}",
					raw_segments.len(),
					limits.max_segments
				),
			));
		}

		let mut segments = Vec::with_capacity(raw_segments.len());
		let mut param_names: Vec<String> = Vec::new();
		for raw in raw_segments {
			let segment = parse_segment(pattern, raw)?;
			if let Segment::Placeholder { name, .. } = &segment {
				if param_names.contains(name) {
					return Err(RouterError::invalid_pattern(
						pattern,
						format!("duplicate parameter name \"{}\"", name),
					));
				}
				param_names.push(name.clone());
			}
			segments.push(segment);
		}

		let regex_str = compile_regex(&segments);
		let regex = RegexBuilder::new(&regex_str)
			.size_limit(limits.max_regex_size)
			.build()
			.map_err(|e| RouterError::invalid_pattern(pattern, e.to_string()))?;

		Ok(Self {
			pattern: pattern.to_string(),
			segments,
			regex,
			param_names,
		})
	}

	/// Returns the original pattern string.
	pub fn pattern(&self) -> &str {
		&self.pattern
	}

	/// Returns the parameter names in capture order.
	pub fn param_names(&self) -> &[String] {
		&self.param_names
	}

	/// Returns the compiled, anchored matcher.
	pub fn regex(&self) -> &Regex {
		&self.regex
	}

	/// Returns the kind of the named placeholder.
	pub fn kind_of(&self, name: &str) -> Option<PlaceholderKind> {
		self.segments.iter().find_map(|segment| match segment {
			Segment::Placeholder { name: n, kind } if n == name => Some(*kind),
			_ => None,
		})
	}

	/// Whether the pattern has no placeholders.
	pub fn is_exact(&self) -> bool {
		self.param_names.is_empty()
	}

	/// Matches `path`, returning one entry per parameter in capture order.
	///
	/// Absent optional placeholders yield `None`.
	pub fn captures(&self, path: &str) -> Option<Vec<Option<String>>> {
		let caps = self.regex.captures(path.trim_matches('/'))?;
		Some(
			(1..=self.param_names.len())
				.map(|i| caps.get(i).map(|m| m.as_str().to_string()))
				.collect(),
		)
	}

	/// Checks if this pattern would match the given path.
	pub fn is_match(&self, path: &str) -> bool {
		self.regex.is_match(path.trim_matches('/'))
	}

	/// Substitutes `values` into the pattern.
	///
	/// An optional placeholder without a value is dropped together with its
	/// separator. A leading or trailing `/` on the pattern is preserved.
	///
	/// # Errors
	///
	/// - [`RouterError::MissingParameter`] for a required placeholder without a value
	/// - [`RouterError::InvalidParameterValue`] for an empty required value,
	///   or a single-segment value containing `/`
	pub fn generate(&self, values: &HashMap<String, String>) -> RouterResult<String> {
		let mut parts: Vec<&str> = Vec::with_capacity(self.segments.len());
		for segment in &self.segments {
			match segment {
				Segment::Literal(text) => parts.push(text),
				Segment::Placeholder { name, kind } => {
					let value = values.get(name).map(String::as_str).filter(|v| !v.is_empty());
					match value {
						None if kind.is_optional() => {}
						None if values.contains_key(name) => {
							return Err(RouterError::InvalidParameterValue {
								param: name.clone(),
								value: String::new(),
							});
						}
						None => return Err(RouterError::MissingParameter(name.clone())),
						Some(value) => {
							if !kind.is_rest() && value.contains('/') {
								return Err(RouterError::InvalidParameterValue {
									param: name.clone(),
									value: value.to_string(),
								});
							}
							parts.push(value);
						}
					}
				}
			}
		}

		let body = parts.join("/");
		let leading = self.pattern.starts_with('/');
		let trailing = self.pattern.len() > 1 && self.pattern.ends_with('/');
		if body.is_empty() {
			return Ok(if leading || trailing { "/".to_string() } else { body });
		}

		let mut uri = String::with_capacity(body.len() + 2);
		if leading {
			uri.push('/');
		}
		uri.push_str(&body);
		if trailing {
			uri.push('/');
		}
		Ok(uri)
	}
}

fn parse_segment(pattern: &str, raw: &str) -> RouterResult<Segment> {
	let Some(open) = raw.find('{') else {
		if raw.contains('}') {
			return Err(RouterError::invalid_pattern(
				pattern,
				format!("unmatched '}}' in segment \"{}\"", raw),
			));
		}
		return Ok(Segment::Literal(raw.to_string()));
	};

	let Some(close) = raw[open..].find('}').map(|i| open + i) else {
		return Err(RouterError::invalid_pattern(
			pattern,
			format!("unterminated placeholder in segment \"{}\"", raw),
		));
	};

	if open != 0 || close != raw.len() - 1 {
		return Err(RouterError::invalid_pattern(
			pattern,
			format!("placeholder must occupy a whole path segment: \"{}\"", raw),
		));
	}

	let inner = &raw[1..close];
	if inner.contains('{') {
		return Err(RouterError::invalid_pattern(
			pattern,
			format!("nested placeholder in segment \"{}\"", raw),
		));
	}

	let (name, kind) = if let Some(name) = inner.strip_suffix("...?") {
		(name, PlaceholderKind::OptionalRest)
	} else if let Some(name) = inner.strip_suffix("...") {
		(name, PlaceholderKind::Rest)
	} else if let Some(name) = inner.strip_suffix('?') {
		(name, PlaceholderKind::Optional)
	} else {
		(inner, PlaceholderKind::Required)
	};

	if name.is_empty() {
		return Err(RouterError::invalid_pattern(pattern, "empty parameter name"));
	}
	if name.contains(['?', '.']) {
		return Err(RouterError::invalid_pattern(
			pattern,
			format!("malformed placeholder \"{}\"", raw),
		));
	}

	Ok(Segment::Placeholder {
		name: name.to_string(),
		kind,
	})
}

fn compile_regex(segments: &[Segment]) -> String {
	// Optional placeholders ahead of the first mandatory segment carry their
	// trailing separator, so an absent one leaves no stray `/` behind.
	let first_mandatory = segments.iter().position(|segment| match segment {
		Segment::Literal(_) => true,
		Segment::Placeholder { kind, .. } => !kind.is_optional(),
	});

	let mut regex_str = String::from("^");
	for (index, segment) in segments.iter().enumerate() {
		let leading = first_mandatory.is_some_and(|first| index < first);
		let sep = if index == 0 || first_mandatory == Some(index) { "" } else { "/" };
		match segment {
			Segment::Literal(text) => {
				regex_str.push_str(sep);
				regex_str.push_str(&regex::escape(text));
			}
			Segment::Placeholder { kind, .. } if leading => {
				regex_str.push_str("(?:");
				regex_str.push_str(kind.capture());
				regex_str.push_str("/)?");
			}
			Segment::Placeholder { kind, .. } if kind.is_optional() => {
				regex_str.push_str("(?:");
				regex_str.push_str(sep);
				regex_str.push_str(kind.capture());
				regex_str.push_str(")?");
			}
			Segment::Placeholder { kind, .. } => {
				regex_str.push_str(sep);
				regex_str.push_str(kind.capture());
			}
		}
	}
	regex_str.push('$');
	regex_str
}

impl PartialEq for PathPattern {
	fn eq(&self, other: &Self) -> bool {
		self.pattern == other.pattern
	}
}

impl Eq for PathPattern {}

impl fmt::Display for PathPattern {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.pattern)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	fn values(pairs: &[(&str, &str)]) -> HashMap<String, String> {
		pairs
			.iter()
			.map(|(k, v)| (k.to_string(), v.to_string()))
			.collect()
	}

	#[rstest]
	fn test_exact_pattern() {
		let pattern = PathPattern::new("/users/").unwrap();
		assert!(pattern.is_exact());
		assert!(pattern.is_match("users"));
		assert!(pattern.is_match("/users/"));
		assert!(!pattern.is_match("/users/123/"));
	}

	#[rstest]
	fn test_single_param() {
		let pattern = PathPattern::new("users/{id}").unwrap();

		assert_eq!(
			pattern.captures("/users/42/"),
			Some(vec![Some("42".to_string())])
		);
		assert!(!pattern.is_match("users"));
		assert!(!pattern.is_match("users/42/extra"));
	}

	#[rstest]
	#[case("files/{path...}", "files/a/b/c", Some(vec![Some("a/b/c".to_string())]))]
	#[case("files/{path...}", "files", None)]
	#[case("files/{path...?}", "files", Some(vec![None]))]
	#[case("files/{name?}", "files", Some(vec![None]))]
	#[case("files/{name?}", "files/a/b", None)]
	#[case("{lang?}/home", "home", Some(vec![None]))]
	#[case("{lang?}/home", "/en/home/", Some(vec![Some("en".to_string())]))]
	#[case("{lang?}/home", "en", None)]
	#[case("{lang?}/{page}", "about", Some(vec![None, Some("about".to_string())]))]
	#[case("{prefix...?}/home", "a/b/home", Some(vec![Some("a/b".to_string())]))]
	fn test_placeholder_kinds(
		#[case] pattern: &str,
		#[case] path: &str,
		#[case] expected: Option<Vec<Option<String>>>,
	) {
		let pattern = PathPattern::new(pattern).unwrap();
		assert_eq!(pattern.captures(path), expected);
	}

	#[rstest]
	fn test_param_names_follow_capture_order() {
		let pattern = PathPattern::new("/a/{x}/b/{y?}/{z...?}").unwrap();
		assert_eq!(pattern.param_names(), &["x", "y", "z"]);
		assert_eq!(pattern.kind_of("y"), Some(PlaceholderKind::Optional));
		assert_eq!(pattern.kind_of("z"), Some(PlaceholderKind::OptionalRest));
	}

	#[rstest]
	fn test_special_chars_escaped() {
		let pattern = PathPattern::new("/api/v1.0/").unwrap();
		assert!(pattern.is_match("/api/v1.0/"));
		assert!(!pattern.is_match("/api/v1X0/"));
	}

	#[rstest]
	#[case("users/{id", "unterminated")]
	#[case("users/id}", "unmatched")]
	#[case("users/x{id}", "whole path segment")]
	#[case("users/{id}x", "whole path segment")]
	#[case("users/{}", "empty parameter name")]
	#[case("users/{?}", "empty parameter name")]
	#[case("{id}/{id}", "duplicate parameter name")]
	fn test_malformed_patterns_are_rejected(#[case] pattern: &str, #[case] reason: &str) {
		// Act
		let result = PathPattern::new(pattern);

		// Assert
		match result {
			Err(RouterError::InvalidPattern { reason: got, .. }) => {
				assert!(got.contains(reason), "{} does not mention {}", got, reason)
			}
			other => panic!("Expected InvalidPattern, got {:?}", other),
		}
	}

	#[rstest]
	fn test_pattern_rejects_excessive_length() {
		// Arrange: a pattern exceeding 1024 bytes
		let long_pattern = "/".to_string() + &"a".repeat(1025);

		// Act
		let result = PathPattern::new(&long_pattern);

		// Assert
		assert!(matches!(
			result,
			Err(RouterError::InvalidPattern { ref reason, .. }) if reason.contains("exceeds maximum allowed length")
		));
	}

	#[rstest]
	fn test_pattern_rejects_excessive_segments() {
		// Arrange: a pattern with more than 32 segments
		let segments: Vec<&str> = (0..35).map(|_| "seg").collect();
		let pattern = format!("/{}/", segments.join("/"));

		// Act
		let result = PathPattern::new(&pattern);

		// Assert
		assert!(matches!(result, Err(RouterError::InvalidPattern { .. })));
	}

	#[rstest]
	fn test_custom_limits() {
		let limits = PatternLimits {
			max_segments: 2,
			..PatternLimits::default()
		};

		assert!(PathPattern::with_limits("a/b", &limits).is_ok());
		assert!(PathPattern::with_limits("a/b/c", &limits).is_err());
	}

	#[rstest]
	fn test_generate_drops_absent_optional_with_separator() {
		let pattern = PathPattern::new("user/{id}/{action?}/{opts...?}").unwrap();

		let uri = pattern.generate(&values(&[("id", "7"), ("opts", "a/b")]));

		assert_eq!(uri, Ok("user/7/a/b".to_string()));
	}

	#[rstest]
	#[case(&[])]
	#[case(&[("lang", "en")])]
	fn test_leading_optional_round_trips(#[case] given: &[(&str, &str)]) {
		// Arrange
		let pattern = PathPattern::new("{lang?}/home").unwrap();

		// Act
		let uri = pattern.generate(&values(given)).unwrap();
		let captured = pattern.captures(&uri);

		// Assert
		let lang = given.first().map(|(_, v)| v.to_string());
		assert_eq!(captured, Some(vec![lang]));
	}

	#[rstest]
	fn test_generate_preserves_pattern_slashes() {
		let pattern = PathPattern::new("/users/{id}/").unwrap();

		assert_eq!(
			pattern.generate(&values(&[("id", "42")])),
			Ok("/users/42/".to_string())
		);
	}

	#[rstest]
	fn test_generate_missing_required() {
		let pattern = PathPattern::new("/users/{id}/").unwrap();

		assert_eq!(
			pattern.generate(&HashMap::new()),
			Err(RouterError::MissingParameter("id".to_string()))
		);
	}

	#[rstest]
	fn test_generate_rejects_separator_in_single_segment() {
		let pattern = PathPattern::new("users/{id}").unwrap();

		let result = pattern.generate(&values(&[("id", "1/2")]));

		assert!(matches!(result, Err(RouterError::InvalidParameterValue { .. })));
	}

	#[rstest]
	fn test_empty_pattern_matches_root() {
		let pattern = PathPattern::new("/").unwrap();

		assert!(pattern.is_match(""));
		assert!(pattern.is_match("/"));
		assert_eq!(pattern.generate(&HashMap::new()), Ok("/".to_string()));
	}

	#[rstest]
	fn test_pattern_display() {
		let pattern = PathPattern::new("/users/{id}/").unwrap();
		assert_eq!(format!("{}", pattern), "/users/{id}/");
	}
}
