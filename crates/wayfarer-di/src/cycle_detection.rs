//! Circular dependency detection
//!
//! Resolution threads a [`ResolutionStack`] through every recursive call.
//! The stack records which names are currently being built, so re-entering
//! one of them is reported as a cycle instead of recursing without bound.
//!
//! ## Features
//!
//! - **O(1) Circular Detection**: membership lookup through a `HashSet`
//! - **Depth Limiting**: a configurable cap rejects pathological chains
//! - **Readable paths**: errors show the full `a -> b -> a` chain

use crate::error::{DiError, DiResult};
use std::collections::HashSet;

/// Default maximum resolution depth
pub const DEFAULT_MAX_RESOLUTION_DEPTH: usize = 100;

/// Names currently under construction, in resolution order.
#[derive(Debug, Clone)]
pub struct ResolutionStack {
	/// Set of names currently being resolved
	active: HashSet<String>,
	/// Resolution path (for displaying circular paths)
	path: Vec<String>,
	max_depth: usize,
}

impl ResolutionStack {
	/// Creates an empty stack with the given depth cap.
	pub fn new(max_depth: usize) -> Self {
		Self {
			active: HashSet::new(),
			path: Vec::new(),
			max_depth,
		}
	}

	/// Records the start of resolving `name`.
	///
	/// Fails if `name` is already being resolved further up the stack, or if
	/// the stack is already at its depth cap. On failure the stack is left
	/// unchanged.
	pub fn enter(&mut self, name: &str) -> DiResult<()> {
		if self.active.contains(name) {
			return Err(DiError::CircularDependency {
				name: name.to_string(),
				path: self.cycle_path(name),
			});
		}

		let depth = self.path.len() + 1;
		if depth > self.max_depth {
			return Err(DiError::MaxDepthExceeded(depth));
		}

		self.active.insert(name.to_string());
		self.path.push(name.to_string());
		Ok(())
	}

	/// Records the end of resolving `name`.
	pub fn exit(&mut self, name: &str) {
		self.active.remove(name);
		if let Some(pos) = self.path.iter().rposition(|entry| entry == name) {
			self.path.remove(pos);
		}
	}

	/// Current nesting depth.
	pub fn depth(&self) -> usize {
		self.path.len()
	}

	/// Whether `name` is currently being resolved.
	pub fn contains(&self, name: &str) -> bool {
		self.active.contains(name)
	}

	fn cycle_path(&self, name: &str) -> String {
		match self.path.iter().position(|entry| entry == name) {
			Some(start) => {
				let mut cycle: Vec<&str> = self.path[start..].iter().map(String::as_str).collect();
				cycle.push(name);
				cycle.join(" -> ")
			}
			None => format!("Unknown cycle involving {}", name),
		}
	}
}

impl Default for ResolutionStack {
	fn default() -> Self {
		Self::new(DEFAULT_MAX_RESOLUTION_DEPTH)
	}
}
