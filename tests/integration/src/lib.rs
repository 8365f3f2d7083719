//! Shared fixtures for the end-to-end tests.

use parking_lot::Mutex;
use std::sync::Arc;
use wayfarer::prelude::*;

/// Append-only event log shared between controllers, handlers and tests.
#[derive(Debug, Default)]
pub struct Journal {
	entries: Mutex<Vec<String>>,
}

impl Journal {
	pub fn record(&self, entry: impl Into<String>) {
		self.entries.lock().push(entry.into());
	}

	pub fn entries(&self) -> Vec<String> {
		self.entries.lock().clone()
	}
}

/// An application with a shared [`Journal`] registered as `"journal"`.
pub fn journaled_app() -> (Application, Arc<Journal>) {
	let app = Application::new();
	let journal = Arc::new(Journal::default());
	app.resolver()
		.instance("journal", Arc::clone(&journal))
		.expect("journal registers once");
	(app, journal)
}

/// Handler that records every `String` response it is offered and claims
/// the one equal to `claim`.
pub struct Recorder {
	pub label: &'static str,
	pub journal: Arc<Journal>,
	pub claim: &'static str,
}

impl RouteHandler for Recorder {
	fn handle_response(&self, response: &Response) -> bool {
		let text = response.downcast_ref::<String>().cloned().unwrap_or_default();
		self.journal.record(format!("{}:{}", self.label, text));
		text == self.claim
	}
}
