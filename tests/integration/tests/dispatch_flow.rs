//! End-to-end dispatch through the application facade.

use rstest::{fixture, rstest};
use std::io::Write;
use std::sync::Arc;
use wayfarer::prelude::*;
use wayfarer_integration_tests::{Journal, Recorder, journaled_app};

#[fixture]
fn app() -> (Application, Arc<Journal>) {
	journaled_app()
}

#[rstest]
fn test_route_receives_resolved_dependency(app: (Application, Arc<Journal>)) {
	// Arrange
	let (app, journal) = app;
	app.route(
		"notes/{title}",
		Action::callable(|inv| -> RouterResult<String> {
			let journal = inv.dependency::<Journal>("journal")?;
			let title = inv.param("title").unwrap_or_default().to_string();
			journal.record(format!("note:{}", title));
			Ok(title)
		}),
	)
	.unwrap()
	.with(["journal"]);

	// Act
	let response = app.dispatch("/notes/groceries/").unwrap().unwrap();

	// Assert
	assert_eq!(response.into_inner::<String>().as_deref(), Some("groceries"));
	assert_eq!(journal.entries(), ["note:groceries"]);
}

#[rstest]
fn test_handler_chain_stops_at_first_claim(app: (Application, Arc<Journal>)) {
	// Arrange
	let (app, journal) = app;
	app.route("say/{word}", Action::callable(|inv| inv.arg(0).unwrap_or_default().to_string()))
		.unwrap();
	app.router().add_handler(HandlerRef::instance(Arc::new(Recorder {
		label: "first",
		journal: Arc::clone(&journal),
		claim: "b",
	})));
	app.router().add_handler(HandlerRef::instance(Arc::new(Recorder {
		label: "second",
		journal: Arc::clone(&journal),
		claim: "a",
	})));

	// Act
	app.dispatch("say/a").unwrap();
	app.dispatch("say/b").unwrap();

	// Assert
	assert_eq!(journal.entries(), ["first:a", "second:a", "first:b"]);
}

#[rstest]
fn test_unmatched_uri_yields_nothing(app: (Application, Arc<Journal>)) {
	let (app, _) = app;
	app.route("only/here", Action::callable(|_| "here")).unwrap();

	let response = app.dispatch("somewhere/else").unwrap();

	assert!(response.is_none());
}

#[rstest]
fn test_where_rejects_forward_and_errors_in_reverse(app: (Application, Arc<Journal>)) {
	// Arrange
	let (app, _) = app;
	app.route("item/{id}/{view?}", Action::callable(|inv| inv.param("view").unwrap_or_default().to_string()))
		.unwrap()
		.where_("id", Condition::regex(r"^\d+$").unwrap())
		.unwrap()
		.default("view", "summary")
		.unwrap()
		.named("item")
		.unwrap();

	// Act
	let matched = app.dispatch("item/12").unwrap();
	let rejected = app.dispatch("item/twelve").unwrap();
	let url = app.url("item", [("id", "12")]).unwrap();
	let bad_url = app.url("item", [("id", "twelve")]);

	// Assert
	assert_eq!(
		matched.and_then(|r| r.into_inner::<String>()).as_deref(),
		Some("summary")
	);
	assert!(rejected.is_none());
	assert_eq!(url.as_deref(), Some("item/12/summary"));
	assert!(matches!(bad_url, Err(RouterError::UnmetCondition { .. })));
}

#[rstest]
fn test_unknown_route_name_has_no_url(app: (Application, Arc<Journal>)) {
	let (app, _) = app;

	let url = app.url("nope", Vec::<(String, String)>::new()).unwrap();

	assert!(url.is_none());
}

#[rstest]
fn test_missing_dependency_surfaces_as_error(app: (Application, Arc<Journal>)) {
	let (app, _) = app;
	app.route("needs", Action::callable(|_| ())).unwrap().with(["absent"]);

	let result = app.dispatch("needs");

	assert!(matches!(result, Err(RouterError::Dependency(DiError::NotRegistered(_)))));
}

#[rstest]
fn test_settings_file_limits_apply() {
	// Arrange
	let mut file = tempfile::NamedTempFile::new().unwrap();
	writeln!(file, "[router]\nmax_pattern_length = 8").unwrap();
	let settings = Settings::from_file(file.path()).unwrap();
	let app = Application::with_settings(settings).unwrap();

	// Act
	let short = app.route("a/{b}", Action::callable(|_| ()));
	let long = app.route("much/too/long/{pattern}", Action::callable(|_| ()));

	// Assert
	assert!(short.is_ok());
	assert!(matches!(long, Err(RouterError::InvalidPattern { .. })));
}
