//! Controller swapping as seen through the application facade.

use rstest::{fixture, rstest};
use std::sync::Arc;
use wayfarer::controllers::ControllerType;
use wayfarer::prelude::*;
use wayfarer_integration_tests::{Journal, Recorder, journaled_app};

struct PostsController {
	journal: Arc<Journal>,
}

impl Controller for PostsController {
	fn load(&mut self) {
		self.journal.record("posts.load");
	}

	fn unload(&mut self) {
		self.journal.record("posts.unload");
	}
}

impl Injectable for PostsController {
	const DEPENDENCIES: &'static [&'static str] = &["journal"];

	fn construct(deps: &Dependencies) -> DiResult<Self> {
		Ok(Self {
			journal: deps.get::<Journal>(0)?,
		})
	}
}

struct AccountSettingsController {
	journal: Arc<Journal>,
}

impl Controller for AccountSettingsController {
	fn load(&mut self) {
		self.journal.record("account.load");
	}

	fn unload(&mut self) {
		self.journal.record("account.unload");
	}
}

impl Injectable for AccountSettingsController {
	const DEPENDENCIES: &'static [&'static str] = &["journal"];

	fn construct(deps: &Dependencies) -> DiResult<Self> {
		Ok(Self {
			journal: deps.get::<Journal>(0)?,
		})
	}
}

#[fixture]
fn app() -> (Application, Arc<Journal>) {
	let (app, journal) = journaled_app();
	app.controller(
		"posts",
		ControllerActions::<PostsController>::new()
			.action("indexAction", &[], |c, _| c.journal.record("posts.index"))
			.action("showAction", &["slug", "_page"], |c, inv| {
				let entry = format!("posts.show:{}:{}", inv.arg(0).unwrap_or_default(), inv.arg(1).unwrap_or("1"));
				c.journal.record(entry.clone());
				entry
			}),
	)
	.unwrap();
	app.controllers()
		.register_default(
			ControllerActions::<AccountSettingsController>::new()
				.action("index", &[], |c, _| c.journal.record("account.index")),
		)
		.unwrap();
	(app, journal)
}

#[rstest]
fn test_generated_routes_in_table_order(app: (Application, Arc<Journal>)) {
	let (app, _) = app;

	let patterns: Vec<String> = app
		.router()
		.routes()
		.iter()
		.map(|r| r.pattern().to_string())
		.collect();

	assert_eq!(patterns, ["posts", "posts/show/{slug}/{page?}", "account-settings"]);
}

#[rstest]
fn test_switching_controllers_unloads_previous(app: (Application, Arc<Journal>)) {
	// Arrange
	let (app, journal) = app;

	// Act
	app.dispatch("posts").unwrap();
	app.dispatch("posts/show/hello").unwrap();
	app.dispatch("account-settings").unwrap();
	app.dispatch("posts/show/hello/2").unwrap();

	// Assert
	assert_eq!(
		journal.entries(),
		[
			"posts.load",
			"posts.index",
			"posts.show:hello:1",
			"posts.unload",
			"account.load",
			"account.index",
			"account.unload",
			"posts.load",
			"posts.show:hello:2",
		]
	);
	assert_eq!(
		app.controllers().active_controller(),
		Some(ControllerType::of::<PostsController>())
	);
}

#[rstest]
fn test_plain_routes_leave_active_controller(app: (Application, Arc<Journal>)) {
	// Arrange
	let (app, journal) = app;
	app.route("ping", Action::callable(|_| "pong")).unwrap();
	app.dispatch("posts").unwrap();

	// Act
	let pong = app.dispatch("ping").unwrap();

	// Assert
	assert_eq!(pong.and_then(|r| r.into_inner::<&str>()), Some("pong"));
	assert_eq!(journal.entries(), ["posts.load", "posts.index"]);
	assert_eq!(
		app.controllers().active_controller(),
		Some(ControllerType::of::<PostsController>())
	);
}

#[rstest]
fn test_controller_responses_reach_later_handlers(app: (Application, Arc<Journal>)) {
	// Arrange
	let (app, journal) = app;
	app.router().add_handler(HandlerRef::instance(Arc::new(Recorder {
		label: "view",
		journal: Arc::clone(&journal),
		claim: "posts.show:a:1",
	})));

	// Act
	let response = app.dispatch("posts/show/a").unwrap();

	// Assert
	assert!(response.is_some());
	assert_eq!(
		journal.entries(),
		["posts.load", "posts.show:a:1", "view:posts.show:a:1"]
	);
}

#[rstest]
fn test_unit_action_is_not_offered(app: (Application, Arc<Journal>)) {
	let (app, journal) = app;
	app.router().add_handler(HandlerRef::instance(Arc::new(Recorder {
		label: "view",
		journal: Arc::clone(&journal),
		claim: "",
	})));

	let response = app.dispatch("posts").unwrap();

	assert!(response.is_some_and(|r| r.is_empty()));
	assert_eq!(journal.entries(), ["posts.load", "posts.index"]);
}
