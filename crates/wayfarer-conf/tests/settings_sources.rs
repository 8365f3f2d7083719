//! Loading settings from files, layered under environment overrides.

use rstest::rstest;
use std::io::Write;
use tempfile::NamedTempFile;
use wayfarer_conf::{Settings, SettingsError};

fn write_toml(contents: &str) -> NamedTempFile {
	let mut file = NamedTempFile::new().unwrap();
	file.write_all(contents.as_bytes()).unwrap();
	file.flush().unwrap();
	file
}

#[rstest]
fn test_file_then_env_layering() {
	// Arrange
	let file = write_toml(
		r#"
[router]
max_pattern_length = 512
max_path_segments = 8

[logging]
level = "warn"
"#,
	);

	// Act
	let mut settings = Settings::from_file(file.path()).unwrap();
	settings
		.apply_env_from([("WAYFARER_ROUTER_MAX_PATH_SEGMENTS", "4")])
		.unwrap();

	// Assert
	assert_eq!(settings.router.max_pattern_length, 512);
	assert_eq!(settings.router.max_path_segments, 4);
	assert_eq!(settings.logging.level, "warn");
	assert_eq!(settings.resolver.max_resolution_depth, 100);
	assert!(settings.validate().is_ok());
}

#[rstest]
fn test_missing_file_is_io_error() {
	let dir = tempfile::tempdir().unwrap();

	let result = Settings::from_file(dir.path().join("absent.toml"));

	assert!(matches!(result, Err(SettingsError::Io(_))));
}

#[rstest]
fn test_wrong_type_in_file() {
	let file = write_toml("[resolver]\nmax_resolution_depth = \"deep\"\n");

	let result = Settings::from_file(file.path());

	assert!(matches!(result, Err(SettingsError::Toml(_))));
}

#[rstest]
fn test_zero_limit_from_file_fails_validation() {
	let file = write_toml("[router]\nmax_path_segments = 0\n");

	let settings = Settings::from_file(file.path()).unwrap();

	assert!(matches!(settings.validate(), Err(SettingsError::Invalid(_))));
}
