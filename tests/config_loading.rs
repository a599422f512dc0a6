// tests/config_loading.rs

use std::io::Write;
use std::path::PathBuf;

use tempfile::NamedTempFile;

use konawatch::config::{load_and_validate, load_or_default, RunnerOptions, RunnerOverrides};
use konawatch::errors::KonawatchError;
use konawatch::types::FormatterKind;

fn config_file(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "{}", contents).unwrap();
    file
}

#[test]
fn full_config_is_loaded() {
    let file = config_file(
        r#"
[runner]
notification = false
rails_environment_file = "test/dummy/config/environment"
formatter = "quiet"
run_all_on_start = true
suite_root = "test/javascripts"

[engine]
cmd = "bin/rake konacha:run"

[notifier]
cmd = "notify-send \"$KONAWATCH_TITLE\" \"$KONAWATCH_MESSAGE\""
title = "JS specs"

[watch]
exclude = ["**/*.swp"]
debounce_ms = 250

[[watch.rule]]
pattern = '^lib/(.+)\.js$'
target = "test/javascripts/${1}_test.js"
"#,
    );

    let cfg = load_and_validate(file.path(), RunnerOverrides::default()).unwrap();

    assert!(!cfg.runner.notification);
    assert!(cfg.runner.run_all_on_start);
    assert_eq!(cfg.runner.formatter, FormatterKind::Quiet);
    assert_eq!(
        cfg.runner.rails_environment_file,
        PathBuf::from("test/dummy/config/environment")
    );
    assert_eq!(cfg.runner.suite_root, PathBuf::from("test/javascripts"));
    assert_eq!(cfg.engine.cmd, "bin/rake konacha:run");
    assert_eq!(cfg.notifier.title, "JS specs");
    assert_eq!(cfg.watch.debounce_ms, 250);
    assert_eq!(cfg.watch.rules.len(), 1);
    assert_eq!(
        cfg.watch.rules[0].target.as_deref(),
        Some("test/javascripts/${1}_test.js")
    );
}

#[test]
fn empty_config_uses_defaults() {
    let file = config_file("");
    let cfg = load_and_validate(file.path(), RunnerOverrides::default()).unwrap();

    assert_eq!(cfg.runner, RunnerOptions::default());
    assert_eq!(cfg.engine.cmd, "bundle exec rake konacha:run");
    assert_eq!(cfg.notifier.cmd, None);
    assert_eq!(cfg.notifier.title, "Konacha Specs");
    assert!(cfg.watch.rules.is_empty());
}

#[test]
fn cli_overrides_win_over_file() {
    let file = config_file(
        r#"
[runner]
notification = true
run_all_on_start = false
"#,
    );
    let cli = RunnerOverrides {
        notification: Some(false),
        ..Default::default()
    };

    let cfg = load_and_validate(file.path(), cli).unwrap();
    assert!(!cfg.runner.notification);
    assert!(!cfg.runner.run_all_on_start);
}

#[test]
fn missing_file_means_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let cli = RunnerOverrides {
        run_all_on_start: Some(true),
        ..Default::default()
    };

    let cfg = load_or_default(dir.path().join("Konawatch.toml"), cli).unwrap();
    assert!(cfg.runner.run_all_on_start);
    assert!(cfg.runner.notification);
}

#[test]
fn unknown_formatter_is_a_toml_error() {
    let file = config_file(
        r#"
[runner]
formatter = "dots"
"#,
    );

    match load_and_validate(file.path(), RunnerOverrides::default()) {
        Err(KonawatchError::TomlError(_)) => {}
        other => panic!("Expected TomlError, got: {:?}", other),
    }
}

#[test]
fn unknown_runner_key_is_rejected() {
    let file = config_file(
        r#"
[runner]
notifications = false
"#,
    );

    assert!(matches!(
        load_and_validate(file.path(), RunnerOverrides::default()),
        Err(KonawatchError::TomlError(_))
    ));
}

#[test]
fn invalid_rule_regex_returns_structured_error() {
    let file = config_file(
        r#"
[[watch.rule]]
pattern = "(unclosed"
"#,
    );

    match load_and_validate(file.path(), RunnerOverrides::default()) {
        Err(KonawatchError::RegexError(_)) => {}
        other => panic!("Expected RegexError, got: {:?}", other),
    }
}

#[test]
fn empty_suite_root_returns_config_error() {
    let file = config_file(
        r#"
[runner]
suite_root = ""
"#,
    );

    match load_and_validate(file.path(), RunnerOverrides::default()) {
        Err(KonawatchError::ConfigError(msg)) => assert!(msg.contains("suite_root")),
        other => panic!("Expected ConfigError, got: {:?}", other),
    }
}

#[test]
fn empty_engine_command_returns_config_error() {
    let file = config_file(
        r#"
[engine]
cmd = "  "
"#,
    );

    match load_and_validate(file.path(), RunnerOverrides::default()) {
        Err(KonawatchError::ConfigError(msg)) => assert!(msg.contains("[engine].cmd")),
        other => panic!("Expected ConfigError, got: {:?}", other),
    }
}

#[test]
fn invalid_exclude_glob_returns_glob_error() {
    let file = config_file(
        r#"
[watch]
exclude = ["spec/[unclosed"]
"#,
    );

    assert!(matches!(
        load_and_validate(file.path(), RunnerOverrides::default()),
        Err(KonawatchError::GlobError(_))
    ));
}
