//! Integration tests for the bootstrap sequence.

use bootconf::config::Environment;
use bootconf::{Bootstrap, Bootstrapped, Config, Error, Source};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// Base and working directories for one bootstrap.
struct Dirs {
    _tmp: TempDir,
    base: std::path::PathBuf,
    work: std::path::PathBuf,
}

fn dirs() -> Dirs {
    let tmp = TempDir::new().unwrap();
    let base = tmp.path().join("base");
    let work = tmp.path().join("work");
    fs::create_dir_all(&base).unwrap();
    fs::create_dir_all(&work).unwrap();
    Dirs {
        _tmp: tmp,
        base,
        work,
    }
}

fn write(dir: &Path, name: &str, content: &str) {
    fs::write(dir.join(name), content).unwrap();
}

fn bootstrap(dirs: &Dirs, args: &[&str], env: &[(&str, &str)]) -> Bootstrap {
    Bootstrap::new()
        .args(args.iter().copied())
        .env(env.iter().copied().collect::<Environment>())
        .base_dir(&dirs.base)
        .working_dir(&dirs.work)
        .install_logging(false)
}

fn run(dirs: &Dirs, args: &[&str], env: &[(&str, &str)]) -> bootconf::Result<Bootstrapped> {
    bootstrap(dirs, args, env).run()
}

fn config(dirs: &Dirs, args: &[&str], env: &[(&str, &str)]) -> Config {
    run(dirs, args, env).unwrap().config
}

#[test]
fn test_round_trip_trimmed() {
    let dirs = dirs();
    write(&dirs.work, "application.properties", "  db.url =  jdbc:pg://h/db  \n");

    let config = config(&dirs, &[], &[]);
    assert_eq!(config.get_str("db.url").unwrap(), "jdbc:pg://h/db");
}

#[test]
fn test_working_dir_wins_over_base_dir() {
    let dirs = dirs();
    write(&dirs.base, "application.properties", "a=0\nbase.only=yes\n");
    write(&dirs.work, "application.properties", "a=1\n");

    let config = config(&dirs, &[], &[]);
    assert_eq!(config.get_str("a").unwrap(), "1");
    assert_eq!(config.get_str("base.only").unwrap(), "yes");
}

#[test]
fn test_profile_file_overrides_within_directory() {
    let dirs = dirs();
    write(&dirs.work, "application.properties", "b=base\n");
    write(&dirs.work, "application-staging.properties", "b=override\n");

    let config = config(&dirs, &["--runtime.profile=staging"], &[]);
    assert_eq!(config.get_str("b").unwrap(), "override");
}

#[test]
fn test_base_profile_file_loses_to_working_dir_plain_file() {
    let dirs = dirs();
    write(&dirs.base, "application-staging.properties", "c=base-staging\n");
    write(&dirs.work, "application.properties", "c=work\n");

    let config = config(&dirs, &[], &[("RUNTIME_PROFILE", "staging")]);
    assert_eq!(config.get_str("c").unwrap(), "work");
}

#[test]
fn test_full_precedence_chain() {
    let dirs = dirs();
    write(&dirs.work, "application.properties", "k=file\nk2=file\nk3=file\n");

    let config = config(&dirs, &["--k=cli"], &[("K", "env"), ("K2", "env")]);
    assert_eq!(config.lookup("k").map(|(_, s)| s), Some(Source::CommandLine));
    assert_eq!(config.get_str("k").unwrap(), "cli");
    assert_eq!(config.get_str("k2").unwrap(), "env");
    assert_eq!(config.get_str("k3").unwrap(), "file");
    assert_eq!(config.get_str_or("k4", "default"), "default");
    assert_eq!(config.get_str_or("k3", "default"), "file");
}

#[test]
fn test_bare_flag_distinguishable_from_absent() {
    let dirs = dirs();
    let config = config(&dirs, &["--feature"], &[]);
    assert!(config.has("feature"));
    assert_eq!(config.get_str("feature").unwrap(), "");
    assert!(!config.has("other"));
    assert!(config.get_optional("other").is_none());
}

#[test]
fn test_required_missing_property() {
    let dirs = dirs();
    let config = config(&dirs, &[], &[]);
    assert!(matches!(
        config.get("missing").unwrap_err(),
        Error::PropertyNotFound(_)
    ));
    assert_eq!(config.get_or("missing", "d"), "d");
}

#[test]
fn test_env_profile_resolves() {
    let dirs = dirs();
    let config = config(&dirs, &[], &[("RUNTIME_PROFILE", "prod")]);
    assert_eq!(config.profile().as_deref(), Some("prod"));
}

#[test]
fn test_comments_and_blank_lines_contribute_nothing() {
    let dirs = dirs();
    write(
        &dirs.work,
        "application.properties",
        "# foo=bar\n\n    \n#another\n",
    );

    let config = config(&dirs, &[], &[]);
    assert!(config.properties().is_empty());
    assert!(!config.has("foo"));
}

#[test]
fn test_external_file_loaded_last() {
    let dirs = dirs();
    write(&dirs.work, "application.properties", "x=work\n");
    let external = dirs.base.join("external.properties");
    fs::write(&external, "x=external\n").unwrap();

    let arg = format!("--application.properties={}", external.display());
    let config = config(&dirs, &[arg.as_str()], &[]);
    assert_eq!(config.get_str("x").unwrap(), "external");
}

#[test]
fn test_external_file_named_in_properties() {
    let dirs = dirs();
    write(
        &dirs.work,
        "application.properties",
        "application.properties=more.properties\ny=1\n",
    );
    write(&dirs.work, "more.properties", "y=2\n");

    let config = config(&dirs, &[], &[]);
    assert_eq!(config.get_str("y").unwrap(), "2");
}

#[test]
fn test_missing_external_file_is_fatal() {
    let dirs = dirs();
    let err = run(&dirs, &["--application.properties=absent.properties"], &[]).unwrap_err();
    assert!(matches!(err, Error::ConfiguredFileMissing { .. }));
}

#[test]
fn test_bare_external_flag_is_missing_file() {
    let dirs = dirs();
    let err = run(&dirs, &["--application.properties"], &[]).unwrap_err();
    match err {
        Error::ConfiguredFileMissing { key, path } => {
            assert_eq!(key, bootconf::keys::APPLICATION_PROPERTIES);
            assert_eq!(path, dirs.work.join(""));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_empty_env_external_file_is_missing_file() {
    let dirs = dirs();
    let err = run(&dirs, &[], &[("APPLICATION_PROPERTIES", "")]).unwrap_err();
    assert!(matches!(err, Error::ConfiguredFileMissing { .. }));
}

#[test]
fn test_malformed_line_aborts_startup() {
    let dirs = dirs();
    write(&dirs.base, "application.properties", "ok=1\nnot-a-pair\n");

    let err = run(&dirs, &[], &[]).unwrap_err();
    match err {
        Error::MalformedLine {
            path, line_number, ..
        } => {
            assert_eq!(path, dirs.base.join("application.properties"));
            assert_eq!(line_number, 2);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_register_after_bootstrap_is_write_once() {
    let dirs = dirs();
    write(&dirs.work, "application.properties", "from.file=1\n");

    let mut config = config(&dirs, &[], &[]);
    config.register_handle("x", 1_i32).unwrap();
    assert!(matches!(
        config.register_handle("x", 2_i32).unwrap_err(),
        Error::AlreadyRegistered(_)
    ));
    assert_eq!(config.get("x").unwrap().downcast_ref::<i32>(), Some(&1));
    assert!(config.register_text("from.file", "2").is_err());
}

#[test]
fn test_profile_hook_runs_after_files() {
    let dirs = dirs();
    write(&dirs.work, "application.properties", "runtime.profile=staging\n");

    let boot = bootstrap(&dirs, &[], &[])
        .profile_hook("staging", |config: &mut Config| {
            let seen = config.get_str("runtime.profile")?;
            config.register_text("hook.saw", seen)?;
            Ok(())
        })
        .run()
        .unwrap();

    assert_eq!(boot.config.get_str("hook.saw").unwrap(), "staging");
}

#[test]
fn test_missing_profile_hook_is_tolerated() {
    let dirs = dirs();
    let boot = bootstrap(&dirs, &["--runtime.profile=qa"], &[])
        .profile_hook("staging", |_config: &mut Config| Err("wrong hook".into()))
        .run()
        .unwrap();

    assert_eq!(boot.config.profile().as_deref(), Some("qa"));
}

#[test]
fn test_failing_profile_hook_is_fatal() {
    let dirs = dirs();
    let err = bootstrap(&dirs, &["--runtime.profile=prod"], &[])
        .profile_hook("prod", |_config: &mut Config| Err("vault sealed".into()))
        .run()
        .unwrap_err();

    assert!(matches!(err, Error::ModuleLoad { ref name, .. } if name == "config.prod"));
}

#[test]
fn test_logging_file_from_working_dir() {
    let dirs = dirs();
    write(&dirs.work, "logging.properties", "level=error\nformat=json\n");

    let boot = run(&dirs, &[], &[]).unwrap();
    assert_eq!(boot.logging.directives(), "error");
    assert_eq!(boot.logging.format, bootconf::LogFormat::Json);
    assert!(!boot.logging_installed);
}

#[test]
fn test_development_profile_forces_debug_logging() {
    let dirs = dirs();
    write(&dirs.work, "logging.properties", "level=error\n");

    let boot = run(&dirs, &["--runtime.profile=development"], &[]).unwrap();
    assert!(boot.logging.debug_forced);
    assert_eq!(boot.logging.directives(), "debug");
}

#[test]
fn test_missing_configured_logging_file_is_fatal() {
    let dirs = dirs();
    let err = run(&dirs, &["--logging.properties=nope.properties"], &[]).unwrap_err();
    assert!(matches!(err, Error::ConfiguredFileMissing { .. }));
}

#[test]
fn test_add_module_through_bootstrap() {
    let dirs = dirs();
    let mut boot = bootstrap(&dirs, &[], &[])
        .module("greeting", || {
            Ok(std::sync::Arc::new("hello".to_string()) as bootconf::config::Handle)
        })
        .run()
        .unwrap();

    boot.config.add_module("app.greeting", "greeting").unwrap();
    let value = boot.config.get("app.greeting").unwrap();
    assert_eq!(value.downcast_ref::<String>().map(String::as_str), Some("hello"));
    assert!(matches!(
        boot.config.add_module("app.other", "nope").unwrap_err(),
        Error::ModuleNotFound(_)
    ));
}

#[test]
fn test_entries_list_resolved_values() {
    let dirs = dirs();
    write(&dirs.work, "application.properties", "p=file\nq=file\n");

    let config = config(&dirs, &["--r"], &[("Q", "env")]);
    let names: Vec<_> = config
        .entries()
        .into_iter()
        .map(|(name, value, _)| format!("{name}={value}"))
        .collect();
    assert_eq!(names, ["p=file", "q=env", "r="]);
}
