use std::fs;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use assert_cmd::cargo::cargo_bin_cmd;
use kubetools::config::Settings;
use kubetools::error::{ConfigError, Error};
use predicates::prelude::*;

static TEMP_COUNTER: AtomicUsize = AtomicUsize::new(0);

fn write_temp_config(contents: &str) -> PathBuf {
    let mut path = std::env::temp_dir();
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();
    let suffix = TEMP_COUNTER.fetch_add(1, Ordering::Relaxed);
    path.push(format!("kubetools-config-test-{nanos}-{suffix}.toml"));
    fs::write(&path, contents).expect("write temp config");
    path
}

#[test]
fn settings_reject_unknown_log_format() {
    let path = write_temp_config("[logging]\nlevel = \"info\"\nformat = \"xml\"\n");
    let result = Settings::load(&path);
    let _ = fs::remove_file(&path);

    match result {
        Err(Error::Config(ConfigError::InvalidValue {
            field: "logging.format",
            ..
        })) => {}
        Err(err) => panic!("Expected invalid log format error, got {err}"),
        Ok(settings) => panic!(
            "Expected log format to be rejected, got {}",
            settings.logging.format
        ),
    }
}

#[test]
fn settings_reject_empty_api_version_list() {
    let path = write_temp_config("[validation]\nallowed_api_versions = []\n");
    let result = Settings::load(&path);
    let _ = fs::remove_file(&path);

    assert!(
        matches!(
            result,
            Err(Error::Config(ConfigError::InvalidValue {
                field: "validation.allowed_api_versions",
                ..
            }))
        ),
        "Expected empty api version list to be rejected"
    );
}

#[test]
fn settings_reject_bad_default_namespace() {
    let path = write_temp_config("[show]\ndefault_namespace = \"Prod_Env\"\n");
    let result = Settings::load(&path);
    let _ = fs::remove_file(&path);

    assert!(matches!(
        result,
        Err(Error::Config(ConfigError::InvalidValue {
            field: "show.default_namespace",
            ..
        }))
    ));
}

#[test]
fn partial_settings_keep_defaults() {
    let path = write_temp_config("[validation]\nstrict_selector = false\n");
    let result = Settings::load(&path);
    let _ = fs::remove_file(&path);

    let settings = result.expect("partial settings load");
    assert!(!settings.validation.strict_selector);
    assert!(settings.validation.require_annotations);
    assert_eq!(settings.logging.level, "warn");
    assert_eq!(settings.show.default_namespace, "default");
}

#[test]
fn malformed_toml_is_a_parse_error() {
    let path = write_temp_config("[logging\nlevel = \"info\"\n");
    let result = Settings::load(&path);
    let _ = fs::remove_file(&path);

    assert!(matches!(result, Err(Error::Config(ConfigError::Parse(_)))));
}

#[test]
fn config_init_then_validate() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("kubetools.toml");

    cargo_bin_cmd!("kubetools")
        .args(["config", "init"])
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("Created settings file"));

    cargo_bin_cmd!("kubetools")
        .args(["config", "init"])
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("--force"));

    cargo_bin_cmd!("kubetools")
        .arg("--config")
        .arg(&path)
        .args(["config", "validate"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Settings file is valid"));
}

#[test]
fn config_show_reports_defaults_when_missing() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("absent.toml");

    let output = cargo_bin_cmd!("kubetools")
        .arg("--config")
        .arg(&path)
        .args(["--json", "config", "show"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let shown: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(shown["found"], false);
    assert_eq!(shown["settings"]["validation"]["strict_selector"], true);
    assert_eq!(shown["settings"]["show"]["default_namespace"], "default");
}

#[test]
fn broken_settings_fail_manifest_commands() {
    let path = write_temp_config("[logging]\nformat = \"xml\"\n");

    cargo_bin_cmd!("kubetools")
        .env("KUBETOOLS_CONFIG", &path)
        .args(["validate", "tests/fixtures/memcache.yaml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid value for logging.format"));

    let _ = fs::remove_file(&path);
}

#[test]
fn settings_policy_changes_validation() {
    let path = write_temp_config("[validation]\nwarnings_as_errors = true\n");

    cargo_bin_cmd!("kubetools")
        .env("KUBETOOLS_CONFIG", &path)
        .args(["validate", "tests/fixtures/unmanaged.yaml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("0 error(s), 1 warning(s)"));

    let _ = fs::remove_file(&path);
}
