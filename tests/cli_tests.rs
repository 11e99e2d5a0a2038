//! End-to-end tests of the kubetools binary.

use std::path::{Path, PathBuf};

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;
use predicates::prelude::*;

const MEMCACHE_2: &str = r#"apiVersion: apps/v1
kind: Deployment
metadata:
  name: memcache-2
  labels:
    kubetools/project_name: generic-app
    kubetools/role: dependency
    kubetools/name: memcache-2
  annotations:
    app.kubernetes.io/managed-by: kubetools
spec:
  replicas: 1
  revisionHistoryLimit: 5
  selector:
    matchLabels:
      kubetools/name: memcache-2
  template:
    metadata:
      labels:
        kubetools/name: memcache-2
    spec:
      containers:
        - name: memcache
          image: memcached:1.5
"#;

/// A Deployment missing its pod template.
const NO_TEMPLATE: &str = r#"apiVersion: apps/v1
kind: Deployment
metadata:
  name: memcache-3
spec:
  selector:
    matchLabels:
      kubetools/name: memcache-3
"#;

fn fixtures() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

/// The binary, run from the fixtures directory with no settings file.
fn kubetools() -> Command {
    let mut cmd = cargo_bin_cmd!("kubetools");
    cmd.current_dir(fixtures())
        .env("KUBETOOLS_CONFIG", fixtures().join("no-such-settings.toml"))
        .env_remove("RUST_LOG");
    cmd
}

/// Write `mixed.yaml`: one good Deployment followed by one that fails the schema.
fn write_with_rejected(dir: &Path) {
    std::fs::write(dir.join("mixed.yaml"), format!("{MEMCACHE_2}---\n{NO_TEMPLATE}")).unwrap();
}

fn stdout_json(cmd: &mut Command) -> serde_json::Value {
    let output = cmd.output().unwrap();
    serde_json::from_slice(&output.stdout).unwrap()
}

#[test]
fn help_lists_commands() {
    kubetools()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("validate"))
        .stdout(predicate::str::contains("show"))
        .stdout(predicate::str::contains("print"))
        .stdout(predicate::str::contains("normalize"))
        .stdout(predicate::str::contains("config"));
}

#[test]
fn version_names_the_binary() {
    kubetools()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("kubetools"));
}

#[test]
fn memcache_pair_validates_cleanly() {
    kubetools()
        .args(["validate", "memcache.yaml"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "0 error(s), 0 warning(s) in 2 deployment(s)",
        ))
        .stdout(predicate::str::contains("Skipped"));
}

#[test]
fn directories_are_walked() {
    kubetools()
        .args(["validate", "generic-app"])
        .assert()
        .success()
        .stdout(predicate::str::contains("in 2 deployment(s)"));
}

#[test]
fn paths_default_to_the_current_directory() {
    kubetools()
        .current_dir(fixtures().join("generic-app"))
        .arg("validate")
        .assert()
        .success()
        .stdout(predicate::str::contains("in 2 deployment(s)"));
}

#[test]
fn verbose_validate_lists_skipped_documents() {
    kubetools()
        .args(["-v", "validate", "memcache.yaml"])
        .assert()
        .success()
        .stdout(predicate::str::contains("memcache.yaml#2 (Service)"));

    kubetools()
        .args(["validate", "memcache.yaml"])
        .assert()
        .success()
        .stdout(predicate::str::contains("(Service)").not());
}

#[test]
fn selector_mismatch_fails_validation() {
    kubetools()
        .args(["validate", "invalid/selector-mismatch.yaml"])
        .assert()
        .failure()
        .code(1)
        .stdout(predicate::str::contains("[selector-mismatch]"))
        .stdout(predicate::str::contains("[duplicate-env]"))
        .stdout(predicate::str::contains("[image-tag]"))
        .stderr(predicate::str::contains(
            "validation failed: 2 error(s), 1 warning(s)",
        ));
}

#[test]
fn validate_json_reports_findings() {
    let report = stdout_json(kubetools().args([
        "--json",
        "validate",
        "invalid/selector-mismatch.yaml",
    ]));

    assert_eq!(report["command"], "validate");
    assert_eq!(report["passed"], false);
    assert_eq!(report["errors"], 2);
    assert_eq!(report["warnings"], 1);

    let rules: Vec<&str> = report["findings"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|finding| finding["rule"].as_str())
        .collect();
    assert!(rules.contains(&"selector-mismatch"));
    assert!(rules.contains(&"duplicate-env"));
}

#[test]
fn warnings_only_fail_in_strict_mode() {
    kubetools()
        .args(["validate", "unmanaged.yaml"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[identity-labels]"));

    kubetools()
        .args(["validate", "--strict", "unmanaged.yaml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("0 error(s), 1 warning(s)"));
}

#[test]
fn yaml_syntax_errors_abort() {
    kubetools()
        .args(["validate", "invalid/broken.yaml"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("invalid YAML in"));
}

#[test]
fn show_lists_identity_and_version() {
    kubetools()
        .args(["show", "memcache.yaml"])
        .assert()
        .success()
        .stdout(predicate::str::contains("memcache-1"))
        .stdout(predicate::str::contains("memcache-2"))
        .stdout(predicate::str::contains("dependency"))
        .stdout(predicate::str::contains("generic-app"))
        .stdout(predicate::str::contains("branch=master, commit=3f2a9c1"));
}

#[test]
fn show_marks_unmanaged_deployments() {
    kubetools()
        .args(["show", "unmanaged.yaml"])
        .assert()
        .success()
        .stdout(predicate::str::contains("NOT MANAGED BY KUBETOOLS"));
}

#[test]
fn show_filters_by_app() {
    let listing = stdout_json(kubetools().args([
        "--json",
        "show",
        "memcache.yaml",
        "generic-app",
        "--app",
        "webserver",
        "--app",
        "memcache-2",
    ]));

    let names: Vec<&str> = listing["deployments"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|deployment| deployment["name"].as_str())
        .collect();
    assert_eq!(names, vec!["memcache-2", "webserver"]);
}

#[test]
fn show_refuses_rejected_documents() {
    let dir = tempfile::tempdir().unwrap();
    write_with_rejected(dir.path());

    kubetools()
        .current_dir(dir.path())
        .args(["show", "mixed.yaml"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("is not a valid Deployment"));
}

#[test]
fn show_unknown_app_fails() {
    kubetools()
        .args(["show", "memcache.yaml", "--app", "nope", "--app", "memcache-1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Deployments not found: nope"));
}

#[test]
fn show_containers_marks_implied_pull_policy() {
    kubetools()
        .args(["show", "--containers", "generic-app"])
        .assert()
        .success()
        .stdout(predicate::str::contains("uwsgi"))
        .stdout(predicate::str::contains("IfNotPresent (default)"))
        .stdout(predicate::str::contains("nginx:1.25-alpine"))
        .stdout(predicate::str::contains("celery"));
}

#[test]
fn print_one_deployment_by_name() {
    kubetools()
        .args(["print", "memcache.yaml", "--name", "memcache-2"])
        .assert()
        .success()
        .stdout(predicate::str::contains("name: memcache-2"))
        .stdout(predicate::str::contains("memcache-1").not());
}

#[test]
fn print_json_by_app_name() {
    let deployment = stdout_json(kubetools().args([
        "print",
        "generic-app",
        "--name",
        "webserver",
        "--format",
        "json",
    ]));

    assert_eq!(deployment["metadata"]["name"], "generic-app-webserver");
    assert_eq!(deployment["spec"]["replicas"], 3);
    assert_eq!(
        deployment["spec"]["template"]["spec"]["containers"][0]["ports"][0]["containerPort"],
        8000
    );
}

#[test]
fn print_without_a_terminal_prints_everything() {
    kubetools()
        .args(["print", "memcache.yaml"])
        .assert()
        .success()
        .stdout(predicate::str::contains("name: memcache-1"))
        .stdout(predicate::str::contains("---"))
        .stdout(predicate::str::contains("name: memcache-2"))
        .stdout(predicate::str::contains("kind: Service").not());
}

#[test]
fn print_reads_stdin() {
    kubetools()
        .args(["print", "-"])
        .write_stdin(MEMCACHE_2)
        .assert()
        .success()
        .stdout(predicate::str::contains("name: memcache-2"));
}

#[test]
fn print_refuses_rejected_documents() {
    let dir = tempfile::tempdir().unwrap();
    write_with_rejected(dir.path());

    kubetools()
        .current_dir(dir.path())
        .args(["print", "mixed.yaml"])
        .assert()
        .failure()
        .code(1)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("is not a valid Deployment"));
}

#[test]
fn print_unknown_name_fails() {
    kubetools()
        .args(["print", "memcache.yaml", "--name", "memcache-3"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Deployments not found: memcache-3"));
}

#[test]
fn normalize_writes_canonical_yaml() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("normalized.yaml");

    kubetools()
        .args(["normalize", "memcache.yaml", "--output"])
        .arg(&out)
        .assert()
        .success()
        .stdout(predicate::str::contains("Wrote 2 deployment(s)"));

    let written = std::fs::read_to_string(&out).unwrap();
    assert!(written.contains("name: memcache-1"));
    assert!(written.contains("name: memcache-2"));
    assert!(!written.contains("kind: Service"));

    // Normalizing the output again is a no-op.
    kubetools()
        .arg("normalize")
        .arg(&out)
        .assert()
        .success()
        .stdout(predicate::str::diff(written));
}

#[test]
fn normalize_json_wraps_the_stream() {
    let result = stdout_json(kubetools().args(["--json", "normalize", "memcache.yaml"]));

    assert_eq!(result["command"], "normalize");
    assert_eq!(result["deployments"], 2);
    let content = result["content"].as_str().unwrap();
    assert!(content.contains("name: memcache-1"));
    assert!(content.contains("name: memcache-2"));
}

#[test]
fn normalize_refuses_broken_input() {
    kubetools()
        .args(["normalize", "invalid/broken.yaml"])
        .assert()
        .failure();
}

#[test]
fn empty_input_is_an_error_outside_validate() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("service.yaml"), "apiVersion: v1\nkind: Service\n").unwrap();

    kubetools()
        .arg("show")
        .arg(dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("no Deployment documents found"));

    kubetools()
        .arg("validate")
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("[empty-set]"));
}
