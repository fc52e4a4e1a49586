use predicates::prelude::*;

use crate::common::{NGINX_SCHEMA, TestProject};

/// A valid configuration produces `<template>-<name>.conf`
#[test]
fn test_generate_writes_derived_output() {
    let project = TestProject::with_nginx_files().unwrap();

    let output = project.run_ngxgen(&["api.yaml"]).unwrap();
    output
        .assert_success()
        .assert_stdout_contains("✅ Validation Passed!")
        .assert_stdout_contains("✅ NGINX configuration successfully generated: nginx-api.conf");

    let conf = project.read_file("nginx-api.conf").unwrap();
    assert_eq!(conf, "server {\n    listen 8080;\n    server_name api.example.com;\n}");
}

/// Validation is reported before the success line
#[test]
fn test_status_lines_order() {
    let project = TestProject::with_nginx_files().unwrap();

    let output = project.run_ngxgen(&["api.yaml"]).unwrap();
    output.assert_success();
    let lines: Vec<&str> = output.stdout.lines().collect();
    assert_eq!(
        lines,
        vec![
            "✅ Validation Passed!",
            "✅ NGINX configuration successfully generated: nginx-api.conf"
        ]
    );
}

/// Loops render each list entry with block lines removed
#[test]
fn test_generate_with_locations() {
    let project = TestProject::with_nginx_files().unwrap();
    project
        .write_file(
            "web.yaml",
            "name: web\ntemplate: nginx\nport: 80\nlocations:\n  - path: /\n    proxy_pass: http://app:3000\n  - path: /static\n    proxy_pass: http://cdn\n",
        )
        .unwrap();

    project.run_ngxgen(&["web.yaml"]).unwrap().assert_success();

    let conf = project.read_file("nginx-web.conf").unwrap();
    assert_eq!(
        conf,
        "server {\n    listen 80;\n    location / {\n        proxy_pass http://app:3000;\n    }\n    location /static {\n        proxy_pass http://cdn;\n    }\n}"
    );
}

/// The output name uses the configuration fields, not the input file name
#[test]
fn test_output_name_comes_from_fields() {
    let project = TestProject::with_nginx_files().unwrap();
    project.write_file("schema-edge.json", NGINX_SCHEMA).unwrap();
    project.write_file("template-edge.j2", "# {{ nginx.name }}\nlisten {{ nginx.port }};\n").unwrap();
    project
        .write_file("configs/anything.yml", "name: gateway\ntemplate: edge\nport: 443\n")
        .unwrap();

    project
        .command()
        .arg("configs/anything.yml")
        .assert()
        .success()
        .stdout(predicate::str::contains("edge-gateway.conf"));

    assert_eq!(project.read_file("edge-gateway.conf").unwrap(), "# gateway\nlisten 443;");
    assert!(!project.file_exists("configs/edge-gateway.conf"));
}

/// Running twice gives the same output
#[test]
fn test_generate_is_idempotent() {
    let project = TestProject::with_nginx_files().unwrap();

    project.run_ngxgen(&["api.yaml"]).unwrap().assert_success();
    let first = project.read_file("nginx-api.conf").unwrap();
    project.run_ngxgen(&["api.yaml"]).unwrap().assert_success();
    let second = project.read_file("nginx-api.conf").unwrap();

    assert_eq!(first, second);
}

/// An existing output is replaced, not appended to
#[test]
fn test_existing_output_is_truncated() {
    let project = TestProject::with_nginx_files().unwrap();
    project.write_file("nginx-api.conf", &"stale line\n".repeat(100)).unwrap();

    project.run_ngxgen(&["api.yaml"]).unwrap().assert_success();

    let conf = project.read_file("nginx-api.conf").unwrap();
    assert!(!conf.contains("stale"));
    assert!(conf.contains("listen 8080;"));
}

/// `--verbose` logs the pipeline on stderr without changing stdout
#[test]
fn test_verbose_logs_to_stderr() {
    let project = TestProject::with_nginx_files().unwrap();

    let output = project.run_ngxgen(&["--verbose", "api.yaml"]).unwrap();
    output.assert_success().assert_stderr_contains("Pipeline stage");
    assert_eq!(output.stdout.lines().count(), 2);
}

/// `--quiet` keeps the status lines
#[test]
fn test_quiet_keeps_status_lines() {
    let project = TestProject::with_nginx_files().unwrap();

    project
        .command()
        .args(["--quiet", "api.yaml"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Validation Passed!"))
        .stderr(predicate::str::is_empty());
}

/// `--verbose` and `--quiet` cannot be combined
#[test]
fn test_verbose_conflicts_with_quiet() {
    let project = TestProject::with_nginx_files().unwrap();

    project.command().args(["-v", "-q", "api.yaml"]).assert().failure().code(2);
    assert!(!project.file_exists("nginx-api.conf"));
}

/// `--version` prints the package version
#[test]
fn test_version_flag() {
    let project = TestProject::new().unwrap();

    project
        .command()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}
