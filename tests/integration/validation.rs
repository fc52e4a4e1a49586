use predicates::prelude::*;

use crate::common::TestProject;

/// A schema violation prints the report and writes nothing
#[test]
fn test_type_violation_report() {
    let project = TestProject::with_nginx_files().unwrap();
    project.write_file("api.yaml", "name: api\ntemplate: nginx\nport: eighty\n").unwrap();

    let output = project.run_ngxgen(&["api.yaml"]).unwrap();
    output
        .assert_code(1)
        .assert_stdout_contains("🚨 Validation Error!")
        .assert_stdout_contains("🔹 Message: ")
        .assert_stdout_contains("🔹 Failed Validator: type")
        .assert_stdout_contains("🔹 Expected: integer")
        .assert_stdout_contains(r#"🔹 Data Path: ["port"]"#)
        .assert_stdout_contains(r#"🔹 Schema Path: ["properties", "port", "type"]"#)
        .assert_stdout_contains("------------------------------------------");

    assert!(!output.stdout.contains("Validation Passed"));
    assert!(!project.file_exists("nginx-api.conf"));
}

/// A failed run leaves an earlier output untouched
#[test]
fn test_validation_failure_keeps_previous_output() {
    let project = TestProject::with_nginx_files().unwrap();
    project.write_file("nginx-api.conf", "# previous\n").unwrap();
    project.write_file("api.yaml", "name: api\ntemplate: nginx\nport: 0\n").unwrap();

    project
        .command()
        .arg("api.yaml")
        .assert()
        .code(1)
        .stdout(predicate::str::contains("🔹 Failed Validator: minimum"))
        .stdout(predicate::str::contains("🔹 Expected: 1"));

    assert_eq!(project.read_file("nginx-api.conf").unwrap(), "# previous\n");
}

/// Format keywords are enforced
#[test]
fn test_ipv4_format_violation() {
    let project = TestProject::with_nginx_files().unwrap();
    project
        .write_file(
            "api.yaml",
            "name: api\ntemplate: nginx\nport: 80\nlisten_address: 999.999.999.999\n",
        )
        .unwrap();

    project
        .run_ngxgen(&["api.yaml"])
        .unwrap()
        .assert_code(1)
        .assert_stdout_contains("🔹 Failed Validator: format")
        .assert_stdout_contains("🔹 Expected: ipv4")
        .assert_stdout_contains(r#"🔹 Data Path: ["listen_address"]"#);
}

/// Array positions appear as numbers in the data path
#[test]
fn test_nested_array_data_path() {
    let project = TestProject::with_nginx_files().unwrap();
    project
        .write_file(
            "api.yaml",
            "name: api\ntemplate: nginx\nport: 80\nlocations:\n  - path: /\n    proxy_pass: http://a\n  - path: static\n",
        )
        .unwrap();

    project
        .run_ngxgen(&["api.yaml"])
        .unwrap()
        .assert_code(1)
        .assert_stdout_contains("🔹 Failed Validator: pattern")
        .assert_stdout_contains(r#"🔹 Data Path: ["locations", 1, "path"]"#)
        .assert_stdout_contains(
            r#"🔹 Schema Path: ["properties", "locations", "items", "properties", "path", "pattern"]"#,
        );
}

/// A missing required property is reported at the document root
#[test]
fn test_required_property_report() {
    let project = TestProject::with_nginx_files().unwrap();
    project.write_file("api.yaml", "name: api\ntemplate: nginx\n").unwrap();

    project
        .command()
        .arg("api.yaml")
        .assert()
        .code(1)
        .stdout(predicate::str::contains("🔹 Failed Validator: required"))
        .stdout(predicate::str::contains(r#"🔹 Expected: ["name","template","port"]"#))
        .stdout(predicate::str::contains("🔹 Data Path: []"));
}

/// Malformed YAML is an unexpected failure
#[test]
fn test_malformed_yaml_exits_2() {
    let project = TestProject::with_nginx_files().unwrap();
    project.write_file("api.yaml", "name: [api\ntemplate: nginx\n").unwrap();

    let output = project.run_ngxgen(&["api.yaml"]).unwrap();
    output.assert_code(2).assert_stderr_contains("Invalid YAML in api.yaml");
    assert!(output.stdout.is_empty());
}

/// A schema that is not valid JSON is an unexpected failure
#[test]
fn test_malformed_schema_exits_2() {
    let project = TestProject::with_nginx_files().unwrap();
    project.write_file("schema-nginx.json", "{\"type\": ").unwrap();

    project
        .command()
        .arg("api.yaml")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Invalid JSON in schema-nginx.json"));
    assert!(!project.file_exists("nginx-api.conf"));
}
