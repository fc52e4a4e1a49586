use predicates::prelude::*;

use crate::common::TestProject;

/// Block tags on their own lines leave no blank lines or indentation
#[test]
fn test_block_whitespace_control() {
    let project = TestProject::with_nginx_files().unwrap();
    project
        .write_file(
            "template-nginx.j2",
            "events {}\n\nhttp {\n    {# generated #}\n    {% if nginx.port == 8080 %}\n    upstream backend {\n        server 127.0.0.1:{{ nginx.port }};\n    }\n    {% endif %}\n}\n",
        )
        .unwrap();

    project.run_ngxgen(&["api.yaml"]).unwrap().assert_success();

    assert_eq!(
        project.read_file("nginx-api.conf").unwrap(),
        "events {}\n\nhttp {\n    upstream backend {\n        server 127.0.0.1:8080;\n    }\n}"
    );
}

/// Included templates are loaded next to the main template
#[test]
fn test_include_from_template_directory() {
    let project = TestProject::with_nginx_files().unwrap();
    project.write_file("listen.j2", "listen {{ nginx.port }};\n").unwrap();
    project
        .write_file("template-nginx.j2", "server {\n    {% include \"listen.j2\" %}\n\n}\n")
        .unwrap();

    project.run_ngxgen(&["api.yaml"]).unwrap().assert_success();

    assert_eq!(project.read_file("nginx-api.conf").unwrap(), "server {\nlisten 8080;\n}");
}

/// An include inside a comment is never loaded
#[test]
fn test_commented_out_include_is_ignored() {
    let project = TestProject::with_nginx_files().unwrap();
    project
        .write_file("template-nginx.j2", "{# {% include \"old.j2\" %} #}\nlisten {{ nginx.port }};\n")
        .unwrap();

    project.run_ngxgen(&["api.yaml"]).unwrap().assert_success();

    assert_eq!(project.read_file("nginx-api.conf").unwrap(), "listen 8080;");
}

/// An undefined variable is a template error with a suggestion
#[test]
fn test_undefined_variable_exits_2() {
    let project = TestProject::with_nginx_files().unwrap();
    project.write_file("template-nginx.j2", "listen {{ nginx.prot }};\n").unwrap();

    let output = project.run_ngxgen(&["api.yaml"]).unwrap();
    output
        .assert_code(2)
        .assert_stdout_contains("✅ Validation Passed!")
        .assert_stderr_contains("Template variable not found: 'nginx.prot'")
        .assert_stderr_contains("nginx.port");

    assert!(!project.file_exists("nginx-api.conf"));
}

/// A malformed template is a template error, not a validation failure
#[test]
fn test_malformed_template_exits_2() {
    let project = TestProject::with_nginx_files().unwrap();
    project.write_file("template-nginx.j2", "{% for x in nginx.port %}\nno end\n").unwrap();

    project
        .command()
        .arg("api.yaml")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Template syntax error"));

    assert!(!project.file_exists("nginx-api.conf"));
}

/// Raw blocks keep template syntax in the output
#[test]
fn test_raw_block_is_literal() {
    let project = TestProject::with_nginx_files().unwrap();
    project
        .write_file(
            "template-nginx.j2",
            "{% raw %}\n# {{ not_rendered }}\n{% endraw %}\nlisten {{ nginx.port }};\n",
        )
        .unwrap();

    project.run_ngxgen(&["api.yaml"]).unwrap().assert_success();

    assert_eq!(
        project.read_file("nginx-api.conf").unwrap(),
        "\n# {{ not_rendered }}\nlisten 8080;"
    );
}
