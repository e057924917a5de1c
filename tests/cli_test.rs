//! CLI integration tests for the bundle-schema binary.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

const FIXTURE: &str = "tests/fixtures/postgresql-apb.json";

fn cmd() -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("bundle-schema"));
    cmd.env_remove("RUST_LOG");
    cmd
}

// Helper to create a temp spec file
fn write_temp_file(dir: &TempDir, name: &str, content: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, content).unwrap();
    path
}

mod convert_command {
    use super::*;

    #[test]
    fn convert_fixture() {
        cmd()
            .args(["convert", FIXTURE])
            .assert()
            .success()
            .stdout(predicate::str::contains(r#""name":"dh-postgresql-apb""#))
            .stdout(predicate::str::contains(r#""plan_updateable":true"#))
            .stdout(predicate::str::contains(r#""instances_retrievable":true"#))
            .stdout(predicate::str::contains("openshift_form_definition"));
    }

    #[test]
    fn convert_with_pretty() {
        cmd()
            .args(["convert", FIXTURE, "--pretty"])
            .assert()
            .success()
            // Pretty output has newlines and indentation
            .stdout(predicate::str::contains("{\n"));
    }

    #[test]
    fn convert_with_output_file() {
        let dir = TempDir::new().unwrap();
        let output = dir.path().join("service.json");

        cmd()
            .args(["convert", FIXTURE, "--output", output.to_str().unwrap()])
            .assert()
            .success()
            .stdout(predicate::str::is_empty());

        let content = fs::read_to_string(&output).unwrap();
        let value: serde_json::Value = serde_json::from_str(&content).unwrap();
        assert_eq!(value["plans"].as_array().unwrap().len(), 2);
        assert_eq!(
            value["plans"][0]["metadata"]["displayName"],
            serde_json::json!("Development")
        );
    }

    #[test]
    fn convert_groups_form_fields() {
        cmd()
            .args(["convert", FIXTURE])
            .assert()
            .success()
            .stdout(predicate::str::contains(
                r#"{"title":"Database","type":"fieldset","items":["postgresql_database","postgresql_user",{"key":"postgresql_password","type":"password"},"postgresql_version"]}"#,
            ));
    }
}

mod schema_command {
    use super::*;

    #[test]
    fn first_plan_by_default() {
        cmd()
            .args(["schema", FIXTURE])
            .assert()
            .success()
            .stdout(predicate::str::contains(
                r#""required":["postgresql_database","postgresql_user","postgresql_password","postgresql_version"]"#,
            ))
            .stdout(predicate::str::contains(
                r#""dependencies":{"postgresql_version":{"oneOf":["#,
            ));
    }

    #[test]
    fn dependent_not_in_flat_properties() {
        let output = cmd().args(["schema", FIXTURE]).output().unwrap();
        let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
        let create = &value["service_instance"]["create"]["parameters"];

        assert!(create["properties"].get("postgresql_jit").is_none());
        assert_eq!(
            create["dependencies"]["postgresql_version"]["oneOf"][0]["properties"]
                ["postgresql_version"],
            serde_json::json!({ "enum": ["10"] })
        );
    }

    #[test]
    fn select_plan_by_name() {
        cmd()
            .args(["schema", FIXTURE, "--plan", "prod"])
            .assert()
            .success()
            .stdout(predicate::str::contains("postgresql_volume_size"))
            .stdout(predicate::str::contains("postgresql_user").not());
    }

    #[test]
    fn unknown_plan() {
        cmd()
            .args(["schema", FIXTURE, "--plan", "gold"])
            .assert()
            .code(2)
            .stderr(predicate::str::contains("plan not found: gold"));
    }

    #[test]
    fn spec_without_plans() {
        let dir = TempDir::new().unwrap();
        let spec = write_temp_file(&dir, "apb.json", r#"{"name": "empty", "plans": []}"#);

        cmd()
            .args(["schema", spec.to_str().unwrap()])
            .assert()
            .code(2)
            .stderr(predicate::str::contains("no plans"));
    }
}

mod error_handling {
    use super::*;

    #[test]
    fn file_not_found() {
        cmd()
            .args(["convert", "/nonexistent/apb.json"])
            .assert()
            .code(3)
            .stderr(predicate::str::contains("not found"));
    }

    #[test]
    fn invalid_json_spec() {
        let dir = TempDir::new().unwrap();
        let spec = write_temp_file(&dir, "bad.json", r#"{ not valid json"#);

        cmd()
            .args(["convert", spec.to_str().unwrap()])
            .assert()
            .code(2);
    }

    #[test]
    fn unsupported_type() {
        let dir = TempDir::new().unwrap();
        let spec = write_temp_file(
            &dir,
            "apb.json",
            r#"{"plans": [{"name": "p", "parameters": [{"name": "outline", "type": "shape"}]}]}"#,
        );

        cmd()
            .args(["convert", spec.to_str().unwrap()])
            .assert()
            .code(2)
            .stdout(predicate::str::is_empty())
            .stderr(predicate::str::contains("unsupported type \"shape\""));
    }

    #[test]
    fn invalid_pattern_warns_and_succeeds() {
        let dir = TempDir::new().unwrap();
        let spec = write_temp_file(
            &dir,
            "apb.json",
            r#"{"plans": [{"name": "p", "parameters": [{"name": "n", "type": "string", "pattern": "["}]}]}"#,
        );

        cmd()
            .args(["schema", spec.to_str().unwrap()])
            .assert()
            .success()
            .stdout(predicate::str::contains("pattern").not())
            .stderr(predicate::str::contains("invalid pattern"));
    }

    #[test]
    fn log_level_silences_warnings() {
        let dir = TempDir::new().unwrap();
        let spec = write_temp_file(
            &dir,
            "apb.json",
            r#"{"plans": [{"name": "p", "parameters": [{"name": "n", "type": "string", "pattern": "["}]}]}"#,
        );

        cmd()
            .args(["--log-level", "error", "schema", spec.to_str().unwrap()])
            .assert()
            .success()
            .stderr(predicate::str::contains("invalid pattern").not());
    }
}

mod lint_command {
    use super::*;

    #[test]
    fn fixtures_pass() {
        cmd()
            .args(["lint", "tests/fixtures"])
            .assert()
            .success()
            .stdout(predicate::str::contains("all passed"));
    }

    #[test]
    fn warnings_fail_in_strict_mode() {
        let dir = TempDir::new().unwrap();
        write_temp_file(
            &dir,
            "apb.json",
            r#"{"plans": [{"name": "p", "parameters": [{"name": "n", "type": "string", "pattern": "("}]}]}"#,
        );

        cmd()
            .args(["lint", dir.path().to_str().unwrap()])
            .assert()
            .success()
            .stdout(predicate::str::contains("W001"));

        cmd()
            .args(["lint", dir.path().to_str().unwrap(), "--strict"])
            .assert()
            .code(1);
    }

    #[test]
    fn errors_fail() {
        let dir = TempDir::new().unwrap();
        write_temp_file(
            &dir,
            "apb.json",
            r#"{"plans": [{"name": "p", "parameters": [{"name": "n", "type": "vector"}]}]}"#,
        );

        cmd()
            .args(["lint", dir.path().to_str().unwrap()])
            .assert()
            .code(1)
            .stdout(predicate::str::contains("E002"));
    }

    #[test]
    fn json_format() {
        let output = cmd()
            .args(["lint", FIXTURE, "--format", "json"])
            .output()
            .unwrap();
        assert!(output.status.success());

        let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
        assert_eq!(value["files_checked"], serde_json::json!(1));
        assert_eq!(value["errors"], serde_json::json!(0));
    }

    #[test]
    fn missing_path() {
        cmd()
            .args(["lint", "/nonexistent/dir"])
            .assert()
            .code(2)
            .stderr(predicate::str::contains("path not found"));
    }
}

mod help_and_version {
    use super::*;

    #[test]
    fn help_flag() {
        cmd()
            .arg("--help")
            .assert()
            .success()
            .stdout(predicate::str::contains("Generate catalog parameter schemas"));
    }

    #[test]
    fn version_flag() {
        cmd()
            .arg("--version")
            .assert()
            .success()
            .stdout(predicate::str::contains("bundle-schema"));
    }

    #[test]
    fn schema_help() {
        cmd()
            .args(["schema", "--help"])
            .assert()
            .success()
            .stdout(predicate::str::contains("--plan"))
            .stdout(predicate::str::contains("--pretty"));
    }

    #[test]
    fn missing_spec_argument() {
        cmd().arg("convert").assert().failure();
    }
}

#[cfg(feature = "remote")]
mod remote {
    use super::*;

    #[test]
    fn convert_from_url() {
        let mut server = mockito::Server::new();
        let _mock = server
            .mock("GET", "/apb.json")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(fs::read_to_string(FIXTURE).unwrap())
            .create();

        cmd()
            .args(["convert", &format!("{}/apb.json", server.url())])
            .assert()
            .success()
            .stdout(predicate::str::contains("dh-postgresql-apb"));
    }

    #[test]
    fn url_404() {
        let mut server = mockito::Server::new();
        let _mock = server.mock("GET", "/apb.json").with_status(404).create();

        cmd()
            .args(["convert", &format!("{}/apb.json", server.url())])
            .assert()
            .code(3) // Network errors are exit code 3
            .stderr(predicate::str::contains("failed to fetch"));
    }
}
