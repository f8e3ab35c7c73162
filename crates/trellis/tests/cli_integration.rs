//! CLI integration tests for the trellis binary.
//!
//! Every test runs with a cleared environment inside a temp directory so
//! that neither the developer's shell nor a stray `.env` leaks in. None
//! of them contact the Trellis API.

use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::{Value, json};
use tempfile::TempDir;

const API_KEY: &str = "key_live_secret_123";

/// A trellis command with an empty environment, logging into `dir`.
fn trellis(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("trellis").unwrap();
    cmd.env_clear()
        .current_dir(dir)
        .env("TRELLIS_LOG_DIR", dir.join("logs"));
    cmd
}

/// A trellis command with a complete configuration.
fn configured(dir: &Path) -> Command {
    let mut cmd = trellis(dir);
    cmd.env("TRELLIS_API_KEY", API_KEY)
        .env("TRELLIS_PROJECT_ID", "proj_1")
        .env("TRELLIS_WORKFLOW_ID", "wflow_A")
        .env("TRELLIS_BASE_URL", "http://127.0.0.1:9/v1");
    cmd
}

// ─────────────────────────────────────────────────────────────────────────────
// Help and Version Tests
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_help_lists_subcommands() {
    let dir = TempDir::new().unwrap();
    trellis(dir.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("serve"))
        .stdout(predicate::str::contains("check"))
        .stdout(predicate::str::contains("tools"));
}

#[test]
fn test_version_displays() {
    let dir = TempDir::new().unwrap();
    trellis(dir.path())
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("trellis"));
}

// ─────────────────────────────────────────────────────────────────────────────
// Configuration errors
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_missing_api_key_is_fatal() {
    let dir = TempDir::new().unwrap();
    trellis(dir.path())
        .env("TRELLIS_PROJECT_ID", "proj_1")
        .env("TRELLIS_WORKFLOW_ID", "wflow_A")
        .arg("check")
        .assert()
        .failure()
        .stderr(predicate::str::contains("TRELLIS_API_KEY"));
}

#[test]
fn test_missing_workflow_id_is_fatal() {
    let dir = TempDir::new().unwrap();
    trellis(dir.path())
        .env("TRELLIS_API_KEY", API_KEY)
        .env("TRELLIS_PROJECT_ID", "proj_1")
        .arg("check")
        .assert()
        .failure()
        .stderr(predicate::str::contains("TRELLIS_WORKFLOW_ID"));
}

#[test]
fn test_serve_without_config_exits_before_reading_stdin() {
    let dir = TempDir::new().unwrap();
    trellis(dir.path())
        .write_stdin("{\"jsonrpc\":\"2.0\",\"id\":1,\"method\":\"ping\"}\n")
        .assert()
        .failure()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("TRELLIS_API_KEY"));
}

#[test]
fn test_invalid_timeout_is_fatal() {
    let dir = TempDir::new().unwrap();
    configured(dir.path())
        .env("TRELLIS_TIMEOUT_SECS", "soon")
        .arg("check")
        .assert()
        .failure()
        .stderr(predicate::str::contains("TRELLIS_TIMEOUT_SECS"));
}

#[test]
fn test_missing_env_file_is_fatal() {
    let dir = TempDir::new().unwrap();
    configured(dir.path())
        .args(["--env-file", "does-not-exist.env", "check"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("does-not-exist.env"));
}

// ─────────────────────────────────────────────────────────────────────────────
// check / tools
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_check_prints_scope_without_key() {
    let dir = TempDir::new().unwrap();
    configured(dir.path())
        .arg("check")
        .assert()
        .success()
        .stdout(predicate::str::contains("proj_1"))
        .stdout(predicate::str::contains("wflow_A"))
        .stdout(predicate::str::contains("<redacted>"))
        .stdout(predicate::str::contains(API_KEY).not());
}

#[test]
fn test_check_json() {
    let dir = TempDir::new().unwrap();
    let output = configured(dir.path())
        .args(["check", "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let value: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["project_id"], "proj_1");
    assert_eq!(value["workflow_id"], "wflow_A");
    assert_eq!(value["base_url"], "http://127.0.0.1:9/v1");
    assert_eq!(value["timeout_secs"], 30);
}

#[test]
fn test_check_writes_log_file() {
    let dir = TempDir::new().unwrap();
    configured(dir.path()).arg("check").assert().success();

    let log = std::fs::read_to_string(dir.path().join("logs").join("server.log")).unwrap();
    assert!(log.contains("Trellis MCP server starting"));
    assert!(!log.contains(API_KEY));
}

#[test]
fn test_log_dir_flag_overrides_env() {
    let dir = TempDir::new().unwrap();
    let custom = dir.path().join("custom");
    configured(dir.path())
        .arg("--log-dir")
        .arg(&custom)
        .arg("check")
        .assert()
        .success();
    assert!(custom.join("server.log").exists());
}

#[test]
fn test_env_file_supplies_configuration() {
    let dir = TempDir::new().unwrap();
    let env_file = dir.path().join("trellis.env");
    std::fs::write(
        &env_file,
        format!(
            "TRELLIS_API_KEY={}\nTRELLIS_PROJECT_ID=proj_env\nTRELLIS_WORKFLOW_ID=wflow_env\n",
            API_KEY
        ),
    )
    .unwrap();

    trellis(dir.path())
        .arg("--env-file")
        .arg(&env_file)
        .arg("check")
        .assert()
        .success()
        .stdout(predicate::str::contains("proj_env"))
        .stdout(predicate::str::contains("wflow_env"));
}

#[test]
fn test_tools_names() {
    let dir = TempDir::new().unwrap();
    configured(dir.path())
        .args(["tools", "--names"])
        .assert()
        .success()
        .stdout(predicate::str::diff(
            "get_entities\nget_entity_fields\nget_transformation_details\n\
             get_transformations\nget_workflow_config\nupdate_workflow_blocks\n",
        ));
}

#[test]
fn test_tools_json_definitions() {
    let dir = TempDir::new().unwrap();
    let output = configured(dir.path()).arg("tools").output().unwrap();
    assert!(output.status.success());

    let defs: Vec<Value> = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(defs.len(), 6);
    for def in &defs {
        assert_eq!(def["inputSchema"]["type"], "object");
        assert_eq!(def["outputSchema"]["type"], "object");
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// serve
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_serve_answers_on_stdout_only() {
    let dir = TempDir::new().unwrap();
    let input = [
        json!({"jsonrpc": "2.0", "id": 1, "method": "initialize",
               "params": {"protocolVersion": "2024-11-05", "capabilities": {},
                          "clientInfo": {"name": "cli-test", "version": "0"}}}),
        json!({"jsonrpc": "2.0", "method": "notifications/initialized"}),
        json!({"jsonrpc": "2.0", "id": 2, "method": "tools/list"}),
    ]
    .iter()
    .map(|m| format!("{}\n", m))
    .collect::<String>();

    let output = configured(dir.path()).write_stdin(input).output().unwrap();
    assert!(output.status.success());

    let responses: Vec<Value> = String::from_utf8(output.stdout)
        .unwrap()
        .lines()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect();
    assert_eq!(responses.len(), 2);
    assert_eq!(responses[0]["result"]["protocolVersion"], "2024-11-05");
    assert_eq!(responses[1]["result"]["tools"].as_array().unwrap().len(), 6);
}

#[test]
fn test_serve_subcommand_handles_validation_locally() {
    let dir = TempDir::new().unwrap();
    let input = format!(
        "{}\n",
        json!({"jsonrpc": "2.0", "id": 1, "method": "tools/call",
               "params": {"name": "get_entity_fields", "arguments": {}}})
    );

    let output = configured(dir.path())
        .arg("serve")
        .write_stdin(input)
        .output()
        .unwrap();
    assert!(output.status.success());

    let response: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(response["result"]["isError"], true);
    assert_eq!(
        response["result"]["structuredContent"]["kind"],
        "validation_error"
    );
}
