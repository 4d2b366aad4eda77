//! Integration tests for the `animechan` binary.

use std::process::Command;

use axum::{extract::RawQuery, routing::get, Json, Router};
use serde_json::{json, Value as JsonValue};
use tempfile::TempDir;

/// Helper to run the CLI with given args and capture output
fn run_cli(args: &[&str]) -> std::process::Output {
    cli_command(args)
        .output()
        .expect("Failed to execute animechan")
}

fn cli_command(args: &[&str]) -> Command {
    let mut command = Command::new(env!("CARGO_BIN_EXE_animechan"));
    command
        .args(args)
        .env_remove("ANIMECHAN_BASE_URL")
        .env_remove("ANIMECHAN_API_KEY");
    command
}

/// Answers every `/v1/quotes` query with the same quote twice.
async fn duplicate_quotes(RawQuery(query): RawQuery) -> Json<JsonValue> {
    let quote = json!({
        "anime": "Mock",
        "character": "Mock Character",
        "quote": query.unwrap_or_default()
    });
    Json(json!({ "data": [quote.clone(), quote] }))
}

/// Serves the mock API on a random local port and returns its API root.
async fn spawn_quote_server() -> String {
    let app = Router::new().route("/v1/quotes", get(duplicate_quotes));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("must bind test listener");
    let address = listener.local_addr().expect("must have local addr");
    tokio::spawn(async move {
        axum::serve(listener, app)
            .await
            .expect("mock server must run");
    });
    format!("http://{address}/v1")
}

#[test]
fn test_help_flag_exits_successfully() {
    let output = run_cli(&["--help"]);
    assert!(output.status.success(), "Expected --help to exit successfully");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("animechan"), "Help should mention animechan");
    assert!(stdout.contains("collect"), "Help should mention collect");
}

#[test]
fn test_collect_without_output_fails() {
    let output = run_cli(&["collect", "--offline"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("--output"), "Should name the missing flag: {stderr}");
}

#[test]
fn test_offline_collect_writes_bundled_sample() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let output_path = temp_dir.path().join("out").join("quotes.json");

    let output = run_cli(&[
        "collect",
        "--offline",
        "--characters",
        "Naruto Uzumaki",
        "--output",
        output_path.to_str().expect("utf-8 path"),
    ]);
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));

    let content = std::fs::read_to_string(&output_path).expect("report must exist");
    let report: serde_json::Value = serde_json::from_str(&content).expect("report must be JSON");
    let records = report["data"].as_array().expect("data must be an array").len();
    assert!(records > 0);
    assert_eq!(report["meta"]["record_count"], records);
    assert_eq!(report["meta"]["characters"][0], "Naruto Uzumaki");
    assert!(report["meta"]["shows"].is_null());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains(&format!("Written {records} quotes")));
}

#[test]
fn test_offline_collect_uses_custom_sample() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let sample_path = temp_dir.path().join("sample.json");
    let output_path = temp_dir.path().join("quotes.json");
    std::fs::write(
        &sample_path,
        r#"[{"anime": "Bleach", "character": "Ichigo Kurosaki", "quote": "..."}]"#,
    )
    .expect("write sample");

    let output = run_cli(&[
        "collect",
        "--offline",
        "--sample",
        sample_path.to_str().expect("utf-8 path"),
        "--output",
        output_path.to_str().expect("utf-8 path"),
    ]);
    assert!(output.status.success());

    let content = std::fs::read_to_string(&output_path).expect("report must exist");
    let report: serde_json::Value = serde_json::from_str(&content).expect("report must be JSON");
    assert_eq!(report["meta"]["record_count"], 1);
    assert_eq!(report["data"][0]["anime"], "Bleach");
}

#[test]
fn test_missing_sample_file_fails() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let output_path = temp_dir.path().join("quotes.json");
    let missing = temp_dir.path().join("missing.json");

    let output = run_cli(&[
        "collect",
        "--offline",
        "--sample",
        missing.to_str().expect("utf-8 path"),
        "--output",
        output_path.to_str().expect("utf-8 path"),
    ]);
    assert!(!output.status.success());
    assert!(!output_path.exists());
}

#[test]
fn test_unreachable_api_falls_back_to_sample() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let output_path = temp_dir.path().join("quotes.json");

    let output = run_cli(&[
        "collect",
        "--characters",
        "Naruto Uzumaki",
        "--base-url",
        "http://127.0.0.1:9/v1",
        "--max-attempts",
        "2",
        "--backoff-ms",
        "1",
        "--timeout-ms",
        "500",
        "--output",
        output_path.to_str().expect("utf-8 path"),
    ]);
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("after 2 attempts"), "stderr: {stderr}");
    assert_eq!(
        stderr.matches("failed to fetch quotes").count(),
        1,
        "each failed query is reported once: {stderr}"
    );

    let content = std::fs::read_to_string(&output_path).expect("report must exist");
    let report: serde_json::Value = serde_json::from_str(&content).expect("report must be JSON");
    assert!(report["meta"]["record_count"].as_u64().unwrap_or(0) > 0);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_online_collect_dedupes_without_fallback() {
    let base_url = spawn_quote_server().await;
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let output_path = temp_dir.path().join("quotes.json");
    let output_arg = output_path.to_str().expect("utf-8 path").to_owned();

    let output = tokio::task::spawn_blocking(move || {
        run_cli(&[
            "collect",
            "--characters",
            "Naruto",
            "Sasuke",
            "--base-url",
            base_url.as_str(),
            "--output",
            output_arg.as_str(),
        ])
    })
    .await
    .expect("cli task must finish");
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(!stderr.contains("falling back"), "stderr: {stderr}");

    let content = std::fs::read_to_string(&output_path).expect("report must exist");
    let report: serde_json::Value = serde_json::from_str(&content).expect("report must be JSON");
    assert_eq!(report["meta"]["record_count"], 2);
    assert_eq!(report["data"][0]["anime"], "Mock");
    assert_eq!(report["data"][0]["quote"], "character=Naruto&limit=10");
    assert_eq!(report["data"][1]["quote"], "character=Sasuke&limit=10");
}

#[test]
fn test_empty_api_key_is_rejected_with_base_url() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let output_path = temp_dir.path().join("quotes.json");

    let output = cli_command(&[
        "collect",
        "--characters",
        "Naruto",
        "--base-url",
        "http://127.0.0.1:9/v1",
        "--output",
        output_path.to_str().expect("utf-8 path"),
    ])
    .env("ANIMECHAN_API_KEY", "  ")
    .output()
    .expect("Failed to execute animechan");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("ANIMECHAN_API_KEY"), "stderr: {stderr}");
    assert!(!output_path.exists());
}
