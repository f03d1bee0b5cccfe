//! Integration tests for the `lessonbot` binary.
//!
//! Each test runs the compiled binary against an in-process mock backend,
//! with `XDG_CONFIG_HOME` pointed at a temporary directory so no real
//! config file is read or written.

use std::process::Output;

use tokio::process::Command;

use lessonbot_test_utils::{
    MockBackend, MockReply, failure_body, plan_json, success_body, unreachable_base_url,
};

// -----------------------------------------------------------------------
// Helpers
// -----------------------------------------------------------------------

async fn lessonbot(config_home: &tempfile::TempDir, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_lessonbot"))
        .args(args)
        .env("XDG_CONFIG_HOME", config_home.path())
        .env_remove("LESSONBOT_BACKEND_URL")
        .env_remove("RUST_LOG")
        .output()
        .await
        .expect("failed to run lessonbot binary")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

// -----------------------------------------------------------------------
// Tests
// -----------------------------------------------------------------------

#[tokio::test]
async fn grades_lists_every_level() {
    let home = tempfile::tempdir().unwrap();
    let output = lessonbot(&home, &["grades"]).await;

    assert!(output.status.success());
    let out = stdout(&output);
    assert!(out.contains("Kindergarten"));
    assert!(out.contains("5th Grade"));
    assert!(out.contains("12th Grade"));
}

#[tokio::test]
async fn create_prints_text_plan() {
    let plan = plan_json(
        "Photosynthesis",
        "5th Grade",
        90,
        &["https://example.org/photosynthesis"],
    );
    let backend = MockBackend::start(MockReply::json(200, success_body(plan))).await;
    let home = tempfile::tempdir().unwrap();

    let output = lessonbot(
        &home,
        &[
            "create",
            "Photosynthesis",
            "--grade",
            "5th Grade",
            "--backend-url",
            &backend.base_url,
        ],
    )
    .await;

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let out = stdout(&output);
    assert!(out.contains("Duration: 1h 30m"));
    assert_eq!(out.matches("[Source ").count(), 1);
    assert_eq!(backend.request_count(), 1);
}

#[tokio::test]
async fn create_reports_application_failure() {
    let backend =
        MockBackend::start(MockReply::json(200, failure_body("X", "Generation failed"))).await;
    let home = tempfile::tempdir().unwrap();

    let output = lessonbot(
        &home,
        &["create", "Tides", "--backend-url", &backend.base_url],
    )
    .await;

    assert!(!output.status.success());
    assert!(stderr(&output).contains("Error: X"), "stderr: {}", stderr(&output));
}

#[tokio::test]
async fn blank_topic_fails_without_request() {
    let backend = MockBackend::start(MockReply::json(200, success_body(plan_json(
        "unused", "1st Grade", 30, &[],
    ))))
    .await;
    let home = tempfile::tempdir().unwrap();

    let output = lessonbot(&home, &["create", "   ", "--backend-url", &backend.base_url]).await;

    assert!(!output.status.success());
    assert!(stderr(&output).contains("Please enter a topic"));
    assert_eq!(backend.request_count(), 0);
}

#[tokio::test]
async fn backend_url_env_var_is_used() {
    let backend = MockBackend::start(MockReply::json(200, success_body(plan_json(
        "Magnets", "2nd Grade", 30, &[],
    ))))
    .await;
    let home = tempfile::tempdir().unwrap();

    let output = Command::new(env!("CARGO_BIN_EXE_lessonbot"))
        .args(["create", "Magnets", "--format", "json"])
        .env("XDG_CONFIG_HOME", home.path())
        .env("LESSONBOT_BACKEND_URL", &backend.base_url)
        .output()
        .await
        .unwrap();

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["topic"], "Magnets");
    assert_eq!(json["duration_minutes"], 30);
}

#[tokio::test]
async fn health_against_live_and_dead_backends() {
    let backend = MockBackend::start(MockReply::json(200, success_body(plan_json(
        "unused", "1st Grade", 30, &[],
    ))))
    .await;
    let home = tempfile::tempdir().unwrap();

    let output = lessonbot(&home, &["health", "--backend-url", &backend.base_url]).await;
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(stdout(&output).contains("healthy"));

    let dead = unreachable_base_url();
    let output = lessonbot(&home, &["health", "--backend-url", &dead]).await;
    assert!(!output.status.success());
    assert!(stderr(&output).contains("Backend server is not responding"));
}

#[tokio::test]
async fn init_writes_config_then_refuses_overwrite() {
    let home = tempfile::tempdir().unwrap();

    let output = lessonbot(&home, &["init", "--url", "http://localhost:8000/"]).await;
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    let path = home.path().join("lessonbot").join("config.toml");
    let contents = std::fs::read_to_string(&path).unwrap();
    assert!(contents.contains("http://localhost:8000/"));

    let output = lessonbot(&home, &["init"]).await;
    assert!(!output.status.success());
    assert!(stderr(&output).contains("--force"));

    let output = lessonbot(&home, &["init", "--force"]).await;
    assert!(output.status.success());
}
