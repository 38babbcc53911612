//! HTTP API tests. The browser engine is replaced by `cat` over recorded
//! output, so these run on Unix only.
#![cfg(unix)]

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use std::sync::Arc;
use tower::ServiceExt;

use mission_runner::api::app;
use mission_runner::command::CommandRunner;
use mission_runner::report::types::{Report, TestRunReport};
use mission_runner::utils::config::Config;
use mission_runner::MissionService;

fn fixture(name: &str) -> String {
    let path = format!("{}/tests/fixtures/{}", env!("CARGO_MANIFEST_DIR"), name);
    shell_words::quote(&path).into_owned()
}

/// `cat` also receives the mission id as a file name, fails on it and exits
/// non-zero, but the fixture is already on stdout.
fn recorded_config() -> Config {
    Config {
        verify_command: format!("cat {}", fixture("example_events.ndjson")),
        list_command: format!("cat {}", fixture("example_requirements.json")),
        ..Config::default()
    }
}

fn test_app(config: &Config) -> Router {
    let missions = MissionService::new(Arc::new(CommandRunner::default()), config).unwrap();
    app(Arc::new(missions))
}

async fn get(app: Router, uri: &str) -> (StatusCode, String) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();

    (status, String::from_utf8(body.to_vec()).unwrap())
}

#[tokio::test]
async fn test_health_check() {
    let (status, body) = get(test_app(&recorded_config()), "/api/health-check").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "OK");
}

#[tokio::test]
async fn test_health_check_ignores_broken_engine() {
    let config = Config {
        verify_command: "false".to_string(),
        ..Config::default()
    };

    let (status, _) = get(test_app(&config), "/api/health-check").await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_verify_mission() {
    let (status, body) = get(test_app(&recorded_config()), "/api/missions/example/verify").await;
    assert_eq!(status, StatusCode::OK);

    let report: TestRunReport = serde_json::from_str(&body).unwrap();
    assert!(report.created_at.is_some());
    assert_eq!(report.tests.len(), 3);
    assert_eq!(report.summary().failed, 1);
    assert_eq!(report.summary().passed, 2);
}

#[tokio::test]
async fn test_mission_requirements() {
    let app = test_app(&recorded_config());

    let (status, first) = get(app.clone(), "/api/missions/example/requirements").await;
    assert_eq!(status, StatusCode::OK);

    let (_, second) = get(app, "/api/missions/example/requirements").await;

    let first: TestRunReport = serde_json::from_str(&first).unwrap();
    let second: TestRunReport = serde_json::from_str(&second).unwrap();

    assert_eq!(first.tests.len(), 3);
    assert!(first.tests.iter().all(Report::is_requirement));
    assert_eq!(first.tests, second.tests);
}

#[tokio::test]
async fn test_requirements_json_has_only_ids_and_titles() {
    let (_, body) = get(
        test_app(&recorded_config()),
        "/api/missions/example/requirements",
    )
    .await;

    let value: serde_json::Value = serde_json::from_str(&body).unwrap();
    for test in value["tests"].as_array().unwrap() {
        let mut keys: Vec<&str> = test.as_object().unwrap().keys().map(String::as_str).collect();
        keys.sort_unstable();
        assert_eq!(keys, vec!["id", "title"]);
    }
}

#[tokio::test]
async fn test_verify_without_mission_id_is_not_found() {
    let app = test_app(&recorded_config());

    let (status, _) = get(app.clone(), "/api/missions/verify").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = get(app, "/api/missions/%20/verify").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_engine_failure_is_internal_error() {
    let config = Config {
        verify_command: "false".to_string(),
        ..Config::default()
    };

    let (status, body) = get(test_app(&config), "/api/missions/example/verify").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body.starts_with("Failed to perform a command"), "{body}");
}

#[tokio::test]
async fn test_malformed_output_is_internal_error() {
    let config = Config {
        list_command: "echo Running 3 tests using 3 workers".to_string(),
        ..Config::default()
    };

    let (status, body) = get(test_app(&config), "/api/missions/example/requirements").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body.starts_with("Failed to produce a test report"), "{body}");
}
