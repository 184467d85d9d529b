//! Record-replay integration test.
//!
//! Builds a cassette of issue-field fetches, replays it through
//! `ServiceContext::replaying()` and checks the verdicts, twice, to show
//! that unchanged remote state yields identical verdicts.

use std::path::Path;

use serde_json::json;

use dateguard::cassette::recorder::CassetteRecorder;
use dateguard::context::ServiceContext;
use dateguard::hook::HookResponse;
use dateguard::validate::{validate, IssueReference};

const ADMIN_MESSAGE: &str =
    "Unable to validate date fields. Please contact your Jira administrator.";

fn write_cassette(path: &Path) {
    let mut recorder = CassetteRecorder::new(path, "workflow-scenarios", "https://acme.example/");
    let fetch = |key: &str| json!({"key": key, "fields": ["duedate", "startdate"]});

    recorder.record(
        "issues",
        "fetch_fields",
        fetch("PROJ-1"),
        json!({"Ok": {"fields": {"duedate": null, "startdate": "2024-01-01"}}}),
    );
    recorder.record(
        "issues",
        "fetch_fields",
        fetch("PROJ-2"),
        json!({"Ok": {"fields": {"duedate": "2024-02-01", "startdate": "2024-01-01"}}}),
    );
    recorder.record(
        "issues",
        "fetch_fields",
        fetch("PROJ-3"),
        json!({"Ok": {"fields": {"duedate": null, "startdate": null}}}),
    );
    recorder.record(
        "issues",
        "fetch_fields",
        fetch("PROJ-4"),
        json!({"Err": {"Status": {"status": 403}}}),
    );
    recorder.finish().expect("recording should succeed");
}

async fn replay_all(path: &Path) -> Vec<HookResponse> {
    let ctx = ServiceContext::replaying(path, "startdate").unwrap();
    let mut responses = Vec::new();
    for key in ["PROJ-1", "PROJ-2", "PROJ-3", "PROJ-4"] {
        let verdict = validate(&ctx, &IssueReference::new(key)).await;
        responses.push(HookResponse::from(verdict));
    }
    responses
}

#[tokio::test]
async fn replayed_scenarios_produce_expected_verdicts() {
    let dir = std::env::temp_dir().join("dateguard_record_replay_test");
    let _ = std::fs::remove_dir_all(&dir);
    let path = dir.join("scenarios.cassette.yaml");
    write_cassette(&path);

    let first = replay_all(&path).await;
    let encoded: Vec<_> = first.iter().map(|r| serde_json::to_value(r).unwrap()).collect();
    assert_eq!(
        encoded,
        vec![
            json!({
                "result": false,
                "errorMessage": "Due Date must be set before transitioning this issue."
            }),
            json!({"result": true}),
            json!({
                "result": false,
                "errorMessage":
                    "Start Date and Due Date must be set before transitioning this issue."
            }),
            json!({"result": false, "errorMessage": ADMIN_MESSAGE}),
        ]
    );

    // Same cassette, fresh context: identical verdicts.
    let second = replay_all(&path).await;
    assert_eq!(first, second);

    let _ = std::fs::remove_dir_all(&dir);
}

#[tokio::test]
#[should_panic(expected = "Cassette exhausted")]
async fn validating_past_the_recording_panics() {
    let dir = std::env::temp_dir().join("dateguard_record_replay_exhausted");
    let _ = std::fs::remove_dir_all(&dir);
    let path = dir.join("one.cassette.yaml");

    let mut recorder = CassetteRecorder::new(&path, "one", "https://acme.example/");
    recorder.record(
        "issues",
        "fetch_fields",
        json!({"key": "PROJ-1", "fields": ["duedate", "startdate"]}),
        json!({"Ok": {"fields": {}}}),
    );
    recorder.finish().unwrap();

    let ctx = ServiceContext::replaying(&path, "startdate").unwrap();
    let _ = validate(&ctx, &IssueReference::new("PROJ-1")).await;
    let _ = validate(&ctx, &IssueReference::new("PROJ-2")).await;
}
