//! Wire-level tests for the EMR HTTP client against a mock server.
//!
//! Verifies authentication headers, JSON parsing, and status/body error
//! classification without a real backend.

use httpmock::prelude::*;
use serde_json::json;

use clinicflow::api::{ApiError, EmrBackend, EmrClient};
use clinicflow::config::ApiConfig;
use clinicflow::session::AuthSession;
use clinicflow::workflow::WorkflowKind;

fn client_for(server: &MockServer) -> EmrClient {
    let config = ApiConfig {
        base_url: server.base_url(),
        timeout_secs: 5,
    };
    EmrClient::new(&config, AuthSession::new("test-token")).unwrap()
}

#[tokio::test]
async fn test_create_initial_sends_bearer_and_parses_id() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/hts-sessions")
                .header("authorization", "Bearer test-token")
                .json_body(json!({"patient_id": "P1", "date": "2024-01-01"}));
            then.status(201).json_body(json!({"id": "rec-42"}));
        })
        .await;

    let client = client_for(&server);
    let created = client
        .create_initial(
            WorkflowKind::Hts,
            &json!({"patient_id": "P1", "date": "2024-01-01"}),
        )
        .await
        .unwrap();

    mock.assert_async().await;
    assert_eq!(created.id, "rec-42");
}

#[tokio::test]
async fn test_409_is_conflict() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/hts-sessions");
            then.status(409)
                .body("record exists for this client and date");
        })
        .await;

    let client = client_for(&server);
    let err = client
        .create_initial(WorkflowKind::Hts, &json!({"patient_id": "P1"}))
        .await
        .unwrap_err();

    assert!(err.is_conflict());
}

#[tokio::test]
async fn test_400_with_duplicate_message_is_conflict() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/eac-episodes");
            then.status(400)
                .body("duplicate EAC episode for P1 on 2024-02-01");
        })
        .await;

    let client = client_for(&server);
    let err = client
        .create_initial(WorkflowKind::Eac, &json!({"patient_id": "P1"}))
        .await
        .unwrap_err();

    assert!(err.is_conflict());
}

#[tokio::test]
async fn test_create_subrecord_posts_to_slot_path() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/hts-sessions/rec-42/testing")
                .header("authorization", "Bearer test-token");
            then.status(201).json_body(json!({
                "id": "rec-42-testing",
                "slot": "testing",
                "payload": {"result": "negative"}
            }));
        })
        .await;

    let client = client_for(&server);
    let subrecord = client
        .create_subrecord(
            WorkflowKind::Hts,
            "rec-42",
            "testing",
            &json!({"result": "negative"}),
        )
        .await
        .unwrap();

    mock.assert_async().await;
    assert_eq!(subrecord.slot, "testing");
}

#[tokio::test]
async fn test_get_complete_parses_flattened_slots() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/hts-sessions/rec-42/complete");
            then.status(200).json_body(json!({
                "id": "rec-42",
                "patient_id": "P1",
                "initial": {"date": "2024-01-01"},
                "pre_test": {"risk": "low"},
                "lab_order": null
            }));
        })
        .await;

    let client = client_for(&server);
    let aggregate = client
        .get_complete(WorkflowKind::Hts, "rec-42")
        .await
        .unwrap();

    assert!(aggregate.has_slot("initial"));
    assert!(aggregate.has_slot("pre_test"));
    // Explicit null means not yet reached
    assert!(!aggregate.has_slot("lab_order"));
}

#[tokio::test]
async fn test_get_patient() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/patients/P1");
            then.status(200).json_body(json!({
                "id": "P1",
                "name": "Wire Patient",
                "date_of_birth": "1990-05-14"
            }));
        })
        .await;

    let client = client_for(&server);
    let patient = client.get_patient("P1").await.unwrap();
    assert_eq!(patient.name, "Wire Patient");
    assert!(patient.date_of_birth.is_some());
}

#[tokio::test]
async fn test_401_is_unauthorized() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/patients/P1");
            then.status(401).body("token expired");
        })
        .await;

    let client = client_for(&server);
    let err = client.get_patient("P1").await.unwrap_err();
    assert!(matches!(err, ApiError::Unauthorized));
}

#[tokio::test]
async fn test_404_is_not_found() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/hts-sessions/rec-unknown/complete");
            then.status(404).body("no such record");
        })
        .await;

    let client = client_for(&server);
    let err = client
        .get_complete(WorkflowKind::Hts, "rec-unknown")
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::NotFound { .. }));
}
