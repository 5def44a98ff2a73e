//! Integration tests for the end-to-end scan flow.
//!
//! Each test drives a real orchestrator against the in-memory mock reader
//! and a scripted transport: badge tap → NDEF decode → resolve → submit →
//! outcome, including the partial-failure paths (timeouts, malformed tags,
//! transport errors, cancellation) the orchestrator exists to contain.

use lanyard_api::mock::MockTransport;
use lanyard_checkin::{CheckInOrchestrator, OrchestratorConfig};
use lanyard_core::{CheckDirection, Error, TagName};
use lanyard_reader::mock::{MockReader, MockReaderHandle};
use serde_json::{Value, json};
use std::time::Duration;
use tokio_util::sync::CancellationToken;

// ============================================================================
// Test Data
// ============================================================================

/// Common test data used across multiple tests
mod test_data {
    /// Service-side user id stored on the test badge
    pub const USER_ID: &str = "7dd00021-89fd-49f1-9c17-bd0ba7dcf97e";

    /// Checkpoint targeted by the scans
    pub const TAG: &str = "venue-entrance";

    /// Short read timeout for timeout-path tests (milliseconds)
    pub const SHORT_TIMEOUT_MS: u64 = 50;
}

/// A bare URI record carrying `identifier` with the empty abbreviation.
fn tag_bytes(identifier: &str) -> Vec<u8> {
    let mut raw = vec![0xD1, 0x01, (identifier.len() + 1) as u8, 0x55, 0x00];
    raw.extend_from_slice(identifier.as_bytes());
    raw
}

fn user_json(id: &str, accepted: bool, confirmed: bool) -> Value {
    json!({
        "id": id,
        "applied": true,
        "accepted": accepted,
        "confirmed": confirmed,
        "confirmationBranch": "Participant",
        "application": { "type": "Participant" },
        "confirmation": { "type": "Participant" },
        "name": "Jane Doe",
        "email": "jane@example.org",
        "questions": [ { "name": "major", "answer": "CS" } ],
    })
}

fn tag_state_json(name: &str, checked_in: bool, checkin_success: bool) -> Value {
    json!({
        "tag": { "name": name },
        "checked_in": checked_in,
        "checkin_success": checkin_success,
        "last_successful_checkin": null,
    })
}

/// A `UserGet` envelope for an eligible user with one tag state.
fn user_get_response(id: &str, checked_in: bool) -> Value {
    let mut user = user_json(id, true, true);
    user["tags"] = json!([tag_state_json(test_data::TAG, checked_in, false)]);
    json!({ "data": { "user": user } })
}

/// A `CheckInTag` envelope with the refreshed tag state.
fn check_in_response(id: &str, checked_in: bool, checkin_success: bool) -> Value {
    json!({
        "data": {
            "check_in": {
                "user": user_json(id, true, true),
                "tags": [tag_state_json(test_data::TAG, checked_in, checkin_success)],
            }
        }
    })
}

/// Orchestrator over fresh mocks, with a tag already presented.
async fn orchestrator_with_tap(
    transport: &MockTransport,
) -> (
    CheckInOrchestrator<MockReader, MockTransport>,
    MockReaderHandle,
) {
    let (reader, handle) = MockReader::new();
    handle
        .present_tag(tag_bytes(test_data::USER_ID))
        .await
        .unwrap();
    (
        CheckInOrchestrator::new(reader, transport.clone()),
        handle,
    )
}

fn tag() -> TagName {
    TagName::new(test_data::TAG).unwrap()
}

// ============================================================================
// Happy Path
// ============================================================================

#[tokio::test]
async fn test_check_in_flow_completes() {
    let transport = MockTransport::new();
    transport.enqueue_response(user_get_response(test_data::USER_ID, false));
    transport.enqueue_response(check_in_response(test_data::USER_ID, true, true));

    let (mut orchestrator, handle) = orchestrator_with_tap(&transport).await;
    let outcome = orchestrator
        .process_scan(&tag(), CheckDirection::In)
        .await
        .unwrap();

    assert!(outcome.is_completed());
    assert_eq!(outcome.user().id, test_data::USER_ID);
    assert!(outcome.tag_state().checked_in);
    assert_eq!(handle.open_session_count(), 0);

    // Resolve first, then exactly one mutation, with the contract variables.
    let calls = transport.recorded_calls();
    assert_eq!(calls.len(), 2);
    assert_eq!(calls[0].operation_name, "UserGet");
    assert_eq!(calls[0].variables["id"], test_data::USER_ID);
    assert_eq!(calls[1].operation_name, "CheckInTag");
    assert_eq!(calls[1].variables["tag"], test_data::TAG);
    assert_eq!(calls[1].variables["checkin"], true);
}

#[tokio::test]
async fn test_check_out_flow_completes() {
    let transport = MockTransport::new();
    transport.enqueue_response(user_get_response(test_data::USER_ID, true));
    transport.enqueue_response(check_in_response(test_data::USER_ID, false, true));

    let (mut orchestrator, _handle) = orchestrator_with_tap(&transport).await;
    let outcome = orchestrator
        .process_scan(&tag(), CheckDirection::Out)
        .await
        .unwrap();

    assert!(outcome.is_completed());
    assert!(!outcome.tag_state().checked_in);
    assert_eq!(transport.recorded_calls()[1].variables["checkin"], false);
}

// ============================================================================
// Duplicate Detection
// ============================================================================

#[tokio::test]
async fn test_repeated_check_in_reports_already_in_state() {
    let transport = MockTransport::new();
    // Already checked in; the service refuses to flip the state again.
    transport.enqueue_response(user_get_response(test_data::USER_ID, true));
    transport.enqueue_response(check_in_response(test_data::USER_ID, true, false));

    let (mut orchestrator, _handle) = orchestrator_with_tap(&transport).await;
    let outcome = orchestrator
        .process_scan(&tag(), CheckDirection::In)
        .await
        .unwrap();

    assert!(outcome.is_already_in_state());
    assert!(!outcome.is_completed());
    assert_eq!(outcome.user().id, test_data::USER_ID);
}

#[tokio::test]
async fn test_repeated_check_out_reports_already_in_state() {
    let transport = MockTransport::new();
    transport.enqueue_response(user_get_response(test_data::USER_ID, false));
    transport.enqueue_response(check_in_response(test_data::USER_ID, false, false));

    let (mut orchestrator, _handle) = orchestrator_with_tap(&transport).await;
    let outcome = orchestrator
        .process_scan(&tag(), CheckDirection::Out)
        .await
        .unwrap();

    assert!(outcome.is_already_in_state());
}

#[tokio::test]
async fn test_refusal_with_direction_mismatch_is_rejected() {
    let transport = MockTransport::new();
    // Not checked in, yet the service refused the check-in: a real refusal,
    // not the repeated-scan case.
    transport.enqueue_response(user_get_response(test_data::USER_ID, false));
    transport.enqueue_response(check_in_response(test_data::USER_ID, false, false));

    let (mut orchestrator, _handle) = orchestrator_with_tap(&transport).await;
    let err = orchestrator
        .process_scan(&tag(), CheckDirection::In)
        .await
        .unwrap_err();

    assert!(matches!(err, Error::CheckInRejected { .. }));
}

// ============================================================================
// Resolution Failures
// ============================================================================

#[tokio::test]
async fn test_unknown_user_fails_before_mutation() {
    let transport = MockTransport::new();
    transport.enqueue_response(json!({ "data": { "user": null } }));

    let (mut orchestrator, handle) = orchestrator_with_tap(&transport).await;
    let err = orchestrator
        .process_scan(&tag(), CheckDirection::In)
        .await
        .unwrap_err();

    assert!(matches!(err, Error::UnknownUser { .. }));
    assert_eq!(transport.call_count(), 1);
    assert_eq!(handle.open_session_count(), 0);
}

#[tokio::test]
async fn test_ineligible_user_rejected_before_mutation() {
    let transport = MockTransport::new();
    let mut user = user_json(test_data::USER_ID, true, false);
    user["tags"] = json!([]);
    transport.enqueue_response(json!({ "data": { "user": user } }));

    let (mut orchestrator, _handle) = orchestrator_with_tap(&transport).await;
    let err = orchestrator
        .process_scan(&tag(), CheckDirection::In)
        .await
        .unwrap_err();

    assert!(matches!(err, Error::CheckInRejected { .. }));
    assert_eq!(transport.call_count(), 1);
}

// ============================================================================
// Local Failures Never Reach The Network
// ============================================================================

#[tokio::test]
async fn test_malformed_tag_never_reaches_transport() {
    let transport = MockTransport::new();
    let (reader, handle) = MockReader::new();
    handle
        .present_tag(vec![0x42, 0x13, 0x37, 0x42, 0x13, 0x37])
        .await
        .unwrap();

    let mut orchestrator = CheckInOrchestrator::new(reader, transport.clone());
    let err = orchestrator
        .process_scan(&tag(), CheckDirection::In)
        .await
        .unwrap_err();

    assert!(matches!(err, Error::MalformedTag { .. }));
    assert_eq!(transport.call_count(), 0);
    assert_eq!(handle.open_session_count(), 0);
}

#[tokio::test]
async fn test_invalid_search_parameters_make_no_transport_call() {
    use lanyard_api::ApiOperation;

    let transport = MockTransport::new();
    let err = ApiOperation::UserSearch {
        text: String::new(),
        limit: 10,
    }
    .into_request()
    .unwrap_err();

    assert!(matches!(err, Error::InvalidParameters { .. }));
    assert_eq!(transport.call_count(), 0);
}

// ============================================================================
// Timeouts, Transport Failures, Cancellation
// ============================================================================

#[tokio::test]
async fn test_reading_timeout_releases_session() {
    let transport = MockTransport::new();
    let (reader, handle) = MockReader::new();
    // No tag presented: the read suspends until the timeout fires.
    let config = OrchestratorConfig {
        read_timeout: Duration::from_millis(test_data::SHORT_TIMEOUT_MS),
        ..OrchestratorConfig::default()
    };

    let mut orchestrator = CheckInOrchestrator::with_config(reader, transport.clone(), config);
    let err = orchestrator
        .process_scan(&tag(), CheckDirection::In)
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Timeout { .. }));
    assert_eq!(handle.open_session_count(), 0, "session leaked on timeout");
    assert_eq!(transport.call_count(), 0);
}

#[tokio::test]
async fn test_reader_failure_surfaces() {
    let transport = MockTransport::new();
    let (reader, handle) = MockReader::new();
    handle.fail_next_open();

    let mut orchestrator = CheckInOrchestrator::new(reader, transport.clone());
    let err = orchestrator
        .process_scan(&tag(), CheckDirection::In)
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Reader { .. }));
    assert_eq!(handle.open_session_count(), 0);
}

#[tokio::test]
async fn test_transport_error_is_not_retried() {
    let transport = MockTransport::new();
    transport.enqueue_response(user_get_response(test_data::USER_ID, false));
    transport.enqueue_error("connection refused");

    let (mut orchestrator, _handle) = orchestrator_with_tap(&transport).await;
    let err = orchestrator
        .process_scan(&tag(), CheckDirection::In)
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Transport { .. }));
    // Exactly one mutation attempt: a failed check-in must never be
    // resubmitted blindly.
    assert_eq!(transport.call_count(), 2);
}

#[tokio::test]
async fn test_transport_timeout_fails_scan() {
    let transport = MockTransport::new();
    transport.enqueue_hang();

    let config = OrchestratorConfig {
        transport_timeout: Duration::from_millis(test_data::SHORT_TIMEOUT_MS),
        ..OrchestratorConfig::default()
    };
    let (reader, handle) = MockReader::new();
    handle
        .present_tag(tag_bytes(test_data::USER_ID))
        .await
        .unwrap();

    let mut orchestrator = CheckInOrchestrator::with_config(reader, transport.clone(), config);
    let err = orchestrator
        .process_scan(&tag(), CheckDirection::In)
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Timeout { .. }));
    assert_eq!(handle.open_session_count(), 0);
}

#[tokio::test]
async fn test_cancellation_mid_submit_is_distinct() {
    let transport = MockTransport::new();
    transport.enqueue_response(user_get_response(test_data::USER_ID, false));
    transport.enqueue_hang();

    let (mut orchestrator, _handle) = orchestrator_with_tap(&transport).await;

    let cancel = CancellationToken::new();
    let trigger = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(20)).await;
        trigger.cancel();
    });

    let err = orchestrator
        .process_scan_cancellable(&tag(), CheckDirection::In, &cancel)
        .await
        .unwrap_err();

    // Cancelled, not Failed: the mutation may have landed server-side.
    assert!(matches!(err, Error::Cancelled));
    assert_eq!(transport.call_count(), 2);
}

// ============================================================================
// Configuration Variants
// ============================================================================

#[tokio::test]
async fn test_skipping_resolution_uses_refreshed_state() {
    let transport = MockTransport::new();
    transport.enqueue_response(check_in_response(test_data::USER_ID, true, false));

    let config = OrchestratorConfig {
        resolve_before_submit: false,
        ..OrchestratorConfig::default()
    };
    let (reader, handle) = MockReader::new();
    handle
        .present_tag(tag_bytes(test_data::USER_ID))
        .await
        .unwrap();

    let mut orchestrator = CheckInOrchestrator::with_config(reader, transport.clone(), config);
    let outcome = orchestrator
        .process_scan(&tag(), CheckDirection::In)
        .await
        .unwrap();

    // Without a resolve pass, the pre-existing state comes from the
    // refreshed snapshot in the mutation response.
    assert!(outcome.is_already_in_state());
    assert_eq!(transport.call_count(), 1);
    assert_eq!(transport.recorded_calls()[0].operation_name, "CheckInTag");
}

#[tokio::test]
async fn test_sequential_scans_run_fresh_state_machines() {
    let transport = MockTransport::new();
    transport.enqueue_response(user_get_response(test_data::USER_ID, false));
    transport.enqueue_response(check_in_response(test_data::USER_ID, true, true));
    transport.enqueue_response(user_get_response(test_data::USER_ID, true));
    transport.enqueue_response(check_in_response(test_data::USER_ID, false, true));

    let (reader, handle) = MockReader::new();
    handle
        .present_tag(tag_bytes(test_data::USER_ID))
        .await
        .unwrap();
    handle
        .present_tag(tag_bytes(test_data::USER_ID))
        .await
        .unwrap();

    let mut orchestrator = CheckInOrchestrator::new(reader, transport.clone());

    let first = orchestrator
        .process_scan(&tag(), CheckDirection::In)
        .await
        .unwrap();
    assert!(first.is_completed());

    let second = orchestrator
        .process_scan(&tag(), CheckDirection::Out)
        .await
        .unwrap();
    assert!(second.is_completed());

    assert_eq!(handle.open_session_count(), 0);
    assert_eq!(transport.call_count(), 4);
}

#[tokio::test]
async fn test_scan_of_text_badge() {
    let transport = MockTransport::new();
    transport.enqueue_response(user_get_response(test_data::USER_ID, false));
    transport.enqueue_response(check_in_response(test_data::USER_ID, true, true));

    // Text record: status byte, "en", identifier.
    let mut raw = vec![
        0xD1,
        0x01,
        (test_data::USER_ID.len() + 3) as u8,
        0x54,
        0x02,
    ];
    raw.extend_from_slice(b"en");
    raw.extend_from_slice(test_data::USER_ID.as_bytes());

    let (reader, handle) = MockReader::new();
    handle.present_tag(raw).await.unwrap();

    let mut orchestrator = CheckInOrchestrator::new(reader, transport.clone());
    let outcome = orchestrator
        .process_scan(&tag(), CheckDirection::In)
        .await
        .unwrap();

    assert!(outcome.is_completed());
    assert_eq!(
        transport.recorded_calls()[0].variables["id"],
        test_data::USER_ID
    );
}
