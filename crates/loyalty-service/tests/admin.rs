//! Admin endpoint integration tests: adjustments and manual sweeps.

mod common;

use axum::http::StatusCode;
use chrono::{Duration, Utc};
use common::TestHarness;
use serde_json::json;

// ============================================================================
// Adjust
// ============================================================================

#[tokio::test]
async fn adjust_credits_and_debits() {
    let harness = TestHarness::new();

    let response = harness
        .server
        .post("/v1/admin/adjust")
        .add_header("x-admin-key", &harness.admin_api_key)
        .json(&json!({
            "member_id": harness.test_member_id.to_string(),
            "delta": 200,
            "description": "Goodwill credit"
        }))
        .await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["new_balance"], 200);

    let response = harness
        .server
        .post("/v1/admin/adjust")
        .add_header("x-admin-key", &harness.admin_api_key)
        .json(&json!({
            "member_id": harness.test_member_id.to_string(),
            "delta": -50,
            "description": "Posting error"
        }))
        .await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["new_balance"], 150);
}

#[tokio::test]
async fn adjust_rejects_negative_result() {
    let harness = TestHarness::new();
    harness.fund_member(50).await;

    let response = harness
        .server
        .post("/v1/admin/adjust")
        .add_header("x-admin-key", &harness.admin_api_key)
        .json(&json!({
            "member_id": harness.test_member_id.to_string(),
            "delta": -100,
            "description": "Too much"
        }))
        .await;

    response.assert_status(StatusCode::CONFLICT);
    let body: serde_json::Value = response.json();
    assert_eq!(body["error"]["code"], "negative_balance_rejected");
    assert_eq!(body["error"]["details"]["balance"], 50);
    assert_eq!(body["error"]["details"]["delta"], -100);
}

#[tokio::test]
async fn adjust_requires_admin_key() {
    let harness = TestHarness::new();

    let response = harness
        .server
        .post("/v1/admin/adjust")
        .add_header("x-api-key", &harness.service_api_key) // Service key is not enough
        .json(&json!({
            "member_id": harness.test_member_id.to_string(),
            "delta": 100,
            "description": "Sneaky"
        }))
        .await;

    response.assert_status(StatusCode::UNAUTHORIZED);
}

// ============================================================================
// Expiration sweep
// ============================================================================

#[tokio::test]
async fn sweep_expires_and_is_idempotent() {
    let harness = TestHarness::new();
    let expired_at = Utc::now() - Duration::days(1);

    harness
        .server
        .post("/v1/points/earn")
        .add_header("x-api-key", &harness.service_api_key)
        .json(&json!({
            "member_id": harness.test_member_id.to_string(),
            "points": 400,
            "source": "purchase",
            "description": "Old purchase",
            "expires_at": expired_at.to_rfc3339()
        }))
        .await
        .assert_status_ok();

    let response = harness
        .server
        .post("/v1/admin/expiration-sweep")
        .add_header("x-admin-key", &harness.admin_api_key)
        .await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["expired_points"], 400);
    assert_eq!(body["transactions_processed"], 1);

    // Second sweep finds nothing new.
    let response = harness
        .server
        .post("/v1/admin/expiration-sweep")
        .add_header("x-admin-key", &harness.admin_api_key)
        .await;

    let body: serde_json::Value = response.json();
    assert_eq!(body["expired_points"], 0);
    assert_eq!(body["transactions_processed"], 0);

    let balance: serde_json::Value = harness
        .server
        .get("/v1/points/balance")
        .add_header("x-member-id", harness.test_member_id.to_string())
        .await
        .json();
    assert_eq!(balance["balance"], 0);
}

#[tokio::test]
async fn sweep_respects_pinned_cutoff() {
    let harness = TestHarness::new();
    let future = Utc::now() + Duration::days(30);

    harness
        .server
        .post("/v1/points/earn")
        .add_header("x-api-key", &harness.service_api_key)
        .json(&json!({
            "member_id": harness.test_member_id.to_string(),
            "points": 100,
            "source": "check_in",
            "description": "Expires next month",
            "expires_at": future.to_rfc3339()
        }))
        .await
        .assert_status_ok();

    // Sweep as of now: nothing due yet.
    let body: serde_json::Value = harness
        .server
        .post("/v1/admin/expiration-sweep")
        .add_header("x-admin-key", &harness.admin_api_key)
        .await
        .json();
    assert_eq!(body["transactions_processed"], 0);

    // Sweep pinned past the horizon expires it.
    let body: serde_json::Value = harness
        .server
        .post("/v1/admin/expiration-sweep")
        .add_header("x-admin-key", &harness.admin_api_key)
        .json(&json!({ "as_of": (future + Duration::days(1)).to_rfc3339() }))
        .await
        .json();
    assert_eq!(body["expired_points"], 100);
    assert_eq!(body["transactions_processed"], 1);
}

#[tokio::test]
async fn sweep_requires_admin_key() {
    let harness = TestHarness::new();

    let response = harness.server.post("/v1/admin/expiration-sweep").await;

    response.assert_status(StatusCode::UNAUTHORIZED);
}
