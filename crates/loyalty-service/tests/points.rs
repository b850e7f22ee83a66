//! Points endpoint integration tests: earning, balance, and history.

mod common;

use axum::http::StatusCode;
use common::TestHarness;
use serde_json::json;

// ============================================================================
// Earn
// ============================================================================

#[tokio::test]
async fn earn_credits_points() {
    let harness = TestHarness::new();

    let response = harness
        .server
        .post("/v1/points/earn")
        .add_header("x-api-key", &harness.service_api_key)
        .add_header("x-service-name", "checkin-service")
        .json(&json!({
            "member_id": harness.test_member_id.to_string(),
            "points": 50,
            "source": "check_in",
            "description": "Checked in at downtown"
        }))
        .await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["new_balance"], 50);
    assert_eq!(body["total_earned"], 50);
    assert!(body["transaction_id"].is_string());
}

#[tokio::test]
async fn earn_requires_service_key() {
    let harness = TestHarness::new();

    let response = harness
        .server
        .post("/v1/points/earn")
        .json(&json!({
            "member_id": harness.test_member_id.to_string(),
            "points": 50,
            "source": "check_in",
            "description": "No key"
        }))
        .await;

    response.assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn earn_rejects_wrong_service_key() {
    let harness = TestHarness::new();

    let response = harness
        .server
        .post("/v1/points/earn")
        .add_header("x-api-key", "wrong-key")
        .json(&json!({
            "member_id": harness.test_member_id.to_string(),
            "points": 50,
            "source": "check_in",
            "description": "Bad key"
        }))
        .await;

    response.assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn earn_rejects_non_positive_points() {
    let harness = TestHarness::new();

    let response = harness
        .server
        .post("/v1/points/earn")
        .add_header("x-api-key", &harness.service_api_key)
        .json(&json!({
            "member_id": harness.test_member_id.to_string(),
            "points": 0,
            "source": "referral",
            "description": "Zero points"
        }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: serde_json::Value = response.json();
    assert_eq!(body["error"]["code"], "bad_request");
}

#[tokio::test]
async fn earn_with_ttl_sets_expiry() {
    let harness = TestHarness::new();

    harness
        .server
        .post("/v1/points/earn")
        .add_header("x-api-key", &harness.service_api_key)
        .json(&json!({
            "member_id": harness.test_member_id.to_string(),
            "points": 100,
            "source": "challenge",
            "description": "Summer challenge",
            "ttl_days": 365
        }))
        .await
        .assert_status_ok();

    let response = harness
        .server
        .get("/v1/points/transactions")
        .add_header("x-member-id", harness.test_member_id.to_string())
        .await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert!(body["transactions"][0]["expires_at"].is_string());
}

// ============================================================================
// Balance
// ============================================================================

#[tokio::test]
async fn balance_is_zero_for_new_member() {
    let harness = TestHarness::new();

    let response = harness
        .server
        .get("/v1/points/balance")
        .add_header("x-member-id", harness.test_member_id.to_string())
        .await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["balance"], 0);
    assert_eq!(body["total_earned"], 0);
    assert_eq!(body["total_redeemed"], 0);
}

#[tokio::test]
async fn balance_requires_member_identity() {
    let harness = TestHarness::new();

    let response = harness.server.get("/v1/points/balance").await;

    response.assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn balance_reflects_earns() {
    let harness = TestHarness::new();
    harness.fund_member(750).await;

    let response = harness
        .server
        .get("/v1/points/balance")
        .add_header("x-member-id", harness.test_member_id.to_string())
        .await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["balance"], 750);
    assert_eq!(body["total_earned"], 750);
}

// ============================================================================
// History
// ============================================================================

#[tokio::test]
async fn transactions_list_newest_first_with_pagination() {
    let harness = TestHarness::new();

    for (points, description) in [(10, "First"), (20, "Second"), (30, "Third")] {
        harness
            .server
            .post("/v1/points/earn")
            .add_header("x-api-key", &harness.service_api_key)
            .json(&json!({
                "member_id": harness.test_member_id.to_string(),
                "points": points,
                "source": "check_in",
                "description": description
            }))
            .await
            .assert_status_ok();
    }

    let response = harness
        .server
        .get("/v1/points/transactions")
        .add_query_param("limit", "2")
        .add_header("x-member-id", harness.test_member_id.to_string())
        .await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["transactions"].as_array().unwrap().len(), 2);
    assert_eq!(body["transactions"][0]["description"], "Third");
    assert_eq!(body["transactions"][1]["description"], "Second");
    assert_eq!(body["has_more"], true);

    let response = harness
        .server
        .get("/v1/points/transactions")
        .add_query_param("limit", "2")
        .add_query_param("offset", "2")
        .add_header("x-member-id", harness.test_member_id.to_string())
        .await;

    let body: serde_json::Value = response.json();
    assert_eq!(body["transactions"].as_array().unwrap().len(), 1);
    assert_eq!(body["transactions"][0]["description"], "First");
    assert_eq!(body["has_more"], false);
}

#[tokio::test]
async fn transactions_empty_for_new_member() {
    let harness = TestHarness::new();

    let response = harness
        .server
        .get("/v1/points/transactions")
        .add_header("x-member-id", harness.test_member_id.to_string())
        .await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert!(body["transactions"].as_array().unwrap().is_empty());
    assert_eq!(body["has_more"], false);
}
