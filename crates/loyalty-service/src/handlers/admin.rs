//! Admin handlers: balance adjustments and manual expiration sweeps.

use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use loyalty_core::MemberId;

use crate::auth::AdminAuth;
use crate::error::ApiError;
use crate::state::AppState;

/// Admin adjustment request.
#[derive(Debug, Deserialize)]
pub struct AdjustRequest {
    /// Member to adjust.
    pub member_id: String,
    /// Signed point delta (non-zero; negative deltas may not drive the
    /// balance below zero).
    pub delta: i64,
    /// Reason for the adjustment.
    pub description: String,
}

/// Admin adjustment response.
#[derive(Debug, Serialize)]
pub struct AdjustResponse {
    /// Balance after the adjustment.
    pub new_balance: i64,
    /// The appended transaction.
    pub transaction_id: String,
}

/// Apply a manual balance correction.
pub async fn adjust_balance(
    State(state): State<Arc<AppState>>,
    auth: AdminAuth,
    Json(body): Json<AdjustRequest>,
) -> Result<Json<AdjustResponse>, ApiError> {
    let member_id = body
        .member_id
        .parse::<MemberId>()
        .map_err(|_| ApiError::BadRequest("Invalid member ID".into()))?;

    let outcome = state.engine.adjust(
        member_id,
        body.delta,
        body.description.clone(),
        &auth.capability,
    )?;

    tracing::info!(
        member_id = %member_id,
        delta = %body.delta,
        reason = %body.description,
        new_balance = %outcome.new_balance,
        "Admin adjustment applied"
    );

    Ok(Json(AdjustResponse {
        new_balance: outcome.new_balance,
        transaction_id: outcome.transaction_id.to_string(),
    }))
}

/// Manual sweep request. The cutoff defaults to now; tests and backfills
/// can pin it.
#[derive(Debug, Default, Deserialize)]
pub struct SweepRequest {
    /// Expire entries due at or before this instant.
    #[serde(default)]
    pub as_of: Option<DateTime<Utc>>,
}

/// Sweep response.
#[derive(Debug, Serialize)]
pub struct SweepResponse {
    /// Total points removed by this sweep.
    pub expired_points: i64,
    /// Number of earned entries newly expired.
    pub transactions_processed: u64,
}

/// Run an expiration sweep immediately.
///
/// The sweep is idempotent; running it again with the same cutoff
/// processes nothing new.
pub async fn run_expiration_sweep(
    State(state): State<Arc<AppState>>,
    _auth: AdminAuth,
    body: Option<Json<SweepRequest>>,
) -> Result<Json<SweepResponse>, ApiError> {
    let as_of = body
        .and_then(|Json(req)| req.as_of)
        .unwrap_or_else(Utc::now);

    let report = state.engine.run_expiration_sweep(as_of)?;

    Ok(Json(SweepResponse {
        expired_points: report.expired_points,
        transactions_processed: report.transactions_processed,
    }))
}
