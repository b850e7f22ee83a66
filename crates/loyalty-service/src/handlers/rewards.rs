//! Reward redemption handlers.

use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

use loyalty_core::RewardKind;

use crate::auth::MemberAuth;
use crate::error::ApiError;
use crate::state::AppState;

/// Reward redemption request.
#[derive(Debug, Deserialize)]
pub struct RedeemRequest {
    /// Which catalog reward to redeem.
    pub reward_type: RewardKind,
    /// Catalog item ID for variable-priced rewards.
    #[serde(default)]
    pub reward_id: Option<String>,
}

/// Reward redemption response.
#[derive(Debug, Serialize)]
pub struct RedeemResponse {
    /// Balance after the redemption.
    pub new_balance: i64,
    /// Lifetime redeemed total after the redemption.
    pub total_redeemed: i64,
    /// Points the reward cost.
    pub points_spent: i64,
    /// Resolved reward description.
    pub description: String,
    /// The appended transaction.
    pub transaction_id: String,
}

/// Redeem a catalog reward.
///
/// Resolves the cost first (pure lookup), then debits the ledger;
/// resolve-then-redeem is one logical transaction from the member's
/// perspective.
pub async fn redeem_reward(
    State(state): State<Arc<AppState>>,
    auth: MemberAuth,
    Json(body): Json<RedeemRequest>,
) -> Result<Json<RedeemResponse>, ApiError> {
    let cost = state
        .config
        .catalog
        .resolve_cost(body.reward_type, body.reward_id.as_deref());

    let outcome = state
        .engine
        .redeem(auth.member_id, cost.points, cost.description.clone(), None)?;

    tracing::info!(
        member_id = %auth.member_id,
        reward_type = ?body.reward_type,
        reward_id = ?body.reward_id,
        points_spent = %cost.points,
        new_balance = %outcome.new_balance,
        "Reward redeemed"
    );

    Ok(Json(RedeemResponse {
        new_balance: outcome.new_balance,
        total_redeemed: outcome.total_redeemed,
        points_spent: cost.points,
        description: cost.description,
        transaction_id: outcome.transaction_id.to_string(),
    }))
}
