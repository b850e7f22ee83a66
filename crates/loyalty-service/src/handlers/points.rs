//! Point balance, history, and earn handlers.

use std::sync::Arc;

use axum::extract::{Query, State};
use axum::Json;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use loyalty_core::{MemberId, PointSource, PointTransaction};

use crate::auth::{MemberAuth, ServiceAuth};
use crate::error::ApiError;
use crate::state::AppState;

/// Balance response.
#[derive(Debug, Serialize)]
pub struct BalanceResponse {
    /// Current spendable points.
    pub balance: i64,
    /// Lifetime points earned.
    pub total_earned: i64,
    /// Lifetime points redeemed.
    pub total_redeemed: i64,
}

/// Get the current point balance.
///
/// A member with no ledger history reads as all zeros; that is not an
/// error.
pub async fn get_balance(
    State(state): State<Arc<AppState>>,
    auth: MemberAuth,
) -> Result<Json<BalanceResponse>, ApiError> {
    let summary = state.engine.balance(auth.member_id)?;

    Ok(Json(BalanceResponse {
        balance: summary.balance,
        total_earned: summary.total_earned,
        total_redeemed: summary.total_redeemed,
    }))
}

/// Transaction list query parameters.
#[derive(Debug, Deserialize)]
pub struct ListTransactionsQuery {
    /// Maximum number of transactions to return (default: 50, max: 100).
    #[serde(default = "default_limit")]
    pub limit: usize,
    /// Offset for pagination (default: 0).
    #[serde(default)]
    pub offset: usize,
}

fn default_limit() -> usize {
    50
}

/// Transaction response.
#[derive(Debug, Serialize)]
pub struct TransactionResponse {
    /// Transaction ID.
    pub id: String,
    /// Signed point amount (positive = credit, negative = debit).
    pub amount: i64,
    /// Transaction type.
    pub transaction_type: String,
    /// Balance after this transaction.
    pub balance_after: i64,
    /// Provenance tag.
    pub source: String,
    /// Description.
    pub description: String,
    /// Back-reference (for expirations, the earned entry).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub related_id: Option<String>,
    /// When the points lapse, if they do.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<String>,
    /// Timestamp.
    pub created_at: String,
}

impl From<&PointTransaction> for TransactionResponse {
    fn from(tx: &PointTransaction) -> Self {
        Self {
            id: tx.id.to_string(),
            amount: tx.amount,
            transaction_type: format!("{:?}", tx.transaction_type).to_lowercase(),
            balance_after: tx.balance_after,
            source: format!("{:?}", tx.source).to_lowercase(),
            description: tx.description.clone(),
            related_id: tx.related_id.map(|id| id.to_string()),
            expires_at: tx.expires_at.map(|at| at.to_rfc3339()),
            created_at: tx.created_at.to_rfc3339(),
        }
    }
}

/// List transactions response.
#[derive(Debug, Serialize)]
pub struct ListTransactionsResponse {
    /// Transactions (newest first).
    pub transactions: Vec<TransactionResponse>,
    /// Whether there are more transactions.
    pub has_more: bool,
}

/// List the member's transaction history, newest first.
pub async fn list_transactions(
    State(state): State<Arc<AppState>>,
    auth: MemberAuth,
    Query(query): Query<ListTransactionsQuery>,
) -> Result<Json<ListTransactionsResponse>, ApiError> {
    // Fetch one more than requested to determine has_more.
    let limit = query.limit.min(100);
    let transactions = state
        .engine
        .history(auth.member_id, limit + 1, query.offset)?;

    let has_more = transactions.len() > limit;
    let transactions: Vec<_> = transactions
        .iter()
        .take(limit)
        .map(TransactionResponse::from)
        .collect();

    Ok(Json(ListTransactionsResponse {
        transactions,
        has_more,
    }))
}

/// Earn request from an activity service.
#[derive(Debug, Deserialize)]
pub struct EarnRequest {
    /// Member to credit.
    pub member_id: String,
    /// Points to credit (must be positive).
    pub points: i64,
    /// Provenance tag.
    pub source: PointSource,
    /// Human-readable note for the ledger entry.
    pub description: String,
    /// Request expiring points with this lifetime in days. `0` means use
    /// the configured default (`POINTS_TTL_DAYS`).
    #[serde(default)]
    pub ttl_days: Option<i64>,
    /// Absolute expiry; takes precedence over `ttl_days` when both are
    /// present.
    #[serde(default)]
    pub expires_at: Option<DateTime<Utc>>,
}

/// Earn response.
#[derive(Debug, Serialize)]
pub struct EarnResponse {
    /// Balance after the earn.
    pub new_balance: i64,
    /// Lifetime earned total after the earn.
    pub total_earned: i64,
    /// The appended transaction.
    pub transaction_id: String,
}

/// Credit points to a member (service-to-service).
pub async fn earn_points(
    State(state): State<Arc<AppState>>,
    auth: ServiceAuth,
    Json(body): Json<EarnRequest>,
) -> Result<Json<EarnResponse>, ApiError> {
    let member_id = body
        .member_id
        .parse::<MemberId>()
        .map_err(|_| ApiError::BadRequest("Invalid member ID".into()))?;

    let expires_at = match (body.expires_at, body.ttl_days) {
        (Some(at), _) => Some(at),
        (None, Some(days)) => {
            let days = if days == 0 {
                state.config.points_ttl_days
            } else {
                days
            };
            if days < 0 {
                return Err(ApiError::BadRequest("ttl_days must not be negative".into()));
            }
            Some(Utc::now() + Duration::days(days))
        }
        (None, None) => None,
    };

    let outcome = state.engine.earn(
        member_id,
        body.points,
        body.source,
        body.description,
        expires_at,
    )?;

    tracing::info!(
        service = %auth.service_name,
        member_id = %member_id,
        points = %body.points,
        source = ?body.source,
        new_balance = %outcome.new_balance,
        "Points credited"
    );

    Ok(Json(EarnResponse {
        new_balance: outcome.new_balance,
        total_earned: outcome.total_earned,
        transaction_id: outcome.transaction_id.to_string(),
    }))
}
