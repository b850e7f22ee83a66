//! Request and response types for the loyalty client.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use loyalty_core::{PointSource, RewardKind};

/// Earn event reported by an activity service.
#[derive(Debug, Clone, Serialize)]
pub struct EarnEvent {
    /// Member being credited.
    pub member_id: String,
    /// Points to credit (must be positive).
    pub points: i64,
    /// Where the points came from.
    pub source: PointSource,
    /// Human-readable note for the ledger entry.
    pub description: String,
    /// Requested point lifetime in days; `0` asks the service to apply
    /// its configured default.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ttl_days: Option<i64>,
    /// Absolute expiry; takes precedence over `ttl_days`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
}

/// Earn response from the API.
#[derive(Debug, Clone, Deserialize)]
pub struct EarnResponse {
    /// Balance after the earn.
    pub new_balance: i64,
    /// Lifetime earned total after the earn.
    pub total_earned: i64,
    /// Transaction ID of the appended ledger entry.
    pub transaction_id: String,
}

/// Balance response.
#[derive(Debug, Clone, Deserialize)]
pub struct BalanceResponse {
    /// Current spendable points.
    pub balance: i64,
    /// Lifetime points earned.
    pub total_earned: i64,
    /// Lifetime points redeemed.
    pub total_redeemed: i64,
}

/// One ledger entry in a history response.
#[derive(Debug, Clone, Deserialize)]
pub struct TransactionRecord {
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
    pub related_id: Option<String>,
    /// When the points lapse, if they do.
    pub expires_at: Option<String>,
    /// Timestamp.
    pub created_at: String,
}

/// Transaction history response.
#[derive(Debug, Clone, Deserialize)]
pub struct HistoryResponse {
    /// Transactions, newest first.
    pub transactions: Vec<TransactionRecord>,
    /// Whether more transactions exist past this page.
    pub has_more: bool,
}

/// Reward redemption request.
#[derive(Debug, Clone, Serialize)]
pub struct RedeemRequest {
    /// Which catalog reward to redeem.
    pub reward_type: RewardKind,
    /// Catalog item ID for variable-priced rewards.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reward_id: Option<String>,
}

/// Reward redemption response.
#[derive(Debug, Clone, Deserialize)]
pub struct RedeemResponse {
    /// Balance after the redemption.
    pub new_balance: i64,
    /// Lifetime redeemed total after the redemption.
    pub total_redeemed: i64,
    /// Points the reward cost.
    pub points_spent: i64,
    /// Resolved reward description.
    pub description: String,
    /// Transaction ID of the appended ledger entry.
    pub transaction_id: String,
}

/// Expiration sweep response.
#[derive(Debug, Clone, Deserialize)]
pub struct SweepResponse {
    /// Total points removed by the sweep.
    pub expired_points: i64,
    /// Number of earned entries newly expired.
    pub transactions_processed: u64,
}

/// API error response envelope.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorResponse {
    /// Error details.
    pub error: ApiErrorBody,
}

/// API error body.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorBody {
    /// Error code.
    pub code: String,
    /// Error message.
    pub message: String,
    /// Additional details.
    pub details: Option<serde_json::Value>,
}
