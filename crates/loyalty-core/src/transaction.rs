//! Point transaction types for the loyalty ledger.
//!
//! Every balance change appends exactly one transaction. Transactions are
//! immutable once written; `balance_after` is a write-once audit snapshot
//! and is never recomputed.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{MemberId, TransactionId};

/// A ledger entry representing one balance change.
///
/// Transactions use ULIDs for time-ordered IDs, so the per-member index
/// lists them in commit order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PointTransaction {
    /// Unique transaction ID (ULID for time-ordering).
    pub id: TransactionId,

    /// The member whose balance was affected.
    pub member_id: MemberId,

    /// Type of transaction.
    pub transaction_type: TransactionType,

    /// Signed point amount. Positive for `Earned` and positive `Adjusted`;
    /// negative for `Redeemed`, `Expired`, and negative `Adjusted`.
    pub amount: i64,

    /// Balance immediately after this entry was applied.
    pub balance_after: i64,

    /// Where the points came from (or went).
    pub source: PointSource,

    /// Human-readable note.
    pub description: String,

    /// Optional back-reference. On an `Expired` entry this is the earned
    /// transaction being expired, and doubles as the idempotency key.
    pub related_id: Option<TransactionId>,

    /// When the points lapse, set only on `Earned` entries subject to
    /// expiration.
    pub expires_at: Option<DateTime<Utc>>,

    /// When the transaction was created.
    pub created_at: DateTime<Utc>,
}

impl PointTransaction {
    /// Create a new earn transaction.
    #[must_use]
    pub fn earned(
        member_id: MemberId,
        points: i64,
        balance_after: i64,
        source: PointSource,
        description: String,
        expires_at: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            id: TransactionId::generate(),
            member_id,
            transaction_type: TransactionType::Earned,
            amount: points.abs(),
            balance_after,
            source,
            description,
            related_id: None,
            expires_at,
            created_at: Utc::now(),
        }
    }

    /// Create a new redemption transaction (amount stored negative).
    #[must_use]
    pub fn redeemed(
        member_id: MemberId,
        points: i64,
        balance_after: i64,
        description: String,
        related_id: Option<TransactionId>,
    ) -> Self {
        Self {
            id: TransactionId::generate(),
            member_id,
            transaction_type: TransactionType::Redeemed,
            amount: -points.abs(),
            balance_after,
            source: PointSource::Redemption,
            description,
            related_id,
            expires_at: None,
            created_at: Utc::now(),
        }
    }

    /// Create a new expiration transaction (amount stored negative).
    ///
    /// `earned_id` points at the earned entry being expired; it is the
    /// idempotency key preventing the same entry from expiring twice.
    #[must_use]
    pub fn expired(
        member_id: MemberId,
        points: i64,
        balance_after: i64,
        earned_id: TransactionId,
    ) -> Self {
        Self {
            id: TransactionId::generate(),
            member_id,
            transaction_type: TransactionType::Expired,
            amount: -points.abs(),
            balance_after,
            source: PointSource::Redemption,
            description: format!("{} points expired (earned in {earned_id})", points.abs()),
            related_id: Some(earned_id),
            expires_at: None,
            created_at: Utc::now(),
        }
    }

    /// Create a new admin adjustment transaction (signed delta as given).
    #[must_use]
    pub fn adjusted(
        member_id: MemberId,
        delta: i64,
        balance_after: i64,
        description: String,
    ) -> Self {
        Self {
            id: TransactionId::generate(),
            member_id,
            transaction_type: TransactionType::Adjusted,
            amount: delta,
            balance_after,
            source: PointSource::AdminAdjustment,
            description,
            related_id: None,
            expires_at: None,
            created_at: Utc::now(),
        }
    }
}

/// Type of point transaction (closed set).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionType {
    /// Points earned from an activity.
    Earned,

    /// Points spent on a reward.
    Redeemed,

    /// Earned points that lapsed unredeemed.
    Expired,

    /// Manual admin correction, either direction.
    Adjusted,
}

impl TransactionType {
    /// Check if this transaction type adds points.
    #[must_use]
    pub const fn is_credit(&self) -> bool {
        matches!(self, Self::Earned)
    }

    /// Check if this transaction type removes points.
    #[must_use]
    pub const fn is_debit(&self) -> bool {
        matches!(self, Self::Redeemed | Self::Expired)
    }
}

/// Provenance of a point transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PointSource {
    /// Gym/class check-in.
    CheckIn,

    /// Referred a new member.
    Referral,

    /// Marketplace or front-desk purchase.
    Purchase,

    /// Completed a challenge.
    Challenge,

    /// Unlocked an achievement.
    Achievement,

    /// Reward redemption or expiration.
    Redemption,

    /// Manual admin adjustment.
    AdminAdjustment,
}
