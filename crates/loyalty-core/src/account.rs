//! Account types for the loyalty ledger.
//!
//! An account is the materialized balance for one member. It caches what
//! replaying the transaction log for that member would produce; the log
//! stays authoritative.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::MemberId;

/// A loyalty account for a member.
///
/// One row per member, created lazily on the first balance-affecting
/// operation and never deleted. `balance` must never go negative.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    /// The member ID (from the identity system).
    pub member_id: MemberId,

    /// Current spendable points.
    pub balance: i64,

    /// Lifetime points earned (monotonically non-decreasing).
    pub total_earned: i64,

    /// Lifetime points redeemed (monotonically non-decreasing).
    pub total_redeemed: i64,

    /// When the account was created.
    pub created_at: DateTime<Utc>,

    /// When the account was last mutated.
    pub updated_at: DateTime<Utc>,
}

impl Account {
    /// Create a new account with zero balance.
    #[must_use]
    pub fn new(member_id: MemberId) -> Self {
        let now = Utc::now();
        Self {
            member_id,
            balance: 0,
            total_earned: 0,
            total_redeemed: 0,
            created_at: now,
            updated_at: now,
        }
    }

    /// Check whether the account can cover a deduction of `points`.
    #[must_use]
    pub const fn has_sufficient_points(&self, points: i64) -> bool {
        self.balance >= points
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_account_has_zero_balance() {
        let member_id = MemberId::generate();
        let account = Account::new(member_id);
        assert_eq!(account.balance, 0);
        assert_eq!(account.total_earned, 0);
        assert_eq!(account.total_redeemed, 0);
    }

    #[test]
    fn account_sufficient_points() {
        let member_id = MemberId::generate();
        let mut account = Account::new(member_id);
        account.balance = 1000;

        assert!(account.has_sufficient_points(500));
        assert!(account.has_sufficient_points(1000));
        assert!(!account.has_sufficient_points(1001));
    }
}
