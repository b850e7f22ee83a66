//! Error types for the ledger engine.

use loyalty_store::StoreError;

/// Result type for ledger operations.
pub type Result<T> = std::result::Result<T, LedgerError>;

/// Errors that can occur in ledger operations.
#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    /// A non-positive amount was supplied to earn/redeem, a zero delta to
    /// adjust, or an amount the balance counters cannot absorb without
    /// overflowing.
    #[error("invalid amount: {0}")]
    InvalidAmount(i64),

    /// A redemption asked for more points than the member has.
    #[error("insufficient points: need {required}, have {balance}")]
    InsufficientPoints {
        /// Current balance.
        balance: i64,
        /// Points the redemption requires.
        required: i64,
    },

    /// An adjustment would drive the balance below zero.
    #[error("adjustment rejected: balance {balance} with delta {delta} would go negative")]
    NegativeBalanceRejected {
        /// Current balance.
        balance: i64,
        /// The rejected delta.
        delta: i64,
    },

    /// Underlying storage failed; the whole operation is safe to retry.
    #[error("storage failure: {0}")]
    Storage(#[from] StoreError),
}
