//! Database schema definitions and column families.
//!
//! This module defines the column families used in `RocksDB` storage.

/// Column family names for the `RocksDB` database.
pub mod cf {
    /// Primary account records, keyed by `member_id`.
    pub const ACCOUNTS: &str = "accounts";

    /// Point transactions, keyed by `transaction_id` (ULID).
    pub const TRANSACTIONS: &str = "transactions";

    /// Index: transactions by member, keyed by `member_id || transaction_id`.
    /// Value is empty (index only).
    pub const TRANSACTIONS_BY_MEMBER: &str = "transactions_by_member";

    /// Index: earned transactions with an expiry, keyed by
    /// `expires_at_millis_be || transaction_id`. Value is the member ID
    /// bytes so the scanner can find the owning account without a second
    /// lookup.
    pub const EXPIRY_INDEX: &str = "expiry_index";

    /// Expiration guard, keyed by the earned `transaction_id`. Written in
    /// the same batch as the `expired` entry; its presence means the
    /// earned entry has already been expired.
    pub const EXPIRATIONS: &str = "expirations";
}

/// Returns all column family names for database initialization.
#[must_use]
pub fn all_column_families() -> Vec<&'static str> {
    vec![
        cf::ACCOUNTS,
        cf::TRANSACTIONS,
        cf::TRANSACTIONS_BY_MEMBER,
        cf::EXPIRY_INDEX,
        cf::EXPIRATIONS,
    ]
}
