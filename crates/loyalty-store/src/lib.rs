//! `RocksDB` storage layer for the loyalty ledger.
//!
//! This crate provides persistent storage for accounts and the append-only
//! transaction log using `RocksDB` with column families for indexing.
//!
//! # Architecture
//!
//! The storage uses the following column families:
//!
//! - `accounts`: Primary account records, keyed by `member_id`
//! - `transactions`: Point transactions, keyed by `transaction_id` (ULID)
//! - `transactions_by_member`: Index for listing transactions by member
//! - `expiry_index`: Earned entries with an expiry, in chronological order
//! - `expirations`: Guard keys preventing double-expiration
//!
//! All balance-affecting writes go through the compound operations
//! (`commit_entry`, `commit_expiration`), which put the account row, the
//! transaction, and every index entry into a single `WriteBatch` so an
//! operation is all-or-nothing.
//!
//! # Example
//!
//! ```no_run
//! use loyalty_store::{RocksStore, Store};
//! use loyalty_core::{Account, MemberId};
//!
//! let store = RocksStore::open("/tmp/loyalty-db").unwrap();
//!
//! let member_id = MemberId::generate();
//! let account = Account::new(member_id);
//! store.put_account(&account).unwrap();
//!
//! let retrieved = store.get_account(&member_id).unwrap();
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod error;
pub mod keys;
pub mod rocks;
pub mod schema;

pub use error::{Result, StoreError};
pub use rocks::RocksStore;

use chrono::{DateTime, Utc};
use loyalty_core::{Account, MemberId, PointTransaction, TransactionId};

/// The storage trait defining all database operations.
///
/// This trait abstracts the storage layer so the ledger engine can run
/// against different implementations. All methods are synchronous; the
/// backing store is expected to be local and blocking (`RocksDB`).
pub trait Store: Send + Sync {
    // =========================================================================
    // Account Operations
    // =========================================================================

    /// Insert or update an account record.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn put_account(&self, account: &Account) -> Result<()>;

    /// Get an account by member ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn get_account(&self, member_id: &MemberId) -> Result<Option<Account>>;

    // =========================================================================
    // Transaction Operations
    // =========================================================================

    /// Get a transaction by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn get_transaction(&self, transaction_id: &TransactionId) -> Result<Option<PointTransaction>>;

    /// List transactions for a member, ordered by time (newest first).
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn list_transactions_by_member(
        &self,
        member_id: &MemberId,
        limit: usize,
        offset: usize,
    ) -> Result<Vec<PointTransaction>>;

    // =========================================================================
    // Expiration Operations
    // =========================================================================

    /// List earned entries whose expiry is at or before `cutoff`, in
    /// chronological expiry order. Returns the owning member and the
    /// earned transaction ID for each.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn list_expiring(&self, cutoff: DateTime<Utc>) -> Result<Vec<(MemberId, TransactionId)>>;

    /// Check whether an expiration has already been recorded for the
    /// earned transaction.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn has_expiration(&self, earned_id: &TransactionId) -> Result<bool>;

    // =========================================================================
    // Compound Operations
    // =========================================================================

    /// Commit a ledger entry: write the account row, the transaction, and
    /// the member index (plus the expiry index when the entry is an earn
    /// with `expires_at` set) in one atomic batch.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn commit_entry(&self, account: &Account, transaction: &PointTransaction) -> Result<()>;

    /// Commit an expiration entry. Same as [`Store::commit_entry`] but also
    /// writes the guard key for the earned transaction in the same batch,
    /// failing if the guard already exists, and removes the earned entry
    /// from the expiry index.
    ///
    /// # Errors
    ///
    /// - `StoreError::AlreadyExpired` if the earned entry was already
    ///   expired.
    /// - Any database error.
    fn commit_expiration(
        &self,
        account: &Account,
        transaction: &PointTransaction,
        earned: &PointTransaction,
    ) -> Result<()>;
}
