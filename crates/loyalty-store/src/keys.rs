//! Key encoding utilities for `RocksDB`.
//!
//! This module provides functions for encoding and decoding keys used in
//! column families.

use chrono::{DateTime, Utc};

use loyalty_core::{MemberId, TransactionId};

/// Create an account key from a member ID.
#[must_use]
pub fn account_key(member_id: &MemberId) -> Vec<u8> {
    member_id.as_bytes().to_vec()
}

/// Create a transaction key from a transaction ID.
#[must_use]
pub fn transaction_key(transaction_id: &TransactionId) -> Vec<u8> {
    transaction_id.to_bytes().to_vec()
}

/// Create a member-transaction index key.
///
/// Format: `member_id (16 bytes) || transaction_id (16 bytes)`
///
/// Since ULIDs are time-ordered, transactions for a member sort by time.
#[must_use]
pub fn member_transaction_key(member_id: &MemberId, transaction_id: &TransactionId) -> Vec<u8> {
    let mut key = Vec::with_capacity(32);
    key.extend_from_slice(member_id.as_bytes());
    key.extend_from_slice(&transaction_id.to_bytes());
    key
}

/// Create a prefix for iterating all transactions for a member.
#[must_use]
pub fn member_transactions_prefix(member_id: &MemberId) -> Vec<u8> {
    member_id.as_bytes().to_vec()
}

/// Extract the transaction ID from a member-transaction index key.
///
/// # Panics
///
/// Panics if the key is not at least 32 bytes.
#[must_use]
pub fn extract_transaction_id_from_member_key(key: &[u8]) -> TransactionId {
    let mut bytes = [0u8; 16];
    bytes.copy_from_slice(&key[16..32]);
    TransactionId::from_bytes(bytes)
}

/// Create an expiry-index key.
///
/// Format: `expires_at millis (8 bytes, big-endian) || transaction_id (16 bytes)`
///
/// The big-endian timestamp prefix makes a forward iteration walk entries
/// in chronological expiry order, so the scanner can stop at the first
/// key past its cutoff.
#[must_use]
pub fn expiry_index_key(expires_at: DateTime<Utc>, transaction_id: &TransactionId) -> Vec<u8> {
    let mut key = Vec::with_capacity(24);
    key.extend_from_slice(&expires_at.timestamp_millis().to_be_bytes());
    key.extend_from_slice(&transaction_id.to_bytes());
    key
}

/// Extract the expiry timestamp (millis) from an expiry-index key.
///
/// # Panics
///
/// Panics if the key is not at least 8 bytes.
#[must_use]
pub fn extract_expiry_millis(key: &[u8]) -> i64 {
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&key[..8]);
    i64::from_be_bytes(bytes)
}

/// Extract the transaction ID from an expiry-index key.
///
/// # Panics
///
/// Panics if the key is not at least 24 bytes.
#[must_use]
pub fn extract_transaction_id_from_expiry_key(key: &[u8]) -> TransactionId {
    let mut bytes = [0u8; 16];
    bytes.copy_from_slice(&key[8..24]);
    TransactionId::from_bytes(bytes)
}

/// Create an expiration guard key from the earned transaction ID.
#[must_use]
pub fn expiration_guard_key(earned_id: &TransactionId) -> Vec<u8> {
    earned_id.to_bytes().to_vec()
}
