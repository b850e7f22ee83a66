//! Identifier types for the loyalty ledger.
//!
//! This module provides strongly-typed identifiers for members and transactions.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::{Mutex, OnceLock, PoisonError};
use ulid::{Generator, Ulid};

/// A member identifier (UUID format, issued by the identity system).
///
/// The ledger references member IDs but never owns them; they are
/// extracted from the authenticated request upstream.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct MemberId(uuid::Uuid);

impl MemberId {
    /// Create a new `MemberId` from a UUID.
    #[must_use]
    pub const fn from_uuid(uuid: uuid::Uuid) -> Self {
        Self(uuid)
    }

    /// Generate a new random `MemberId` (for testing).
    #[must_use]
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4())
    }

    /// Return the underlying UUID.
    #[must_use]
    pub const fn as_uuid(&self) -> &uuid::Uuid {
        &self.0
    }

    /// Return the bytes of the UUID.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8; 16] {
        self.0.as_bytes()
    }

    /// Create a `MemberId` from raw UUID bytes.
    #[must_use]
    pub const fn from_bytes(bytes: [u8; 16]) -> Self {
        Self(uuid::Uuid::from_bytes(bytes))
    }
}

impl FromStr for MemberId {
    type Err = IdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let uuid = uuid::Uuid::parse_str(s).map_err(|_| IdError::InvalidUuid)?;
        Ok(Self(uuid))
    }
}

impl fmt::Debug for MemberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MemberId({})", self.0)
    }
}

impl fmt::Display for MemberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for MemberId {
    type Error = IdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<MemberId> for String {
    fn from(id: MemberId) -> Self {
        id.0.to_string()
    }
}

impl AsRef<[u8]> for MemberId {
    fn as_ref(&self) -> &[u8] {
        self.0.as_bytes()
    }
}

/// Process-wide monotonic ULID source.
///
/// A plain random ULID is not ordered within a millisecond, but the
/// per-member transaction index sorts by ID and must reproduce commit
/// order exactly. The shared generator increments the random component
/// for IDs minted in the same millisecond, so generation order and sort
/// order always agree.
fn ulid_generator() -> &'static Mutex<Generator> {
    static GENERATOR: OnceLock<Mutex<Generator>> = OnceLock::new();
    GENERATOR.get_or_init(|| Mutex::new(Generator::new()))
}

/// A transaction identifier using ULID for time-ordering.
///
/// Transaction IDs are time-ordered so the log's insertion order is
/// recoverable from the ID alone; the per-member transaction index and
/// the expiration scanner rely on this.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TransactionId(Ulid);

impl TransactionId {
    /// Create a new `TransactionId` from a ULID.
    #[must_use]
    pub const fn from_ulid(ulid: Ulid) -> Self {
        Self(ulid)
    }

    /// Generate a new `TransactionId` with the current timestamp.
    ///
    /// IDs minted in the same millisecond still sort in generation
    /// order.
    #[must_use]
    pub fn generate() -> Self {
        let mut generator = ulid_generator()
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        match generator.generate() {
            Ok(ulid) => Self(ulid),
            // The random component overflowed within one millisecond
            // (2^80 IDs); a fresh random ULID is the best remaining move.
            Err(_) => Self(Ulid::new()),
        }
    }

    /// Return the underlying ULID.
    #[must_use]
    pub const fn as_ulid(&self) -> &Ulid {
        &self.0
    }

    /// Return the bytes of the ULID (16 bytes).
    #[must_use]
    pub fn to_bytes(&self) -> [u8; 16] {
        self.0.to_bytes()
    }

    /// Create a `TransactionId` from bytes.
    #[must_use]
    pub const fn from_bytes(bytes: [u8; 16]) -> Self {
        Self(Ulid::from_bytes(bytes))
    }
}

impl FromStr for TransactionId {
    type Err = IdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let ulid = Ulid::from_string(s).map_err(|_| IdError::InvalidUlid)?;
        Ok(Self(ulid))
    }
}

impl fmt::Debug for TransactionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TransactionId({})", self.0)
    }
}

impl fmt::Display for TransactionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for TransactionId {
    type Error = IdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<TransactionId> for String {
    fn from(id: TransactionId) -> Self {
        id.0.to_string()
    }
}

/// Errors from parsing identifiers.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IdError {
    /// The string was not a valid UUID.
    #[error("invalid UUID")]
    InvalidUuid,

    /// The string was not a valid ULID.
    #[error("invalid ULID")]
    InvalidUlid,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn member_id_roundtrip() {
        let id = MemberId::generate();
        let parsed: MemberId = id.to_string().parse().unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn member_id_rejects_garbage() {
        let result = "not-a-uuid".parse::<MemberId>();
        assert_eq!(result, Err(IdError::InvalidUuid));
    }

    #[test]
    fn transaction_id_roundtrip() {
        let id = TransactionId::generate();
        let parsed: TransactionId = id.to_string().parse().unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn transaction_ids_are_time_ordered() {
        let first = TransactionId::generate();
        std::thread::sleep(std::time::Duration::from_millis(2));
        let second = TransactionId::generate();
        assert!(first < second);
    }

    #[test]
    fn transaction_ids_sort_in_generation_order_within_a_millisecond() {
        // Back-to-back generation mints many IDs in the same millisecond;
        // every one must still sort after its predecessor.
        let mut prev = TransactionId::generate();
        for _ in 0..2000 {
            let next = TransactionId::generate();
            assert!(prev < next, "{next} generated after {prev} but sorted before it");
            prev = next;
        }
    }

    #[test]
    fn concurrent_generation_yields_unique_ids() {
        let handles: Vec<_> = (0..4)
            .map(|_| {
                std::thread::spawn(|| {
                    (0..500).map(|_| TransactionId::generate()).collect::<Vec<_>>()
                })
            })
            .collect();

        let mut all: Vec<TransactionId> = handles
            .into_iter()
            .flat_map(|h| h.join().unwrap())
            .collect();
        all.sort_unstable();
        all.dedup();
        assert_eq!(all.len(), 2000);
    }

    #[test]
    fn transaction_id_bytes_roundtrip() {
        let id = TransactionId::generate();
        let restored = TransactionId::from_bytes(id.to_bytes());
        assert_eq!(id, restored);
    }
}
