//! `RocksDB` storage implementation.
//!
//! This module provides the `RocksStore` implementation of the `Store` trait.

use std::path::Path;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use rocksdb::{
    BoundColumnFamily, ColumnFamilyDescriptor, DBWithThreadMode, IteratorMode, MultiThreaded,
    Options, WriteBatch,
};

use loyalty_core::{Account, MemberId, PointTransaction, TransactionId, TransactionType};

use crate::error::{Result, StoreError};
use crate::keys;
use crate::schema::{all_column_families, cf};
use crate::Store;

/// RocksDB-backed storage implementation.
pub struct RocksStore {
    db: Arc<DBWithThreadMode<MultiThreaded>>,
}

impl RocksStore {
    /// Open or create a `RocksDB` database at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or created.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.create_missing_column_families(true);

        let cf_descriptors: Vec<_> = all_column_families()
            .into_iter()
            .map(|name| ColumnFamilyDescriptor::new(name, Options::default()))
            .collect();

        let db = DBWithThreadMode::open_cf_descriptors(&opts, path, cf_descriptors)
            .map_err(|e| StoreError::Database(e.to_string()))?;

        Ok(Self { db: Arc::new(db) })
    }

    /// Get a column family handle.
    fn cf(&self, name: &str) -> Result<Arc<BoundColumnFamily<'_>>> {
        self.db
            .cf_handle(name)
            .ok_or_else(|| StoreError::Database(format!("column family not found: {name}")))
    }

    /// Serialize a value using CBOR.
    fn serialize<T: serde::Serialize>(value: &T) -> Result<Vec<u8>> {
        let mut buf = Vec::new();
        ciborium::into_writer(value, &mut buf)
            .map_err(|e| StoreError::Serialization(e.to_string()))?;
        Ok(buf)
    }

    /// Deserialize a value from CBOR.
    fn deserialize<T: serde::de::DeserializeOwned>(data: &[u8]) -> Result<T> {
        ciborium::from_reader(data).map_err(|e| StoreError::Serialization(e.to_string()))
    }

    /// Stage a ledger entry into a batch: account row, transaction record,
    /// member index, and the expiry index entry for earns that lapse.
    fn stage_entry(
        &self,
        batch: &mut WriteBatch,
        account: &Account,
        transaction: &PointTransaction,
    ) -> Result<()> {
        let cf_accounts = self.cf(cf::ACCOUNTS)?;
        let cf_tx = self.cf(cf::TRANSACTIONS)?;
        let cf_by_member = self.cf(cf::TRANSACTIONS_BY_MEMBER)?;

        let account_key = keys::account_key(&account.member_id);
        let tx_key = keys::transaction_key(&transaction.id);
        let member_tx_key = keys::member_transaction_key(&transaction.member_id, &transaction.id);

        batch.put_cf(&cf_accounts, &account_key, Self::serialize(account)?);
        batch.put_cf(&cf_tx, &tx_key, Self::serialize(transaction)?);
        batch.put_cf(&cf_by_member, &member_tx_key, []); // Index entry (empty value)

        if transaction.transaction_type == TransactionType::Earned {
            if let Some(expires_at) = transaction.expires_at {
                let cf_expiry = self.cf(cf::EXPIRY_INDEX)?;
                let expiry_key = keys::expiry_index_key(expires_at, &transaction.id);
                batch.put_cf(&cf_expiry, &expiry_key, transaction.member_id.as_bytes());
            }
        }

        Ok(())
    }
}

impl Store for RocksStore {
    // =========================================================================
    // Account Operations
    // =========================================================================

    fn put_account(&self, account: &Account) -> Result<()> {
        let cf = self.cf(cf::ACCOUNTS)?;
        let key = keys::account_key(&account.member_id);
        let value = Self::serialize(account)?;

        self.db
            .put_cf(&cf, key, value)
            .map_err(|e| StoreError::Database(e.to_string()))?;

        Ok(())
    }

    fn get_account(&self, member_id: &MemberId) -> Result<Option<Account>> {
        let cf = self.cf(cf::ACCOUNTS)?;
        let key = keys::account_key(member_id);

        self.db
            .get_cf(&cf, key)
            .map_err(|e| StoreError::Database(e.to_string()))?
            .map(|data| Self::deserialize(&data))
            .transpose()
    }

    // =========================================================================
    // Transaction Operations
    // =========================================================================

    fn get_transaction(&self, transaction_id: &TransactionId) -> Result<Option<PointTransaction>> {
        let cf = self.cf(cf::TRANSACTIONS)?;
        let key = keys::transaction_key(transaction_id);

        self.db
            .get_cf(&cf, key)
            .map_err(|e| StoreError::Database(e.to_string()))?
            .map(|data| Self::deserialize(&data))
            .transpose()
    }

    fn list_transactions_by_member(
        &self,
        member_id: &MemberId,
        limit: usize,
        offset: usize,
    ) -> Result<Vec<PointTransaction>> {
        let cf_by_member = self.cf(cf::TRANSACTIONS_BY_MEMBER)?;
        let prefix = keys::member_transactions_prefix(member_id);

        let iter = self.db.iterator_cf(
            &cf_by_member,
            IteratorMode::From(&prefix, rocksdb::Direction::Forward),
        );

        // Collect matching keys first; ULIDs are time-ordered, so a reverse
        // of the range gives newest first.
        let mut all_keys: Vec<Vec<u8>> = Vec::new();
        for item in iter {
            let (key, _) = item.map_err(|e| StoreError::Database(e.to_string()))?;

            if !key.starts_with(&prefix) {
                break;
            }

            all_keys.push(key.to_vec());
        }

        all_keys.reverse();

        let mut transactions = Vec::new();
        for key in all_keys.into_iter().skip(offset) {
            if transactions.len() >= limit {
                break;
            }

            let tx_id = keys::extract_transaction_id_from_member_key(&key);
            if let Some(tx) = self.get_transaction(&tx_id)? {
                transactions.push(tx);
            }
        }

        Ok(transactions)
    }

    // =========================================================================
    // Expiration Operations
    // =========================================================================

    fn list_expiring(&self, cutoff: DateTime<Utc>) -> Result<Vec<(MemberId, TransactionId)>> {
        let cf_expiry = self.cf(cf::EXPIRY_INDEX)?;
        let cutoff_millis = cutoff.timestamp_millis();

        let mut eligible = Vec::new();
        for item in self.db.iterator_cf(&cf_expiry, IteratorMode::Start) {
            let (key, value) = item.map_err(|e| StoreError::Database(e.to_string()))?;

            // Keys are ordered by expiry; stop at the first one past the cutoff.
            if keys::extract_expiry_millis(&key) > cutoff_millis {
                break;
            }

            let tx_id = keys::extract_transaction_id_from_expiry_key(&key);
            let member_bytes: [u8; 16] = value
                .as_ref()
                .try_into()
                .map_err(|_| StoreError::Serialization("bad member id in expiry index".into()))?;
            eligible.push((MemberId::from_bytes(member_bytes), tx_id));
        }

        Ok(eligible)
    }

    fn has_expiration(&self, earned_id: &TransactionId) -> Result<bool> {
        let cf = self.cf(cf::EXPIRATIONS)?;
        let key = keys::expiration_guard_key(earned_id);

        let exists = self
            .db
            .get_cf(&cf, key)
            .map_err(|e| StoreError::Database(e.to_string()))?
            .is_some();

        Ok(exists)
    }

    // =========================================================================
    // Compound Operations
    // =========================================================================

    fn commit_entry(&self, account: &Account, transaction: &PointTransaction) -> Result<()> {
        let mut batch = WriteBatch::default();
        self.stage_entry(&mut batch, account, transaction)?;

        self.db
            .write(batch)
            .map_err(|e| StoreError::Database(e.to_string()))?;

        Ok(())
    }

    fn commit_expiration(
        &self,
        account: &Account,
        transaction: &PointTransaction,
        earned: &PointTransaction,
    ) -> Result<()> {
        if self.has_expiration(&earned.id)? {
            return Err(StoreError::AlreadyExpired {
                earned_id: earned.id.to_string(),
            });
        }

        let mut batch = WriteBatch::default();
        self.stage_entry(&mut batch, account, transaction)?;

        // Guard key: presence means this earned entry is spent for good.
        let cf_guard = self.cf(cf::EXPIRATIONS)?;
        let guard_key = keys::expiration_guard_key(&earned.id);
        batch.put_cf(&cf_guard, &guard_key, transaction.id.to_bytes());

        // The earned entry is no longer eligible; drop it from the index.
        if let Some(expires_at) = earned.expires_at {
            let cf_expiry = self.cf(cf::EXPIRY_INDEX)?;
            batch.delete_cf(&cf_expiry, keys::expiry_index_key(expires_at, &earned.id));
        }

        self.db
            .write(batch)
            .map_err(|e| StoreError::Database(e.to_string()))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use loyalty_core::PointSource;
    use tempfile::TempDir;

    fn create_test_store() -> (RocksStore, TempDir) {
        let dir = TempDir::new().unwrap();
        let store = RocksStore::open(dir.path()).unwrap();
        (store, dir)
    }

    fn earn(member_id: MemberId, points: i64, balance_after: i64) -> PointTransaction {
        PointTransaction::earned(
            member_id,
            points,
            balance_after,
            PointSource::CheckIn,
            "Check-in".into(),
            None,
        )
    }

    #[test]
    fn account_roundtrip() {
        let (store, _dir) = create_test_store();
        let member_id = MemberId::generate();
        let mut account = Account::new(member_id);
        account.balance = 500;

        store.put_account(&account).unwrap();

        let retrieved = store.get_account(&member_id).unwrap().unwrap();
        assert_eq!(retrieved.balance, 500);

        assert!(store.get_account(&MemberId::generate()).unwrap().is_none());
    }

    #[test]
    fn commit_entry_writes_account_and_transaction() {
        let (store, _dir) = create_test_store();
        let member_id = MemberId::generate();
        let mut account = Account::new(member_id);
        account.balance = 100;
        account.total_earned = 100;

        let tx = earn(member_id, 100, 100);
        store.commit_entry(&account, &tx).unwrap();

        let stored_account = store.get_account(&member_id).unwrap().unwrap();
        assert_eq!(stored_account.balance, 100);

        let stored_tx = store.get_transaction(&tx.id).unwrap().unwrap();
        assert_eq!(stored_tx.amount, 100);
        assert_eq!(stored_tx.balance_after, 100);
    }

    #[test]
    fn list_transactions_newest_first_with_pagination() {
        let (store, _dir) = create_test_store();
        let member_id = MemberId::generate();
        let mut account = Account::new(member_id);

        account.balance = 100;
        let tx1 = PointTransaction::earned(
            member_id,
            100,
            100,
            PointSource::CheckIn,
            "First".into(),
            None,
        );
        store.commit_entry(&account, &tx1).unwrap();

        account.balance = 300;
        let tx2 = PointTransaction::earned(
            member_id,
            200,
            300,
            PointSource::Referral,
            "Second".into(),
            None,
        );
        store.commit_entry(&account, &tx2).unwrap();

        let transactions = store
            .list_transactions_by_member(&member_id, 10, 0)
            .unwrap();
        assert_eq!(transactions.len(), 2);
        assert_eq!(transactions[0].description, "Second"); // Newest first
        assert_eq!(transactions[1].description, "First");

        let page1 = store.list_transactions_by_member(&member_id, 1, 0).unwrap();
        let page2 = store.list_transactions_by_member(&member_id, 1, 1).unwrap();
        assert_eq!(page1[0].description, "Second");
        assert_eq!(page2[0].description, "First");
    }

    #[test]
    fn transactions_are_isolated_per_member() {
        let (store, _dir) = create_test_store();
        let alice = MemberId::generate();
        let bob = MemberId::generate();

        let mut account = Account::new(alice);
        account.balance = 50;
        store.commit_entry(&account, &earn(alice, 50, 50)).unwrap();

        let bob_txs = store.list_transactions_by_member(&bob, 10, 0).unwrap();
        assert!(bob_txs.is_empty());
    }

    #[test]
    fn expiry_index_lists_only_past_cutoff() {
        let (store, _dir) = create_test_store();
        let member_id = MemberId::generate();
        let now = Utc::now();

        let mut account = Account::new(member_id);
        account.balance = 100;
        let soon = PointTransaction::earned(
            member_id,
            100,
            100,
            PointSource::CheckIn,
            "Expires soon".into(),
            Some(now + Duration::days(1)),
        );
        store.commit_entry(&account, &soon).unwrap();

        account.balance = 300;
        let later = PointTransaction::earned(
            member_id,
            200,
            300,
            PointSource::Purchase,
            "Expires later".into(),
            Some(now + Duration::days(400)),
        );
        store.commit_entry(&account, &later).unwrap();

        let eligible = store.list_expiring(now + Duration::days(2)).unwrap();
        assert_eq!(eligible.len(), 1);
        assert_eq!(eligible[0].0, member_id);
        assert_eq!(eligible[0].1, soon.id);

        let all = store.list_expiring(now + Duration::days(500)).unwrap();
        assert_eq!(all.len(), 2);
    }

    #[test]
    fn earn_without_expiry_is_not_indexed() {
        let (store, _dir) = create_test_store();
        let member_id = MemberId::generate();

        let mut account = Account::new(member_id);
        account.balance = 100;
        store
            .commit_entry(&account, &earn(member_id, 100, 100))
            .unwrap();

        let eligible = store.list_expiring(Utc::now() + Duration::days(1000)).unwrap();
        assert!(eligible.is_empty());
    }

    #[test]
    fn commit_expiration_is_guarded() {
        let (store, _dir) = create_test_store();
        let member_id = MemberId::generate();
        let now = Utc::now();

        let mut account = Account::new(member_id);
        account.balance = 500;
        let earned = PointTransaction::earned(
            member_id,
            500,
            500,
            PointSource::Challenge,
            "Challenge".into(),
            Some(now - Duration::days(1)),
        );
        store.commit_entry(&account, &earned).unwrap();

        account.balance = 0;
        let expired = PointTransaction::expired(member_id, 500, 0, earned.id);
        store
            .commit_expiration(&account, &expired, &earned)
            .unwrap();

        assert!(store.has_expiration(&earned.id).unwrap());

        // The earned entry left the expiry index with the same batch.
        assert!(store.list_expiring(now).unwrap().is_empty());

        // A second expiration of the same earned entry is rejected.
        let duplicate = PointTransaction::expired(member_id, 500, -500, earned.id);
        let result = store.commit_expiration(&account, &duplicate, &earned);
        assert!(matches!(result, Err(StoreError::AlreadyExpired { .. })));
    }
}
