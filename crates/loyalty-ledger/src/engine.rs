//! The ledger engine: the only writer of accounts and the transaction log.
//!
//! Every mutating operation runs as read-validate-commit under a
//! per-member lock, with the commit itself a single atomic storage batch.
//! Operations on different members proceed in parallel; two operations on
//! the same member serialize, so concurrent redemptions cannot both pass
//! the balance check. The lock is never held across a network call.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Utc};

use loyalty_core::{Account, MemberId, PointSource, PointTransaction, TransactionId};
use loyalty_store::{Store, StoreError};

use crate::error::{LedgerError, Result};

/// Capability token for the privileged adjust path.
///
/// The identity layer validates the caller's role before the ledger is
/// invoked; constructing this token asserts that validation already
/// happened. The engine itself performs no authentication.
#[derive(Debug, Clone)]
pub struct AdminCapability {
    /// Who performed the validation (audit trail only).
    pub granted_to: String,
}

impl AdminCapability {
    /// Create a capability for an already-authenticated admin caller.
    #[must_use]
    pub fn new(granted_to: impl Into<String>) -> Self {
        Self {
            granted_to: granted_to.into(),
        }
    }
}

/// Result of an earn operation.
#[derive(Debug, Clone)]
pub struct EarnOutcome {
    /// Balance after the earn.
    pub new_balance: i64,
    /// Lifetime earned total after the earn.
    pub total_earned: i64,
    /// The appended transaction.
    pub transaction_id: TransactionId,
}

/// Result of a redeem operation.
#[derive(Debug, Clone)]
pub struct RedeemOutcome {
    /// Balance after the redemption.
    pub new_balance: i64,
    /// Lifetime redeemed total after the redemption.
    pub total_redeemed: i64,
    /// The appended transaction.
    pub transaction_id: TransactionId,
}

/// Result of an admin adjustment.
#[derive(Debug, Clone)]
pub struct AdjustOutcome {
    /// Balance after the adjustment.
    pub new_balance: i64,
    /// The appended transaction.
    pub transaction_id: TransactionId,
}

/// Point totals for a member.
///
/// All-zero for a member with no account yet; that is a valid read, not
/// an error.
#[derive(Debug, Clone, Default)]
pub struct BalanceSummary {
    /// Current spendable points.
    pub balance: i64,
    /// Lifetime points earned.
    pub total_earned: i64,
    /// Lifetime points redeemed.
    pub total_redeemed: i64,
}

/// Aggregate counters from one expiration sweep.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SweepReport {
    /// Total points removed by this sweep.
    pub expired_points: i64,
    /// Number of earned entries newly expired by this sweep.
    pub transactions_processed: u64,
}

/// The ledger engine.
///
/// Owns the account store and transaction log exclusively: no other
/// component writes to either. Cheap to share behind an `Arc`.
pub struct LedgerEngine<S: Store> {
    store: Arc<S>,
    locks: Mutex<HashMap<MemberId, Arc<Mutex<()>>>>,
}

impl<S: Store> LedgerEngine<S> {
    /// Create a new engine over the given store.
    #[must_use]
    pub fn new(store: Arc<S>) -> Self {
        Self {
            store,
            locks: Mutex::new(HashMap::new()),
        }
    }

    /// Get (or create) the serialization lock for a member.
    fn member_lock(&self, member_id: MemberId) -> Arc<Mutex<()>> {
        let mut locks = self
            .locks
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        Arc::clone(locks.entry(member_id).or_default())
    }

    /// Load the member's account, creating a fresh zero-balance one if
    /// absent. Creation is only persisted when the caller commits, so it
    /// happens inside the same atomic scope as the first mutation.
    fn load_or_create(&self, member_id: MemberId) -> Result<Account> {
        Ok(self
            .store
            .get_account(&member_id)?
            .unwrap_or_else(|| Account::new(member_id)))
    }

    // =========================================================================
    // Write Operations
    // =========================================================================

    /// Credit points to a member.
    ///
    /// Creates the account lazily. `expires_at`, when set, marks the
    /// earned entry for the expiration scanner.
    ///
    /// # Errors
    ///
    /// - `LedgerError::InvalidAmount` if `points <= 0`, or if the credit
    ///   would overflow the balance counters.
    /// - `LedgerError::Storage` if persistence fails.
    pub fn earn(
        &self,
        member_id: MemberId,
        points: i64,
        source: PointSource,
        description: String,
        expires_at: Option<DateTime<Utc>>,
    ) -> Result<EarnOutcome> {
        if points <= 0 {
            return Err(LedgerError::InvalidAmount(points));
        }

        let lock = self.member_lock(member_id);
        let _guard = hold(&lock);

        let mut account = self.load_or_create(member_id)?;
        account.balance = account
            .balance
            .checked_add(points)
            .ok_or(LedgerError::InvalidAmount(points))?;
        account.total_earned = account
            .total_earned
            .checked_add(points)
            .ok_or(LedgerError::InvalidAmount(points))?;
        account.updated_at = Utc::now();

        let tx = PointTransaction::earned(
            member_id,
            points,
            account.balance,
            source,
            description,
            expires_at,
        );
        self.store.commit_entry(&account, &tx)?;

        tracing::debug!(
            member_id = %member_id,
            points = %points,
            source = ?source,
            new_balance = %account.balance,
            "Points earned"
        );

        Ok(EarnOutcome {
            new_balance: account.balance,
            total_earned: account.total_earned,
            transaction_id: tx.id,
        })
    }

    /// Debit points from a member for a reward redemption.
    ///
    /// The reward cost must already be resolved; the engine is
    /// reward-agnostic.
    ///
    /// # Errors
    ///
    /// - `LedgerError::InvalidAmount` if `points <= 0`.
    /// - `LedgerError::InsufficientPoints` if the balance cannot cover it.
    /// - `LedgerError::Storage` if persistence fails.
    pub fn redeem(
        &self,
        member_id: MemberId,
        points: i64,
        description: String,
        related_id: Option<TransactionId>,
    ) -> Result<RedeemOutcome> {
        if points <= 0 {
            return Err(LedgerError::InvalidAmount(points));
        }

        let lock = self.member_lock(member_id);
        let _guard = hold(&lock);

        let mut account = self.load_or_create(member_id)?;
        if !account.has_sufficient_points(points) {
            return Err(LedgerError::InsufficientPoints {
                balance: account.balance,
                required: points,
            });
        }

        account.balance -= points;
        account.total_redeemed = account
            .total_redeemed
            .checked_add(points)
            .ok_or(LedgerError::InvalidAmount(points))?;
        account.updated_at = Utc::now();

        let tx = PointTransaction::redeemed(
            member_id,
            points,
            account.balance,
            description,
            related_id,
        );
        self.store.commit_entry(&account, &tx)?;

        tracing::debug!(
            member_id = %member_id,
            points = %points,
            new_balance = %account.balance,
            "Points redeemed"
        );

        Ok(RedeemOutcome {
            new_balance: account.balance,
            total_redeemed: account.total_redeemed,
            transaction_id: tx.id,
        })
    }

    /// Apply a signed admin correction.
    ///
    /// Positive deltas count as earned, negative as redeemed, matching
    /// how the totals reconcile against the log. Requires an
    /// [`AdminCapability`]: the type encodes that the caller's role was
    /// validated upstream.
    ///
    /// # Errors
    ///
    /// - `LedgerError::InvalidAmount` if `delta == 0`, or if the delta
    ///   would overflow the balance counters.
    /// - `LedgerError::NegativeBalanceRejected` if the result would be
    ///   negative.
    /// - `LedgerError::Storage` if persistence fails.
    pub fn adjust(
        &self,
        member_id: MemberId,
        delta: i64,
        description: String,
        capability: &AdminCapability,
    ) -> Result<AdjustOutcome> {
        if delta == 0 {
            return Err(LedgerError::InvalidAmount(delta));
        }

        let lock = self.member_lock(member_id);
        let _guard = hold(&lock);

        let mut account = self.load_or_create(member_id)?;
        let new_balance = account
            .balance
            .checked_add(delta)
            .ok_or(LedgerError::InvalidAmount(delta))?;
        if new_balance < 0 {
            return Err(LedgerError::NegativeBalanceRejected {
                balance: account.balance,
                delta,
            });
        }

        account.balance = new_balance;
        if delta > 0 {
            account.total_earned = account
                .total_earned
                .checked_add(delta)
                .ok_or(LedgerError::InvalidAmount(delta))?;
        } else {
            let magnitude = delta
                .checked_neg()
                .ok_or(LedgerError::InvalidAmount(delta))?;
            account.total_redeemed = account
                .total_redeemed
                .checked_add(magnitude)
                .ok_or(LedgerError::InvalidAmount(delta))?;
        }
        account.updated_at = Utc::now();

        let tx = PointTransaction::adjusted(member_id, delta, account.balance, description);
        self.store.commit_entry(&account, &tx)?;

        tracing::info!(
            member_id = %member_id,
            delta = %delta,
            granted_to = %capability.granted_to,
            new_balance = %account.balance,
            "Balance adjusted"
        );

        Ok(AdjustOutcome {
            new_balance: account.balance,
            transaction_id: tx.id,
        })
    }

    // =========================================================================
    // Read Operations
    // =========================================================================

    /// Get the point totals for a member.
    ///
    /// A member with no account yet reads as all zeros.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::Storage` if persistence fails.
    pub fn balance(&self, member_id: MemberId) -> Result<BalanceSummary> {
        let summary = self
            .store
            .get_account(&member_id)?
            .map_or_else(BalanceSummary::default, |account| BalanceSummary {
                balance: account.balance,
                total_earned: account.total_earned,
                total_redeemed: account.total_redeemed,
            });
        Ok(summary)
    }

    /// List a member's transactions, newest first.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::Storage` if persistence fails.
    pub fn history(
        &self,
        member_id: MemberId,
        limit: usize,
        offset: usize,
    ) -> Result<Vec<PointTransaction>> {
        Ok(self
            .store
            .list_transactions_by_member(&member_id, limit, offset)?)
    }

    // =========================================================================
    // Expiration Scanner
    // =========================================================================

    /// Expire every eligible earned entry as of `now`.
    ///
    /// Eligibility is re-derived from the log on every run, so the sweep
    /// is safe under at-least-once scheduling: a crash mid-run only
    /// repeats work the guard keys already made idempotent.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::Storage` if persistence fails. Entries whose
    /// points were already spent are skipped silently and show up only in
    /// the aggregate counters.
    pub fn run_expiration_sweep(&self, now: DateTime<Utc>) -> Result<SweepReport> {
        let eligible = self.store.list_expiring(now)?;
        let candidates = eligible.len();

        let mut report = SweepReport::default();
        for (member_id, earned_id) in eligible {
            if let Some(points) = self.expire_entry(member_id, earned_id, now)? {
                report.expired_points += points;
                report.transactions_processed += 1;
            }
        }

        tracing::info!(
            candidates = %candidates,
            expired_points = %report.expired_points,
            transactions_processed = %report.transactions_processed,
            "Expiration sweep complete"
        );

        Ok(report)
    }

    /// Expire one earned entry. Returns the number of points removed, or
    /// `None` when the entry is skipped (already expired, not yet due, or
    /// its points already spent).
    fn expire_entry(
        &self,
        member_id: MemberId,
        earned_id: TransactionId,
        now: DateTime<Utc>,
    ) -> Result<Option<i64>> {
        let lock = self.member_lock(member_id);
        let _guard = hold(&lock);

        if self.store.has_expiration(&earned_id)? {
            return Ok(None);
        }

        let Some(earned) = self.store.get_transaction(&earned_id)? else {
            return Ok(None);
        };
        let due = earned.expires_at.is_some_and(|at| at <= now);
        if !due {
            return Ok(None);
        }

        let Some(mut account) = self.store.get_account(&member_id)? else {
            return Ok(None);
        };

        // Already-spent points cannot retroactively expire; skip rather
        // than drive the balance negative.
        if account.balance < earned.amount {
            tracing::debug!(
                member_id = %member_id,
                earned_id = %earned_id,
                balance = %account.balance,
                amount = %earned.amount,
                "Skipping expiration, points already spent"
            );
            return Ok(None);
        }

        account.balance -= earned.amount;
        account.updated_at = Utc::now();

        let tx = PointTransaction::expired(member_id, earned.amount, account.balance, earned_id);
        match self.store.commit_expiration(&account, &tx, &earned) {
            Ok(()) => Ok(Some(earned.amount)),
            // Lost a race with another sweep; the guard did its job.
            Err(StoreError::AlreadyExpired { .. }) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

/// Lock without propagating poison: a panicked holder cannot leave the
/// ledger unusable, and every commit is atomic regardless.
fn hold(lock: &Mutex<()>) -> MutexGuard<'_, ()> {
    lock.lock().unwrap_or_else(PoisonError::into_inner)
}
