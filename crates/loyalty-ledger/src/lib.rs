//! Ledger engine for the loyalty points platform.
//!
//! This crate is the single writer of the account store and the
//! append-only transaction log. It exposes the four balance-affecting
//! operations (earn, redeem, adjust, expire-via-sweep) and the reads
//! (balance, history), and enforces the ledger invariants:
//!
//! - the balance never goes negative;
//! - every balance change appends exactly one immutable transaction whose
//!   `balance_after` snapshots the result;
//! - each earned entry expires at most once (guarded in storage);
//! - operations on one member serialize, so races cannot overdraw.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod engine;
pub mod error;

pub use engine::{
    AdjustOutcome, AdminCapability, BalanceSummary, EarnOutcome, LedgerEngine, RedeemOutcome,
    SweepReport,
};
pub use error::{LedgerError, Result};
