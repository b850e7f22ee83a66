//! Core types for the loyalty points ledger.
//!
//! This crate provides the foundational types used throughout the loyalty
//! platform:
//!
//! - **Identifiers**: `MemberId`, `TransactionId`
//! - **Accounts**: `Account`
//! - **Transactions**: `PointTransaction`, `TransactionType`, `PointSource`
//! - **Rewards**: `RewardCatalog`, `RewardKind`, `RewardCost`
//!
//! # Points
//!
//! Balances are integer points stored as `i64`. The account row is a
//! materialized cache of the append-only transaction log; summing the
//! signed `amount` of every transaction for a member always reproduces
//! the current balance.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod account;
pub mod ids;
pub mod rewards;
pub mod transaction;

pub use account::Account;
pub use ids::{IdError, MemberId, TransactionId};
pub use rewards::{
    RewardCatalog, RewardCost, RewardKind, DEFAULT_CLASS_PASS_POINTS,
    DEFAULT_MARKETPLACE_DISCOUNT_POINTS, FREE_MONTH_POINTS, PERSONAL_TRAINING_POINTS,
};
pub use transaction::{PointSource, PointTransaction, TransactionType};
