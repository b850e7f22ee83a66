//! Loyalty Service - HTTP API for the points ledger and rewards engine.
//!
//! This crate provides the HTTP surface over the ledger engine:
//!
//! - Point balance and transaction history
//! - Earning points (check-in, referral, purchase, challenge, achievement)
//! - Reward redemption through the catalog resolver
//! - Admin adjustments and expiration sweeps
//!
//! # Authentication
//!
//! The ledger trusts the identity layer in front of it:
//!
//! 1. **Member requests** carry the authenticated member UUID in
//!    `x-member-id`, forwarded by the identity gateway.
//! 2. **Service requests** (activity services crediting points) carry the
//!    shared service API key in `x-api-key`.
//! 3. **Admin requests** carry the admin key in `x-admin-key`, which is
//!    exchanged for the capability token the ledger's adjust path
//!    requires.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
// Allow some pedantic lints that are noisy for Axum handler functions
#![allow(clippy::missing_errors_doc)] // Axum handlers all return Result
#![allow(clippy::unused_async)] // Handlers stay async for routing consistency

pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod routes;
pub mod state;
pub mod sweep;

pub use config::ServiceConfig;
pub use error::ApiError;
pub use routes::create_router;
pub use state::AppState;
pub use sweep::spawn_sweep_scheduler;
