//! Loyalty Client SDK.
//!
//! This crate provides a client library for services to interact with the
//! loyalty points API.
//!
//! # Example
//!
//! ```no_run
//! use loyalty_client::{EarnEvent, LoyaltyClient};
//! use loyalty_core::PointSource;
//!
//! # async fn example() -> Result<(), loyalty_client::ClientError> {
//! let client = LoyaltyClient::new(
//!     "http://loyalty.rewards-system.svc:8080",
//!     "your-service-api-key",
//! );
//!
//! // Credit points for a gym check-in
//! let response = client.earn_points(EarnEvent {
//!     member_id: "member-uuid".to_string(),
//!     points: 10,
//!     source: PointSource::CheckIn,
//!     description: "Morning check-in".to_string(),
//!     ttl_days: Some(0),
//!     expires_at: None,
//! }).await?;
//!
//! println!("New balance: {} points", response.new_balance);
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

mod client;
mod error;
mod types;

pub use client::{ClientOptions, LoyaltyClient};
pub use error::ClientError;
pub use types::*;
