//! API handlers.

pub mod admin;
pub mod health;
pub mod points;
pub mod rewards;
