//! API endpoint handlers, one module per user intent.

pub mod analyze;
pub mod health;
pub mod session;
pub mod upload;
