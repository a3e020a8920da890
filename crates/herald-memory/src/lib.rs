//! # herald-memory
//!
//! Persistent ledgers for Herald (SQLite-backed).

pub mod audit;
pub mod store;

pub use audit::DeliveryLogger;
pub use store::{day_key, PendingOffer, Store};
