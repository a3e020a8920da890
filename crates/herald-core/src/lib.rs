//! # herald-core
//!
//! Core types, traits, configuration, and error handling for Herald.

pub mod config;
pub mod error;
pub mod intent;
pub mod message;
pub mod traits;

pub use config::shellexpand;
