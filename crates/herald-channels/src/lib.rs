//! # herald-channels
//!
//! Adapters for the outside world: the Reddit comment stream and reply
//! transport, and the Telegram operator notifier.

pub mod reddit;
pub mod telegram;
