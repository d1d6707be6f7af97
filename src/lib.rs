//! # tribe-slots
//!
//! Persists per-tribe slot cooldown timers in a local SQLite file so they
//! survive server restarts.

pub mod cli;
pub mod cli_handlers;
pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod store;

pub use config::StoreConfig;
pub use error::{Result, StoreError};
pub use models::{SlotTimers, TribeId, TribeRecord};
pub use store::TribeSlotStore;
