#![doc(test(attr(deny(warnings))))]

//! Recurring Core turns recurring transaction templates into dated transactions.
//!
//! [`ledger::RecurrenceEngine`] holds the pure date-cycle rules, [`storage`] defines the
//! persistence contract, and [`crate::core::Scheduler`] drives the engine over a store.

pub mod cli;
pub mod config;
pub mod core;
pub mod errors;
pub mod ledger;
pub mod storage;
pub mod utils;

pub use errors::{RecurrenceError, Result};

/// Initializes global tracing. Safe to call more than once.
pub fn init() {
    utils::init_tracing();
}
