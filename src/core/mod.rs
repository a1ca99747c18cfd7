//! Garage engine and the pieces around it.
//!
//! `store` and `registry` carry the invariants; the rest is configuration,
//! the audit ledger, and the console that drives them.

pub mod audit;
pub mod catalog;
pub mod config;
pub mod console;
pub mod error;
pub mod output;
pub mod registry;
pub mod store;
pub mod time;
