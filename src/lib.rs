//! STAKELINE — bet ledger with a running balance history.
//!
//! Library crate exposing all modules for use by integration tests
//! and the binary entry point.

pub mod config;
pub mod types;
pub mod error;
pub mod ledger;
pub mod account;
pub mod input;
pub mod dashboard;
