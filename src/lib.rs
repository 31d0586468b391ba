//! A budget tracker that records income and expense transactions in day-sharded JSON files.
//!
//! The `Registry` is the entry point: it creates transactions, persists them through the
//! `ShardStore` and notifies subscribed `TransactionListener`s, such as the `AuditLog`, of every
//! transaction it adds.

pub mod args;
mod audit;
pub mod commands;
mod config;
mod error;
pub mod model;
mod registry;
mod store;
mod utils;

#[cfg(test)]
mod test;

pub use audit::AuditLog;
pub use config::Config;
pub use error::{Error, ErrorType, Result};
pub use registry::{Registry, TransactionListener};
pub use store::ShardStore;
