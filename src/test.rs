//! Shared test utilities for creating test environments.
//!
//! This module is only compiled when running tests (`#[cfg(test)]`).

use crate::model::{Amount, Transaction, TransactionType};
use crate::{utils, Config};
use chrono::{Local, NaiveDate, NaiveDateTime, NaiveTime, TimeZone};
use std::str::FromStr;
use tempfile::TempDir;

/// Test environment that sets up a budget home directory with a Config.
/// Holds TempDir to keep the directory alive for the duration of the test.
pub struct TestEnv {
    _temp_dir: TempDir,
    config: Config,
}

impl TestEnv {
    /// Creates a test environment with an initialized home directory.
    pub fn new() -> Self {
        let temp_dir = TempDir::new().unwrap();
        let config = Config::create(temp_dir.path().join("budget")).unwrap();
        Self {
            _temp_dir: temp_dir,
            config,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Adds an expense of 1.00 at noon on `date` (`YYYY-MM-DD`) through the registry.
    pub fn add_on(&self, date: &str, description: &str) -> Transaction {
        self.add_typed_on(date, TransactionType::Expense, description, "1.00")
    }

    /// Adds a transaction at noon on `date` (`YYYY-MM-DD`) through the registry.
    pub fn add_typed_on(
        &self,
        date: &str,
        transaction_type: TransactionType,
        description: &str,
        amount: &str,
    ) -> Transaction {
        let naive = NaiveDateTime::new(
            NaiveDate::from_str(date).unwrap(),
            NaiveTime::from_hms_opt(12, 0, 0).unwrap(),
        );
        let now = Local.from_local_datetime(&naive).earliest().unwrap();
        self.config
            .registry()
            .add_at(
                transaction_type,
                description,
                Amount::from_str(amount).unwrap(),
                now,
            )
            .unwrap()
    }

    /// Reads and decodes the shard for `date` straight from disk.
    pub fn shard(&self, date: NaiveDate) -> Vec<Transaction> {
        let registry = self.config.registry();
        utils::deserialize(registry.store().shard_path(date)).unwrap()
    }

    /// The full contents of the audit log.
    pub fn audit_log(&self) -> String {
        utils::read(self.config.log_path()).unwrap()
    }
}
