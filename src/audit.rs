//! The audit log: a plain-text, append-only record of every transaction that was added.

use crate::error::Res;
use crate::model::Transaction;
use crate::registry::TransactionListener;
use crate::utils;
use std::path::{Path, PathBuf};
use tracing::{trace, warn};

/// Writes one line per added transaction to a log file, e.g.
///
/// ```text
/// 2024-06-15 09:30:00 | Income | Salary | 1000.00 | Id: 5b0f0a3e-6f8e-4f51-9a4c-4f0f4d0d2c11
/// ```
///
/// Failing to write the log never affects the transaction itself; failures are logged and
/// dropped.
#[derive(Debug, Clone)]
pub struct AuditLog {
    dir: PathBuf,
    path: PathBuf,
}

impl AuditLog {
    pub fn new(dir: impl Into<PathBuf>, file_name: impl AsRef<Path>) -> Self {
        let dir = dir.into();
        let path = dir.join(file_name);
        Self { dir, path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write(&self, transaction: &Transaction) -> Res<()> {
        utils::make_dir(&self.dir)?;
        utils::append(&self.path, &line(transaction))
    }
}

impl TransactionListener for AuditLog {
    fn transaction_added(&self, transaction: &Transaction) {
        match self.write(transaction) {
            Ok(()) => trace!("Audit line written to {}", self.path.display()),
            Err(e) => warn!("Failed to log transaction {}: {e:#}", transaction.id()),
        }
    }
}

fn line(t: &Transaction) -> String {
    format!(
        "{} | {} | {} | {:.2} | Id: {}\n",
        t.timestamp().format("%Y-%m-%d %H:%M:%S"),
        t.transaction_type().label(),
        escape_line_breaks(t.description()),
        t.amount().value(),
        t.id()
    )
}

/// Keeps a description on one line of the log.
fn escape_line_breaks(s: &str) -> String {
    s.replace('\r', "\\r").replace('\n', "\\n")
}
