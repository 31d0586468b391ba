//! The day-sharded transaction store.
//!
//! Every calendar date that has ever had a transaction added gets one file in the store
//! directory, named `yyyy-MM-dd.json`, holding a JSON array of the transactions for that date in
//! the order they were added. There is no index; the directory listing is the index, and file
//! names are the only thing consulted to decide which shards a date range touches.
//!
//! Every write is a whole-file read, modify and overwrite. Nothing guards against two processes
//! doing that to the same shard at the same time.

use crate::error::{ErrorType, IntoResult, Res};
use crate::model::Transaction;
use crate::{utils, Result};
use anyhow::Context;
use chrono::NaiveDate;
use std::path::{Path, PathBuf};
use tracing::{debug, trace, warn};
use uuid::Uuid;

const SHARD_EXTENSION: &str = "json";
const SHARD_DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone)]
pub struct ShardStore {
    dir: PathBuf,
}

impl ShardStore {
    /// Creates a store rooted at `dir`. The directory is not touched until the first operation.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// The path of the shard file that holds transactions for `date`.
    pub fn shard_path(&self, date: NaiveDate) -> PathBuf {
        self.dir.join(format!(
            "{}.{SHARD_EXTENSION}",
            date.format(SHARD_DATE_FORMAT)
        ))
    }

    /// Appends `transaction` to the end of its date's shard and returns the shard path.
    ///
    /// An existing shard that is empty or cannot be decoded is treated as holding no
    /// transactions, so its contents are replaced.
    pub fn append(&self, transaction: &Transaction) -> Result<PathBuf> {
        utils::make_dir(&self.dir).pub_result(ErrorType::Storage)?;
        let path = self.shard_path(transaction.date());
        let mut transactions = if path.is_file() {
            match read_shard(&path) {
                Ok(transactions) => transactions,
                Err(e) => {
                    warn!("Treating unreadable shard as empty: {e:#}");
                    Vec::new()
                }
            }
        } else {
            Vec::new()
        };
        transactions.push(transaction.clone());
        write_shard(&path, &transactions).pub_result(ErrorType::Storage)?;
        debug!(
            "Appended transaction {} to {} ({} in shard)",
            transaction.id(),
            path.display(),
            transactions.len()
        );
        Ok(path)
    }

    /// Removes the transaction with `id` from whichever shard holds it. Every shard is scanned
    /// until the first match. Returns `false` if no shard contains `id`.
    pub fn delete(&self, id: Uuid) -> Result<bool> {
        for path in self.shards().pub_result(ErrorType::Storage)? {
            let mut transactions = match read_shard(&path) {
                Ok(transactions) => transactions,
                Err(e) => {
                    warn!("Skipping shard: {e:#}");
                    continue;
                }
            };
            let Some(ix) = transactions.iter().position(|t| t.id() == id) else {
                continue;
            };
            let _ = transactions.remove(ix);
            write_shard(&path, &transactions).pub_result(ErrorType::Storage)?;
            debug!("Removed transaction {id} from {}", path.display());
            return Ok(true);
        }
        debug!("Transaction {id} was not found in any shard");
        Ok(false)
    }

    /// Returns the transactions of every shard dated within `start..=end`, shard by shard in
    /// ascending date order, each shard in file order.
    ///
    /// Files whose names are not shard dates are ignored, and shards that cannot be decoded
    /// contribute nothing.
    pub fn query_range(&self, start: NaiveDate, end: NaiveDate) -> Result<Vec<Transaction>> {
        let mut results = Vec::new();
        for path in self.shards().pub_result(ErrorType::Storage)? {
            let Some(date) = shard_date(&path) else {
                trace!("Ignoring non-shard file {}", path.display());
                continue;
            };
            if date < start || date > end {
                continue;
            }
            match read_shard(&path) {
                Ok(transactions) => results.extend(transactions),
                Err(e) => warn!("Skipping shard: {e:#}"),
            }
        }
        Ok(results)
    }

    /// Lists all `.json` files in the store directory, creating the directory if needed.
    fn shards(&self) -> Res<Vec<PathBuf>> {
        utils::make_dir(&self.dir)?;
        utils::list_files(&self.dir, SHARD_EXTENSION)
            .with_context(|| format!("Unable to list shards in {}", self.dir.display()))
    }
}

/// Parses the date from a shard file name. The stem must be exactly `yyyy-MM-dd`.
fn shard_date(path: &Path) -> Option<NaiveDate> {
    let stem = path.file_stem()?.to_str()?;
    let date = NaiveDate::parse_from_str(stem, SHARD_DATE_FORMAT).ok()?;
    // chrono accepts unpadded fields such as "2024-6-5"
    (date.format(SHARD_DATE_FORMAT).to_string() == stem).then_some(date)
}

/// Reads a shard. A blank file holds no transactions.
fn read_shard(path: &Path) -> Res<Vec<Transaction>> {
    let content = utils::read(path)?;
    if content.trim().is_empty() {
        return Ok(Vec::new());
    }
    serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse shard at {}", path.display()))
}

fn write_shard(path: &Path, transactions: &[Transaction]) -> Res<()> {
    let json =
        serde_json::to_string_pretty(transactions).context("Failed to serialize transactions")?;
    utils::write(path, json)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Amount, TransactionType};
    use chrono::{Local, NaiveDateTime, NaiveTime, TimeZone};
    use std::str::FromStr;
    use tempfile::TempDir;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::from_str(s).unwrap()
    }

    fn txn_on(day: &str, description: &str) -> Transaction {
        let naive = NaiveDateTime::new(date(day), NaiveTime::from_hms_opt(12, 0, 0).unwrap());
        let now = Local.from_local_datetime(&naive).earliest().unwrap();
        Transaction::new(
            TransactionType::Expense,
            description,
            Amount::from_str("10.00").unwrap(),
            now,
        )
    }

    fn store() -> (TempDir, ShardStore) {
        let tmp = TempDir::new().unwrap();
        let store = ShardStore::new(tmp.path().join("data"));
        (tmp, store)
    }

    #[test]
    fn test_shard_path() {
        let store = ShardStore::new("/x/data");
        assert_eq!(
            store.shard_path(date("2024-06-05")),
            PathBuf::from("/x/data/2024-06-05.json")
        );
    }

    #[test]
    fn test_shard_date() {
        assert_eq!(
            shard_date(Path::new("/d/2024-06-15.json")),
            Some(date("2024-06-15"))
        );
        assert_eq!(shard_date(Path::new("/d/2024-6-15.json")), None);
        assert_eq!(shard_date(Path::new("/d/notes.json")), None);
        assert_eq!(shard_date(Path::new("/d/2024-02-30.json")), None);
        assert_eq!(shard_date(Path::new("/d/2024-06-15-backup.json")), None);
    }

    #[test]
    fn test_append_creates_dir_and_preserves_order() {
        let (_tmp, store) = store();
        let a = txn_on("2024-06-15", "a");
        let b = txn_on("2024-06-15", "b");
        let path = store.append(&a).unwrap();
        assert_eq!(store.append(&b).unwrap(), path);

        let on_disk: Vec<Transaction> = utils::deserialize(&path).unwrap();
        assert_eq!(on_disk, vec![a, b]);
    }

    #[test]
    fn test_append_replaces_corrupt_shard() {
        let (_tmp, store) = store();
        let t = txn_on("2024-06-15", "a");
        utils::make_dir(store.dir()).unwrap();
        utils::write(store.shard_path(t.date()), "{ not json").unwrap();

        let path = store.append(&t).unwrap();
        let on_disk: Vec<Transaction> = utils::deserialize(&path).unwrap();
        assert_eq!(on_disk, vec![t]);
    }

    #[test]
    fn test_append_to_blank_shard() {
        let (_tmp, store) = store();
        let t = txn_on("2024-06-15", "a");
        utils::make_dir(store.dir()).unwrap();
        utils::write(store.shard_path(t.date()), "  \n").unwrap();

        let path = store.append(&t).unwrap();
        let on_disk: Vec<Transaction> = utils::deserialize(&path).unwrap();
        assert_eq!(on_disk.len(), 1);
    }

    #[test]
    fn test_delete_keeps_empty_shard() {
        let (_tmp, store) = store();
        let t = txn_on("2024-06-15", "a");
        let path = store.append(&t).unwrap();

        assert!(store.delete(t.id()).unwrap());
        assert!(!store.delete(t.id()).unwrap());

        assert!(path.is_file());
        let on_disk: Vec<Transaction> = utils::deserialize(&path).unwrap();
        assert!(on_disk.is_empty());
    }

    #[test]
    fn test_delete_only_touches_matching_shard() {
        let (_tmp, store) = store();
        let keep = txn_on("2024-06-14", "keep");
        let gone = txn_on("2024-06-15", "gone");
        let other = txn_on("2024-06-15", "other");
        store.append(&keep).unwrap();
        store.append(&gone).unwrap();
        store.append(&other).unwrap();

        assert!(store.delete(gone.id()).unwrap());
        let all = store
            .query_range(date("2024-01-01"), date("2024-12-31"))
            .unwrap();
        assert_eq!(all, vec![keep, other]);
    }

    #[test]
    fn test_delete_skips_corrupt_shard() {
        let (_tmp, store) = store();
        let t = txn_on("2024-06-15", "a");
        store.append(&t).unwrap();
        utils::write(store.dir().join("2024-06-01.json"), "[{\"id\": 3}]").unwrap();

        assert!(store.delete(t.id()).unwrap());
        assert!(!store.delete(Uuid::new_v4()).unwrap());
    }

    #[test]
    fn test_delete_stops_at_first_matching_shard() {
        let (_tmp, store) = store();
        let t = txn_on("2024-06-15", "twice");
        let later = store.append(&t).unwrap();
        // the same record copied into an earlier shard
        let earlier = store.dir().join("2024-06-10.json");
        write_shard(&earlier, &[t.clone()]).unwrap();

        assert!(store.delete(t.id()).unwrap());
        assert!(read_shard(&earlier).unwrap().is_empty());
        assert_eq!(read_shard(&later).unwrap(), vec![t.clone()]);

        assert!(store.delete(t.id()).unwrap());
        assert!(read_shard(&later).unwrap().is_empty());
    }

    #[test]
    fn test_shard_with_invalid_record_is_skipped() {
        let (_tmp, store) = store();
        let valid = txn_on("2024-06-15", "valid");
        let path = store.append(&valid).unwrap();
        let mut records = serde_json::to_value(vec![&valid]).unwrap();
        records.as_array_mut().unwrap().push(serde_json::json!({
            "id": Uuid::new_v4().to_string(),
            "amount": "-$5",
            "description": "refund",
            "timestamp": "2020-01-01T00:00:00",
            "date": "2024-06-15",
            "type": "expense",
        }));
        utils::write(&path, records.to_string()).unwrap();

        let found = store
            .query_range(date("2024-06-15"), date("2024-06-15"))
            .unwrap();
        assert!(found.is_empty());
        assert!(!store.delete(valid.id()).unwrap());
    }

    #[test]
    fn test_query_range_is_inclusive() {
        let (_tmp, store) = store();
        let before = txn_on("2024-06-14", "before");
        let first = txn_on("2024-06-15", "first");
        let last = txn_on("2024-06-17", "last");
        let after = txn_on("2024-06-18", "after");
        for t in [&after, &last, &first, &before] {
            store.append(t).unwrap();
        }

        let found = store
            .query_range(date("2024-06-15"), date("2024-06-17"))
            .unwrap();
        assert_eq!(found, vec![first, last]);
    }

    #[test]
    fn test_query_range_ignores_foreign_and_corrupt_files() {
        let (_tmp, store) = store();
        let t = txn_on("2024-06-15", "a");
        store.append(&t).unwrap();
        utils::write(store.dir().join("2024-06-16.json"), "garbage").unwrap();
        utils::write(store.dir().join("settings.json"), "{}").unwrap();
        utils::write(store.dir().join("2024-06-17.txt"), "[]").unwrap();

        let found = store
            .query_range(date("2024-06-01"), date("2024-06-30"))
            .unwrap();
        assert_eq!(found, vec![t]);
    }

    #[test]
    fn test_query_range_on_missing_dir() {
        let (_tmp, store) = store();
        let found = store
            .query_range(date("2024-06-01"), date("2024-06-30"))
            .unwrap();
        assert!(found.is_empty());
        assert!(store.dir().is_dir());
    }
}
