use crate::model::Amount;
use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Whether a transaction brought money in or sent money out.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionType {
    Income,
    Expense,
}

serde_plain::derive_display_from_serialize!(TransactionType);
serde_plain::derive_fromstr_from_deserialize!(TransactionType);

impl TransactionType {
    /// The capitalized label used in human-readable output, e.g. `Income`.
    pub fn label(&self) -> &'static str {
        match self {
            TransactionType::Income => "Income",
            TransactionType::Expense => "Expense",
        }
    }
}

/// One financial event.
///
/// A `Transaction` is created once, by `Transaction::new`, and is never changed afterwards. The
/// `date` is always the calendar date of `timestamp` and decides which shard file the transaction
/// is stored in. Decoding rejects records whose amount is not positive or whose `date` does not
/// match `timestamp`.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", try_from = "TransactionRecord")]
pub struct Transaction {
    id: Uuid,
    amount: Amount,
    description: String,
    /// Local wall-clock time of creation.
    timestamp: NaiveDateTime,
    date: NaiveDate,
    #[serde(rename = "type")]
    transaction_type: TransactionType,
}

impl Transaction {
    /// Builds a new transaction stamped with `now` and a freshly generated id. This has no side
    /// effects; persisting the transaction is up to the caller.
    pub fn new<Tz>(
        transaction_type: TransactionType,
        description: impl Into<String>,
        amount: Amount,
        now: DateTime<Tz>,
    ) -> Self
    where
        Tz: TimeZone,
    {
        let timestamp = now.naive_local();
        Self {
            id: Uuid::new_v4(),
            amount,
            description: description.into(),
            timestamp,
            date: timestamp.date(),
            transaction_type,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn amount(&self) -> Amount {
        self.amount
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn timestamp(&self) -> NaiveDateTime {
        self.timestamp
    }

    /// The calendar date of `timestamp`.
    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn transaction_type(&self) -> TransactionType {
        self.transaction_type
    }

    pub fn is_income(&self) -> bool {
        self.transaction_type == TransactionType::Income
    }

    pub fn is_expense(&self) -> bool {
        self.transaction_type == TransactionType::Expense
    }
}

/// The persisted shape of a `Transaction`, before it has been checked.
#[derive(Deserialize)]
#[serde(rename_all = "snake_case")]
struct TransactionRecord {
    id: Uuid,
    amount: Amount,
    description: String,
    timestamp: NaiveDateTime,
    date: NaiveDate,
    #[serde(rename = "type")]
    transaction_type: TransactionType,
}

impl TryFrom<TransactionRecord> for Transaction {
    type Error = String;

    fn try_from(record: TransactionRecord) -> Result<Self, Self::Error> {
        if !record.amount.is_positive() {
            return Err(format!(
                "Transaction {} has a non-positive amount {}",
                record.id, record.amount
            ));
        }
        if record.date != record.timestamp.date() {
            return Err(format!(
                "Transaction {} is dated {} but its timestamp is {}",
                record.id, record.date, record.timestamp
            ));
        }
        Ok(Self {
            id: record.id,
            amount: record.amount,
            description: record.description,
            timestamp: record.timestamp,
            date: record.date,
            transaction_type: record.transaction_type,
        })
    }
}
