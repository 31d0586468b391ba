//! The transaction registry: the domain-level entry point for adding, removing and querying
//! transactions.
//!
//! The registry creates transactions, hands them to the `ShardStore` for persistence and then
//! tells every subscribed `TransactionListener` about each transaction it added. The store knows
//! nothing about listeners.

use crate::error::{Error, ErrorType};
use crate::model::{Amount, Transaction, TransactionType};
use crate::store::ShardStore;
use crate::Result;
use chrono::{DateTime, Local, NaiveDate, TimeZone};
use std::fmt::{Debug, Formatter};
use tracing::{debug, info, trace};
use uuid::Uuid;

/// Receives a notification for every transaction the `Registry` adds.
///
/// Listeners are called synchronously, after the transaction has been persisted and before `add`
/// returns. A listener has no way to fail the add, so any error it runs into is its own to
/// handle.
pub trait TransactionListener {
    fn transaction_added(&self, transaction: &Transaction);
}

impl<F> TransactionListener for F
where
    F: Fn(&Transaction),
{
    fn transaction_added(&self, transaction: &Transaction) {
        self(transaction)
    }
}

pub struct Registry {
    store: ShardStore,
    listeners: Vec<Box<dyn TransactionListener>>,
}

impl Debug for Registry {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registry")
            .field("store", &self.store)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl Registry {
    pub fn new(store: ShardStore) -> Self {
        Self {
            store,
            listeners: Vec::new(),
        }
    }

    pub fn store(&self) -> &ShardStore {
        &self.store
    }

    /// Adds `listener` to the end of the listener list. Listeners are notified in the order they
    /// subscribed.
    pub fn subscribe(&mut self, listener: impl TransactionListener + 'static) {
        self.listeners.push(Box::new(listener));
    }

    /// Creates, persists and announces a new transaction stamped with the current local time.
    ///
    /// # Errors
    /// - `ErrorType::Validation` if `amount` is not greater than zero.
    /// - `ErrorType::Storage` if the transaction could not be written. Listeners are not notified.
    pub fn add(
        &self,
        transaction_type: TransactionType,
        description: impl Into<String>,
        amount: Amount,
    ) -> Result<Transaction> {
        self.add_at(transaction_type, description, amount, Local::now())
    }

    /// The same as `add`, but stamps the transaction with `now` instead of reading the clock.
    pub fn add_at<Tz>(
        &self,
        transaction_type: TransactionType,
        description: impl Into<String>,
        amount: Amount,
        now: DateTime<Tz>,
    ) -> Result<Transaction>
    where
        Tz: TimeZone,
    {
        if !amount.is_positive() {
            return Err(Error::msg(
                ErrorType::Validation,
                format!("The amount must be greater than zero, got {amount}"),
            ));
        }

        let transaction = Transaction::new(transaction_type, description, amount, now);
        let path = self.store.append(&transaction)?;
        info!(
            "Added {} transaction {} to {}",
            transaction.transaction_type(),
            transaction.id(),
            path.display()
        );

        for listener in &self.listeners {
            listener.transaction_added(&transaction);
        }
        trace!("Notified {} listener(s)", self.listeners.len());

        Ok(transaction)
    }

    /// Deletes the transaction with `id`. Returns `false` when there is no such transaction.
    pub fn remove(&self, id: Uuid) -> Result<bool> {
        let removed = self.store.delete(id)?;
        debug!("Remove {id}: {removed}");
        Ok(removed)
    }

    /// Returns every transaction dated from `start` through `end`, inclusive.
    ///
    /// # Errors
    /// - `ErrorType::InvalidRange` if `end` is before `start`. Nothing is read in that case.
    pub fn query_range(&self, start: NaiveDate, end: NaiveDate) -> Result<Vec<Transaction>> {
        if end < start {
            return Err(Error::msg(
                ErrorType::InvalidRange,
                format!("The end date {end} is before the start date {start}"),
            ));
        }
        let transactions = self.store.query_range(start, end)?;
        debug!(
            "Found {} transaction(s) from {start} to {end}",
            transactions.len()
        );
        Ok(transactions)
    }
}
