use crate::error::{Error, ErrorType};
use crate::model::{Amount, Transaction, TransactionType};
use crate::Result;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Which transactions a report should include.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Default,
    Serialize,
    Deserialize,
    clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum TypeFilter {
    /// Every transaction in the range.
    #[default]
    All,
    /// Income only.
    Income,
    /// Expenses only.
    Expense,
}

serde_plain::derive_display_from_serialize!(TypeFilter);
serde_plain::derive_fromstr_from_deserialize!(TypeFilter);

impl TypeFilter {
    pub fn matches(&self, transaction: &Transaction) -> bool {
        match self {
            TypeFilter::All => true,
            TypeFilter::Income => transaction.is_income(),
            TypeFilter::Expense => transaction.is_expense(),
        }
    }
}

/// Totals over the transactions of a date range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Report {
    start: NaiveDate,
    end: NaiveDate,
    filter: TypeFilter,
    transactions: Vec<Transaction>,
    income: Amount,
    expense: Amount,
    net: Amount,
}

impl Report {
    /// Filters `transactions` and totals what remains. `net` is income minus expense.
    ///
    /// # Errors
    /// - `ErrorType::Validation` if a total does not fit in a `Decimal`.
    pub fn new(
        start: NaiveDate,
        end: NaiveDate,
        transactions: impl IntoIterator<Item = Transaction>,
        filter: TypeFilter,
    ) -> Result<Self> {
        let transactions: Vec<Transaction> = transactions
            .into_iter()
            .filter(|t| filter.matches(t))
            .collect();
        let income = sum(&transactions, TransactionType::Income)?;
        let expense = sum(&transactions, TransactionType::Expense)?;
        let net = income
            .checked_sub(expense)
            .ok_or_else(|| overflow("net balance"))?;
        Ok(Self {
            start,
            end,
            filter,
            transactions,
            income: income.into(),
            expense: expense.into(),
            net: net.into(),
        })
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    pub fn filter(&self) -> TypeFilter {
        self.filter
    }

    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    pub fn count(&self) -> usize {
        self.transactions.len()
    }

    pub fn income(&self) -> Amount {
        self.income
    }

    pub fn expense(&self) -> Amount {
        self.expense
    }

    pub fn net(&self) -> Amount {
        self.net
    }

    /// A multi-line, human-readable summary.
    pub fn summary(&self) -> String {
        format!(
            "Report from {} to {}\n\
            Number of transactions: {}\n\
            Total income:   {}\n\
            Total expenses: {}\n\
            Net balance:    {}",
            self.start.format("%Y-%m-%d"),
            self.end.format("%Y-%m-%d"),
            self.count(),
            self.income.pretty(),
            self.expense.pretty(),
            self.net.pretty(),
        )
    }
}

fn sum(transactions: &[Transaction], transaction_type: TransactionType) -> Result<Decimal> {
    transactions
        .iter()
        .filter(|t| t.transaction_type() == transaction_type)
        .try_fold(Decimal::ZERO, |total, t| {
            total
                .checked_add(t.amount().value())
                .ok_or_else(|| overflow(transaction_type.label()))
        })
}

fn overflow(what: &str) -> Error {
    Error::msg(
        ErrorType::Validation,
        format!("The {} total is too large to compute", what.to_lowercase()),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Local;
    use std::str::FromStr;

    fn txn(transaction_type: TransactionType, description: &str, amount: &str) -> Transaction {
        Transaction::new(
            transaction_type,
            description,
            Amount::from_str(amount).unwrap(),
            Local::now(),
        )
    }

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 15).unwrap()
    }

    fn salary_and_groceries() -> Vec<Transaction> {
        vec![
            txn(TransactionType::Income, "Salary", "1000.00"),
            txn(TransactionType::Expense, "Groceries", "45.50"),
        ]
    }

    #[test]
    fn test_unfiltered_totals() {
        let report = Report::new(day(), day(), salary_and_groceries(), TypeFilter::All).unwrap();
        assert_eq!(report.count(), 2);
        assert_eq!(report.income().value(), Decimal::from_str("1000.00").unwrap());
        assert_eq!(report.expense().value(), Decimal::from_str("45.50").unwrap());
        assert_eq!(report.net().value(), Decimal::from_str("954.50").unwrap());
    }

    #[test]
    fn test_income_filter() {
        let report = Report::new(day(), day(), salary_and_groceries(), TypeFilter::Income).unwrap();
        assert_eq!(report.count(), 1);
        assert_eq!(report.income().value(), Decimal::from_str("1000.00").unwrap());
        assert!(report.expense().is_zero());
        assert_eq!(report.net().value(), Decimal::from_str("1000.00").unwrap());
    }

    #[test]
    fn test_expense_filter() {
        let report = Report::new(day(), day(), salary_and_groceries(), TypeFilter::Expense).unwrap();
        assert_eq!(report.count(), 1);
        assert!(report.income().is_zero());
        assert_eq!(report.net().value(), Decimal::from_str("-45.50").unwrap());
    }

    #[test]
    fn test_summary_text() {
        let report = Report::new(day(), day(), salary_and_groceries(), TypeFilter::All).unwrap();
        let summary = report.summary();
        assert!(summary.contains("Report from 2024-06-15 to 2024-06-15"));
        assert!(summary.contains("Number of transactions: 2"));
        assert!(summary.contains("Total income:   1,000.00"));
        assert!(summary.contains("Total expenses: 45.50"));
        assert!(summary.contains("Net balance:    954.50"));
    }

    #[test]
    fn test_income_overflow_is_an_error() {
        let max = Decimal::MAX.to_string();
        let txns = vec![
            txn(TransactionType::Income, "a", &max),
            txn(TransactionType::Income, "b", &max),
        ];
        let err = Report::new(day(), day(), txns, TypeFilter::All).unwrap_err();
        assert_eq!(err.error_type(), ErrorType::Validation);
        assert_eq!(err.to_string(), "The income total is too large to compute");
    }

    #[test]
    fn test_expense_overflow_is_an_error() {
        let max = Decimal::MAX.to_string();
        let txns = vec![
            txn(TransactionType::Income, "a", &max),
            txn(TransactionType::Expense, "b", &max),
            txn(TransactionType::Expense, "c", "1"),
        ];
        let err = Report::new(day(), day(), txns, TypeFilter::All).unwrap_err();
        assert_eq!(err.error_type(), ErrorType::Validation);
        assert_eq!(err.to_string(), "The expense total is too large to compute");

        let txns = vec![
            txn(TransactionType::Income, "a", &max),
            txn(TransactionType::Expense, "b", "1"),
        ];
        let report = Report::new(day(), day(), txns, TypeFilter::All).unwrap();
        assert_eq!(report.net().value(), Decimal::MAX - Decimal::ONE);
    }

    #[test]
    fn test_empty() {
        let report = Report::new(day(), day(), Vec::new(), TypeFilter::All).unwrap();
        assert_eq!(report.count(), 0);
        assert!(report.net().is_zero());
    }
}
