//! Types that represent the core data model, such as `Transaction` and `Amount`.
mod amount;
mod report;
mod transaction;

pub use amount::{Amount, AmountError};
pub use report::{Report, TypeFilter};
pub use transaction::{Transaction, TransactionType};
