//! Report command handler.

use crate::args::ReportArgs;
use crate::commands::Out;
use crate::model::Report;
use crate::{Config, Result};

/// Totals the transactions from `args.start()` through `args.end()` after applying the type
/// filter. Fails with `ErrorType::InvalidRange` when the end date is before the start date, and
/// with `ErrorType::Validation` when a total overflows.
pub fn report(config: &Config, args: &ReportArgs) -> Result<Out<Report>> {
    let transactions = config
        .registry()
        .query_range(args.start(), args.end())?;
    let found = transactions.len();
    let report = Report::new(args.start(), args.end(), transactions, args.filter())?;

    let message = if found == 0 {
        "No transactions found in this range.".to_string()
    } else if report.count() == 0 {
        "No transactions match the selected filter.".to_string()
    } else {
        report.summary()
    };
    Ok(Out::new(message, report))
}
