//! Add command handler.

use crate::args::AddArgs;
use crate::commands::Out;
use crate::model::Transaction;
use crate::{Config, Result};

/// Records a new transaction stamped with the current time and writes it to the audit log.
pub fn add(config: &Config, args: &AddArgs) -> Result<Out<Transaction>> {
    let transaction = config.registry().add(
        args.transaction_type(),
        args.description(),
        args.amount(),
    )?;

    let message = format!(
        "Transaction added\n\
        Id:          {}\n\
        Type:        {}\n\
        Description: {}\n\
        Amount:      {}\n\
        Date:        {}",
        transaction.id(),
        transaction.transaction_type().label(),
        transaction.description(),
        transaction.amount(),
        transaction.date().format("%Y-%m-%d"),
    );
    Ok(Out::new(message, transaction))
}
