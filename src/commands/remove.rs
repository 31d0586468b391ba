//! Remove command handler.

use crate::args::RemoveArgs;
use crate::commands::Out;
use crate::{Config, Result};

/// Removes a transaction by id. A missing transaction is reported in the message, not as an
/// error; the structured output says whether anything was removed.
pub fn remove(config: &Config, args: &RemoveArgs) -> Result<Out<bool>> {
    let removed = config.registry().remove(args.id())?;
    let message = if removed {
        format!("Removed transaction {}", args.id())
    } else {
        format!("No transaction found with id {}", args.id())
    };
    Ok(Out::new(message, removed))
}
