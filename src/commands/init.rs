use crate::commands::Out;
use crate::{Config, Result};
use std::path::Path;

/// Creates the home directory with its data and logs directories and an initial `config.json`.
/// Running it against an existing home directory keeps the existing configuration.
///
/// # Errors
/// - Returns an error if any file operations fail.
pub fn init(budget_home: &Path) -> Result<Out<()>> {
    let config = Config::create(budget_home)?;
    Ok(format!(
        "Successfully created the budget directory at {}",
        config.root().display()
    )
    .into())
}
