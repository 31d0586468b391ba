//! These structs provide the CLI interface for the budget CLI.

use crate::model::{Amount, TransactionType, TypeFilter};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::convert::Infallible;
use std::fmt::{Display, Formatter};
use std::ops::Deref;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::error;
use tracing_subscriber::filter::LevelFilter;
use uuid::Uuid;

/// budget: A command-line tool for recording income and expenses.
///
/// Transactions are stored as JSON, one file per calendar day, in the data directory under
/// --budget-home. Every transaction you add is also written as a line to an audit log.
#[derive(Debug, Parser, Clone)]
pub struct Args {
    #[clap(flatten)]
    common: Common,

    #[command(subcommand)]
    command: Command,
}

impl Args {
    pub fn new(common: Common, command: Command) -> Self {
        Self { common, command }
    }

    pub fn common(&self) -> &Common {
        &self.common
    }

    pub fn command(&self) -> &Command {
        &self.command
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Create the home directory and its configuration file.
    ///
    /// This is the first command you should run. By default the home directory is $HOME/budget,
    /// pass --budget-home if you want it somewhere else.
    Init,
    /// Record a new income or expense transaction.
    Add(AddArgs),
    /// Remove a transaction by its id.
    Remove(RemoveArgs),
    /// Summarize the transactions between two dates, inclusive.
    Report(ReportArgs),
}

/// Arguments common to all subcommands.
#[derive(Debug, Parser, Clone)]
pub struct Common {
    /// The logging verbosity. One of, from least to most verbose:
    /// off, error, warn, info, debug, trace
    ///
    /// This can be overridden by RUST_LOG.
    #[arg(long, default_value_t = LevelFilter::INFO)]
    log_level: LevelFilter,

    /// The directory where budget data and configuration is held. Defaults to ~/budget
    #[arg(long, env = "BUDGET_HOME", default_value_t = default_budget_home())]
    budget_home: DisplayPath,
}

impl Common {
    pub fn new(log_level: LevelFilter, budget_home: PathBuf) -> Self {
        Self {
            log_level,
            budget_home: budget_home.into(),
        }
    }

    pub fn log_level(&self) -> LevelFilter {
        self.log_level
    }

    pub fn budget_home(&self) -> &DisplayPath {
        &self.budget_home
    }
}

/// Args for the `budget add` command.
#[derive(Debug, Parser, Clone)]
pub struct AddArgs {
    /// Whether money came in or went out: "income" or "expense"
    transaction_type: TransactionType,

    /// The amount, greater than zero, e.g. 45.50 or $1,000.00
    #[arg(value_parser = parse_positive_amount, allow_hyphen_values = true)]
    amount: Amount,

    /// A free-text description of the transaction.
    #[arg(long, short, default_value = "")]
    description: String,
}

impl AddArgs {
    pub fn new(
        transaction_type: TransactionType,
        amount: Amount,
        description: impl Into<String>,
    ) -> Self {
        Self {
            transaction_type,
            amount,
            description: description.into(),
        }
    }

    pub fn transaction_type(&self) -> TransactionType {
        self.transaction_type
    }

    pub fn amount(&self) -> Amount {
        self.amount
    }

    pub fn description(&self) -> &str {
        &self.description
    }
}

/// Args for the `budget remove` command.
#[derive(Debug, Parser, Clone)]
pub struct RemoveArgs {
    /// The id of the transaction, as printed by `budget add` or `budget report`.
    id: Uuid,
}

impl RemoveArgs {
    pub fn new(id: Uuid) -> Self {
        Self { id }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }
}

/// Args for the `budget report` command.
#[derive(Debug, Parser, Clone)]
pub struct ReportArgs {
    /// The first date of the report, YYYY-MM-DD
    start: NaiveDate,

    /// The last date of the report, YYYY-MM-DD
    end: NaiveDate,

    /// Which transactions to include.
    #[arg(long, value_enum, default_value_t = TypeFilter::All)]
    filter: TypeFilter,
}

impl ReportArgs {
    pub fn new(start: NaiveDate, end: NaiveDate, filter: TypeFilter) -> Self {
        Self { start, end, filter }
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
}

fn parse_positive_amount(s: &str) -> Result<Amount, String> {
    let amount = Amount::from_str(s).map_err(|e| format!("'{s}' is not a valid amount: {e}"))?;
    if !amount.is_positive() {
        return Err(format!("The amount must be greater than zero, got '{s}'"));
    }
    Ok(amount)
}

fn default_budget_home() -> DisplayPath {
    DisplayPath(match dirs::home_dir() {
        Some(home) => home.join("budget"),
        None => {
            error!(
                "There was an error when trying to get your home directory. You can get around \
                this by providing --budget-home or BUDGET_HOME instead of relying on the default \
                budget home directory. If you continue using the program right now, you may have \
                problems!",
            );
            PathBuf::from("budget")
        }
    })
}

#[derive(Debug, Default, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct DisplayPath(PathBuf);

impl From<PathBuf> for DisplayPath {
    fn from(value: PathBuf) -> Self {
        DisplayPath(value)
    }
}

impl Deref for DisplayPath {
    type Target = Path;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl AsRef<Path> for DisplayPath {
    fn as_ref(&self) -> &Path {
        &self.0
    }
}

impl Display for DisplayPath {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.to_string_lossy())
    }
}

impl FromStr for DisplayPath {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(PathBuf::from(s)))
    }
}

impl DisplayPath {
    pub fn path(&self) -> &Path {
        &self.0
    }
}
