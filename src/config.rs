//! Configuration file handling.
//!
//! The configuration file is stored at `$BUDGET_HOME/config.json` and says where the transaction
//! shards and the audit log live.

use crate::audit::AuditLog;
use crate::error::{ErrorType, IntoResult, Res};
use crate::registry::Registry;
use crate::store::ShardStore;
use crate::{utils, Result};
use anyhow::{bail, Context};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const APP_NAME: &str = "budget";
const CONFIG_VERSION: u8 = 1;
const CONFIG_JSON: &str = "config.json";
const DATA_DIR: &str = "data";
const LOGS_DIR: &str = "logs";
const LOG_FILE: &str = "transactions.log";

/// The `Config` object represents the configuration of the app. You instantiate it by providing
/// the path to `$BUDGET_HOME` and from there it loads `$BUDGET_HOME/config.json`. It resolves the
/// paths of the shard directory and the audit log.
#[derive(Debug, Clone)]
pub struct Config {
    root: PathBuf,
    config_path: PathBuf,
    config_file: ConfigFile,
}

impl Config {
    /// Creates the home directory, the data and logs directories, and an initial `config.json`
    /// with default settings. An existing `config.json` is loaded and kept rather than replaced.
    ///
    /// # Errors
    /// - Returns an `ErrorType::Config` error if any file operations fail.
    pub fn create(dir: impl Into<PathBuf>) -> Result<Self> {
        Self::try_create(dir.into()).pub_result(ErrorType::Config)
    }

    fn try_create(maybe_relative: PathBuf) -> Res<Self> {
        utils::make_dir(&maybe_relative).context("Unable to create the budget home directory")?;
        let root = utils::canonicalize(&maybe_relative)?;
        let config_path = root.join(CONFIG_JSON);

        let config_file = if config_path.is_file() {
            ConfigFile::load(&config_path)?
        } else {
            let config_file = ConfigFile::default();
            config_file.save(&config_path)?;
            config_file
        };

        let config = Self {
            root,
            config_path,
            config_file,
        };
        utils::make_dir(config.data_dir())?;
        utils::make_dir(config.logs_dir())?;
        Ok(config)
    }

    /// This will
    /// - validate that `budget_home` exists and that the config file exists
    /// - load and validate the config file
    /// - return the loaded configuration object
    pub fn load(budget_home: impl Into<PathBuf>) -> Result<Self> {
        Self::try_load(budget_home.into()).pub_result(ErrorType::Config)
    }

    fn try_load(maybe_relative: PathBuf) -> Res<Self> {
        if !maybe_relative.is_dir() {
            bail!(
                "The budget home directory is missing '{}', run 'budget init' first",
                maybe_relative.display()
            )
        }
        let root = utils::canonicalize(&maybe_relative)?;

        let config_path = root.join(CONFIG_JSON);
        if !config_path.is_file() {
            bail!(
                "The config file is missing '{}', run 'budget init' first",
                config_path.display()
            )
        }
        let config_file = ConfigFile::load(&config_path)?;

        Ok(Self {
            root,
            config_path,
            config_file,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    /// The directory that holds the day shards.
    pub fn data_dir(&self) -> PathBuf {
        self.resolve(self.config_file.data_dir())
    }

    /// The directory that holds the audit log.
    pub fn logs_dir(&self) -> PathBuf {
        self.resolve(self.config_file.logs_dir())
    }

    pub fn log_path(&self) -> PathBuf {
        self.logs_dir().join(self.config_file.log_file())
    }

    /// Builds a `Registry` over the configured data directory with the audit log subscribed.
    pub fn registry(&self) -> Registry {
        let mut registry = Registry::new(ShardStore::new(self.data_dir()));
        registry.subscribe(AuditLog::new(
            self.logs_dir(),
            self.config_file.log_file(),
        ));
        registry
    }

    /// Returns `p` unchanged if it is absolute, otherwise resolves it against the home directory.
    fn resolve(&self, p: PathBuf) -> PathBuf {
        if p.is_absolute() {
            return p;
        }
        self.root.join(p)
    }
}

/// Represents the serialization and deserialization format of the configuration file.
///
/// Example configuration:
/// ```json
/// {
///   "app_name": "budget",
///   "config_version": 1,
///   "data_dir": "data",
///   "logs_dir": "logs",
///   "log_file": "transactions.log"
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq)]
struct ConfigFile {
    /// Application name, should always be "budget"
    app_name: String,

    /// Configuration file version
    config_version: u8,

    /// Directory for the day shards, relative to the home directory or absolute.
    /// Defaults to $BUDGET_HOME/data
    #[serde(default, skip_serializing_if = "Option::is_none")]
    data_dir: Option<PathBuf>,

    /// Directory for the audit log, relative to the home directory or absolute.
    /// Defaults to $BUDGET_HOME/logs
    #[serde(default, skip_serializing_if = "Option::is_none")]
    logs_dir: Option<PathBuf>,

    /// File name of the audit log. Defaults to transactions.log
    #[serde(default, skip_serializing_if = "Option::is_none")]
    log_file: Option<String>,
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self {
            app_name: APP_NAME.to_string(),
            config_version: CONFIG_VERSION,
            data_dir: Some(PathBuf::from(DATA_DIR)),
            logs_dir: Some(PathBuf::from(LOGS_DIR)),
            log_file: Some(LOG_FILE.to_string()),
        }
    }
}

impl ConfigFile {
    /// Loads a ConfigFile from the specified path.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed, or if it was not written by this
    /// app or by a supported version of it.
    fn load(path: impl AsRef<Path>) -> Res<Self> {
        let path = path.as_ref();
        let config: ConfigFile = utils::deserialize(path)
            .with_context(|| format!("Failed to load config file at {}", path.display()))?;

        anyhow::ensure!(
            config.app_name == APP_NAME,
            "Invalid app_name in config file: expected '{}', got '{}'",
            APP_NAME,
            config.app_name
        );
        anyhow::ensure!(
            config.config_version == CONFIG_VERSION,
            "Unsupported config_version {} in config file. Is a newer version of budget available?",
            config.config_version
        );

        Ok(config)
    }

    /// Saves the ConfigFile to the specified path.
    fn save(&self, path: impl AsRef<Path>) -> Res<()> {
        let p = path.as_ref();
        let data = serde_json::to_string_pretty(self).context("Unable to serialize config")?;
        utils::write(p, data).context("Unable to write config file")
    }

    fn data_dir(&self) -> PathBuf {
        self.data_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from(DATA_DIR))
    }

    fn logs_dir(&self) -> PathBuf {
        self.logs_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from(LOGS_DIR))
    }

    fn log_file(&self) -> &str {
        self.log_file.as_deref().unwrap_or(LOG_FILE)
    }
}
