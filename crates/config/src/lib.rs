//! Libris settings
//!
//! One TOML file with an `[app]` table (where the records live, how loudly
//! to log) and a `[library]` table (record file names, copies per add,
//! backups). Every `LIBRIS_SECTION_KEY` environment variable overrides the
//! matching key.
//!
//! ```toml
//! version = 1
//!
//! [app]
//! data_dir = "/srv/libris"
//! log_level = "info"
//!
//! [library]
//! books_file = "books.txt"
//! users_file = "users.txt"
//! default_quantity = 1
//! backup_on_save = false
//! ```
//!
//! ```rust,no_run
//! use libris_config::ConfigManager;
//!
//! # fn main() -> libris_config::ConfigResult<()> {
//! let manager = ConfigManager::new()?;
//! let config = manager.load_with_env_overrides()?;
//! println!("Books file: {}", config.library.books_file);
//! # Ok(())
//! # }
//! ```

mod error;
mod manager;
mod persistence;
mod validation;

pub mod app_config;
mod library_config;

pub use app_config::{AppConfig, LogLevel};
pub use error::{ConfigError, ConfigResult, FieldError};
pub use library_config::{LibraryConfig, MAX_DEFAULT_QUANTITY};
pub use manager::ConfigManager;
pub use validation::{Checks, ConfigSection};

use serde::{Deserialize, Serialize};

/// Format version written to new config files
pub const CONFIG_VERSION: u32 = 1;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub version: u32,
    pub app: AppConfig,
    pub library: LibraryConfig,
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    /// Checks every section, reporting all problems together
    pub fn validate(&self) -> Result<(), Vec<FieldError>> {
        let mut problems = Vec::new();
        for result in [self.app.validate(), self.library.validate()] {
            if let Err(mut found) = result {
                problems.append(&mut found);
            }
        }

        if problems.is_empty() {
            Ok(())
        } else {
            Err(problems)
        }
    }

    /// The settings as they would be written to `config.toml`
    pub fn to_toml(&self) -> ConfigResult<String> {
        Ok(toml::to_string_pretty(self)?)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            app: AppConfig::default(),
            library: LibraryConfig::default(),
        }
    }
}
