//! Catalog storage configuration section

use crate::validation::{Checks, ConfigSection};
use serde::{Deserialize, Serialize};

/// Largest accepted `default_quantity`
pub const MAX_DEFAULT_QUANTITY: u32 = 10_000;

/// Record file and catalog defaults
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LibraryConfig {
    /// File name of the books file inside the data directory
    pub books_file: String,

    /// File name of the users file inside the data directory
    pub users_file: String,

    /// Copies added when no quantity is given
    pub default_quantity: u32,

    /// Keep a `.bak` copy of each record file before overwriting it
    pub backup_on_save: bool,
}

impl Default for LibraryConfig {
    fn default() -> Self {
        Self {
            books_file: "books.txt".to_string(),
            users_file: "users.txt".to_string(),
            default_quantity: 1,
            backup_on_save: false,
        }
    }
}

impl ConfigSection for LibraryConfig {
    const NAME: &'static str = "library";

    fn check(&self, checks: &mut Checks) {
        checks.record_file("books_file", &self.books_file);
        checks.record_file("users_file", &self.users_file);
        checks.range("default_quantity", self.default_quantity, 1, MAX_DEFAULT_QUANTITY);

        // Both record kinds written to one file would overwrite each other
        if !self.books_file.trim().is_empty() && self.books_file == self.users_file {
            checks.fail(
                "users_file",
                "must differ from library.books_file",
                Some(&self.users_file),
            );
        }
    }
}
