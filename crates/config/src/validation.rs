//! Section validation
//!
//! Sections report every problem at once so a user can fix a config file in
//! one pass.

pub use crate::error::FieldError;
use std::fmt::Display;
use std::path::Path;

/// Characters not allowed in record file names
const RESERVED_IN_FILE_NAMES: [char; 3] = ['/', '\\', '|'];

/// A named table of the config file that can check its own values
pub trait ConfigSection: Default {
    /// Table name used as the prefix of reported fields
    const NAME: &'static str;

    /// Adds a problem to `checks` for every unusable value
    fn check(&self, checks: &mut Checks);

    fn validate(&self) -> Result<(), Vec<FieldError>> {
        let mut checks = Checks::new(Self::NAME);
        self.check(&mut checks);
        checks.finish()
    }
}

/// Collects problems for one section
#[derive(Debug)]
pub struct Checks {
    section: &'static str,
    problems: Vec<FieldError>,
}

impl Checks {
    pub fn new(section: &'static str) -> Self {
        Self {
            section,
            problems: Vec::new(),
        }
    }

    fn field(&self, key: &str) -> String {
        format!("{}.{}", self.section, key)
    }

    /// Records a problem for `key`
    pub fn fail(&mut self, key: &str, message: impl Into<String>, value: Option<&dyn Display>) {
        let mut problem = FieldError::new(self.field(key), message);
        if let Some(value) = value {
            problem = problem.with_value(value);
        }
        self.problems.push(problem);
    }

    /// `value` must lie within `min..=max`
    pub fn range<T>(&mut self, key: &str, value: T, min: T, max: T)
    where
        T: PartialOrd + Display,
    {
        if value < min || value > max {
            self.fail(
                key,
                format!("must be between {} and {}", min, max),
                Some(&value),
            );
        }
    }

    /// `value` must name a file directly inside the data directory
    pub fn record_file(&mut self, key: &str, value: &str) {
        if value.trim().is_empty() {
            self.fail(key, "must not be empty", None);
        } else if value == "." || value == ".." || value.contains(RESERVED_IN_FILE_NAMES) {
            self.fail(key, "must be a plain file name", Some(&value));
        }
    }

    /// `path`, when it already exists, must be a directory
    pub fn directory_if_present(&mut self, key: &str, path: &Path) {
        if path.as_os_str().is_empty() {
            self.fail(key, "must not be empty when set", None);
        } else if path.exists() && !path.is_dir() {
            self.fail(key, "is not a directory", Some(&path.display()));
        }
    }

    /// Everything recorded so far
    pub fn finish(self) -> Result<(), Vec<FieldError>> {
        if self.problems.is_empty() {
            Ok(())
        } else {
            Err(self.problems)
        }
    }
}
