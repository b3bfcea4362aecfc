//! Borrowers

use crate::types::{validate_key, Validator};
use serde::{Deserialize, Serialize};

/// A borrower, identified by name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub name: String,
    /// Identifiers of the books currently held, in borrow order
    pub borrowed_books: Vec<String>,
}

impl User {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            borrowed_books: Vec::new(),
        }
    }

    /// Returns true if the user currently holds `identifier`
    pub fn has_borrowed(&self, identifier: &str) -> bool {
        self.borrowed_books.iter().any(|id| id == identifier)
    }
}

impl Validator for User {
    fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        if let Err(e) = validate_key(&self.name, "name") {
            errors.push(e.to_string());
        }

        for (i, id) in self.borrowed_books.iter().enumerate() {
            if let Err(e) = validate_key(id, "borrowed_books") {
                errors.push(e.to_string());
            }
            if self.borrowed_books[..i].contains(id) {
                errors.push(format!("'{}' is listed as borrowed twice", id));
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}
