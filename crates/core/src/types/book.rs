//! Book records

use crate::types::{validate_key, validate_text, Category, Validator};
use serde::{Deserialize, Serialize};

/// A catalogued title and the copies of it currently out on loan
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    /// Unique key, usually an ISBN
    pub identifier: String,
    pub title: String,
    pub author: String,
    pub category: Category,
    /// Total number of copies owned
    pub quantity: u32,
    /// Names of the users holding a copy, in issue order
    pub issued_to: Vec<String>,
}

impl Book {
    /// Creates a new book with no copies issued
    pub fn new(
        identifier: impl Into<String>,
        title: impl Into<String>,
        author: impl Into<String>,
        category: Category,
        quantity: u32,
    ) -> Self {
        Self {
            identifier: identifier.into(),
            title: title.into(),
            author: author.into(),
            category,
            quantity,
            issued_to: Vec::new(),
        }
    }

    /// Number of copies currently out on loan
    pub fn issued_count(&self) -> usize {
        self.issued_to.len()
    }

    /// Number of copies still on the shelf
    pub fn available(&self) -> u32 {
        let issued = u32::try_from(self.issued_to.len()).unwrap_or(u32::MAX);
        self.quantity.saturating_sub(issued)
    }

    /// Returns true if at least one copy can be issued
    pub fn has_available_copy(&self) -> bool {
        self.issued_to.len() < self.quantity as usize
    }

    /// Returns true if `user` currently holds a copy
    pub fn is_issued_to(&self, user: &str) -> bool {
        self.issued_to.iter().any(|name| name == user)
    }
}

impl Validator for Book {
    fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors: Vec<String> = [
            validate_key(&self.identifier, "identifier"),
            validate_text(&self.title, "title"),
            validate_text(&self.author, "author"),
        ]
        .into_iter()
        .filter_map(|r| r.err().map(|e| e.to_string()))
        .collect();

        if self.issued_to.len() > self.quantity as usize {
            errors.push(format!(
                "{} copies issued but only {} owned",
                self.issued_to.len(),
                self.quantity
            ));
        }

        for (i, name) in self.issued_to.iter().enumerate() {
            if let Err(e) = validate_key(name, "issued_to") {
                errors.push(e.to_string());
            }
            if self.issued_to[..i].contains(name) {
                errors.push(format!("'{}' is listed as a borrower twice", name));
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Book {
        Book::new(
            "ISBN1",
            "Intro to Algorithms",
            "Cormen",
            Category::ComputerScience,
            2,
        )
    }

    #[test]
    fn test_book_new() {
        let book = sample();
        assert_eq!(book.identifier, "ISBN1");
        assert_eq!(book.quantity, 2);
        assert!(book.issued_to.is_empty());
        assert_eq!(book.available(), 2);
    }

    #[test]
    fn test_availability() {
        let mut book = sample();
        book.issued_to.push("alice".to_string());
        assert_eq!(book.available(), 1);
        assert!(book.has_available_copy());
        assert!(book.is_issued_to("alice"));
        assert!(!book.is_issued_to("bob"));

        book.issued_to.push("bob".to_string());
        assert_eq!(book.available(), 0);
        assert!(!book.has_available_copy());
    }

    #[test]
    fn test_zero_quantity_has_no_copies() {
        let book = Book::new("X", "T", "A", Category::Others, 0);
        assert!(!book.has_available_copy());
        assert_eq!(book.available(), 0);
        assert!(book.is_valid());
    }

    #[test]
    fn test_validation_over_issued() {
        let mut book = sample();
        book.issued_to = vec!["a".into(), "b".into(), "c".into()];
        assert!(!book.is_valid());
    }

    #[test]
    fn test_validation_duplicate_borrower() {
        let mut book = sample();
        book.issued_to = vec!["a".into(), "a".into()];
        let errors = book.validate().unwrap_err();
        assert!(errors.iter().any(|e| e.contains("twice")));
    }

    #[test]
    fn test_validation_bad_identifier() {
        let mut book = sample();
        book.identifier = "IS|BN".to_string();
        assert!(!book.is_valid());
    }
}
