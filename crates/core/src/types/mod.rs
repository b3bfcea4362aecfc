//! Domain types for Libris
//!
//! This module contains the catalog records organized by responsibility:
//! - `book`: Book records and their borrower lists
//! - `user`: Borrowers and the identifiers they hold
//! - `category`: The closed set of subject categories
//! - `stats`: Catalog-wide counts
//! - `common`: Shared validation helpers

mod book;
mod category;
mod common;
mod stats;
mod user;

// Re-export all public types
pub use book::Book;
pub use category::Category;
pub use common::{validate_key, validate_text, Validator, FORBIDDEN_KEY_CHARS};
pub use stats::CatalogStats;
pub use user::User;
