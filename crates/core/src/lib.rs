pub mod error;
pub mod types;

// Re-export commonly used types
pub use error::{CatalogError, ErrorKind, ErrorSeverity, Result};
pub use types::{validate_key, validate_text, Book, CatalogStats, Category, User, Validator};
