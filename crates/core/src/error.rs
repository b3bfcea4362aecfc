//! Error types for Libris
//!
//! Every failure a catalog operation can report is a variant of
//! [`CatalogError`]. Variants are grouped into coarse [`ErrorKind`]s so callers
//! can branch on the kind of failure without matching every field, and into
//! [`ErrorSeverity`] tiers:
//! - **Recoverable**: the request was refused, the catalog is untouched
//! - **Degraded**: the data files could not be read or written
//! - **Fatal**: the stored data is inconsistent and needs a human

use std::fmt;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Coarse classification of a [`CatalogError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Book or user identifier unknown
    NotFound,
    /// Every copy of the book is checked out
    NoCopiesAvailable,
    /// The user already holds the book
    AlreadyIssued,
    /// Return attempted without a matching issue
    NotBorrowed,
    /// Input rejected before touching the catalog
    InvalidArgument,
    /// Reading or writing a data file failed
    Io,
    /// A data file could not be decoded
    CorruptedData,
    /// The two indexes of the issue relation disagree
    InvariantViolation,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::NotFound => "not found",
            Self::NoCopiesAvailable => "no copies available",
            Self::AlreadyIssued => "already issued",
            Self::NotBorrowed => "not borrowed",
            Self::InvalidArgument => "invalid argument",
            Self::Io => "i/o",
            Self::CorruptedData => "corrupted data",
            Self::InvariantViolation => "invariant violation",
        };
        f.write_str(name)
    }
}

/// Error severity classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    /// Request refused, state unchanged
    Recoverable,
    /// Persistence unavailable
    Degraded,
    /// Catalog data cannot be trusted
    Fatal,
}

impl fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Recoverable => write!(f, "Recoverable"),
            Self::Degraded => write!(f, "Degraded"),
            Self::Fatal => write!(f, "Fatal"),
        }
    }
}

/// Main error type for catalog operations
#[derive(Error, Debug)]
pub enum CatalogError {
    // ===== Domain Errors =====
    /// No book with this identifier
    #[error("Book not found: {identifier}")]
    BookNotFound { identifier: String },

    /// No user with this name
    #[error("User not found: {name}")]
    UserNotFound { name: String },

    /// All copies are checked out
    #[error("No copies of {identifier} available ({quantity} owned, all issued)")]
    NoCopiesAvailable { identifier: String, quantity: u32 },

    /// The user already holds a copy
    #[error("{user} already holds {identifier}")]
    AlreadyIssued { identifier: String, user: String },

    /// Nothing to return
    #[error("{user} has not borrowed {identifier}")]
    NotBorrowed { identifier: String, user: String },

    /// Invalid argument provided
    #[error("Invalid argument: {argument} - {reason}")]
    InvalidArgument { argument: String, reason: String },

    // ===== Persistence Errors =====
    /// Reading or writing a data file failed
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A data file contains a record that cannot be decoded or loaded
    #[error("Corrupted data in {file} line {line}: {reason}")]
    CorruptedData {
        file: String,
        line: usize,
        reason: String,
    },

    // ===== Internal Errors =====
    /// The issue relation is no longer symmetric
    #[error("Catalog invariant violated: {details}")]
    InvariantViolation { details: String },
}

impl CatalogError {
    /// Returns the coarse kind of this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::BookNotFound { .. } | Self::UserNotFound { .. } => ErrorKind::NotFound,
            Self::NoCopiesAvailable { .. } => ErrorKind::NoCopiesAvailable,
            Self::AlreadyIssued { .. } => ErrorKind::AlreadyIssued,
            Self::NotBorrowed { .. } => ErrorKind::NotBorrowed,
            Self::InvalidArgument { .. } => ErrorKind::InvalidArgument,
            Self::Io { .. } => ErrorKind::Io,
            Self::CorruptedData { .. } => ErrorKind::CorruptedData,
            Self::InvariantViolation { .. } => ErrorKind::InvariantViolation,
        }
    }

    /// Returns the severity level of this error
    pub fn severity(&self) -> ErrorSeverity {
        match self.kind() {
            ErrorKind::NotFound
            | ErrorKind::NoCopiesAvailable
            | ErrorKind::AlreadyIssued
            | ErrorKind::NotBorrowed
            | ErrorKind::InvalidArgument => ErrorSeverity::Recoverable,

            ErrorKind::Io => ErrorSeverity::Degraded,

            ErrorKind::CorruptedData | ErrorKind::InvariantViolation => ErrorSeverity::Fatal,
        }
    }

    /// Returns a user-friendly error message suitable for display
    pub fn user_message(&self) -> String {
        match self {
            Self::BookNotFound { identifier } => format!("Book '{}' not found.", identifier),
            Self::UserNotFound { name } => format!("User '{}' not found.", name),
            Self::NoCopiesAvailable { .. } => "No copies available for issue.".to_string(),
            Self::AlreadyIssued { user, .. } => format!("{} already has this book.", user),
            Self::NotBorrowed { user, .. } => format!("{} has not borrowed this book.", user),
            Self::InvalidArgument { argument, reason } => {
                format!("Invalid {}: {}.", argument, reason)
            }
            Self::Io { path, .. } => format!(
                "Could not save or read {}. Your last change was not kept.",
                path.display()
            ),
            Self::CorruptedData { file, line, .. } => format!(
                "The data file {} is damaged (line {}). Please fix or restore it.",
                file, line
            ),
            Self::InvariantViolation { .. } => {
                "The catalog records are inconsistent. Please check the data files.".to_string()
            }
        }
    }

    /// Returns true if this error should be logged at ERROR level
    pub fn is_critical(&self) -> bool {
        self.severity() == ErrorSeverity::Fatal
    }

    /// Helper to wrap an I/O error with the path it happened on
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Convenience type alias for Results using CatalogError
pub type Result<T> = std::result::Result<T, CatalogError>;
