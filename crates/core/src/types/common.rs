//! Common validation shared across catalog records

use crate::error::CatalogError;

/// Characters that would break the line-oriented record files when they
/// appear inside an identifier or a user name.
pub const FORBIDDEN_KEY_CHARS: [char; 4] = ['|', ',', '\n', '\r'];

/// Characters that may not appear in free text fields (title, author).
const FORBIDDEN_TEXT_CHARS: [char; 3] = ['|', '\n', '\r'];

/// Checks that a record key (identifier or user name) can be stored.
pub fn validate_key(value: &str, argument: &str) -> Result<(), CatalogError> {
    if value.trim().is_empty() {
        return Err(CatalogError::InvalidArgument {
            argument: argument.to_string(),
            reason: "must not be empty".to_string(),
        });
    }

    if let Some(c) = value.chars().find(|c| FORBIDDEN_KEY_CHARS.contains(c)) {
        return Err(CatalogError::InvalidArgument {
            argument: argument.to_string(),
            reason: format!("must not contain {:?}", c),
        });
    }

    Ok(())
}

/// Checks that a free text field can be stored. Empty text is allowed.
pub fn validate_text(value: &str, argument: &str) -> Result<(), CatalogError> {
    match value.chars().find(|c| FORBIDDEN_TEXT_CHARS.contains(c)) {
        Some(c) => Err(CatalogError::InvalidArgument {
            argument: argument.to_string(),
            reason: format!("must not contain {:?}", c),
        }),
        None => Ok(()),
    }
}

/// Trait for types that can validate themselves
pub trait Validator {
    /// Validates the instance and returns errors if invalid
    fn validate(&self) -> Result<(), Vec<String>>;

    /// Returns true if the instance is valid
    fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }
}
