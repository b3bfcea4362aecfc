//! Catalog statistics

use serde::{Deserialize, Serialize};

/// Catalog-wide counts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogStats {
    /// Number of distinct identifiers
    pub titles: usize,
    pub total_copies: u64,
    pub issued_copies: u64,
    pub available_copies: u64,
    /// Number of user records, including users with nothing borrowed
    pub users: usize,
    /// Users currently holding at least one book
    pub active_borrowers: usize,
}

impl CatalogStats {
    /// Creates empty statistics
    pub fn empty() -> Self {
        Self {
            titles: 0,
            total_copies: 0,
            issued_copies: 0,
            available_copies: 0,
            users: 0,
            active_borrowers: 0,
        }
    }

    /// Returns the percentage of copies currently on loan
    pub fn issued_percentage(&self) -> f64 {
        if self.total_copies == 0 {
            return 0.0;
        }
        (self.issued_copies as f64 / self.total_copies as f64) * 100.0
    }

    /// Returns the average number of copies per title
    pub fn average_copies_per_title(&self) -> f64 {
        if self.titles == 0 {
            return 0.0;
        }
        self.total_copies as f64 / self.titles as f64
    }
}

impl Default for CatalogStats {
    fn default() -> Self {
        Self::empty()
    }
}
