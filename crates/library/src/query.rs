//! Listing filters and free-text search

use libris_core::{Book, Category};

/// Which books a listing should include
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BookFilter {
    #[default]
    All,
    Category(Category),
}

impl BookFilter {
    pub fn matches(&self, book: &Book) -> bool {
        match self {
            BookFilter::All => true,
            BookFilter::Category(category) => book.category == *category,
        }
    }
}

impl From<Option<Category>> for BookFilter {
    fn from(category: Option<Category>) -> Self {
        category.map_or(BookFilter::All, BookFilter::Category)
    }
}

/// A prepared free-text query
///
/// Title and author are matched case-insensitively, the identifier exactly
/// as typed. An empty query matches every book.
#[derive(Debug, Clone)]
pub struct SearchQuery {
    raw: String,
    folded: String,
}

impl SearchQuery {
    pub fn new(text: impl Into<String>) -> Self {
        let raw = text.into();
        let folded = raw.to_lowercase();
        Self { raw, folded }
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn matches(&self, book: &Book) -> bool {
        book.title.to_lowercase().contains(&self.folded)
            || book.author.to_lowercase().contains(&self.folded)
            || book.identifier.contains(&self.raw)
    }
}

impl From<&str> for SearchQuery {
    fn from(text: &str) -> Self {
        Self::new(text)
    }
}
