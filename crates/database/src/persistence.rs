//! Persistence adapter interface
//!
//! The catalog is always loaded and saved whole. There are no partial or
//! append writes: every save replaces the previous contents of the
//! corresponding file.

use libris_core::{Book, Result, User};

/// Everything a catalog persists
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogSnapshot {
    pub books: Vec<Book>,
    pub users: Vec<User>,
}

impl CatalogSnapshot {
    pub fn new(books: Vec<Book>, users: Vec<User>) -> Self {
        Self { books, users }
    }

    /// Returns true if there are no records at all
    pub fn is_empty(&self) -> bool {
        self.books.is_empty() && self.users.is_empty()
    }
}

/// Load-all / save-all storage for catalog records
pub trait CatalogPersistence {
    /// Reads every stored book and user
    ///
    /// Missing storage is an empty catalog, not an error.
    fn load_all(&self) -> Result<CatalogSnapshot>;

    /// Replaces the stored book records
    fn save_books(&self, books: &[&Book]) -> Result<()>;

    /// Replaces the stored user records
    fn save_users(&self, users: &[&User]) -> Result<()>;

    /// Rewrites the book records after a failed save, leaving backups alone
    fn restore_books(&self, books: &[&Book]) -> Result<()> {
        self.save_books(books)
    }
}

impl<P: CatalogPersistence + ?Sized> CatalogPersistence for &P {
    fn load_all(&self) -> Result<CatalogSnapshot> {
        (**self).load_all()
    }

    fn save_books(&self, books: &[&Book]) -> Result<()> {
        (**self).save_books(books)
    }

    fn save_users(&self, users: &[&User]) -> Result<()> {
        (**self).save_users(users)
    }

    fn restore_books(&self, books: &[&Book]) -> Result<()> {
        (**self).restore_books(books)
    }
}

impl<P: CatalogPersistence + ?Sized> CatalogPersistence for Box<P> {
    fn load_all(&self) -> Result<CatalogSnapshot> {
        (**self).load_all()
    }

    fn save_books(&self, books: &[&Book]) -> Result<()> {
        (**self).save_books(books)
    }

    fn save_users(&self, users: &[&User]) -> Result<()> {
        (**self).save_users(users)
    }

    fn restore_books(&self, books: &[&Book]) -> Result<()> {
        (**self).restore_books(books)
    }
}
