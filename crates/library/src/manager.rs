//! High-level catalog management
//!
//! `LibraryManager` owns the record store and writes every successful change
//! through its persistence adapter. When the write fails the in-memory store
//! is put back to where it was before the change.

use crate::query::{BookFilter, SearchQuery};
use crate::store::RecordStore;
use libris_config::{Config, ConfigSection};
use libris_core::{Book, CatalogError, CatalogStats, Category, Result, User};
use libris_database::{CatalogPersistence, FlatFileConfig, FlatFileStore};
use log::{debug, info, warn};
use std::path::PathBuf;

/// Which record files a change touches
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SaveScope {
    Books,
    BooksAndUsers,
}

/// Catalog operations backed by a persistence adapter
pub struct LibraryManager<P: CatalogPersistence> {
    store: RecordStore,
    persistence: P,
}

impl<P: CatalogPersistence> LibraryManager<P> {
    /// Loads the catalog through `persistence`
    pub fn open(persistence: P) -> Result<Self> {
        let snapshot = persistence.load_all()?;
        let store = RecordStore::from_records(snapshot.books, snapshot.users)?;

        info!(
            "Loaded {} books and {} users",
            store.book_count(),
            store.user_count()
        );

        Ok(Self { store, persistence })
    }

    /// Wraps an existing store without loading anything
    pub fn with_store(store: RecordStore, persistence: P) -> Self {
        Self { store, persistence }
    }

    pub fn store(&self) -> &RecordStore {
        &self.store
    }

    pub fn persistence(&self) -> &P {
        &self.persistence
    }

    pub fn add_book(
        &mut self,
        title: &str,
        author: &str,
        identifier: &str,
        category: Category,
        quantity: u32,
    ) -> Result<Book> {
        let book = self.commit(SaveScope::Books, |store| {
            store.add_book(title, author, identifier, category, quantity)
        })?;
        info!(
            "Added {} copies of {} ({} total)",
            quantity, book.identifier, book.quantity
        );
        Ok(book)
    }

    pub fn issue_book(&mut self, identifier: &str, user_name: &str) -> Result<()> {
        self.commit(SaveScope::BooksAndUsers, |store| {
            store.issue_book(identifier, user_name)
        })?;
        info!("Issued {} to {}", identifier, user_name);
        Ok(())
    }

    pub fn return_book(&mut self, identifier: &str, user_name: &str) -> Result<()> {
        self.commit(SaveScope::BooksAndUsers, |store| {
            store.return_book(identifier, user_name)
        })?;
        info!("{} returned {}", user_name, identifier);
        Ok(())
    }

    pub fn book(&self, identifier: &str) -> Option<&Book> {
        self.store.book(identifier)
    }

    pub fn user(&self, name: &str) -> Option<&User> {
        self.store.user(name)
    }

    pub fn find_books(&self, query: &str) -> Vec<&Book> {
        self.store.find_books(&SearchQuery::new(query))
    }

    pub fn list_books(&self, filter: BookFilter) -> Vec<&Book> {
        self.store.list_books(filter)
    }

    pub fn list_user_books(&self, user_name: &str) -> Result<Vec<&Book>> {
        self.store.list_user_books(user_name)
    }

    pub fn stats(&self) -> CatalogStats {
        self.store.stats()
    }

    /// Applies `change` to the store and persists the result
    fn commit<T>(
        &mut self,
        scope: SaveScope,
        change: impl FnOnce(&mut RecordStore) -> Result<T>,
    ) -> Result<T> {
        let snapshot = self.store.clone();
        let value = change(&mut self.store)?;

        if let Err(e) = self.persist(scope) {
            warn!("Save failed, discarding the last change: {}", e);
            self.store = snapshot;
            // The books file may already hold the discarded change
            if scope == SaveScope::BooksAndUsers {
                let books: Vec<&Book> = self.store.books().collect();
                if let Err(restore_err) = self.persistence.restore_books(&books) {
                    warn!("Could not restore the books file: {}", restore_err);
                }
            }
            return Err(e);
        }

        Ok(value)
    }

    fn persist(&self, scope: SaveScope) -> Result<()> {
        let books: Vec<&Book> = self.store.books().collect();
        self.persistence.save_books(&books)?;

        if scope == SaveScope::BooksAndUsers {
            let users: Vec<&User> = self.store.users().collect();
            self.persistence.save_users(&users)?;
        }

        debug!("Persisted {:?}", scope);
        Ok(())
    }
}

impl LibraryManager<FlatFileStore> {
    /// Opens the flat-file catalog described by `config` inside `data_dir`
    ///
    /// Record file settings that fail validation are refused before any
    /// file is touched.
    pub fn open_flat_files(config: &Config, data_dir: impl Into<PathBuf>) -> Result<Self> {
        if let Err(problems) = config.library.validate() {
            if let Some(problem) = problems.into_iter().next() {
                return Err(CatalogError::InvalidArgument {
                    argument: problem.field,
                    reason: problem.message,
                });
            }
        }
        Self::open(FlatFileStore::new(flat_file_config(config, data_dir)))
    }
}

/// Builds the storage settings for a data directory from the app config
pub fn flat_file_config(config: &Config, data_dir: impl Into<PathBuf>) -> FlatFileConfig {
    FlatFileConfig::new(data_dir)
        .with_file_names(&config.library.books_file, &config.library.users_file)
        .with_backup(config.library.backup_on_save)
}

#[cfg(test)]
mod tests {
    use super::*;
    use libris_core::ErrorKind;
    use libris_database::{CatalogSnapshot, MemoryStore};

    fn manager() -> LibraryManager<MemoryStore> {
        LibraryManager::open(MemoryStore::new()).unwrap()
    }

    #[test]
    fn test_open_empty() {
        let manager = manager();
        assert!(manager.store().is_empty());
    }

    #[test]
    fn test_add_saves_books_only() {
        let mut manager = manager();
        manager
            .add_book("SICP", "Abelson", "ISBN2", Category::ComputerScience, 1)
            .unwrap();

        assert_eq!(manager.persistence().save_count(), 1);
        assert_eq!(manager.persistence().snapshot().books.len(), 1);
    }

    #[test]
    fn test_issue_saves_both_files() {
        let mut manager = manager();
        manager
            .add_book("SICP", "Abelson", "ISBN2", Category::ComputerScience, 1)
            .unwrap();
        manager.issue_book("ISBN2", "alice").unwrap();

        let saved = manager.persistence().snapshot();
        assert_eq!(saved.books[0].issued_to, vec!["alice".to_string()]);
        assert_eq!(saved.users[0].borrowed_books, vec!["ISBN2".to_string()]);
    }

    #[test]
    fn test_failed_save_rolls_back() {
        let mut manager = manager();
        manager
            .add_book("SICP", "Abelson", "ISBN2", Category::ComputerScience, 1)
            .unwrap();
        let before = manager.store().clone();

        manager.persistence().set_fail_writes(true);
        let err = manager.issue_book("ISBN2", "alice").unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Io);
        assert_eq!(manager.store(), &before);
    }

    #[test]
    fn test_failed_user_save_restores_books() {
        let mut manager = manager();
        manager
            .add_book("SICP", "Abelson", "ISBN2", Category::ComputerScience, 1)
            .unwrap();
        let books_before = manager.persistence().snapshot().books;

        manager.persistence().set_fail_user_writes(true);
        let err = manager.issue_book("ISBN2", "alice").unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Io);
        // add, the stalled issue, then the restore
        assert_eq!(manager.persistence().save_count(), 3);
        assert_eq!(manager.persistence().snapshot().books, books_before);
        assert!(manager.persistence().snapshot().users.is_empty());
        assert!(manager.user("alice").is_none());
    }

    #[test]
    fn test_failed_operation_skips_save() {
        let mut manager = manager();
        let err = manager.issue_book("ISBN9", "alice").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert_eq!(manager.persistence().save_count(), 0);
    }

    #[test]
    fn test_open_rejects_inconsistent_records() {
        let mut user = User::new("alice");
        user.borrowed_books.push("ISBN1".to_string());
        let persistence = MemoryStore::with_snapshot(CatalogSnapshot::new(vec![], vec![user]));

        let err = LibraryManager::open(persistence).err().unwrap();
        assert_eq!(err.kind(), ErrorKind::InvariantViolation);
    }

    #[test]
    fn test_flat_file_config_from_app_config() {
        let mut config = Config::default();
        config.library.books_file = "catalog.txt".to_string();
        config.library.backup_on_save = true;

        let storage = flat_file_config(&config, "/tmp/libris");
        assert!(storage.books_path().ends_with("catalog.txt"));
        assert!(storage.users_path().ends_with("users.txt"));
        assert!(storage.backup_on_save);
    }
}
