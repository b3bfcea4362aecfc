//! Flat-file storage
//!
//! Books and users live in two text files inside one data directory. Every
//! save writes a temporary file next to the target and renames it over the
//! old one, so a file is either the previous version or the new one, never a
//! partial write.

use crate::codec::{decode_books, decode_users, encode_books, encode_users};
use crate::persistence::{CatalogPersistence, CatalogSnapshot};
use libris_core::{Book, CatalogError, Result, User};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Where and how the record files are written
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlatFileConfig {
    /// Directory holding both record files
    pub data_dir: PathBuf,
    /// File name of the books file
    pub books_file: String,
    /// File name of the users file
    pub users_file: String,
    /// Copy the previous file to `<name>.bak` before overwriting it
    pub backup_on_save: bool,
}

impl Default for FlatFileConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("."),
            books_file: "books.txt".to_string(),
            users_file: "users.txt".to_string(),
            backup_on_save: false,
        }
    }
}

impl FlatFileConfig {
    /// Creates a configuration storing files in `data_dir`
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            ..Default::default()
        }
    }

    /// Sets the books and users file names
    pub fn with_file_names(
        mut self,
        books_file: impl Into<String>,
        users_file: impl Into<String>,
    ) -> Self {
        self.books_file = books_file.into();
        self.users_file = users_file.into();
        self
    }

    /// Enables or disables `.bak` copies
    pub fn with_backup(mut self, enable: bool) -> Self {
        self.backup_on_save = enable;
        self
    }

    /// Full path of the books file
    pub fn books_path(&self) -> PathBuf {
        self.data_dir.join(&self.books_file)
    }

    /// Full path of the users file
    pub fn users_path(&self) -> PathBuf {
        self.data_dir.join(&self.users_file)
    }
}

/// Persistence adapter backed by two delimiter-separated text files
#[derive(Debug, Clone)]
pub struct FlatFileStore {
    config: FlatFileConfig,
}

impl FlatFileStore {
    pub fn new(config: FlatFileConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &FlatFileConfig {
        &self.config
    }

    /// Reads a file, treating a missing file as empty
    fn read_or_empty(path: &Path) -> Result<String> {
        match fs::read_to_string(path) {
            Ok(contents) => Ok(contents),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                log::debug!("{} does not exist yet, starting empty", path.display());
                Ok(String::new())
            }
            Err(e) => Err(CatalogError::io(path, e)),
        }
    }

    /// Ensures a directory exists, creating it if necessary
    fn ensure_directory_exists(path: &Path) -> Result<()> {
        if !path.exists() {
            fs::create_dir_all(path).map_err(|e| CatalogError::io(path, e))?;
            log::info!("Created data directory: {}", path.display());
        }
        Ok(())
    }

    /// Copies the current file to `<name>.bak`
    fn backup(path: &Path) -> Result<()> {
        let mut backup_name = path.as_os_str().to_owned();
        backup_name.push(".bak");
        let backup_path = PathBuf::from(backup_name);

        fs::copy(path, &backup_path).map_err(|e| CatalogError::io(&backup_path, e))?;
        log::debug!("Backed up {} to {}", path.display(), backup_path.display());
        Ok(())
    }

    /// Refuses a layout where both record kinds share one file
    fn check_distinct_files(&self) -> Result<()> {
        if self.config.books_path() == self.config.users_path() {
            return Err(CatalogError::InvalidArgument {
                argument: "users file".to_string(),
                reason: format!(
                    "must differ from the books file '{}'",
                    self.config.books_file
                ),
            });
        }
        Ok(())
    }

    /// Writes content to a temporary file and atomically renames it
    fn write_atomic(&self, path: &Path, content: &str, backup: bool) -> Result<()> {
        self.check_distinct_files()?;
        let dir = path.parent().unwrap_or_else(|| Path::new("."));
        Self::ensure_directory_exists(dir)?;

        if backup && self.config.backup_on_save && path.exists() {
            Self::backup(path)?;
        }

        let mut temp_file = NamedTempFile::new_in(dir).map_err(|e| CatalogError::io(dir, e))?;
        temp_file
            .write_all(content.as_bytes())
            .map_err(|e| CatalogError::io(path, e))?;
        temp_file.flush().map_err(|e| CatalogError::io(path, e))?;
        temp_file
            .persist(path)
            .map_err(|e| CatalogError::io(path, e.error))?;

        log::debug!("Wrote {} bytes to {}", content.len(), path.display());
        Ok(())
    }
}

impl CatalogPersistence for FlatFileStore {
    fn load_all(&self) -> Result<CatalogSnapshot> {
        self.check_distinct_files()?;
        let books_path = self.config.books_path();
        let users_path = self.config.users_path();

        let books = decode_books(&Self::read_or_empty(&books_path)?, &self.config.books_file)?;
        let users = decode_users(&Self::read_or_empty(&users_path)?, &self.config.users_file)?;

        log::debug!(
            "Loaded {} book(s) from {} and {} user(s) from {}",
            books.len(),
            books_path.display(),
            users.len(),
            users_path.display()
        );
        Ok(CatalogSnapshot::new(books, users))
    }

    fn save_books(&self, books: &[&Book]) -> Result<()> {
        self.write_atomic(
            &self.config.books_path(),
            &encode_books(books.iter().copied()),
            true,
        )
    }

    fn save_users(&self, users: &[&User]) -> Result<()> {
        self.write_atomic(
            &self.config.users_path(),
            &encode_users(users.iter().copied()),
            true,
        )
    }

    fn restore_books(&self, books: &[&Book]) -> Result<()> {
        log::debug!("Restoring {}", self.config.books_path().display());
        self.write_atomic(
            &self.config.books_path(),
            &encode_books(books.iter().copied()),
            false,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use libris_core::Category;
    use tempfile::TempDir;

    fn setup_store() -> (TempDir, FlatFileStore) {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let store = FlatFileStore::new(FlatFileConfig::new(temp_dir.path()));
        (temp_dir, store)
    }

    #[test]
    fn test_config_builder() {
        let config = FlatFileConfig::new("/data")
            .with_file_names("b.txt", "u.txt")
            .with_backup(true);

        assert_eq!(config.books_path(), PathBuf::from("/data/b.txt"));
        assert_eq!(config.users_path(), PathBuf::from("/data/u.txt"));
        assert!(config.backup_on_save);
    }

    #[test]
    fn test_config_default() {
        let config = FlatFileConfig::default();
        assert_eq!(config.books_file, "books.txt");
        assert_eq!(config.users_file, "users.txt");
        assert!(!config.backup_on_save);
    }

    #[test]
    fn test_load_missing_files_is_empty() {
        let (_temp_dir, store) = setup_store();
        let snapshot = store.load_all().unwrap();
        assert!(snapshot.is_empty());
    }

    #[test]
    fn test_save_then_load() {
        let (_temp_dir, store) = setup_store();

        let mut book = Book::new("ISBN1", "Dune", "Herbert", Category::Literature, 2);
        book.issued_to.push("alice".to_string());
        let mut user = User::new("alice");
        user.borrowed_books.push("ISBN1".to_string());

        store.save_books(&[&book]).unwrap();
        store.save_users(&[&user]).unwrap();

        let snapshot = store.load_all().unwrap();
        assert_eq!(snapshot.books, vec![book]);
        assert_eq!(snapshot.users, vec![user]);
    }

    #[test]
    fn test_save_writes_original_layout() {
        let (_temp_dir, store) = setup_store();
        let book = Book::new("ISBN1", "Dune", "Herbert", Category::Literature, 2);
        store.save_books(&[&book]).unwrap();

        let contents = fs::read_to_string(store.config().books_path()).unwrap();
        assert_eq!(contents, "ISBN1|Dune|Herbert|3|2|\n");
    }

    #[test]
    fn test_save_replaces_whole_file() {
        let (_temp_dir, store) = setup_store();
        let a = Book::new("A", "a", "a", Category::Others, 1);
        let b = Book::new("B", "b", "b", Category::Others, 1);

        store.save_books(&[&a, &b]).unwrap();
        store.save_books(&[&b]).unwrap();

        let snapshot = store.load_all().unwrap();
        assert_eq!(snapshot.books, vec![b]);
    }

    #[test]
    fn test_save_creates_directory() {
        let temp_dir = TempDir::new().unwrap();
        let data_dir = temp_dir.path().join("nested").join("data");
        let store = FlatFileStore::new(FlatFileConfig::new(&data_dir));

        store.save_users(&[&User::new("alice")]).unwrap();
        assert!(data_dir.join("users.txt").exists());
    }

    #[test]
    fn test_backup_created_on_overwrite() {
        let temp_dir = TempDir::new().unwrap();
        let store = FlatFileStore::new(FlatFileConfig::new(temp_dir.path()).with_backup(true));
        let first = Book::new("A", "a", "a", Category::Others, 1);
        let second = Book::new("B", "b", "b", Category::Others, 1);

        store.save_books(&[&first]).unwrap();
        store.save_books(&[&second]).unwrap();

        let backup = fs::read_to_string(temp_dir.path().join("books.txt.bak")).unwrap();
        assert_eq!(backup, "A|a|a|4|1|\n");
    }

    #[test]
    fn test_restore_leaves_backup_alone() {
        let temp_dir = TempDir::new().unwrap();
        let store = FlatFileStore::new(FlatFileConfig::new(temp_dir.path()).with_backup(true));
        let committed = Book::new("A", "a", "a", Category::Others, 1);
        let discarded = Book::new("B", "b", "b", Category::Others, 1);

        store.save_books(&[&committed]).unwrap();
        store.save_books(&[&committed]).unwrap();
        store.save_books(&[&discarded]).unwrap();
        store.restore_books(&[&committed]).unwrap();

        let backup = fs::read_to_string(temp_dir.path().join("books.txt.bak")).unwrap();
        let current = fs::read_to_string(temp_dir.path().join("books.txt")).unwrap();
        assert_eq!(backup, "A|a|a|4|1|\n");
        assert_eq!(current, "A|a|a|4|1|\n");
    }

    #[test]
    fn test_shared_record_file_is_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let store = FlatFileStore::new(
            FlatFileConfig::new(temp_dir.path()).with_file_names("catalog.txt", "catalog.txt"),
        );
        let book = Book::new("ISBN1", "Dune", "Herbert", Category::Literature, 1);

        assert!(matches!(
            store.load_all(),
            Err(CatalogError::InvalidArgument { .. })
        ));
        assert!(matches!(
            store.save_books(&[&book]),
            Err(CatalogError::InvalidArgument { .. })
        ));
        assert!(!temp_dir.path().join("catalog.txt").exists());
    }

    #[test]
    fn test_corrupted_file_is_reported() {
        let (_temp_dir, store) = setup_store();
        fs::write(store.config().books_path(), "only|three|fields\n").unwrap();

        let err = store.load_all().unwrap_err();
        assert!(matches!(err, CatalogError::CorruptedData { line: 1, .. }));
    }

    #[test]
    fn test_write_failure_is_io_error() {
        let temp_dir = TempDir::new().unwrap();
        // A regular file where the data directory should be
        let blocker = temp_dir.path().join("blocker");
        fs::write(&blocker, "").unwrap();
        let store = FlatFileStore::new(FlatFileConfig::new(blocker.join("data")));

        let err = store.save_users(&[&User::new("alice")]).unwrap_err();
        assert!(matches!(err, CatalogError::Io { .. }));
    }
}
