//! In-memory storage for tests and dry runs

use crate::persistence::{CatalogPersistence, CatalogSnapshot};
use libris_core::{Book, CatalogError, Result, User};
use std::cell::{Cell, RefCell};
use std::io;
use std::path::PathBuf;

/// Keeps the last saved records in memory
///
/// Writes can be made to fail on demand, which lets callers exercise their
/// rollback paths without touching the file system.
#[derive(Debug, Default)]
pub struct MemoryStore {
    snapshot: RefCell<CatalogSnapshot>,
    fail_writes: Cell<bool>,
    fail_user_writes: Cell<bool>,
    saves: Cell<usize>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts with the given records already "on disk"
    pub fn with_snapshot(snapshot: CatalogSnapshot) -> Self {
        Self {
            snapshot: RefCell::new(snapshot),
            ..Default::default()
        }
    }

    /// Makes every following save fail (or succeed again)
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.set(fail);
    }

    /// Makes only user saves fail, so a change can land in the books
    /// record and then stall
    pub fn set_fail_user_writes(&self, fail: bool) {
        self.fail_user_writes.set(fail);
    }

    /// Returns a copy of what was last saved
    pub fn snapshot(&self) -> CatalogSnapshot {
        self.snapshot.borrow().clone()
    }

    /// Number of successful save calls so far
    pub fn save_count(&self) -> usize {
        self.saves.get()
    }

    fn check_writable(&self, what: &str) -> Result<()> {
        if self.fail_writes.get() || (what == "users" && self.fail_user_writes.get()) {
            return Err(CatalogError::io(
                PathBuf::from(format!("memory://{}", what)),
                io::Error::new(io::ErrorKind::Other, "write failure injected"),
            ));
        }
        self.saves.set(self.saves.get() + 1);
        Ok(())
    }
}

impl CatalogPersistence for MemoryStore {
    fn load_all(&self) -> Result<CatalogSnapshot> {
        Ok(self.snapshot())
    }

    fn save_books(&self, books: &[&Book]) -> Result<()> {
        self.check_writable("books")?;
        self.snapshot.borrow_mut().books = books.iter().map(|b| (*b).clone()).collect();
        Ok(())
    }

    fn save_users(&self, users: &[&User]) -> Result<()> {
        self.check_writable("users")?;
        self.snapshot.borrow_mut().users = users.iter().map(|u| (*u).clone()).collect();
        Ok(())
    }
}
