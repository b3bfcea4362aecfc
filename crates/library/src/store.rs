//! In-memory record store
//!
//! Books are keyed by identifier and users by name. The issue relation is
//! stored on both sides (`Book::issued_to` and `User::borrowed_books`) and is
//! only ever written by the methods in this module, which keep the two sides
//! in agreement.

use crate::query::{BookFilter, SearchQuery};
use libris_core::{
    validate_key, validate_text, Book, CatalogError, CatalogStats, Category, Result, User,
    Validator,
};
use std::collections::BTreeMap;

/// Books and users held in memory
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordStore {
    books: BTreeMap<String, Book>,
    users: BTreeMap<String, User>,
}

impl RecordStore {
    /// Creates an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuilds a store from loaded records
    ///
    /// Records that are broken on their own or that repeat a key are reported
    /// as `CorruptedData` with their 1-based position in the input. Records
    /// that disagree with each other are reported as `InvariantViolation`.
    pub fn from_records(books: Vec<Book>, users: Vec<User>) -> Result<Self> {
        let mut store = Self::new();

        for (index, book) in books.into_iter().enumerate() {
            if let Err(errors) = book.validate() {
                return Err(corrupted("books", index, errors.join("; ")));
            }
            if store.books.contains_key(&book.identifier) {
                return Err(corrupted(
                    "books",
                    index,
                    format!("duplicate identifier '{}'", book.identifier),
                ));
            }
            store.books.insert(book.identifier.clone(), book);
        }

        for (index, user) in users.into_iter().enumerate() {
            if let Err(errors) = user.validate() {
                return Err(corrupted("users", index, errors.join("; ")));
            }
            if store.users.contains_key(&user.name) {
                return Err(corrupted(
                    "users",
                    index,
                    format!("duplicate user '{}'", user.name),
                ));
            }
            store.users.insert(user.name.clone(), user);
        }

        store.check_invariants()?;
        Ok(store)
    }

    pub fn book(&self, identifier: &str) -> Option<&Book> {
        self.books.get(identifier)
    }

    pub fn user(&self, name: &str) -> Option<&User> {
        self.users.get(name)
    }

    /// All books in identifier order
    pub fn books(&self) -> impl Iterator<Item = &Book> {
        self.books.values()
    }

    /// All users in name order
    pub fn users(&self) -> impl Iterator<Item = &User> {
        self.users.values()
    }

    pub fn book_count(&self) -> usize {
        self.books.len()
    }

    pub fn user_count(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.books.is_empty() && self.users.is_empty()
    }

    /// Adds copies of a book, creating the record on first use
    ///
    /// For an existing identifier only the quantity changes; the stored
    /// title, author and category are kept.
    pub fn add_book(
        &mut self,
        title: &str,
        author: &str,
        identifier: &str,
        category: Category,
        quantity: u32,
    ) -> Result<Book> {
        validate_key(identifier, "identifier")?;
        validate_text(title, "title")?;
        validate_text(author, "author")?;

        if let Some(book) = self.books.get_mut(identifier) {
            let total = book.quantity.checked_add(quantity).ok_or_else(|| {
                CatalogError::InvalidArgument {
                    argument: "quantity".to_string(),
                    reason: format!(
                        "{} more copies would exceed the maximum of {}",
                        quantity,
                        u32::MAX
                    ),
                }
            })?;
            book.quantity = total;
            log::debug!(
                "Added {} copies of {}, now {}",
                quantity,
                identifier,
                book.quantity
            );
            return Ok(book.clone());
        }

        let book = Book::new(identifier, title, author, category, quantity);
        self.books.insert(identifier.to_string(), book.clone());
        log::debug!("Catalogued new book {}", identifier);
        Ok(book)
    }

    /// Issues one copy of a book to a user
    ///
    /// The user record is created on the first successful issue. A failed
    /// issue leaves the store untouched.
    pub fn issue_book(&mut self, identifier: &str, user_name: &str) -> Result<()> {
        let book = self
            .books
            .get(identifier)
            .ok_or_else(|| book_not_found(identifier))?;
        validate_key(user_name, "user")?;

        if !book.has_available_copy() {
            return Err(CatalogError::NoCopiesAvailable {
                identifier: identifier.to_string(),
                quantity: book.quantity,
            });
        }

        let user_holds = self
            .users
            .get(user_name)
            .is_some_and(|user| user.has_borrowed(identifier));
        if user_holds {
            return Err(CatalogError::AlreadyIssued {
                identifier: identifier.to_string(),
                user: user_name.to_string(),
            });
        }
        if book.is_issued_to(user_name) {
            return Err(CatalogError::InvariantViolation {
                details: format!(
                    "{} lists {} as a borrower but the user record does not",
                    identifier, user_name
                ),
            });
        }

        if let Some(book) = self.books.get_mut(identifier) {
            book.issued_to.push(user_name.to_string());
        }
        self.users
            .entry(user_name.to_string())
            .or_insert_with(|| User::new(user_name))
            .borrowed_books
            .push(identifier.to_string());

        Ok(())
    }

    /// Takes back a copy previously issued to a user
    ///
    /// Both sides of the issue relation are checked before anything changes.
    pub fn return_book(&mut self, identifier: &str, user_name: &str) -> Result<()> {
        let book = self
            .books
            .get(identifier)
            .ok_or_else(|| book_not_found(identifier))?;
        let user = self
            .users
            .get(user_name)
            .ok_or_else(|| CatalogError::UserNotFound {
                name: user_name.to_string(),
            })?;

        match (user.has_borrowed(identifier), book.is_issued_to(user_name)) {
            (true, true) => {}
            (false, false) => {
                return Err(CatalogError::NotBorrowed {
                    identifier: identifier.to_string(),
                    user: user_name.to_string(),
                })
            }
            (true, false) => {
                return Err(CatalogError::InvariantViolation {
                    details: format!(
                        "{} holds {} but the book does not list them",
                        user_name, identifier
                    ),
                })
            }
            (false, true) => {
                return Err(CatalogError::InvariantViolation {
                    details: format!(
                        "{} lists {} as a borrower but the user record does not",
                        identifier, user_name
                    ),
                })
            }
        }

        if let Some(book) = self.books.get_mut(identifier) {
            book.issued_to.retain(|name| name != user_name);
        }
        if let Some(user) = self.users.get_mut(user_name) {
            user.borrowed_books.retain(|id| id != identifier);
        }

        Ok(())
    }

    /// Books whose title, author or identifier contain `query`
    pub fn find_books(&self, query: &SearchQuery) -> Vec<&Book> {
        self.books.values().filter(|b| query.matches(b)).collect()
    }

    /// Books selected by `filter`, in identifier order
    pub fn list_books(&self, filter: BookFilter) -> Vec<&Book> {
        self.books.values().filter(|b| filter.matches(b)).collect()
    }

    /// The books a user currently holds, in borrow order
    pub fn list_user_books(&self, user_name: &str) -> Result<Vec<&Book>> {
        let user = self
            .users
            .get(user_name)
            .ok_or_else(|| CatalogError::UserNotFound {
                name: user_name.to_string(),
            })?;

        user.borrowed_books
            .iter()
            .map(|id| {
                self.books
                    .get(id)
                    .ok_or_else(|| CatalogError::InvariantViolation {
                        details: format!("{} holds unknown book {}", user_name, id),
                    })
            })
            .collect()
    }

    pub fn stats(&self) -> CatalogStats {
        let total_copies: u64 = self.books.values().map(|b| u64::from(b.quantity)).sum();
        let issued_copies: u64 = self
            .books
            .values()
            .map(|b| b.issued_to.len() as u64)
            .sum();
        let available_copies: u64 = self.books.values().map(|b| u64::from(b.available())).sum();

        CatalogStats {
            titles: self.books.len(),
            total_copies,
            issued_copies,
            available_copies,
            users: self.users.len(),
            active_borrowers: self
                .users
                .values()
                .filter(|u| !u.borrowed_books.is_empty())
                .count(),
        }
    }

    /// Verifies capacity and that both sides of the issue relation agree
    pub fn check_invariants(&self) -> Result<()> {
        for book in self.books.values() {
            if book.issued_to.len() > book.quantity as usize {
                return Err(violation(format!(
                    "{} has {} copies issued but only {} owned",
                    book.identifier,
                    book.issued_to.len(),
                    book.quantity
                )));
            }

            for name in &book.issued_to {
                let holds = self
                    .users
                    .get(name)
                    .is_some_and(|u| u.has_borrowed(&book.identifier));
                if !holds {
                    return Err(violation(format!(
                        "{} lists {} as a borrower but the user record does not",
                        book.identifier, name
                    )));
                }
            }
        }

        for user in self.users.values() {
            for id in &user.borrowed_books {
                let listed = self
                    .books
                    .get(id)
                    .is_some_and(|b| b.is_issued_to(&user.name));
                if !listed {
                    return Err(violation(format!(
                        "{} holds {} but the book does not list them",
                        user.name, id
                    )));
                }
            }
        }

        Ok(())
    }
}

fn book_not_found(identifier: &str) -> CatalogError {
    CatalogError::BookNotFound {
        identifier: identifier.to_string(),
    }
}

fn corrupted(file: &str, index: usize, reason: String) -> CatalogError {
    CatalogError::CorruptedData {
        file: file.to_string(),
        line: index + 1,
        reason,
    }
}

fn violation(details: String) -> CatalogError {
    CatalogError::InvariantViolation { details }
}
