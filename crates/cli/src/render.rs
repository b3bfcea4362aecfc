//! Plain-text rendering of catalog data
//!
//! Everything here returns a `String` so the same output can go to the
//! terminal, the interactive menu or a test buffer.

use libris_core::{Book, CatalogStats};
use std::fmt::Write;

const SEPARATOR_WIDTH: usize = 50;

pub const EMPTY_CATALOG: &str = "No books in library.";

pub fn separator() -> String {
    "-".repeat(SEPARATOR_WIDTH)
}

/// Renders one book as labelled lines
pub fn book_details(book: &Book) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "ISBN: {}", book.identifier);
    let _ = writeln!(out, "Title: {}", book.title);
    let _ = writeln!(out, "Author: {}", book.author);
    let _ = writeln!(out, "Category: {}", book.category);
    let _ = writeln!(out, "Available: {}/{}", book.available(), book.quantity);
    if !book.issued_to.is_empty() {
        let _ = writeln!(out, "Issued to: {}", book.issued_to.join(", "));
    }
    out
}

/// Renders a heading followed by each book between separator lines
pub fn book_list(heading: &str, books: &[&Book]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "\n{}:", heading);
    let _ = writeln!(out, "{}", separator());
    for book in books {
        out.push_str(&book_details(book));
        let _ = writeln!(out, "{}", separator());
    }
    out
}

pub fn no_match(query: &str) -> String {
    format!("No books found matching '{}'", query)
}

pub fn no_books_in_category(category: impl std::fmt::Display) -> String {
    format!("No books in category {}.", category)
}

/// Renders the books a user holds
pub fn user_books(user_name: &str, books: &[&Book]) -> String {
    if books.is_empty() {
        return format!("{} has no borrowed books.\n", user_name);
    }
    book_list(&format!("Books borrowed by {}", user_name), books)
}

pub fn stats(stats: &CatalogStats) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "\nCatalog Statistics:");
    let _ = writeln!(out, "{}", separator());
    let _ = writeln!(out, "Titles: {}", stats.titles);
    let _ = writeln!(out, "Copies: {}", stats.total_copies);
    let _ = writeln!(
        out,
        "Issued: {} ({:.1}%)",
        stats.issued_copies,
        stats.issued_percentage()
    );
    let _ = writeln!(out, "Available: {}", stats.available_copies);
    let _ = writeln!(
        out,
        "Users: {} ({} currently borrowing)",
        stats.users, stats.active_borrowers
    );
    out
}
