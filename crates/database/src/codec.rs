//! Line encoding of catalog records
//!
//! Books are stored one per line as
//! `identifier|title|author|category|quantity|name1,name2,` and users as
//! `name|identifier1,identifier2,`. The category is its ordinal. Lists carry
//! a trailing separator; empty list entries and blank lines are ignored when
//! reading.

use libris_core::{Book, CatalogError, Category, Result, User};

/// Separates the fields of a record
pub const FIELD_DELIMITER: char = '|';

/// Separates the entries of the trailing list field
pub const LIST_SEPARATOR: char = ',';

/// Encodes one book as a single line, without the line break
pub fn encode_book(book: &Book) -> String {
    format!(
        "{id}{d}{title}{d}{author}{d}{category}{d}{quantity}{d}{issued}",
        id = book.identifier,
        title = book.title,
        author = book.author,
        category = book.category.ordinal(),
        quantity = book.quantity,
        issued = encode_list(&book.issued_to),
        d = FIELD_DELIMITER,
    )
}

/// Encodes one user as a single line, without the line break
pub fn encode_user(user: &User) -> String {
    format!(
        "{}{}{}",
        user.name,
        FIELD_DELIMITER,
        encode_list(&user.borrowed_books)
    )
}

/// Encodes every book, one line each
pub fn encode_books<'a>(books: impl IntoIterator<Item = &'a Book>) -> String {
    books
        .into_iter()
        .map(|b| encode_book(b) + "\n")
        .collect()
}

/// Encodes every user, one line each
pub fn encode_users<'a>(users: impl IntoIterator<Item = &'a User>) -> String {
    users
        .into_iter()
        .map(|u| encode_user(u) + "\n")
        .collect()
}

fn encode_list(items: &[String]) -> String {
    items
        .iter()
        .map(|item| format!("{}{}", item, LIST_SEPARATOR))
        .collect()
}

fn decode_list(field: &str) -> Vec<String> {
    field
        .split(LIST_SEPARATOR)
        .filter(|entry| !entry.is_empty())
        .map(str::to_string)
        .collect()
}

/// Decodes a single book line
///
/// The error is a human readable reason; [`decode_books`] attaches the file
/// and line number.
pub fn decode_book(line: &str) -> std::result::Result<Book, String> {
    let fields: Vec<&str> = line.splitn(6, FIELD_DELIMITER).collect();
    let [identifier, title, author, category, quantity, rest @ ..] = fields.as_slice() else {
        return Err(format!(
            "expected at least 5 fields separated by '{}', found {}",
            FIELD_DELIMITER,
            fields.len()
        ));
    };

    if identifier.is_empty() {
        return Err("empty identifier".to_string());
    }

    let ordinal: i64 = category
        .trim()
        .parse()
        .map_err(|_| format!("category '{}' is not a number", category))?;
    let category = Category::from_ordinal(ordinal).map_err(|e| match e {
        CatalogError::InvalidArgument { reason, .. } => format!("category {}", reason),
        other => other.to_string(),
    })?;

    let quantity: u32 = quantity
        .trim()
        .parse()
        .map_err(|_| format!("quantity '{}' is not a non-negative integer", quantity))?;

    let mut book = Book::new(*identifier, *title, *author, category, quantity);
    if let Some(issued) = rest.first() {
        book.issued_to = decode_list(issued);
    }
    Ok(book)
}

/// Decodes a single user line
pub fn decode_user(line: &str) -> std::result::Result<User, String> {
    let (name, borrowed) = match line.split_once(FIELD_DELIMITER) {
        Some((name, borrowed)) => (name, borrowed),
        None => (line, ""),
    };

    if name.is_empty() {
        return Err("empty user name".to_string());
    }

    let mut user = User::new(name);
    user.borrowed_books = decode_list(borrowed);
    Ok(user)
}

/// Decodes the full contents of a books file
pub fn decode_books(contents: &str, file: &str) -> Result<Vec<Book>> {
    decode_lines(contents, file, decode_book)
}

/// Decodes the full contents of a users file
pub fn decode_users(contents: &str, file: &str) -> Result<Vec<User>> {
    decode_lines(contents, file, decode_user)
}

fn decode_lines<T>(
    contents: &str,
    file: &str,
    decode: impl Fn(&str) -> std::result::Result<T, String>,
) -> Result<Vec<T>> {
    contents
        .lines()
        .enumerate()
        .map(|(i, line)| (i + 1, line.trim_end_matches('\r')))
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(line_no, line)| {
            decode(line).map_err(|reason| CatalogError::CorruptedData {
                file: file.to_string(),
                line: line_no,
                reason,
            })
        })
        .collect()
}
