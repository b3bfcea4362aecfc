//! Interactive numbered menu
//!
//! Reads answers line by line so it can be driven by stdin or by a test
//! buffer. End of input behaves like choosing Exit.

use crate::commands::{listing, search_results};
use crate::render;
use anyhow::Result;
use libris_core::{CatalogError, Category};
use libris_database::CatalogPersistence;
use libris_library::LibraryManager;
use std::io::{BufRead, Write};

const MENU: &str = "\nLibrary Management System\n\
=========================\n\
1. Add Book\n\
2. Display All Books\n\
3. Display Books by Category\n\
4. Search Books\n\
5. Issue Book\n\
6. Return Book\n\
7. Display User's Books\n\
8. Exit\n";

pub struct Menu<'a, P: CatalogPersistence, R, W> {
    manager: &'a mut LibraryManager<P>,
    input: R,
    output: W,
    default_quantity: u32,
}

impl<'a, P, R, W> Menu<'a, P, R, W>
where
    P: CatalogPersistence,
    R: BufRead,
    W: Write,
{
    pub fn new(manager: &'a mut LibraryManager<P>, input: R, output: W) -> Self {
        Self {
            manager,
            input,
            output,
            default_quantity: 1,
        }
    }

    /// Quantity used when the quantity prompt is left blank
    pub fn with_default_quantity(mut self, quantity: u32) -> Self {
        self.default_quantity = quantity;
        self
    }

    /// Runs until Exit is chosen or input ends
    pub fn run(mut self) -> Result<()> {
        loop {
            write!(self.output, "{}", MENU)?;
            let Some(choice) = self.prompt("Enter your choice: ")? else {
                break;
            };

            let keep_going = match choice.trim() {
                "1" => self.add_book()?,
                "2" => {
                    let text = listing(self.manager, None);
                    writeln!(self.output, "{}", text)?;
                    true
                }
                "3" => self.list_by_category()?,
                "4" => self.search()?,
                "5" => self.issue_or_return(true)?,
                "6" => self.issue_or_return(false)?,
                "7" => self.user_books()?,
                "8" => break,
                _ => {
                    writeln!(self.output, "Invalid choice! Please try again.")?;
                    true
                }
            };

            if !keep_going {
                return Ok(());
            }
        }

        writeln!(
            self.output,
            "Thank you for using the Library Management System!"
        )?;
        Ok(())
    }

    /// Prints `label` and reads one line; `None` at end of input
    fn prompt(&mut self, label: &str) -> Result<Option<String>> {
        write!(self.output, "{}", label)?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(['\n', '\r']).to_string()))
    }

    fn prompt_category(&mut self) -> Result<Option<Category>> {
        let label = format!("Enter category ({}): ", Category::prompt_listing());
        let Some(answer) = self.prompt(&label)? else {
            return Ok(None);
        };

        match answer.parse::<Category>() {
            Ok(category) => Ok(Some(category)),
            Err(e) => {
                self.report(&e)?;
                Ok(None)
            }
        }
    }

    fn add_book(&mut self) -> Result<bool> {
        let Some(title) = self.prompt("Enter book name: ")? else {
            return Ok(false);
        };
        let Some(author) = self.prompt("Enter author name: ")? else {
            return Ok(false);
        };
        let Some(isbn) = self.prompt("Enter ISBN: ")? else {
            return Ok(false);
        };
        let Some(category) = self.prompt_category()? else {
            return Ok(true);
        };
        let Some(quantity) = self.prompt("Enter quantity: ")? else {
            return Ok(false);
        };

        let quantity = match quantity.trim() {
            "" => self.default_quantity,
            text => match text.parse::<u32>() {
                Ok(q) => q,
                Err(_) => {
                    writeln!(self.output, "Invalid quantity '{}'.", text)?;
                    return Ok(true);
                }
            },
        };

        match self
            .manager
            .add_book(title.trim(), author.trim(), isbn.trim(), category, quantity)
        {
            Ok(_) => writeln!(self.output, "Book added successfully!")?,
            Err(e) => self.report(&e)?,
        }
        Ok(true)
    }

    fn list_by_category(&mut self) -> Result<bool> {
        if let Some(category) = self.prompt_category()? {
            let text = listing(self.manager, Some(category));
            writeln!(self.output, "{}", text)?;
        }
        Ok(true)
    }

    fn search(&mut self) -> Result<bool> {
        let Some(query) = self.prompt("Enter search term: ")? else {
            return Ok(false);
        };
        let text = search_results(self.manager, query.trim());
        writeln!(self.output, "{}", text)?;
        Ok(true)
    }

    fn issue_or_return(&mut self, issue: bool) -> Result<bool> {
        let Some(isbn) = self.prompt("Enter ISBN: ")? else {
            return Ok(false);
        };
        let Some(user) = self.prompt("Enter user name: ")? else {
            return Ok(false);
        };
        let (isbn, user) = (isbn.trim(), user.trim());

        let (result, done) = if issue {
            (self.manager.issue_book(isbn, user), "Book issued successfully!")
        } else {
            (self.manager.return_book(isbn, user), "Book returned successfully!")
        };

        match result {
            Ok(()) => writeln!(self.output, "{}", done)?,
            Err(e) => self.report(&e)?,
        }
        Ok(true)
    }

    fn user_books(&mut self) -> Result<bool> {
        let Some(user) = self.prompt("Enter user name: ")? else {
            return Ok(false);
        };
        let user = user.trim();

        let text = match self.manager.list_user_books(user) {
            Ok(books) => render::user_books(user, &books),
            Err(e) => format!("{}\n", e.user_message()),
        };
        write!(self.output, "{}", text)?;
        Ok(true)
    }

    fn report(&mut self, err: &CatalogError) -> Result<()> {
        if err.is_critical() {
            log::error!("{}", err);
        }
        writeln!(self.output, "{}", err.user_message())?;
        Ok(())
    }
}
