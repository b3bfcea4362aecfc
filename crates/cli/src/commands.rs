use crate::render;
use anyhow::{Context, Result};
use clap::ArgMatches;
use console::style;
use libris_config::ConfigManager;
use libris_core::{Book, Category, User};
use libris_database::CatalogPersistence;
use libris_library::{BookFilter, LibraryManager};
use serde::Serialize;
use std::path::PathBuf;

/// Add copies of a book to the catalog
pub fn add_book<P: CatalogPersistence>(
    manager: &mut LibraryManager<P>,
    matches: &ArgMatches,
    default_quantity: u32,
) -> Result<()> {
    let title = required(matches, "title")?;
    let author = required(matches, "author")?;
    let isbn = required(matches, "isbn")?;
    let category = parse_category(required(matches, "category")?)?;
    let quantity = matches
        .get_one::<u32>("quantity")
        .copied()
        .unwrap_or(default_quantity);

    let book = manager.add_book(title, author, isbn, category, quantity)?;

    println!("{} Book added successfully!", style("✓").green().bold());
    print!("{}", render::book_details(&book));
    Ok(())
}

/// List the catalog, optionally restricted to one category
pub fn list_books<P: CatalogPersistence>(
    manager: &LibraryManager<P>,
    matches: &ArgMatches,
) -> Result<()> {
    let category = matches
        .get_one::<String>("category")
        .map(|c| parse_category(c))
        .transpose()?;

    println!("{}", listing(manager, category));
    Ok(())
}

/// Search titles, authors and identifiers
pub fn search_books<P: CatalogPersistence>(
    manager: &LibraryManager<P>,
    matches: &ArgMatches,
) -> Result<()> {
    let query = required(matches, "query")?;
    println!("{}", search_results(manager, query));
    Ok(())
}

pub fn issue_book<P: CatalogPersistence>(
    manager: &mut LibraryManager<P>,
    matches: &ArgMatches,
) -> Result<()> {
    let isbn = required(matches, "isbn")?;
    let user = required(matches, "user")?;

    manager.issue_book(isbn, user)?;

    println!("{} Book issued successfully!", style("✓").green().bold());
    Ok(())
}

pub fn return_book<P: CatalogPersistence>(
    manager: &mut LibraryManager<P>,
    matches: &ArgMatches,
) -> Result<()> {
    let isbn = required(matches, "isbn")?;
    let user = required(matches, "user")?;

    manager.return_book(isbn, user)?;

    println!("{} Book returned successfully!", style("✓").green().bold());
    Ok(())
}

/// Show the books a user currently holds
pub fn user_books<P: CatalogPersistence>(
    manager: &LibraryManager<P>,
    matches: &ArgMatches,
) -> Result<()> {
    let user = required(matches, "user")?;
    let books = manager.list_user_books(user)?;
    print!("{}", render::user_books(user, &books));
    Ok(())
}

/// Show catalog statistics
pub fn show_stats<P: CatalogPersistence>(manager: &LibraryManager<P>) -> Result<()> {
    print!("{}", render::stats(&manager.stats()));
    Ok(())
}

/// Export books and users as JSON, to a file or stdout
pub fn export_catalog<P: CatalogPersistence>(
    manager: &LibraryManager<P>,
    matches: &ArgMatches,
) -> Result<()> {
    let json = export_json(manager)?;

    match matches.get_one::<PathBuf>("output") {
        Some(path) => {
            std::fs::write(path, json)
                .with_context(|| format!("Failed to write export file {}", path.display()))?;
            println!(
                "{} Exported {} books to {}",
                style("✓").green().bold(),
                manager.store().book_count(),
                path.display()
            );
        }
        None => println!("{}", json),
    }

    Ok(())
}

/// `libris config <action>`
pub fn config_command(manager: &ConfigManager, matches: &ArgMatches) -> Result<()> {
    let path = manager.config_path();

    match matches.subcommand() {
        Some(("path", _)) => println!("{}", path.display()),
        Some(("show", _)) => {
            let config = manager
                .load_with_env_overrides()
                .with_context(|| format!("Failed to load {}", path.display()))?;
            print!("{}", config.to_toml()?);
        }
        Some(("check", _)) => {
            let problems = manager.check()?;
            if problems.is_empty() {
                println!("{} {} is valid", style("✓").green().bold(), path.display());
            } else {
                for problem in &problems {
                    println!("{} {}", style("✗").red().bold(), problem);
                }
                anyhow::bail!("{} problem(s) in {}", problems.len(), path.display());
            }
        }
        Some(("init", _)) => {
            if manager.initialize()? {
                println!(
                    "{} Wrote default config to {}",
                    style("✓").green().bold(),
                    path.display()
                );
            } else {
                println!("Config already exists at {}", path.display());
            }
        }
        Some(("reset", _)) => {
            manager.reset()?;
            println!(
                "{} Reset {} (previous version in {})",
                style("✓").green().bold(),
                path.display(),
                manager.backup_path().display()
            );
        }
        _ => anyhow::bail!("Unknown config action"),
    }

    Ok(())
}

#[derive(Serialize)]
struct CatalogExport<'a> {
    books: Vec<&'a Book>,
    users: Vec<&'a User>,
}

pub(crate) fn export_json<P: CatalogPersistence>(manager: &LibraryManager<P>) -> Result<String> {
    let export = CatalogExport {
        books: manager.store().books().collect(),
        users: manager.store().users().collect(),
    };
    serde_json::to_string_pretty(&export).context("Failed to serialize to JSON")
}

/// Renders the catalog or one category of it
pub(crate) fn listing<P: CatalogPersistence>(
    manager: &LibraryManager<P>,
    category: Option<Category>,
) -> String {
    if manager.store().book_count() == 0 {
        return render::EMPTY_CATALOG.to_string();
    }

    let books = manager.list_books(BookFilter::from(category));
    match category {
        Some(c) if books.is_empty() => render::no_books_in_category(c),
        _ => render::book_list("Library Books", &books),
    }
}

pub(crate) fn search_results<P: CatalogPersistence>(
    manager: &LibraryManager<P>,
    query: &str,
) -> String {
    let books = manager.find_books(query);
    if books.is_empty() {
        render::no_match(query)
    } else {
        render::book_list("Search Results", &books)
    }
}

pub(crate) fn parse_category(input: &str) -> Result<Category> {
    Ok(input.parse::<Category>()?)
}

fn required<'a>(matches: &'a ArgMatches, name: &str) -> Result<&'a str> {
    matches
        .get_one::<String>(name)
        .map(String::as_str)
        .ok_or_else(|| anyhow::anyhow!("{} is required", name))
}
