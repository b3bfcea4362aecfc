//! Libris Catalog Management
//!
//! High-level layer that ties the record store to a persistence adapter.
//! `RecordStore` keeps books and users consistent in memory;
//! `LibraryManager` saves every successful change and rolls back on write
//! failure.

pub mod manager;
pub mod query;
pub mod store;

pub use manager::{flat_file_config, LibraryManager};
pub use query::{BookFilter, SearchQuery};
pub use store::RecordStore;
