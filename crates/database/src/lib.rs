//! Libris Storage Layer
//!
//! This crate persists the catalog between runs. Records are kept in two
//! delimiter-separated text files that are rewritten whole after every
//! change.

pub mod codec;
pub mod flat_file;
pub mod memory;
pub mod persistence;

pub use flat_file::{FlatFileConfig, FlatFileStore};
pub use memory::MemoryStore;
pub use persistence::{CatalogPersistence, CatalogSnapshot};
