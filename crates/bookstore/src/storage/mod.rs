//! Storage backend implementations.
//!
//! Concrete implementations of the store traits defined in
//! `bookstore_core::storage`. SQLite is the only physical backend.

pub mod sqlite;

pub use sqlite::SqliteStore;
