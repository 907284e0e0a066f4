//! Local persistence layer for the bookstore catalog.
//!
//! Stores catalog books, wishlist and cart selections, and comments in one
//! SQLite file, and keeps a live, auto-updating book list for any number of
//! observers.
//!
//! Layers, bottom up:
//!
//! - [`storage`]: the SQLite store
//! - [`live`]: change notification and live queries
//! - [`engine`]: the store plus its notifier and live book list
//! - [`handle`]: lazy, shared engine construction
//! - [`dao`]: validated typed operations
//! - [`repository`]: view-template projection used by screens

pub mod config;
pub mod dao;
pub mod engine;
pub mod handle;
pub mod live;
pub mod repository;
pub mod storage;

pub use config::{Config, StoreLocation};
pub use dao::BookDao;
pub use engine::{BookFeed, BookSnapshot, Engine};
pub use handle::{get_engine, EngineHandle};
pub use repository::BookRepository;
