use std::{env, path::PathBuf};

/// Default database file name, relative to the working directory.
pub const DEFAULT_DB_PATH: &str = "book_database.db";

/// Value of `BOOKSTORE_DB_PATH` that selects an in-memory store.
pub const MEMORY_DB_PATH: &str = ":memory:";

/// Where the physical store lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreLocation {
    /// A SQLite file, created if missing.
    File(PathBuf),
    /// A private in-memory database, lost when the engine is dropped.
    Memory,
}

impl StoreLocation {
    /// Parses a `BOOKSTORE_DB_PATH` style value.
    pub fn parse(value: &str) -> Self {
        if value == MEMORY_DB_PATH {
            StoreLocation::Memory
        } else {
            StoreLocation::File(PathBuf::from(value))
        }
    }
}

/// Engine configuration loaded from environment variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Physical store location (default: "book_database.db")
    pub store: StoreLocation,
    /// Drop and recreate all tables when the persisted schema version differs
    /// (default: true). When false, a mismatch fails engine construction.
    pub reset_on_version_mismatch: bool,
    /// Capacity of each table's change channel (default: 100)
    pub change_channel_capacity: usize,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Environment variables:
    /// - `BOOKSTORE_DB_PATH` - Database path, or `:memory:` (default: "book_database.db")
    /// - `BOOKSTORE_RESET_ON_VERSION_MISMATCH` - `true`/`false` (default: true)
    /// - `BOOKSTORE_CHANGE_CHANNEL_CAPACITY` - Change channel capacity (default: 100)
    pub fn from_env() -> Self {
        Self {
            store: StoreLocation::parse(
                &env::var("BOOKSTORE_DB_PATH").unwrap_or_else(|_| DEFAULT_DB_PATH.to_string()),
            ),
            reset_on_version_mismatch: env::var("BOOKSTORE_RESET_ON_VERSION_MISMATCH")
                .ok()
                .and_then(|v| parse_bool(&v))
                .unwrap_or(true),
            change_channel_capacity: env::var("BOOKSTORE_CHANGE_CHANNEL_CAPACITY")
                .ok()
                .and_then(|v| v.parse().ok())
                .filter(|capacity| *capacity > 0)
                .unwrap_or(100),
        }
    }

    /// Configuration for a private in-memory store.
    pub fn in_memory() -> Self {
        Self {
            store: StoreLocation::Memory,
            reset_on_version_mismatch: true,
            change_channel_capacity: 100,
        }
    }

    /// Sets the database file path.
    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.store = StoreLocation::File(path.into());
        self
    }

    /// Sets whether a schema version mismatch wipes the store.
    pub fn with_reset_on_version_mismatch(mut self, reset: bool) -> Self {
        self.reset_on_version_mismatch = reset;
        self
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_location_parse() {
        assert_eq!(StoreLocation::parse(":memory:"), StoreLocation::Memory);
        assert_eq!(
            StoreLocation::parse("data/books.db"),
            StoreLocation::File(PathBuf::from("data/books.db"))
        );
    }

    #[test]
    fn test_parse_bool() {
        assert_eq!(parse_bool("TRUE"), Some(true));
        assert_eq!(parse_bool(" off "), Some(false));
        assert_eq!(parse_bool("maybe"), None);
    }

    #[test]
    fn test_builders() {
        let config = Config::in_memory()
            .with_path("/tmp/books.db")
            .with_reset_on_version_mismatch(false);

        assert_eq!(
            config.store,
            StoreLocation::File(PathBuf::from("/tmp/books.db"))
        );
        assert!(!config.reset_on_version_mismatch);
        assert_eq!(config.change_channel_capacity, 100);
    }

    #[test]
    fn test_default_values() {
        // Clear environment variables to test defaults
        env::remove_var("BOOKSTORE_DB_PATH");
        env::remove_var("BOOKSTORE_RESET_ON_VERSION_MISMATCH");
        env::remove_var("BOOKSTORE_CHANGE_CHANNEL_CAPACITY");

        let config = Config::from_env();

        assert_eq!(config.store, StoreLocation::File(PathBuf::from(DEFAULT_DB_PATH)));
        assert!(config.reset_on_version_mismatch);
        assert_eq!(config.change_channel_capacity, 100);
    }
}
