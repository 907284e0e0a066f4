//! SQLite schema definitions and SQL query constants.
//!
//! This module contains all SQL statements used by the SQLite store,
//! following the Functional Core pattern - pure data, no I/O.

/// Version written to the `schema_meta` marker. Bump it whenever a table
/// definition below changes; stores with another version are reset.
pub const SCHEMA_VERSION: i64 = 12;

/// Journal mode for file-backed stores.
pub const JOURNAL_MODE: &str = "WAL";

/// Sync level for file-backed stores. Safe under WAL.
pub const SYNCHRONOUS: &str = "NORMAL";

/// SQL statement to create the schema version marker.
pub const CREATE_SCHEMA_META: &str = r#"
CREATE TABLE IF NOT EXISTS schema_meta (
    version INTEGER NOT NULL
);
"#;

pub const SELECT_SCHEMA_VERSION: &str = "SELECT version FROM schema_meta LIMIT 1";

pub const INSERT_SCHEMA_VERSION: &str = "INSERT INTO schema_meta (version) VALUES (?1)";

/// SQL statement to create all tables.
pub const CREATE_TABLES: &str = r#"
-- Catalog books, cached from the external catalog source
CREATE TABLE IF NOT EXISTS books (
    isbn13 TEXT PRIMARY KEY NOT NULL,
    title TEXT NOT NULL,
    subtitle TEXT NOT NULL,
    price TEXT NOT NULL,
    image TEXT NOT NULL,
    url TEXT NOT NULL,
    description TEXT NOT NULL DEFAULT '',
    authors TEXT NOT NULL DEFAULT '',
    pages INTEGER NOT NULL DEFAULT 0,
    rating INTEGER NOT NULL DEFAULT 0
);

-- Wishlist selections
CREATE TABLE IF NOT EXISTS wishlist (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    isbn13 TEXT NOT NULL,
    title TEXT NOT NULL,
    subtitle TEXT NOT NULL,
    price TEXT NOT NULL,
    image TEXT NOT NULL,
    url TEXT NOT NULL
);

-- Cart selections
CREATE TABLE IF NOT EXISTS cart (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    isbn13 TEXT NOT NULL,
    title TEXT NOT NULL,
    subtitle TEXT NOT NULL,
    price TEXT NOT NULL,
    image TEXT NOT NULL,
    url TEXT NOT NULL
);

-- Comments; isbn13 is intentionally not a foreign key
CREATE TABLE IF NOT EXISTS comments (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    isbn13 TEXT NOT NULL,
    text TEXT NOT NULL,
    created_at TEXT NOT NULL
);

-- Indexes for efficient queries
CREATE INDEX IF NOT EXISTS idx_books_title ON books(title);
CREATE INDEX IF NOT EXISTS idx_comments_isbn13 ON comments(isbn13);
"#;

/// SQL statement to drop every table, including the version marker.
pub const DROP_TABLES: &str = r#"
DROP TABLE IF EXISTS books;
DROP TABLE IF EXISTS wishlist;
DROP TABLE IF EXISTS cart;
DROP TABLE IF EXISTS comments;
DROP TABLE IF EXISTS schema_meta;
"#;

// Book queries
pub const UPSERT_BOOK: &str = r#"
INSERT OR REPLACE INTO books (isbn13, title, subtitle, price, image, url, description, authors, pages, rating)
VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
"#;

pub const SELECT_BOOKS: &str = r#"
SELECT isbn13, title, subtitle, price, image, url, description, authors, pages, rating
FROM books
ORDER BY isbn13 ASC
"#;

pub const SEARCH_BOOKS_BY_TITLE: &str = r#"
SELECT isbn13, title, subtitle, price, image, url, description, authors, pages, rating
FROM books
WHERE title LIKE '%' || ?1 || '%' ESCAPE '\'
ORDER BY title ASC
"#;

pub const SELECT_BOOK_BY_ID: &str = r#"
SELECT isbn13, title, subtitle, price, image, url, description, authors, pages, rating
FROM books
WHERE isbn13 = ?1
"#;

pub const DELETE_BOOK: &str = "DELETE FROM books WHERE isbn13 = ?1";

pub const COUNT_BOOKS: &str = "SELECT COUNT(*) FROM books";

// Wishlist queries
pub const UPSERT_WISHLIST: &str = r#"
INSERT OR REPLACE INTO wishlist (id, isbn13, title, subtitle, price, image, url)
VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
"#;

pub const SELECT_WISHLIST: &str = r#"
SELECT id, isbn13, title, subtitle, price, image, url
FROM wishlist
ORDER BY id ASC
"#;

pub const SELECT_WISHLIST_BY_ID: &str = r#"
SELECT id, isbn13, title, subtitle, price, image, url
FROM wishlist
WHERE id = ?1
"#;

pub const DELETE_WISHLIST: &str = "DELETE FROM wishlist WHERE id = ?1";

// Cart queries
pub const UPSERT_CART: &str = r#"
INSERT OR REPLACE INTO cart (id, isbn13, title, subtitle, price, image, url)
VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
"#;

pub const SELECT_CART: &str = r#"
SELECT id, isbn13, title, subtitle, price, image, url
FROM cart
ORDER BY id ASC
"#;

pub const DELETE_CART: &str = "DELETE FROM cart WHERE id = ?1";

pub const CLEAR_CART: &str = "DELETE FROM cart";

// Comment queries
pub const UPSERT_COMMENT: &str = r#"
INSERT OR REPLACE INTO comments (id, isbn13, text, created_at)
VALUES (?1, ?2, ?3, ?4)
"#;

pub const SELECT_COMMENTS_BY_ISBN: &str = r#"
SELECT id, isbn13, text, created_at
FROM comments
WHERE isbn13 = ?1
ORDER BY created_at ASC, id ASC
"#;

pub const SELECT_COMMENT_BY_ID: &str = r#"
SELECT id, isbn13, text, created_at
FROM comments
WHERE id = ?1
"#;

pub const UPDATE_COMMENT: &str = r#"
UPDATE comments
SET isbn13 = ?2, text = ?3, created_at = ?4
WHERE id = ?1
"#;

pub const DELETE_COMMENT: &str = "DELETE FROM comments WHERE id = ?1";
