//! SQLite store implementation.
//!
//! Implements the storage traits from `bookstore_core::storage` using SQLite.
//! All statements run on the single `tokio-rusqlite` connection thread, which
//! serializes writes and keeps them off the callers' tasks.

use std::path::Path;

use async_trait::async_trait;
use rusqlite::OptionalExtension;
use tokio_rusqlite::Connection;

use bookstore_core::catalog::{Book, CartItem, CatalogError, Comment, WishlistItem};
use bookstore_core::storage::{
    BookStore, CartStore, CommentStore, RepositoryError, Result, SchemaStatus, WishlistStore,
};

use super::conversions::{
    escape_like, format_datetime, row_to_book, row_to_cart, row_to_comment, row_to_wishlist,
};
use super::error::{map_open_error, map_tokio_rusqlite_error, map_tokio_rusqlite_error_with_id};
use super::schema;

/// Helper to wrap rusqlite errors for tokio_rusqlite closures.
fn wrap_err(e: rusqlite::Error) -> tokio_rusqlite::Error {
    tokio_rusqlite::Error::Rusqlite(e)
}

/// SQLite-based store implementation.
///
/// Provides async access to SQLite storage for all entity types.
pub struct SqliteStore {
    conn: Connection,
    schema_status: SchemaStatus,
}

impl SqliteStore {
    /// Opens a file-based store, creating the file if it doesn't exist.
    ///
    /// The schema is applied on open. When the persisted schema version
    /// differs from [`schema::SCHEMA_VERSION`], every table is dropped and
    /// recreated if `reset_on_version_mismatch` is set; otherwise opening
    /// fails with `StorageUnavailable`.
    pub async fn open(path: impl AsRef<Path>, reset_on_version_mismatch: bool) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let conn = Connection::open(&path).await.map_err(map_open_error)?;

        let journal_mode = conn
            .call(|conn| {
                let mode = conn
                    .pragma_update_and_check(None, "journal_mode", schema::JOURNAL_MODE, |row| {
                        row.get::<_, String>(0)
                    })
                    .map_err(wrap_err)?;
                conn.pragma_update(None, "synchronous", schema::SYNCHRONOUS)
                    .map_err(wrap_err)?;
                Ok(mode)
            })
            .await
            .map_err(map_open_error)?;
        tracing::trace!(%journal_mode, "Applied file pragmas");

        let schema_status = Self::init_schema(&conn, reset_on_version_mismatch).await?;
        tracing::info!(path = %path.display(), status = ?schema_status, "Opened SQLite store");

        Ok(Self {
            conn,
            schema_status,
        })
    }

    /// Opens a store backed by a private in-memory database.
    ///
    /// Useful for testing - data is lost when the connection is dropped.
    pub async fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()
            .await
            .map_err(map_open_error)?;

        let schema_status = Self::init_schema(&conn, true).await?;
        tracing::debug!(status = ?schema_status, "Opened in-memory SQLite store");

        Ok(Self {
            conn,
            schema_status,
        })
    }

    /// What happened to the schema when this store was opened.
    pub fn schema_status(&self) -> SchemaStatus {
        self.schema_status
    }

    /// Initialize the database schema, checking the version marker.
    async fn init_schema(conn: &Connection, reset_on_version_mismatch: bool) -> Result<SchemaStatus> {
        let outcome = conn
            .call(move |conn| {
                let tx = conn.transaction().map_err(wrap_err)?;
                tx.execute_batch(schema::CREATE_SCHEMA_META)
                    .map_err(wrap_err)?;
                let version: Option<i64> = tx
                    .query_row(schema::SELECT_SCHEMA_VERSION, [], |row| row.get(0))
                    .optional()
                    .map_err(wrap_err)?;

                let status = match version {
                    None => {
                        tx.execute_batch(schema::CREATE_TABLES).map_err(wrap_err)?;
                        tx.execute(schema::INSERT_SCHEMA_VERSION, [schema::SCHEMA_VERSION])
                            .map_err(wrap_err)?;
                        SchemaStatus::Created
                    }
                    Some(found) if found == schema::SCHEMA_VERSION => {
                        tx.execute_batch(schema::CREATE_TABLES).map_err(wrap_err)?;
                        SchemaStatus::Current
                    }
                    Some(found) if reset_on_version_mismatch => {
                        tx.execute_batch(schema::DROP_TABLES).map_err(wrap_err)?;
                        tx.execute_batch(schema::CREATE_SCHEMA_META)
                            .map_err(wrap_err)?;
                        tx.execute_batch(schema::CREATE_TABLES).map_err(wrap_err)?;
                        tx.execute(schema::INSERT_SCHEMA_VERSION, [schema::SCHEMA_VERSION])
                            .map_err(wrap_err)?;
                        SchemaStatus::Reset {
                            from: found,
                            to: schema::SCHEMA_VERSION,
                        }
                    }
                    // Leave the store untouched; dropping `tx` rolls back.
                    Some(found) => return Ok(Err(found)),
                };

                tx.commit().map_err(wrap_err)?;
                Ok(Ok(status))
            })
            .await
            .map_err(map_open_error)?;

        match outcome {
            Ok(status) => {
                if let SchemaStatus::Reset { from, to } = status {
                    tracing::warn!(
                        from,
                        to,
                        "Schema version mismatch: dropped all tables and recreated an empty store"
                    );
                }
                Ok(status)
            }
            Err(found) => Err(RepositoryError::StorageUnavailable(format!(
                "schema version {found} does not match {} and reset on version mismatch is disabled",
                schema::SCHEMA_VERSION
            ))),
        }
    }
}

// ============================================================================
// BookStore implementation
// ============================================================================

#[async_trait]
impl BookStore for SqliteStore {
    async fn list_books(&self) -> Result<Vec<Book>> {
        self.conn
            .call(|conn| {
                let mut stmt = conn.prepare_cached(schema::SELECT_BOOKS).map_err(wrap_err)?;
                let rows = stmt.query_map([], row_to_book).map_err(wrap_err)?;

                let mut books = Vec::new();
                for row_result in rows {
                    books.push(row_result.map_err(wrap_err)?);
                }
                Ok(books)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "Book"))
    }

    async fn insert_books(&self, books: &[Book]) -> Result<()> {
        let books = books.to_vec();

        self.conn
            .call(move |conn| {
                // One transaction per batch: readers see all or none of it.
                let tx = conn.transaction().map_err(wrap_err)?;
                {
                    let mut stmt = tx.prepare_cached(schema::UPSERT_BOOK).map_err(wrap_err)?;
                    for book in &books {
                        stmt.execute(rusqlite::params![
                            book.isbn13,
                            book.title,
                            book.subtitle,
                            book.price,
                            book.image,
                            book.url,
                            book.description,
                            book.authors,
                            book.pages,
                            book.rating
                        ])
                        .map_err(wrap_err)?;
                    }
                }
                tx.commit().map_err(wrap_err)?;
                Ok(())
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "Book"))
    }

    async fn search_books_by_title(&self, query: &str) -> Result<Vec<Book>> {
        let needle = escape_like(query);

        self.conn
            .call(move |conn| {
                let mut stmt = conn
                    .prepare_cached(schema::SEARCH_BOOKS_BY_TITLE)
                    .map_err(wrap_err)?;
                let rows = stmt.query_map([&needle], row_to_book).map_err(wrap_err)?;

                let mut books = Vec::new();
                for row_result in rows {
                    books.push(row_result.map_err(wrap_err)?);
                }
                Ok(books)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "Book"))
    }

    async fn get_book_by_id(&self, isbn13: &str) -> Result<Book> {
        let isbn13 = isbn13.to_string();
        let book_id = isbn13.clone();

        self.conn
            .call(move |conn| {
                let mut stmt = conn
                    .prepare_cached(schema::SELECT_BOOK_BY_ID)
                    .map_err(wrap_err)?;
                stmt.query_row([&isbn13], row_to_book).map_err(wrap_err)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error_with_id(e, "Book", book_id))
    }

    async fn delete_book(&self, isbn13: &str) -> Result<bool> {
        let isbn13 = isbn13.to_string();
        let book_id = isbn13.clone();

        self.conn
            .call(move |conn| {
                let rows = conn
                    .execute(schema::DELETE_BOOK, [&isbn13])
                    .map_err(wrap_err)?;
                Ok(rows > 0)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error_with_id(e, "Book", book_id))
    }

    async fn count_books(&self) -> Result<usize> {
        self.conn
            .call(|conn| {
                conn.query_row(schema::COUNT_BOOKS, [], |row| row.get::<_, i64>(0))
                    .map_err(wrap_err)
            })
            .await
            .map(|count| count.max(0) as usize)
            .map_err(|e| map_tokio_rusqlite_error(e, "Book"))
    }
}

// ============================================================================
// WishlistStore implementation
// ============================================================================

#[async_trait]
impl WishlistStore for SqliteStore {
    async fn list_wishlist(&self) -> Result<Vec<WishlistItem>> {
        self.conn
            .call(|conn| {
                let mut stmt = conn.prepare_cached(schema::SELECT_WISHLIST).map_err(wrap_err)?;
                let rows = stmt.query_map([], row_to_wishlist).map_err(wrap_err)?;

                let mut items = Vec::new();
                for row_result in rows {
                    items.push(row_result.map_err(wrap_err)?);
                }
                Ok(items)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "WishlistItem"))
    }

    async fn get_wishlist_item(&self, id: i64) -> Result<WishlistItem> {
        self.conn
            .call(move |conn| {
                let mut stmt = conn
                    .prepare_cached(schema::SELECT_WISHLIST_BY_ID)
                    .map_err(wrap_err)?;
                stmt.query_row([id], row_to_wishlist).map_err(wrap_err)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error_with_id(e, "WishlistItem", id.to_string()))
    }

    async fn insert_wishlist(&self, item: &WishlistItem) -> Result<i64> {
        let item = item.clone();

        self.conn
            .call(move |conn| {
                conn.execute(
                    schema::UPSERT_WISHLIST,
                    rusqlite::params![
                        item.id,
                        item.isbn13,
                        item.title,
                        item.subtitle,
                        item.price,
                        item.image,
                        item.url
                    ],
                )
                .map_err(wrap_err)?;
                Ok(conn.last_insert_rowid())
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "WishlistItem"))
    }

    async fn remove_from_wishlist(&self, id: i64) -> Result<bool> {
        self.conn
            .call(move |conn| {
                let rows = conn
                    .execute(schema::DELETE_WISHLIST, [id])
                    .map_err(wrap_err)?;
                Ok(rows > 0)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error_with_id(e, "WishlistItem", id.to_string()))
    }
}

// ============================================================================
// CartStore implementation
// ============================================================================

#[async_trait]
impl CartStore for SqliteStore {
    async fn list_cart(&self) -> Result<Vec<CartItem>> {
        self.conn
            .call(|conn| {
                let mut stmt = conn.prepare_cached(schema::SELECT_CART).map_err(wrap_err)?;
                let rows = stmt.query_map([], row_to_cart).map_err(wrap_err)?;

                let mut items = Vec::new();
                for row_result in rows {
                    items.push(row_result.map_err(wrap_err)?);
                }
                Ok(items)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "CartItem"))
    }

    async fn insert_cart(&self, item: &CartItem) -> Result<i64> {
        let item = item.clone();

        self.conn
            .call(move |conn| {
                conn.execute(
                    schema::UPSERT_CART,
                    rusqlite::params![
                        item.id,
                        item.isbn13,
                        item.title,
                        item.subtitle,
                        item.price,
                        item.image,
                        item.url
                    ],
                )
                .map_err(wrap_err)?;
                Ok(conn.last_insert_rowid())
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "CartItem"))
    }

    async fn remove_from_cart(&self, id: i64) -> Result<bool> {
        self.conn
            .call(move |conn| {
                let rows = conn.execute(schema::DELETE_CART, [id]).map_err(wrap_err)?;
                Ok(rows > 0)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error_with_id(e, "CartItem", id.to_string()))
    }

    async fn clear_cart(&self) -> Result<usize> {
        self.conn
            .call(|conn| conn.execute(schema::CLEAR_CART, []).map_err(wrap_err))
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "CartItem"))
    }
}

// ============================================================================
// CommentStore implementation
// ============================================================================

#[async_trait]
impl CommentStore for SqliteStore {
    async fn list_comments_by_isbn(&self, isbn13: &str) -> Result<Vec<Comment>> {
        let isbn13 = isbn13.to_string();

        self.conn
            .call(move |conn| {
                let mut stmt = conn
                    .prepare_cached(schema::SELECT_COMMENTS_BY_ISBN)
                    .map_err(wrap_err)?;
                let rows = stmt.query_map([&isbn13], row_to_comment).map_err(wrap_err)?;

                let mut comments = Vec::new();
                for row_result in rows {
                    comments.push(row_result.map_err(wrap_err)?);
                }
                Ok(comments)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "Comment"))
    }

    async fn get_comment_by_id(&self, id: i64) -> Result<Comment> {
        self.conn
            .call(move |conn| {
                let mut stmt = conn
                    .prepare_cached(schema::SELECT_COMMENT_BY_ID)
                    .map_err(wrap_err)?;
                stmt.query_row([id], row_to_comment).map_err(wrap_err)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error_with_id(e, "Comment", id.to_string()))
    }

    async fn insert_comment(&self, comment: &Comment) -> Result<i64> {
        let id = comment.id;
        let isbn13 = comment.isbn13.clone();
        let text = comment.text.clone();
        let created_at = format_datetime(&comment.created_at);

        self.conn
            .call(move |conn| {
                conn.execute(
                    schema::UPSERT_COMMENT,
                    rusqlite::params![id, isbn13, text, created_at],
                )
                .map_err(wrap_err)?;
                Ok(conn.last_insert_rowid())
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "Comment"))
    }

    async fn update_comment(&self, comment: &Comment) -> Result<()> {
        let id = comment
            .id
            .ok_or(CatalogError::MissingRowId("Comment"))?;
        let isbn13 = comment.isbn13.clone();
        let text = comment.text.clone();
        let created_at = format_datetime(&comment.created_at);

        self.conn
            .call(move |conn| {
                let rows = conn
                    .execute(
                        schema::UPDATE_COMMENT,
                        rusqlite::params![id, isbn13, text, created_at],
                    )
                    .map_err(wrap_err)?;
                if rows == 0 {
                    Err(wrap_err(rusqlite::Error::QueryReturnedNoRows))
                } else {
                    Ok(())
                }
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error_with_id(e, "Comment", id.to_string()))
    }

    async fn delete_comment(&self, comment: &Comment) -> Result<bool> {
        let Some(id) = comment.id else {
            // An unsaved comment cannot match a stored row.
            return Ok(false);
        };

        self.conn
            .call(move |conn| {
                let rows = conn
                    .execute(schema::DELETE_COMMENT, [id])
                    .map_err(wrap_err)?;
                Ok(rows > 0)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error_with_id(e, "Comment", id.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};

    fn book(isbn13: &str, title: &str, price: &str) -> Book {
        Book::new(isbn13, title, price)
            .with_links(format!("https://img/{isbn13}.png"), format!("https://books/{isbn13}"))
    }

    async fn store() -> SqliteStore {
        SqliteStore::open_in_memory().await.unwrap()
    }

    // ==================== Schema Tests ====================

    #[tokio::test]
    async fn test_fresh_store_reports_created() {
        let store = store().await;
        assert_eq!(store.schema_status(), SchemaStatus::Created);
    }

    #[tokio::test]
    async fn test_reopen_file_reports_current_and_keeps_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("books.db");

        {
            let store = SqliteStore::open(&path, true).await.unwrap();
            store.insert_books(&[book("978-1", "Dune", "$10")]).await.unwrap();
        }

        let store = SqliteStore::open(&path, true).await.unwrap();
        assert_eq!(store.schema_status(), SchemaStatus::Current);
        assert_eq!(store.count_books().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_version_mismatch_resets_store() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("books.db");

        {
            let store = SqliteStore::open(&path, true).await.unwrap();
            store.insert_books(&[book("978-1", "Dune", "$10")]).await.unwrap();
            store
                .conn
                .call(|conn| {
                    conn.execute("UPDATE schema_meta SET version = 3", [])
                        .map_err(wrap_err)
                })
                .await
                .unwrap();
        }

        let store = SqliteStore::open(&path, true).await.unwrap();
        assert_eq!(
            store.schema_status(),
            SchemaStatus::Reset {
                from: 3,
                to: schema::SCHEMA_VERSION
            }
        );
        assert_eq!(store.count_books().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_version_mismatch_without_reset_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("books.db");

        {
            let store = SqliteStore::open(&path, true).await.unwrap();
            store.insert_books(&[book("978-1", "Dune", "$10")]).await.unwrap();
            store
                .conn
                .call(|conn| {
                    conn.execute("UPDATE schema_meta SET version = 99", [])
                        .map_err(wrap_err)
                })
                .await
                .unwrap();
        }

        let result = SqliteStore::open(&path, false).await;
        assert!(matches!(result, Err(RepositoryError::StorageUnavailable(_))));

        // The rejected open must not have touched the data.
        let store = SqliteStore::open(&path, true).await.unwrap();
        assert_eq!(store.schema_status(), SchemaStatus::Reset { from: 99, to: 12 });
    }

    #[tokio::test]
    async fn test_open_in_missing_directory_is_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("books.db");

        let result = SqliteStore::open(&path, true).await;

        assert!(matches!(result, Err(RepositoryError::StorageUnavailable(_))));
    }

    // ==================== Book Tests ====================

    #[tokio::test]
    async fn test_insert_and_get_book() {
        let store = store().await;
        let dune = book("978-1", "Dune", "$10").with_details("Spice.", "Frank Herbert", 412, 5);

        store.insert_books(&[dune.clone()]).await.unwrap();

        assert_eq!(store.get_book_by_id("978-1").await.unwrap(), dune);
    }

    #[tokio::test]
    async fn test_insert_books_replaces_by_isbn() {
        let store = store().await;

        store
            .insert_books(&[book("978-1", "Dune", "$10"), book("978-2", "Emma", "$5")])
            .await
            .unwrap();
        store
            .insert_books(&[book("978-1", "Dune Messiah", "$12")])
            .await
            .unwrap();
        store
            .insert_books(&[book("978-1", "Children of Dune", "$14")])
            .await
            .unwrap();

        let latest = store.get_book_by_id("978-1").await.unwrap();
        assert_eq!(latest.title, "Children of Dune");
        assert_eq!(latest.price, "$14");
        assert_eq!(store.count_books().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_insert_books_last_duplicate_in_batch_wins() {
        let store = store().await;

        store
            .insert_books(&[book("978-1", "First", "$1"), book("978-1", "Second", "$2")])
            .await
            .unwrap();

        assert_eq!(store.get_book_by_id("978-1").await.unwrap().title, "Second");
        assert_eq!(store.count_books().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_get_missing_book_is_not_found() {
        let store = store().await;

        let result = store.get_book_by_id("nope").await;

        assert_eq!(result, Err(RepositoryError::not_found("Book", "nope")));
    }

    #[tokio::test]
    async fn test_list_books_ordered_by_isbn() {
        let store = store().await;
        store
            .insert_books(&[book("978-3", "C", "$1"), book("978-1", "A", "$1"), book("978-2", "B", "$1")])
            .await
            .unwrap();

        let isbns: Vec<String> = store
            .list_books()
            .await
            .unwrap()
            .into_iter()
            .map(|b| b.isbn13)
            .collect();

        assert_eq!(isbns, vec!["978-1", "978-2", "978-3"]);
    }

    #[tokio::test]
    async fn test_search_matches_substring_ordered_by_title() {
        let store = store().await;
        store
            .insert_books(&[
                book("1", "War and Peace", "$9"),
                book("2", "The Art of War", "$7"),
                book("3", "Dune", "$10"),
                book("4", "Awkward Silences", "$3"),
            ])
            .await
            .unwrap();

        let titles: Vec<String> = store
            .search_books_by_title("war")
            .await
            .unwrap()
            .into_iter()
            .map(|b| b.title)
            .collect();

        assert_eq!(titles, vec!["Awkward Silences", "The Art of War", "War and Peace"]);
    }

    #[tokio::test]
    async fn test_search_is_case_insensitive() {
        let store = store().await;
        store
            .insert_books(&[book("1", "War and Peace", "$9"), book("2", "warlock", "$4")])
            .await
            .unwrap();

        let upper = store.search_books_by_title("WAR").await.unwrap();
        let lower = store.search_books_by_title("war").await.unwrap();

        assert_eq!(upper.len(), 2);
        assert_eq!(upper, lower);
    }

    #[tokio::test]
    async fn test_search_no_match_is_empty() {
        let store = store().await;
        store.insert_books(&[book("1", "Dune", "$10")]).await.unwrap();

        assert!(store.search_books_by_title("xyz").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_search_wildcards_are_literal() {
        let store = store().await;
        store
            .insert_books(&[book("1", "100% Rust", "$1"), book("2", "1000 Rust Tips", "$1")])
            .await
            .unwrap();

        let percent = store.search_books_by_title("100%").await.unwrap();
        let underscore = store.search_books_by_title("_").await.unwrap();

        assert_eq!(percent.len(), 1);
        assert_eq!(percent[0].title, "100% Rust");
        assert!(underscore.is_empty());
    }

    #[tokio::test]
    async fn test_delete_book_does_not_cascade() {
        let store = store().await;
        let dune = book("978-1", "Dune", "$10");
        store.insert_books(&[dune.clone()]).await.unwrap();
        store.insert_wishlist(&WishlistItem::from_book(&dune)).await.unwrap();
        store.insert_comment(&Comment::new("978-1", "Spice!")).await.unwrap();

        assert!(store.delete_book("978-1").await.unwrap());
        assert!(!store.delete_book("978-1").await.unwrap());

        assert_eq!(store.list_wishlist().await.unwrap().len(), 1);
        assert_eq!(store.list_comments_by_isbn("978-1").await.unwrap().len(), 1);
    }

    // ==================== Wishlist / Cart Tests ====================

    #[tokio::test]
    async fn test_wishlist_insert_assigns_ids() {
        let store = store().await;
        let dune = book("978-1", "Dune", "$10");

        let first = store.insert_wishlist(&WishlistItem::from_book(&dune)).await.unwrap();
        let second = store.insert_wishlist(&WishlistItem::from_book(&dune)).await.unwrap();

        assert!(first > 0);
        assert_ne!(first, second);
        let items = store.list_wishlist().await.unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].id, Some(first));
    }

    #[tokio::test]
    async fn test_wishlist_insert_same_id_replaces() {
        let store = store().await;
        let item = WishlistItem::from_book(&book("978-1", "Dune", "$10")).with_id(1);
        let mut changed = item.clone();
        changed.price = "$8".to_string();
        changed.title = "Dune (Reissue)".to_string();

        assert_eq!(store.insert_wishlist(&item).await.unwrap(), 1);
        assert_eq!(store.insert_wishlist(&changed).await.unwrap(), 1);

        assert_eq!(store.list_wishlist().await.unwrap(), vec![changed]);
    }

    #[tokio::test]
    async fn test_get_wishlist_item() {
        let store = store().await;
        let item = WishlistItem::from_book(&book("978-1", "Dune", "$10")).with_id(4);
        store.insert_wishlist(&item).await.unwrap();

        assert_eq!(store.get_wishlist_item(4).await.unwrap(), item);
        assert!(store.get_wishlist_item(5).await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_remove_from_cart_is_idempotent() {
        let store = store().await;
        let id = store
            .insert_cart(&CartItem::from_book(&book("978-1", "Dune", "$10")))
            .await
            .unwrap();

        assert!(store.remove_from_cart(id).await.unwrap());
        assert!(store.list_cart().await.unwrap().is_empty());
        assert!(!store.remove_from_cart(id).await.unwrap());
    }

    #[tokio::test]
    async fn test_wishlist_and_cart_ids_are_independent() {
        let store = store().await;
        let dune = book("978-1", "Dune", "$10");

        let wish = store.insert_wishlist(&WishlistItem::from_book(&dune)).await.unwrap();
        let cart = store.insert_cart(&CartItem::from_book(&dune)).await.unwrap();

        assert_eq!(wish, 1);
        assert_eq!(cart, 1);
        assert!(store.remove_from_cart(cart).await.unwrap());
        assert_eq!(store.list_wishlist().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_clear_cart() {
        let store = store().await;
        for isbn in ["1", "2", "3"] {
            store
                .insert_cart(&CartItem::from_book(&book(isbn, "T", "$1")))
                .await
                .unwrap();
        }

        assert_eq!(store.clear_cart().await.unwrap(), 3);
        assert_eq!(store.clear_cart().await.unwrap(), 0);
    }

    // ==================== Comment Tests ====================

    #[tokio::test]
    async fn test_comment_insert_and_get() {
        let store = store().await;
        let comment = Comment::new("978-1", "Great read");

        let id = store.insert_comment(&comment).await.unwrap();
        let stored = store.get_comment_by_id(id).await.unwrap();

        assert_eq!(stored, comment.with_id(id));
    }

    #[tokio::test]
    async fn test_comments_by_isbn_oldest_first() {
        let store = store().await;
        let base = Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap();
        store
            .insert_comment(&Comment::new("978-1", "second").with_created_at(base + Duration::hours(1)))
            .await
            .unwrap();
        store
            .insert_comment(&Comment::new("978-1", "first").with_created_at(base))
            .await
            .unwrap();
        store
            .insert_comment(&Comment::new("978-2", "other book"))
            .await
            .unwrap();

        let texts: Vec<String> = store
            .list_comments_by_isbn("978-1")
            .await
            .unwrap()
            .into_iter()
            .map(|c| c.text)
            .collect();

        assert_eq!(texts, vec!["first", "second"]);
    }

    #[tokio::test]
    async fn test_get_missing_comment_is_not_found() {
        let store = store().await;

        let result = store.get_comment_by_id(5).await;

        assert_eq!(result, Err(RepositoryError::not_found("Comment", 5)));
    }

    #[tokio::test]
    async fn test_update_comment() {
        let store = store().await;
        let id = store
            .insert_comment(&Comment::new("978-1", "Draft"))
            .await
            .unwrap();
        let mut comment = store.get_comment_by_id(id).await.unwrap();
        comment.text = "Final".to_string();

        store.update_comment(&comment).await.unwrap();

        assert_eq!(store.get_comment_by_id(id).await.unwrap().text, "Final");
    }

    #[tokio::test]
    async fn test_update_missing_comment_is_not_found() {
        let store = store().await;

        let result = store
            .update_comment(&Comment::new("978-1", "ghost").with_id(77))
            .await;

        assert_eq!(result, Err(RepositoryError::not_found("Comment", 77)));
    }

    #[tokio::test]
    async fn test_update_unsaved_comment_is_malformed() {
        let store = store().await;

        let result = store.update_comment(&Comment::new("978-1", "unsaved")).await;

        assert!(matches!(result, Err(RepositoryError::MalformedInput(_))));
    }

    #[tokio::test]
    async fn test_delete_comment_matches_only_its_id() {
        let store = store().await;
        let keep = store.insert_comment(&Comment::new("978-1", "keep")).await.unwrap();
        let drop = store.insert_comment(&Comment::new("978-1", "drop")).await.unwrap();
        let doomed = store.get_comment_by_id(drop).await.unwrap();

        assert!(store.delete_comment(&doomed).await.unwrap());
        assert!(!store.delete_comment(&doomed).await.unwrap());
        assert!(!store.delete_comment(&Comment::new("978-1", "unsaved")).await.unwrap());

        let remaining = store.list_comments_by_isbn("978-1").await.unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].id, Some(keep));
    }
}
