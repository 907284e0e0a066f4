//! Typed query and mutation operations over the engine.
//!
//! `BookDao` validates identity keys and delegates to the engine's store.
//! It holds no state of its own.

use std::sync::Arc;

use bookstore_core::catalog::{
    validate_isbn13, validate_optional_row_id, validate_row_id, Book, CartItem, Comment,
    WishlistItem,
};
use bookstore_core::storage::{BookStore, CartStore, CommentStore, Result, WishlistStore};

use crate::engine::{BookFeed, Engine};
use crate::handle::EngineHandle;

/// Validating access to every store operation. Cheap to clone; clones share
/// one engine.
#[derive(Clone)]
pub struct BookDao {
    engine: Arc<Engine>,
}

impl BookDao {
    /// Creates a DAO over an open engine.
    pub fn new(engine: Arc<Engine>) -> Self {
        Self { engine }
    }

    /// Builds a DAO over the handle's engine, opening it if needed.
    pub async fn from_handle(handle: &EngineHandle) -> Result<Self> {
        Ok(Self::new(handle.get().await?))
    }

    /// The engine this DAO delegates to.
    pub fn engine(&self) -> &Arc<Engine> {
        &self.engine
    }

    // ------------------------------------------------------------------------
    // Books
    // ------------------------------------------------------------------------

    /// Live list of every book, ordered by ISBN-13.
    pub fn get_all_books(&self) -> BookFeed {
        self.engine.watch_books()
    }

    /// One-shot list of every book.
    pub async fn list_books(&self) -> Result<Vec<Book>> {
        self.engine.store().list_books().await
    }

    /// Inserts or replaces books by ISBN-13 in one transaction. Every ISBN is
    /// checked before anything is written.
    pub async fn insert_books(&self, books: &[Book]) -> Result<()> {
        for book in books {
            validate_isbn13(&book.isbn13)?;
        }
        self.engine.store().insert_books(books).await
    }

    /// Books whose title contains `query`, ignoring ASCII case.
    pub async fn search_books_by_title(&self, query: &str) -> Result<Vec<Book>> {
        self.engine.store().search_books_by_title(query).await
    }

    /// One book by ISBN-13. Fails with `NotFound` when absent.
    pub async fn get_book_by_id(&self, isbn13: &str) -> Result<Book> {
        validate_isbn13(isbn13)?;
        self.engine.store().get_book_by_id(isbn13).await
    }

    /// Deletes a book. Returns false when it was not stored.
    pub async fn delete_book(&self, isbn13: &str) -> Result<bool> {
        validate_isbn13(isbn13)?;
        self.engine.store().delete_book(isbn13).await
    }

    /// Number of stored books.
    pub async fn count_books(&self) -> Result<usize> {
        self.engine.store().count_books().await
    }

    // ------------------------------------------------------------------------
    // Wishlist
    // ------------------------------------------------------------------------

    /// Every wishlist item, ordered by id.
    pub async fn get_book_from_wishlist(&self) -> Result<Vec<WishlistItem>> {
        self.engine.store().list_wishlist().await
    }

    /// One wishlist item by id. Fails with `NotFound` when absent.
    pub async fn get_wishlist_item(&self, id: i64) -> Result<WishlistItem> {
        validate_row_id(id)?;
        self.engine.store().get_wishlist_item(id).await
    }

    /// Saves a wishlist item. A `None` id gets a fresh one; an existing id is
    /// replaced. Returns the stored id.
    pub async fn insert_wishlist(&self, item: &WishlistItem) -> Result<i64> {
        validate_isbn13(&item.isbn13)?;
        validate_optional_row_id(item.id)?;
        self.engine.store().insert_wishlist(item).await
    }

    /// Removes a wishlist item. Returns false when no item had that id.
    pub async fn remove_from_wishlist(&self, id: i64) -> Result<bool> {
        validate_row_id(id)?;
        self.engine.store().remove_from_wishlist(id).await
    }

    // ------------------------------------------------------------------------
    // Cart
    // ------------------------------------------------------------------------

    /// Every cart item, ordered by id.
    pub async fn get_book_from_cart(&self) -> Result<Vec<CartItem>> {
        self.engine.store().list_cart().await
    }

    /// Saves a cart item. A `None` id gets a fresh one; an existing id is
    /// replaced. Returns the stored id.
    pub async fn insert_cart(&self, item: &CartItem) -> Result<i64> {
        validate_isbn13(&item.isbn13)?;
        validate_optional_row_id(item.id)?;
        self.engine.store().insert_cart(item).await
    }

    /// Removes a cart item. Returns false when no item had that id.
    pub async fn remove_from_cart(&self, id: i64) -> Result<bool> {
        validate_row_id(id)?;
        self.engine.store().remove_from_cart(id).await
    }

    /// Removes every cart item. Returns how many were removed.
    pub async fn clear_cart(&self) -> Result<usize> {
        self.engine.store().clear_cart().await
    }

    // ------------------------------------------------------------------------
    // Comments
    // ------------------------------------------------------------------------

    /// Comments for a book, oldest first.
    pub async fn get_comments_by_isbn13(&self, isbn13: &str) -> Result<Vec<Comment>> {
        validate_isbn13(isbn13)?;
        self.engine.store().list_comments_by_isbn(isbn13).await
    }

    /// One comment by id. Fails with `NotFound` when absent.
    pub async fn get_comment_by_id(&self, id: i64) -> Result<Comment> {
        validate_row_id(id)?;
        self.engine.store().get_comment_by_id(id).await
    }

    /// Saves a comment. A `None` id gets a fresh one; an existing id is
    /// replaced. Returns the stored id.
    pub async fn insert_comment(&self, comment: &Comment) -> Result<i64> {
        validate_isbn13(&comment.isbn13)?;
        validate_optional_row_id(comment.id)?;
        self.engine.store().insert_comment(comment).await
    }

    /// Replaces the text, book and timestamp of a stored comment. Fails with
    /// `NotFound` when no comment has that id.
    pub async fn update_comment(&self, comment: &Comment) -> Result<()> {
        validate_isbn13(&comment.isbn13)?;
        validate_optional_row_id(comment.id)?;
        self.engine.store().update_comment(comment).await
    }

    /// Deletes the comment with the same id. Returns false when none matched.
    pub async fn delete_comment(&self, comment: &Comment) -> Result<bool> {
        validate_optional_row_id(comment.id)?;
        self.engine.store().delete_comment(comment).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use bookstore_core::storage::RepositoryError;

    async fn dao() -> BookDao {
        BookDao::new(Arc::new(Engine::open(&Config::in_memory()).await.unwrap()))
    }

    fn malformed<T: std::fmt::Debug>(result: Result<T>) -> bool {
        matches!(result, Err(RepositoryError::MalformedInput(_)))
    }

    #[tokio::test]
    async fn test_blank_isbn_is_rejected() {
        let dao = dao().await;

        assert!(malformed(dao.get_book_by_id("  ").await));
        assert!(malformed(dao.get_comments_by_isbn13("").await));
        assert!(malformed(dao.insert_books(&[Book::new("", "Untitled", "$1")]).await));
        assert_eq!(dao.count_books().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_non_positive_ids_are_rejected() {
        let dao = dao().await;
        let item = WishlistItem::from_book(&Book::new("978-1", "Dune", "$10"));

        assert!(malformed(dao.remove_from_wishlist(0).await));
        assert!(malformed(dao.remove_from_cart(-1).await));
        assert!(malformed(dao.get_comment_by_id(0).await));
        assert!(malformed(dao.get_wishlist_item(0).await));
        assert!(malformed(dao.insert_wishlist(&item.with_id(-5)).await));
    }

    #[tokio::test]
    async fn test_batch_with_one_bad_isbn_writes_nothing() {
        let dao = dao().await;

        let result = dao
            .insert_books(&[Book::new("978-1", "Dune", "$10"), Book::new(" ", "Blank", "$1")])
            .await;

        assert!(malformed(result));
        assert_eq!(dao.count_books().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_end_to_end_scenario() {
        let dao = dao().await;
        let dune = Book::new("978-1", "Dune", "$10");

        dao.insert_books(&[dune.clone()]).await.unwrap();
        dao.insert_wishlist(&WishlistItem::from_book(&dune).with_id(1))
            .await
            .unwrap();

        let found = dao.search_books_by_title("Dun").await.unwrap();
        assert_eq!(found, vec![dune.clone()]);

        let wishlist = dao.get_book_from_wishlist().await.unwrap();
        assert_eq!(wishlist.len(), 1);
        assert_eq!(wishlist[0].id, Some(1));

        assert!(dao.remove_from_wishlist(1).await.unwrap());
        assert!(dao.get_book_from_wishlist().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_comment_lifecycle() {
        let dao = dao().await;

        let id = dao
            .insert_comment(&Comment::new("978-1", "First impressions"))
            .await
            .unwrap();
        let mut comment = dao.get_comment_by_id(id).await.unwrap();
        comment.text = "Second thoughts".to_string();
        dao.update_comment(&comment).await.unwrap();

        let comments = dao.get_comments_by_isbn13("978-1").await.unwrap();
        assert_eq!(comments, vec![comment.clone()]);

        assert!(dao.delete_comment(&comment).await.unwrap());
        assert!(dao.get_comment_by_id(id).await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_from_handle_shares_engine() {
        let handle = EngineHandle::new(Config::in_memory());

        let a = BookDao::from_handle(&handle).await.unwrap();
        let b = BookDao::from_handle(&handle).await.unwrap();

        assert!(Arc::ptr_eq(a.engine(), b.engine()));
        assert_eq!(handle.initializations(), 1);
    }
}
