use async_trait::async_trait;
use tokio::sync::broadcast;

use crate::catalog::{Book, CartItem, Comment, WishlistItem};

use super::{Result, Table, TableChange};

/// Storage for catalog books, keyed by ISBN-13.
#[async_trait]
pub trait BookStore: Send + Sync {
    /// Gets every stored book, ordered by ISBN-13.
    async fn list_books(&self) -> Result<Vec<Book>>;

    /// Inserts books, replacing any existing row with the same ISBN-13.
    async fn insert_books(&self, books: &[Book]) -> Result<()>;

    /// Gets books whose title contains `query`, ordered by title.
    async fn search_books_by_title(&self, query: &str) -> Result<Vec<Book>>;

    /// Gets a book by its ISBN-13. Fails with `NotFound` when absent.
    async fn get_book_by_id(&self, isbn13: &str) -> Result<Book>;

    /// Deletes a book. Returns false when no row matched.
    async fn delete_book(&self, isbn13: &str) -> Result<bool>;

    /// Counts stored books.
    async fn count_books(&self) -> Result<usize>;
}

/// Storage for wishlist selections.
#[async_trait]
pub trait WishlistStore: Send + Sync {
    /// Gets all wishlist items, ordered by id.
    async fn list_wishlist(&self) -> Result<Vec<WishlistItem>>;

    /// Gets a wishlist item by id. Fails with `NotFound` when absent.
    async fn get_wishlist_item(&self, id: i64) -> Result<WishlistItem>;

    /// Inserts an item, replacing the row with the same id. Returns the id.
    async fn insert_wishlist(&self, item: &WishlistItem) -> Result<i64>;

    /// Removes an item. Returns false when no row matched.
    async fn remove_from_wishlist(&self, id: i64) -> Result<bool>;
}

/// Storage for cart selections.
#[async_trait]
pub trait CartStore: Send + Sync {
    /// Gets all cart items, ordered by id.
    async fn list_cart(&self) -> Result<Vec<CartItem>>;

    /// Inserts an item, replacing the row with the same id. Returns the id.
    async fn insert_cart(&self, item: &CartItem) -> Result<i64>;

    /// Removes an item. Returns false when no row matched.
    async fn remove_from_cart(&self, id: i64) -> Result<bool>;

    /// Removes every item. Returns the number of rows removed.
    async fn clear_cart(&self) -> Result<usize>;
}

/// Storage for book comments.
#[async_trait]
pub trait CommentStore: Send + Sync {
    /// Gets the comments for a book, oldest first.
    async fn list_comments_by_isbn(&self, isbn13: &str) -> Result<Vec<Comment>>;

    /// Gets a comment by id. Fails with `NotFound` when absent.
    async fn get_comment_by_id(&self, id: i64) -> Result<Comment>;

    /// Inserts a comment, replacing the row with the same id. Returns the id.
    async fn insert_comment(&self, comment: &Comment) -> Result<i64>;

    /// Updates an existing comment. Fails with `NotFound` when absent.
    async fn update_comment(&self, comment: &Comment) -> Result<()>;

    /// Deletes the comment with the same id. Returns false when no row matched.
    async fn delete_comment(&self, comment: &Comment) -> Result<bool>;
}

/// Trait for table-change pub/sub operations.
pub trait ChangePubSub: Send + Sync {
    /// Publishes a change to the subscribers of its table.
    fn publish(&self, change: TableChange);

    /// Subscribes to changes of a single table.
    fn subscribe(&self, table: Table) -> broadcast::Receiver<TableChange>;
}

/// Combined trait for stores that cover the whole schema.
pub trait FullStore: BookStore + WishlistStore + CartStore + CommentStore {}

impl<T: BookStore + WishlistStore + CartStore + CommentStore> FullStore for T {}
