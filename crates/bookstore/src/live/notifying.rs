//! Change-publishing store decorator.
//!
//! Wraps a store with event publishing so live queries learn about every
//! committed mutation.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;

use bookstore_core::catalog::{Book, CartItem, Comment, WishlistItem};
use bookstore_core::storage::{
    BookStore, CartStore, ChangePubSub, CommentStore, Result, Table, TableChange, WishlistStore,
};

/// Change-publishing store decorator.
///
/// - **Reads**: Pass straight through to the underlying store
/// - **Writes**: Persist to the store, then publish a [`TableChange`] for the
///   affected table. Writes that change nothing publish nothing.
///
/// # Type Parameters
///
/// * `R` - The underlying store implementation
/// * `P` - The pub/sub implementation
pub struct NotifyingStore<R, P> {
    store: Arc<R>,
    pubsub: Arc<P>,
    seq: AtomicU64,
    /// Last sequence published per table, indexed by [`slot`].
    table_seqs: [AtomicU64; Table::ALL.len()],
}

fn slot(table: Table) -> usize {
    match table {
        Table::Books => 0,
        Table::Wishlist => 1,
        Table::Cart => 2,
        Table::Comments => 3,
    }
}

impl<R, P> NotifyingStore<R, P>
where
    P: ChangePubSub,
{
    /// Creates a new notifying store.
    pub fn new(store: Arc<R>, pubsub: Arc<P>) -> Self {
        Self {
            store,
            pubsub,
            seq: AtomicU64::new(0),
            table_seqs: Default::default(),
        }
    }

    /// The wrapped store, for reads that must not go through the decorator.
    pub fn inner(&self) -> &Arc<R> {
        &self.store
    }

    /// Sequence number of the most recent published change, 0 before any.
    pub fn last_seq(&self) -> u64 {
        self.seq.load(Ordering::SeqCst)
    }

    /// Sequence number of the most recent change published for `table`, 0
    /// before any. A write to `table` is covered by this value once the write
    /// returns.
    pub fn last_table_seq(&self, table: Table) -> u64 {
        self.table_seqs[slot(table)].load(Ordering::SeqCst)
    }

    fn notify(&self, table: Table) {
        let seq = self.seq.fetch_add(1, Ordering::SeqCst) + 1;
        self.table_seqs[slot(table)].fetch_max(seq, Ordering::SeqCst);
        self.pubsub.publish(TableChange::new(table, seq));
    }
}

#[async_trait]
impl<R, P> BookStore for NotifyingStore<R, P>
where
    R: BookStore + 'static,
    P: ChangePubSub + 'static,
{
    async fn list_books(&self) -> Result<Vec<Book>> {
        self.store.list_books().await
    }

    async fn insert_books(&self, books: &[Book]) -> Result<()> {
        if books.is_empty() {
            return Ok(());
        }

        self.store.insert_books(books).await?;
        self.notify(Table::Books);

        tracing::debug!(count = books.len(), "Inserted books and published change");
        Ok(())
    }

    async fn search_books_by_title(&self, query: &str) -> Result<Vec<Book>> {
        self.store.search_books_by_title(query).await
    }

    async fn get_book_by_id(&self, isbn13: &str) -> Result<Book> {
        self.store.get_book_by_id(isbn13).await
    }

    async fn delete_book(&self, isbn13: &str) -> Result<bool> {
        let deleted = self.store.delete_book(isbn13).await?;
        if deleted {
            self.notify(Table::Books);
            tracing::debug!(%isbn13, "Deleted book and published change");
        }
        Ok(deleted)
    }

    async fn count_books(&self) -> Result<usize> {
        self.store.count_books().await
    }
}

#[async_trait]
impl<R, P> WishlistStore for NotifyingStore<R, P>
where
    R: WishlistStore + 'static,
    P: ChangePubSub + 'static,
{
    async fn list_wishlist(&self) -> Result<Vec<WishlistItem>> {
        self.store.list_wishlist().await
    }

    async fn get_wishlist_item(&self, id: i64) -> Result<WishlistItem> {
        self.store.get_wishlist_item(id).await
    }

    async fn insert_wishlist(&self, item: &WishlistItem) -> Result<i64> {
        let id = self.store.insert_wishlist(item).await?;
        self.notify(Table::Wishlist);

        tracing::debug!(id, isbn13 = %item.isbn13, "Inserted wishlist item and published change");
        Ok(id)
    }

    async fn remove_from_wishlist(&self, id: i64) -> Result<bool> {
        let removed = self.store.remove_from_wishlist(id).await?;
        if removed {
            self.notify(Table::Wishlist);
            tracing::debug!(id, "Removed wishlist item and published change");
        }
        Ok(removed)
    }
}

#[async_trait]
impl<R, P> CartStore for NotifyingStore<R, P>
where
    R: CartStore + 'static,
    P: ChangePubSub + 'static,
{
    async fn list_cart(&self) -> Result<Vec<CartItem>> {
        self.store.list_cart().await
    }

    async fn insert_cart(&self, item: &CartItem) -> Result<i64> {
        let id = self.store.insert_cart(item).await?;
        self.notify(Table::Cart);

        tracing::debug!(id, isbn13 = %item.isbn13, "Inserted cart item and published change");
        Ok(id)
    }

    async fn remove_from_cart(&self, id: i64) -> Result<bool> {
        let removed = self.store.remove_from_cart(id).await?;
        if removed {
            self.notify(Table::Cart);
            tracing::debug!(id, "Removed cart item and published change");
        }
        Ok(removed)
    }

    async fn clear_cart(&self) -> Result<usize> {
        let removed = self.store.clear_cart().await?;
        if removed > 0 {
            self.notify(Table::Cart);
            tracing::debug!(removed, "Cleared cart and published change");
        }
        Ok(removed)
    }
}

#[async_trait]
impl<R, P> CommentStore for NotifyingStore<R, P>
where
    R: CommentStore + 'static,
    P: ChangePubSub + 'static,
{
    async fn list_comments_by_isbn(&self, isbn13: &str) -> Result<Vec<Comment>> {
        self.store.list_comments_by_isbn(isbn13).await
    }

    async fn get_comment_by_id(&self, id: i64) -> Result<Comment> {
        self.store.get_comment_by_id(id).await
    }

    async fn insert_comment(&self, comment: &Comment) -> Result<i64> {
        let id = self.store.insert_comment(comment).await?;
        self.notify(Table::Comments);

        tracing::debug!(id, isbn13 = %comment.isbn13, "Inserted comment and published change");
        Ok(id)
    }

    async fn update_comment(&self, comment: &Comment) -> Result<()> {
        self.store.update_comment(comment).await?;
        self.notify(Table::Comments);

        tracing::debug!(id = ?comment.id, "Updated comment and published change");
        Ok(())
    }

    async fn delete_comment(&self, comment: &Comment) -> Result<bool> {
        let deleted = self.store.delete_comment(comment).await?;
        if deleted {
            self.notify(Table::Comments);
            tracing::debug!(id = ?comment.id, "Deleted comment and published change");
        }
        Ok(deleted)
    }
}
