//! Presentation-facing repository.
//!
//! `BookRepository` is what screens talk to. It speaks view templates only,
//! maps them to and from stored rows, and turns point-lookup misses into
//! `None`/`false` instead of errors.

use bookstore_core::catalog::{
    book_to_template, cart_to_template, comment_to_template, format_price_cents, sum_prices,
    template_to_book, template_to_cart, template_to_comment, template_to_wishlist,
    wishlist_to_template, BookTemplate, CartItem, CartTemplate, Comment, CommentTemplate,
    WishlistItem, WishlistTemplate,
};
use bookstore_core::storage::{RepositoryError, Result};
use tokio_stream::{Stream, StreamExt};

use crate::dao::BookDao;

/// Recovers `NotFound` into `None`.
fn found<T>(result: Result<T>) -> Result<Option<T>> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(err) if err.is_not_found() => Ok(None),
        Err(err) => Err(err),
    }
}

/// Template-level access for screens. Cheap to clone.
#[derive(Clone)]
pub struct BookRepository {
    dao: BookDao,
}

impl BookRepository {
    pub fn new(dao: BookDao) -> Self {
        Self { dao }
    }

    pub fn dao(&self) -> &BookDao {
        &self.dao
    }

    // ========================================================================
    // Books
    // ========================================================================

    /// Live book list for the list screen.
    pub fn watch_books(&self) -> impl Stream<Item = Vec<BookTemplate>> + Send + 'static {
        self.dao
            .get_all_books()
            .map(|snapshot| snapshot.rows.iter().map(book_to_template).collect::<Vec<_>>())
    }

    /// Saves books coming from the catalog source. Existing ISBNs are replaced.
    pub async fn save_books(&self, templates: &[BookTemplate]) -> Result<()> {
        let books = templates
            .iter()
            .map(template_to_book)
            .collect::<std::result::Result<Vec<_>, _>>()?;
        self.dao.insert_books(&books).await
    }

    pub async fn search_books(&self, query: &str) -> Result<Vec<BookTemplate>> {
        let books = self.dao.search_books_by_title(query).await?;
        Ok(books.iter().map(book_to_template).collect())
    }

    pub async fn get_book(&self, isbn13: &str) -> Result<Option<BookTemplate>> {
        let book = found(self.dao.get_book_by_id(isbn13).await)?;
        Ok(book.as_ref().map(book_to_template))
    }

    pub async fn count_books(&self) -> Result<usize> {
        self.dao.count_books().await
    }

    /// Evicts a book from the local cache. Wishlist, cart and comments that
    /// mention it are kept.
    pub async fn delete_book(&self, isbn13: &str) -> Result<bool> {
        self.dao.delete_book(isbn13).await
    }

    // ========================================================================
    // Wishlist
    // ========================================================================

    pub async fn get_wishlist(&self) -> Result<Vec<WishlistTemplate>> {
        let items = self.dao.get_book_from_wishlist().await?;
        Ok(items.iter().map(wishlist_to_template).collect())
    }

    pub async fn save_to_wishlist(&self, template: &WishlistTemplate) -> Result<i64> {
        self.dao.insert_wishlist(&template_to_wishlist(template)).await
    }

    pub async fn remove_from_wishlist(&self, id: i64) -> Result<bool> {
        self.dao.remove_from_wishlist(id).await
    }

    /// Adds a stored book to the wishlist. `None` when the book is unknown.
    pub async fn add_book_to_wishlist(&self, isbn13: &str) -> Result<Option<i64>> {
        let Some(book) = found(self.dao.get_book_by_id(isbn13).await)? else {
            return Ok(None);
        };
        let item = WishlistItem::from_book(&book);
        self.dao.insert_wishlist(&item).await.map(Some)
    }

    /// Moves a wishlist item to the cart and returns its new cart id.
    ///
    /// The insert and the removal are separate writes; a failure between
    /// them leaves the book in both lists.
    pub async fn move_wishlist_to_cart(&self, wishlist_id: i64) -> Result<Option<i64>> {
        let Some(item) = found(self.dao.get_wishlist_item(wishlist_id).await)? else {
            return Ok(None);
        };

        let cart_id = self.dao.insert_cart(&CartItem::from(item)).await?;
        self.dao.remove_from_wishlist(wishlist_id).await?;

        tracing::debug!(wishlist_id, cart_id, "Moved wishlist item to cart");
        Ok(Some(cart_id))
    }

    // ========================================================================
    // Cart
    // ========================================================================

    pub async fn get_cart(&self) -> Result<Vec<CartTemplate>> {
        let items = self.dao.get_book_from_cart().await?;
        Ok(items.iter().map(cart_to_template).collect())
    }

    pub async fn save_to_cart(&self, template: &CartTemplate) -> Result<i64> {
        self.dao.insert_cart(&template_to_cart(template)).await
    }

    pub async fn remove_from_cart(&self, id: i64) -> Result<bool> {
        self.dao.remove_from_cart(id).await
    }

    /// Adds a stored book to the cart. `None` when the book is unknown.
    pub async fn add_book_to_cart(&self, isbn13: &str) -> Result<Option<i64>> {
        let Some(book) = found(self.dao.get_book_by_id(isbn13).await)? else {
            return Ok(None);
        };
        self.dao.insert_cart(&CartItem::from_book(&book)).await.map(Some)
    }

    /// Sum of the cart's prices as display text. Prices that don't parse are
    /// left out.
    pub async fn cart_total(&self) -> Result<String> {
        let items = self.dao.get_book_from_cart().await?;
        let (cents, skipped) = sum_prices(items.iter().map(|item| item.price.as_str()));
        if !skipped.is_empty() {
            tracing::debug!(?skipped, "Skipped unparseable cart prices");
        }
        Ok(format_price_cents(cents))
    }

    /// Buys one cart item. Returns false when it was no longer in the cart.
    pub async fn purchase_cart_item(&self, id: i64) -> Result<bool> {
        let purchased = self.dao.remove_from_cart(id).await?;
        tracing::debug!(id, purchased, "Purchased cart item");
        Ok(purchased)
    }

    /// Buys everything currently in the cart and returns what was bought.
    /// Items added while the purchase runs stay in the cart.
    pub async fn purchase_cart(&self) -> Result<Vec<CartTemplate>> {
        let items = self.dao.get_book_from_cart().await?;
        self.purchase_items(items).await
    }

    /// Removes exactly `items` from the cart. Items already gone are left out
    /// of the result.
    async fn purchase_items(&self, items: Vec<CartItem>) -> Result<Vec<CartTemplate>> {
        let mut purchased = Vec::with_capacity(items.len());
        for item in items {
            let Some(id) = item.id else {
                continue;
            };
            if self.dao.remove_from_cart(id).await? {
                purchased.push(cart_to_template(&item));
            }
        }

        tracing::debug!(count = purchased.len(), "Purchased cart");
        Ok(purchased)
    }

    // ========================================================================
    // Comments
    // ========================================================================

    pub async fn get_comments(&self, isbn13: &str) -> Result<Vec<CommentTemplate>> {
        let comments = self.dao.get_comments_by_isbn13(isbn13).await?;
        Ok(comments.iter().map(comment_to_template).collect())
    }

    pub async fn get_comment(&self, id: i64) -> Result<Option<CommentTemplate>> {
        let comment = found(self.dao.get_comment_by_id(id).await)?;
        Ok(comment.as_ref().map(comment_to_template))
    }

    pub async fn save_comment(&self, template: &CommentTemplate) -> Result<i64> {
        self.dao.insert_comment(&template_to_comment(template)?).await
    }

    /// Writes a new comment stamped with the current time.
    pub async fn add_comment(&self, isbn13: &str, text: &str) -> Result<i64> {
        self.dao.insert_comment(&Comment::new(isbn13, text)).await
    }

    /// Replaces a comment's text, keeping its book and timestamp. Returns
    /// false when the comment doesn't exist.
    pub async fn edit_comment(&self, id: i64, text: &str) -> Result<bool> {
        let Some(mut comment) = found(self.dao.get_comment_by_id(id).await)? else {
            return Ok(false);
        };
        comment.text = text.to_string();

        match self.dao.update_comment(&comment).await {
            Ok(()) => Ok(true),
            Err(RepositoryError::NotFound { .. }) => Ok(false),
            Err(err) => Err(err),
        }
    }

    pub async fn delete_comment(&self, template: &CommentTemplate) -> Result<bool> {
        self.dao.delete_comment(&template_to_comment(template)?).await
    }
}
