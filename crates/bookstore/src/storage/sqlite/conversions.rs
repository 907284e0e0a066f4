//! SQLite row conversion functions.
//!
//! Pure functions for converting between SQLite rows and catalog types.
//! These are testable in isolation without database access.

use bookstore_core::catalog::{Book, CartItem, Comment, WishlistItem};
use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::Row;

// ============================================================================
// Book conversions
// ============================================================================

/// Convert a SQLite row to a Book.
///
/// Expected columns: isbn13, title, subtitle, price, image, url, description, authors, pages, rating
pub fn row_to_book(row: &Row) -> rusqlite::Result<Book> {
    Ok(Book {
        isbn13: row.get(0)?,
        title: row.get(1)?,
        subtitle: row.get(2)?,
        price: row.get(3)?,
        image: row.get(4)?,
        url: row.get(5)?,
        description: row.get(6)?,
        authors: row.get(7)?,
        pages: row.get(8)?,
        rating: row.get(9)?,
    })
}

// ============================================================================
// Wishlist / cart conversions
// ============================================================================

/// Convert a SQLite row to a WishlistItem.
///
/// Expected columns: id, isbn13, title, subtitle, price, image, url
pub fn row_to_wishlist(row: &Row) -> rusqlite::Result<WishlistItem> {
    Ok(WishlistItem {
        id: Some(row.get(0)?),
        isbn13: row.get(1)?,
        title: row.get(2)?,
        subtitle: row.get(3)?,
        price: row.get(4)?,
        image: row.get(5)?,
        url: row.get(6)?,
    })
}

/// Convert a SQLite row to a CartItem.
///
/// Expected columns: id, isbn13, title, subtitle, price, image, url
pub fn row_to_cart(row: &Row) -> rusqlite::Result<CartItem> {
    Ok(CartItem {
        id: Some(row.get(0)?),
        isbn13: row.get(1)?,
        title: row.get(2)?,
        subtitle: row.get(3)?,
        price: row.get(4)?,
        image: row.get(5)?,
        url: row.get(6)?,
    })
}

// ============================================================================
// Comment conversions
// ============================================================================

/// Convert a SQLite row to a Comment.
///
/// Expected columns: id, isbn13, text, created_at
pub fn row_to_comment(row: &Row) -> rusqlite::Result<Comment> {
    let created_at: String = row.get(3)?;

    Ok(Comment {
        id: Some(row.get(0)?),
        isbn13: row.get(1)?,
        text: row.get(2)?,
        created_at: parse_datetime(&created_at)?,
    })
}

// ============================================================================
// Helper functions
// ============================================================================

/// Parse a datetime from RFC 3339 string.
fn parse_datetime(s: &str) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(3, rusqlite::types::Type::Text, Box::new(e))
        })
}

/// Format a DateTime<Utc> for SQLite storage.
///
/// Fixed-width RFC 3339 with nanoseconds, so text order equals time order.
pub fn format_datetime(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Nanos, true)
}

/// Escape `LIKE` wildcards so the search needle matches literally.
///
/// Pairs with `ESCAPE '\'` in the search query.
pub fn escape_like(needle: &str) -> String {
    let mut escaped = String::with_capacity(needle.len());
    for c in needle.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
