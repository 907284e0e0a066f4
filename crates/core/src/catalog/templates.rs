//! Presentation-facing view templates and their mappings.
//!
//! Each mapping is a pure, exhaustive field-by-field function so that adding
//! a field to an entity fails to compile until both directions handle it.
//! Round-tripping a template through its entity preserves every field needed
//! for a subsequent write.

use chrono::DateTime;
use serde::{Deserialize, Serialize};

use super::error::CatalogError;
use super::types::{Book, CartItem, Comment, WishlistItem};

/// Highest rating the catalog hands out.
const MAX_RATING: u8 = 5;

/// Book as shown on the list and detail screens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookTemplate {
    pub title: String,
    pub subtitle: String,
    pub isbn13: String,
    pub price: String,
    pub image: String,
    pub url: String,
    pub desc: String,
    pub authors: String,
    pub pages: String,
    pub rating: String,
}

/// Wishlist row as shown on the wishlist screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WishlistTemplate {
    pub id: Option<i64>,
    pub isbn13: String,
    pub title: String,
    pub subtitle: String,
    pub price: String,
    pub image: String,
    pub url: String,
}

/// Cart row as shown on the cart screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartTemplate {
    pub id: Option<i64>,
    pub isbn13: String,
    pub title: String,
    pub subtitle: String,
    pub price: String,
    pub image: String,
    pub url: String,
}

/// Comment as shown under a book, with the timestamp in unix milliseconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentTemplate {
    pub id: Option<i64>,
    pub isbn13: String,
    pub comment: String,
    pub created_at: i64,
}

// ============================================================================
// Book
// ============================================================================

pub fn book_to_template(book: &Book) -> BookTemplate {
    BookTemplate {
        title: book.title.clone(),
        subtitle: book.subtitle.clone(),
        isbn13: book.isbn13.clone(),
        price: book.price.clone(),
        image: book.image.clone(),
        url: book.url.clone(),
        desc: book.description.clone(),
        authors: book.authors.clone(),
        pages: book.pages.to_string(),
        rating: book.rating.to_string(),
    }
}

/// Converts a template back to a book row.
///
/// Empty `pages`/`rating` are read as 0, matching listing-only catalog data.
pub fn template_to_book(template: &BookTemplate) -> Result<Book, CatalogError> {
    let pages = parse_count("pages", &template.pages)?;
    let rating = parse_count("rating", &template.rating)?;
    let rating = u8::try_from(rating)
        .ok()
        .filter(|rating| *rating <= MAX_RATING)
        .ok_or_else(|| CatalogError::InvalidNumber {
            field: "rating",
            value: template.rating.clone(),
        })?;

    Ok(Book {
        isbn13: template.isbn13.clone(),
        title: template.title.clone(),
        subtitle: template.subtitle.clone(),
        price: template.price.clone(),
        image: template.image.clone(),
        url: template.url.clone(),
        description: template.desc.clone(),
        authors: template.authors.clone(),
        pages,
        rating,
    })
}

// ============================================================================
// Wishlist / cart
// ============================================================================

pub fn wishlist_to_template(item: &WishlistItem) -> WishlistTemplate {
    WishlistTemplate {
        id: item.id,
        isbn13: item.isbn13.clone(),
        title: item.title.clone(),
        subtitle: item.subtitle.clone(),
        price: item.price.clone(),
        image: item.image.clone(),
        url: item.url.clone(),
    }
}

pub fn template_to_wishlist(template: &WishlistTemplate) -> WishlistItem {
    WishlistItem {
        id: template.id,
        isbn13: template.isbn13.clone(),
        title: template.title.clone(),
        subtitle: template.subtitle.clone(),
        price: template.price.clone(),
        image: template.image.clone(),
        url: template.url.clone(),
    }
}

pub fn cart_to_template(item: &CartItem) -> CartTemplate {
    CartTemplate {
        id: item.id,
        isbn13: item.isbn13.clone(),
        title: item.title.clone(),
        subtitle: item.subtitle.clone(),
        price: item.price.clone(),
        image: item.image.clone(),
        url: item.url.clone(),
    }
}

pub fn template_to_cart(template: &CartTemplate) -> CartItem {
    CartItem {
        id: template.id,
        isbn13: template.isbn13.clone(),
        title: template.title.clone(),
        subtitle: template.subtitle.clone(),
        price: template.price.clone(),
        image: template.image.clone(),
        url: template.url.clone(),
    }
}

// ============================================================================
// Comment
// ============================================================================

pub fn comment_to_template(comment: &Comment) -> CommentTemplate {
    CommentTemplate {
        id: comment.id,
        isbn13: comment.isbn13.clone(),
        comment: comment.text.clone(),
        created_at: comment.created_at.timestamp_millis(),
    }
}

pub fn template_to_comment(template: &CommentTemplate) -> Result<Comment, CatalogError> {
    let created_at = DateTime::from_timestamp_millis(template.created_at).ok_or_else(|| {
        CatalogError::InvalidNumber {
            field: "created_at",
            value: template.created_at.to_string(),
        }
    })?;

    Ok(Comment {
        id: template.id,
        isbn13: template.isbn13.clone(),
        text: template.comment.clone(),
        created_at,
    })
}

fn parse_count(field: &'static str, value: &str) -> Result<u32, CatalogError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Ok(0);
    }
    trimmed.parse().map_err(|_| CatalogError::InvalidNumber {
        field,
        value: value.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn detailed_book() -> Book {
        Book::new("9781484206485", "Practical Modern JavaScript", "$29.99")
            .with_subtitle("Dive into ES6")
            .with_links("https://img/1.png", "https://books/1")
            .with_details("A deep dive.", "Nicolas Bevacqua", 334, 4)
    }

    #[test]
    fn test_book_to_template_formats_numbers() {
        let template = book_to_template(&detailed_book());

        assert_eq!(template.desc, "A deep dive.");
        assert_eq!(template.pages, "334");
        assert_eq!(template.rating, "4");
        assert_eq!(template.price, "$29.99");
    }

    #[test]
    fn test_book_template_round_trip() {
        let book = detailed_book();
        let back = template_to_book(&book_to_template(&book)).unwrap();
        assert_eq!(back, book);
    }

    #[test]
    fn test_template_to_book_empty_counts_are_zero() {
        let mut template = book_to_template(&detailed_book());
        template.pages = String::new();
        template.rating = " ".to_string();

        let book = template_to_book(&template).unwrap();

        assert_eq!(book.pages, 0);
        assert_eq!(book.rating, 0);
    }

    #[test]
    fn test_template_to_book_rejects_bad_numbers() {
        let mut template = book_to_template(&detailed_book());
        template.pages = "lots".to_string();
        assert_eq!(
            template_to_book(&template),
            Err(CatalogError::InvalidNumber {
                field: "pages",
                value: "lots".to_string()
            })
        );

        let mut template = book_to_template(&detailed_book());
        template.rating = "9".to_string();
        assert!(matches!(
            template_to_book(&template),
            Err(CatalogError::InvalidNumber { field: "rating", .. })
        ));
    }

    #[test]
    fn test_wishlist_and_cart_templates_keep_write_fields() {
        let item = WishlistItem::from_book(&detailed_book()).with_id(4);
        let template = wishlist_to_template(&item);
        assert_eq!(template.id, Some(4));
        assert_eq!(template_to_wishlist(&template), item);

        let item = CartItem::from_book(&detailed_book());
        let template = cart_to_template(&item);
        assert_eq!(template.id, None);
        assert_eq!(template_to_cart(&template), item);
    }

    #[test]
    fn test_comment_template_uses_millis() {
        let created_at = Utc.with_ymd_and_hms(2024, 12, 1, 8, 30, 0).unwrap();
        let comment = Comment::new("978-1", "Great read")
            .with_id(2)
            .with_created_at(created_at);

        let template = comment_to_template(&comment);

        assert_eq!(template.comment, "Great read");
        assert_eq!(template.created_at, created_at.timestamp_millis());
        assert_eq!(template_to_comment(&template).unwrap(), comment);
    }

    #[test]
    fn test_template_to_comment_rejects_out_of_range_timestamp() {
        let template = CommentTemplate {
            id: None,
            isbn13: "978-1".to_string(),
            comment: "x".to_string(),
            created_at: i64::MAX,
        };
        assert!(matches!(
            template_to_comment(&template),
            Err(CatalogError::InvalidNumber { field: "created_at", .. })
        ));
    }
}
