use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A catalog book, keyed by its ISBN-13.
///
/// Books are reference data imported in bulk from the external catalog
/// source. Re-importing a book with the same `isbn13` replaces the row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    pub isbn13: String,
    pub title: String,
    pub subtitle: String,
    /// Display price as delivered by the catalog (e.g. `"$32.04"`).
    pub price: String,
    /// Cover image URL.
    pub image: String,
    /// Detail page URL.
    pub url: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub authors: String,
    #[serde(default)]
    pub pages: u32,
    /// Rating from 0 to 5.
    #[serde(default)]
    pub rating: u8,
}

impl Book {
    /// Creates a book with the listing fields set and empty detail fields.
    pub fn new(
        isbn13: impl Into<String>,
        title: impl Into<String>,
        price: impl Into<String>,
    ) -> Self {
        Self {
            isbn13: isbn13.into(),
            title: title.into(),
            subtitle: String::new(),
            price: price.into(),
            image: String::new(),
            url: String::new(),
            description: String::new(),
            authors: String::new(),
            pages: 0,
            rating: 0,
        }
    }

    /// Sets the subtitle for this book.
    pub fn with_subtitle(mut self, subtitle: impl Into<String>) -> Self {
        self.subtitle = subtitle.into();
        self
    }

    /// Sets the cover image and detail URLs.
    pub fn with_links(mut self, image: impl Into<String>, url: impl Into<String>) -> Self {
        self.image = image.into();
        self.url = url.into();
        self
    }

    /// Sets the detail fields fetched from the book's detail page.
    pub fn with_details(
        mut self,
        description: impl Into<String>,
        authors: impl Into<String>,
        pages: u32,
        rating: u8,
    ) -> Self {
        self.description = description.into();
        self.authors = authors.into();
        self.pages = pages;
        self.rating = rating;
        self
    }
}

/// A book saved to the user's wishlist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WishlistItem {
    /// Row id. `None` lets the store assign one on insert.
    pub id: Option<i64>,
    pub isbn13: String,
    pub title: String,
    pub subtitle: String,
    pub price: String,
    pub image: String,
    pub url: String,
}

impl WishlistItem {
    /// Creates an unsaved wishlist item from a catalog book.
    pub fn from_book(book: &Book) -> Self {
        Self {
            id: None,
            isbn13: book.isbn13.clone(),
            title: book.title.clone(),
            subtitle: book.subtitle.clone(),
            price: book.price.clone(),
            image: book.image.clone(),
            url: book.url.clone(),
        }
    }

    /// Sets a specific ID (useful for replace-by-id writes and tests).
    pub fn with_id(mut self, id: i64) -> Self {
        self.id = Some(id);
        self
    }
}

/// A book placed in the user's shopping cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartItem {
    /// Row id. `None` lets the store assign one on insert.
    pub id: Option<i64>,
    pub isbn13: String,
    pub title: String,
    pub subtitle: String,
    pub price: String,
    pub image: String,
    pub url: String,
}

impl CartItem {
    /// Creates an unsaved cart item from a catalog book.
    pub fn from_book(book: &Book) -> Self {
        Self {
            id: None,
            isbn13: book.isbn13.clone(),
            title: book.title.clone(),
            subtitle: book.subtitle.clone(),
            price: book.price.clone(),
            image: book.image.clone(),
            url: book.url.clone(),
        }
    }

    /// Sets a specific ID (useful for replace-by-id writes and tests).
    pub fn with_id(mut self, id: i64) -> Self {
        self.id = Some(id);
        self
    }
}

impl From<WishlistItem> for CartItem {
    /// Moves a wishlist selection into the cart. The id is dropped since the
    /// two tables do not share an id space.
    fn from(item: WishlistItem) -> Self {
        Self {
            id: None,
            isbn13: item.isbn13,
            title: item.title,
            subtitle: item.subtitle,
            price: item.price,
            image: item.image,
            url: item.url,
        }
    }
}

/// A user comment on a book.
///
/// `isbn13` is not required to reference a stored book.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    /// Row id. `None` lets the store assign one on insert.
    pub id: Option<i64>,
    pub isbn13: String,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

impl Comment {
    /// Creates an unsaved comment stamped with the current time.
    pub fn new(isbn13: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: None,
            isbn13: isbn13.into(),
            text: text.into(),
            created_at: Utc::now(),
        }
    }

    /// Sets a specific ID (useful for replace-by-id writes and tests).
    pub fn with_id(mut self, id: i64) -> Self {
        self.id = Some(id);
        self
    }

    /// Sets the creation timestamp.
    pub fn with_created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = created_at;
        self
    }
}
