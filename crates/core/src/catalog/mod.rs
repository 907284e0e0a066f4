mod error;
mod operations;
mod templates;
mod types;

pub use error::CatalogError;
pub use operations::{
    format_price_cents, parse_price_cents, sum_prices, validate_isbn13, validate_optional_row_id,
    validate_row_id,
};
pub use templates::{
    book_to_template, cart_to_template, comment_to_template, template_to_book, template_to_cart,
    template_to_comment, template_to_wishlist, wishlist_to_template, BookTemplate, CartTemplate,
    CommentTemplate, WishlistTemplate,
};
pub use types::{Book, CartItem, Comment, WishlistItem};
