mod error;
mod traits;
mod types;

pub use error::{RepositoryError, Result};
pub use traits::{BookStore, CartStore, ChangePubSub, CommentStore, FullStore, WishlistStore};
pub use types::{SchemaStatus, Table, TableChange};
