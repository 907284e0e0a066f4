//! Change notification and live queries.
//!
//! Writes go through [`NotifyingStore`], which publishes a `TableChange` on
//! the [`MemoryPubSub`] channel of the touched table once the write has
//! committed. A [`LiveQuery`] listens to one table and keeps a snapshot of its
//! query fresh for any number of subscribers.

mod feed;
mod notifying;
mod pubsub;

pub use feed::{LiveQuery, Snapshot};
pub use notifying::NotifyingStore;
pub use pubsub::{MemoryPubSub, DEFAULT_CHANNEL_CAPACITY};
