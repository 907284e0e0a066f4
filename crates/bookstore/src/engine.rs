//! The storage engine: the SQLite store, its change notifier and the live
//! book list.
//!
//! Every mutation goes through [`EngineStore`], which persists first and then
//! publishes an invalidation for the touched table.

use std::pin::Pin;
use std::sync::Arc;

use tokio_stream::Stream;

use bookstore_core::catalog::Book;
use bookstore_core::storage::{BookStore, ChangePubSub, Result, SchemaStatus, Table};

use crate::config::{Config, StoreLocation};
use crate::live::{LiveQuery, MemoryPubSub, NotifyingStore, Snapshot};
use crate::storage::SqliteStore;

/// The store every engine write goes through.
pub type EngineStore = NotifyingStore<SqliteStore, MemoryPubSub>;

/// A snapshot of the full book list.
pub type BookSnapshot = Snapshot<Book>;

/// Live feed of the full book list. Yields the current snapshot first, then
/// one per refresh. Dropping it cancels the subscription.
pub type BookFeed = Pin<Box<dyn Stream<Item = BookSnapshot> + Send>>;

/// An open store with its change notifier and live book list.
pub struct Engine {
    store: EngineStore,
    books: LiveQuery<Book>,
    schema_status: SchemaStatus,
}

impl Engine {
    /// Opens the store described by `config` and starts the live book list.
    pub async fn open(config: &Config) -> Result<Self> {
        let sqlite = match &config.store {
            StoreLocation::File(path) => {
                SqliteStore::open(path, config.reset_on_version_mismatch).await?
            }
            StoreLocation::Memory => SqliteStore::open_in_memory().await?,
        };
        let schema_status = sqlite.schema_status();

        let sqlite = Arc::new(sqlite);
        let pubsub = Arc::new(MemoryPubSub::new(config.change_channel_capacity));
        let store = NotifyingStore::new(sqlite.clone(), pubsub.clone());

        // Subscribe before the initial query so no later write is missed.
        let changes = pubsub.subscribe(Table::Books);
        let books = LiveQuery::open(Table::Books, changes, store.last_table_seq(Table::Books), move || {
            let sqlite = sqlite.clone();
            async move { sqlite.list_books().await }
        })
        .await?;

        tracing::info!(
            store = ?config.store,
            schema = ?schema_status,
            books = books.current().rows.len(),
            "Storage engine ready"
        );

        Ok(Self {
            store,
            books,
            schema_status,
        })
    }

    /// The store all reads and writes go through.
    pub fn store(&self) -> &EngineStore {
        &self.store
    }

    /// What happened to the schema when the engine was opened.
    pub fn schema_status(&self) -> SchemaStatus {
        self.schema_status
    }

    /// Subscribes to the full book list. The first snapshot reflects every
    /// books write acknowledged before this call.
    pub fn watch_books(&self) -> BookFeed {
        let acknowledged = self.store.last_table_seq(Table::Books);
        Box::pin(self.books.subscribe_from(acknowledged))
    }

    /// The book list as of this call, without subscribing.
    pub async fn books_snapshot(&self) -> BookSnapshot {
        let acknowledged = self.store.last_table_seq(Table::Books);
        self.books.current_from(acknowledged).await
    }
}
