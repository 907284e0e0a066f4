//! In-memory pub/sub implementation.
//!
//! Provides a thread-safe change feed for store tables using tokio
//! broadcast channels.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::broadcast;

use bookstore_core::storage::{ChangePubSub, Table, TableChange};

/// Default channel capacity for change messages.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 100;

/// In-memory pub/sub implementation.
///
/// Each table has its own channel for targeted change delivery. Channels are
/// created up front, so publishing never takes a lock.
#[derive(Debug, Clone)]
pub struct MemoryPubSub {
    channels: Arc<HashMap<Table, broadcast::Sender<TableChange>>>,
}

impl MemoryPubSub {
    /// Creates a pub/sub instance with one channel per table.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        let channels: HashMap<_, _> = Table::ALL
            .into_iter()
            .map(|table| (table, broadcast::channel(capacity).0))
            .collect();

        Self {
            channels: Arc::new(channels),
        }
    }

    fn channel(&self, table: Table) -> &broadcast::Sender<TableChange> {
        // Every table gets a channel in `new`.
        &self.channels[&table]
    }
}

impl Default for MemoryPubSub {
    fn default() -> Self {
        Self::new(DEFAULT_CHANNEL_CAPACITY)
    }
}

impl ChangePubSub for MemoryPubSub {
    fn publish(&self, change: TableChange) {
        // No receivers just means nobody is watching this table.
        let receivers = self.channel(change.table).send(change).unwrap_or(0);
        tracing::trace!(table = %change.table, seq = change.seq, receivers, "Published table change");
    }

    fn subscribe(&self, table: Table) -> broadcast::Receiver<TableChange> {
        self.channel(table).subscribe()
    }
}
