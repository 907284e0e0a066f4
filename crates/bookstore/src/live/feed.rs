//! Live queries over a single table.
//!
//! A [`LiveQuery`] owns a dispatcher task that listens to one table's change
//! channel and re-runs its query after each burst of changes. Subscribers
//! read snapshots through a `watch` channel, so a slow subscriber only ever
//! skips intermediate snapshots and never sees an older one after a newer one.

use std::future::Future;
use std::sync::Arc;

use tokio::sync::broadcast::error::{RecvError, TryRecvError};
use tokio::sync::{broadcast, watch};
use tokio::task::JoinHandle;
use tokio_stream::Stream;

use bookstore_core::storage::{Result, Table, TableChange};

/// A query result at a point in time.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot<T> {
    /// Highest change sequence number folded into this snapshot. The initial
    /// snapshot carries the sequence current when the query was opened.
    pub version: u64,
    pub rows: Arc<Vec<T>>,
}

impl<T> Snapshot<T> {
    fn new(version: u64, rows: Vec<T>) -> Self {
        Self {
            version,
            rows: Arc::new(rows),
        }
    }
}

/// A query kept fresh by its table's change channel.
///
/// Dropping the `LiveQuery` stops the dispatcher; open feeds then end after
/// yielding the last snapshot.
pub struct LiveQuery<T> {
    table: Table,
    snapshots: watch::Receiver<Snapshot<T>>,
    dispatcher: JoinHandle<()>,
}

impl<T> LiveQuery<T>
where
    T: Clone + Send + Sync + 'static,
{
    /// Runs the initial query and starts the dispatcher.
    ///
    /// `changes` must be subscribed before this is called, so no change
    /// committed after the initial query can be missed. `version` is the
    /// change sequence at subscription time.
    pub async fn open<F, Fut>(
        table: Table,
        changes: broadcast::Receiver<TableChange>,
        version: u64,
        query: F,
    ) -> Result<Self>
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Vec<T>>> + Send + 'static,
    {
        let initial = query().await?;
        tracing::debug!(%table, version, rows = initial.len(), "Opened live query");

        let (sender, snapshots) = watch::channel(Snapshot::new(version, initial));
        let dispatcher = tokio::spawn(dispatch(table, changes, sender, query));

        Ok(Self {
            table,
            snapshots,
            dispatcher,
        })
    }

    /// The table this query watches.
    pub fn table(&self) -> Table {
        self.table
    }

    /// The most recent snapshot.
    pub fn current(&self) -> Snapshot<T> {
        self.snapshots.borrow().clone()
    }

    /// The first snapshot whose version is at least `version`.
    ///
    /// Waits for the dispatcher to fold that change in. If the dispatcher
    /// has stopped, returns the last snapshot it published.
    pub async fn current_from(&self, version: u64) -> Snapshot<T> {
        let mut snapshots = self.snapshots.clone();
        let _ = snapshots.wait_for(|snapshot| snapshot.version >= version).await;
        let current = snapshots.borrow().clone();
        current
    }

    /// Opens a feed that yields the current snapshot immediately and then
    /// every newer one. Dropping the feed cancels it.
    pub fn subscribe(&self) -> impl Stream<Item = Snapshot<T>> + Send + 'static {
        self.subscribe_from(0)
    }

    /// Like [`subscribe`](Self::subscribe), but the first snapshot folds in
    /// at least change `version`.
    pub fn subscribe_from(&self, version: u64) -> impl Stream<Item = Snapshot<T>> + Send + 'static {
        let mut snapshots = self.snapshots.clone();

        async_stream::stream! {
            let _ = snapshots.wait_for(|snapshot| snapshot.version >= version).await;
            let current = snapshots.borrow_and_update().clone();
            yield current;

            while snapshots.changed().await.is_ok() {
                let next = snapshots.borrow_and_update().clone();
                yield next;
            }
        }
    }
}

impl<T> Drop for LiveQuery<T> {
    fn drop(&mut self) {
        self.dispatcher.abort();
    }
}

/// Dispatcher loop: wait for a change, coalesce whatever else is queued,
/// re-query once, publish the snapshot.
async fn dispatch<T, F, Fut>(
    table: Table,
    mut changes: broadcast::Receiver<TableChange>,
    sender: watch::Sender<Snapshot<T>>,
    query: F,
) where
    F: Fn() -> Fut,
    Fut: Future<Output = Result<Vec<T>>>,
{
    loop {
        let mut version = match changes.recv().await {
            Ok(change) => change.seq,
            Err(RecvError::Lagged(skipped)) => {
                tracing::debug!(%table, skipped, "Live query lagged, re-querying");
                0
            }
            Err(RecvError::Closed) => break,
        };

        loop {
            match changes.try_recv() {
                Ok(change) => version = version.max(change.seq),
                Err(TryRecvError::Lagged(_)) => continue,
                Err(TryRecvError::Empty) | Err(TryRecvError::Closed) => break,
            }
        }
        let version = version.max(sender.borrow().version);

        match query().await {
            Ok(rows) => {
                tracing::trace!(%table, version, rows = rows.len(), "Refreshed live query");
                sender.send_replace(Snapshot::new(version, rows));
            }
            Err(err) => {
                // Keep serving the last good snapshot.
                tracing::warn!(%table, error = %err, "Live query refresh failed");
                if err.is_fatal() {
                    break;
                }
            }
        }
    }

    tracing::debug!(%table, "Live query dispatcher stopped");
}
