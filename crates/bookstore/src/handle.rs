//! Lazily constructed, shared engine instances.
//!
//! [`EngineHandle`] opens its engine on first use and hands the same
//! `Arc<Engine>` to every caller afterwards. [`get_engine`] is the
//! process-wide handle for callers that cannot pass one around.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, OnceLock};

use tokio::sync::OnceCell;

use bookstore_core::storage::Result;

use crate::config::Config;
use crate::engine::Engine;

/// Opens an [`Engine`] at most once and shares it.
///
/// Concurrent first callers wait on the same construction. A failed
/// construction is kept: every later call gets the same error back.
pub struct EngineHandle {
    config: Config,
    engine: OnceCell<Result<Arc<Engine>>>,
    initializations: AtomicUsize,
}

impl EngineHandle {
    /// Creates a handle that opens `config` on first use.
    pub fn new(config: Config) -> Self {
        Self {
            config,
            engine: OnceCell::new(),
            initializations: AtomicUsize::new(0),
        }
    }

    /// The configuration this handle opens its engine with.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Returns the shared engine, opening it on first call.
    pub async fn get(&self) -> Result<Arc<Engine>> {
        self.engine
            .get_or_init(|| async {
                self.initializations.fetch_add(1, Ordering::SeqCst);
                match Engine::open(&self.config).await {
                    Ok(engine) => Ok(Arc::new(engine)),
                    Err(err) => {
                        tracing::error!(error = %err, store = ?self.config.store, "Failed to open storage engine");
                        Err(err)
                    }
                }
            })
            .await
            .clone()
    }

    /// How many times construction ran: 0 before the first `get`, 1 after.
    pub fn initializations(&self) -> usize {
        self.initializations.load(Ordering::SeqCst)
    }
}

static ENGINE: OnceLock<EngineHandle> = OnceLock::new();

/// Returns the process-wide engine.
///
/// The first caller's configuration wins; later calls with a different
/// configuration get the existing engine and a warning.
pub async fn get_engine(config: &Config) -> Result<Arc<Engine>> {
    let handle = ENGINE.get_or_init(|| EngineHandle::new(config.clone()));
    if handle.config() != config {
        tracing::warn!(
            requested = ?config.store,
            active = ?handle.config().store,
            "Engine already configured, ignoring new configuration"
        );
    }
    handle.get().await
}

#[cfg(test)]
mod tests {
    use super::*;
    use bookstore_core::catalog::Book;
    use bookstore_core::storage::{BookStore, RepositoryError};

    #[tokio::test]
    async fn test_get_is_lazy() {
        let handle = EngineHandle::new(Config::in_memory());
        assert_eq!(handle.initializations(), 0);

        handle.get().await.unwrap();

        assert_eq!(handle.initializations(), 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_get_shares_one_engine() {
        let handle = Arc::new(EngineHandle::new(Config::in_memory()));

        let tasks: Vec<_> = (0..16)
            .map(|_| {
                let handle = handle.clone();
                tokio::spawn(async move { handle.get().await.unwrap() })
            })
            .collect();

        let mut engines = Vec::new();
        for task in tasks {
            engines.push(task.await.unwrap());
        }

        assert_eq!(handle.initializations(), 1);
        assert!(engines.iter().all(|e| Arc::ptr_eq(e, &engines[0])));
    }

    #[tokio::test]
    async fn test_writes_visible_through_every_reference() {
        let handle = EngineHandle::new(Config::in_memory());
        let writer = handle.get().await.unwrap();
        let reader = handle.get().await.unwrap();

        writer
            .store()
            .insert_books(&[Book::new("978-1", "Dune", "$10")])
            .await
            .unwrap();

        assert_eq!(reader.store().get_book_by_id("978-1").await.unwrap().title, "Dune");
    }

    #[tokio::test]
    async fn test_failure_is_sticky() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::in_memory().with_path(dir.path().join("missing").join("books.db"));
        let handle = EngineHandle::new(config);

        let first = handle.get().await;
        let second = handle.get().await;

        assert!(matches!(first, Err(RepositoryError::StorageUnavailable(_))));
        assert_eq!(first.err(), second.err());
        assert_eq!(handle.initializations(), 1);
    }

    #[tokio::test]
    async fn test_global_engine_first_config_wins() {
        let first = get_engine(&Config::in_memory()).await.unwrap();
        let other = Config::in_memory().with_reset_on_version_mismatch(false);

        let second = get_engine(&other).await.unwrap();

        assert!(Arc::ptr_eq(&first, &second));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_global_engine_is_shared() {
        let tasks: Vec<_> = (0..16)
            .map(|_| tokio::spawn(async { get_engine(&Config::in_memory()).await.unwrap() }))
            .collect();

        let mut engines = Vec::new();
        for task in tasks {
            engines.push(task.await.unwrap());
        }

        assert!(engines.iter().all(|e| Arc::ptr_eq(e, &engines[0])));
        assert_eq!(ENGINE.get().unwrap().initializations(), 1);

        engines[3]
            .store()
            .insert_books(&[Book::new("978-shared", "Shared", "$1")])
            .await
            .unwrap();
        let seen = engines[11].store().get_book_by_id("978-shared").await.unwrap();
        assert_eq!(seen.title, "Shared");
    }
}
