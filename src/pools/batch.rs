//! Window-based request batching.
//!
//! The first key loaded into an idle [`Batcher`] opens a window. Every key loaded before
//! the window closes joins the same batch, which is then fetched with a single request
//! for the distinct keys. Each caller receives the subset of the results that belongs to
//! its key.

use std::error::Error as StdError;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use futures::future::BoxFuture;
use tokio::sync::{Mutex, oneshot};

use crate::Result;
use crate::error::{Error, Kind};

type Fetch<K, T> = Arc<dyn Fn(Vec<K>) -> BoxFuture<'static, Result<Vec<T>>> + Send + Sync>;
type Resolve<K, T> = fn(&[T], &K) -> Vec<T>;
type Waiter<K, T> = (K, oneshot::Sender<Result<Vec<T>>>);

/// The error of a batch fetch, as delivered to every caller in that batch.
///
/// The [`Error`] wrapping it has the same [`Kind`] as the original.
#[derive(Debug, Clone)]
pub struct BatchError(Arc<Error>);

impl BatchError {
    /// The error the batch fetch failed with.
    #[must_use]
    pub fn error(&self) -> &Error {
        &self.0
    }

    fn share(error: &Arc<Error>) -> Error {
        Error::with_source(error.kind(), BatchError(Arc::clone(error)))
    }
}

impl fmt::Display for BatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0.inner() {
            Some(source) => write!(f, "{source}"),
            None => write!(f, "{:?}", self.0.kind()),
        }
    }
}

impl StdError for BatchError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        Some(self.0.as_ref())
    }
}

/// Collects keys for one window, then resolves them with one fetch.
pub struct Batcher<K, T> {
    window: Duration,
    fetch: Fetch<K, T>,
    resolve: Resolve<K, T>,
    pending: Arc<Mutex<Option<Vec<Waiter<K, T>>>>>,
}

impl<K, T> fmt::Debug for Batcher<K, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Batcher")
            .field("window", &self.window)
            .finish_non_exhaustive()
    }
}

impl<K, T> Batcher<K, T>
where
    K: Clone + PartialEq + Send + 'static,
    T: Send + 'static,
{
    /// `fetch` receives the distinct keys of a batch in arrival order; `resolve` picks the
    /// items of the fetched result that answer one key.
    pub fn new<F>(window: Duration, fetch: F, resolve: Resolve<K, T>) -> Self
    where
        F: Fn(Vec<K>) -> BoxFuture<'static, Result<Vec<T>>> + Send + Sync + 'static,
    {
        Self {
            window,
            fetch: Arc::new(fetch),
            resolve,
            pending: Arc::new(Mutex::new(None)),
        }
    }

    /// Adds `key` to the current batch and waits for its share of the result.
    ///
    /// # Errors
    ///
    /// Returns the batch fetch error, with its kind preserved and the original reachable
    /// through [`BatchError`].
    pub async fn load(&self, key: K) -> Result<Vec<T>> {
        let (tx, rx) = oneshot::channel();

        let opens_window = {
            let mut pending = self.pending.lock().await;
            let opens_window = pending.is_none();
            pending.get_or_insert_with(Vec::new).push((key, tx));
            opens_window
        };

        if opens_window {
            self.schedule();
        }

        rx.await.map_err(|e| Error::with_source(Kind::Internal, e))?
    }

    fn schedule(&self) {
        let window = self.window;
        let fetch = Arc::clone(&self.fetch);
        let resolve = self.resolve;
        let pending = Arc::clone(&self.pending);

        tokio::spawn(async move {
            tokio::time::sleep(window).await;

            let Some(waiters) = pending.lock().await.take() else {
                return;
            };

            let mut keys: Vec<K> = Vec::with_capacity(waiters.len());
            for (key, _) in &waiters {
                if !keys.contains(key) {
                    keys.push(key.clone());
                }
            }

            #[cfg(feature = "tracing")]
            tracing::debug!(
                keys = keys.len(),
                callers = waiters.len(),
                "fetching batch"
            );

            match fetch(keys).await {
                Ok(items) => {
                    for (key, tx) in waiters {
                        // The caller may have gone away; its share is dropped.
                        drop(tx.send(Ok(resolve(&items, &key))));
                    }
                }
                Err(error) => {
                    #[cfg(feature = "tracing")]
                    tracing::warn!(%error, "batch fetch failed");

                    let error = Arc::new(error);
                    for (_, tx) in waiters {
                        drop(tx.send(Err(BatchError::share(&error))));
                    }
                }
            }
        });
    }
}
