//! Fetch handle: one async operation wrapped in observable lifecycle state
//!
//! Each `execute()` is tagged with a sequence number taken under the state
//! channel's lock. A completion only writes state (and fires callbacks) when
//! it is still the latest dispatched call, so a slow earlier call can never
//! overwrite a newer result. `reset()` invalidates in-flight calls the same
//! way.

use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use futures::future::BoxFuture;
use futures::FutureExt;
use tokio::sync::watch;
use tracing::debug;

use super::state::FetchState;

/// Boxed fetch operation
pub type Fetcher<T, E> = Arc<dyn Fn() -> BoxFuture<'static, Result<T, E>> + Send + Sync>;

/// Callback invoked with a fresh result
pub type Callback<V> = Arc<dyn Fn(&V) + Send + Sync>;

/// Options controlling a [`FetchHandle`]
pub struct FetchOptions<T, E> {
    /// Dispatch `execute()` on construction (requires a tokio runtime)
    pub immediate: bool,
    pub on_success: Option<Callback<T>>,
    pub on_error: Option<Callback<E>>,
}

impl<T, E> Default for FetchOptions<T, E> {
    fn default() -> Self {
        Self { immediate: false, on_success: None, on_error: None }
    }
}

impl<T, E> Clone for FetchOptions<T, E> {
    fn clone(&self) -> Self {
        Self {
            immediate: self.immediate,
            on_success: self.on_success.clone(),
            on_error: self.on_error.clone(),
        }
    }
}

impl<T, E> FetchOptions<T, E> {
    pub fn immediate() -> Self {
        Self { immediate: true, ..Self::default() }
    }

    pub fn on_success(mut self, callback: impl Fn(&T) + Send + Sync + 'static) -> Self {
        self.on_success = Some(Arc::new(callback));
        self
    }

    pub fn on_error(mut self, callback: impl Fn(&E) + Send + Sync + 'static) -> Self {
        self.on_error = Some(Arc::new(callback));
        self
    }
}

struct Inner<T, E> {
    fetcher: Fetcher<T, E>,
    state: watch::Sender<FetchState<T, E>>,
    sequence: AtomicU64,
    on_success: Option<Callback<T>>,
    on_error: Option<Callback<E>>,
}

/// Observable wrapper around an async fetch operation
pub struct FetchHandle<T, E> {
    inner: Arc<Inner<T, E>>,
}

impl<T, E> Clone for FetchHandle<T, E> {
    fn clone(&self) -> Self {
        Self { inner: self.inner.clone() }
    }
}

impl<T, E> FetchHandle<T, E>
where
    T: Clone + Send + Sync + 'static,
    E: Clone + Send + Sync + 'static,
{
    /// Wrap `fetcher`. With `options.immediate` the first call is spawned
    /// right away.
    pub fn new<F, Fut>(fetcher: F, options: FetchOptions<T, E>) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<T, E>> + Send + 'static,
    {
        let fetcher: Fetcher<T, E> = Arc::new(move || fetcher().boxed());
        Self::from_fetcher(fetcher, options)
    }

    pub fn from_fetcher(fetcher: Fetcher<T, E>, options: FetchOptions<T, E>) -> Self {
        let (state, _) = watch::channel(FetchState::Idle);
        let handle = Self {
            inner: Arc::new(Inner {
                fetcher,
                state,
                sequence: AtomicU64::new(0),
                on_success: options.on_success,
                on_error: options.on_error,
            }),
        };

        if options.immediate {
            let immediate = handle.clone();
            tokio::spawn(async move {
                let _ = immediate.execute().await;
            });
        }

        handle
    }

    /// Run the fetch, update state if still current, and return the result.
    pub async fn execute(&self) -> Result<T, E> {
        let mut seq = 0;
        self.inner.state.send_modify(|state| {
            seq = self.inner.sequence.fetch_add(1, Ordering::SeqCst) + 1;
            *state = FetchState::Loading;
        });

        let result = (self.inner.fetcher)().await;

        let applied = self.inner.state.send_if_modified(|state| {
            if self.inner.sequence.load(Ordering::SeqCst) != seq {
                return false;
            }
            *state = match &result {
                Ok(data) => FetchState::Success(data.clone()),
                Err(err) => FetchState::Error(err.clone()),
            };
            true
        });

        if applied {
            match &result {
                Ok(data) => {
                    if let Some(callback) = &self.inner.on_success {
                        callback(data);
                    }
                }
                Err(err) => {
                    if let Some(callback) = &self.inner.on_error {
                        callback(err);
                    }
                }
            }
        } else {
            debug!(sequence = seq, "discarding stale fetch result");
        }

        result
    }

    /// Return to `Idle` and invalidate any in-flight call.
    pub fn reset(&self) {
        self.inner.state.send_modify(|state| {
            self.inner.sequence.fetch_add(1, Ordering::SeqCst);
            *state = FetchState::Idle;
        });
    }

    pub fn state(&self) -> FetchState<T, E> {
        self.inner.state.borrow().clone()
    }

    pub fn data(&self) -> Option<T> {
        self.inner.state.borrow().data().cloned()
    }

    pub fn error(&self) -> Option<E> {
        self.inner.state.borrow().error().cloned()
    }

    pub fn is_loading(&self) -> bool {
        self.inner.state.borrow().is_loading()
    }

    /// Observe state transitions.
    pub fn subscribe(&self) -> watch::Receiver<FetchState<T, E>> {
        self.inner.state.subscribe()
    }
}
