//! Async fetch lifecycle helpers
//!
//! The dashboard's data-fetching layer: a [`FetchHandle`] wraps one façade
//! call in `idle → loading → success | error` state, a [`Poller`] re-runs it
//! on an interval, and a [`PaginatedFetch`] tracks page/limit for list
//! endpoints.

pub mod handle;
pub mod paginated;
pub mod polling;
pub mod state;

pub use handle::{Callback, FetchHandle, FetchOptions, Fetcher};
pub use paginated::{PageFetcher, PageRequest, Paged, PaginatedFetch};
pub use polling::Poller;
pub use state::{FetchState, FetchStatus};
