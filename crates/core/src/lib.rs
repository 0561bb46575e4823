//! # OpsDeck Core
//!
//! Pure client logic layer - no HTTP or storage code.
//!
//! This crate contains:
//! - Port/adapter interfaces (traits) for credentials and session storage
//! - Query-string construction for list endpoints
//! - The fetch lifecycle state machine used by the dashboard views
//!
//! ## Architecture Principles
//! - Only depends on `opsdeck-domain`
//! - All external dependencies via traits
//! - Pure, testable logic

pub mod fetch;
pub mod ports;
pub mod query;

pub use fetch::{
    FetchHandle, FetchOptions, FetchState, FetchStatus, PageRequest, Paged, PaginatedFetch, Poller,
};
pub use ports::{CredentialProvider, NoCredentials, SessionStore};
pub use query::{QueryParams, ToQuery};
