//! REST API client layer
//!
//! One [`ApiClient`] per backend (main, auth, orchestrator). The main and auth
//! clients share a [`Session`] as their credential provider; the
//! orchestrator client is anonymous.
//!
//! # Architecture
//!
//! - Uses [`crate::http::HttpClient`] for retry and timeout (no direct reqwest)
//! - Headers, including `Authorization`, are resolved once per logical call
//! - Every failure is an [`ApiError`]

pub mod client;
pub mod errors;
pub mod messages;
pub mod request;
pub mod response;
pub mod session;

pub use client::{join_url, ApiClient};
pub use errors::{ApiError, ApiErrorCategory, ErrorDescriptor, ServerError};
pub use messages::user_message;
pub use request::{ApiRequest, RequestBody, RequestOptions};
pub use response::ApiResponse;
pub use session::Session;
