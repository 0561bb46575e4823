//! HTTP transport: retry, timeout and response decoding

pub mod client;
pub mod upload;

pub use client::{HttpClient, HttpClientBuilder, HttpResponse, PreparedBody, PreparedRequest, SendOptions};
pub use upload::Upload;
