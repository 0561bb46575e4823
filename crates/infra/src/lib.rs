//! # OpsDeck Infrastructure
//!
//! Infrastructure implementations of core ports.
//!
//! This crate contains:
//! - The reqwest-based HTTP transport (timeout, linear-backoff retry)
//! - Per-backend API clients, the error taxonomy and the shared session
//! - Session storage backends (file, memory)
//! - Configuration loading from environment variables or files
//! - Service façades for auth, users and orchestrator monitoring
//!
//! ## Architecture
//! - Implements traits defined in `opsdeck-core`
//! - Depends on `opsdeck-domain` and `opsdeck-core`
//! - Contains all "impure" code (network, filesystem, environment)

pub mod api;
pub mod config;
mod errors;
pub mod http;
pub mod services;
pub mod storage;

// Re-export commonly used items
pub use api::{ApiClient, ApiError, ApiRequest, ApiResponse, ErrorDescriptor, Session};
pub use http::{HttpClient, Upload};
pub use services::{AuthService, OrchestratorService, UsersService};
pub use storage::{FileSessionStore, MemorySessionStore};
