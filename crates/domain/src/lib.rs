//! # OpsDeck Domain
//!
//! Business domain types and models for OpsDeck.
//!
//! This crate contains:
//! - Wire DTOs for the main, auth and orchestrator APIs
//! - Domain error types and Result definitions
//! - Configuration structures
//! - Domain constants
//!
//! ## Architecture
//! - No dependencies on other OpsDeck crates
//! - Only external dependencies allowed
//! - Pure domain models and data structures

pub mod config;
pub mod constants;
pub mod errors;
pub mod macros;
pub mod types;

// Re-export commonly used items
pub use config::*;
pub use errors::*;
pub use types::*;
