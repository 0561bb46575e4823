//! # OpsDeck App
//!
//! Application layer - dependency wiring and the `opsdeck` binary.
//!
//! This crate contains:
//! - Application context (dependency injection)
//! - Façade-bound fetch handles for dashboard views
//! - Logging setup and health reporting
//!
//! ## Architecture
//! - Depends on `domain`, `core`, and `infra`
//! - Wires up the hexagonal architecture

pub mod context;
pub mod hooks;
pub mod utils;

pub use context::AppContext;
