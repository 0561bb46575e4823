//! Utility modules for the application layer

pub mod health;
pub mod logging;
