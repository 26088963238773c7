//! actsync Common Utilities
//!
//! Shared infrastructure for all actsync crates:
//! - Error types and result aliases
//! - Millisecond clock parsing/formatting for log and subtitle timestamps
//! - Tracing/logging initialization
//! - Configuration loading

pub mod clock;
pub mod config;
pub mod error;
pub mod logging;

pub use clock::*;
pub use config::*;
pub use error::*;
