//! # Beetle Gate Shared
//!
//! Common types used across all Beetle Gate crates.

pub mod config;
pub mod error;
pub mod precondition;
pub mod route;

// Re-exports
pub use config::*;
pub use error::*;
pub use precondition::*;
pub use route::*;
