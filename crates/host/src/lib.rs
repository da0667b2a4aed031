//! # Beetle Gate Host
//!
//! Wires precondition sources, the gate, and the audit log into guarded
//! pages, and runs the re-render loop that reacts to context changes.

pub mod page;
pub mod pages;
pub mod runtime;

pub use page::GuardedPage;
pub use runtime::run_until_settled;
