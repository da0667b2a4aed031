//! # Beetle Gate CLI
//!
//! Scenario replay, route checks and an interactive insights demo.

pub mod commands;
pub mod render;
pub mod scenario;
