//! # Beetle Gate Contexts
//!
//! In-memory stand-ins for the external state the guarded pages read:
//! authentication and repository selection. Each context is a cheap,
//! cloneable handle; every effective mutation bumps a shared `ChangeHub`
//! revision, which is what drives gate re-evaluation in the host.

pub mod auth;
pub mod hub;
pub mod repository;

pub use auth::{AuthContext, AuthState};
pub use hub::ChangeHub;
pub use repository::{Repository, RepositoryContext, RepositoryState};
