//! # Beetle Gate
//!
//! View-readiness gating for guarded pages.
//!
//! ## Components
//!
//! - `PreconditionGate` - Loading / redirect / render decision engine
//! - `PreconditionSet` - Ordered, named precondition sources
//! - `Navigator` - Host navigation capability
//! - `GuardTable` - Config-driven route guards

pub mod gate;
pub mod guard_table;
pub mod navigation;
pub mod source;

pub use gate::{ErrorPanel, GateEvent, GatePhase, GateView, PreconditionGate, RETRY_LABEL};
pub use guard_table::{GuardTable, SourceRegistry};
pub use navigation::{Navigator, RecordingNavigator};
pub use source::{Precondition, PreconditionSet, PreconditionSource, StaticSource};
