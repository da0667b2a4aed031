//! # Beetle Gate Audit
//!
//! Audit trail for gate transitions and navigations.

mod gate_audit;

pub use gate_audit::{AuditEntry, AuditEventType, AuditStats, GateAuditLog};
