//! Audit trail of authorization decisions.
//!
//! This module provides:
//! - `AuditEvent`: one allow/deny decision for one operation
//! - `AuditTrail`: bounded in-memory recorder, shareable across requests
//! - `emit`: writes an event through `tracing` under the audit target
//!
//! Events only carry identifiers and the denial reason; user payloads and
//! credentials never reach the trail.

mod emit;
mod event;
mod trail;

pub use emit::{emit, AUDIT_TARGET};
pub use event::{AuditEvent, AuditEventKind, AuditOutcome};
pub use trail::{AuditConfig, AuditTrail, DEFAULT_CAPACITY};
