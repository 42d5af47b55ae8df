use super::AuditEvent;

/// `tracing` target used for audit events, so subscribers can route them
/// separately from application logs.
pub const AUDIT_TARGET: &str = "request_guard::audit";

/// Emits an audit event as a structured `tracing` event.
pub fn emit(event: &AuditEvent) {
    tracing::info!(
        target: AUDIT_TARGET,
        request_id = %event.request_id(),
        user_id = ?event.user_id(),
        operation = %event.operation(),
        kind = %event.kind(),
        outcome = %event.outcome(),
        reason = ?event.reason(),
        timestamp = %event.timestamp().to_rfc3339(),
        "audit event"
    );
}
