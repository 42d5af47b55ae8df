//! Audit event schema.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::ViolationKind;
use crate::gate::Decision;

/// Which stage of the gate produced the event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditEventKind {
    /// Presence of a user was checked
    Authentication,
    /// Roles or permissions were checked
    Authorization,
}

impl fmt::Display for AuditEventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuditEventKind::Authentication => write!(f, "authentication"),
            AuditEventKind::Authorization => write!(f, "authorization"),
        }
    }
}

/// Result of the audited decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditOutcome {
    /// The operation was allowed to run
    Allowed,
    /// The operation was refused
    Denied,
}

impl fmt::Display for AuditOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuditOutcome::Allowed => write!(f, "allowed"),
            AuditOutcome::Denied => write!(f, "denied"),
        }
    }
}

/// One authorization decision for one operation.
///
/// # Example
///
/// ```
/// use request_guard::audit::{AuditEvent, AuditEventKind, AuditOutcome};
///
/// let event = AuditEvent::new(
///     "req-123",
///     Some("user-1"),
///     "users.delete",
///     AuditEventKind::Authorization,
///     AuditOutcome::Denied,
/// )
/// .with_reason("Missing required roles (ALL): admin");
///
/// assert_eq!(event.operation(), "users.delete");
/// assert_eq!(event.reason(), Some("Missing required roles (ALL): admin"));
/// ```
#[derive(Debug, Clone, Serialize)]
pub struct AuditEvent {
    request_id: String,
    user_id: Option<String>,
    operation: String,
    kind: AuditEventKind,
    outcome: AuditOutcome,
    reason: Option<String>,
    timestamp: DateTime<Utc>,
}

impl AuditEvent {
    /// Creates an event stamped with the current time.
    pub fn new(
        request_id: impl Into<String>,
        user_id: Option<impl Into<String>>,
        operation: impl Into<String>,
        kind: AuditEventKind,
        outcome: AuditOutcome,
    ) -> Self {
        Self {
            request_id: request_id.into(),
            user_id: user_id.map(Into::into),
            operation: operation.into(),
            kind,
            outcome,
            reason: None,
            timestamp: Utc::now(),
        }
    }

    /// Records a gate decision.
    ///
    /// Unauthenticated denials are filed under `Authentication`; everything
    /// else under `Authorization`.
    pub fn from_decision(
        request_id: impl Into<String>,
        user_id: Option<&str>,
        operation: impl Into<String>,
        decision: &Decision,
    ) -> Self {
        match decision {
            Decision::Allow => Self::new(
                request_id,
                user_id,
                operation,
                AuditEventKind::Authorization,
                AuditOutcome::Allowed,
            ),
            Decision::Deny(violation) => {
                let kind = match violation.kind {
                    ViolationKind::Unauthenticated => AuditEventKind::Authentication,
                    ViolationKind::Forbidden { .. } => AuditEventKind::Authorization,
                };
                Self::new(request_id, user_id, operation, kind, AuditOutcome::Denied)
                    .with_reason(violation.message.clone())
            }
        }
    }

    /// Sets the denial reason.
    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    /// Returns the request identifier.
    pub fn request_id(&self) -> &str {
        &self.request_id
    }

    /// Returns the user id, if a user was present.
    pub fn user_id(&self) -> Option<&str> {
        self.user_id.as_deref()
    }

    /// Returns the operation name.
    pub fn operation(&self) -> &str {
        &self.operation
    }

    /// Returns the event kind.
    pub fn kind(&self) -> AuditEventKind {
        self.kind
    }

    /// Returns the outcome.
    pub fn outcome(&self) -> AuditOutcome {
        self.outcome
    }

    /// Returns the denial reason, if any.
    pub fn reason(&self) -> Option<&str> {
        self.reason.as_deref()
    }

    /// Returns when the event was created.
    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }
}

impl fmt::Display for AuditEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "AuditEvent[kind={}, outcome={}, request_id={}, user={}, operation={}",
            self.kind,
            self.outcome,
            self.request_id,
            self.user_id.as_deref().unwrap_or("<none>"),
            self.operation
        )?;

        if let Some(reason) = &self.reason {
            write!(f, ", reason={}", reason)?;
        }

        write!(f, "]")
    }
}
