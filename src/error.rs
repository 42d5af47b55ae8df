use std::fmt;

use thiserror::Error;

use crate::requirement::{AccessCheck, RequirementMode};

/// Convenience alias for results produced by this crate.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Errors that can occur while guarding or shaping a request.
#[derive(Debug, Error)]
pub enum Error {
    /// An authorization check failed
    #[error("Access violation: {0}")]
    Violation(#[from] Violation),

    /// Handler output could not be turned into JSON
    #[error("Failed to serialize handler output: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The operation was never registered with a requirement
    #[error("No authorization requirement registered for operation '{0}'")]
    UnknownOperation(String),

    /// Settings could not be read, parsed or validated
    #[error("Configuration error: {message}")]
    Config {
        /// What went wrong
        message: String,
        /// Underlying I/O or parse error, if any
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl Error {
    pub(crate) fn config(message: impl Into<String>) -> Self {
        Error::Config {
            message: message.into(),
            source: None,
        }
    }
}

/// An authorization failure with details about what failed.
///
/// Violations are terminal for the current operation: the protected call
/// never runs once one has been produced.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind}: {message}")]
pub struct Violation {
    /// The kind of violation that occurred
    pub kind: ViolationKind,
    /// Human-readable message explaining the violation
    pub message: String,
}

impl Violation {
    /// Creates a new violation.
    pub fn new(kind: ViolationKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// The caller presented no user.
    pub fn unauthenticated() -> Self {
        Self::new(ViolationKind::Unauthenticated, "Authentication required")
    }

    /// The user is known but lacks the listed roles or permissions.
    ///
    /// The message names every missing value and the requirement mode, e.g.
    /// `Missing required roles (ALL): admin, editor`.
    pub fn forbidden(check: AccessCheck, mode: RequirementMode, missing: Vec<String>) -> Self {
        let message = format!(
            "Missing required {} ({}): {}",
            check,
            mode,
            missing.join(", ")
        );
        Self::new(
            ViolationKind::Forbidden {
                check,
                mode,
                missing,
            },
            message,
        )
    }

    /// HTTP status code conventionally used to surface this violation.
    pub fn status_code(&self) -> u16 {
        match self.kind {
            ViolationKind::Unauthenticated => 401,
            ViolationKind::Forbidden { .. } => 403,
        }
    }

    /// Returns the roles or permissions that were missing, if any.
    pub fn missing(&self) -> &[String] {
        match &self.kind {
            ViolationKind::Unauthenticated => &[],
            ViolationKind::Forbidden { missing, .. } => missing,
        }
    }
}

/// The kind of authorization failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViolationKind {
    /// No user is present on the request
    Unauthenticated,
    /// A user is present but lacks a required role or permission
    Forbidden {
        /// Which check failed
        check: AccessCheck,
        /// How the required values were combined
        mode: RequirementMode,
        /// Required values the user did not hold
        missing: Vec<String>,
    },
}

impl fmt::Display for ViolationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ViolationKind::Unauthenticated => write!(f, "Unauthenticated"),
            ViolationKind::Forbidden { .. } => write!(f, "Forbidden"),
        }
    }
}
