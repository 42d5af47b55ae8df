use serde::{Deserialize, Serialize};

use super::envelope::iso_timestamp;
use crate::error::{Violation, ViolationKind};

/// JSON body sent when an operation is refused.
///
/// ```
/// use request_guard::{response::ErrorBody, Violation};
///
/// let body = ErrorBody::from_violation(&Violation::unauthenticated(), Some("/admin"));
/// assert_eq!(body.status_code, 401);
/// assert_eq!(body.error, "Unauthorized");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorBody {
    /// 401 or 403
    pub status_code: u16,
    /// Violation message
    pub message: String,
    /// HTTP reason phrase
    pub error: String,
    /// When the refusal happened
    pub timestamp: String,
    /// Request path, if known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

impl ErrorBody {
    /// Renders a violation for the wire.
    pub fn from_violation(violation: &Violation, path: Option<&str>) -> Self {
        let error = match violation.kind {
            ViolationKind::Unauthenticated => "Unauthorized",
            ViolationKind::Forbidden { .. } => "Forbidden",
        };

        Self {
            status_code: violation.status_code(),
            message: violation.message.clone(),
            error: error.to_string(),
            timestamp: iso_timestamp(),
            path: path.map(str::to_owned),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::requirement::{AccessCheck, RequirementMode};

    #[test]
    fn forbidden_body() {
        let violation = Violation::forbidden(
            AccessCheck::Permissions,
            RequirementMode::Any,
            vec!["users:delete".to_string()],
        );
        let body = ErrorBody::from_violation(&violation, None);
        assert_eq!(body.status_code, 403);
        assert_eq!(body.error, "Forbidden");
        assert_eq!(body.message, "Missing required permissions (ANY): users:delete");

        let value = serde_json::to_value(&body).unwrap();
        assert_eq!(value["statusCode"], 403);
        assert!(value.get("path").is_none());
    }

    #[test]
    fn unauthenticated_body_keeps_path() {
        let body = ErrorBody::from_violation(&Violation::unauthenticated(), Some("/me"));
        assert_eq!(body.path.as_deref(), Some("/me"));
        assert_eq!(body.message, "Authentication required");
    }
}
