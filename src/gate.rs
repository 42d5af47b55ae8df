use tracing::{debug, warn};

use crate::{
    error::Violation,
    permission,
    requirement::{AccessCheck, AuthorizationRequirement, RequirementMode},
    user::AuthenticatedUser,
};

/// Outcome of an authorization check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    /// The operation may proceed
    Allow,
    /// The operation must not run
    Deny(Violation),
}

impl Decision {
    /// Returns true for [`Decision::Allow`].
    pub fn is_allowed(&self) -> bool {
        matches!(self, Decision::Allow)
    }

    /// Converts the decision into a `Result` so it can be used with `?`.
    pub fn into_result(self) -> Result<(), Violation> {
        match self {
            Decision::Allow => Ok(()),
            Decision::Deny(violation) => Err(violation),
        }
    }
}

impl From<Result<(), Violation>> for Decision {
    fn from(result: Result<(), Violation>) -> Self {
        match result {
            Ok(()) => Decision::Allow,
            Err(violation) => Decision::Deny(violation),
        }
    }
}

/// Decides whether `user` may invoke an operation guarded by `requirement`.
///
/// Checks run in a fixed order:
/// 1. public operations are always allowed
/// 2. without role or permission requirements, any present user is allowed
/// 3. a missing user is unauthenticated
/// 4. super-admins are allowed
/// 5. roles, then 6. permissions, each under ALL or ANY
///
/// When both roles and permissions are required both must pass; a role
/// failure is reported before a permission failure.
///
/// # Examples
///
/// ```
/// use request_guard::{authorize, AuthenticatedUser, AuthorizationRequirement, RequirementMode};
///
/// let req = AuthorizationRequirement::permissions(RequirementMode::All, ["users:read"]);
/// let user = AuthenticatedUser::new("u1").with_permissions(["users:*"]);
///
/// assert!(authorize(Some(&user), &req).is_allowed());
/// assert!(!authorize(None, &req).is_allowed());
/// ```
pub fn authorize(
    user: Option<&AuthenticatedUser>,
    requirement: &AuthorizationRequirement,
) -> Decision {
    check(user, requirement).into()
}

fn check(
    user: Option<&AuthenticatedUser>,
    requirement: &AuthorizationRequirement,
) -> Result<(), Violation> {
    if requirement.is_public() {
        return Ok(());
    }

    let user = user.ok_or_else(Violation::unauthenticated)?;

    if user.is_super_admin {
        return Ok(());
    }

    if let Some(roles) = requirement.role_requirement() {
        let held = user.effective_roles();
        let missing = missing_values(&roles.roles, |role| held.contains(role));
        evaluate(AccessCheck::Roles, roles.mode, roles.roles.len(), missing)?;
    }

    if let Some(perms) = requirement.permission_requirement() {
        let granted = user.effective_permissions();
        let missing = missing_values(&perms.permissions, |required| {
            permission::is_granted(required, &granted)
        });
        evaluate(
            AccessCheck::Permissions,
            perms.mode,
            perms.permissions.len(),
            missing,
        )?;
    }

    Ok(())
}

fn missing_values(required: &[String], held: impl Fn(&str) -> bool) -> Vec<String> {
    required
        .iter()
        .filter(|value| !held(value))
        .cloned()
        .collect()
}

/// Applies ALL/ANY to the values that were not held.
fn evaluate(
    check: AccessCheck,
    mode: RequirementMode,
    required: usize,
    missing: Vec<String>,
) -> Result<(), Violation> {
    let satisfied = match mode {
        RequirementMode::All => missing.is_empty(),
        RequirementMode::Any => missing.len() < required,
    };

    if satisfied {
        Ok(())
    } else {
        Err(Violation::forbidden(check, mode, missing))
    }
}

/// Authorization gate bound to a single operation's requirement.
///
/// `AccessGate` is what a request pipeline keeps per route: it is built once
/// at registration time and evaluated for every request. Each decision is
/// logged through `tracing`.
///
/// # Examples
///
/// ```
/// use request_guard::{AccessGate, AuthenticatedUser, AuthorizationRequirement, RequirementMode};
///
/// let gate = AccessGate::new(
///     "users.delete",
///     AuthorizationRequirement::roles(RequirementMode::Any, ["admin"]),
/// );
///
/// let admin = AuthenticatedUser::new("u1").with_roles(["admin"]);
/// assert!(gate.check(Some(&admin)).is_ok());
///
/// let err = gate.check(None).unwrap_err();
/// assert_eq!(err.status_code(), 401);
/// ```
#[derive(Debug, Clone)]
pub struct AccessGate {
    operation: String,
    requirement: AuthorizationRequirement,
}

impl AccessGate {
    /// Creates a gate for the named operation.
    pub fn new(operation: impl Into<String>, requirement: AuthorizationRequirement) -> Self {
        Self {
            operation: operation.into(),
            requirement,
        }
    }

    /// Returns the operation name this gate protects.
    pub fn operation(&self) -> &str {
        &self.operation
    }

    /// Returns the attached requirement.
    pub fn requirement(&self) -> &AuthorizationRequirement {
        &self.requirement
    }

    /// Evaluates the requirement for `user` and logs the outcome.
    pub fn authorize(&self, user: Option<&AuthenticatedUser>) -> Decision {
        let decision = authorize(user, &self.requirement);
        let user_id = user.map(|u| u.id.as_str());

        match &decision {
            Decision::Allow => debug!(
                operation = %self.operation,
                user_id = ?user_id,
                "access granted"
            ),
            Decision::Deny(violation) => warn!(
                operation = %self.operation,
                user_id = ?user_id,
                kind = %violation.kind,
                reason = %violation.message,
                "access denied"
            ),
        }

        decision
    }

    /// Like [`AccessGate::authorize`] but returns a `Result`.
    ///
    /// # Errors
    ///
    /// Returns the `Violation` describing why access was denied.
    pub fn check(&self, user: Option<&AuthenticatedUser>) -> Result<(), Violation> {
        self.authorize(user).into_result()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ViolationKind;
    use crate::user::RoleInfo;

    fn editor() -> AuthenticatedUser {
        AuthenticatedUser::new("u-editor")
            .with_role(RoleInfo::new("editor", ["posts:*", "media:upload"]))
            .with_roles(["viewer"])
    }

    #[test]
    fn public_operation_allows_anonymous() {
        let req = AuthorizationRequirement::public();
        assert_eq!(authorize(None, &req), Decision::Allow);
    }

    #[test]
    fn public_operation_ignores_attached_roles() {
        let req = AuthorizationRequirement::public().with_roles(RequirementMode::All, ["admin"]);
        assert!(authorize(None, &req).is_allowed());
    }

    #[test]
    fn authenticated_requirement_needs_a_user() {
        let req = AuthorizationRequirement::authenticated();
        assert!(authorize(Some(&AuthenticatedUser::new("u1")), &req).is_allowed());

        let violation = authorize(None, &req).into_result().unwrap_err();
        assert_eq!(violation.kind, ViolationKind::Unauthenticated);
        assert_eq!(violation.message, "Authentication required");
    }

    #[test]
    fn missing_user_is_unauthenticated_even_with_roles() {
        let req = AuthorizationRequirement::roles(RequirementMode::Any, ["admin"]);
        let violation = authorize(None, &req).into_result().unwrap_err();
        assert_eq!(violation.kind, ViolationKind::Unauthenticated);
    }

    #[test]
    fn super_admin_bypasses_everything() {
        let req = AuthorizationRequirement::roles(RequirementMode::All, ["owner", "root"])
            .with_permissions(RequirementMode::All, ["nuclear:launch"]);
        let user = AuthenticatedUser::new("root").super_admin();
        assert!(authorize(Some(&user), &req).is_allowed());
    }

    #[test]
    fn all_roles_requires_every_role() {
        let req = AuthorizationRequirement::roles(RequirementMode::All, ["editor", "viewer"]);
        assert!(authorize(Some(&editor()), &req).is_allowed());

        let req = AuthorizationRequirement::roles(RequirementMode::All, ["editor", "admin"]);
        let violation = authorize(Some(&editor()), &req).into_result().unwrap_err();
        assert_eq!(
            violation.kind,
            ViolationKind::Forbidden {
                check: AccessCheck::Roles,
                mode: RequirementMode::All,
                missing: vec!["admin".to_string()],
            }
        );
        assert_eq!(violation.message, "Missing required roles (ALL): admin");
    }

    #[test]
    fn any_role_requires_one_role() {
        let req = AuthorizationRequirement::roles(RequirementMode::Any, ["admin", "viewer"]);
        assert!(authorize(Some(&editor()), &req).is_allowed());

        let req = AuthorizationRequirement::roles(RequirementMode::Any, ["admin", "owner"]);
        let violation = authorize(Some(&editor()), &req).into_result().unwrap_err();
        assert_eq!(violation.message, "Missing required roles (ANY): admin, owner");
    }

    #[test]
    fn permissions_honor_wildcards() {
        let req = AuthorizationRequirement::permissions(
            RequirementMode::All,
            ["posts:delete", "media:upload"],
        );
        assert!(authorize(Some(&editor()), &req).is_allowed());

        let req = AuthorizationRequirement::permissions(
            RequirementMode::All,
            ["posts:delete", "users:delete"],
        );
        let violation = authorize(Some(&editor()), &req).into_result().unwrap_err();
        assert_eq!(violation.missing(), ["users:delete".to_string()]);
        assert_eq!(
            violation.message,
            "Missing required permissions (ALL): users:delete"
        );
    }

    #[test]
    fn any_permission_requires_one_match() {
        let req = AuthorizationRequirement::permissions(
            RequirementMode::Any,
            ["users:delete", "posts:publish"],
        );
        assert!(authorize(Some(&editor()), &req).is_allowed());
    }

    #[test]
    fn role_failure_is_reported_before_permission_failure() {
        let req = AuthorizationRequirement::roles(RequirementMode::All, ["admin"])
            .with_permissions(RequirementMode::All, ["users:delete"]);
        let violation = authorize(Some(&editor()), &req).into_result().unwrap_err();
        assert!(matches!(
            violation.kind,
            ViolationKind::Forbidden {
                check: AccessCheck::Roles,
                ..
            }
        ));
    }

    #[test]
    fn roles_and_permissions_are_and_ed() {
        let req = AuthorizationRequirement::roles(RequirementMode::All, ["editor"])
            .with_permissions(RequirementMode::All, ["users:delete"]);
        let violation = authorize(Some(&editor()), &req).into_result().unwrap_err();
        assert!(matches!(
            violation.kind,
            ViolationKind::Forbidden {
                check: AccessCheck::Permissions,
                ..
            }
        ));
    }

    #[test]
    fn gate_reports_operation_and_status() {
        let gate = AccessGate::new(
            "posts.publish",
            AuthorizationRequirement::permissions(RequirementMode::All, ["posts:publish"]),
        );
        assert_eq!(gate.operation(), "posts.publish");
        assert!(gate.check(Some(&editor())).is_ok());

        let err = gate.check(Some(&AuthenticatedUser::new("u2"))).unwrap_err();
        assert_eq!(err.status_code(), 403);
    }
}
