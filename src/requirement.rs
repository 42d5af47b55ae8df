use std::fmt;

use serde::{Deserialize, Serialize};

/// How a list of required roles or permissions is combined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RequirementMode {
    /// Every listed value must be held
    All,
    /// At least one listed value must be held
    Any,
}

impl fmt::Display for RequirementMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RequirementMode::All => write!(f, "ALL"),
            RequirementMode::Any => write!(f, "ANY"),
        }
    }
}

/// Which of the two checks produced a decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AccessCheck {
    /// Role membership check
    Roles,
    /// Permission check (wildcard aware)
    Permissions,
}

impl fmt::Display for AccessCheck {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AccessCheck::Roles => write!(f, "roles"),
            AccessCheck::Permissions => write!(f, "permissions"),
        }
    }
}

/// Role names required by an operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleRequirement {
    /// Required role names
    pub roles: Vec<String>,
    /// How `roles` are combined
    pub mode: RequirementMode,
}

/// Permission strings required by an operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionRequirement {
    /// Required permissions, e.g. `users:read`
    pub permissions: Vec<String>,
    /// How `permissions` are combined
    pub mode: RequirementMode,
}

/// Authorization metadata attached to a protected operation when it is
/// registered.
///
/// A requirement with neither roles nor permissions only asks for an
/// authenticated user. Empty role or permission lists are dropped so they
/// behave the same as an absent requirement.
///
/// # Examples
///
/// ```
/// use request_guard::{AuthorizationRequirement, RequirementMode};
///
/// let req = AuthorizationRequirement::roles(RequirementMode::Any, ["admin", "editor"])
///     .with_permissions(RequirementMode::All, ["posts:write"]);
///
/// assert!(!req.is_public());
/// assert_eq!(req.role_requirement().unwrap().roles.len(), 2);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorizationRequirement {
    #[serde(default)]
    public: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    roles: Option<RoleRequirement>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    permissions: Option<PermissionRequirement>,
}

impl AuthorizationRequirement {
    /// Operation open to everyone, user or not.
    pub fn public() -> Self {
        Self {
            public: true,
            ..Self::default()
        }
    }

    /// Operation open to any authenticated user.
    pub fn authenticated() -> Self {
        Self::default()
    }

    /// Operation restricted by role.
    pub fn roles<I, S>(mode: RequirementMode, roles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::authenticated().with_roles(mode, roles)
    }

    /// Operation restricted by permission.
    pub fn permissions<I, S>(mode: RequirementMode, permissions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::authenticated().with_permissions(mode, permissions)
    }

    /// Adds (or replaces) the role requirement.
    pub fn with_roles<I, S>(mut self, mode: RequirementMode, roles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let roles: Vec<String> = roles.into_iter().map(Into::into).collect();
        self.roles = (!roles.is_empty()).then_some(RoleRequirement { roles, mode });
        self
    }

    /// Adds (or replaces) the permission requirement.
    pub fn with_permissions<I, S>(mut self, mode: RequirementMode, permissions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let permissions: Vec<String> = permissions.into_iter().map(Into::into).collect();
        self.permissions =
            (!permissions.is_empty()).then_some(PermissionRequirement { permissions, mode });
        self
    }

    /// Returns true if the operation skips every check.
    pub fn is_public(&self) -> bool {
        self.public
    }

    /// Returns the role requirement, if any.
    ///
    /// An empty role list deserialized from configuration counts as absent.
    pub fn role_requirement(&self) -> Option<&RoleRequirement> {
        self.roles.as_ref().filter(|r| !r.roles.is_empty())
    }

    /// Returns the permission requirement, if any.
    pub fn permission_requirement(&self) -> Option<&PermissionRequirement> {
        self.permissions
            .as_ref()
            .filter(|p| !p.permissions.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mode_displays_uppercase() {
        assert_eq!(RequirementMode::All.to_string(), "ALL");
        assert_eq!(RequirementMode::Any.to_string(), "ANY");
    }

    #[test]
    fn authenticated_has_no_checks() {
        let req = AuthorizationRequirement::authenticated();
        assert!(!req.is_public());
        assert!(req.role_requirement().is_none());
        assert!(req.permission_requirement().is_none());
    }

    #[test]
    fn empty_lists_are_dropped() {
        let req = AuthorizationRequirement::roles(RequirementMode::All, Vec::<String>::new())
            .with_permissions(RequirementMode::Any, Vec::<String>::new());
        assert!(req.role_requirement().is_none());
        assert!(req.permission_requirement().is_none());
    }

    #[test]
    fn combined_requirement_keeps_both() {
        let req = AuthorizationRequirement::roles(RequirementMode::Any, ["admin"])
            .with_permissions(RequirementMode::All, ["users:read", "users:write"]);

        assert_eq!(req.role_requirement().unwrap().mode, RequirementMode::Any);
        let perms = req.permission_requirement().unwrap();
        assert_eq!(perms.mode, RequirementMode::All);
        assert_eq!(perms.permissions, vec!["users:read", "users:write"]);
    }

    #[test]
    fn deserializes_from_json_config() {
        let req: AuthorizationRequirement = serde_json::from_str(
            r#"{"roles": {"roles": ["admin"], "mode": "ANY"}, "permissions": {"permissions": [], "mode": "ALL"}}"#,
        )
        .unwrap();

        assert!(!req.is_public());
        assert_eq!(req.role_requirement().unwrap().roles, vec!["admin"]);
        assert!(req.permission_requirement().is_none());
    }
}
