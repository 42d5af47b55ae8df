//! Authenticated user model and role/permission aggregation.

use std::collections::BTreeSet;

use serde::{Deserialize, Deserializer, Serialize};

/// A role together with the permissions it grants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleInfo {
    /// Role identifier; string or numeric ids are both accepted
    #[serde(
        default,
        deserialize_with = "id_from_string_or_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<String>,
    /// Role name, used for role checks
    pub name: String,
    /// Permissions granted through this role
    #[serde(default, deserialize_with = "default_if_null")]
    pub permissions: Vec<String>,
}

impl RoleInfo {
    /// Creates a role with the given name and permissions.
    pub fn new<I, S>(name: impl Into<String>, permissions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            id: None,
            name: name.into(),
            permissions: permissions.into_iter().map(Into::into).collect(),
        }
    }
}

/// One entry of a user's `roles` list.
///
/// Identity providers send either bare role names or full role objects,
/// sometimes mixed in the same list. Anything else is kept as `Unrecognized`
/// and contributes nothing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RoleEntry {
    /// Bare role name
    Name(String),
    /// Full role with permissions
    Info(RoleInfo),
    /// Entry of an unexpected shape
    Unrecognized(serde_json::Value),
}

impl RoleEntry {
    /// Role name carried by this entry, if any.
    pub fn name(&self) -> Option<&str> {
        match self {
            RoleEntry::Name(name) => Some(name),
            RoleEntry::Info(info) => Some(&info.name),
            RoleEntry::Unrecognized(_) => None,
        }
    }

    /// Permissions carried by this entry. Bare names carry none.
    pub fn permissions(&self) -> &[String] {
        match self {
            RoleEntry::Info(info) => &info.permissions,
            RoleEntry::Name(_) | RoleEntry::Unrecognized(_) => &[],
        }
    }
}

impl From<&str> for RoleEntry {
    fn from(name: &str) -> Self {
        RoleEntry::Name(name.to_string())
    }
}

impl From<RoleInfo> for RoleEntry {
    fn from(info: RoleInfo) -> Self {
        RoleEntry::Info(info)
    }
}

/// The user attached to a request after credential verification.
///
/// Built per request and dropped when the request ends. Missing fields
/// degrade to empty role and permission sets.
///
/// # Examples
///
/// ```
/// use request_guard::{AuthenticatedUser, RoleInfo};
///
/// let user = AuthenticatedUser::new("user-1")
///     .with_role(RoleInfo::new("editor", ["posts:*"]))
///     .with_roles(["viewer"])
///     .with_permissions(["profile:read"]);
///
/// assert!(user.effective_roles().contains("editor"));
/// assert!(user.effective_roles().contains("viewer"));
/// assert_eq!(user.effective_permissions().len(), 2);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthenticatedUser {
    /// Unique identifier for this user
    #[serde(default, deserialize_with = "string_from_string_or_number")]
    pub id: String,
    /// Email address, if known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Permissions granted directly to the user
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub permissions: Option<Vec<String>>,
    /// Primary role
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<RoleInfo>,
    /// Additional roles
    #[serde(
        default,
        deserialize_with = "default_if_null",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub roles: Vec<RoleEntry>,
    /// Bypasses every role and permission check
    #[serde(default, deserialize_with = "default_if_null")]
    pub is_super_admin: bool,
}

impl AuthenticatedUser {
    /// Creates a user with no roles or permissions.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }

    /// Sets the email address.
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    /// Sets the primary role.
    pub fn with_role(mut self, role: RoleInfo) -> Self {
        self.role = Some(role);
        self
    }

    /// Appends entries to the `roles` list.
    pub fn with_roles<I, E>(mut self, roles: I) -> Self
    where
        I: IntoIterator<Item = E>,
        E: Into<RoleEntry>,
    {
        self.roles.extend(roles.into_iter().map(Into::into));
        self
    }

    /// Appends direct permissions.
    pub fn with_permissions<I, S>(mut self, permissions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.permissions
            .get_or_insert_with(Vec::new)
            .extend(permissions.into_iter().map(Into::into));
        self
    }

    /// Marks the user as super-admin.
    pub fn super_admin(mut self) -> Self {
        self.is_super_admin = true;
        self
    }

    /// See [`effective_roles`].
    pub fn effective_roles(&self) -> BTreeSet<String> {
        effective_roles(self)
    }

    /// See [`effective_permissions`].
    pub fn effective_permissions(&self) -> BTreeSet<String> {
        effective_permissions(self)
    }
}

/// Union of the primary role name and every name in `roles`.
pub fn effective_roles(user: &AuthenticatedUser) -> BTreeSet<String> {
    user.role
        .iter()
        .map(|role| role.name.as_str())
        .chain(user.roles.iter().filter_map(RoleEntry::name))
        .map(str::to_owned)
        .collect()
}

/// Union of direct permissions, the primary role's permissions and the
/// permissions of every full role in `roles`.
pub fn effective_permissions(user: &AuthenticatedUser) -> BTreeSet<String> {
    let direct = user.permissions.iter().flatten();
    let primary = user.role.iter().flat_map(|role| role.permissions.iter());
    let listed = user.roles.iter().flat_map(|entry| entry.permissions().iter());

    direct.chain(primary).chain(listed).cloned().collect()
}

#[derive(Deserialize)]
#[serde(untagged)]
enum StringOrNumber {
    String(String),
    Number(serde_json::Number),
}

impl From<StringOrNumber> for String {
    fn from(value: StringOrNumber) -> Self {
        match value {
            StringOrNumber::String(s) => s,
            StringOrNumber::Number(n) => n.to_string(),
        }
    }
}

fn id_from_string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<StringOrNumber>::deserialize(deserializer)?.map(String::from))
}

fn string_from_string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    id_from_string_or_number(deserializer).map(Option::unwrap_or_default)
}

// Explicit `null` reads the same as an absent key.
fn default_if_null<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
