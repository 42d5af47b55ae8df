use std::collections::HashMap;

use crate::gate::AccessGate;
use crate::requirement::AuthorizationRequirement;

/// Maps operation names to the requirement attached at registration time.
///
/// This is where a service declares, once, what each route needs. Lookups of
/// names that were never registered return `None`; the pipeline treats that
/// as an error rather than an implicit allow.
///
/// # Examples
///
/// ```
/// use request_guard::web::OperationRegistry;
/// use request_guard::{AuthorizationRequirement, RequirementMode};
///
/// let mut registry = OperationRegistry::new();
/// registry
///     .register("health", AuthorizationRequirement::public())
///     .register(
///         "users.delete",
///         AuthorizationRequirement::roles(RequirementMode::Any, ["admin"]),
///     );
///
/// assert!(registry.gate("health").unwrap().requirement().is_public());
/// assert!(registry.gate("users.create").is_none());
/// ```
#[derive(Debug, Clone, Default)]
pub struct OperationRegistry {
    gates: HashMap<String, AccessGate>,
}

impl OperationRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers (or replaces) the requirement for `operation`.
    pub fn register(
        &mut self,
        operation: impl Into<String>,
        requirement: AuthorizationRequirement,
    ) -> &mut Self {
        let operation = operation.into();
        if self.gates.contains_key(&operation) {
            tracing::warn!(operation = %operation, "replacing registered requirement");
        }
        self.gates
            .insert(operation.clone(), AccessGate::new(operation, requirement));
        self
    }

    /// Returns the gate for `operation`, if registered.
    pub fn gate(&self, operation: &str) -> Option<&AccessGate> {
        self.gates.get(operation)
    }

    /// Returns the number of registered operations.
    pub fn len(&self) -> usize {
        self.gates.len()
    }

    /// Returns true if nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.gates.is_empty()
    }
}

impl<S: Into<String>> FromIterator<(S, AuthorizationRequirement)> for OperationRegistry {
    fn from_iter<I: IntoIterator<Item = (S, AuthorizationRequirement)>>(iter: I) -> Self {
        let mut registry = Self::new();
        for (operation, requirement) in iter {
            registry.register(operation, requirement);
        }
        registry
    }
}
