//! The request/response pipeline around a protected handler.
//!
//! ```text
//! RequestContext
//!   ↓
//! OperationRegistry lookup → AccessGate::authorize ─ Deny → Err(Violation)
//!   ↓ Allow                      ↓
//! handler(&ctx)              audit trail
//!   ↓
//! serde_json::to_value → ResponseNormalizer → NormalizedResponse
//! ```
//!
//! The handler never runs unless the decision was `Allow`.

use std::sync::Arc;

use serde::Serialize;

use super::{OperationRegistry, RequestContext};
use crate::audit::{self, AuditEvent, AuditTrail};
use crate::config::Settings;
use crate::error::{Error, Result};
use crate::gate::Decision;
use crate::response::{NormalizedResponse, ResponseNormalizer};

/// Authorizes, runs and normalizes protected operations.
///
/// # Examples
///
/// ```
/// use request_guard::web::{GuardedPipeline, OperationRegistry, RequestContext};
/// use request_guard::{AuthenticatedUser, AuthorizationRequirement, RequirementMode};
/// use serde_json::json;
///
/// let registry: OperationRegistry = [(
///     "users.list",
///     AuthorizationRequirement::permissions(RequirementMode::All, ["users:read"]),
/// )]
/// .into_iter()
/// .collect();
/// let pipeline = GuardedPipeline::new(registry);
///
/// let ctx = RequestContext::new("req-1")
///     .with_user(Some(AuthenticatedUser::new("u1").with_permissions(["users:*"])));
///
/// let response = pipeline
///     .handle(&ctx, "users.list", |_| json!([{"id": 1}]))
///     .unwrap();
/// assert_eq!(response.meta.unwrap().pagination().unwrap().total, 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct GuardedPipeline {
    registry: OperationRegistry,
    normalizer: ResponseNormalizer,
    audit: Option<Arc<AuditTrail>>,
}

impl GuardedPipeline {
    /// Creates a pipeline with default normalization and no audit trail.
    pub fn new(registry: OperationRegistry) -> Self {
        Self {
            registry,
            normalizer: ResponseNormalizer::default(),
            audit: None,
        }
    }

    /// Creates a pipeline from settings. An audit trail is created when
    /// auditing is enabled.
    pub fn from_settings(registry: OperationRegistry, settings: &Settings) -> Self {
        let audit = settings
            .audit
            .enabled
            .then(|| Arc::new(AuditTrail::from_config(&settings.audit)));

        Self {
            registry,
            normalizer: ResponseNormalizer::new(settings.normalizer.clone()),
            audit,
        }
    }

    /// Records decisions into `trail`, which may be shared with other
    /// pipelines.
    pub fn with_audit_trail(mut self, trail: Arc<AuditTrail>) -> Self {
        self.audit = Some(trail);
        self
    }

    /// Replaces the normalizer.
    pub fn with_normalizer(mut self, normalizer: ResponseNormalizer) -> Self {
        self.normalizer = normalizer;
        self
    }

    /// Returns the audit trail, if one is attached.
    pub fn audit_trail(&self) -> Option<&Arc<AuditTrail>> {
        self.audit.as_ref()
    }

    /// Returns the registry.
    pub fn registry(&self) -> &OperationRegistry {
        &self.registry
    }

    /// Decides whether the request may invoke `operation`.
    ///
    /// # Errors
    ///
    /// - `Error::UnknownOperation` if `operation` was never registered
    /// - `Error::Violation` if the gate denied access
    pub fn guard(&self, ctx: &RequestContext, operation: &str) -> Result<()> {
        let gate = self.registry.gate(operation).ok_or_else(|| {
            ctx.log()
                .error(format_args!("no requirement registered for '{}'", operation));
            Error::UnknownOperation(operation.to_string())
        })?;

        let decision = gate.authorize(ctx.user());
        self.audit(ctx, operation, &decision);
        decision.into_result().map_err(Error::from)
    }

    /// Guards `operation`, runs `handler` on allow, and normalizes its output.
    ///
    /// # Errors
    ///
    /// Everything [`guard`](Self::guard) returns, plus
    /// `Error::Serialization` if the handler output cannot become JSON.
    pub fn handle<T, F>(
        &self,
        ctx: &RequestContext,
        operation: &str,
        handler: F,
    ) -> Result<NormalizedResponse>
    where
        T: Serialize,
        F: FnOnce(&RequestContext) -> T,
    {
        self.guard(ctx, operation)?;

        let output = serde_json::to_value(handler(ctx))?;
        let response = self.normalizer.normalize(output);
        ctx.log().debug(format_args!("operation '{}' completed", operation));
        Ok(response)
    }

    fn audit(&self, ctx: &RequestContext, operation: &str, decision: &Decision) {
        let Some(trail) = &self.audit else {
            return;
        };

        let event = AuditEvent::from_decision(
            ctx.request_id(),
            ctx.user().map(|u| u.id.as_str()),
            operation,
            decision,
        );
        audit::emit(&event);
        trail.record(event);
    }
}
