//! Extraction boundary trait for web integration.

use super::RequestContext;

/// Builds a [`RequestContext`] from a framework-specific request.
///
/// Framework integrations implement this to supply the request id, the user
/// their authentication layer verified, and the request path. The trait
/// does no authorization; that happens in the pipeline.
///
/// # Examples
///
/// ```
/// use request_guard::web::{ExtractContext, RequestContext};
/// use request_guard::AuthenticatedUser;
///
/// struct MyFrameworkRequest {
///     request_id: String,
///     path: String,
///     user: Option<AuthenticatedUser>,
/// }
///
/// impl ExtractContext for MyFrameworkRequest {
///     fn extract_context(&self) -> RequestContext {
///         RequestContext::new(self.request_id.clone())
///             .with_path(self.path.clone())
///             .with_user(self.user.clone())
///     }
/// }
///
/// let req = MyFrameworkRequest {
///     request_id: "req-1".to_string(),
///     path: "/users".to_string(),
///     user: None,
/// };
/// assert!(req.extract_context().user().is_none());
/// ```
pub trait ExtractContext {
    /// Maps the request into a context for the pipeline.
    fn extract_context(&self) -> RequestContext;
}

impl ExtractContext for RequestContext {
    fn extract_context(&self) -> RequestContext {
        self.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::user::AuthenticatedUser;
    use serde_json::Value;

    // A framework request whose verified credential arrives as JSON claims.
    struct ClaimsRequest {
        id: String,
        claims: Option<Value>,
    }

    impl ExtractContext for ClaimsRequest {
        fn extract_context(&self) -> RequestContext {
            let user = self
                .claims
                .clone()
                .and_then(|claims| serde_json::from_value::<AuthenticatedUser>(claims).ok());
            RequestContext::new(self.id.clone()).with_user(user)
        }
    }

    #[test]
    fn maps_claims_to_user() {
        let req = ClaimsRequest {
            id: "test-1".to_string(),
            claims: Some(serde_json::json!({"id": "alice", "roles": ["admin"]})),
        };

        let ctx = req.extract_context();
        assert_eq!(ctx.request_id(), "test-1");
        assert_eq!(ctx.user().unwrap().id, "alice");
    }

    #[test]
    fn missing_claims_give_anonymous_context() {
        let req = ClaimsRequest {
            id: "test-2".to_string(),
            claims: None,
        };
        assert!(req.extract_context().user().is_none());
    }

    #[test]
    fn context_extracts_itself() {
        let ctx = RequestContext::new("test-3").with_path("/x");
        assert_eq!(ctx.extract_context().path(), Some("/x"));
    }
}
