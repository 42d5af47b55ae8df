use crate::logging::RequestLog;
use crate::user::AuthenticatedUser;

/// Per-request input to the pipeline.
///
/// Holds the request id, the user (if the authentication layer verified
/// one) and the request path. Constructed once per request and dropped when
/// it ends.
///
/// # Examples
///
/// ```
/// use request_guard::web::RequestContext;
/// use request_guard::AuthenticatedUser;
///
/// let ctx = RequestContext::new("req-42")
///     .with_path("/users")
///     .with_user(Some(AuthenticatedUser::new("user-1")));
///
/// assert_eq!(ctx.request_id(), "req-42");
/// assert_eq!(ctx.user().map(|u| u.id.as_str()), Some("user-1"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    request_id: String,
    user: Option<AuthenticatedUser>,
    path: Option<String>,
}

impl RequestContext {
    /// Creates an anonymous context with the given request id.
    pub fn new(request_id: impl Into<String>) -> Self {
        Self {
            request_id: request_id.into(),
            user: None,
            path: None,
        }
    }

    /// Sets (or clears) the authenticated user.
    pub fn with_user(mut self, user: Option<AuthenticatedUser>) -> Self {
        self.user = user;
        self
    }

    /// Sets the request path.
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Returns the request id.
    pub fn request_id(&self) -> &str {
        &self.request_id
    }

    /// Returns the user, if authenticated.
    pub fn user(&self) -> Option<&AuthenticatedUser> {
        self.user.as_ref()
    }

    /// Returns the request path, if known.
    pub fn path(&self) -> Option<&str> {
        self.path.as_deref()
    }

    /// Returns a logger stamped with this request's id and user.
    pub fn log(&self) -> RequestLog<'_> {
        RequestLog::new(&self.request_id, self.user.as_ref().map(|u| u.id.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn anonymous_by_default() {
        let ctx = RequestContext::new("req-1");
        assert!(ctx.user().is_none());
        assert!(ctx.path().is_none());
        assert_eq!(ctx.log().request_id(), "req-1");
    }

    #[test]
    fn user_can_be_cleared() {
        let ctx = RequestContext::new("req-2")
            .with_user(Some(AuthenticatedUser::new("u1")))
            .with_user(None);
        assert!(ctx.user().is_none());
    }
}
