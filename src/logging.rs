use std::fmt;

/// Request-scoped logger.
///
/// `RequestLog` is obtained from `RequestContext::log()` and borrows the
/// request id from it, so it cannot outlive the request. Every message
/// carries `request_id` and, when a user is present, `user_id`.
#[derive(Debug, Clone, Copy)]
pub struct RequestLog<'a> {
    request_id: &'a str,
    user_id: Option<&'a str>,
}

impl<'a> RequestLog<'a> {
    pub(crate) fn new(request_id: &'a str, user_id: Option<&'a str>) -> Self {
        Self {
            request_id,
            user_id,
        }
    }

    /// Returns the request ID associated with this logger.
    pub fn request_id(&self) -> &str {
        self.request_id
    }

    /// Logs an info-level message with request ID.
    ///
    /// Use with `format_args!`:
    /// ```
    /// # use request_guard::web::RequestContext;
    /// let ctx = RequestContext::new("req-1");
    /// ctx.log().info(format_args!("listing {} users", 3));
    /// ```
    pub fn info(&self, args: fmt::Arguments<'_>) {
        tracing::info!(request_id = %self.request_id, user_id = ?self.user_id, "{}", args);
    }

    /// Logs a warning-level message with request ID.
    pub fn warn(&self, args: fmt::Arguments<'_>) {
        tracing::warn!(request_id = %self.request_id, user_id = ?self.user_id, "{}", args);
    }

    /// Logs an error-level message with request ID.
    pub fn error(&self, args: fmt::Arguments<'_>) {
        tracing::error!(request_id = %self.request_id, user_id = ?self.user_id, "{}", args);
    }

    /// Logs a debug-level message with request ID.
    pub fn debug(&self, args: fmt::Arguments<'_>) {
        tracing::debug!(request_id = %self.request_id, user_id = ?self.user_id, "{}", args);
    }
}
