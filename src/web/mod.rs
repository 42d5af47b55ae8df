//! Web framework integration surface.
//!
//! This module is the boundary between an HTTP framework and the gate and
//! normalizer. It handles:
//! - Mapping framework requests to a [`RequestContext`] ([`ExtractContext`])
//! - Declaring each operation's requirement once, at registration time
//!   ([`OperationRegistry`])
//! - Running the gate before the handler and the normalizer after it
//!   ([`GuardedPipeline`])
//!
//! # Design Principles
//!
//! 1. **No Framework Dependencies**: nothing here names a specific framework.
//!    Integrations implement [`ExtractContext`] for their request type.
//!
//! 2. **Explicit Requirements**: requirements are plain values stored in the
//!    registry, not attributes discovered at runtime.
//!
//! 3. **Gate Precedes Handler**: a handler runs only after an `Allow`
//!    decision; an unknown operation is an error, not an implicit allow.
//!
//! # Example Flow
//!
//! ```ignore
//! // In a framework-specific integration (e.g., axum, actix):
//! let ctx = framework_request.extract_context();
//!
//! match pipeline.handle(&ctx, "users.list", |ctx| list_users(ctx)) {
//!     Ok(envelope) => respond(200, envelope),
//!     Err(Error::Violation(v)) => respond(v.status_code(), ErrorBody::from_violation(&v, ctx.path())),
//!     Err(other) => respond(500, other.to_string()),
//! }
//! ```

mod context;
pub mod example_handler;
mod extract;
mod pipeline;
mod registry;

pub use context::RequestContext;
pub use extract::ExtractContext;
pub use pipeline::GuardedPipeline;
pub use registry::OperationRegistry;
