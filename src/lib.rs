//! Request authorization gate and response envelope normalization.
//!
//! This crate sits on both sides of an HTTP handler:
//! - **Before**: an authorization decision over roles, wildcard permissions,
//!   super-admin bypass and public routes
//! - **After**: classification of whatever the handler returned and wrapping
//!   it in a canonical `{ payload, meta }` envelope, with pagination metadata
//!   inferred for lists
//!
//! # Core Types
//!
//! - [`AuthenticatedUser`]: the verified user, with roles and permissions
//! - [`AuthorizationRequirement`]: what an operation needs, declared once
//! - [`authorize`] / [`AccessGate`]: the allow/deny decision
//! - [`response::ResponseNormalizer`]: handler output to envelope
//! - [`web::GuardedPipeline`]: both of the above around a handler call
//!
//! # Examples
//!
//! ```
//! use request_guard::{authorize, AuthenticatedUser, AuthorizationRequirement, RequirementMode, RoleInfo};
//! use request_guard::response::normalize;
//! use serde_json::json;
//!
//! let requirement = AuthorizationRequirement::roles(RequirementMode::Any, ["editor", "admin"])
//!     .with_permissions(RequirementMode::All, ["posts:publish"]);
//!
//! let user = AuthenticatedUser::new("user-1")
//!     .with_role(RoleInfo::new("editor", ["posts:*"]));
//!
//! authorize(Some(&user), &requirement)
//!     .into_result()
//!     .expect("editor may publish");
//!
//! let envelope = normalize(json!({"items": [{"id": 1}], "total": 1}));
//! assert_eq!(envelope.meta.unwrap().pagination().unwrap().total_pages, 1);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod audit;
pub mod config;
mod error;
mod gate;
mod logging;
pub mod permission;
mod requirement;
pub mod response;
mod user;
pub mod web;

pub use config::Settings;
pub use error::{Error, Result, Violation, ViolationKind};
pub use gate::{authorize, AccessGate, Decision};
pub use logging::RequestLog;
pub use requirement::{
    AccessCheck, AuthorizationRequirement, PermissionRequirement, RequirementMode,
    RoleRequirement,
};
pub use user::{effective_permissions, effective_roles, AuthenticatedUser, RoleEntry, RoleInfo};
