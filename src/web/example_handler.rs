//! Example handlers demonstrating the guarded pipeline.
//!
//! These show how a service wires its routes: requirements are declared once
//! in an [`OperationRegistry`], and each handler goes through
//! [`GuardedPipeline::handle`] so authorization happens before any work and
//! the output leaves in the canonical envelope whatever shape it had.
//!
//! **These examples are for documentation and testing only.**

use serde::Serialize;
use serde_json::json;

use super::{GuardedPipeline, OperationRegistry, RequestContext};
use crate::error::Result;
use crate::requirement::{AuthorizationRequirement, RequirementMode};
use crate::response::{NormalizedResponse, ResponseMeta};

const DIRECTORY: [(&str, &str); 5] = [
    ("1", "alice"),
    ("2", "bob"),
    ("3", "carol"),
    ("4", "dave"),
    ("5", "erin"),
];

/// A directory entry returned by the user listing.
#[derive(Debug, Clone, Serialize)]
pub struct UserSummary {
    /// User id
    pub id: String,
    /// Login name
    pub username: String,
}

/// Requirements for the example routes.
pub fn example_registry() -> OperationRegistry {
    [
        ("health", AuthorizationRequirement::public()),
        ("profile.read", AuthorizationRequirement::authenticated()),
        (
            "users.list",
            AuthorizationRequirement::permissions(RequirementMode::Any, ["users:read", "users:list"]),
        ),
        (
            "users.delete",
            AuthorizationRequirement::roles(RequirementMode::Any, ["admin", "owner"])
                .with_permissions(RequirementMode::All, ["users:delete"]),
        ),
    ]
    .into_iter()
    .collect()
}

/// Public health check; the handler returns a bare string.
///
/// ```
/// use request_guard::web::example_handler::{example_registry, handle_health};
/// use request_guard::web::{GuardedPipeline, RequestContext};
///
/// let pipeline = GuardedPipeline::new(example_registry());
/// let response = handle_health(&pipeline, &RequestContext::new("req-1")).unwrap();
/// assert_eq!(response.payload, "ok");
/// ```
pub fn handle_health(pipeline: &GuardedPipeline, ctx: &RequestContext) -> Result<NormalizedResponse> {
    pipeline.handle(ctx, "health", |_| "ok")
}

/// Returns the caller's own profile as an already-standardized envelope.
pub fn handle_profile(pipeline: &GuardedPipeline, ctx: &RequestContext) -> Result<NormalizedResponse> {
    pipeline.handle(ctx, "profile.read", |ctx| {
        let user = ctx.user();
        json!({
            "payload": {
                "id": user.map(|u| u.id.clone()),
                "email": user.and_then(|u| u.email.clone()),
                "roles": user.map(|u| u.effective_roles()).unwrap_or_default(),
            },
            "meta": ResponseMeta::now(),
        })
    })
}

/// Lists users one page at a time; the handler returns `{items, total, page, limit}`.
pub fn handle_list_users(
    pipeline: &GuardedPipeline,
    ctx: &RequestContext,
    page: u64,
    limit: u64,
) -> Result<NormalizedResponse> {
    pipeline.handle(ctx, "users.list", |ctx| {
        let page = page.max(1);
        let limit = limit.max(1);
        let skip = usize::try_from((page - 1).saturating_mul(limit)).unwrap_or(usize::MAX);
        let take = usize::try_from(limit).unwrap_or(usize::MAX);

        let items: Vec<UserSummary> = DIRECTORY
            .iter()
            .skip(skip)
            .take(take)
            .map(|(id, username)| UserSummary {
                id: id.to_string(),
                username: username.to_string(),
            })
            .collect();

        ctx.log()
            .info(format_args!("listing {} users from page {}", items.len(), page));

        json!({
            "items": items,
            "total": DIRECTORY.len(),
            "page": page,
            "limit": limit,
        })
    })
}

/// Deletes a user; the handler answers with the older `{success, timestamp}`
/// envelope.
pub fn handle_delete_user(
    pipeline: &GuardedPipeline,
    ctx: &RequestContext,
    user_id: &str,
) -> Result<NormalizedResponse> {
    pipeline.handle(ctx, "users.delete", |ctx| {
        ctx.log().warn(format_args!("deleting user {}", user_id));

        json!({
            "success": true,
            "timestamp": ResponseMeta::now().timestamp,
            "statusCode": 200,
            "path": ctx.path(),
            "message": "User deleted",
            "data": {"deleted": user_id},
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::response::Meta;
    use crate::user::{AuthenticatedUser, RoleInfo};

    fn pipeline() -> GuardedPipeline {
        GuardedPipeline::new(example_registry())
    }

    #[test]
    fn listing_paginates() {
        let ctx = RequestContext::new("req-1")
            .with_user(Some(AuthenticatedUser::new("u1").with_permissions(["users:list"])));

        let response = handle_list_users(&pipeline(), &ctx, 2, 2).unwrap();
        let meta = response.meta.as_ref().and_then(Meta::pagination).unwrap();
        assert_eq!(meta.total, 5);
        assert_eq!(meta.total_pages, 3);
        assert!(meta.has_next);
        assert!(meta.has_previous);
        assert_eq!(response.payload[0]["username"], "carol");
    }

    #[test]
    fn delete_requires_role_and_permission() {
        let admin_without_permission =
            AuthenticatedUser::new("u2").with_role(RoleInfo::new("admin", ["users:read"]));
        let ctx = RequestContext::new("req-2").with_user(Some(admin_without_permission));
        assert!(matches!(
            handle_delete_user(&pipeline(), &ctx, "3"),
            Err(Error::Violation(_))
        ));

        let admin = AuthenticatedUser::new("u3").with_role(RoleInfo::new("admin", ["users:*"]));
        let ctx = RequestContext::new("req-3")
            .with_user(Some(admin))
            .with_path("/users/3");
        let response = handle_delete_user(&pipeline(), &ctx, "3").unwrap();
        assert_eq!(response.payload, json!({"deleted": "3"}));
        match response.meta {
            Some(Meta::Response(meta)) => {
                assert_eq!(meta.path.as_deref(), Some("/users/3"));
                assert_eq!(meta.status_code, Some(200));
                assert_eq!(meta.message.as_deref(), Some("User deleted"));
            }
            other => panic!("unexpected meta: {other:?}"),
        }
    }

    #[test]
    fn profile_passes_through() {
        let ctx = RequestContext::new("req-4").with_user(Some(
            AuthenticatedUser::new("u4")
                .with_email("u4@example.com")
                .with_roles(["viewer"]),
        ));
        let response = handle_profile(&pipeline(), &ctx).unwrap();
        assert_eq!(response.payload["email"], "u4@example.com");
        assert_eq!(response.payload["roles"], json!(["viewer"]));
        assert!(matches!(response.meta, Some(Meta::Custom(_))));
    }
}
