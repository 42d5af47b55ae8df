//! Request flow demonstration.
//!
//! This example walks requests through the guarded pipeline:
//! 1. Load settings and declare route requirements
//! 2. Build a request context from verified claims
//! 3. Authorize before the handler runs
//! 4. Normalize whatever the handler returned
//! 5. Inspect the audit trail
//!
//! Run with: `RUST_LOG=request_guard=debug cargo run --example request_flow`

use request_guard::response::{ErrorBody, NormalizedResponse};
use request_guard::web::example_handler::{
    example_registry, handle_delete_user, handle_health, handle_list_users, handle_profile,
};
use request_guard::web::{GuardedPipeline, RequestContext};
use request_guard::{AuthenticatedUser, Error, Result, Settings};
use serde_json::json;
use tracing_subscriber::EnvFilter;

const SETTINGS: &str = r#"
[normalizer]
default_limit = 2

[audit]
enabled = true
capacity = 100
"#;

/// Simulates decoding a verified token into a user
fn user_from_claims(claims: serde_json::Value) -> Option<AuthenticatedUser> {
    serde_json::from_value(claims).ok()
}

fn print_outcome(label: &str, ctx: &RequestContext, result: Result<NormalizedResponse>) {
    println!("\n--- {label} ---");
    match result {
        Ok(response) => match serde_json::to_string_pretty(&response) {
            Ok(body) => println!("200\n{body}"),
            Err(e) => println!("could not render response: {e}"),
        },
        Err(Error::Violation(violation)) => {
            let body = ErrorBody::from_violation(&violation, ctx.path());
            println!("{}\n{}", body.status_code, json!(body));
        }
        Err(other) => println!("500 {other}"),
    }
}

fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("request_guard=info")),
        )
        .init();

    println!("=== Request Flow Example ===");

    // Step 1: Settings and requirements
    let settings = Settings::from_toml_str(SETTINGS)?;
    let pipeline = GuardedPipeline::from_settings(example_registry(), &settings);
    println!("Registered {} operations", pipeline.registry().len());

    // Scenario 1: Anonymous health check
    let anonymous = RequestContext::new("req-0001").with_path("/health");
    print_outcome("anonymous GET /health", &anonymous, handle_health(&pipeline, &anonymous));

    // Scenario 2: Anonymous profile read is refused with 401
    let anonymous = RequestContext::new("req-0002").with_path("/me");
    print_outcome("anonymous GET /me", &anonymous, handle_profile(&pipeline, &anonymous));

    // Scenario 3: A viewer reads its profile and lists users
    let viewer = user_from_claims(json!({
        "id": 42,
        "email": "viewer@example.com",
        "roles": ["viewer"],
        "permissions": ["users:read"]
    }));
    let ctx = RequestContext::new("req-0003").with_path("/me").with_user(viewer.clone());
    print_outcome("viewer GET /me", &ctx, handle_profile(&pipeline, &ctx));

    let ctx = RequestContext::new("req-0004").with_path("/users?page=2").with_user(viewer.clone());
    print_outcome("viewer GET /users?page=2", &ctx, handle_list_users(&pipeline, &ctx, 2, 2));

    // Scenario 4: The viewer may not delete (403)
    let ctx = RequestContext::new("req-0005").with_path("/users/3").with_user(viewer);
    print_outcome("viewer DELETE /users/3", &ctx, handle_delete_user(&pipeline, &ctx, "3"));

    // Scenario 5: An owner with a wildcard grant deletes
    let owner = user_from_claims(json!({
        "id": "u-owner",
        "role": {"id": 1, "name": "owner", "permissions": ["users.*"]}
    }));
    let ctx = RequestContext::new("req-0006").with_path("/users/3").with_user(owner);
    print_outcome("owner DELETE /users/3", &ctx, handle_delete_user(&pipeline, &ctx, "3"));

    // Scenario 6: Super-admin bypass
    let root = Some(AuthenticatedUser::new("root").super_admin());
    let ctx = RequestContext::new("req-0007").with_path("/users/5").with_user(root);
    print_outcome("super-admin DELETE /users/5", &ctx, handle_delete_user(&pipeline, &ctx, "5"));

    // Step 5: Audit trail
    println!("\n=== Audit Trail ===");
    if let Some(trail) = pipeline.audit_trail() {
        for event in trail.events() {
            println!("{event}");
        }
    }

    Ok(())
}
