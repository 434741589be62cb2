//! Integration tests for authorization over tokens issued by login.

mod helpers;

use std::collections::BTreeSet;

use warden_auth::{AccessGuard, AuthContext, AuthError, Decision, DenyReason, Requirement};
use warden_entity::{PermissionCode, User};

use helpers::{PASSWORD, TestEngine, permission, role, tenant, user};

async fn login_as(engine: &TestEngine, user: User) -> (String, String) {
    let email = user.email.clone();
    engine.add_user(user).await;
    let pair = engine.manager.login(&email, PASSWORD).await.unwrap();
    (pair.access_token, pair.refresh_token)
}

fn set(codes: &[&str]) -> BTreeSet<String> {
    codes.iter().map(|c| c.to_string()).collect()
}

#[tokio::test]
async fn test_tenant_scoping() {
    let engine = TestEngine::new();
    let (access, _) = login_as(
        &engine,
        User {
            tenants: vec![tenant("Acme", true)],
            ..user("a@b.com")
        },
    )
    .await;
    let claims = engine.manager.verify(&access).unwrap();

    assert_eq!(
        AccessGuard::new().decide(&claims, &set(&[]), Some("Other")),
        Decision::Deny(DenyReason::TenantForbidden)
    );
    assert_eq!(
        AccessGuard::new().decide(&claims, &set(&[]), Some("Acme")),
        Decision::Allow
    );
}

#[tokio::test]
async fn test_superuser_bypass() {
    let engine = TestEngine::new();
    let (access, refresh) = login_as(
        &engine,
        User {
            is_superuser: true,
            ..user("root@b.com")
        },
    )
    .await;
    let guard = AccessGuard::new();

    let claims = engine.manager.verify(&access).unwrap();
    assert!(claims.permissions.is_empty());
    for (permissions, tenant) in [
        (set(&[]), None),
        (set(&[PermissionCode::ADMIN]), None),
        (set(&[PermissionCode::CREATE_TENANT]), Some("Nowhere")),
    ] {
        assert_eq!(guard.decide(&claims, &permissions, tenant), Decision::Allow);
    }

    let refresh_claims = engine.manager.verify(&refresh).unwrap();
    assert_eq!(
        guard.decide(&refresh_claims, &set(&[]), None),
        Decision::Deny(DenyReason::RefreshTokenNotAllowed)
    );
}

#[tokio::test]
async fn test_permission_cascade_reaches_guard() {
    let engine = TestEngine::new();
    let (access, _) = login_as(
        &engine,
        User {
            roles: vec![
                role("viewer", true, vec![permission("view_user", true)]),
                role("retired", false, vec![permission("create_user", true)]),
            ],
            ..user("a@b.com")
        },
    )
    .await;
    let ctx = AuthContext::from_token_at(&engine.decoder, &access, engine.now()).unwrap();

    assert!(
        ctx.authorize(&Requirement::any_of([PermissionCode::VIEW_USER]))
            .is_ok()
    );
    assert!(matches!(
        ctx.authorize(&Requirement::any_of([PermissionCode::CREATE_USER])),
        Err(AuthError::Denied(DenyReason::PermissionForbidden))
    ));
    assert!(ctx.authorize(&Requirement::authenticated()).is_ok());
}

#[tokio::test]
async fn test_context_rejects_refresh_token_use() {
    let engine = TestEngine::new();
    let (access, refresh) = login_as(&engine, user("a@b.com")).await;

    let ctx = AuthContext::from_token_at(&engine.decoder, &refresh, engine.now()).unwrap();
    assert!(matches!(
        ctx.authorize(&Requirement::authenticated()),
        Err(AuthError::Denied(DenyReason::RefreshTokenNotAllowed))
    ));

    let ctx = AuthContext::from_token_at(&engine.decoder, &access, engine.now()).unwrap();
    assert!(!ctx.is_superuser());
    assert!(ctx.tenants().is_empty());
    assert_eq!(ctx.user_id(), ctx.claims().sub);
}

#[tokio::test]
async fn test_context_requires_valid_token() {
    let engine = TestEngine::new();
    let (access, _) = login_as(&engine, user("a@b.com")).await;

    engine.advance(chrono::Duration::minutes(15));
    assert!(matches!(
        AuthContext::from_token_at(&engine.decoder, &access, engine.now()),
        Err(AuthError::Expired)
    ));
    assert!(matches!(
        AuthContext::from_token_at(&engine.decoder, "x.y.z", engine.now()),
        Err(AuthError::Malformed)
    ));
}

#[tokio::test]
async fn test_tenant_requirement_with_permission() {
    let engine = TestEngine::new();
    let (access, _) = login_as(
        &engine,
        User {
            roles: vec![role("viewer", true, vec![permission("view_user", true)])],
            tenants: vec![tenant("Acme", true), tenant("Closed", false)],
            ..user("a@b.com")
        },
    )
    .await;
    let ctx = AuthContext::from_token_at(&engine.decoder, &access, engine.now()).unwrap();

    let in_acme = Requirement::any_of([PermissionCode::VIEW_USER]).in_tenant("Acme");
    let in_closed = Requirement::any_of([PermissionCode::VIEW_USER]).in_tenant("Closed");

    assert!(ctx.authorize(&in_acme).is_ok());
    assert!(matches!(
        ctx.authorize(&in_closed),
        Err(AuthError::Denied(DenyReason::TenantForbidden))
    ));
}
