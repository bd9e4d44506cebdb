/// Integration tests for authentication, role checks and platform endpoints
///
/// These tests require a running PostgreSQL database.
/// Run with: cargo test --test access_tests
///
/// Database URL should be set via DATABASE_URL environment variable.

mod common;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use common::TestContext;
use serde_json::json;
use strive_shared::models::membership::{Membership, OrgRole};
use strive_shared::models::user::PlatformRole;
use tower::Service as _;

#[tokio::test]
async fn test_health_check() {
    let ctx = TestContext::new().await.unwrap();

    let request = Request::builder().uri("/health").body(Body::empty()).unwrap();
    let response = ctx.app.clone().call(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get("X-Content-Type-Options").unwrap(),
        "nosniff"
    );

    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["status"], "healthy");
    assert_eq!(json["database"], "connected");

    ctx.cleanup().await.unwrap();
}

#[tokio::test]
async fn test_requests_without_valid_token_are_rejected() {
    let ctx = TestContext::new().await.unwrap();

    let (status, _) = ctx.send("GET", "/v1/loops", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = ctx.send("GET", "/v1/loops", Some("not-a-jwt"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // Signed correctly but for a user that does not exist
    let ghost = common::token_for(uuid::Uuid::new_v4(), None).unwrap();
    let (status, _) = ctx.send("GET", "/v1/loops", Some(&ghost), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    ctx.cleanup().await.unwrap();
}

#[tokio::test]
async fn test_loop_permissions() {
    let ctx = TestContext::new().await.unwrap();
    let (_, viewer) = ctx.add_member(OrgRole::Viewer).await.unwrap();
    let (_, member) = ctx.add_member(OrgRole::Member).await.unwrap();
    let (_, other_member) = ctx.add_member(OrgRole::Member).await.unwrap();
    let (_, admin) = ctx.add_member(OrgRole::Admin).await.unwrap();

    let create = json!({ "property_address": "12 Harbor Lane" });

    let (status, _) = ctx
        .send("POST", "/v1/loops", Some(&viewer), Some(create.clone()))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, created) = ctx
        .send("POST", "/v1/loops", Some(&member), Some(create))
        .await;
    assert_eq!(status, StatusCode::CREATED, "body: {}", created);
    assert_eq!(created["status"], "DRAFT");
    let uri = format!("/v1/loops/{}", created["id"].as_str().unwrap());

    let (status, body) = ctx.send("GET", "/v1/loops", Some(&viewer), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["loops"].as_array().unwrap().len(), 1);

    // Creator may edit; another MEMBER may not; ADMIN may
    let (status, body) = ctx
        .send("PATCH", &uri, Some(&member), Some(json!({ "status": "ACTIVE" })))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ACTIVE");

    let (status, _) = ctx
        .send("PATCH", &uri, Some(&other_member), Some(json!({ "status": "CLOSED" })))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = ctx
        .send(
            "PATCH",
            &uri,
            Some(&admin),
            Some(json!({ "status": "UNDER_CONTRACT" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = ctx.send("DELETE", &uri, Some(&member), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = ctx.send("DELETE", &uri, Some(&ctx.jwt_token), None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = ctx.send("DELETE", &uri, Some(&ctx.jwt_token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Loop not found");

    ctx.cleanup().await.unwrap();
}

#[tokio::test]
async fn test_loops_are_scoped_to_the_organization() {
    let ctx = TestContext::new().await.unwrap();
    let other = TestContext::new().await.unwrap();

    let (_, created) = other
        .send(
            "POST",
            "/v1/loops",
            Some(&other.jwt_token),
            Some(json!({ "property_address": "9 Bay Road" })),
        )
        .await;
    let uri = format!("/v1/loops/{}", created["id"].as_str().unwrap());

    let (status, _) = ctx
        .send("PATCH", &uri, Some(&ctx.jwt_token), Some(json!({ "status": "CLOSED" })))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = ctx.send("DELETE", &uri, Some(&ctx.jwt_token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    ctx.cleanup().await.unwrap();
    other.cleanup().await.unwrap();
}

#[tokio::test]
async fn test_member_removal() {
    let ctx = TestContext::new().await.unwrap();
    let (_, admin) = ctx.add_member(OrgRole::Admin).await.unwrap();
    let (member, member_token) = ctx.add_member(OrgRole::Member).await.unwrap();

    let (status, body) = ctx.send("GET", "/v1/members", Some(&member_token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["members"].as_array().unwrap().len(), 3);

    let owner_uri = format!("/v1/members/{}", ctx.user.id);
    let (status, _) = ctx.send("DELETE", &owner_uri, Some(&member_token), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = ctx.send("DELETE", &owner_uri, Some(&admin), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["message"], "Cannot remove the organization owner");

    let member_uri = format!("/v1/members/{}", member.id);
    let (status, body) = ctx.send("DELETE", &member_uri, Some(&admin), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["removed"], true);
    assert!(!Membership::is_member(&ctx.db, ctx.organization.id, member.id)
        .await
        .unwrap());

    let (status, _) = ctx.send("DELETE", &member_uri, Some(&admin), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    ctx.cleanup().await.unwrap();
}

#[tokio::test]
async fn test_onboarding_cleanup_is_admin_only() {
    let ctx = TestContext::new().await.unwrap();

    let (status, _) = ctx
        .send("POST", "/v1/admin/onboarding/cleanup", Some(&ctx.jwt_token), None)
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (_, admin) = ctx.add_outsider(PlatformRole::Admin).await.unwrap();
    let (status, body) = ctx
        .send("POST", "/v1/admin/onboarding/cleanup", Some(&admin), None)
        .await;
    assert_eq!(status, StatusCode::OK, "body: {}", body);
    assert!(body["deleted_count"].is_u64());
    assert!(body["message"]
        .as_str()
        .unwrap()
        .starts_with("Cleaned up "));

    ctx.cleanup().await.unwrap();
}
