/// Integration tests for the bulk task and lead endpoints
///
/// These tests require a running PostgreSQL database.
/// Run with: cargo test --test bulk_api_tests
///
/// Database URL should be set via DATABASE_URL environment variable.

mod common;

use axum::http::StatusCode;
use common::TestContext;
use serde_json::json;
use strive_shared::models::activity_log::ActivityLog;
use strive_shared::models::lead::Lead;
use strive_shared::models::membership::OrgRole;
use strive_shared::models::project::Project;
use strive_shared::models::task::{CreateTask, Task, TaskStatus};
use uuid::Uuid;

async fn create_tasks(ctx: &TestContext, n: usize) -> Vec<Uuid> {
    let project = Project::create(&ctx.db, ctx.organization.id, "Closings")
        .await
        .unwrap();

    let mut ids = Vec::with_capacity(n);
    for i in 0..n {
        let task = Task::create(
            &ctx.db,
            CreateTask {
                project_id: project.id,
                title: format!("Follow up {}", i),
                created_by_id: Some(ctx.user.id),
            },
        )
        .await
        .unwrap();
        ids.push(task.id);
    }
    ids
}

#[tokio::test]
async fn test_bulk_task_status() {
    let ctx = TestContext::new().await.unwrap();
    let ids = create_tasks(&ctx, 3).await;

    let (status, body) = ctx
        .send(
            "POST",
            "/v1/tasks/bulk/status",
            Some(&ctx.jwt_token),
            Some(json!({ "ids": ids, "status": "DONE" })),
        )
        .await;

    assert_eq!(status, StatusCode::OK, "body: {}", body);
    assert_eq!(body["count"], 3);

    for id in &ids {
        let task = Task::find_by_id(&ctx.db, *id).await.unwrap().unwrap();
        assert_eq!(task.status, TaskStatus::Done);
    }

    let entries = ActivityLog::list_recent(&ctx.db, ctx.organization.id, 10)
        .await
        .unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].action, "BULK_UPDATE_STATUS");

    ctx.cleanup().await.unwrap();
}

#[tokio::test]
async fn test_bulk_task_rejects_foreign_ids() {
    let ctx = TestContext::new().await.unwrap();
    let other = TestContext::new().await.unwrap();

    let mut ids = create_tasks(&ctx, 2).await;
    ids.extend(create_tasks(&other, 1).await);

    let (status, body) = ctx
        .send(
            "POST",
            "/v1/tasks/bulk/delete",
            Some(&ctx.jwt_token),
            Some(json!({ "ids": ids })),
        )
        .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(
        body["message"],
        "Some tasks not found or you do not have permission to delete them"
    );

    // Nothing was deleted, including the caller's own tasks
    for id in &ids {
        assert!(Task::find_by_id(&ctx.db, *id).await.unwrap().is_some());
    }

    ctx.cleanup().await.unwrap();
    other.cleanup().await.unwrap();
}

#[tokio::test]
async fn test_bulk_assign_requires_member_assignee() {
    let ctx = TestContext::new().await.unwrap();
    let ids = create_tasks(&ctx, 2).await;
    let (outsider, _) = ctx
        .add_outsider(strive_shared::models::user::PlatformRole::User)
        .await
        .unwrap();

    let (status, body) = ctx
        .send(
            "POST",
            "/v1/tasks/bulk/assign",
            Some(&ctx.jwt_token),
            Some(json!({ "ids": ids, "assigned_to_id": outsider.id })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Assignee not found in your organization");

    let (member, _) = ctx.add_member(OrgRole::Member).await.unwrap();
    let (status, body) = ctx
        .send(
            "POST",
            "/v1/tasks/bulk/assign",
            Some(&ctx.jwt_token),
            Some(json!({ "ids": ids, "assigned_to_id": member.id })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 2);

    ctx.cleanup().await.unwrap();
}

#[tokio::test]
async fn test_bulk_priority_and_validation() {
    let ctx = TestContext::new().await.unwrap();
    let ids = create_tasks(&ctx, 1).await;

    let (status, body) = ctx
        .send(
            "POST",
            "/v1/tasks/bulk/priority",
            Some(&ctx.jwt_token),
            Some(json!({ "ids": ids, "priority": "CRITICAL" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "body: {}", body);
    assert_eq!(body["count"], 1);

    let empty: Vec<Uuid> = vec![];
    let (status, _) = ctx
        .send(
            "POST",
            "/v1/tasks/bulk/priority",
            Some(&ctx.jwt_token),
            Some(json!({ "ids": empty, "priority": "LOW" })),
        )
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    ctx.cleanup().await.unwrap();
}

#[tokio::test]
async fn test_bulk_viewer_is_forbidden() {
    let ctx = TestContext::new().await.unwrap();
    let ids = create_tasks(&ctx, 1).await;
    let (_, viewer_token) = ctx.add_member(OrgRole::Viewer).await.unwrap();

    let (status, _) = ctx
        .send(
            "POST",
            "/v1/tasks/bulk/status",
            Some(&viewer_token),
            Some(json!({ "ids": ids, "status": "DONE" })),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    ctx.cleanup().await.unwrap();
}

#[tokio::test]
async fn test_bulk_lead_status_and_delete() {
    let ctx = TestContext::new().await.unwrap();

    let mut ids = Vec::new();
    for name in ["Jordan Lee", "Sam Ortiz"] {
        let lead = Lead::create(&ctx.db, ctx.organization.id, name, None)
            .await
            .unwrap();
        ids.push(lead.id);
    }

    let (status, body) = ctx
        .send(
            "POST",
            "/v1/leads/bulk/status",
            Some(&ctx.jwt_token),
            Some(json!({ "ids": ids, "status": "QUALIFIED" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "body: {}", body);
    assert_eq!(body["count"], 2);

    let (status, body) = ctx
        .send(
            "POST",
            "/v1/leads/bulk/delete",
            Some(&ctx.jwt_token),
            Some(json!({ "ids": ids })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 2);

    for id in &ids {
        assert!(Lead::find_by_id(&ctx.db, *id).await.unwrap().is_none());
    }

    ctx.cleanup().await.unwrap();
}
