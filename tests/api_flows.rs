//! Integration flows against a mocked planner backend.

use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use daisy::api::ApiClient;
use daisy::model::{TaskStatus, ViewType};
use daisy::Error;

fn user_body() -> serde_json::Value {
    serde_json::json!({
        "id": 1,
        "username": "alice",
        "email": "alice@example.com",
        "location": "Portland"
    })
}

fn task_body(id: i64, title: &str, status: &str) -> serde_json::Value {
    serde_json::json!({
        "id": id,
        "planner_id": 7,
        "title": title,
        "status": status,
        "created_at": "2024-06-01T10:00:00"
    })
}

#[tokio::test]
async fn login_then_profile_round_trip() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .and(body_json(serde_json::json!({
            "email": "alice@example.com",
            "password": "hunter2"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "message": "Login successful",
            "token": "jwt-token",
            "user": user_body()
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/auth/profile"))
        .and(header("Authorization", "Bearer jwt-token"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({ "user": user_body() })),
        )
        .mount(&server)
        .await;

    let anonymous = ApiClient::new(server.uri(), None).expect("client");
    let login = anonymous
        .login("alice@example.com", "hunter2")
        .await
        .expect("login");
    assert_eq!(login.token, "jwt-token");
    assert_eq!(login.user.username, "alice");

    let authed = ApiClient::new(server.uri(), Some(login.token)).expect("client");
    let user = authed.profile().await.expect("profile");
    assert_eq!(user.location.as_deref(), Some("Portland"));
}

#[tokio::test]
async fn task_lifecycle_create_complete_delete() {
    let server = MockServer::start().await;
    let client = ApiClient::new(server.uri(), Some("tok".to_string())).expect("client");

    Mock::given(method("POST"))
        .and(path("/planners/7/tasks"))
        .respond_with(ResponseTemplate::new(201).set_body_json(task_body(
            42,
            "[2024-06-01][2PM] Buy milk",
            "pending",
        )))
        .mount(&server)
        .await;
    Mock::given(method("PATCH"))
        .and(path("/tasks/42/status"))
        .and(body_json(serde_json::json!({ "status": "completed" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(task_body(
            42,
            "[2024-06-01][2PM] Buy milk",
            "completed",
        )))
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/tasks/42"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({ "message": "Task deleted" })),
        )
        .mount(&server)
        .await;

    let created = client
        .create_task(7, "[2024-06-01][2PM] Buy milk")
        .await
        .expect("create");
    assert_eq!(created.id, 42);
    assert_eq!(created.status, TaskStatus::Pending);

    let completed = client
        .set_task_status(42, TaskStatus::Completed)
        .await
        .expect("status");
    assert_eq!(completed.status, TaskStatus::Completed);

    client.delete_task(42).await.expect("delete");
}

#[tokio::test]
async fn edit_saga_surfaces_the_lost_task_when_recreate_fails() {
    // The edit path is delete-then-create. When the create half fails the
    // old task is already gone; the client must report the create error so
    // the caller can say so instead of pretending nothing happened.
    let server = MockServer::start().await;
    let client = ApiClient::new(server.uri(), Some("tok".to_string())).expect("client");

    Mock::given(method("DELETE"))
        .and(path("/tasks/42"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({ "message": "Task deleted" })),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/planners/7/tasks"))
        .respond_with(
            ResponseTemplate::new(500)
                .set_body_json(serde_json::json!({ "message": "database locked" })),
        )
        .expect(1)
        .mount(&server)
        .await;

    client.delete_task(42).await.expect("delete half");
    let err = client
        .create_task(7, "[2024-06-01][2PM] Buy oat milk")
        .await
        .expect_err("create half fails");
    match err {
        Error::Api { status, message } => {
            assert_eq!(status, 500);
            assert_eq!(message, "database locked");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn missing_planner_is_a_named_error() {
    let server = MockServer::start().await;
    let client = ApiClient::new(server.uri(), Some("tok".to_string())).expect("client");

    Mock::given(method("GET"))
        .and(path("/planners/99/tasks"))
        .respond_with(
            ResponseTemplate::new(404)
                .set_body_json(serde_json::json!({ "message": "Planner not found" })),
        )
        .mount(&server)
        .await;

    let err = client.tasks(99).await.expect_err("404");
    assert!(matches!(err, Error::PlannerNotFound(_)));
}

#[tokio::test]
async fn create_planner_sends_view_type() {
    let server = MockServer::start().await;
    let client = ApiClient::new(server.uri(), Some("tok".to_string())).expect("client");

    Mock::given(method("POST"))
        .and(path("/planners"))
        .and(body_json(serde_json::json!({
            "name": "Chores",
            "view_type": "weekly"
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!({
            "id": 7,
            "name": "Chores",
            "view_type": "weekly",
            "created_at": "2024-06-01T10:00:00"
        })))
        .mount(&server)
        .await;

    let planner = client
        .create_planner("Chores", ViewType::Weekly)
        .await
        .expect("planner");
    assert_eq!(planner.id, 7);
    assert_eq!(planner.view_type, ViewType::Weekly);
}

#[tokio::test]
async fn expired_token_maps_to_session_expired_everywhere() {
    let server = MockServer::start().await;
    let client = ApiClient::new(server.uri(), Some("stale".to_string())).expect("client");

    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(401)
                .set_body_json(serde_json::json!({ "message": "Token has expired" })),
        )
        .mount(&server)
        .await;

    let err = client.planners().await.expect_err("401");
    assert!(matches!(err, Error::SessionExpired));
    let err = client.profile().await.expect_err("401");
    assert!(matches!(err, Error::SessionExpired));
}
