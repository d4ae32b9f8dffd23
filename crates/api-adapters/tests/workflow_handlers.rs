//! Drives the axum router end to end over the in-memory store.

use std::sync::Arc;

use api_adapters::{router, AppState};
use auth_adapters::{Argon2Hasher, JwtIssuer};
use axum::body::Body;
use axum::http::{header, HeaderMap, Method, Request, StatusCode};
use axum::Router;
use domains::JoinPolicy;
use serde_json::{json, Value};
use storage_adapters::MemoryStore;
use tower::ServiceExt;
use uuid::Uuid;

struct TestApp {
    router: Router,
    store: Arc<MemoryStore>,
    state: AppState,
}

fn app() -> TestApp {
    let store = Arc::new(MemoryStore::new());
    let state = AppState::assemble(
        store.clone(),
        Arc::new(Argon2Hasher::new()),
        Arc::new(JwtIssuer::new(b"router-test-secret", 60)),
        JoinPolicy::Direct,
        "website",
    );
    TestApp {
        router: router(state.clone()),
        store,
        state,
    }
}

impl TestApp {
    async fn send(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value, HeaderMap) {
        let mut request = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            request = request.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let request = match body {
            Some(body) => request
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => request.body(Body::empty()).unwrap(),
        };
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, json, headers)
    }

    /// Registers an account and returns `(user id, token)`.
    async fn register(&self, username: &str) -> (Uuid, String) {
        let (status, body, _) = self
            .send(
                Method::POST,
                "/register",
                None,
                Some(json!({
                    "username": username,
                    "email": format!("{username}@example.org"),
                    "password": "correct horse battery",
                    "password_confirm": "correct horse battery",
                })),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "{body}");
        let id = body["data"]["user"]["id"].as_str().unwrap().parse().unwrap();
        let token = body["data"]["token"]["token"].as_str().unwrap().to_string();
        (id, token)
    }

    async fn staff(&self, username: &str) -> String {
        let (id, token) = self.register(username).await;
        self.store.set_staff(id, true).unwrap();
        token
    }

    /// Creates a category and a project through the staff routes.
    async fn project(&self, staff_token: &str) -> String {
        let (_, category, _) = self
            .send(
                Method::POST,
                "/staff/categories",
                Some(staff_token),
                Some(json!({ "name": "Health" })),
            )
            .await;
        let (status, project, _) = self
            .send(
                Method::POST,
                "/staff/projects",
                Some(staff_token),
                Some(json!({
                    "category_id": category["data"]["id"],
                    "image": "projects/wells.jpg",
                    "title": "Clean Water",
                })),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "{project}");
        project["data"]["id"].as_str().unwrap().to_string()
    }
}

#[tokio::test]
async fn health_answers_ok() {
    let app = app();
    let (status, body, _) = app.send(Method::GET, "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn every_response_carries_a_request_id() {
    let app = app();
    let (_, _, headers) = app.send(Method::GET, "/projects", None, None).await;
    let id = headers.get("x-request-id").unwrap().to_str().unwrap();
    assert!(Uuid::parse_str(id).is_ok());
}

#[tokio::test]
async fn profile_requires_a_token() {
    let app = app();
    let (status, body, _) = app.send(Method::GET, "/profile", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"]["level"], "error");

    let (status, _, _) = app.send(Method::GET, "/profile", Some("not-a-jwt"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn registered_user_sees_their_profile() {
    let app = app();
    let (id, token) = app.register("amina").await;
    let (status, body, _) = app.send(Method::GET, "/profile", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["id"], id.to_string());
    assert_eq!(body["is_member"], true);
    assert!(body["user"].get("password_hash").is_none());
}

#[tokio::test]
async fn invalid_registration_lists_field_errors() {
    let app = app();
    let (status, body, _) = app
        .send(
            Method::POST,
            "/register",
            None,
            Some(json!({
                "username": "amina",
                "email": "not-an-email",
                "password": "short",
                "password_confirm": "different",
            })),
        )
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["message"]["text"], "Please correct the errors below.");
    let fields: Vec<&str> = body["fields"]
        .as_array()
        .unwrap()
        .iter()
        .map(|f| f["field"].as_str().unwrap())
        .collect();
    assert!(fields.contains(&"email"));
    assert!(fields.contains(&"password"));
}

#[tokio::test]
async fn joining_twice_keeps_one_membership() {
    let app = app();
    let staff = app.staff("coordinator").await;
    let project = app.project(&staff).await;
    let (_, token) = app.register("amina").await;

    let uri = format!("/projects/{project}/join");
    let (status, first, _) = app.send(Method::POST, &uri, Some(&token), None).await;
    assert_eq!(status, StatusCode::OK, "{first}");
    assert_eq!(first["message"]["level"], "success");
    assert_eq!(first["data"]["role"], "student");

    let (status, second, _) = app
        .send(Method::POST, &uri, Some(&token), Some(json!({ "role": "mentor" })))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(second["message"]["level"], "info");
    assert_eq!(second["data"]["id"], first["data"]["id"]);
    assert_eq!(second["data"]["role"], "student");

    let (_, detail, _) = app
        .send(Method::GET, &format!("/projects/{project}"), Some(&token), None)
        .await;
    assert_eq!(detail["members_count"], 1);
    assert_eq!(app.state.metrics.count("join", "ok"), 2);
}

#[tokio::test]
async fn staff_routes_reject_regular_users() {
    let app = app();
    let (_, token) = app.register("amina").await;
    let (status, _, _) = app
        .send(
            Method::POST,
            "/staff/categories",
            Some(&token),
            Some(json!({ "name": "Health" })),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn unknown_project_is_not_found() {
    let app = app();
    let (status, body, _) = app
        .send(Method::GET, &format!("/projects/{}", Uuid::now_v7()), None, None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"]["text"], "Project not found.");
}

#[tokio::test]
async fn malformed_path_id_uses_the_error_shape() {
    let app = app();
    let (status, body, _) = app.send(Method::GET, "/projects/not-a-uuid", None, None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"]["level"], "error");
    assert!(!body["message"]["text"].as_str().unwrap().is_empty());
}

#[tokio::test]
async fn malformed_json_is_a_client_error() {
    let app = app();
    let request = Request::builder()
        .method(Method::POST)
        .uri("/contact")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{ not json"))
        .unwrap();
    let response = app.router.clone().oneshot(request).await.unwrap();
    assert!(response.status().is_client_error());
}

#[tokio::test]
async fn metrics_expose_workflow_counters() {
    let app = app();
    app.send(
        Method::POST,
        "/newsletter/subscribe",
        None,
        Some(json!({ "email": "Reader@Example.org" })),
    )
    .await;
    let (status, dup, _) = app
        .send(
            Method::POST,
            "/newsletter/subscribe",
            None,
            Some(json!({ "email": "reader@example.org" })),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(dup["conflict"], "duplicate_active");

    let request = Request::builder().uri("/metrics").body(Body::empty()).unwrap();
    let response = app.router.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let text = String::from_utf8(bytes.to_vec()).unwrap();
    assert!(text.contains(r#"ycbn_workflow_total{operation="subscribe",outcome="ok"} 1"#));
    assert!(text.contains(r#"ycbn_workflow_total{operation="subscribe",outcome="conflict"} 1"#));
}
