//! Shared fixtures: the full service graph over `MemoryStore`, plus seeders
//! for the rows only staff or administrators create.

use std::sync::Arc;

use api_adapters::AppState;
use auth_adapters::JwtIssuer;
use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use domains::inputs::{CategoryInput, ProjectInput, RegisterInput};
use domains::ports::MockPasswordHasher;
use domains::{JoinPolicy, Project, User};
use serde_json::Value;
use storage_adapters::MemoryStore;
use tower::ServiceExt;

pub const PASSWORD: &str = "correct horse battery";

/// Argon2 is too slow for a test suite that registers dozens of accounts.
fn plain_hasher() -> MockPasswordHasher {
    let mut hasher = MockPasswordHasher::new();
    hasher
        .expect_hash()
        .returning(|password| Ok(format!("plain${password}")));
    hasher
        .expect_verify()
        .returning(|password, hash| hash == format!("plain${password}"));
    hasher
}

pub struct Harness {
    pub store: Arc<MemoryStore>,
    pub state: AppState,
}

impl Harness {
    pub fn new(policy: JoinPolicy) -> Self {
        let store = Arc::new(MemoryStore::new());
        let state = AppState::assemble(
            store.clone(),
            Arc::new(plain_hasher()),
            Arc::new(JwtIssuer::new(b"integration-secret", 30)),
            policy,
            "website",
        );
        Self { store, state }
    }

    pub fn direct() -> Self {
        Self::new(JoinPolicy::Direct)
    }

    pub fn review() -> Self {
        Self::new(JoinPolicy::Review)
    }

    pub fn router(&self) -> Router {
        api_adapters::router(self.state.clone())
    }

    /// A freshly registered account (with the member capability) and its token.
    pub async fn user(&self, username: &str) -> (User, String) {
        let session = self
            .state
            .accounts
            .register(RegisterInput {
                username: username.into(),
                email: format!("{username}@example.org"),
                password: PASSWORD.into(),
                password_confirm: PASSWORD.into(),
                full_name: None,
            })
            .await
            .unwrap();
        (session.user, session.token.token)
    }

    pub async fn staff(&self, username: &str) -> (User, String) {
        let (mut user, token) = self.user(username).await;
        self.store.set_staff(user.id, true).unwrap();
        user.is_staff = true;
        (user, token)
    }

    /// Creates a project in a new category named after it.
    pub async fn project(&self, staff: &User, title: &str) -> Project {
        let category = self
            .state
            .catalog
            .create_category(
                staff,
                CategoryInput {
                    name: format!("{title} category"),
                },
            )
            .await
            .unwrap();
        self.state
            .catalog
            .create_project(
                staff,
                ProjectInput {
                    category_id: Some(category.id),
                    image: Some(format!("projects/{title}.jpg")),
                    title: title.into(),
                    description: None,
                },
            )
            .await
            .unwrap()
    }

    /// Sends one request through the router and decodes the JSON body.
    pub async fn call(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut request = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            request = request.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let request = match body {
            Some(body) => request
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string())),
            None => request.body(Body::empty()),
        }
        .unwrap();
        let response = self.router().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
    }
}
