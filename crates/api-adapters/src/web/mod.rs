//! # axum Router
//!
//! Reads answer with the read model as JSON. Mutations answer with
//! `{ "message": { "level", "text" }, "data": ... }`; failures use the same
//! `message` shape plus `fields` (422) or `conflict` (409).

mod error;
mod extract;
mod handlers;

use std::sync::Arc;

use axum::body::Body;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{HeaderName, Method, Request};
use axum::routing::{delete, get, post};
use axum::Router;
use domains::ports::{
    ArticleRepository, CatalogRepository, IntakeRepository, MembershipRepository,
    PasswordHasher, ShowcaseRepository, TokenIssuer, UserRepository,
};
use domains::JoinPolicy;
use services::{
    AccountsService, CatalogService, ContactService, MembershipService, NewsletterService,
    PublicationService,
};
use tower::ServiceBuilder;
use tower_http::compression::CompressionLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;

use crate::metrics::Metrics;

pub use error::ApiError;
pub use extract::{CurrentUser, JsonBody, OptionalUser, PathParam};

const REQUEST_ID: &str = "x-request-id";

/// Shared by every handler. Cloning is cheap.
#[derive(Clone)]
pub struct AppState {
    pub accounts: Arc<AccountsService>,
    pub catalog: Arc<CatalogService>,
    pub membership: Arc<MembershipService>,
    pub publication: Arc<PublicationService>,
    pub newsletter: Arc<NewsletterService>,
    pub contact: Arc<ContactService>,
    pub metrics: Metrics,
}

impl AppState {
    /// Wires every service over one store that implements all repository ports.
    pub fn assemble<S>(
        store: Arc<S>,
        hasher: Arc<dyn PasswordHasher>,
        tokens: Arc<dyn TokenIssuer>,
        policy: JoinPolicy,
        newsletter_source: impl Into<String>,
    ) -> Self
    where
        S: UserRepository
            + CatalogRepository
            + ShowcaseRepository
            + MembershipRepository
            + ArticleRepository
            + IntakeRepository
            + 'static,
    {
        let users: Arc<dyn UserRepository> = store.clone();
        let catalog: Arc<dyn CatalogRepository> = store.clone();
        let showcase: Arc<dyn ShowcaseRepository> = store.clone();
        let memberships: Arc<dyn MembershipRepository> = store.clone();
        let articles: Arc<dyn ArticleRepository> = store.clone();
        let intake: Arc<dyn IntakeRepository> = store;

        Self {
            accounts: Arc::new(AccountsService::new(users.clone(), hasher, tokens)),
            catalog: Arc::new(CatalogService::new(
                catalog.clone(),
                showcase,
                memberships.clone(),
                articles.clone(),
            )),
            membership: Arc::new(MembershipService::new(catalog.clone(), memberships, policy)),
            publication: Arc::new(PublicationService::new(users, articles, catalog)),
            newsletter: Arc::new(NewsletterService::new(intake.clone(), newsletter_source)),
            contact: Arc::new(ContactService::new(intake)),
            metrics: Metrics::new(),
        }
    }
}

pub fn router(state: AppState) -> Router {
    let request_id = HeaderName::from_static(REQUEST_ID);

    let public = Router::new()
        .route("/health", get(handlers::system::health))
        .route("/metrics", get(handlers::system::metrics))
        .route("/", get(handlers::catalog::home))
        .route("/projects", get(handlers::catalog::list_projects))
        .route("/projects/{id}", get(handlers::catalog::project_detail))
        .route("/projects/{id}/join", post(handlers::membership::join))
        .route("/projects/{id}/leave", post(handlers::membership::leave))
        .route("/projects/{id}/requests", post(handlers::membership::request_join))
        .route(
            "/membership-requests/{id}/cancel",
            post(handlers::membership::cancel_request),
        )
        .route("/clubs", get(handlers::catalog::list_clubs))
        .route("/clubs/{id}", get(handlers::catalog::club_detail))
        .route("/programs", get(handlers::catalog::list_programs))
        .route("/programs/{id}", get(handlers::catalog::program_detail))
        .route("/partner-schools", get(handlers::catalog::list_schools))
        .route("/partner-schools/{id}", get(handlers::catalog::school_detail))
        .route("/impact", get(handlers::catalog::impact))
        .route("/spotlight", get(handlers::catalog::spotlight))
        .route("/donations", get(handlers::catalog::donations))
        .route("/resources", get(handlers::catalog::resources))
        .route("/gallery", get(handlers::catalog::gallery))
        .route("/team", get(handlers::catalog::team))
        .route("/mentors", get(handlers::catalog::mentors))
        .route("/testimonials", get(handlers::catalog::testimonials))
        .route(
            "/articles",
            get(handlers::publication::list_articles).post(handlers::publication::add_article),
        )
        .route(
            "/articles/{id}",
            get(handlers::publication::article_detail).put(handlers::publication::edit_article),
        )
        .route("/blog", get(handlers::publication::list_blog_posts))
        .route("/blog/{id}", get(handlers::publication::blog_post_detail))
        .route("/become-member", post(handlers::publication::become_member))
        .route("/register", post(handlers::accounts::register))
        .route("/login", post(handlers::accounts::login))
        .route("/profile", get(handlers::accounts::profile))
        .route("/contact", post(handlers::intake::contact))
        .route("/newsletter/subscribe", post(handlers::intake::subscribe));

    let staff = Router::new()
        .route("/categories", post(handlers::staff::create_category))
        .route("/projects", post(handlers::staff::create_project))
        .route("/projects/{id}", delete(handlers::staff::delete_project))
        .route("/projects/{id}/requests", get(handlers::staff::pending_requests))
        .route("/programs", post(handlers::staff::create_program))
        .route("/schools", post(handlers::staff::create_school))
        .route("/clubs", post(handlers::staff::create_club))
        .route("/blog", post(handlers::staff::create_blog_post))
        .route(
            "/membership-requests/{id}/approve",
            post(handlers::staff::approve_request),
        )
        .route(
            "/membership-requests/{id}/reject",
            post(handlers::staff::reject_request),
        )
        .route("/newsletter", get(handlers::staff::subscriptions))
        .route(
            "/newsletter/{id}/deactivate",
            post(handlers::staff::deactivate_subscription),
        )
        .route("/contact-messages", get(handlers::staff::contact_messages));

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([AUTHORIZATION, CONTENT_TYPE])
        .expose_headers([request_id.clone()]);

    public
        .nest("/staff", staff)
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::new(request_id.clone(), MakeRequestUuid))
                .layer(TraceLayer::new_for_http().make_span_with(|req: &Request<Body>| {
                    let id = req
                        .headers()
                        .get(REQUEST_ID)
                        .and_then(|v| v.to_str().ok())
                        .unwrap_or_default();
                    tracing::info_span!(
                        "http",
                        method = %req.method(),
                        uri = %req.uri(),
                        request_id = %id,
                    )
                }))
                .layer(PropagateRequestIdLayer::new(request_id))
                .layer(cors)
                .layer(CompressionLayer::new()),
        )
}
