//! REST boundary: router, shared state, and request plumbing.
//!
//! The route set mirrors the public site + back-office split: content
//! reads are public, CRM routes need a session, content/campaign writes
//! need the admin role. Handlers resolve the principal from the bearer
//! token and pass it explicitly into engine calls.

pub mod auth;
pub mod content;
pub mod crm;
pub mod error;

use std::sync::Arc;

use axum::http::{header, HeaderMap};
use axum::routing::{delete, get, patch, post};
use axum::Router;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::auth::SessionManager;
use crate::core::PipelineEngine;
use crate::domain::Principal;
use crate::store::ResourceStore;

pub use error::ApiError;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn ResourceStore>,
    pub engine: Arc<PipelineEngine>,
    pub sessions: Arc<SessionManager>,
}

impl AppState {
    pub fn new(store: Arc<dyn ResourceStore>) -> Self {
        Self {
            engine: Arc::new(PipelineEngine::new(store.clone())),
            sessions: Arc::new(SessionManager::new(store.clone())),
            store,
        }
    }
}

/// The bearer token on a request, if any.
fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}

/// Resolve the acting principal, `None` for anonymous requests.
pub(crate) async fn principal(
    state: &AppState,
    headers: &HeaderMap,
) -> Result<Option<Principal>, ApiError> {
    let Some(token) = bearer_token(headers) else {
        return Ok(None);
    };
    Ok(state.sessions.resolve(token).await?)
}

/// Require an authenticated principal.
pub(crate) async fn require_auth(
    state: &AppState,
    headers: &HeaderMap,
) -> Result<Principal, ApiError> {
    principal(state, headers).await?.ok_or(ApiError::Unauthorized)
}

/// Require the admin role.
pub(crate) async fn require_admin(
    state: &AppState,
    headers: &HeaderMap,
) -> Result<Principal, ApiError> {
    let principal = require_auth(state, headers).await?;
    if !principal.is_admin() {
        return Err(ApiError::Forbidden("admin role required".to_string()));
    }
    Ok(principal)
}

/// Build the full application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(health))
        // Sessions
        .route("/api/register", post(auth::register))
        .route("/api/login", post(auth::login))
        .route("/api/logout", post(auth::logout))
        .route("/api/user", get(auth::current_user))
        // Public site content
        .route("/api/posts", get(content::list_posts).post(content::create_post))
        .route(
            "/api/posts/:slug",
            get(content::get_post).delete(content::delete_post),
        )
        .route(
            "/api/services",
            get(content::list_services).post(content::create_service),
        )
        .route("/api/services/:id", delete(content::delete_service))
        .route(
            "/api/inquiries",
            get(content::list_inquiries).post(content::create_inquiry),
        )
        .route(
            "/api/site-settings",
            get(content::get_site_settings).patch(content::update_site_settings),
        )
        .route(
            "/api/hero-slides",
            get(content::list_hero_slides).post(content::create_hero_slide),
        )
        .route(
            "/api/hero-slides/:id",
            patch(content::update_hero_slide).delete(content::delete_hero_slide),
        )
        .route("/api/hero-slides/:id/move", post(content::move_hero_slide))
        // CRM
        .route("/api/contacts", get(crm::list_contacts).post(crm::create_contact))
        .route("/api/contacts/:id", get(crm::get_contact))
        .route("/api/leads", get(crm::list_leads).post(crm::create_lead))
        .route("/api/leads/board", get(crm::lead_board))
        .route("/api/leads/:id/status", patch(crm::move_lead))
        .route("/api/leads/:id", delete(crm::delete_lead))
        .route(
            "/api/interactions",
            get(crm::list_interactions).post(crm::create_interaction),
        )
        .route(
            "/api/campaigns",
            get(crm::list_campaigns).post(crm::create_campaign),
        )
        .route("/api/campaigns/:id/status", patch(crm::move_campaign))
        .route("/api/campaigns/:id", delete(crm::delete_campaign))
        .route("/api/users", get(crm::list_users))
        .route("/api/users/:id/role", patch(crm::update_user_role))
        .route("/api/tasks", get(crm::list_tasks).post(crm::create_task))
        .route("/api/tasks/board", get(crm::task_board))
        .route("/api/tasks/:id/status", patch(crm::move_task))
        .route("/api/tasks/:id", delete(crm::delete_task))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(
                    CorsLayer::new()
                        .allow_origin(Any)
                        .allow_methods(Any)
                        .allow_headers(Any),
                ),
        )
        .with_state(state)
}

async fn health() -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({ "status": "ok" }))
}

/// Bind and serve until shutdown.
pub async fn serve(addr: &str, state: AppState) -> anyhow::Result<()> {
    let app = router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "listening");
    axum::serve(listener, app).await?;
    Ok(())
}
