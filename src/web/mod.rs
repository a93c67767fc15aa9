use axum::{Router, routing::get};
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tower_sessions::{Expiry, MemoryStore, SessionManagerLayer};

use crate::state::AppState;

pub mod admin;
pub mod auth;
pub mod dashboard;
pub mod session;

pub async fn router(state: Arc<AppState>) -> Router {
    let (secure_cookies, inactivity_minutes) = {
        let config = state.config.read().await;
        (
            config.server.secure_cookies,
            config.session.inactivity_minutes,
        )
    };

    let session_store = MemoryStore::default();
    let session_layer = SessionManagerLayer::new(session_store)
        .with_secure(secure_cookies)
        .with_same_site(tower_sessions::cookie::SameSite::Lax)
        .with_expiry(Expiry::OnInactivity(time::Duration::minutes(
            inactivity_minutes,
        )));

    Router::new()
        .route("/", get(dashboard::dashboard))
        .route("/login", get(auth::login_page).post(auth::login))
        .route("/signup", get(auth::signup_page).post(auth::signup))
        .route("/logout", get(auth::logout))
        .route("/admin", get(admin::admin_panel))
        // Moderation actions are plain navigable links, mutating on GET with
        // no CSRF token. Known gap, kept to match documented behavior.
        .route("/approve/{id}", get(admin::approve))
        .route("/reject/{id}", get(admin::reject))
        .layer(session_layer)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}
