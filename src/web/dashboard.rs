//! The dashboard and its approval gate.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::State,
    response::{IntoResponse, Redirect, Response},
};
use std::sync::Arc;
use tower_sessions::Session;

use crate::state::AppState;
use crate::web::auth::LoginTemplate;
use crate::web::session::{self, Notice};

#[derive(Template, WebTemplate)]
#[template(path = "dashboard.html")]
pub struct DashboardTemplate {
    pub email: String,
    pub is_admin: bool,
    pub notices: Vec<Notice>,
}

#[derive(Template, WebTemplate)]
#[template(path = "pending.html")]
pub struct PendingTemplate {
    pub email: String,
}

/// GET /
///
/// The approval gate. The account is re-fetched by id on every view so an
/// admin's approve takes effect on the user's next page load, with no
/// re-login. An account that no longer exists means it was rejected after
/// login: the session is cleared and the user lands back on the login page.
pub async fn dashboard(State(state): State<Arc<AppState>>, session: Session) -> Response {
    let Some(user) = session::current(&session).await else {
        return Redirect::to("/login").into_response();
    };

    match state.accounts().fetch(user.account_id).await {
        Ok(Some(account)) if account.is_approved => DashboardTemplate {
            email: account.email,
            is_admin: account.is_admin,
            notices: session::take_notices(&session).await,
        }
        .into_response(),
        Ok(Some(account)) => PendingTemplate {
            email: account.email,
        }
        .into_response(),
        Ok(None) => {
            tracing::info!(account_id = user.account_id, "Session account gone, forcing logout");
            session::clear(&session).await;
            Redirect::to("/login").into_response()
        }
        Err(e) => {
            tracing::error!("Dashboard account re-fetch failed: {e}");
            LoginTemplate {
                error: Some("Database connection error".to_string()),
                notices: vec![],
            }
            .into_response()
        }
    }
}
