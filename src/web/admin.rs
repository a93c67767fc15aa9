//! Admin panel and moderation actions.
//!
//! Authorization here checks the session's cached `is_admin` flag; a
//! non-admin (or anonymous) visitor is silently redirected to the
//! dashboard rather than shown an error page.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Path, State},
    response::{IntoResponse, Redirect, Response},
};
use std::sync::Arc;
use tower_sessions::Session;

use crate::db::Account;
use crate::state::AppState;
use crate::web::session::{self, CurrentUser, Notice};

#[derive(Template, WebTemplate)]
#[template(path = "admin.html")]
pub struct AdminTemplate {
    pub pending: Vec<Account>,
    pub approved: Vec<Account>,
    pub notices: Vec<Notice>,
}

async fn require_admin(session: &Session) -> Option<CurrentUser> {
    session::current(session).await.filter(|u| u.is_admin)
}

/// GET /admin
pub async fn admin_panel(State(state): State<Arc<AppState>>, session: Session) -> Response {
    if require_admin(&session).await.is_none() {
        return Redirect::to("/").into_response();
    }

    match state.accounts().moderation_lists().await {
        Ok(lists) => AdminTemplate {
            pending: lists.pending,
            approved: lists.approved,
            notices: session::take_notices(&session).await,
        }
        .into_response(),
        Err(e) => {
            tracing::error!("Failed to load moderation lists: {e}");
            session::push_notice(&session, Notice::error("Error loading admin panel")).await;
            Redirect::to("/").into_response()
        }
    }
}

/// GET /approve/{id}
///
/// Idempotent: approving an already-approved or unknown id reports success
/// all the same.
pub async fn approve(
    State(state): State<Arc<AppState>>,
    session: Session,
    Path(id): Path<i32>,
) -> Response {
    if require_admin(&session).await.is_none() {
        return Redirect::to("/").into_response();
    }

    match state.accounts().approve(id).await {
        Ok(()) => session::push_notice(&session, Notice::success("User approved.")).await,
        Err(e) => {
            tracing::error!(account_id = id, "Approve failed: {e}");
            session::push_notice(&session, Notice::error("Error approving user")).await;
        }
    }

    Redirect::to("/admin").into_response()
}

/// GET /reject/{id}
///
/// Deletes the account outright; there is no recovery once deleted.
pub async fn reject(
    State(state): State<Arc<AppState>>,
    session: Session,
    Path(id): Path<i32>,
) -> Response {
    if require_admin(&session).await.is_none() {
        return Redirect::to("/").into_response();
    }

    match state.accounts().reject(id).await {
        Ok(()) => session::push_notice(&session, Notice::success("User rejected/deleted.")).await,
        Err(e) => {
            tracing::error!(account_id = id, "Reject failed: {e}");
            session::push_notice(&session, Notice::error("Error rejecting user")).await;
        }
    }

    Redirect::to("/admin").into_response()
}
