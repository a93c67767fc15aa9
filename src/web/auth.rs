//! Login, signup, and logout handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use std::sync::Arc;
use tower_sessions::Session;

use crate::services::AccountError;
use crate::state::AppState;
use crate::web::session::{self, CurrentUser, Notice};

// ============================================================================
// Form Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct SignupForm {
    pub email: String,
    pub password: String,
}

// ============================================================================
// Templates
// ============================================================================

#[derive(Template, WebTemplate)]
#[template(path = "login.html")]
pub struct LoginTemplate {
    pub error: Option<String>,
    pub notices: Vec<Notice>,
}

#[derive(Template, WebTemplate)]
#[template(path = "signup.html")]
pub struct SignupTemplate {
    pub error: Option<String>,
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /login
pub async fn login_page(session: Session) -> impl IntoResponse {
    LoginTemplate {
        error: None,
        notices: session::take_notices(&session).await,
    }
}

/// POST /login
///
/// Unknown email and wrong password produce the identical error so the form
/// never reveals whether an address is registered.
pub async fn login(
    State(state): State<Arc<AppState>>,
    session: Session,
    Form(form): Form<LoginForm>,
) -> Response {
    match state.accounts().login(&form.email, &form.password).await {
        Ok(account) => {
            if let Err(e) = session::establish(&session, &CurrentUser::from(&account)).await {
                tracing::error!("Failed to establish session: {e}");
                return LoginTemplate {
                    error: Some("Session error, please try again".to_string()),
                    notices: vec![],
                }
                .into_response();
            }

            Redirect::to("/").into_response()
        }
        Err(AccountError::InvalidCredentials) => LoginTemplate {
            error: Some("Invalid email or password".to_string()),
            notices: vec![],
        }
        .into_response(),
        Err(e) => {
            tracing::error!("Login failed against store: {e}");
            LoginTemplate {
                error: Some("Database connection error".to_string()),
                notices: vec![],
            }
            .into_response()
        }
    }
}

/// GET /signup
pub async fn signup_page() -> impl IntoResponse {
    SignupTemplate { error: None }
}

/// POST /signup
pub async fn signup(
    State(state): State<Arc<AppState>>,
    session: Session,
    Form(form): Form<SignupForm>,
) -> Response {
    if form.email.is_empty() || form.password.is_empty() {
        return SignupTemplate {
            error: Some("Email and password are required".to_string()),
        }
        .into_response();
    }

    match state.accounts().signup(&form.email, &form.password).await {
        Ok(_) => {
            session::push_notice(
                &session,
                Notice::success("Account created! Please wait for admin approval."),
            )
            .await;

            Redirect::to("/login").into_response()
        }
        Err(AccountError::DuplicateAccount) => SignupTemplate {
            error: Some("Email already registered.".to_string()),
        }
        .into_response(),
        Err(e) => {
            tracing::error!("Signup failed against store: {e}");
            SignupTemplate {
                error: Some("Something went wrong, please try again later".to_string()),
            }
            .into_response()
        }
    }
}

/// GET /logout
///
/// Clears the entire session unconditionally.
pub async fn logout(session: Session) -> Redirect {
    session::clear(&session).await;
    Redirect::to("/login")
}
