//! Typed session state and flash notices.
//!
//! The session carries the authenticated identity as one explicit struct
//! under a single key; `is_approved` is deliberately never cached here, the
//! dashboard re-reads it from the store on every view.

use serde::{Deserialize, Serialize};
use tower_sessions::Session;

use crate::db::Account;

const CURRENT_USER_KEY: &str = "current_user";
const NOTICES_KEY: &str = "notices";

/// The identity a session carries between requests.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentUser {
    pub account_id: i32,
    pub email: String,
    pub is_admin: bool,
}

impl From<&Account> for CurrentUser {
    fn from(account: &Account) -> Self {
        Self {
            account_id: account.id,
            email: account.email.clone(),
            is_admin: account.is_admin,
        }
    }
}

/// A one-shot notice rendered on the next page view, then discarded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeKind {
    Success,
    Error,
}

impl Notice {
    #[must_use]
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Success,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Error,
            message: message.into(),
        }
    }

    /// CSS class for the notice banner.
    #[must_use]
    pub fn css_class(&self) -> &'static str {
        match self.kind {
            NoticeKind::Success => "notice-success",
            NoticeKind::Error => "notice-error",
        }
    }
}

/// Bind an authenticated identity to the session.
pub async fn establish(
    session: &Session,
    user: &CurrentUser,
) -> Result<(), tower_sessions::session::Error> {
    session.insert(CURRENT_USER_KEY, user).await
}

/// The identity currently bound to the session, if any.
pub async fn current(session: &Session) -> Option<CurrentUser> {
    session.get(CURRENT_USER_KEY).await.ok().flatten()
}

/// Drop the whole session: identity, notices, everything.
pub async fn clear(session: &Session) {
    let _ = session.flush().await;
}

/// Queue a notice for the next rendered page. Session failures here only
/// lose the notice, never the action, so they are logged and swallowed.
pub async fn push_notice(session: &Session, notice: Notice) {
    let mut notices: Vec<Notice> = session
        .get(NOTICES_KEY)
        .await
        .ok()
        .flatten()
        .unwrap_or_default();

    notices.push(notice);

    if let Err(e) = session.insert(NOTICES_KEY, &notices).await {
        tracing::warn!("Failed to store flash notice: {e}");
    }
}

/// Drain all queued notices.
pub async fn take_notices(session: &Session) -> Vec<Notice> {
    session
        .remove::<Vec<Notice>>(NOTICES_KEY)
        .await
        .ok()
        .flatten()
        .unwrap_or_default()
}
