//! Domain service for the approval-gated account workflow.
//!
//! Handles signup, login, the live approval check, and the admin
//! approve/reject moderation actions.

use thiserror::Error;

use crate::db::Account;

/// Errors specific to account operations.
#[derive(Debug, Error)]
pub enum AccountError {
    /// Unknown email and wrong password collapse into this one variant so
    /// that a login failure never reveals whether the email exists.
    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Email already registered")]
    DuplicateAccount,

    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<sea_orm::DbErr> for AccountError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::StoreUnavailable(err.to_string())
    }
}

impl From<anyhow::Error> for AccountError {
    fn from(err: anyhow::Error) -> Self {
        Self::StoreUnavailable(err.to_string())
    }
}

/// The two disjoint listings shown on the admin panel.
#[derive(Debug, Clone, Default)]
pub struct ModerationLists {
    /// Accounts awaiting approval (never contains admins).
    pub pending: Vec<Account>,

    /// Approved non-admin accounts.
    pub approved: Vec<Account>,
}

/// Domain service trait for the account workflow.
#[async_trait::async_trait]
pub trait AccountService: Send + Sync {
    /// Registers a new unapproved account.
    ///
    /// # Errors
    ///
    /// Returns [`AccountError::DuplicateAccount`] when the email is already
    /// taken; nothing is written in that case.
    async fn signup(&self, email: &str, password: &str) -> Result<Account, AccountError>;

    /// Verifies credentials and returns the matching account.
    ///
    /// # Errors
    ///
    /// Returns [`AccountError::InvalidCredentials`] for an unknown email and
    /// for a wrong password alike.
    async fn login(&self, email: &str, password: &str) -> Result<Account, AccountError>;

    /// Fresh read of an account by id. This is the approval gate: callers
    /// must use it on every dashboard view instead of trusting cached
    /// session state, so an approval (or a rejection) takes effect on the
    /// very next page view.
    async fn fetch(&self, id: i32) -> Result<Option<Account>, AccountError>;

    /// Fetches the pending and approved listings for the admin panel.
    async fn moderation_lists(&self) -> Result<ModerationLists, AccountError>;

    /// Marks an account approved. Idempotent: an already-approved or
    /// missing id is indistinguishable from success.
    async fn approve(&self, id: i32) -> Result<(), AccountError>;

    /// Deletes an account outright. Idempotent and irreversible; there is
    /// no recovery path once deleted.
    async fn reject(&self, id: i32) -> Result<(), AccountError>;
}
