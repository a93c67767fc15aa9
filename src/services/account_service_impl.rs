//! `SeaORM` implementation of the `AccountService` trait.

use async_trait::async_trait;
use tokio::task;

use crate::config::SecurityConfig;
use crate::db::{Account, Store, repositories::user::hash_password};
use crate::services::account_service::{AccountError, AccountService, ModerationLists};

pub struct SeaOrmAccountService {
    store: Store,
    security: SecurityConfig,
}

impl SeaOrmAccountService {
    #[must_use]
    pub const fn new(store: Store, security: SecurityConfig) -> Self {
        Self { store, security }
    }
}

#[async_trait]
impl AccountService for SeaOrmAccountService {
    async fn signup(&self, email: &str, password: &str) -> Result<Account, AccountError> {
        // Early duplicate check so the common case never hashes a password
        // just to throw it away. The unique index is still the authority
        // when two signups race on the same email.
        if self.store.users().find_by_email(email).await?.is_some() {
            return Err(AccountError::DuplicateAccount);
        }

        // Hash in a blocking task: Argon2 is deliberately CPU-heavy.
        let password = password.to_string();
        let security = self.security.clone();
        let password_hash = task::spawn_blocking(move || hash_password(&password, Some(&security)))
            .await
            .map_err(|e| AccountError::Internal(format!("Password hashing task panicked: {e}")))?
            .map_err(|e| AccountError::Internal(e.to_string()))?;

        let account = self
            .store
            .users()
            .insert(email, &password_hash)
            .await?
            .ok_or(AccountError::DuplicateAccount)?;

        tracing::info!(account_id = account.id, "New account registered, awaiting approval");

        Ok(account)
    }

    async fn login(&self, email: &str, password: &str) -> Result<Account, AccountError> {
        let is_valid = self.store.users().verify_password(email, password).await?;

        if !is_valid {
            return Err(AccountError::InvalidCredentials);
        }

        // The account can only vanish between the two reads if it was
        // rejected mid-login; treat that the same as a bad credential.
        let account = self
            .store
            .users()
            .find_by_email(email)
            .await?
            .ok_or(AccountError::InvalidCredentials)?;

        tracing::info!(account_id = account.id, "Login succeeded");

        Ok(account)
    }

    async fn fetch(&self, id: i32) -> Result<Option<Account>, AccountError> {
        Ok(self.store.users().find_by_id(id).await?)
    }

    async fn moderation_lists(&self) -> Result<ModerationLists, AccountError> {
        let pending = self.store.users().list_pending().await?;
        let approved = self.store.users().list_approved_members().await?;

        Ok(ModerationLists { pending, approved })
    }

    async fn approve(&self, id: i32) -> Result<(), AccountError> {
        self.store.users().set_approved(id).await?;
        tracing::info!(account_id = id, "Account approved");
        Ok(())
    }

    async fn reject(&self, id: i32) -> Result<(), AccountError> {
        self.store.users().delete(id).await?;
        tracing::info!(account_id = id, "Account rejected and deleted");
        Ok(())
    }
}
