use anyhow::{Context, Result};
use argon2::{
    Algorithm, Argon2, Params, Version,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
    SqlErr,
};
use tokio::task;

use crate::config::SecurityConfig;
use crate::entities::users;

/// Account data returned from the repository (without the password hash).
#[derive(Debug, Clone)]
pub struct Account {
    pub id: i32,
    pub email: String,
    pub is_admin: bool,
    pub is_approved: bool,
    pub created_at: String,
}

impl From<users::Model> for Account {
    fn from(model: users::Model) -> Self {
        Self {
            id: model.id,
            email: model.email,
            is_admin: model.is_admin,
            is_approved: model.is_approved,
            created_at: model.created_at,
        }
    }
}

pub struct UserRepository {
    conn: DatabaseConnection,
}

impl UserRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    /// Get account by id
    pub async fn find_by_id(&self, id: i32) -> Result<Option<Account>> {
        let user = users::Entity::find_by_id(id)
            .one(&self.conn)
            .await
            .context("Failed to query account by id")?;

        Ok(user.map(Account::from))
    }

    /// Get account by email (exact match)
    pub async fn find_by_email(&self, email: &str) -> Result<Option<Account>> {
        let user = users::Entity::find()
            .filter(users::Column::Email.eq(email))
            .one(&self.conn)
            .await
            .context("Failed to query account by email")?;

        Ok(user.map(Account::from))
    }

    /// Insert a new unapproved, non-admin account.
    ///
    /// Returns `Ok(None)` when the email collides with an existing row; the
    /// unique index on `email` is the authority here so that concurrent
    /// signups racing on the same address lose cleanly instead of leaving a
    /// partial write.
    pub async fn insert(&self, email: &str, password_hash: &str) -> Result<Option<Account>> {
        let now = chrono::Utc::now().to_rfc3339();

        let active = users::ActiveModel {
            email: Set(email.to_string()),
            password_hash: Set(password_hash.to_string()),
            is_admin: Set(false),
            is_approved: Set(false),
            created_at: Set(now),
            ..Default::default()
        };

        match active.insert(&self.conn).await {
            Ok(model) => Ok(Some(Account::from(model))),
            Err(e) if matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) => Ok(None),
            Err(e) => Err(e).context("Failed to insert account"),
        }
    }

    /// Mark an account approved. Updating an already-approved or missing id
    /// affects zero rows and is not an error.
    pub async fn set_approved(&self, id: i32) -> Result<()> {
        users::Entity::update_many()
            .col_expr(users::Column::IsApproved, Expr::value(true))
            .filter(users::Column::Id.eq(id))
            .exec(&self.conn)
            .await
            .context("Failed to update approval flag")?;

        Ok(())
    }

    /// Delete an account outright. Deleting a missing id affects zero rows
    /// and is not an error.
    pub async fn delete(&self, id: i32) -> Result<()> {
        users::Entity::delete_by_id(id)
            .exec(&self.conn)
            .await
            .context("Failed to delete account")?;

        Ok(())
    }

    /// Accounts awaiting approval. Admins never appear here.
    pub async fn list_pending(&self) -> Result<Vec<Account>> {
        let rows = users::Entity::find()
            .filter(users::Column::IsApproved.eq(false))
            .filter(users::Column::IsAdmin.eq(false))
            .order_by_asc(users::Column::Id)
            .all(&self.conn)
            .await
            .context("Failed to list pending accounts")?;

        Ok(rows.into_iter().map(Account::from).collect())
    }

    /// Approved non-admin accounts.
    pub async fn list_approved_members(&self) -> Result<Vec<Account>> {
        let rows = users::Entity::find()
            .filter(users::Column::IsApproved.eq(true))
            .filter(users::Column::IsAdmin.eq(false))
            .order_by_asc(users::Column::Id)
            .all(&self.conn)
            .await
            .context("Failed to list approved accounts")?;

        Ok(rows.into_iter().map(Account::from).collect())
    }

    /// Verify a password for an email.
    ///
    /// Returns `false` both for an unknown email and for a hash mismatch so
    /// that callers cannot distinguish the two cases.
    ///
    /// Note: uses `spawn_blocking` because Argon2 verification is
    /// CPU-intensive and would block the async runtime if run directly.
    pub async fn verify_password(&self, email: &str, password: &str) -> Result<bool> {
        let user = users::Entity::find()
            .filter(users::Column::Email.eq(email))
            .one(&self.conn)
            .await
            .context("Failed to query account for password verification")?;

        let Some(user) = user else {
            return Ok(false);
        };

        let password_hash = user.password_hash;
        let password = password.to_string();

        let is_valid = task::spawn_blocking(move || verify_password(&password, &password_hash))
            .await
            .context("Password verification task panicked")??;

        Ok(is_valid)
    }
}

/// Hash a password using Argon2id with optional custom params.
/// If config is None, uses default params.
pub fn hash_password(password: &str, config: Option<&SecurityConfig>) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);

    let argon2 = if let Some(cfg) = config {
        let params = Params::new(
            cfg.argon2_memory_cost_kib,
            cfg.argon2_time_cost,
            cfg.argon2_parallelism,
            None, // output length (use default)
        )
        .map_err(|e| anyhow::anyhow!("Invalid Argon2 params: {e}"))?;
        Argon2::new(Algorithm::Argon2id, Version::V0x13, params)
    } else {
        Argon2::default()
    };

    let hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!("Failed to hash password: {e}"))?;

    Ok(hash.to_string())
}

/// Verify a plaintext password against a stored Argon2 hash.
pub fn verify_password(password: &str, password_hash: &str) -> Result<bool> {
    let parsed_hash = PasswordHash::new(password_hash)
        .map_err(|e| anyhow::anyhow!("Invalid password hash format: {e}"))?;

    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_verifies_and_is_not_plaintext() {
        let hash = hash_password("hunter2", None).unwrap();

        assert_ne!(hash, "hunter2");
        assert!(verify_password("hunter2", &hash).unwrap());
        assert!(!verify_password("hunter3", &hash).unwrap());
    }

    #[test]
    fn hashes_are_salted() {
        let a = hash_password("hunter2", None).unwrap();
        let b = hash_password("hunter2", None).unwrap();

        assert_ne!(a, b);
    }

    #[test]
    fn custom_params_produce_verifiable_hash() {
        let cfg = SecurityConfig {
            argon2_memory_cost_kib: 1024,
            argon2_time_cost: 1,
            argon2_parallelism: 1,
        };

        let hash = hash_password("hunter2", Some(&cfg)).unwrap();
        assert!(verify_password("hunter2", &hash).unwrap());
    }
}
