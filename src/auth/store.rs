use async_trait::async_trait;
use sqlx::SqlitePool;
use tracing::{debug, info, instrument, warn};

use crate::auth::password::hash_password;
use crate::auth::repo_types::User;

/// Persistence of `(email, password-hash)` pairs.
///
/// Every modeled outcome is a boolean. `Err` is reserved for storage failures
/// the app does not try to recover from.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Store a new account. `false` if the email is already registered.
    async fn register(&self, email: &str, password: &str) -> anyhow::Result<bool>;
    /// `true` iff a row matches the email and the hash of `password`.
    async fn authenticate(&self, email: &str, password: &str) -> anyhow::Result<bool>;
    async fn email_exists(&self, email: &str) -> anyhow::Result<bool>;
    async fn find_by_email(&self, email: &str) -> anyhow::Result<Option<User>>;
}

#[derive(Clone)]
pub struct SqliteCredentialStore {
    db: SqlitePool,
}

impl SqliteCredentialStore {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl CredentialStore for SqliteCredentialStore {
    #[instrument(skip(self, password))]
    async fn register(&self, email: &str, password: &str) -> anyhow::Result<bool> {
        if self.email_exists(email).await? {
            warn!(email = %email, "email already registered");
            return Ok(false);
        }

        match User::create(&self.db, email, &hash_password(password)).await {
            Ok(user) => {
                info!(user_id = user.id, email = %user.email, "user registered");
                Ok(true)
            }
            // The pre-check and the insert are separate statements; the
            // table's UNIQUE constraint catches whatever slips between them.
            Err(sqlx::Error::Database(e)) if e.is_unique_violation() => {
                warn!(email = %email, "email registered concurrently");
                Ok(false)
            }
            Err(e) => Err(e.into()),
        }
    }

    #[instrument(skip(self, password))]
    async fn authenticate(&self, email: &str, password: &str) -> anyhow::Result<bool> {
        let ok = User::matches_credentials(&self.db, email, &hash_password(password)).await?;
        if ok {
            info!(email = %email, "user logged in");
        } else {
            warn!(email = %email, "login rejected");
        }
        Ok(ok)
    }

    async fn email_exists(&self, email: &str) -> anyhow::Result<bool> {
        let exists = User::email_exists(&self.db, email).await?;
        debug!(email = %email, exists, "email lookup");
        Ok(exists)
    }

    async fn find_by_email(&self, email: &str) -> anyhow::Result<Option<User>> {
        User::find_by_email(&self.db, email).await
    }
}
