use crate::auth::{CredentialStore, SqliteCredentialStore};
use crate::config::AppConfig;
use crate::db;
use crate::profile::{PrefsProfileStore, ProfileStore};
use anyhow::Context;
use sqlx::SqlitePool;
use std::sync::Arc;

/// Store handles shared by every screen. Opened once at startup and closed
/// explicitly with [`AppState::shutdown`].
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub credentials: Arc<dyn CredentialStore>,
    pub profile: Arc<dyn ProfileStore>,
    db: Option<SqlitePool>,
}

impl AppState {
    pub async fn init(config: AppConfig) -> anyhow::Result<Self> {
        let db = db::connect(&config.database_url)
            .await
            .with_context(|| format!("open credential store at {}", config.database_url))?;
        let credentials = Arc::new(SqliteCredentialStore::new(db.clone())) as Arc<dyn CredentialStore>;

        let profile = Arc::new(
            PrefsProfileStore::open(&config.prefs_dir, config.profile_defaults.clone())
                .await
                .context("open profile store")?,
        ) as Arc<dyn ProfileStore>;

        tracing::info!(
            database = %config.database_url,
            prefs_dir = %config.prefs_dir.display(),
            "stores opened"
        );

        Ok(Self {
            config: Arc::new(config),
            credentials,
            profile,
            db: Some(db),
        })
    }

    /// Wire in arbitrary store implementations, e.g. in-memory fakes.
    pub fn from_parts(
        config: Arc<AppConfig>,
        credentials: Arc<dyn CredentialStore>,
        profile: Arc<dyn ProfileStore>,
    ) -> Self {
        Self {
            config,
            credentials,
            profile,
            db: None,
        }
    }

    /// Close the database pool, waiting for the connection to be released.
    pub async fn shutdown(self) {
        if let Some(db) = self.db {
            db.close().await;
            tracing::info!("stores closed");
        }
    }

    /// State backed by in-memory fakes, for controller tests.
    #[cfg(test)]
    pub fn fake() -> Self {
        use crate::auth::{password::hash_password, User};
        use crate::config::ProfileDefaults;
        use crate::profile::Profile;
        use async_trait::async_trait;
        use std::sync::Mutex;

        #[derive(Default)]
        struct FakeCredentials {
            users: Mutex<Vec<(String, String)>>,
        }

        #[async_trait]
        impl CredentialStore for FakeCredentials {
            async fn register(&self, email: &str, password: &str) -> anyhow::Result<bool> {
                if self.email_exists(email).await? {
                    return Ok(false);
                }
                let mut users = self.users.lock().unwrap();
                users.push((email.to_owned(), hash_password(password)));
                Ok(true)
            }
            async fn authenticate(&self, email: &str, password: &str) -> anyhow::Result<bool> {
                let hash = hash_password(password);
                let users = self.users.lock().unwrap();
                Ok(users.iter().any(|(e, h)| e == email && *h == hash))
            }
            async fn email_exists(&self, email: &str) -> anyhow::Result<bool> {
                let users = self.users.lock().unwrap();
                Ok(users.iter().any(|(e, _)| e == email))
            }
            async fn find_by_email(&self, email: &str) -> anyhow::Result<Option<User>> {
                let users = self.users.lock().unwrap();
                Ok(users
                    .iter()
                    .position(|(e, _)| e == email)
                    .map(|i| User {
                        id: i as i64 + 1,
                        email: users[i].0.clone(),
                        password_hash: users[i].1.clone(),
                        created_at: None,
                    }))
            }
        }

        struct FakeProfile {
            defaults: ProfileDefaults,
            username: Mutex<Option<String>>,
            signature: Mutex<Option<String>>,
        }

        #[async_trait]
        impl ProfileStore for FakeProfile {
            async fn get(&self) -> anyhow::Result<Profile> {
                Ok(Profile {
                    username: self
                        .username
                        .lock()
                        .unwrap()
                        .clone()
                        .unwrap_or_else(|| self.defaults.username.clone()),
                    signature: self
                        .signature
                        .lock()
                        .unwrap()
                        .clone()
                        .unwrap_or_else(|| self.defaults.signature.clone()),
                })
            }
            async fn set_username(&self, username: &str) -> anyhow::Result<()> {
                *self.username.lock().unwrap() = Some(username.to_owned());
                Ok(())
            }
            async fn set_signature(&self, signature: &str) -> anyhow::Result<()> {
                *self.signature.lock().unwrap() = Some(signature.to_owned());
                Ok(())
            }
        }

        let config = Arc::new(AppConfig {
            database_url: "sqlite::memory:".into(),
            prefs_dir: std::env::temp_dir(),
            profile_defaults: ProfileDefaults::default(),
        });

        let credentials = FakeCredentials::default();
        credentials
            .users
            .lock()
            .unwrap()
            .push(("test@example.com".into(), hash_password("12345678")));

        let profile = FakeProfile {
            defaults: config.profile_defaults.clone(),
            username: Mutex::new(None),
            signature: Mutex::new(None),
        };

        Self::from_parts(config, Arc::new(credentials), Arc::new(profile))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ProfileDefaults;

    #[tokio::test]
    async fn init_opens_both_stores_and_shuts_down() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig {
            database_url: format!("sqlite:{}", dir.path().join("login.db").display()),
            prefs_dir: dir.path().join("shared_prefs"),
            profile_defaults: ProfileDefaults::default(),
        };

        let state = AppState::init(config).await.unwrap();
        assert!(state
            .credentials
            .authenticate("test@example.com", "12345678")
            .await
            .unwrap());
        state.profile.set_username("Alice").await.unwrap();
        state.shutdown().await;

        assert!(dir.path().join("login.db").exists());
        assert!(dir.path().join("shared_prefs/user_profile.json").exists());
    }

    #[tokio::test]
    async fn init_reports_unusable_database_path() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("not-a-dir");
        std::fs::write(&blocker, b"file").unwrap();
        let config = AppConfig {
            database_url: format!("sqlite:{}", blocker.join("login.db").display()),
            prefs_dir: dir.path().join("shared_prefs"),
            profile_defaults: ProfileDefaults::default(),
        };

        let err = match AppState::init(config).await {
            Ok(_) => panic!("init should fail when the database directory is a file"),
            Err(e) => e,
        };
        assert!(format!("{err:#}").contains("open credential store"));
    }

    #[tokio::test]
    async fn fake_state_has_demo_account() {
        let state = AppState::fake();
        assert!(state
            .credentials
            .authenticate("test@example.com", "12345678")
            .await
            .unwrap());
        assert!(!state.credentials.register("test@example.com", "x").await.unwrap());
        assert_eq!(
            state.profile.get().await.unwrap().username,
            crate::config::DEFAULT_USERNAME
        );
    }
}
