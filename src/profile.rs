use std::path::Path;

use async_trait::async_trait;
use tracing::{info, instrument};

use crate::config::ProfileDefaults;
use crate::storage::Preferences;

pub const PREF_NAME: &str = "user_profile";
pub const KEY_USERNAME: &str = "username";
pub const KEY_SIGNATURE: &str = "signature";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Profile {
    pub username: String,
    pub signature: String,
}

/// Display fields of the signed-in user. Last write wins.
#[async_trait]
pub trait ProfileStore: Send + Sync {
    /// Stored values, with defaults filled in for anything never set.
    async fn get(&self) -> anyhow::Result<Profile>;
    async fn set_username(&self, username: &str) -> anyhow::Result<()>;
    async fn set_signature(&self, signature: &str) -> anyhow::Result<()>;
}

pub struct PrefsProfileStore {
    prefs: Preferences,
    defaults: ProfileDefaults,
}

impl PrefsProfileStore {
    pub async fn open(prefs_dir: &Path, defaults: ProfileDefaults) -> anyhow::Result<Self> {
        let prefs = Preferences::open(prefs_dir, PREF_NAME).await?;
        Ok(Self { prefs, defaults })
    }
}

#[async_trait]
impl ProfileStore for PrefsProfileStore {
    async fn get(&self) -> anyhow::Result<Profile> {
        let username = self
            .prefs
            .get_string(KEY_USERNAME)
            .await?
            .unwrap_or_else(|| self.defaults.username.clone());
        let signature = self
            .prefs
            .get_string(KEY_SIGNATURE)
            .await?
            .unwrap_or_else(|| self.defaults.signature.clone());
        Ok(Profile {
            username,
            signature,
        })
    }

    #[instrument(skip(self))]
    async fn set_username(&self, username: &str) -> anyhow::Result<()> {
        self.prefs.put_string(KEY_USERNAME, username).await?;
        info!("username updated");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn set_signature(&self, signature: &str) -> anyhow::Result<()> {
        self.prefs.put_string(KEY_SIGNATURE, signature).await?;
        info!("signature updated");
        Ok(())
    }
}
