use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::Context;
use tracing::debug;

/// A flat string-to-string namespace persisted as one JSON object file
/// (`<dir>/<namespace>.json`).
///
/// Every read loads the file and every write rewrites it, so a value is on
/// disk as soon as `put_string` returns. A missing file reads as empty.
#[derive(Debug, Clone)]
pub struct Preferences {
    path: PathBuf,
}

impl Preferences {
    pub async fn open(dir: &Path, namespace: &str) -> anyhow::Result<Self> {
        if namespace.is_empty() || namespace.contains(['/', '\\']) || namespace.starts_with('.') {
            anyhow::bail!("invalid preferences namespace {namespace:?}");
        }
        tokio::fs::create_dir_all(dir)
            .await
            .with_context(|| format!("create preferences dir {}", dir.display()))?;
        Ok(Self {
            path: dir.join(format!("{namespace}.json")),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub async fn get_string(&self, key: &str) -> anyhow::Result<Option<String>> {
        Ok(self.load().await?.remove(key))
    }

    pub async fn put_string(&self, key: &str, value: &str) -> anyhow::Result<()> {
        let mut entries = self.load().await?;
        entries.insert(key.to_owned(), value.to_owned());
        self.save(&entries).await?;
        debug!(path = %self.path.display(), key, "preference written");
        Ok(())
    }

    async fn load(&self) -> anyhow::Result<BTreeMap<String, String>> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) => serde_json::from_slice(&bytes)
                .with_context(|| format!("parse preferences {}", self.path.display())),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(e) => {
                Err(e).with_context(|| format!("read preferences {}", self.path.display()))
            }
        }
    }

    /// Write to a sibling temp file and rename over the original, so a crash
    /// mid-write never leaves a truncated file behind.
    async fn save(&self, entries: &BTreeMap<String, String>) -> anyhow::Result<()> {
        let body = serde_json::to_vec_pretty(entries)?;
        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, body)
            .await
            .with_context(|| format!("write preferences {}", tmp.display()))?;
        tokio::fs::rename(&tmp, &self.path)
            .await
            .with_context(|| format!("replace preferences {}", self.path.display()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn missing_file_reads_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let prefs = Preferences::open(dir.path(), "user_profile").await.unwrap();
        assert_eq!(prefs.get_string("username").await.unwrap(), None);
        assert!(!prefs.path().exists());
    }

    #[tokio::test]
    async fn put_overwrites_and_keeps_other_keys() {
        let dir = tempfile::tempdir().unwrap();
        let prefs = Preferences::open(dir.path(), "user_profile").await.unwrap();
        prefs.put_string("username", "Alice").await.unwrap();
        prefs.put_string("signature", "hello").await.unwrap();
        prefs.put_string("username", "Bob").await.unwrap();

        assert_eq!(prefs.get_string("username").await.unwrap().as_deref(), Some("Bob"));
        assert_eq!(prefs.get_string("signature").await.unwrap().as_deref(), Some("hello"));

        let raw: serde_json::Value =
            serde_json::from_slice(&std::fs::read(prefs.path()).unwrap()).unwrap();
        assert_eq!(raw, serde_json::json!({"username": "Bob", "signature": "hello"}));
    }

    #[tokio::test]
    async fn creates_nested_directory() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("data/shared_prefs");
        let prefs = Preferences::open(&nested, "user_profile").await.unwrap();
        prefs.put_string("k", "v").await.unwrap();
        assert!(nested.join("user_profile.json").exists());
    }

    #[tokio::test]
    async fn rejects_path_like_namespaces() {
        let dir = tempfile::tempdir().unwrap();
        assert!(Preferences::open(dir.path(), "").await.is_err());
        assert!(Preferences::open(dir.path(), "../escape").await.is_err());
        assert!(Preferences::open(dir.path(), "a/b").await.is_err());
    }

    #[tokio::test]
    async fn corrupt_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let prefs = Preferences::open(dir.path(), "user_profile").await.unwrap();
        std::fs::write(prefs.path(), b"not json").unwrap();
        assert!(prefs.get_string("username").await.is_err());
    }
}
