use std::path::PathBuf;

pub const DEFAULT_DATABASE_URL: &str = "sqlite:data/login.db";
pub const DEFAULT_PREFS_DIR: &str = "data/shared_prefs";
pub const DEFAULT_USERNAME: &str = "Username";
pub const DEFAULT_SIGNATURE: &str = "This user has not written a signature yet";

/// Values shown on the profile screen before the user edits anything.
#[derive(Debug, Clone)]
pub struct ProfileDefaults {
    pub username: String,
    pub signature: String,
}

impl Default for ProfileDefaults {
    fn default() -> Self {
        Self {
            username: DEFAULT_USERNAME.into(),
            signature: DEFAULT_SIGNATURE.into(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub prefs_dir: PathBuf,
    pub profile_defaults: ProfileDefaults,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the config from any variable source. Blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let database_url = var("DATABASE_URL").unwrap_or_else(|| DEFAULT_DATABASE_URL.into());
        if !database_url.starts_with("sqlite:") {
            anyhow::bail!("DATABASE_URL must be a sqlite: url, got {database_url}");
        }
        let prefs_dir = var("PREFS_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_PREFS_DIR));
        let profile_defaults = ProfileDefaults {
            username: var("PROFILE_DEFAULT_USERNAME").unwrap_or_else(|| DEFAULT_USERNAME.into()),
            signature: var("PROFILE_DEFAULT_SIGNATURE")
                .unwrap_or_else(|| DEFAULT_SIGNATURE.into()),
        };
        Ok(Self {
            database_url,
            prefs_dir,
            profile_defaults,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(vars: &[(&str, &str)]) -> anyhow::Result<AppConfig> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn empty_environment_uses_defaults() {
        let config = config_from(&[]).expect("defaults are valid");
        assert_eq!(config.database_url, "sqlite:data/login.db");
        assert_eq!(config.prefs_dir, PathBuf::from("data/shared_prefs"));
        assert_eq!(config.profile_defaults.username, "Username");
        assert_eq!(
            config.profile_defaults.signature,
            "This user has not written a signature yet"
        );
    }

    #[test]
    fn explicit_values_override_defaults() {
        let config = config_from(&[
            ("DATABASE_URL", "sqlite:/tmp/other.db"),
            ("PREFS_DIR", "/tmp/prefs"),
            ("PROFILE_DEFAULT_USERNAME", "Guest"),
            ("PROFILE_DEFAULT_SIGNATURE", "Hi there"),
        ])
        .unwrap();
        assert_eq!(config.database_url, "sqlite:/tmp/other.db");
        assert_eq!(config.prefs_dir, PathBuf::from("/tmp/prefs"));
        assert_eq!(config.profile_defaults.username, "Guest");
        assert_eq!(config.profile_defaults.signature, "Hi there");
    }

    #[test]
    fn blank_profile_defaults_fall_back() {
        let config = config_from(&[
            ("PROFILE_DEFAULT_USERNAME", "   "),
            ("PROFILE_DEFAULT_SIGNATURE", ""),
        ])
        .unwrap();
        assert_eq!(config.profile_defaults.username, DEFAULT_USERNAME);
        assert_eq!(config.profile_defaults.signature, DEFAULT_SIGNATURE);
    }

    #[test]
    fn non_sqlite_database_url_is_rejected() {
        let err = config_from(&[("DATABASE_URL", "postgres://localhost/login")]).unwrap_err();
        assert!(err.to_string().contains("sqlite:"));
    }
}
