//! Portal configuration.
//!
//! Settings come from an optional TOML file, then environment variables
//! override individual fields:
//!
//! | Variable                   | Field            |
//! |----------------------------|------------------|
//! | `COURSE_PORTAL_FEED_URL`   | `feed_url`       |
//! | `COURSE_PORTAL_DATA_DIR`   | `data_dir`       |
//! | `COURSE_PORTAL_SHARE_URL`  | `share_base_url` |
//!
//! The file is `--config` if given, else `$COURSE_PORTAL_CONFIG`, else
//! `portal.toml` in the working directory when it exists.

use std::path::{Path, PathBuf};

use course_portal_cache::{DEFAULT_CACHE_KEY, is_valid_key, paths};
use course_portal_feed::recency::DEFAULT_RECENT_LIMIT;
use serde::Deserialize;

/// Environment variable naming the config file.
pub const CONFIG_PATH_VAR: &str = "COURSE_PORTAL_CONFIG";
/// Environment variable overriding [`PortalConfig::feed_url`].
pub const FEED_URL_VAR: &str = "COURSE_PORTAL_FEED_URL";
/// Environment variable overriding [`PortalConfig::data_dir`].
pub const DATA_DIR_VAR: &str = "COURSE_PORTAL_DATA_DIR";
/// Environment variable overriding [`PortalConfig::share_base_url`].
pub const SHARE_URL_VAR: &str = "COURSE_PORTAL_SHARE_URL";

/// Config file read when no explicit path is given.
pub const DEFAULT_CONFIG_FILE: &str = "portal.toml";

/// Base URL share links point at unless configured otherwise.
pub const DEFAULT_SHARE_BASE_URL: &str = "http://localhost:8080/";

/// Errors that can occur while loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The config file could not be read.
    #[error("Failed to read {}: {source}", path.display())]
    Io {
        /// File that was read.
        path: PathBuf,
        /// Underlying error.
        source: std::io::Error,
    },

    /// The config file is not valid TOML for [`PortalConfig`].
    #[error("Invalid config TOML: {0}")]
    Toml(#[from] toml::de::Error),

    /// A value is out of range.
    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// Runtime settings for the portal.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PortalConfig {
    /// Published CSV feed URL. Without one, syncs need an explicit source.
    pub feed_url: Option<String>,
    /// Directory holding the snapshot cache.
    pub data_dir: PathBuf,
    /// Key the snapshot is cached under.
    pub cache_key: String,
    /// How many recent files to keep.
    pub recent_limit: usize,
    /// Page URL share links are built on.
    pub share_base_url: String,
}

impl Default for PortalConfig {
    fn default() -> Self {
        Self {
            feed_url: None,
            data_dir: paths::data_dir(),
            cache_key: DEFAULT_CACHE_KEY.to_string(),
            recent_limit: DEFAULT_RECENT_LIMIT,
            share_base_url: DEFAULT_SHARE_BASE_URL.to_string(),
        }
    }
}

impl PortalConfig {
    /// Parses a config from TOML text. Missing fields take defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Toml`] on malformed input and
    /// [`ConfigError::Invalid`] if validation fails.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads a config file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        log::debug!("Loaded config from {}", path.display());
        Self::from_toml_str(&text)
    }

    /// Loads the effective configuration from the file (if any) and the
    /// process environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if an explicitly named file is missing or
    /// any source holds an invalid value.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        Self::load_with(explicit, |var| std::env::var(var).ok())
    }

    /// Like [`PortalConfig::load`], reading variables through `lookup`.
    ///
    /// # Errors
    ///
    /// See [`PortalConfig::load`].
    pub fn load_with(
        explicit: Option<&Path>,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let named = explicit
            .map(Path::to_path_buf)
            .or_else(|| lookup(CONFIG_PATH_VAR).map(PathBuf::from));

        let mut config = match named {
            Some(path) => Self::from_file(&path)?,
            None => {
                let fallback = Path::new(DEFAULT_CONFIG_FILE);
                if fallback.is_file() {
                    Self::from_file(fallback)?
                } else {
                    Self::default()
                }
            }
        };

        config.apply_overrides(lookup);
        config.validate()?;
        Ok(config)
    }

    /// Overwrites fields from environment-style variables.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let non_empty = |var: &str| lookup(var).filter(|v| !v.trim().is_empty());

        if let Some(url) = non_empty(FEED_URL_VAR) {
            log::debug!("{FEED_URL_VAR} overrides feed_url");
            self.feed_url = Some(url);
        }
        if let Some(dir) = non_empty(DATA_DIR_VAR) {
            log::debug!("{DATA_DIR_VAR} overrides data_dir");
            self.data_dir = PathBuf::from(dir);
        }
        if let Some(url) = non_empty(SHARE_URL_VAR) {
            log::debug!("{SHARE_URL_VAR} overrides share_base_url");
            self.share_base_url = url;
        }
    }

    /// Checks value ranges.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] naming the offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.recent_limit == 0 {
            return Err(ConfigError::Invalid(
                "recent_limit must be at least 1".to_string(),
            ));
        }
        if self.cache_key.trim().is_empty() {
            return Err(ConfigError::Invalid("cache_key must not be empty".to_string()));
        }
        if !is_valid_key(&self.cache_key) {
            return Err(ConfigError::Invalid(format!(
                "cache_key '{}' may only contain ASCII letters, digits, '_', '-' and '.', and must not start with '.'",
                self.cache_key
            )));
        }
        Ok(())
    }

    /// Directory the snapshot cache lives in.
    #[must_use]
    pub fn cache_dir(&self) -> PathBuf {
        paths::cache_dir_in(&self.data_dir)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: BTreeMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |var| map.get(var).cloned()
    }

    #[test]
    fn empty_file_yields_defaults() {
        let config = PortalConfig::from_toml_str("").unwrap();
        assert_eq!(config, PortalConfig::default());
        assert_eq!(config.cache_key, DEFAULT_CACHE_KEY);
        assert_eq!(config.recent_limit, 3);
    }

    #[test]
    fn file_values_are_read() {
        let config = PortalConfig::from_toml_str(
            r#"
            feed_url = "https://example.com/feed.csv"
            data_dir = "/tmp/portal"
            recent_limit = 5
            "#,
        )
        .unwrap();
        assert_eq!(config.feed_url.as_deref(), Some("https://example.com/feed.csv"));
        assert_eq!(config.data_dir, PathBuf::from("/tmp/portal"));
        assert_eq!(config.recent_limit, 5);
        assert_eq!(config.share_base_url, DEFAULT_SHARE_BASE_URL);
    }

    #[test]
    fn unknown_fields_are_rejected() {
        assert!(matches!(
            PortalConfig::from_toml_str("colour = \"blue\""),
            Err(ConfigError::Toml(_))
        ));
    }

    #[test]
    fn zero_recent_limit_is_invalid() {
        assert!(matches!(
            PortalConfig::from_toml_str("recent_limit = 0"),
            Err(ConfigError::Invalid(_))
        ));
    }

    #[test]
    fn blank_cache_key_is_invalid() {
        assert!(matches!(
            PortalConfig::from_toml_str("cache_key = \"  \""),
            Err(ConfigError::Invalid(_))
        ));
    }

    #[test]
    fn path_like_cache_key_is_invalid() {
        for key in ["a/b", ".hidden", "snap shot"] {
            let text = format!("cache_key = \"{key}\"");
            assert!(
                matches!(PortalConfig::from_toml_str(&text), Err(ConfigError::Invalid(_))),
                "{key}"
            );
        }
        assert!(PortalConfig::from_toml_str("cache_key = \"portal_v2\"").is_ok());
    }

    #[test]
    fn env_overrides_file_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("portal.toml");
        std::fs::write(&path, "feed_url = \"https://file.example/feed.csv\"\n").unwrap();

        let config = PortalConfig::load_with(
            Some(&path),
            env(&[
                (FEED_URL_VAR, "https://env.example/feed.csv"),
                (SHARE_URL_VAR, "https://portal.example/"),
                (DATA_DIR_VAR, ""),
            ]),
        )
        .unwrap();

        assert_eq!(config.feed_url.as_deref(), Some("https://env.example/feed.csv"));
        assert_eq!(config.share_base_url, "https://portal.example/");
        assert_eq!(config.data_dir, PortalConfig::default().data_dir);
    }

    #[test]
    fn config_path_can_come_from_env() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("custom.toml");
        std::fs::write(&path, "recent_limit = 7\n").unwrap();
        let path_str = path.to_string_lossy().into_owned();

        let config = PortalConfig::load_with(None, env(&[(CONFIG_PATH_VAR, &path_str)])).unwrap();
        assert_eq!(config.recent_limit, 7);
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = PortalConfig::load_with(Some(&dir.path().join("absent.toml")), env(&[]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
        let message = err.to_string();
        assert!(message.starts_with("Failed to read "), "{message}");
        assert!(message.contains("absent.toml"), "{message}");
    }

    #[test]
    fn cache_dir_is_under_data_dir() {
        let config = PortalConfig {
            data_dir: PathBuf::from("/srv/portal"),
            ..PortalConfig::default()
        };
        assert!(config.cache_dir().starts_with("/srv/portal"));
    }
}
