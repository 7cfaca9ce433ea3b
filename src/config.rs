use crate::catalog::DEFAULT_CATALOG_IDS;
use crate::scroll::SCROLL_TOP_THRESHOLD_PX;
use crate::view::GenreMatch;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Public demo key; fine for a handful of requests, rate limited beyond that.
pub const DEMO_API_KEY: &str = "6577ab89";
pub const DEFAULT_BASE_URL: &str = "https://www.omdbapi.com/";

pub const ENV_API_KEY: &str = "OMDB_API_KEY";
pub const ENV_BASE_URL: &str = "OMDB_BASE_URL";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Could not determine the configuration directory")]
    NoConfigDir,

    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid TOML in {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("Invalid setting `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Runtime settings, read from `config.toml` and overridable from the
/// environment and the command line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub api_key: String,
    pub api_base_url: String,
    pub catalog_ids: Vec<String>,
    pub genre_match: GenreMatch,
    pub scroll_top_threshold_px: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_timeout_secs: Option<u64>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_key: DEMO_API_KEY.to_string(),
            api_base_url: DEFAULT_BASE_URL.to_string(),
            catalog_ids: DEFAULT_CATALOG_IDS.iter().map(|s| s.to_string()).collect(),
            genre_match: GenreMatch::default(),
            scroll_top_threshold_px: SCROLL_TOP_THRESHOLD_PX,
            request_timeout_secs: None,
        }
    }
}

impl Settings {
    /// Default location: `<config dir>/movie-explorer/config.toml`.
    pub fn default_path() -> Result<PathBuf, ConfigError> {
        let dirs = directories::ProjectDirs::from("com", "movie-explorer", "movie-explorer")
            .ok_or(ConfigError::NoConfigDir)?;
        Ok(dirs.config_dir().join("config.toml"))
    }

    /// Read settings from `path`. A missing file yields the defaults.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "no config file, using defaults");
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(ConfigError::Io {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };
        Self::parse(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn parse(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }

    /// Apply overrides from environment-style lookups.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(key) = lookup(ENV_API_KEY).filter(|k| !k.trim().is_empty()) {
            self.api_key = key;
        }
        if let Some(url) = lookup(ENV_BASE_URL).filter(|u| !u.trim().is_empty()) {
            self.api_base_url = url;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.api_key.trim().is_empty() {
            return Err(ConfigError::Invalid {
                field: "api_key",
                reason: "must not be empty".to_string(),
            });
        }
        match reqwest::Url::parse(&self.api_base_url) {
            Ok(url) if matches!(url.scheme(), "http" | "https") && url.has_host() => {}
            Ok(_) => {
                return Err(ConfigError::Invalid {
                    field: "api_base_url",
                    reason: format!("`{}` is not an http(s) URL", self.api_base_url),
                });
            }
            Err(e) => {
                return Err(ConfigError::Invalid {
                    field: "api_base_url",
                    reason: format!("`{}`: {}", self.api_base_url, e),
                });
            }
        }
        if self.catalog_ids.is_empty() {
            return Err(ConfigError::Invalid {
                field: "catalog_ids",
                reason: "at least one IMDb id is required".to_string(),
            });
        }
        if let Some(id) = self.catalog_ids.iter().find(|id| id.trim().is_empty()) {
            return Err(ConfigError::Invalid {
                field: "catalog_ids",
                reason: format!("blank id {:?}", id),
            });
        }
        Ok(())
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }

    /// Settings rendered as TOML, for `config-path --print`.
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.catalog_ids.len(), 25);
        assert_eq!(settings.catalog_ids[0], "tt3896198");
        assert_eq!(settings.genre_match, GenreMatch::Exact);
        assert_eq!(settings.scroll_top_threshold_px, 300);
        assert!(settings.request_timeout().is_none());
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let settings = Settings::parse(
            r#"
            api_key = "abc123"
            genre_match = "substring"
            "#,
        )
        .unwrap();
        assert_eq!(settings.api_key, "abc123");
        assert_eq!(settings.genre_match, GenreMatch::Substring);
        assert_eq!(settings.api_base_url, DEFAULT_BASE_URL);
        assert_eq!(settings.catalog_ids.len(), 25);
    }

    #[test]
    fn test_bad_toml_is_parse_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "genre_match = \"fuzzy\"").unwrap();
        let err = Settings::load_from(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing/config.toml");
        assert_eq!(Settings::load_from(&path).unwrap(), Settings::default());
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> =
            HashMap::from([(ENV_API_KEY, "fromenv"), (ENV_BASE_URL, "   ")]);
        let mut settings = Settings::default();
        settings.apply_env(|k| env.get(k).map(|v| v.to_string()));
        assert_eq!(settings.api_key, "fromenv");
        assert_eq!(settings.api_base_url, DEFAULT_BASE_URL);
    }

    #[test]
    fn test_validation() {
        let mut settings = Settings::default();
        settings.catalog_ids.clear();
        assert!(matches!(
            settings.validate(),
            Err(ConfigError::Invalid { field: "catalog_ids", .. })
        ));

        let mut settings = Settings::default();
        settings.api_base_url = "ftp://example.com".to_string();
        assert!(settings.validate().is_err());

        for bad in ["https://", "http//www.omdbapi.com/", "https://exa mple.com/"] {
            let mut settings = Settings::default();
            settings.api_base_url = bad.to_string();
            assert!(
                matches!(settings.validate(), Err(ConfigError::Invalid { field: "api_base_url", .. })),
                "{bad} should be rejected"
            );
        }

        let mut settings = Settings::default();
        settings.api_base_url = "http://127.0.0.1:8080/".to_string();
        assert!(settings.validate().is_ok());

        let mut settings = Settings::default();
        settings.api_key = " ".to_string();
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_round_trips_through_toml() {
        let mut settings = Settings::default();
        settings.request_timeout_secs = Some(15);
        let text = settings.to_toml().unwrap();
        assert_eq!(Settings::parse(&text).unwrap(), settings);
    }
}
