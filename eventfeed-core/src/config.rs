//! eventfeed configuration.
//!
//! Read from an optional TOML file (`~/.config/eventfeed/config.toml` unless a
//! path is given) with `EVENTFEED_*` environment variables layered on top, e.g.
//! `EVENTFEED_UNSPLASH__ACCESS_KEY`.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use config::{Config, Environment, File};
use serde::Deserialize;

use crate::error::{EventfeedError, EventfeedResult};
use crate::tagger::{Category, Tagger};

static DEFAULT_API_URL: &str = "https://api.unsplash.com";
static DEFAULT_QUERY_SUFFIX: &str = "outdoor activity";

fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}

fn default_query_suffix() -> String {
    DEFAULT_QUERY_SUFFIX.to_string()
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct EventfeedConfig {
    #[serde(default)]
    pub unsplash: UnsplashConfig,

    #[serde(default)]
    pub tagging: TaggingConfig,
}

/// Unsplash image search settings.
#[derive(Debug, Clone, Deserialize)]
pub struct UnsplashConfig {
    /// Without a key, image lookup is disabled
    pub access_key: Option<String>,

    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Appended to every search query
    #[serde(default = "default_query_suffix")]
    pub query_suffix: String,

    /// Per-request timeout. No timeout when unset.
    pub timeout_secs: Option<u64>,
}

impl Default for UnsplashConfig {
    fn default() -> Self {
        UnsplashConfig {
            access_key: None,
            api_url: default_api_url(),
            query_suffix: default_query_suffix(),
            timeout_secs: None,
        }
    }
}

impl UnsplashConfig {
    pub fn access_key(&self) -> Option<&str> {
        self.access_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TaggingConfig {
    /// Category name -> keywords added to the built-in table
    #[serde(default)]
    pub extra_keywords: BTreeMap<String, Vec<String>>,
}

impl EventfeedConfig {
    pub fn default_path() -> EventfeedResult<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| EventfeedError::Config("Could not determine config directory".into()))?
            .join("eventfeed");

        Ok(config_dir.join("config.toml"))
    }

    /// Load configuration. An explicit path must exist; the default path is optional.
    pub fn load(path: Option<&Path>) -> EventfeedResult<Self> {
        let (path, required) = match path {
            Some(p) => {
                let expanded = shellexpand::tilde(&p.to_string_lossy()).into_owned();
                (PathBuf::from(expanded), true)
            }
            None => (Self::default_path()?, false),
        };

        Config::builder()
            .add_source(File::from(path).required(required))
            .add_source(
                Environment::with_prefix("EVENTFEED")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()
            .map_err(|e| EventfeedError::Config(e.to_string()))?
            .try_deserialize()
            .map_err(|e| EventfeedError::Config(e.to_string()))
    }

    /// Build the tagger: built-in keyword table plus any configured extras.
    pub fn tagger(&self) -> EventfeedResult<Tagger> {
        let mut tagger = Tagger::default();
        for (name, words) in &self.tagging.extra_keywords {
            let category: Category = name.parse()?;
            tagger = tagger.with_extra_keywords(category, words);
        }
        Ok(tagger)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::sync::Mutex;

    // Env vars are process-wide; every test that loads config holds this
    static ENV_LOCK: Mutex<()> = Mutex::new(());

    fn load(path: &Path) -> EventfeedResult<EventfeedConfig> {
        let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        EventfeedConfig::load(Some(path))
    }

    fn write_config(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new()
            .suffix(".toml")
            .tempfile()
            .unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_defaults() {
        let cfg = EventfeedConfig::default();
        assert_eq!(cfg.unsplash.api_url, "https://api.unsplash.com");
        assert_eq!(cfg.unsplash.query_suffix, "outdoor activity");
        assert_eq!(cfg.unsplash.access_key(), None);
        assert!(cfg.tagging.extra_keywords.is_empty());
    }

    #[test]
    fn test_load_from_file() {
        let file = write_config(
            r#"
[unsplash]
access_key = "abc123"
timeout_secs = 10

[tagging.extra_keywords]
climbing = ["via ferrata"]
"#,
        );

        let cfg = load(file.path()).unwrap();
        assert_eq!(cfg.unsplash.access_key(), Some("abc123"));
        assert_eq!(cfg.unsplash.timeout_secs, Some(10));
        assert_eq!(cfg.unsplash.api_url, "https://api.unsplash.com");

        let tagger = cfg.tagger().unwrap();
        assert!(tagger.tags("Via Ferrata intro").contains("climbing"));
    }

    #[test]
    fn test_blank_access_key_disables_lookup() {
        let file = write_config("[unsplash]\naccess_key = \"  \"\n");
        let cfg = load(file.path()).unwrap();
        assert_eq!(cfg.unsplash.access_key(), None);
    }

    #[test]
    fn test_unknown_category_is_config_error() {
        let file = write_config("[tagging.extra_keywords]\nsailing = [\"regatta\"]\n");
        let cfg = load(file.path()).unwrap();
        assert!(matches!(cfg.tagger(), Err(EventfeedError::Config(_))));
    }

    #[test]
    fn test_missing_explicit_file_is_error() {
        let err = load(Path::new("/nonexistent/eventfeed.toml"));
        assert!(err.is_err());
    }

    #[test]
    fn test_env_vars_layer_over_file() {
        let file = write_config("");
        let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());

        // SAFETY: ENV_LOCK serialises every config test that reads the environment
        unsafe {
            std::env::set_var("EVENTFEED_UNSPLASH__ACCESS_KEY", "envkey");
            std::env::set_var("EVENTFEED_UNSPLASH__TIMEOUT_SECS", "7");
        }
        let cfg = EventfeedConfig::load(Some(file.path()));
        unsafe {
            std::env::remove_var("EVENTFEED_UNSPLASH__ACCESS_KEY");
            std::env::remove_var("EVENTFEED_UNSPLASH__TIMEOUT_SECS");
        }

        let cfg = cfg.unwrap();
        assert_eq!(cfg.unsplash.access_key(), Some("envkey"));
        assert_eq!(cfg.unsplash.timeout_secs, Some(7));
        assert_eq!(cfg.unsplash.api_url, "https://api.unsplash.com");
    }
}
