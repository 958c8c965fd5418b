//! User settings: Gemini credentials, WordPress sites and the deployment
//! locale, read from TOML.
//!
//! ```toml
//! locale = "ja"
//!
//! [gemini]
//! api_key = "..."
//! model = "pro"
//!
//! [sites.main]
//! url = "https://example.com"
//! user = "editor"
//! password = "xxxx xxxx xxxx xxxx"
//!
//! [sites.main.categories]
//! News = 3
//! ```

use std::collections::BTreeMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::llm::Model;
use crate::locale::{Locale, LocaleSetting};
use crate::{AutowriterError, Result};

/// Environment variable naming the settings file.
pub const CONFIG_ENV: &str = "AUTOWRITER_CONFIG";
/// Environment variable holding the Gemini API key.
pub const API_KEY_ENV: &str = "GEMINI_API_KEY";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// `"ja"`, `"en"` or a full `[locale]` table.
    pub locale: LocaleSetting,
    pub gemini: GeminiSettings,
    pub sites: BTreeMap<String, SiteSettings>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeminiSettings {
    /// Falls back to `GEMINI_API_KEY` when unset.
    pub api_key: Option<String>,
    pub model: Model,
}

/// One WordPress site.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteSettings {
    pub url: String,
    pub user: String,
    /// Application password
    pub password: String,
    /// Static category name to id map; fetched from the site when empty.
    #[serde(default)]
    pub categories: BTreeMap<String, u64>,
}

impl Settings {
    /// Settings file location: `explicit`, else `$AUTOWRITER_CONFIG`, else
    /// `<config_dir>/autowriter/config.toml`.
    pub fn resolve_path(explicit: Option<&Path>) -> PathBuf {
        if let Some(path) = explicit {
            return path.to_path_buf();
        }
        if let Some(path) = env::var_os(CONFIG_ENV).filter(|p| !p.is_empty()) {
            return PathBuf::from(path);
        }
        dirs::config_dir()
            .map(|d| d.join("autowriter").join("config.toml"))
            .unwrap_or_else(|| PathBuf::from("config.toml"))
    }

    /// Reads settings; a missing file yields defaults, a malformed one is an error.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "no settings file, using defaults");
                return Ok(Self::default());
            }
            Err(e) => return Err(e.into()),
        };

        let settings: Self = toml::from_str(&contents)
            .map_err(|e| AutowriterError::ConfigError(format!("{}: {}", path.display(), e)))?;
        tracing::debug!(path = %path.display(), sites = settings.sites.len(), "loaded settings");
        Ok(settings)
    }

    /// The configured closing-section locale.
    pub fn locale(&self) -> Locale {
        self.locale.resolve()
    }

    /// API key from the file, else from the environment.
    pub fn api_key(&self) -> Option<String> {
        self.gemini
            .api_key
            .clone()
            .filter(|k| !k.trim().is_empty())
            .or_else(|| env::var(API_KEY_ENV).ok().filter(|k| !k.trim().is_empty()))
    }

    /// Looks up a site by name, or the first site by name when `name` is `None`.
    pub fn site(&self, name: Option<&str>) -> Result<(&str, &SiteSettings)> {
        match name {
            Some(name) => self
                .sites
                .get_key_value(name)
                .map(|(k, v)| (k.as_str(), v))
                .ok_or_else(|| AutowriterError::ConfigError(format!("unknown site: {}", name))),
            None => self
                .sites
                .iter()
                .next()
                .map(|(k, v)| (k.as_str(), v))
                .ok_or_else(|| AutowriterError::ConfigError("no sites configured".to_string())),
        }
    }
}
