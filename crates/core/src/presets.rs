//! Named writing-policy presets persisted as JSON.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::policy::DEFAULT_POLICY;
use crate::{AutowriterError, Result};

/// Name of the built-in preset; it always exists and cannot be removed.
pub const DEFAULT_PRESET: &str = "default";

/// Policy texts by name plus the currently selected one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PresetStore {
    pub presets: BTreeMap<String, String>,
    pub active: String,
}

impl Default for PresetStore {
    fn default() -> Self {
        let mut presets = BTreeMap::new();
        presets.insert(DEFAULT_PRESET.to_string(), DEFAULT_POLICY.to_string());
        Self { presets, active: DEFAULT_PRESET.to_string() }
    }
}

impl PresetStore {
    /// `<config_dir>/autowriter/policies.json`
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .map(|d| d.join("autowriter").join("policies.json"))
            .unwrap_or_else(|| PathBuf::from("policies.json"))
    }

    /// Loads the store, falling back to the built-in store when the file is
    /// missing or unreadable.
    pub fn load(path: &Path) -> Self {
        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(_) => {
                tracing::debug!(path = %path.display(), "no preset file, using built-in presets");
                return Self::default();
            }
        };

        match serde_json::from_str::<Self>(&contents) {
            Ok(store) => store.normalized(),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "unreadable preset file, using built-in presets");
                Self::default()
            }
        }
    }

    /// Writes the store as pretty JSON, creating parent directories.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Text of the active preset.
    pub fn active_text(&self) -> &str {
        self.presets.get(&self.active).map(String::as_str).unwrap_or(DEFAULT_POLICY)
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.presets.get(name).map(String::as_str)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.presets.keys().map(String::as_str)
    }

    /// Adds or replaces a preset and makes it active.
    pub fn upsert(&mut self, name: &str, text: &str) -> Result<()> {
        let name = name.trim();
        if name.is_empty() {
            return Err(AutowriterError::MissingInput("preset name"));
        }
        self.presets.insert(name.to_string(), text.to_string());
        self.active = name.to_string();
        Ok(())
    }

    /// Imports a `.txt` policy file; the preset is named after the file stem.
    pub fn import_file(&mut self, path: &Path) -> Result<String> {
        if !path.exists() {
            return Err(AutowriterError::FileNotFound(path.to_path_buf()));
        }
        let text = fs::read_to_string(path)?;
        let name = path
            .file_stem()
            .and_then(|s| s.to_str())
            .ok_or_else(|| AutowriterError::ConfigError(format!("cannot name a preset after {}", path.display())))?
            .to_string();
        self.upsert(&name, &text)?;
        Ok(name)
    }

    pub fn select(&mut self, name: &str) -> Result<()> {
        if !self.presets.contains_key(name) {
            return Err(AutowriterError::ConfigError(format!("unknown preset: {}", name)));
        }
        self.active = name.to_string();
        Ok(())
    }

    /// Removes a preset; the active selection falls back to the default.
    ///
    /// Returns whether anything was removed.
    pub fn remove(&mut self, name: &str) -> Result<bool> {
        if name == DEFAULT_PRESET {
            return Err(AutowriterError::ConfigError("the default preset cannot be removed".to_string()));
        }
        let removed = self.presets.remove(name).is_some();
        if self.active == name {
            self.active = DEFAULT_PRESET.to_string();
        }
        Ok(removed)
    }

    /// Drops every preset and restores the built-in one.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    fn normalized(mut self) -> Self {
        self.presets.entry(DEFAULT_PRESET.to_string()).or_insert_with(|| DEFAULT_POLICY.to_string());
        if !self.presets.contains_key(&self.active) {
            self.active = DEFAULT_PRESET.to_string();
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_store() {
        let store = PresetStore::default();
        assert_eq!(store.active, DEFAULT_PRESET);
        assert_eq!(store.active_text(), DEFAULT_POLICY);
    }

    #[test]
    fn test_load_missing_file() {
        let dir = TempDir::new().unwrap();
        assert_eq!(PresetStore::load(&dir.path().join("none.json")), PresetStore::default());
    }

    #[test]
    fn test_load_unreadable_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("policies.json");
        fs::write(&path, "{not json").unwrap();
        assert_eq!(PresetStore::load(&path), PresetStore::default());
    }

    #[test]
    fn test_save_and_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("policies.json");
        let mut store = PresetStore::default();
        store.upsert("finance", "[本文指示]\n数字を使う").unwrap();
        store.save(&path).unwrap();

        let loaded = PresetStore::load(&path);
        assert_eq!(loaded, store);
        assert_eq!(loaded.active, "finance");
    }

    #[test]
    fn test_load_restores_missing_default() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("policies.json");
        fs::write(&path, r#"{"presets":{"a":"x"},"active":"gone"}"#).unwrap();
        let store = PresetStore::load(&path);
        assert!(store.get(DEFAULT_PRESET).is_some());
        assert_eq!(store.active, DEFAULT_PRESET);
    }

    #[test]
    fn test_import_uses_file_stem() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("media.txt");
        fs::write(&path, "policy text").unwrap();
        let mut store = PresetStore::default();
        assert_eq!(store.import_file(&path).unwrap(), "media");
        assert_eq!(store.active_text(), "policy text");
    }

    #[test]
    fn test_import_missing_file() {
        let mut store = PresetStore::default();
        let result = store.import_file(Path::new("/nonexistent/policy.txt"));
        assert!(matches!(result, Err(AutowriterError::FileNotFound(_))));
    }

    #[test]
    fn test_remove_active_falls_back() {
        let mut store = PresetStore::default();
        store.upsert("tmp", "x").unwrap();
        assert!(store.remove("tmp").unwrap());
        assert_eq!(store.active, DEFAULT_PRESET);
        assert!(!store.remove("tmp").unwrap());
    }

    #[test]
    fn test_default_cannot_be_removed() {
        let mut store = PresetStore::default();
        assert!(store.remove(DEFAULT_PRESET).is_err());
    }

    #[test]
    fn test_select_unknown() {
        let mut store = PresetStore::default();
        assert!(store.select("nope").is_err());
        store.upsert("a", "x").unwrap();
        store.select(DEFAULT_PRESET).unwrap();
        assert_eq!(store.active, DEFAULT_PRESET);
    }

    #[test]
    fn test_reset_restores_builtin_store() {
        let mut store = PresetStore::default();
        store.upsert(DEFAULT_PRESET, "edited").unwrap();
        store.upsert("other", "o").unwrap();
        store.reset();
        assert_eq!(store, PresetStore::default());
        assert_eq!(store.get("other"), None);
    }
}
