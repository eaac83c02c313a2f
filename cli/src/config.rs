//! Configuration management for CLI tools.
//!
//! Configuration is stored in ~/.yotts/{app_name}/config.yaml and holds
//! named contexts, similar to kubectl's context management.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::paths::Paths;

/// CLI configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Application name (not serialized).
    #[serde(skip)]
    pub app_name: String,

    /// Name of the currently active context.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub current_context: String,

    /// Map of context name to context configuration.
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub contexts: HashMap<String, Context>,

    /// Path to the config file (not serialized).
    #[serde(skip)]
    config_path: PathBuf,
}

/// A single API context configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Context {
    /// Context name.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,

    /// DashScope API key.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub api_key: String,

    /// Service region ("cn" or "intl"). Empty means the default region.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub region: String,

    /// REST base URL override (optional).
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub base_url: String,

    /// Realtime WebSocket URL override (optional).
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub realtime_url: String,

    /// Application-specific settings (`model`, `workspace`, ...).
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub extra: HashMap<String, String>,
}

impl Config {
    /// Returns the config file path.
    pub fn path(&self) -> &Path {
        &self.config_path
    }

    /// Saves the configuration to disk.
    pub fn save(&self) -> anyhow::Result<()> {
        let content = serde_yaml::to_string(self)?;
        std::fs::write(&self.config_path, content)?;
        Ok(())
    }

    /// Adds (or replaces) a context.
    pub fn add_context(&mut self, name: &str, mut ctx: Context) -> anyhow::Result<()> {
        ctx.name = name.to_string();
        self.contexts.insert(name.to_string(), ctx);
        self.save()
    }

    /// Deletes a context.
    pub fn delete_context(&mut self, name: &str) -> anyhow::Result<()> {
        if self.contexts.remove(name).is_none() {
            anyhow::bail!("context '{}' not found", name);
        }
        if self.current_context == name {
            self.current_context.clear();
        }
        self.save()
    }

    /// Sets the current context.
    pub fn use_context(&mut self, name: &str) -> anyhow::Result<()> {
        if !self.contexts.contains_key(name) {
            anyhow::bail!("context '{}' not found", name);
        }
        self.current_context = name.to_string();
        self.save()
    }

    /// Gets a specific context.
    pub fn get_context(&self, name: &str) -> Option<&Context> {
        self.contexts.get(name)
    }

    /// Resolves the named context, falling back to the current one when no
    /// name is given.
    pub fn resolve_context(&self, name: Option<&str>) -> Option<&Context> {
        let name = name.filter(|n| !n.is_empty()).unwrap_or(&self.current_context);
        if name.is_empty() {
            return None;
        }
        self.get_context(name)
    }

    /// Lists all context names, sorted.
    pub fn list_contexts(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.contexts.keys().map(|s| s.as_str()).collect();
        names.sort_unstable();
        names
    }
}

impl Context {
    /// Gets an extra value.
    pub fn get_extra(&self, key: &str) -> Option<&str> {
        self.extra.get(key).map(|s| s.as_str())
    }

    /// Sets an extra value.
    pub fn set_extra(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.extra.insert(key.into(), value.into());
    }
}

/// Loads configuration for the specified app, creating an empty file on
/// first use.
pub fn load_config(app_name: &str, custom_path: Option<&str>) -> anyhow::Result<Config> {
    let config_path = match custom_path {
        Some(p) => PathBuf::from(p),
        None => Paths::new(app_name)?.config_file(),
    };

    if let Some(parent) = config_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let mut cfg: Config = if config_path.exists() {
        let content = std::fs::read_to_string(&config_path)?;
        if content.trim().is_empty() {
            Config::default()
        } else {
            serde_yaml::from_str(&content)?
        }
    } else {
        let cfg = Config::default();
        std::fs::write(&config_path, serde_yaml::to_string(&cfg)?)?;
        cfg
    };

    cfg.app_name = app_name.to_string();
    cfg.config_path = config_path;

    Ok(cfg)
}

/// Masks the API key for display.
pub fn mask_api_key(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    if chars.len() <= 8 {
        "*".repeat(chars.len())
    } else {
        let head: String = chars[..4].iter().collect();
        let tail: String = chars[chars.len() - 4..].iter().collect();
        format!("{}{}{}", head, "*".repeat(chars.len() - 8), tail)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_config() -> (tempfile::TempDir, Config) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        let cfg = load_config("yotts", path.to_str()).unwrap();
        (dir, cfg)
    }

    #[test]
    fn test_load_creates_file() {
        let (dir, cfg) = temp_config();
        assert!(dir.path().join("config.yaml").exists());
        assert_eq!(cfg.app_name, "yotts");
        assert!(cfg.contexts.is_empty());
    }

    #[test]
    fn test_context_lifecycle() {
        let (dir, mut cfg) = temp_config();

        let ctx = Context {
            api_key: "sk-1234567890".into(),
            region: "intl".into(),
            ..Default::default()
        };
        cfg.add_context("sg", ctx).unwrap();
        cfg.use_context("sg").unwrap();

        let path = dir.path().join("config.yaml");
        let reloaded = load_config("yotts", path.to_str()).unwrap();
        assert_eq!(reloaded.current_context, "sg");
        let ctx = reloaded.resolve_context(None).unwrap();
        assert_eq!(ctx.name, "sg");
        assert_eq!(ctx.region, "intl");

        cfg.delete_context("sg").unwrap();
        assert!(cfg.current_context.is_empty());
        assert!(cfg.delete_context("sg").is_err());
        assert!(cfg.use_context("missing").is_err());
    }

    #[test]
    fn test_resolve_named() {
        let (_dir, mut cfg) = temp_config();
        cfg.add_context("a", Context::default()).unwrap();
        cfg.add_context("b", Context::default()).unwrap();
        assert!(cfg.resolve_context(None).is_none());
        assert_eq!(cfg.resolve_context(Some("b")).unwrap().name, "b");
        assert_eq!(cfg.list_contexts(), vec!["a", "b"]);
    }

    #[test]
    fn test_resolve_falls_back_to_current() {
        let (_dir, mut cfg) = temp_config();
        cfg.add_context("a", Context::default()).unwrap();
        cfg.add_context("b", Context::default()).unwrap();
        cfg.use_context("a").unwrap();
        assert_eq!(cfg.resolve_context(None).unwrap().name, "a");
        assert_eq!(cfg.resolve_context(Some("")).unwrap().name, "a");
        assert_eq!(cfg.resolve_context(Some("b")).unwrap().name, "b");
        assert!(cfg.resolve_context(Some("c")).is_none());
    }

    #[test]
    fn test_unknown_fields_are_ignored() {
        let cfg: Config = serde_yaml::from_str(
            "current_context: a\ncontexts:\n  a:\n    api_key: sk-1\n    default_voice: v1\n",
        )
        .unwrap();
        assert_eq!(cfg.contexts["a"].api_key, "sk-1");
    }

    #[test]
    fn test_extra() {
        let mut ctx = Context::default();
        ctx.set_extra("model", "qwen3-tts-vc-realtime-2025-11-27");
        assert_eq!(ctx.get_extra("model"), Some("qwen3-tts-vc-realtime-2025-11-27"));
        assert_eq!(ctx.get_extra("workspace"), None);
    }

    #[test]
    fn test_mask_api_key() {
        assert_eq!(mask_api_key("short"), "*****");
        assert_eq!(mask_api_key("sk-abcdefgh1234"), "sk-a*******1234");
    }
}
