use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::constants::constants;

pub const ENV_BACKEND_URL: &str = "FOLIO_BACKEND_URL";
pub const ENV_BACKEND_KEY: &str = "FOLIO_BACKEND_KEY";
pub const ENV_CLOUDINARY_CLOUD: &str = "FOLIO_CLOUDINARY_CLOUD";

/// Persisted preferences, overridden field by field from the environment.
#[derive(Serialize, Deserialize, Default, Debug, Clone, PartialEq)]
pub struct Config {
  pub backend_url: Option<String>,
  pub backend_key: Option<String>,
  pub cloudinary_cloud_name: Option<String>,
  pub request_timeout_secs: Option<u64>,
}

/// Endpoint and access key for the remote content store.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BackendConfig {
  pub url: Option<String>,
  pub key: Option<String>,
}

impl BackendConfig {
  pub fn new(url: impl Into<String>, key: impl Into<String>) -> Self {
    Self { url: Some(url.into()), key: Some(key.into()) }
  }

  /// Both values present, non-blank, and not the placeholder sentinels.
  pub fn is_configured(&self) -> bool {
    let c = constants();
    let usable = |value: &Option<String>, placeholder: &str| {
      value.as_deref().map(str::trim).is_some_and(|v| !v.is_empty() && v != placeholder)
    };
    usable(&self.url, &c.placeholder_url) && usable(&self.key, &c.placeholder_key)
  }

  /// Url and key, when configured.
  pub fn credentials(&self) -> Option<(&str, &str)> {
    if !self.is_configured() {
      return None;
    }
    Some((self.url.as_deref()?.trim().trim_end_matches('/'), self.key.as_deref()?.trim()))
  }
}

fn config_file() -> Option<PathBuf> {
  ProjectDirs::from("", "", "folio").map(|dirs| dirs.config_dir().join("prefs.toml"))
}

fn env_value(name: &str) -> Option<String> {
  std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

impl Config {
  /// Load `prefs.toml` from the platform config directory, then apply
  /// environment overrides.
  pub fn load() -> Self {
    let mut config = Self::load_file();
    config.apply_env(env_value);
    config
  }

  /// `prefs.toml` alone. A missing or unreadable file yields defaults.
  pub fn load_file() -> Self {
    config_file()
      .and_then(|path| std::fs::read_to_string(path).ok())
      .and_then(|content| toml::from_str(&content).ok())
      .unwrap_or_default()
  }

  /// Override fields from a variable lookup.
  pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
    if let Some(url) = lookup(ENV_BACKEND_URL) {
      self.backend_url = Some(url);
    }
    if let Some(key) = lookup(ENV_BACKEND_KEY) {
      self.backend_key = Some(key);
    }
    if let Some(cloud) = lookup(ENV_CLOUDINARY_CLOUD) {
      self.cloudinary_cloud_name = Some(cloud);
    }
  }

  pub fn save(&self) -> Result<PathBuf> {
    let path = config_file().context("no home directory for the config file")?;
    if let Some(dir) = path.parent() {
      std::fs::create_dir_all(dir).with_context(|| format!("Failed to create {}", dir.display()))?;
    }
    let content = toml::to_string(self).context("Failed to serialize preferences")?;
    std::fs::write(&path, content).with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(path)
  }

  pub fn backend(&self) -> BackendConfig {
    BackendConfig { url: self.backend_url.clone(), key: self.backend_key.clone() }
  }

  pub fn request_timeout_secs(&self) -> u64 {
    self.request_timeout_secs.unwrap_or(constants().request_timeout_secs)
  }
}
