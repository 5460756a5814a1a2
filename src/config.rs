use color_eyre::{eyre::eyre, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;

use crate::jokes::client::DEFAULT_API_URL;
use crate::jokes::service::DEFAULT_MAX_JOKES;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
  pub api: ApiConfig,
  pub cache: CacheConfig,
  /// Start offline: use a probe that always answers false, never touch the
  /// network.
  pub offline: bool,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
  /// Joke endpoint, one random joke per GET
  pub url: String,
  /// Request timeout in seconds
  pub timeout_secs: u64,
}

impl Default for ApiConfig {
  fn default() -> Self {
    Self {
      url: DEFAULT_API_URL.to_string(),
      timeout_secs: 10,
    }
  }
}

impl ApiConfig {
  /// Parse the configured endpoint, rejecting unusable URLs up front.
  pub fn endpoint(&self) -> Result<Url> {
    Url::parse(&self.url).map_err(|e| eyre!("Invalid api.url '{}': {}", self.url, e))
  }

  pub fn timeout(&self) -> Duration {
    Duration::from_secs(self.timeout_secs)
  }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
  /// Cache database path (default: $XDG_DATA_HOME/jokebox/cache.db)
  pub path: Option<PathBuf>,
  /// How many jokes to keep, in memory and on disk
  pub max_jokes: usize,
}

impl Default for CacheConfig {
  fn default() -> Self {
    Self {
      path: None,
      max_jokes: DEFAULT_MAX_JOKES,
    }
  }
}

impl Config {
  /// Load configuration from file.
  ///
  /// Search order:
  /// 1. Explicit path if provided
  /// 2. ./jokebox.yaml (current directory)
  /// 3. $XDG_CONFIG_HOME/jokebox/config.yaml
  /// 4. ~/.config/jokebox/config.yaml
  ///
  /// The API needs no credentials, so unlike most clients a missing config
  /// file is not an error; defaults cover everything.
  pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
    let path = if let Some(p) = explicit_path {
      if p.exists() {
        Some(p.to_path_buf())
      } else {
        return Err(eyre!("Config file not found: {}", p.display()));
      }
    } else {
      Self::find_config_file()
    };

    match path {
      Some(p) => Self::load_from_path(&p),
      None => Ok(Self::default()),
    }
  }

  fn find_config_file() -> Option<PathBuf> {
    // Check current directory
    let local = PathBuf::from("jokebox.yaml");
    if local.exists() {
      return Some(local);
    }

    // Check XDG config directory
    if let Some(config_dir) = dirs::config_dir() {
      let xdg_path = config_dir.join("jokebox").join("config.yaml");
      if xdg_path.exists() {
        return Some(xdg_path);
      }
    }

    None
  }

  fn load_from_path(path: &Path) -> Result<Self> {
    let contents = std::fs::read_to_string(path)
      .map_err(|e| eyre!("Failed to read config file {}: {}", path.display(), e))?;

    let config: Config = serde_yaml::from_str(&contents)
      .map_err(|e| eyre!("Failed to parse config file {}: {}", path.display(), e))?;

    Ok(config)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_defaults() {
    let config = Config::default();
    assert_eq!(config.api.url, DEFAULT_API_URL);
    assert_eq!(config.api.timeout_secs, 10);
    assert_eq!(config.cache.max_jokes, DEFAULT_MAX_JOKES);
    assert_eq!(config.cache.path, None);
    assert!(!config.offline);
  }

  #[test]
  fn test_partial_yaml_keeps_other_defaults() {
    let config: Config = serde_yaml::from_str("api:\n  url: http://localhost:9999/joke\n").unwrap();
    assert_eq!(config.api.url, "http://localhost:9999/joke");
    assert_eq!(config.api.timeout_secs, 10);
    assert_eq!(config.cache.max_jokes, DEFAULT_MAX_JOKES);
  }

  #[test]
  fn test_full_yaml() {
    let yaml = "\
api:
  url: http://localhost:9999/joke
  timeout_secs: 3
cache:
  path: /tmp/jokes.db
  max_jokes: 2
offline: true
";
    let config: Config = serde_yaml::from_str(yaml).unwrap();
    assert_eq!(config.api.timeout_secs, 3);
    assert_eq!(config.cache.path, Some(PathBuf::from("/tmp/jokes.db")));
    assert_eq!(config.cache.max_jokes, 2);
    assert!(config.offline);
  }

  #[test]
  fn test_default_endpoint_parses() {
    assert!(Config::default().api.endpoint().is_ok());
  }

  #[test]
  fn test_garbage_endpoint_rejected() {
    let config: Config = serde_yaml::from_str("api:\n  url: not a url\n").unwrap();
    assert!(config.api.endpoint().is_err());
  }

  #[test]
  fn test_missing_explicit_path_is_an_error() {
    assert!(Config::load(Some(Path::new("/definitely/not/here.yaml"))).is_err());
  }
}
