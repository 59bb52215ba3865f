//! User configuration.
//!
//! # Storage layout
//!
//! ```text
//! ~/.gitpatch/
//!   config.yaml
//! ```
//!
//! Every field is optional; a missing file yields [`Config::default`].
//!
//! # API pattern
//!
//! - `load_at(home: &Path)`: explicit home; used in tests with `TempDir`
//! - `load()`: derives home from `dirs::home_dir()`, delegates to `load_at`

use std::path::{Path, PathBuf};

use gitpatch_core::Signature;
use gitpatch_github::DEFAULT_API_URL;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Includes file path and line context from serde_yaml.
    #[error("failed to parse config at {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("invalid config at {path}: {reason}")]
    Invalid { path: PathBuf, reason: String },

    #[error("cannot determine home directory; set $HOME or equivalent")]
    HomeNotFound,
}

/// Contents of `~/.gitpatch/config.yaml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api_url: String,
    /// Name of the environment variable holding the API token.
    pub token_env: String,
    pub timeout_secs: u64,
    /// Prefix for generated branch names.
    pub branch_prefix: String,
    /// Commit author and committer. Empty means the token owner.
    pub author: Signature,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_owned(),
            token_env: "GITHUB_TOKEN".to_owned(),
            timeout_secs: 30,
            branch_prefix: "gitpatch-".to_owned(),
            author: Signature::default(),
        }
    }
}

/// `<home>/.gitpatch/config.yaml`, with no I/O.
pub fn config_path_at(home: &Path) -> PathBuf {
    home.join(".gitpatch").join("config.yaml")
}

pub fn load_at(home: &Path) -> Result<Config, ConfigError> {
    let path = config_path_at(home);
    if !path.exists() {
        return Ok(Config::default());
    }
    let contents = std::fs::read_to_string(&path).map_err(|source| ConfigError::Io {
        path: path.clone(),
        source,
    })?;
    if contents.trim().is_empty() {
        return Ok(Config::default());
    }
    let config: Config = serde_yaml::from_str(&contents).map_err(|source| ConfigError::Parse {
        path: path.clone(),
        source,
    })?;
    if config.timeout_secs == 0 {
        return Err(ConfigError::Invalid {
            path,
            reason: "timeout_secs must be at least 1".to_owned(),
        });
    }
    Ok(config)
}

/// `load_at` convenience wrapper.
pub fn load() -> Result<Config, ConfigError> {
    let home = dirs::home_dir().ok_or(ConfigError::HomeNotFound)?;
    load_at(&home)
}
