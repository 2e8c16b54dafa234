//! # Configuration
//!
//! Startmarks configuration is managed by [`confique`], which handles layered
//! loading from a TOML file and environment variables.
//!
//! ## Resolution Order
//!
//! 1. **Environment variables**: `STARTMARKS_DATA_DIR`, `STARTMARKS_ICON_ENDPOINT`, etc.
//! 2. **Config file**: `startmarks.toml` in the given config directory.
//! 3. **Compiled defaults**: via `#[config(default = ...)]`.
//!
//! ## Available Settings
//!
//! | Key | Default | Description |
//! |-----|---------|-------------|
//! | `data_dir` | OS data dir | Where the bookmark collection is stored |
//! | `storage_key` | `simplestart-enhanced-bookmarks` | Slot holding the collection |
//! | `icon_endpoint` | `http://localhost:8000/api/favicon` | Favicon lookup service |
//! | `icon_timeout_secs` | `5` | Per-lookup timeout |
//! | `resolve_icons` | `true` | Turn background icon lookups on or off |

use confique::Config;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{Result, StartmarksError};

pub const CONFIG_FILENAME: &str = "startmarks.toml";

/// Configuration for startmarks, stored in `startmarks.toml`.
#[derive(Config, Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct StartmarksConfig {
    /// Directory holding the collection. When absent, the OS data directory is used.
    #[config(env = "STARTMARKS_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Key of the slot holding the collection.
    #[config(env = "STARTMARKS_STORAGE_KEY", default = "simplestart-enhanced-bookmarks")]
    pub storage_key: String,

    /// Favicon service queried as `GET <endpoint>?url=<link url>`.
    #[config(env = "STARTMARKS_ICON_ENDPOINT", default = "http://localhost:8000/api/favicon")]
    pub icon_endpoint: String,

    #[config(env = "STARTMARKS_ICON_TIMEOUT_SECS", default = 5)]
    pub icon_timeout_secs: u64,

    #[config(env = "STARTMARKS_RESOLVE_ICONS", default = true)]
    pub resolve_icons: bool,
}

impl Default for StartmarksConfig {
    fn default() -> Self {
        Self {
            data_dir: None,
            storage_key: crate::store::STORAGE_KEY.to_string(),
            icon_endpoint: "http://localhost:8000/api/favicon".to_string(),
            icon_timeout_secs: 5,
            resolve_icons: true,
        }
    }
}

impl StartmarksConfig {
    /// Load from the environment and `startmarks.toml` in `config_dir`.
    /// A missing file is fine; defaults fill the gaps.
    pub fn load<P: AsRef<Path>>(config_dir: P) -> Result<Self> {
        let path = config_dir.as_ref().join(CONFIG_FILENAME);
        Self::builder()
            .env()
            .file(path)
            .load()
            .map_err(|e| StartmarksError::Config(e.to_string()))
    }

    /// The configured data directory, or the OS-appropriate default.
    pub fn data_dir(&self) -> Result<PathBuf> {
        if let Some(dir) = &self.data_dir {
            return Ok(dir.clone());
        }
        directories::ProjectDirs::from("", "", "startmarks")
            .map(|dirs| dirs.data_dir().to_path_buf())
            .ok_or_else(|| StartmarksError::Config("No home directory available".to_string()))
    }

    pub fn icon_timeout(&self) -> Duration {
        Duration::from_secs(self.icon_timeout_secs)
    }
}

/// OS-appropriate directory for `startmarks.toml`.
pub fn default_config_dir() -> Option<PathBuf> {
    directories::ProjectDirs::from("", "", "startmarks").map(|dirs| dirs.config_dir().to_path_buf())
}
