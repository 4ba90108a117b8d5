//! Application configuration.
//!
//! The configuration is loaded from
//! `$XDG_CONFIG_HOME/tilecycle/config.json`.  Every section is optional so
//! the file can grow new keys without breaking older configs.
//!
//! # Example
//!
//! ```json
//! {
//!   "matching": {
//!     "position_tolerance": 20.0,
//!     "size_tolerance": 100.0
//!   },
//!   "socket": { "path": "/run/user/1000/tilecycle.sock" }
//! }
//! ```

use crate::geometry::Tolerance;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Top-level configuration.
///
/// Every field is optional; a minimal `{}` file is valid and all sections
/// fall back to their compiled-in defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// How loosely a window's rectangle may match a slot.
    #[serde(default)]
    pub matching: MatchingConfig,

    /// Command socket settings.
    #[serde(default)]
    pub socket: SocketConfig,
}

/// Tolerances for deciding which slot a window occupies.
///
/// Window managers enforce minimum sizes and add decorations, so a window
/// rarely lands on the exact requested pixels.  Origin drift is a stronger
/// signal than size drift, hence the two separate bounds.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchingConfig {
    /// Maximum per-axis origin difference.  Default: `20.0`.
    pub position_tolerance: f64,
    /// Maximum per-axis size difference.  Default: `100.0`.
    pub size_tolerance: f64,
}

impl Default for MatchingConfig {
    fn default() -> Self {
        Self {
            position_tolerance: Tolerance::DEFAULT_POSITION,
            size_tolerance: Tolerance::DEFAULT_SIZE,
        }
    }
}

impl MatchingConfig {
    pub fn tolerance(&self) -> Tolerance {
        Tolerance::new(self.position_tolerance, self.size_tolerance)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SocketConfig {
    /// Path of the command socket.  Default:
    /// `$XDG_RUNTIME_DIR/tilecycle.sock`.
    pub path: Option<PathBuf>,
}

impl SocketConfig {
    /// The configured path, or the default under `$XDG_RUNTIME_DIR`
    /// (falling back to `/tmp`).
    pub fn resolved_path(&self) -> PathBuf {
        self.path.clone().unwrap_or_else(|| {
            let runtime = std::env::var("XDG_RUNTIME_DIR").unwrap_or_else(|_| "/tmp".into());
            PathBuf::from(runtime).join("tilecycle.sock")
        })
    }
}

impl Config {
    /// Load configuration from a JSON file at `path`.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError(format!("failed to read {}: {}", path.display(), e)))?;
        let config: Self = serde_json::from_str(&contents)
            .map_err(|e| ConfigError(format!("failed to parse {}: {}", path.display(), e)))?;
        Ok(config)
    }
}

/// Error from loading or parsing a configuration file.
#[derive(Debug, thiserror::Error)]
#[error("config error: {0}")]
pub struct ConfigError(String);
