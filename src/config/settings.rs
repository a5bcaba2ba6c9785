use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::errors::{MaultError, Result};
use crate::storage::DatabaseOptions;

/// Directory name used under the platform config dir.
const APP_DIR: &str = "mault";

/// Vault-level configuration, loaded from `<home>/config.toml`.
///
/// Every field has a sensible default so Mault works out-of-the-box
/// without any config file at all.  Key-derivation parameters are
/// deliberately absent: changing them would lock out existing vaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// File name of the SQLite database inside the home directory.
    #[serde(default = "default_database_name")]
    pub database_name: String,

    /// How long a write waits on a locked database, in milliseconds.
    #[serde(default = "default_busy_timeout_ms")]
    pub busy_timeout_ms: u64,

    /// Deadline for a whole command, in seconds. `0` disables it.
    #[serde(default = "default_command_timeout_secs")]
    pub command_timeout_secs: u64,

    /// Record mutating operations in the `audit_log` table.
    #[serde(default = "default_audit_log")]
    pub audit_log: bool,
}

// ── Serde default helpers ────────────────────────────────────────────

fn default_database_name() -> String {
    "mault.db".to_string()
}

fn default_busy_timeout_ms() -> u64 {
    30_000
}

fn default_command_timeout_secs() -> u64 {
    30
}

fn default_audit_log() -> bool {
    true
}

// ── Implementation ───────────────────────────────────────────────────

impl Default for Settings {
    fn default() -> Self {
        Self {
            database_name: default_database_name(),
            busy_timeout_ms: default_busy_timeout_ms(),
            command_timeout_secs: default_command_timeout_secs(),
            audit_log: default_audit_log(),
        }
    }
}

impl Settings {
    /// Name of the config file we look for in the home directory.
    pub const FILE_NAME: &'static str = "config.toml";

    /// Load settings from `<home>/config.toml`.
    ///
    /// If the file does not exist, sensible defaults are returned.
    /// If the file exists but cannot be parsed, an error is returned.
    pub fn load(home: &Path) -> Result<Self> {
        let config_path = home.join(Self::FILE_NAME);

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(&config_path)?;

        let settings: Settings = toml::from_str(&contents).map_err(|e| {
            MaultError::ConfigError(format!("Failed to parse {}: {e}", config_path.display()))
        })?;

        if settings.database_name.trim().is_empty() {
            return Err(MaultError::ConfigError(format!(
                "database_name in {} cannot be empty",
                config_path.display()
            )));
        }

        Ok(settings)
    }

    /// Full path to the vault database.
    ///
    /// Example: `~/.config/mault/mault.db`
    pub fn database_path(&self, home: &Path) -> PathBuf {
        home.join(&self.database_name)
    }

    /// Convert the connection settings into storage-layer options.
    pub fn database_options(&self) -> DatabaseOptions {
        DatabaseOptions {
            busy_timeout: Duration::from_millis(self.busy_timeout_ms),
        }
    }

    /// The per-command deadline, if one is configured.
    pub fn command_timeout(&self) -> Option<Duration> {
        (self.command_timeout_secs > 0).then(|| Duration::from_secs(self.command_timeout_secs))
    }
}

/// Pick the vault home: an explicit path wins, otherwise the platform
/// config directory (`~/.config/mault` on Linux).
pub fn resolve_home(explicit: Option<&Path>) -> Result<PathBuf> {
    if let Some(home) = explicit {
        return Ok(home.to_path_buf());
    }

    dirs::config_dir()
        .map(|dir| dir.join(APP_DIR))
        .ok_or_else(|| {
            MaultError::ConfigError(
                "could not determine a config directory; pass --home or set MAULT_HOME".into(),
            )
        })
}

// ── Tests ────────────────────────────────────────────────────────────
