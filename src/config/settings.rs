use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::crypto::kdf::Argon2Params;
use crate::errors::{Result, SentryVaultError};
use crate::sharding::ShardingConfig;

/// Project-level configuration, loaded from `.sentryvault.toml`.
///
/// Every field has a sensible default so SentryVault works
/// out-of-the-box without any config file at all.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Path of the vault file, relative to the project directory.
    #[serde(default = "default_vault_path")]
    pub vault_path: String,

    /// Default total share count (N).  Sharding is enabled only when
    /// both `total_shares` and `threshold` are set.
    #[serde(default)]
    pub total_shares: Option<u8>,

    /// Default reconstruction threshold (K).
    #[serde(default)]
    pub threshold: Option<u8>,

    /// Argon2 memory cost in KiB (default: 500 MB).
    #[serde(default = "default_argon2_memory_kib")]
    pub argon2_memory_kib: u32,

    /// Argon2 iteration count (default: 3).
    #[serde(default = "default_argon2_iterations")]
    pub argon2_iterations: u32,

    /// Argon2 parallelism degree (default: 8).
    #[serde(default = "default_argon2_parallelism")]
    pub argon2_parallelism: u32,
}

// ── Serde default helpers ────────────────────────────────────────────

fn default_vault_path() -> String {
    "vault.enc".to_string()
}

fn default_argon2_memory_kib() -> u32 {
    512_000 // 500 MB
}

fn default_argon2_iterations() -> u32 {
    3
}

fn default_argon2_parallelism() -> u32 {
    8
}

// ── Implementation ───────────────────────────────────────────────────

impl Default for Settings {
    fn default() -> Self {
        Self {
            vault_path: default_vault_path(),
            total_shares: None,
            threshold: None,
            argon2_memory_kib: default_argon2_memory_kib(),
            argon2_iterations: default_argon2_iterations(),
            argon2_parallelism: default_argon2_parallelism(),
        }
    }
}

impl Settings {
    /// Name of the config file we look for in the project directory.
    const FILE_NAME: &'static str = ".sentryvault.toml";

    /// Load settings from `<project_dir>/.sentryvault.toml`.
    ///
    /// If the file does not exist, sensible defaults are returned.
    /// If the file exists but cannot be parsed, an error is returned.
    pub fn load(project_dir: &Path) -> Result<Self> {
        let config_path = project_dir.join(Self::FILE_NAME);

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(&config_path)?;

        let settings: Settings = toml::from_str(&contents).map_err(|e| {
            SentryVaultError::Config(format!(
                "failed to parse {}: {e}",
                config_path.display()
            ))
        })?;

        Ok(settings)
    }

    /// Full path to the vault file for a given project directory.
    pub fn vault_path(&self, project_dir: &Path) -> PathBuf {
        project_dir.join(&self.vault_path)
    }

    /// The Argon2 parameters these settings describe.
    ///
    /// Changing them from the values a vault was written with makes
    /// that vault undecryptable until it is re-encrypted.
    pub fn kdf_params(&self) -> Argon2Params {
        Argon2Params {
            memory_kib: self.argon2_memory_kib,
            iterations: self.argon2_iterations,
            parallelism: self.argon2_parallelism,
        }
    }

    /// The sharding config, validated, or `None` when sharding is off.
    ///
    /// Setting only one of `total_shares`/`threshold` is a config
    /// error rather than a silent half-configuration.
    pub fn sharding_config(&self) -> Result<Option<ShardingConfig>> {
        match (self.total_shares, self.threshold) {
            (None, None) => Ok(None),
            (Some(total), Some(threshold)) => ShardingConfig::new(total, threshold).map(Some),
            _ => Err(SentryVaultError::Config(
                "total_shares and threshold must be set together".into(),
            )),
        }
    }
}
