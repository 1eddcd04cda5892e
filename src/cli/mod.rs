//! CLI module — Clap argument parser, output helpers, and command implementations.

pub mod commands;
pub mod output;

use std::path::PathBuf;

use clap::Parser;
use zeroize::Zeroizing;

use crate::config::Settings;
use crate::crypto::kdf::Argon2Params;
use crate::errors::{Result, SentryVaultError};
use crate::sharding::ShardingConfig;
use crate::vault::VaultManager;

/// Minimum passphrase length to prevent trivially weak passphrases.
const MIN_PASSPHRASE_LEN: usize = 8;

/// SentryVault CLI: passphrase-protected password vault.
#[derive(Parser)]
#[command(
    name = "sentryvault",
    about = "Passphrase-protected password vault with optional threshold secret sharing",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to the vault file (default: from .sentryvault.toml, or vault.enc)
    #[arg(long, global = true)]
    pub vault: Option<String>,

    /// Split the vault into this many share files
    #[arg(long, global = true, requires = "threshold")]
    pub shares: Option<u8>,

    /// Minimum number of shares needed to reconstruct the vault
    #[arg(long, global = true, requires = "shares")]
    pub threshold: Option<u8>,

    /// Vault passphrase (prompts interactively if omitted)
    #[arg(long, global = true, env = "SENTRYVAULT_PASSPHRASE", hide_env_values = true)]
    pub passphrase: Option<String>,
}

/// All available subcommands.
#[derive(clap::Subcommand)]
pub enum Commands {
    /// Add or update a site's credentials
    Add {
        /// Site name (e.g. example.com)
        site: String,
        /// Username for the site
        username: String,
        /// Password (omit for interactive prompt)
        password: Option<String>,
    },

    /// Show the credentials stored for a site
    Get {
        /// Site name
        site: String,
    },

    /// List all sites in the vault
    List,

    /// Delete a site's credentials
    Delete {
        /// Site name
        site: String,
        /// Skip confirmation prompt
        #[arg(short, long)]
        force: bool,
    },

    /// Change the vault passphrase
    Rotate,

    /// Check whether a passphrase opens the vault
    Verify,

    /// Encrypt an arbitrary file with a passphrase
    Encrypt {
        /// File to encrypt
        input: String,
        /// Where to write the encrypted file
        output: String,
    },

    /// Decrypt a file produced by `encrypt`
    Decrypt {
        /// Encrypted file
        input: String,
        /// Where to write the decrypted contents
        output: String,
    },
}

// ---------------------------------------------------------------------------
// Shared helpers used by multiple commands
// ---------------------------------------------------------------------------

/// Everything a command needs to talk to a vault, resolved from the
/// config file with CLI flags taking precedence.
pub struct VaultContext {
    pub path: PathBuf,
    pub sharding: Option<ShardingConfig>,
    pub kdf_params: Argon2Params,
}

/// Resolve the vault path, sharding config, and KDF parameters.
pub fn vault_context(cli: &Cli) -> Result<VaultContext> {
    let cwd = std::env::current_dir()?;
    let settings = Settings::load(&cwd)?;

    let path = match &cli.vault {
        Some(p) => PathBuf::from(p),
        None => settings.vault_path(&cwd),
    };

    let sharding = match (cli.shares, cli.threshold) {
        (Some(total), Some(threshold)) => Some(ShardingConfig::new(total, threshold)?),
        _ => settings.sharding_config()?,
    };

    Ok(VaultContext {
        path,
        sharding,
        kdf_params: settings.kdf_params(),
    })
}

/// Open a `VaultManager` for the resolved context, prompting for the
/// passphrase if it was not supplied via flag or environment.
pub fn open_manager(cli: &Cli) -> Result<VaultManager> {
    let ctx = vault_context(cli)?;
    let passphrase = prompt_passphrase(cli)?;
    VaultManager::with_kdf_params(&ctx.path, &passphrase, ctx.sharding, ctx.kdf_params)
}

/// Get the vault passphrase, trying in order:
/// 1. `--passphrase` flag / `SENTRYVAULT_PASSPHRASE` env var (CI/scripts)
/// 2. Interactive prompt
///
/// Returns `Zeroizing<String>` so the passphrase is wiped from memory
/// on drop.
pub fn prompt_passphrase(cli: &Cli) -> Result<Zeroizing<String>> {
    if let Some(pw) = &cli.passphrase {
        if !pw.is_empty() {
            return Ok(Zeroizing::new(pw.clone()));
        }
    }

    let pw = dialoguer::Password::new()
        .with_prompt("Enter vault passphrase")
        .interact()
        .map_err(|e| SentryVaultError::CommandFailed(format!("passphrase prompt: {e}")))?;
    Ok(Zeroizing::new(pw))
}

/// Prompt for a new passphrase with confirmation (used by `rotate`).
///
/// Respects `SENTRYVAULT_NEW_PASSPHRASE` for scripted usage and
/// enforces a minimum length.
pub fn prompt_new_passphrase() -> Result<Zeroizing<String>> {
    if let Ok(pw) = std::env::var("SENTRYVAULT_NEW_PASSPHRASE") {
        if !pw.is_empty() {
            if pw.len() < MIN_PASSPHRASE_LEN {
                return Err(SentryVaultError::CommandFailed(format!(
                    "passphrase must be at least {MIN_PASSPHRASE_LEN} characters"
                )));
            }
            return Ok(Zeroizing::new(pw));
        }
    }

    loop {
        let pw = Zeroizing::new(
            dialoguer::Password::new()
                .with_prompt("New vault passphrase")
                .interact()
                .map_err(|e| SentryVaultError::CommandFailed(format!("passphrase prompt: {e}")))?,
        );

        if pw.len() < MIN_PASSPHRASE_LEN {
            output::warning(&format!(
                "Passphrase must be at least {MIN_PASSPHRASE_LEN} characters."
            ));
            continue;
        }

        let confirm = Zeroizing::new(
            dialoguer::Password::new()
                .with_prompt("Confirm new passphrase")
                .interact()
                .map_err(|e| SentryVaultError::CommandFailed(format!("passphrase prompt: {e}")))?,
        );

        if *pw != *confirm {
            output::warning("Passphrases do not match, try again.");
            continue;
        }

        return Ok(pw);
    }
}
