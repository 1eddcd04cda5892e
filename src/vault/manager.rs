//! High-level vault operations used by CLI commands.
//!
//! `VaultManager` composes key derivation, the authenticated cipher,
//! the codec, and the storage backend.  Every operation runs a full
//! read -> decrypt -> decode -> mutate -> encode -> encrypt -> write
//! cycle; there is no incremental update, so the files on disk are
//! always a complete, self-consistent generation.

use std::path::{Path, PathBuf};

use zeroize::{Zeroize, Zeroizing};

use crate::crypto::envelope;
use crate::crypto::kdf::Argon2Params;
use crate::errors::Result;
use crate::sharding::ShardingConfig;
use crate::storage;

use super::codec::{self, PlaintextVault};
use super::entry::Entry;

/// The main vault handle, bound to one path and one passphrase.
///
/// Passphrase rotation deliberately consumes the manager and hands
/// back a fresh one bound to the new passphrase — there is never an
/// instance holding stale key material.
pub struct VaultManager {
    /// Path of the vault (single file, or the stem of the share files).
    path: PathBuf,

    /// The passphrase for this vault (wiped from memory on drop).
    passphrase: Zeroizing<String>,

    /// When set, the vault is persisted as N share files instead of a
    /// single blob.
    sharding: Option<ShardingConfig>,

    /// KDF tuning; defaults to the on-disk format parameters.
    kdf_params: Argon2Params,
}

impl VaultManager {
    // ------------------------------------------------------------------
    // Construction
    // ------------------------------------------------------------------

    /// Bind a manager to a vault path with the default KDF parameters.
    ///
    /// The path does not have to exist yet — a fresh path reads as an
    /// empty vault and is created by the first mutating operation.
    pub fn new(path: &Path, passphrase: &str, sharding: Option<ShardingConfig>) -> Result<Self> {
        Self::with_kdf_params(path, passphrase, sharding, Argon2Params::default())
    }

    /// Bind a manager with explicit Argon2 parameters (from `Settings`).
    pub fn with_kdf_params(
        path: &Path,
        passphrase: &str,
        sharding: Option<ShardingConfig>,
        kdf_params: Argon2Params,
    ) -> Result<Self> {
        if let Some(config) = &sharding {
            config.validate()?;
        }

        Ok(Self {
            path: path.to_path_buf(),
            passphrase: Zeroizing::new(passphrase.to_string()),
            sharding,
            kdf_params,
        })
    }

    // ------------------------------------------------------------------
    // Entry operations
    // ------------------------------------------------------------------

    /// Add or replace the entry for a site.
    pub fn add_entry(&self, site: &str, username: &str, password: &str) -> Result<()> {
        let mut vault = self.load()?;
        vault.insert(site.to_string(), Entry::new(username, password));
        self.persist(&vault)
    }

    /// Decrypt the vault and return the entry for a site, if present.
    ///
    /// A missing site is `Ok(None)` — an unreadable vault (wrong
    /// passphrase, corruption, too few shares) is an error, never a
    /// silent `None`.
    pub fn get_entry(&self, site: &str) -> Result<Option<Entry>> {
        let mut vault = self.load()?;
        Ok(vault.remove(site))
    }

    /// All site names in the vault, sorted.
    pub fn list_entries(&self) -> Result<Vec<String>> {
        Ok(self.load()?.keys().cloned().collect())
    }

    /// Remove a site's entry.  Returns whether anything was deleted;
    /// nothing is rewritten when the site was absent.
    pub fn delete_entry(&self, site: &str) -> Result<bool> {
        let mut vault = self.load()?;
        if vault.remove(site).is_none() {
            return Ok(false);
        }
        self.persist(&vault)?;
        Ok(true)
    }

    // ------------------------------------------------------------------
    // Passphrase handling
    // ------------------------------------------------------------------

    /// Re-encrypt the vault under a new passphrase.
    ///
    /// Decrypts with the current passphrase, then persists through a
    /// fresh manager bound to the new one — a new salt is drawn inside
    /// `seal`, and the shares are re-split when sharding is configured.
    /// If the write fails, the old representation on disk is untouched
    /// and still opens with the old passphrase.
    pub fn change_passphrase(self, new_passphrase: &str) -> Result<VaultManager> {
        let vault = self.load()?;

        let next = VaultManager {
            path: self.path.clone(),
            passphrase: Zeroizing::new(new_passphrase.to_string()),
            sharding: self.sharding,
            kdf_params: self.kdf_params,
        };

        next.persist(&vault)?;
        Ok(next)
    }

    /// Check whether this manager's passphrase opens the vault.
    ///
    /// Runs the full read + decrypt + decode path without touching
    /// storage.  Any failure — wrong passphrase, missing vault,
    /// corruption, insufficient shares — is `false`, never an error.
    pub fn verify(&self) -> bool {
        match storage::read_vault_blob(&self.path) {
            Ok(Some(blob)) => envelope::unseal(self.passphrase.as_bytes(), &blob, &self.kdf_params)
                .and_then(|mut plaintext| {
                    let parsed = codec::decode(&plaintext);
                    plaintext.zeroize();
                    parsed
                })
                .is_ok(),
            _ => false,
        }
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    /// The vault path this manager is bound to.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The sharding config, if the vault is sharded.
    pub fn sharding(&self) -> Option<&ShardingConfig> {
        self.sharding.as_ref()
    }

    // ------------------------------------------------------------------
    // Read / write cycle
    // ------------------------------------------------------------------

    /// Read and decrypt the vault; an absent vault is an empty one.
    fn load(&self) -> Result<PlaintextVault> {
        match storage::read_vault_blob(&self.path)? {
            None => Ok(PlaintextVault::new()),
            Some(blob) => {
                let mut plaintext =
                    envelope::unseal(self.passphrase.as_bytes(), &blob, &self.kdf_params)?;
                let vault = codec::decode(&plaintext);
                plaintext.zeroize();
                vault
            }
        }
    }

    /// Encode, encrypt under a fresh salt, and write the whole vault.
    fn persist(&self, vault: &PlaintextVault) -> Result<()> {
        let mut plaintext = codec::encode(vault)?;
        let blob = envelope::seal(self.passphrase.as_bytes(), &plaintext, &self.kdf_params);
        plaintext.zeroize();
        let blob = blob?;

        storage::write_vault_blob(&self.path, &blob, self.sharding.as_ref())
    }
}
