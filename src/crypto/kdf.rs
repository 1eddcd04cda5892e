//! Passphrase-based key derivation using Argon2id.
//!
//! Argon2id is a memory-hard KDF that protects against brute-force and
//! GPU-based attacks.  The defaults here are part of the on-disk format
//! contract: a vault encrypted with one set of parameters can only be
//! decrypted with the same set.  Deployments that want different tuning
//! set it in `.sentryvault.toml` (see `Settings`).

use argon2::{Algorithm, Argon2, Params, Version};
use rand::RngCore;

use crate::errors::{Result, SentryVaultError};

/// Length of the salt in bytes (128 bits).
///
/// The salt is stored as the first 16 bytes of every encrypted blob.
pub const SALT_LEN: usize = 16;

/// Length of the derived key in bytes (256 bits, for AES-256).
pub const KEY_LEN: usize = 32;

/// Minimum safe memory cost in KiB (8 MB).
const MIN_MEMORY_KIB: u32 = 8_192;

/// Configurable Argon2id parameters.
///
/// The defaults are the format parameters every vault is written with
/// unless the config file says otherwise.
#[derive(Debug, Clone, Copy)]
pub struct Argon2Params {
    /// Memory cost in KiB (default: 512 000 = 500 MB).
    pub memory_kib: u32,
    /// Number of iterations (default: 3).
    pub iterations: u32,
    /// Parallelism lanes (default: 8).
    pub parallelism: u32,
}

impl Default for Argon2Params {
    fn default() -> Self {
        Self {
            memory_kib: 512_000,
            iterations: 3,
            parallelism: 8,
        }
    }
}

/// Derive a 32-byte key from a passphrase and salt using Argon2id.
///
/// Uses the default format parameters.  Prefer `derive_key_with_params`
/// when a `Settings` is available.
pub fn derive_key(passphrase: &[u8], salt: &[u8]) -> Result<[u8; KEY_LEN]> {
    derive_key_with_params(passphrase, salt, &Argon2Params::default())
}

/// Derive a 32-byte key with explicit Argon2id parameters.
///
/// The same passphrase + salt + params always produce the same key —
/// this determinism is what makes decryption with the correct
/// passphrase possible.  Enforces minimum parameters to prevent
/// dangerously weak KDF settings.
pub fn derive_key_with_params(
    passphrase: &[u8],
    salt: &[u8],
    kdf_params: &Argon2Params,
) -> Result<[u8; KEY_LEN]> {
    if kdf_params.memory_kib < MIN_MEMORY_KIB {
        return Err(SentryVaultError::KeyDerivation(format!(
            "Argon2 memory_kib must be at least {MIN_MEMORY_KIB} (got {})",
            kdf_params.memory_kib
        )));
    }
    if kdf_params.iterations < 1 {
        return Err(SentryVaultError::KeyDerivation(
            "Argon2 iterations must be at least 1".into(),
        ));
    }
    if kdf_params.parallelism < 1 {
        return Err(SentryVaultError::KeyDerivation(
            "Argon2 parallelism must be at least 1".into(),
        ));
    }

    let params = Params::new(
        kdf_params.memory_kib,
        kdf_params.iterations,
        kdf_params.parallelism,
        Some(KEY_LEN),
    )
    .map_err(|e| SentryVaultError::KeyDerivation(format!("invalid Argon2 params: {e}")))?;

    let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, params);

    let mut key = [0u8; KEY_LEN];
    argon2
        .hash_password_into(passphrase, salt, &mut key)
        .map_err(|e| SentryVaultError::KeyDerivation(format!("Argon2id hashing failed: {e}")))?;

    Ok(key)
}

/// Generate a cryptographically random 16-byte salt.
///
/// A fresh salt is drawn for every encryption generation, including
/// every passphrase rotation.
pub fn generate_salt() -> [u8; SALT_LEN] {
    let mut salt = [0u8; SALT_LEN];
    rand::rng().fill_bytes(&mut salt);
    salt
}
