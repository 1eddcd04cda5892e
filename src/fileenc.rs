//! Standalone file encryption, independent of the vault.
//!
//! Reuses the same passphrase-sealed envelope as the vault
//! (`salt || token`) but over arbitrary file contents.

use std::fs;
use std::path::Path;

use zeroize::Zeroize;

use crate::crypto::envelope;
use crate::crypto::kdf::Argon2Params;
use crate::errors::Result;
use crate::storage;

/// Encrypt `input` under a passphrase and write the envelope to `output`.
pub fn encrypt_file(
    passphrase: &str,
    input: &Path,
    output: &Path,
    params: &Argon2Params,
) -> Result<()> {
    let mut plaintext = fs::read(input)?;
    let blob = envelope::seal(passphrase.as_bytes(), &plaintext, params);
    plaintext.zeroize();
    let blob = blob?;

    storage::atomic_write(output, &blob)
}

/// Decrypt an envelope written by `encrypt_file` back to `output`.
pub fn decrypt_file(
    passphrase: &str,
    input: &Path,
    output: &Path,
    params: &Argon2Params,
) -> Result<()> {
    let blob = fs::read(input)?;
    let mut plaintext = envelope::unseal(passphrase.as_bytes(), &blob, params)?;

    let written = storage::atomic_write(output, &plaintext);
    plaintext.zeroize();
    written
}
