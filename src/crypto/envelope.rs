//! Passphrase-sealed envelopes: `salt || token`.
//!
//! An envelope is the unit everything on disk is made of — the single
//! vault file is one, the secret fed to the sharding engine is one, and
//! the standalone file-encryption mode produces one.
//!
//! Layout: the first 16 bytes are the Argon2 salt, the rest is an
//! authenticated token (see `cipher`).

use zeroize::Zeroizing;

use crate::crypto::cipher;
use crate::crypto::kdf::{self, Argon2Params, SALT_LEN};
use crate::errors::{Result, SentryVaultError};

/// Smallest valid envelope: salt + minimum token.
pub const MIN_BLOB_LEN: usize = SALT_LEN + cipher::MIN_TOKEN_LEN;

/// Encrypt `plaintext` under a passphrase.
///
/// Generates a fresh random salt, derives the key, and returns
/// `salt || token`.  The derived key is wiped when this returns.
pub fn seal(passphrase: &[u8], plaintext: &[u8], params: &Argon2Params) -> Result<Vec<u8>> {
    let salt = kdf::generate_salt();
    let key = Zeroizing::new(kdf::derive_key_with_params(passphrase, &salt, params)?);

    let token = cipher::encrypt(key.as_ref(), plaintext)?;

    let mut blob = Vec::with_capacity(SALT_LEN + token.len());
    blob.extend_from_slice(&salt);
    blob.extend_from_slice(&token);
    Ok(blob)
}

/// Decrypt an envelope produced by `seal`.
///
/// Expects the first 16 bytes to be the salt.  A blob too short to
/// contain a salt and a minimal token is `Corrupted`; a failed tag
/// check surfaces as `Authentication` from the cipher layer.
pub fn unseal(passphrase: &[u8], blob: &[u8], params: &Argon2Params) -> Result<Vec<u8>> {
    if blob.len() < MIN_BLOB_LEN {
        return Err(SentryVaultError::Corrupted(format!(
            "encrypted blob too short: {} bytes, minimum is {MIN_BLOB_LEN}",
            blob.len()
        )));
    }

    let (salt, token) = blob.split_at(SALT_LEN);
    let key = Zeroizing::new(kdf::derive_key_with_params(passphrase, salt, params)?);

    cipher::decrypt(key.as_ref(), token)
}
