//! AES-256-GCM authenticated token encryption.
//!
//! Each call to `encrypt` generates a fresh random 12-byte nonce, so
//! two encryptions of the same plaintext never produce the same token.
//! The token carries a one-byte format version and an issue timestamp,
//! both authenticated as associated data.
//!
//! Layout of a token:
//!   [ version: 1 byte | timestamp: 8 bytes BE | nonce: 12 bytes | ciphertext + 16-byte tag ]

use aes_gcm::aead::{Aead, KeyInit, OsRng, Payload};
use aes_gcm::{AeadCore, Aes256Gcm, Nonce};

use crate::errors::{Result, SentryVaultError};

/// Current token format version.
const TOKEN_VERSION: u8 = 1;

/// Size of the AES-256-GCM nonce in bytes.
const NONCE_LEN: usize = 12;

/// Size of the GCM authentication tag in bytes.
const TAG_LEN: usize = 16;

/// version (1) + timestamp (8).
const HEADER_LEN: usize = 9;

/// Smallest possible token: header + nonce + tag over an empty plaintext.
pub const MIN_TOKEN_LEN: usize = HEADER_LEN + NONCE_LEN + TAG_LEN;

/// Encrypt `plaintext` with a 32-byte `key` into an authenticated token.
///
/// The version byte and timestamp are fed to AES-GCM as associated
/// data, so tampering with either fails verification just like
/// tampering with the ciphertext.
pub fn encrypt(key: &[u8], plaintext: &[u8]) -> Result<Vec<u8>> {
    let cipher = Aes256Gcm::new_from_slice(key)
        .map_err(|e| SentryVaultError::Encryption(format!("invalid key length: {e}")))?;

    let nonce = Aes256Gcm::generate_nonce(&mut OsRng);

    let mut header = [0u8; HEADER_LEN];
    header[0] = TOKEN_VERSION;
    header[1..].copy_from_slice(&chrono::Utc::now().timestamp().to_be_bytes());

    let ciphertext = cipher
        .encrypt(
            &nonce,
            Payload {
                msg: plaintext,
                aad: &header,
            },
        )
        .map_err(|e| SentryVaultError::Encryption(format!("encryption error: {e}")))?;

    let mut token = Vec::with_capacity(HEADER_LEN + NONCE_LEN + ciphertext.len());
    token.extend_from_slice(&header);
    token.extend_from_slice(&nonce);
    token.extend_from_slice(&ciphertext);
    Ok(token)
}

/// Decrypt a token that was produced by `encrypt`.
///
/// Fails closed: a short token or unknown version is `Corrupted`, a
/// failed tag check is `Authentication`, and no partial plaintext is
/// ever returned.
pub fn decrypt(key: &[u8], token: &[u8]) -> Result<Vec<u8>> {
    if token.len() < MIN_TOKEN_LEN {
        return Err(SentryVaultError::Corrupted(format!(
            "token too short: {} bytes, minimum is {MIN_TOKEN_LEN}",
            token.len()
        )));
    }

    if token[0] != TOKEN_VERSION {
        return Err(SentryVaultError::Corrupted(format!(
            "unsupported token version {}, expected {TOKEN_VERSION}",
            token[0]
        )));
    }

    let header = &token[..HEADER_LEN];
    let (nonce_bytes, ciphertext) = token[HEADER_LEN..].split_at(NONCE_LEN);
    let nonce = Nonce::from_slice(nonce_bytes);

    let cipher = Aes256Gcm::new_from_slice(key).map_err(|_| SentryVaultError::Authentication)?;

    // Tag verification covers header + ciphertext.  Any mismatch — wrong
    // key, flipped bit, foreign token — lands here.
    cipher
        .decrypt(
            nonce,
            Payload {
                msg: ciphertext,
                aad: header,
            },
        )
        .map_err(|_| SentryVaultError::Authentication)
}
