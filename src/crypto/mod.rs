//! Cryptographic primitives for SentryVault.
//!
//! This module provides:
//! - Argon2id passphrase-based key derivation (`kdf`)
//! - AES-256-GCM authenticated token encryption (`cipher`)
//! - Passphrase-sealed `salt || token` envelopes (`envelope`)

pub mod cipher;
pub mod envelope;
pub mod kdf;

// Re-export the most commonly used items so callers can write:
//   use crate::crypto::{seal, unseal, derive_key, ...};
pub use cipher::{decrypt, encrypt};
pub use envelope::{seal, unseal, MIN_BLOB_LEN};
pub use kdf::{derive_key, derive_key_with_params, generate_salt, Argon2Params, SALT_LEN};
