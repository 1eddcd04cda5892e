//! Canonical serialization of the plaintext vault.
//!
//! The wire form is a JSON object mapping site name to
//! `{"username": ..., "password": ...}` — the same shape for every
//! vault ever written.  A `BTreeMap` keeps the encoding stable across
//! calls for the same contents.
//!
//! A decode failure here means the passphrase was *correct* (the
//! authenticated decryption already succeeded) but the payload is not
//! a vault — which is why it gets its own `Parse` error, distinct from
//! `Authentication`.

use std::collections::BTreeMap;

use crate::errors::{Result, SentryVaultError};

use super::entry::Entry;

/// The decrypted contents of a vault: site name -> credentials.
pub type PlaintextVault = BTreeMap<String, Entry>;

/// Serialize a vault to its canonical JSON byte form.
pub fn encode(vault: &PlaintextVault) -> Result<Vec<u8>> {
    serde_json::to_vec(vault).map_err(|e| SentryVaultError::Serialization(format!("vault: {e}")))
}

/// Parse JSON bytes back into a vault.
pub fn decode(bytes: &[u8]) -> Result<PlaintextVault> {
    serde_json::from_slice(bytes).map_err(|e| SentryVaultError::Parse(e.to_string()))
}
