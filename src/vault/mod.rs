//! Vault module — encrypted credential storage.
//!
//! This module provides:
//! - The `Entry` record type (`entry`)
//! - Canonical JSON encoding of the plaintext vault (`codec`)
//! - The high-level `VaultManager` orchestrating the full
//!   read-modify-write protocol (`manager`)

pub mod codec;
pub mod entry;
pub mod manager;

// Re-export the most commonly used items.
pub use codec::PlaintextVault;
pub use entry::Entry;
pub use manager::VaultManager;
