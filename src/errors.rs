use thiserror::Error;

/// All errors that can occur in SentryVault.
#[derive(Debug, Error)]
pub enum SentryVaultError {
    // --- Crypto errors ---
    #[error("Authentication failed — wrong passphrase or tampered data")]
    Authentication,

    #[error("Encryption failed: {0}")]
    Encryption(String),

    #[error("Key derivation failed: {0}")]
    KeyDerivation(String),

    // --- Storage / format errors ---
    #[error("Corrupted vault data: {0}")]
    Corrupted(String),

    #[error("Vault payload did not parse: {0}")]
    Parse(String),

    // --- Sharding errors ---
    #[error("Insufficient shares: need {required}, have {available}")]
    InsufficientShares { required: usize, available: usize },

    #[error("Invalid sharding config: {0}")]
    Config(String),

    // --- Serialization errors ---
    #[error("Serialization error: {0}")]
    Serialization(String),

    // --- IO errors ---
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // --- CLI errors ---
    #[error("Command failed: {0}")]
    CommandFailed(String),
}

/// Convenience type alias for SentryVault results.
pub type Result<T> = std::result::Result<T, SentryVaultError>;
