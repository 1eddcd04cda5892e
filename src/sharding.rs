//! Threshold secret sharing for the encrypted vault blob.
//!
//! Splits a byte secret into N shares with a K-of-N reconstruction
//! threshold using Shamir's scheme over GF(256) (the `sharks` crate,
//! one polynomial per secret byte, so secrets of any length work).
//! Any K shares reconstruct the secret exactly; any fewer reveal
//! nothing about it — information-theoretically, not just
//! computationally.
//!
//! Every `split` stamps its shares with a random generation tag.
//! Shamir happily "reconstructs" garbage from shares of two different
//! splits (e.g. before and after a passphrase rotation), so `combine`
//! refuses to mix generations instead.

use std::collections::HashSet;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use rand::RngCore;
use sharks::Sharks;

use crate::errors::{Result, SentryVaultError};

/// generation (8) + threshold (1).
const SHARE_HEADER_LEN: usize = 9;

/// How many shares a vault is split into, and how many are required to
/// put it back together.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShardingConfig {
    /// Total number of share files written (N).
    pub total_shares: u8,
    /// Minimum number of shares needed to reconstruct (K).
    pub threshold: u8,
}

impl ShardingConfig {
    pub fn new(total_shares: u8, threshold: u8) -> Result<Self> {
        let config = Self {
            total_shares,
            threshold,
        };
        config.validate()?;
        Ok(config)
    }

    /// Enforce `2 <= K <= N`.
    pub fn validate(&self) -> Result<()> {
        if self.threshold < 2 {
            return Err(SentryVaultError::Config(format!(
                "threshold must be at least 2 (got {})",
                self.threshold
            )));
        }
        if self.total_shares < self.threshold {
            return Err(SentryVaultError::Config(format!(
                "total shares ({}) must be at least the threshold ({})",
                self.total_shares, self.threshold
            )));
        }
        Ok(())
    }
}

/// One fragment of a split secret.
///
/// `data` is the raw GF(256) share: the x-coordinate byte followed by
/// one byte per secret byte.  The generation tag and threshold travel
/// with every share so `combine` can check a set for consistency
/// without any out-of-band state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Share {
    /// Random tag identifying the `split` call this share came from.
    pub generation: u64,
    /// The K this share's generation was split with.
    pub threshold: u8,
    /// x-coordinate byte followed by the share payload.
    pub data: Vec<u8>,
}

impl Share {
    /// The 1-based x-coordinate of this share.
    pub fn index(&self) -> u8 {
        self.data[0]
    }

    /// Encode as the single base64 string stored in a share file.
    ///
    /// Binary layout: `generation (8 bytes BE) || threshold (1 byte) || data`.
    pub fn to_base64(&self) -> String {
        let mut bytes = Vec::with_capacity(SHARE_HEADER_LEN + self.data.len());
        bytes.extend_from_slice(&self.generation.to_be_bytes());
        bytes.push(self.threshold);
        bytes.extend_from_slice(&self.data);
        BASE64.encode(bytes)
    }

    /// Parse a share from its base64 file representation.
    pub fn from_base64(encoded: &str) -> Result<Self> {
        let bytes = BASE64
            .decode(encoded.trim())
            .map_err(|e| SentryVaultError::Corrupted(format!("share is not valid base64: {e}")))?;

        // Header plus at least an x-coordinate and one payload byte.
        if bytes.len() < SHARE_HEADER_LEN + 2 {
            return Err(SentryVaultError::Corrupted(format!(
                "share too short: {} bytes",
                bytes.len()
            )));
        }

        let generation = u64::from_be_bytes(
            bytes[..8]
                .try_into()
                .map_err(|_| SentryVaultError::Corrupted("bad share header".into()))?,
        );
        let threshold = bytes[8];
        let data = bytes[SHARE_HEADER_LEN..].to_vec();

        if data[0] == 0 {
            return Err(SentryVaultError::Corrupted(
                "share index must not be zero".into(),
            ));
        }
        if threshold < 2 {
            return Err(SentryVaultError::Corrupted(format!(
                "share carries invalid threshold {threshold}"
            )));
        }

        Ok(Self {
            generation,
            threshold,
            data,
        })
    }
}

/// Split `secret` into `config.total_shares` shares, any
/// `config.threshold` of which reconstruct it exactly.
pub fn split(secret: &[u8], config: &ShardingConfig) -> Result<Vec<Share>> {
    config.validate()?;

    if secret.is_empty() {
        return Err(SentryVaultError::Config(
            "cannot split an empty secret".into(),
        ));
    }

    let mut generation_bytes = [0u8; 8];
    rand::rng().fill_bytes(&mut generation_bytes);
    let generation = u64::from_be_bytes(generation_bytes);

    let sharks = Sharks(config.threshold);
    let shares: Vec<Share> = sharks
        .dealer(secret)
        .take(config.total_shares as usize)
        .map(|s| Share {
            generation,
            threshold: config.threshold,
            data: Vec::from(&s),
        })
        .collect();

    if shares.len() != config.total_shares as usize {
        return Err(SentryVaultError::Config(format!(
            "expected {} shares, dealer produced {}",
            config.total_shares,
            shares.len()
        )));
    }

    Ok(shares)
}

/// Reconstruct a secret from shares.
///
/// The shares must all belong to one generation, carry distinct
/// indices, and number at least the threshold they were split with.
/// Exact inverse of `split` for any valid K-subset, regardless of
/// which K of the N are supplied.
pub fn combine(shares: &[Share]) -> Result<Vec<u8>> {
    let Some(first) = shares.first() else {
        return Err(SentryVaultError::InsufficientShares {
            required: 2,
            available: 0,
        });
    };

    for share in shares {
        if share.generation != first.generation {
            return Err(SentryVaultError::Corrupted(
                "shares belong to different vault generations".into(),
            ));
        }
        if share.threshold != first.threshold {
            return Err(SentryVaultError::Corrupted(
                "shares disagree on the reconstruction threshold".into(),
            ));
        }
    }

    let mut seen = HashSet::new();
    for share in shares {
        if !seen.insert(share.index()) {
            return Err(SentryVaultError::Corrupted(format!(
                "duplicate share index {}",
                share.index()
            )));
        }
    }

    let required = first.threshold as usize;
    if shares.len() < required {
        return Err(SentryVaultError::InsufficientShares {
            required,
            available: shares.len(),
        });
    }

    let sharks_shares: Vec<sharks::Share> = shares
        .iter()
        .map(|s| {
            sharks::Share::try_from(s.data.as_slice())
                .map_err(|e| SentryVaultError::Corrupted(format!("invalid share data: {e}")))
        })
        .collect::<Result<Vec<_>>>()?;

    let sharks = Sharks(first.threshold);
    sharks
        .recover(&sharks_shares)
        .map_err(|e| SentryVaultError::Corrupted(format!("share recovery failed: {e}")))
}
