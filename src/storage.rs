//! File storage for encrypted vault blobs.
//!
//! A vault path has exactly one on-disk representation at a time:
//!
//! - **Single file**: the whole `salt || token` blob at `<path>`.
//! - **Sharded**: N share files at `<path>.s1` .. `<path>.sN`, each
//!   holding one base64-encoded share.
//!
//! Writes select the representation from the sharding config and
//! remove the stale representation's files as part of the same write.
//! Reads take whatever representation exists on disk, so a vault
//! written single-file keeps working after sharding is switched on —
//! the next write performs the actual switch.
//!
//! Every file write goes through temp-file-then-rename so a crash
//! never leaves a half-written blob behind.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::crypto::envelope::MIN_BLOB_LEN;
use crate::errors::{Result, SentryVaultError};
use crate::sharding::{self, Share, ShardingConfig};

// ---------------------------------------------------------------------------
// Representation-aware entry points
// ---------------------------------------------------------------------------

/// Read the encrypted blob for a vault path, whichever representation
/// is on disk.
///
/// Returns `Ok(None)` when the path holds no vault at all — the
/// empty-vault sentinel that lets a fresh path auto-initialize on
/// first write.
pub fn read_vault_blob(path: &Path) -> Result<Option<Vec<u8>>> {
    let shares = read_share_files(path)?;
    if !shares.is_empty() {
        return combine_best_generation(shares).map(Some);
    }
    read_single(path)
}

/// Write the encrypted blob for a vault path in the representation the
/// config selects, deleting the other representation's files.
pub fn write_vault_blob(
    path: &Path,
    blob: &[u8],
    sharding_config: Option<&ShardingConfig>,
) -> Result<()> {
    match sharding_config {
        Some(config) => {
            let shares = sharding::split(blob, config)?;
            write_shares(path, &shares)
        }
        None => write_single(path, blob),
    }
}

// ---------------------------------------------------------------------------
// Single-file representation
// ---------------------------------------------------------------------------

/// Read a single-file vault blob.
///
/// Missing file is the empty-vault sentinel; an existing file shorter
/// than the minimum `salt || token` length is corruption, not absence.
pub fn read_single(path: &Path) -> Result<Option<Vec<u8>>> {
    if !path.exists() {
        return Ok(None);
    }

    let data = fs::read(path)?;
    if data.len() < MIN_BLOB_LEN {
        return Err(SentryVaultError::Corrupted(format!(
            "vault file {} is {} bytes, minimum is {MIN_BLOB_LEN}",
            path.display(),
            data.len()
        )));
    }

    Ok(Some(data))
}

/// Overwrite the single-file blob and remove any share files left from
/// a sharded representation.
pub fn write_single(path: &Path, blob: &[u8]) -> Result<()> {
    atomic_write(path, blob)?;
    remove_share_files(path, 0)?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Sharded representation
// ---------------------------------------------------------------------------

/// Path of the share file with the given 1-based index: `<path>.s<index>`.
pub fn share_path(path: &Path, index: u8) -> PathBuf {
    let mut os = path.as_os_str().to_os_string();
    os.push(format!(".s{index}"));
    PathBuf::from(os)
}

/// Write a full set of shares, then remove stale files: share files
/// with indices beyond the new set (a previous, larger N) and the
/// single-file blob if the vault is switching representation.
///
/// Each share file is written atomically, but the set as a whole is
/// not: a crash mid-write leaves shares from two generations side by
/// side.  The generation tags make that state detectable, and
/// `read_vault_blob` falls back to whichever generation still has a
/// complete-enough set.
pub fn write_shares(path: &Path, shares: &[Share]) -> Result<()> {
    for (i, share) in shares.iter().enumerate() {
        let index = (i + 1) as u8;
        atomic_write(&share_path(path, index), share.to_base64().as_bytes())?;
    }

    remove_share_files(path, shares.len() as u8)?;

    if path.exists() {
        fs::remove_file(path)?;
    }

    Ok(())
}

/// Load every share file that exists and parses for this vault path.
///
/// Individually missing or corrupt share files are tolerated — the
/// threshold scheme exists precisely so the vault survives losing
/// some of them.  But if share files exist and *none* of them are
/// usable, that is corruption, not an absent vault.
pub fn read_share_files(path: &Path) -> Result<Vec<Share>> {
    let mut found = 0usize;
    let mut shares = Vec::new();

    let mut files: Vec<(u8, PathBuf)> = list_share_files(path)?;
    files.sort_by_key(|(index, _)| *index);

    for (_, file) in files {
        found += 1;
        let Ok(contents) = fs::read_to_string(&file) else {
            continue;
        };
        if let Ok(share) = Share::from_base64(&contents) {
            shares.push(share);
        }
    }

    if found > 0 && shares.is_empty() {
        return Err(SentryVaultError::Corrupted(format!(
            "{found} share file(s) exist for {} but none are readable",
            path.display()
        )));
    }

    Ok(shares)
}

/// Enumerate `<path>.s<index>` files on disk, parsed index included.
fn list_share_files(path: &Path) -> Result<Vec<(u8, PathBuf)>> {
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    };
    if !dir.exists() {
        return Ok(Vec::new());
    }

    let Some(file_name) = path.file_name() else {
        return Ok(Vec::new());
    };
    let prefix = format!("{}.s", file_name.to_string_lossy());

    let mut files = Vec::new();
    for entry in fs::read_dir(&dir)? {
        let entry = entry?;
        let name = entry.file_name();
        let name = name.to_string_lossy();
        if let Some(rest) = name.strip_prefix(&prefix) {
            if let Ok(index) = rest.parse::<u8>() {
                if index >= 1 {
                    files.push((index, entry.path()));
                }
            }
        }
    }

    Ok(files)
}

/// Remove every share file for `path` with an index above `keep_up_to`.
///
/// `keep_up_to = 0` removes them all.
fn remove_share_files(path: &Path, keep_up_to: u8) -> Result<()> {
    for (index, file) in list_share_files(path)? {
        if index > keep_up_to {
            fs::remove_file(&file)?;
        }
    }
    Ok(())
}

/// Pick the generation with the most shares and combine it.
///
/// Normally all shares on disk belong to one generation.  After an
/// interrupted rewrite two generations can coexist; combining the
/// largest group means a mostly-old set (rotation died early) still
/// opens under the old passphrase, and a mostly-new set under the new
/// one.
fn combine_best_generation(shares: Vec<Share>) -> Result<Vec<u8>> {
    let mut groups: HashMap<u64, Vec<Share>> = HashMap::new();
    for share in shares {
        groups.entry(share.generation).or_default().push(share);
    }

    let best = groups
        .into_values()
        .max_by_key(|group| group.len())
        .unwrap_or_default();

    sharding::combine(&best)
}

// ---------------------------------------------------------------------------
// Low-level helpers
// ---------------------------------------------------------------------------

/// Write a file atomically: write a temp file in the same directory,
/// then rename it over the target.  Rename is atomic on the same
/// filesystem, so readers never see a half-written file.
///
/// Creates the parent directory on first use of a vault path.
pub(crate) fn atomic_write(path: &Path, bytes: &[u8]) -> Result<()> {
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    };
    if !parent.exists() {
        fs::create_dir_all(&parent)?;
    }

    let tmp_path = parent.join(format!(
        ".{}.tmp",
        path.file_name().unwrap_or_default().to_string_lossy()
    ));

    fs::write(&tmp_path, bytes)?;
    fs::rename(&tmp_path, path)?;

    Ok(())
}
