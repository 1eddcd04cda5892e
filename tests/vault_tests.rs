//! Integration tests for the vault manager: CRUD, rotation, sharded
//! storage, and representation switching.

use std::fs;
use std::path::{Path, PathBuf};

use sentryvault::crypto::kdf::Argon2Params;
use sentryvault::errors::SentryVaultError;
use sentryvault::fileenc;
use sentryvault::sharding::ShardingConfig;
use sentryvault::vault::VaultManager;
use tempfile::TempDir;

/// Reduced Argon2 parameters so the suite stays fast.
fn test_params() -> Argon2Params {
    Argon2Params {
        memory_kib: 8_192,
        iterations: 1,
        parallelism: 1,
    }
}

/// Helper: a temporary vault path inside a fresh temp dir.
fn vault_path() -> (TempDir, PathBuf) {
    let dir = TempDir::new().expect("create temp dir");
    let path = dir.path().join("test.enc");
    (dir, path)
}

fn manager(path: &Path, passphrase: &str, sharding: Option<ShardingConfig>) -> VaultManager {
    VaultManager::with_kdf_params(path, passphrase, sharding, test_params())
        .expect("construct manager")
}

fn share_file(path: &Path, index: u8) -> PathBuf {
    PathBuf::from(format!("{}.s{index}", path.display()))
}

// ---------------------------------------------------------------------------
// Entry CRUD
// ---------------------------------------------------------------------------

#[test]
fn fresh_vault_crud_scenario() {
    let (_dir, path) = vault_path();
    let vault = manager(&path, "test-passphrase", None);

    // Fresh path: empty list, nothing to get or delete.
    assert!(vault.list_entries().unwrap().is_empty());
    assert!(vault.get_entry("example.com").unwrap().is_none());
    assert!(!vault.delete_entry("example.com").unwrap());

    vault.add_entry("example.com", "alice", "p@ss1").unwrap();

    let entry = vault.get_entry("example.com").unwrap().expect("entry");
    assert_eq!(entry.username, "alice");
    assert_eq!(entry.password, "p@ss1");

    assert_eq!(vault.list_entries().unwrap(), vec!["example.com"]);

    assert!(vault.delete_entry("example.com").unwrap());
    assert!(vault.list_entries().unwrap().is_empty());
}

#[test]
fn add_entry_overwrites_existing_site() {
    let (_dir, path) = vault_path();
    let vault = manager(&path, "pw-overwrite", None);

    vault.add_entry("site", "alice", "old").unwrap();
    vault.add_entry("site", "bob", "new").unwrap();

    let entry = vault.get_entry("site").unwrap().expect("entry");
    assert_eq!(entry.username, "bob");
    assert_eq!(entry.password, "new");
    assert_eq!(vault.list_entries().unwrap().len(), 1);
}

#[test]
fn list_entries_is_sorted() {
    let (_dir, path) = vault_path();
    let vault = manager(&path, "pw-sorted", None);

    vault.add_entry("zeta.org", "u", "p").unwrap();
    vault.add_entry("alpha.net", "u", "p").unwrap();
    vault.add_entry("mid.io", "u", "p").unwrap();

    assert_eq!(
        vault.list_entries().unwrap(),
        vec!["alpha.net", "mid.io", "zeta.org"]
    );
}

#[test]
fn wrong_passphrase_is_an_error_not_an_absent_entry() {
    let (_dir, path) = vault_path();
    manager(&path, "right", None)
        .add_entry("example.com", "alice", "p@ss1")
        .unwrap();

    // Missing site under the correct passphrase: a normal empty result.
    let right = manager(&path, "right", None);
    assert!(right.get_entry("nosuchsite.com").unwrap().is_none());

    // Wrong passphrase: an authentication failure, clearly distinct.
    let wrong = manager(&path, "wrong", None);
    assert!(matches!(
        wrong.get_entry("example.com"),
        Err(SentryVaultError::Authentication)
    ));
    assert!(matches!(
        wrong.list_entries(),
        Err(SentryVaultError::Authentication)
    ));
}

#[test]
fn truncated_vault_file_is_corruption() {
    let (_dir, path) = vault_path();
    fs::write(&path, b"way too short").unwrap();

    let vault = manager(&path, "pw", None);
    assert!(matches!(
        vault.list_entries(),
        Err(SentryVaultError::Corrupted(_))
    ));
}

#[test]
fn tampered_vault_file_fails_authentication() {
    let (_dir, path) = vault_path();
    let vault = manager(&path, "pw-tamper", None);
    vault.add_entry("site", "u", "p").unwrap();

    let mut blob = fs::read(&path).unwrap();
    let last = blob.len() - 1;
    blob[last] ^= 0xFF;
    fs::write(&path, &blob).unwrap();

    assert!(matches!(
        vault.get_entry("site"),
        Err(SentryVaultError::Authentication)
    ));
}

// ---------------------------------------------------------------------------
// Passphrase verification and rotation
// ---------------------------------------------------------------------------

#[test]
fn verify_passphrase() {
    let (_dir, path) = vault_path();

    // No vault on disk yet: nothing verifies.
    assert!(!manager(&path, "anything", None).verify());

    manager(&path, "correct horse", None)
        .add_entry("site", "u", "p")
        .unwrap();

    assert!(manager(&path, "correct horse", None).verify());
    assert!(!manager(&path, "battery staple", None).verify());
}

#[test]
fn verify_returns_false_on_corruption_instead_of_erroring() {
    let (_dir, path) = vault_path();
    fs::write(&path, b"short").unwrap();

    assert!(!manager(&path, "pw", None).verify());
}

#[test]
fn change_passphrase_rotates_salt_and_key() {
    let (_dir, path) = vault_path();
    let vault = manager(&path, "old-passphrase", None);
    vault.add_entry("example.com", "alice", "p@ss1").unwrap();

    let salt_before = fs::read(&path).unwrap()[..16].to_vec();

    let rotated = vault.change_passphrase("new-passphrase").unwrap();

    // The returned manager is already bound to the new passphrase.
    let entry = rotated.get_entry("example.com").unwrap().expect("entry");
    assert_eq!(entry.username, "alice");

    assert!(manager(&path, "new-passphrase", None).verify());
    assert!(!manager(&path, "old-passphrase", None).verify());

    // Rotation must draw a fresh salt.
    let salt_after = fs::read(&path).unwrap()[..16].to_vec();
    assert_ne!(salt_before, salt_after);
}

#[test]
fn change_passphrase_requires_the_current_one() {
    let (_dir, path) = vault_path();
    manager(&path, "actual", None)
        .add_entry("site", "u", "p")
        .unwrap();

    let impostor = manager(&path, "guessed", None);
    assert!(matches!(
        impostor.change_passphrase("whatever"),
        Err(SentryVaultError::Authentication)
    ));

    // The failed attempt must leave the vault untouched.
    assert!(manager(&path, "actual", None).verify());
}

// ---------------------------------------------------------------------------
// Sharded storage
// ---------------------------------------------------------------------------

#[test]
fn sharded_vault_crud_roundtrip() {
    let (_dir, path) = vault_path();
    let config = ShardingConfig::new(5, 3).unwrap();
    let vault = manager(&path, "shard-pw", Some(config));

    vault.add_entry("example.com", "alice", "p@ss1").unwrap();

    // Exactly the share files exist, no single blob.
    assert!(!path.exists());
    for i in 1..=5 {
        assert!(share_file(&path, i).exists(), "share {i} should exist");
    }
    assert!(!share_file(&path, 6).exists());

    let entry = vault.get_entry("example.com").unwrap().expect("entry");
    assert_eq!(entry.username, "alice");
    assert!(vault.verify());
}

#[test]
fn sharded_vault_survives_losing_up_to_n_minus_k_shares() {
    let (_dir, path) = vault_path();
    let config = ShardingConfig::new(5, 3).unwrap();
    let vault = manager(&path, "lossy-pw", Some(config));
    vault.add_entry("site", "u", "p").unwrap();

    // Lose two of five shares: still above the threshold.
    fs::remove_file(share_file(&path, 2)).unwrap();
    fs::remove_file(share_file(&path, 4)).unwrap();
    assert_eq!(vault.list_entries().unwrap(), vec!["site"]);

    // Lose a third: below the threshold now.
    fs::remove_file(share_file(&path, 5)).unwrap();
    assert!(matches!(
        vault.list_entries(),
        Err(SentryVaultError::InsufficientShares {
            required: 3,
            available: 2
        })
    ));
}

#[test]
fn sharded_vault_tolerates_a_corrupt_share_file() {
    let (_dir, path) = vault_path();
    let config = ShardingConfig::new(4, 2).unwrap();
    let vault = manager(&path, "corrupt-one", Some(config));
    vault.add_entry("site", "u", "p").unwrap();

    fs::write(share_file(&path, 3), "not a share at all").unwrap();

    // Three good shares remain, threshold is two.
    assert_eq!(vault.list_entries().unwrap(), vec!["site"]);
}

#[test]
fn all_share_files_unreadable_is_corruption_not_an_absent_vault() {
    let (_dir, path) = vault_path();
    let config = ShardingConfig::new(3, 2).unwrap();
    let vault = manager(&path, "all-bad-pw", Some(config));
    vault.add_entry("site", "u", "p").unwrap();

    for i in 1..=3 {
        fs::write(share_file(&path, i), "definitely not a share").unwrap();
    }

    // Share files exist but none parse: that must read as corruption,
    // never as a fresh empty vault a write could silently replace.
    assert!(matches!(
        vault.list_entries(),
        Err(SentryVaultError::Corrupted(_))
    ));
    assert!(!vault.verify());
}

#[test]
fn rotation_interrupted_early_still_opens_under_the_old_passphrase() {
    let (_dir, path) = vault_path();
    let config = ShardingConfig::new(3, 2).unwrap();
    let vault = manager(&path, "old-pw", Some(config));
    vault.add_entry("site", "u", "p").unwrap();

    let old: Vec<Vec<u8>> = (1..=3)
        .map(|i| fs::read(share_file(&path, i)).unwrap())
        .collect();

    vault.change_passphrase("brand-new-pw").unwrap();

    // Rewind shares 2 and 3, as if the rewrite died after replacing
    // only the first file.  The old generation is the larger group.
    fs::write(share_file(&path, 2), &old[1]).unwrap();
    fs::write(share_file(&path, 3), &old[2]).unwrap();

    assert!(manager(&path, "old-pw", Some(config)).verify());
    assert_eq!(
        manager(&path, "old-pw", Some(config)).list_entries().unwrap(),
        vec!["site"]
    );
    assert!(!manager(&path, "brand-new-pw", Some(config)).verify());
}

#[test]
fn rotation_interrupted_late_opens_under_the_new_passphrase() {
    let (_dir, path) = vault_path();
    let config = ShardingConfig::new(3, 2).unwrap();
    let vault = manager(&path, "old-pw", Some(config));
    vault.add_entry("site", "u", "p").unwrap();

    let old_share = fs::read(share_file(&path, 3)).unwrap();

    vault.change_passphrase("brand-new-pw").unwrap();

    // Rewind only the last share: two new-generation shares against
    // one old, so the new generation wins and meets its threshold.
    fs::write(share_file(&path, 3), &old_share).unwrap();

    assert!(manager(&path, "brand-new-pw", Some(config)).verify());
    assert!(!manager(&path, "old-pw", Some(config)).verify());
}

#[test]
fn sharded_rotation_rewrites_every_share() {
    let (_dir, path) = vault_path();
    let config = ShardingConfig::new(3, 2).unwrap();
    let vault = manager(&path, "old", Some(config));
    vault.add_entry("site", "u", "p").unwrap();

    let before: Vec<Vec<u8>> = (1..=3)
        .map(|i| fs::read(share_file(&path, i)).unwrap())
        .collect();

    vault.change_passphrase("brand-new-pw").unwrap();

    for (i, old) in before.iter().enumerate() {
        let new = fs::read(share_file(&path, (i + 1) as u8)).unwrap();
        assert_ne!(old, &new, "share {} should have been rewritten", i + 1);
    }

    assert!(manager(&path, "brand-new-pw", Some(config)).verify());
    assert!(!manager(&path, "old", Some(config)).verify());
}

#[test]
fn invalid_sharding_config_is_rejected_at_construction() {
    let (_dir, path) = vault_path();
    let bad = ShardingConfig {
        total_shares: 2,
        threshold: 5,
    };

    let result = VaultManager::with_kdf_params(&path, "pw", Some(bad), test_params());
    assert!(matches!(result, Err(SentryVaultError::Config(_))));
}

// ---------------------------------------------------------------------------
// Representation switching
// ---------------------------------------------------------------------------

#[test]
fn switching_to_sharded_removes_the_single_file() {
    let (_dir, path) = vault_path();
    manager(&path, "switch-pw", None)
        .add_entry("example.com", "alice", "p@ss1")
        .unwrap();
    assert!(path.exists());

    // Same path, sharding now configured.  The next write switches.
    let config = ShardingConfig::new(3, 2).unwrap();
    let sharded = manager(&path, "switch-pw", Some(config));

    // Reads still work before the switch (single file is on disk).
    assert_eq!(sharded.list_entries().unwrap(), vec!["example.com"]);

    sharded.add_entry("other.org", "bob", "hunter2").unwrap();

    assert!(!path.exists(), "single file must be gone after the switch");
    for i in 1..=3 {
        assert!(share_file(&path, i).exists());
    }
    assert_eq!(
        sharded.list_entries().unwrap(),
        vec!["example.com", "other.org"]
    );
}

#[test]
fn switching_back_to_single_removes_the_share_files() {
    let (_dir, path) = vault_path();
    let config = ShardingConfig::new(3, 2).unwrap();
    manager(&path, "back-pw", Some(config))
        .add_entry("example.com", "alice", "p@ss1")
        .unwrap();

    let single = manager(&path, "back-pw", None);
    single.add_entry("other.org", "bob", "hunter2").unwrap();

    assert!(path.exists());
    for i in 1..=3 {
        assert!(
            !share_file(&path, i).exists(),
            "share {i} must be gone after switching back"
        );
    }
    assert_eq!(
        single.list_entries().unwrap(),
        vec!["example.com", "other.org"]
    );
}

#[test]
fn shrinking_the_share_count_removes_stale_high_indices() {
    let (_dir, path) = vault_path();
    manager(&path, "shrink-pw", Some(ShardingConfig::new(5, 3).unwrap()))
        .add_entry("site", "u", "p")
        .unwrap();

    let smaller = manager(&path, "shrink-pw", Some(ShardingConfig::new(3, 2).unwrap()));
    smaller.add_entry("site2", "u2", "p2").unwrap();

    for i in 1..=3 {
        assert!(share_file(&path, i).exists());
    }
    assert!(!share_file(&path, 4).exists());
    assert!(!share_file(&path, 5).exists());

    assert_eq!(smaller.list_entries().unwrap().len(), 2);
}

// ---------------------------------------------------------------------------
// Standalone file encryption
// ---------------------------------------------------------------------------

#[test]
fn encrypt_decrypt_file_roundtrip() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("notes.txt");
    let sealed = dir.path().join("notes.txt.enc");
    let restored = dir.path().join("notes.restored.txt");

    fs::write(&input, b"do not read this").unwrap();

    fileenc::encrypt_file("file-pw", &input, &sealed, &test_params()).unwrap();
    assert_ne!(fs::read(&sealed).unwrap(), b"do not read this".to_vec());

    fileenc::decrypt_file("file-pw", &sealed, &restored, &test_params()).unwrap();
    assert_eq!(fs::read(&restored).unwrap(), b"do not read this");
}

#[test]
fn decrypt_file_with_wrong_passphrase_fails() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("a.txt");
    let sealed = dir.path().join("a.enc");
    let out = dir.path().join("a.out");

    fs::write(&input, b"payload").unwrap();
    fileenc::encrypt_file("right", &input, &sealed, &test_params()).unwrap();

    let result = fileenc::decrypt_file("wrong", &sealed, &out, &test_params());
    assert!(matches!(result, Err(SentryVaultError::Authentication)));
    assert!(!out.exists(), "no plaintext may be written on failure");
}
