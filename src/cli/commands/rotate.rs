//! `sentryvault rotate` — change the vault passphrase.
//!
//! Decrypts the vault with the current passphrase, generates a new
//! salt, re-encrypts under the new passphrase, and re-splits the
//! shares when sharding is configured.

use crate::cli::{open_manager, output, prompt_new_passphrase, Cli};
use crate::errors::Result;

/// Execute the `rotate` command.
pub fn execute(cli: &Cli) -> Result<()> {
    output::info("Enter your current vault passphrase.");
    let manager = open_manager(cli)?;

    output::info("Choose your new vault passphrase.");
    let new_passphrase = prompt_new_passphrase()?;

    // Consumes the old manager; the one we get back is bound to the
    // new passphrase and has already persisted the re-encrypted vault.
    let manager = manager.change_passphrase(&new_passphrase)?;

    output::success(&format!(
        "Passphrase rotated for vault at {}",
        manager.path().display()
    ));

    Ok(())
}
