//! `sentryvault verify` — check whether a passphrase opens the vault.

use crate::cli::{open_manager, output, Cli};
use crate::errors::Result;

/// Execute the `verify` command.
///
/// Exits nonzero when the vault cannot be opened, so scripts can
/// branch on the result.
pub fn execute(cli: &Cli) -> Result<()> {
    let manager = open_manager(cli)?;

    if manager.verify() {
        output::success("Passphrase is correct.");
        Ok(())
    } else {
        output::error("Vault could not be opened with this passphrase.");
        std::process::exit(1);
    }
}
