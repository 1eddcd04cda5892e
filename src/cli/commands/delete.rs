//! `sentryvault delete` — remove a site's credentials from the vault.

use dialoguer::Confirm;

use crate::cli::{open_manager, output, Cli};
use crate::errors::{Result, SentryVaultError};

/// Execute the `delete` command.
pub fn execute(cli: &Cli, site: &str, force: bool) -> Result<()> {
    // Unless --force is set, ask for confirmation before deleting.
    if !force {
        let confirmed = Confirm::new()
            .with_prompt(format!("Delete entry for '{site}'?"))
            .default(false)
            .interact()
            .map_err(|e| SentryVaultError::CommandFailed(format!("confirm prompt: {e}")))?;

        if !confirmed {
            output::info("Cancelled.");
            return Ok(());
        }
    }

    let manager = open_manager(cli)?;

    if manager.delete_entry(site)? {
        output::success(&format!("Deleted entry for '{site}'"));
    } else {
        output::warning(&format!("No entry for '{site}'"));
    }

    Ok(())
}
