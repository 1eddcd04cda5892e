//! `sentryvault add` — add or update a site's credentials.

use zeroize::Zeroizing;

use crate::cli::{open_manager, output, Cli};
use crate::errors::{Result, SentryVaultError};

/// Execute the `add` command.
pub fn execute(cli: &Cli, site: &str, username: &str, password: Option<&str>) -> Result<()> {
    let manager = open_manager(cli)?;

    // Take the password from the argument, or prompt without echo.
    let password = match password {
        Some(p) => Zeroizing::new(p.to_string()),
        None => Zeroizing::new(
            dialoguer::Password::new()
                .with_prompt(format!("Password for {site}"))
                .interact()
                .map_err(|e| SentryVaultError::CommandFailed(format!("password prompt: {e}")))?,
        ),
    };

    manager.add_entry(site, username, &password)?;

    output::success(&format!("Stored entry for '{site}'"));
    Ok(())
}
