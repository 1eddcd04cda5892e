//! `sentryvault get` — retrieve and print a site's credentials.

use crate::cli::{open_manager, output, Cli};
use crate::errors::Result;

/// Execute the `get` command.
pub fn execute(cli: &Cli, site: &str) -> Result<()> {
    let manager = open_manager(cli)?;

    match manager.get_entry(site)? {
        Some(entry) => {
            println!("username: {}", entry.username);
            println!("password: {}", entry.password);
        }
        None => {
            output::warning(&format!("No entry for '{site}'"));
        }
    }

    Ok(())
}
