//! `sentryvault list` — display all sites in a table.

use crate::cli::{open_manager, output, Cli};
use crate::errors::Result;

/// Execute the `list` command.
pub fn execute(cli: &Cli) -> Result<()> {
    let manager = open_manager(cli)?;
    let sites = manager.list_entries()?;

    output::info(&format!("{} entries in the vault", sites.len()));
    output::print_sites_table(&sites);

    Ok(())
}
