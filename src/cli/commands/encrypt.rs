//! `sentryvault encrypt` — encrypt an arbitrary file.

use std::path::Path;

use crate::cli::{output, prompt_passphrase, vault_context, Cli};
use crate::errors::Result;
use crate::fileenc;

/// Execute the `encrypt` command.
pub fn execute(cli: &Cli, input: &str, output_path: &str) -> Result<()> {
    let ctx = vault_context(cli)?;
    let passphrase = prompt_passphrase(cli)?;

    fileenc::encrypt_file(
        &passphrase,
        Path::new(input),
        Path::new(output_path),
        &ctx.kdf_params,
    )?;

    output::success(&format!("Encrypted {input} to {output_path}"));
    Ok(())
}
