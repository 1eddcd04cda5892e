use clap::Parser;
use sentryvault::cli::{Cli, Commands};

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Add {
            ref site,
            ref username,
            ref password,
        } => sentryvault::cli::commands::add::execute(&cli, site, username, password.as_deref()),
        Commands::Get { ref site } => sentryvault::cli::commands::get::execute(&cli, site),
        Commands::List => sentryvault::cli::commands::list::execute(&cli),
        Commands::Delete { ref site, force } => {
            sentryvault::cli::commands::delete::execute(&cli, site, force)
        }
        Commands::Rotate => sentryvault::cli::commands::rotate::execute(&cli),
        Commands::Verify => sentryvault::cli::commands::verify::execute(&cli),
        Commands::Encrypt {
            ref input,
            ref output,
        } => sentryvault::cli::commands::encrypt::execute(&cli, input, output),
        Commands::Decrypt {
            ref input,
            ref output,
        } => sentryvault::cli::commands::decrypt::execute(&cli, input, output),
    };

    if let Err(e) = result {
        sentryvault::cli::output::error(&e.to_string());
        std::process::exit(1);
    }
}
