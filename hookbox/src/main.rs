mod cli;
mod commands;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Commands};

fn main() -> Result<()> {
    hookbox_core::config::load_dotenv();
    hookbox_core::observability::init_tracing();
    let cli = Cli::parse();

    let code = match cli.command {
        Commands::Lint(args) => commands::lint::cmd_lint(args)?,
        Commands::Schema => {
            commands::schema::cmd_schema()?;
            commands::lint::EXIT_OK
        }
    };
    std::process::exit(code)
}
