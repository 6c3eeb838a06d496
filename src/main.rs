use clap::Parser;
use miette::Result;
use tilesmith::cli::{Cli, Commands};

fn main() -> Result<()> {
    let cli = Cli::parse();
    let printer = cli.printer();

    match cli.command {
        Commands::Build(args) => tilesmith::cli::build::run(args, &printer)?,
        Commands::Init(args) => tilesmith::cli::init::run(args, &printer)?,
        Commands::Inspect(args) => tilesmith::cli::inspect::run(args, &printer)?,
        Commands::Completions(args) => tilesmith::cli::completions::run(args)?,
    }

    Ok(())
}
