pub mod build;
pub mod completions;
pub mod init;
pub mod inspect;

use clap::{Parser, Subcommand};

use crate::output::{Printer, Verbosity};

/// tilesmith - Tileset slicer and sprite atlas packer
#[derive(Parser, Debug)]
#[command(name = "tilesmith")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Only print warnings and errors
    #[arg(long, short, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Print every extracted and packed sprite
    #[arg(long, short, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    pub fn printer(&self) -> Printer {
        let verbosity = if self.quiet {
            Verbosity::Quiet
        } else if self.verbose {
            Verbosity::Verbose
        } else {
            Verbosity::Normal
        };
        Printer::with_verbosity(verbosity)
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Slice tilesets and pack sprite atlases
    Build(build::BuildArgs),

    /// Initialize a tilesmith project (generates tilesmith.yaml)
    Init(init::InitArgs),

    /// Show how one sheet slices and classifies
    Inspect(inspect::InspectArgs),

    /// Generate shell completions
    Completions(completions::CompletionsArgs),
}
