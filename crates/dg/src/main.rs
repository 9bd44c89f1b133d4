//! `dg`: documentation generator driver.
//!
//! - `dg generate` loads `docgen.toml` and the JSON entity model, then runs
//!   one generation pass per configured output format.
//! - `dg fields [kind]` lists the properties each template adapter exposes.

mod commands;
mod dump;
mod error;
mod output;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{FieldsArgs, GenerateArgs};
use error::CliError;
use output::Output;

#[derive(Parser)]
#[command(name = "dg", version, about = "Documentation generator")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate documentation for every configured output format.
    Generate(GenerateArgs),
    /// List template adapter properties.
    Fields(FieldsArgs),
}

impl Commands {
    fn verbose(&self) -> bool {
        matches!(self, Self::Generate(args) if args.verbose)
    }

    fn execute(self) -> Result<(), CliError> {
        match self {
            Self::Generate(args) => args.execute(),
            Self::Fields(args) => args.execute(),
        }
    }
}

/// Log to stderr: `info` with `--verbose`, otherwise whatever `RUST_LOG` says.
fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.command.verbose());

    if let Err(err) = cli.command.execute() {
        Output::new().error(err);
        std::process::exit(1);
    }
}
