//! cirw: rewrite and migrate quantum circuits against a fixed rule corpus.

mod commands;
mod logging;
mod options;
mod stats;

use clap::{Parser, Subcommand};
use console::style;

/// cirw - non-local circuit rewriting and system migration.
#[derive(Parser)]
#[command(name = "cirw")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Increase verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Rewrite a single circuit file
    Run(commands::run::RunArgs),

    /// Rewrite every circuit file in a directory
    Batch(commands::batch::BatchArgs),

    /// Migrate a rule family's JSON file between systems, offline
    ConvertRules(commands::convert::ConvertArgs),
}

fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let result = match cli.command {
        Commands::Run(args) => commands::run::execute(args),
        Commands::Batch(args) => commands::batch::execute(args),
        Commands::ConvertRules(args) => commands::convert::execute(args),
    };

    if let Err(err) = result {
        eprintln!("{} {err:#}", style("error:").red().bold());
        std::process::exit(1);
    }
}
