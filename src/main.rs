//! Apiskel CLI entry point.

use apiskel::cli::{self, Cli, Commands, EXIT_ERROR};
use clap::Parser;

fn main() {
    let cli = Cli::parse();
    cli::init_logging(cli.verbose);

    let result = match &cli.command {
        Commands::Report(args) => cli::run_report(args),
        Commands::Symbols(args) => cli::run_symbols(args),
        Commands::Init(args) => cli::run_init(args),
    };

    let exit_code = match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {}", e);
            EXIT_ERROR
        }
    };

    std::process::exit(exit_code);
}
