// vidpress-cli/src/main.rs
//
// Binary entry point: parses arguments, initializes logging and dispatches
// to the command implementations.

use clap::Parser;
use std::process;

use vidpress_cli::cli::{Cli, Commands};
use vidpress_cli::commands;
use vidpress_cli::output::print_error;

fn main() {
    // RUST_LOG overrides; default keeps per-file progress visible.
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_secs()
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Encode(args) => commands::encode::run_encode(args),
        Commands::Batch(args) => commands::batch::run_batch_command(args),
        Commands::Validate(args) => commands::validate::run_validate(args),
        Commands::Scale(args) => commands::scale::run_scale(args),
        Commands::Chapters(args) => commands::chapters::run_chapters(args),
    };

    match result {
        Ok(code) => process::exit(code),
        Err(e) => {
            print_error(&format!("Error: {e}"));
            process::exit(1);
        }
    }
}
