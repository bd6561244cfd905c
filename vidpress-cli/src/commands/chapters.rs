//! Implementation of the `chapters` subcommand.

use crate::cli::ChaptersArgs;
use crate::error::CliResult;

use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;

use vidpress_core::{build_chapters, SidecarBackend};

/// Reads clip paths (one per line), probes each clip's duration and prints
/// the concatenation's ffmetadata chapter list to stdout.
pub fn run_chapters(args: ChaptersArgs) -> CliResult<i32> {
    let raw = match &args.list {
        Some(path) => fs::read_to_string(path)?,
        None => {
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf)?;
            buf
        }
    };

    let clips: Vec<PathBuf> = raw
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(PathBuf::from)
        .collect();

    let backend = SidecarBackend::new();
    let list = build_chapters(&backend, &clips)?;
    print!("{}", list.render());
    Ok(0)
}
