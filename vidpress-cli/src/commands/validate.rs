//! Implementation of the `validate` subcommand.

use crate::cli::ValidateArgs;
use crate::error::CliResult;

use vidpress_core::{validate_streams, SidecarBackend};

/// Echoes the path and exits 0 when the file carries both a video and an
/// audio stream; exits 1 silently otherwise. Probe failures count as
/// invalid, so the exit code is script-safe.
pub fn run_validate(args: ValidateArgs) -> CliResult<i32> {
    let backend = SidecarBackend::new();
    if validate_streams(&backend, &args.file) {
        println!("{}", args.file.display());
        Ok(0)
    } else {
        log::debug!("{}: missing video or audio stream", args.file.display());
        Ok(1)
    }
}
