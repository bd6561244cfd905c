//! Implementation of the `scale` subcommand.

use crate::cli::ScaleArgs;
use crate::error::CliResult;

use vidpress_core::{compute_scale, MediaBackend, SidecarBackend};

/// Probes a file and prints the `W:H:X:Y` geometry an encode with the same
/// flags would use, without touching the file.
pub fn run_scale(args: ScaleArgs) -> CliResult<i32> {
    let backend = SidecarBackend::new();
    let mut props = backend.probe_video(&args.file)?;
    if args.force_original_ar {
        props.display_aspect = None;
    }

    let sbox = compute_scale(&props, args.max_width, args.max_height, args.modulus)?;
    log::debug!(
        "{}: source {}x{}, filter {}",
        args.file.display(),
        props.width,
        props.height,
        sbox.filter()
    );

    println!("{sbox}");
    Ok(0)
}
