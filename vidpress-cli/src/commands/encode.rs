//! Implementation of the `encode` subcommand.

use crate::cli::EncodeArgs;
use crate::error::CliResult;
use crate::output::{print_info, print_section};

use std::fs;
use std::time::Instant;

use log::info;

use vidpress_core::{
    default_output_path, encode_file, format_bytes, format_duration, EncodeOutcome, SidecarBackend,
};

pub fn run_encode(args: EncodeArgs) -> CliResult<i32> {
    let opts = args.flags.to_options();
    let backend = SidecarBackend::new();

    let output = args
        .output
        .clone()
        .unwrap_or_else(|| default_output_path(&args.input));

    if opts.print_command {
        encode_file(&backend, &opts, &args.input, Some(&output))?;
        return Ok(0);
    }

    print_info("Input", args.input.display());
    print_info("Output", output.display());
    info!(
        "Encode run started: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );

    let input_size = fs::metadata(&args.input)?.len();
    let start = Instant::now();
    let outcome = encode_file(&backend, &opts, &args.input, Some(&output))?;
    let elapsed = start.elapsed();

    if matches!(outcome, EncodeOutcome::Encoded) {
        let output_size = fs::metadata(&output)?.len();
        let reduction = if input_size > 0 {
            100u64.saturating_sub(output_size.saturating_mul(100) / input_size)
        } else {
            0
        };

        print_section("Encode Summary");
        print_info("Encode time", format_duration(elapsed));
        print_info("Input size", format_bytes(input_size));
        print_info("Output size", format_bytes(output_size));
        print_info("Reduced by", format!("{reduction}%"));
    }

    info!(
        "Encode run finished: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    Ok(0)
}
