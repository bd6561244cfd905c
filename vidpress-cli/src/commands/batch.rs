//! Implementation of the `batch` subcommand.
//!
//! The trailing arguments after `--` are re-parsed through [`EncodeFlags`],
//! so every `encode` flag works unchanged inside a batch run.

use crate::cli::{BatchArgs, EncodeFlags};
use crate::error::CliResult;
use crate::output::{print_error, print_info, print_section, print_success, print_warning};

use clap::Parser;
use log::info;

use vidpress_core::{run_batch, BatchOptions, CoreError, SidecarBackend, TaskOutcome};

pub fn run_batch_command(args: BatchArgs) -> CliResult<i32> {
    let flags = EncodeFlags::try_parse_from(
        std::iter::once("vidpress".to_string()).chain(args.encode_flags.iter().cloned()),
    )
    .map_err(|e| CoreError::InvalidConfig(format!("bad encode flags after '--': {e}")))?;

    let opts = BatchOptions {
        source: args.source,
        dest: args.dest,
        copy_invalid: args.copy_invalid,
        encode: flags.to_options(),
    };

    print_info("Source", opts.source.display());
    print_info("Destination", opts.dest.display());
    info!(
        "Batch run started: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );

    let backend = SidecarBackend::new();
    let tasks = run_batch(&backend, &opts)?;

    let mut encoded = 0usize;
    let mut copied = 0usize;
    let mut skipped = 0usize;
    let mut failed = 0usize;

    print_section("Batch Summary");
    for task in &tasks {
        match &task.outcome {
            TaskOutcome::Encoded => {
                encoded += 1;
                print_success(&format!("encoded  {}", task.source.display()));
            }
            TaskOutcome::Copied => {
                copied += 1;
                print_info("copied", task.source.display());
            }
            TaskOutcome::Skipped => {
                skipped += 1;
                print_warning(&format!("skipped  {}", task.source.display()));
            }
            TaskOutcome::Failed(reason) => {
                failed += 1;
                print_error(&format!("failed   {}: {reason}", task.source.display()));
            }
        }
    }

    print_info(
        "Totals",
        format!("{encoded} encoded, {copied} copied, {skipped} skipped, {failed} failed"),
    );
    info!(
        "Batch run finished: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );

    // Best-effort contract: a completed walk exits 0 even with per-file
    // failures; the counts above tell the story.
    Ok(0)
}
