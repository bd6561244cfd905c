//! Batch directory walking: mirror a source tree into a destination tree,
//! validating, copying, or encoding each file.
//!
//! The walk is best-effort and strictly sequential. Structural problems
//! (missing source, destination conflicts) abort before any file is
//! touched; per-file failures are recorded in the outcome list and never
//! stop the walk. The caller decides whether partial failure is
//! acceptable.

use crate::config::BatchOptions;
use crate::error::{CoreError, CoreResult};
use crate::external::MediaBackend;
use crate::processing::encode::encode_file;
use crate::processing::validate::validate_streams;

use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Terminal state of one batch task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskOutcome {
    /// Invalid file copied verbatim (`copy_invalid` set).
    Copied,
    Encoded,
    /// Invalid file left out of the destination tree.
    Skipped,
    Failed(String),
}

/// One source file and what became of it.
#[derive(Debug, Clone)]
pub struct BatchTask {
    pub source: PathBuf,
    pub dest: PathBuf,
    pub outcome: TaskOutcome,
}

/// Walks the source tree and processes every regular file, preserving
/// relative paths. Returns one outcome per file, in walk order.
pub fn run_batch(backend: &dyn MediaBackend, opts: &BatchOptions) -> CoreResult<Vec<BatchTask>> {
    let source = opts.source.canonicalize().map_err(|e| {
        CoreError::InvalidInput(format!(
            "source directory '{}': {e}",
            opts.source.display()
        ))
    })?;
    if !source.is_dir() {
        return Err(CoreError::InvalidInput(format!(
            "source '{}' is not a directory",
            source.display()
        )));
    }
    if opts.dest.exists() && !opts.dest.is_dir() {
        return Err(CoreError::InvalidInput(format!(
            "destination '{}' exists and is not a directory",
            opts.dest.display()
        )));
    }
    fs::create_dir_all(&opts.dest)?;
    let dest = opts.dest.canonicalize().map_err(|e| {
        CoreError::InvalidInput(format!(
            "destination directory '{}': {e}",
            opts.dest.display()
        ))
    })?;
    if source == dest {
        return Err(CoreError::InvalidInput(format!(
            "source and destination are the same directory: {}",
            source.display()
        )));
    }
    // A destination under the source would feed the walk its own outputs.
    if dest.starts_with(&source) {
        return Err(CoreError::InvalidInput(format!(
            "destination '{}' is inside the source tree '{}'",
            dest.display(),
            source.display()
        )));
    }

    let mut tasks = Vec::new();
    for entry in WalkDir::new(&source).sort_by_file_name() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                log::warn!("Skipping unreadable entry under {}: {e}", source.display());
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }

        let rel = entry.path().strip_prefix(&source).map_err(|_| {
            CoreError::PathError(format!(
                "entry '{}' escapes source root",
                entry.path().display()
            ))
        })?;
        let dest_path = dest.join(rel);

        log::info!("Processing {}", rel.display());
        let outcome = process_file(backend, opts, entry.path(), &dest_path);
        match &outcome {
            TaskOutcome::Failed(reason) => {
                log::warn!("Failed {}: {reason}", rel.display());
                eprintln!("vidpress: {}: {reason}", entry.path().display());
            }
            other => log::info!("Finished {}: {other:?}", rel.display()),
        }

        tasks.push(BatchTask {
            source: entry.path().to_path_buf(),
            dest: dest_path,
            outcome,
        });
    }

    Ok(tasks)
}

fn process_file(
    backend: &dyn MediaBackend,
    opts: &BatchOptions,
    source: &Path,
    dest: &Path,
) -> TaskOutcome {
    if !validate_streams(backend, source) {
        if !opts.copy_invalid {
            return TaskOutcome::Skipped;
        }
        return match copy_verbatim(source, dest) {
            Ok(()) => TaskOutcome::Copied,
            Err(e) => TaskOutcome::Failed(e.to_string()),
        };
    }

    match encode_file(backend, &opts.encode, source, Some(dest)) {
        Ok(_) => TaskOutcome::Encoded,
        Err(e) => TaskOutcome::Failed(e.to_string()),
    }
}

fn copy_verbatim(source: &Path, dest: &Path) -> CoreResult<()> {
    if let Some(parent) = dest.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::copy(source, dest)?;
    Ok(())
}
