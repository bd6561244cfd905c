//! Scratch file management for encode passes.
//!
//! First-pass stats files and in-flight outputs are held by guard types so
//! they are removed on both success and failure paths. An interrupted encode
//! therefore never leaves a half-written file at the destination path.

use crate::error::CoreResult;
use std::fs;
use std::path::{Path, PathBuf};

/// Returns a scratch file path with a random suffix. Does not create the file.
pub fn scratch_path(dir: &Path, prefix: &str, extension: &str) -> PathBuf {
    use rand::distributions::Alphanumeric;
    use rand::{thread_rng, Rng};

    let random_suffix: String = thread_rng()
        .sample_iter(&Alphanumeric)
        .take(6)
        .map(char::from)
        .collect();

    let filename = format!("{prefix}_{random_suffix}.{extension}");
    dir.join(filename)
}

/// Removes a two-pass stats file and its x264 side files on drop.
#[derive(Debug)]
pub struct PassLogGuard {
    base: PathBuf,
}

impl PassLogGuard {
    pub fn new(base: PathBuf) -> Self {
        Self { base }
    }

    pub fn path(&self) -> &Path {
        &self.base
    }
}

impl Drop for PassLogGuard {
    fn drop(&mut self) {
        // x264 writes "<base>-0.log" and "<base>-0.log.mbtree" next to the base.
        let side = self.base.with_file_name(format!(
            "{}-0.log",
            self.base.file_name().unwrap_or_default().to_string_lossy()
        ));
        let mbtree = side.with_extension("log.mbtree");
        for path in [&self.base, &side, &mbtree] {
            let _ = fs::remove_file(path);
        }
    }
}

/// An output file written to a temporary sibling path and atomically renamed
/// into place on [`commit`](PendingOutput::commit). Dropped uncommitted, the
/// temporary file is removed.
#[derive(Debug)]
pub struct PendingOutput {
    final_path: PathBuf,
    temp_path: PathBuf,
    committed: bool,
}

impl PendingOutput {
    pub fn new(final_path: &Path) -> CoreResult<Self> {
        let dir = final_path.parent().unwrap_or_else(|| Path::new("."));
        fs::create_dir_all(dir)?;
        let ext = final_path
            .extension()
            .map(|e| e.to_string_lossy().into_owned())
            .unwrap_or_else(|| "tmp".to_string());
        Ok(Self {
            final_path: final_path.to_path_buf(),
            temp_path: scratch_path(dir, ".vidpress_part", &ext),
            committed: false,
        })
    }

    pub fn temp_path(&self) -> &Path {
        &self.temp_path
    }

    /// Renames the temporary file over the final path.
    pub fn commit(mut self) -> CoreResult<()> {
        fs::rename(&self.temp_path, &self.final_path)?;
        self.committed = true;
        Ok(())
    }
}

impl Drop for PendingOutput {
    fn drop(&mut self) {
        if !self.committed {
            let _ = fs::remove_file(&self.temp_path);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use tempfile::tempdir;

    #[test]
    fn test_scratch_path_is_unique() {
        let dir = tempdir().unwrap();
        let a = scratch_path(dir.path(), "pass", "log");
        let b = scratch_path(dir.path(), "pass", "log");
        assert_ne!(a, b);
        assert_eq!(a.extension().unwrap(), "log");
    }

    #[test]
    fn test_passlog_guard_removes_side_files() {
        let dir = tempdir().unwrap();
        let base = dir.path().join("stats.log");
        let side = dir.path().join("stats.log-0.log");
        let mbtree = dir.path().join("stats.log-0.log.mbtree");
        for p in [&base, &side, &mbtree] {
            File::create(p).unwrap();
        }
        drop(PassLogGuard::new(base.clone()));
        assert!(!base.exists());
        assert!(!side.exists());
        assert!(!mbtree.exists());
    }

    #[test]
    fn test_pending_output_commit_renames() {
        let dir = tempdir().unwrap();
        let final_path = dir.path().join("out.mp4");
        let pending = PendingOutput::new(&final_path).unwrap();
        fs::write(pending.temp_path(), b"data").unwrap();
        pending.commit().unwrap();
        assert_eq!(fs::read(&final_path).unwrap(), b"data");
    }

    #[test]
    fn test_pending_output_drop_cleans_up() {
        let dir = tempdir().unwrap();
        let final_path = dir.path().join("out.mp4");
        let temp;
        {
            let pending = PendingOutput::new(&final_path).unwrap();
            fs::write(pending.temp_path(), b"partial").unwrap();
            temp = pending.temp_path().to_path_buf();
        }
        assert!(!temp.exists());
        assert!(!final_path.exists());
    }
}
