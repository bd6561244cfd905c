// vidpress-core/tests/batch_walk_tests.rs

use vidpress_core::external::mocks::MockBackend;
use vidpress_core::{run_batch, BatchOptions, CoreError, EncodeOptions, TaskOutcome};

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::tempdir;

// Helper to create a dummy file with some content
fn create_dummy_file(dir: &Path, filename: &str) -> PathBuf {
    let file_path = dir.join(filename);
    if let Some(parent) = file_path.parent() {
        fs::create_dir_all(parent).expect("Failed to create parent dirs");
    }
    let mut file = File::create(&file_path).expect("Failed to create dummy file");
    file.write_all(b"dummy content")
        .expect("Failed to write dummy content");
    file_path
}

fn batch_opts(source: &Path, dest: &Path, copy_invalid: bool) -> BatchOptions {
    BatchOptions {
        source: source.to_path_buf(),
        dest: dest.to_path_buf(),
        copy_invalid,
        encode: EncodeOptions::default(),
    }
}

#[test]
fn test_batch_mirrors_tree_preserving_relative_paths() {
    let src_dir = tempdir().unwrap();
    let dst_dir = tempdir().unwrap();
    let src = src_dir.path().canonicalize().unwrap();

    create_dummy_file(&src, "a.mkv");
    create_dummy_file(&src, "season1/b.mkv");
    create_dummy_file(&src, "season1/extras/c.mkv");

    let backend = MockBackend::new();
    let tasks = run_batch(&backend, &batch_opts(&src, dst_dir.path(), false)).unwrap();

    assert_eq!(tasks.len(), 3);
    assert!(tasks
        .iter()
        .all(|t| t.outcome == TaskOutcome::Encoded));

    let dst = dst_dir.path().canonicalize().unwrap();
    assert!(dst.join("a.mkv").is_file());
    assert!(dst.join("season1/b.mkv").is_file());
    assert!(dst.join("season1/extras/c.mkv").is_file());
}

#[test]
fn test_batch_walks_in_sorted_order_with_one_outcome_per_file() {
    let src_dir = tempdir().unwrap();
    let dst_dir = tempdir().unwrap();
    let src = src_dir.path().canonicalize().unwrap();

    create_dummy_file(&src, "zz.mkv");
    create_dummy_file(&src, "aa.mkv");
    create_dummy_file(&src, "mm.mkv");

    let backend = MockBackend::new();
    let tasks = run_batch(&backend, &batch_opts(&src, dst_dir.path(), false)).unwrap();

    let names: Vec<_> = tasks
        .iter()
        .map(|t| t.source.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, vec!["aa.mkv", "mm.mkv", "zz.mkv"]);
}

#[test]
fn test_batch_skips_invalid_files_by_default() {
    let src_dir = tempdir().unwrap();
    let dst_dir = tempdir().unwrap();
    let src = src_dir.path().canonicalize().unwrap();

    create_dummy_file(&src, "movie.mkv");
    let cover = create_dummy_file(&src, "cover.jpg");

    let backend = MockBackend::new().with_probe_error(&cover);
    let tasks = run_batch(&backend, &batch_opts(&src, dst_dir.path(), false)).unwrap();

    assert_eq!(tasks.len(), 2);
    let cover_task = tasks.iter().find(|t| t.source == cover).unwrap();
    assert_eq!(cover_task.outcome, TaskOutcome::Skipped);
    assert!(!cover_task.dest.exists());

    let movie_task = tasks.iter().find(|t| t.source != cover).unwrap();
    assert_eq!(movie_task.outcome, TaskOutcome::Encoded);
}

#[test]
fn test_batch_copies_invalid_files_verbatim_when_asked() {
    let src_dir = tempdir().unwrap();
    let dst_dir = tempdir().unwrap();
    let src = src_dir.path().canonicalize().unwrap();

    create_dummy_file(&src, "movie.mkv");
    let silent = create_dummy_file(&src, "silent.mkv");

    let backend = MockBackend::new().with_audio_less(&silent);
    let tasks = run_batch(&backend, &batch_opts(&src, dst_dir.path(), true)).unwrap();

    let silent_task = tasks.iter().find(|t| t.source == silent).unwrap();
    assert_eq!(silent_task.outcome, TaskOutcome::Copied);
    // Verbatim copy, not a transcode
    assert_eq!(fs::read(&silent_task.dest).unwrap(), b"dummy content");

    let movie_task = tasks.iter().find(|t| t.source != silent).unwrap();
    assert_eq!(movie_task.outcome, TaskOutcome::Encoded);
    assert_eq!(fs::read(&movie_task.dest).unwrap(), b"mock-output");
}

#[test]
fn test_batch_continues_past_per_file_failures() {
    let src_dir = tempdir().unwrap();
    let dst_dir = tempdir().unwrap();
    let src = src_dir.path().canonicalize().unwrap();

    let bad = create_dummy_file(&src, "bad.mkv");
    create_dummy_file(&src, "good.mkv");

    let backend = MockBackend::new().with_failing(&bad);
    let tasks = run_batch(&backend, &batch_opts(&src, dst_dir.path(), false)).unwrap();

    assert_eq!(tasks.len(), 2);
    let bad_task = tasks.iter().find(|t| t.source == bad).unwrap();
    assert!(matches!(bad_task.outcome, TaskOutcome::Failed(_)));
    // The failed encode must not leave a partial destination file behind.
    assert!(!bad_task.dest.exists());

    let good_task = tasks.iter().find(|t| t.source != bad).unwrap();
    assert_eq!(good_task.outcome, TaskOutcome::Encoded);
    assert!(good_task.dest.is_file());
}

#[test]
fn test_batch_rejects_missing_source() {
    let dst_dir = tempdir().unwrap();
    let backend = MockBackend::new();
    let result = run_batch(
        &backend,
        &batch_opts(Path::new("/definitely/not/here"), dst_dir.path(), false),
    );
    assert!(matches!(result, Err(CoreError::InvalidInput(_))));
}

#[test]
fn test_batch_rejects_file_as_source() {
    let src_dir = tempdir().unwrap();
    let dst_dir = tempdir().unwrap();
    let file = create_dummy_file(src_dir.path(), "not_a_dir.mkv");

    let backend = MockBackend::new();
    let result = run_batch(&backend, &batch_opts(&file, dst_dir.path(), false));
    assert!(matches!(result, Err(CoreError::InvalidInput(_))));
}

#[test]
fn test_batch_rejects_file_as_destination() {
    let src_dir = tempdir().unwrap();
    let dst_dir = tempdir().unwrap();
    create_dummy_file(src_dir.path(), "movie.mkv");
    let dest_file = create_dummy_file(dst_dir.path(), "occupied");

    let backend = MockBackend::new();
    let result = run_batch(&backend, &batch_opts(src_dir.path(), &dest_file, false));
    assert!(matches!(result, Err(CoreError::InvalidInput(_))));
}

#[test]
fn test_batch_rejects_destination_inside_source() {
    let src_dir = tempdir().unwrap();
    let src = src_dir.path().canonicalize().unwrap();
    create_dummy_file(&src, "movie.mkv");
    let nested_dest = src.join("out");

    let backend = MockBackend::new();
    let result = run_batch(&backend, &batch_opts(&src, &nested_dest, false));
    // The walk would otherwise descend into its own outputs.
    assert!(matches!(result, Err(CoreError::InvalidInput(_))));
    assert!(backend.calls().is_empty());
    assert!(!nested_dest.join("movie.mkv").exists());
}

#[test]
fn test_batch_rejects_source_equal_to_destination() {
    let dir = tempdir().unwrap();
    create_dummy_file(dir.path(), "movie.mkv");

    let backend = MockBackend::new();
    let result = run_batch(&backend, &batch_opts(dir.path(), dir.path(), false));
    assert!(matches!(result, Err(CoreError::InvalidInput(_))));
}

#[test]
fn test_batch_creates_destination_directory() {
    let src_dir = tempdir().unwrap();
    let dst_root = tempdir().unwrap();
    let src = src_dir.path().canonicalize().unwrap();
    let dest = dst_root.path().join("deep/mirror");

    create_dummy_file(&src, "movie.mkv");

    let backend = MockBackend::new();
    let tasks = run_batch(&backend, &batch_opts(&src, &dest, false)).unwrap();

    assert_eq!(tasks.len(), 1);
    assert!(dest.is_dir());
    assert_eq!(tasks[0].outcome, TaskOutcome::Encoded);
}

#[test]
fn test_batch_empty_source_yields_no_tasks() {
    let src_dir = tempdir().unwrap();
    let dst_dir = tempdir().unwrap();

    let backend = MockBackend::new();
    let tasks = run_batch(
        &backend,
        &batch_opts(src_dir.path(), dst_dir.path(), false),
    )
    .unwrap();
    assert!(tasks.is_empty());
    assert!(backend.calls().is_empty());
}
