//! Core library for the vidpress video transcoding toolchain.
//!
//! This crate probes media files, computes scale/pad geometry, detects
//! letterbox crops, assembles ordered filter chains, and drives single- and
//! two-pass x264 encodes through an injected media backend. A batch walker
//! mirrors whole directory trees with per-file failure isolation, and a
//! chapter builder emits concatenation metadata.
//!
//! ## Usage Example
//!
//! ```rust,no_run
//! use vidpress_core::{encode_file, EncodeOptions, SidecarBackend};
//! use std::path::Path;
//!
//! let backend = SidecarBackend::new();
//! let mut opts = EncodeOptions::default();
//! opts.max_width = Some(1280);
//! opts.crop = true;
//!
//! encode_file(&backend, &opts, Path::new("movie.mkv"), None).unwrap();
//! ```

pub mod config;
pub mod error;
pub mod external;
pub mod processing;
pub mod temp_files;
pub mod utils;

// Re-exports for public API
pub use config::{BatchOptions, Denoise, DenoisePreset, EncodeOptions};
pub use error::{CoreError, CoreResult};
pub use external::{MediaBackend, SidecarBackend, StreamSummary, VideoProperties};
pub use processing::{
    build_chapters, compute_scale, default_output_path, encode_file, plan_encode, run_batch,
    validate_streams, BatchTask, Chapter, ChapterList, CropBox, EncodeOutcome, EncodePlan,
    ScaleBox, TaskOutcome,
};
pub use utils::{format_bytes, format_duration};
