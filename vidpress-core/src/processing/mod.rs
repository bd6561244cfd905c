//! Pipeline stages: validation, geometry, crop detection, encoding,
//! batch walking, and chapter building.

pub mod batch;
pub mod chapters;
pub mod crop;
pub mod encode;
pub mod scale;
pub mod validate;

pub use batch::{run_batch, BatchTask, TaskOutcome};
pub use chapters::{build_chapters, Chapter, ChapterList};
pub use crop::{detect_crop, CropBox};
pub use encode::{default_output_path, encode_file, plan_encode, EncodeOutcome, EncodePlan};
pub use scale::{compute_scale, ScaleBox};
pub use validate::validate_streams;
