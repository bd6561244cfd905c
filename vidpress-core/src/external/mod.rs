//! External media tooling behind an injectable backend.
//!
//! All interaction with ffmpeg/ffprobe goes through the [`MediaBackend`]
//! trait so the pipeline logic stays decoupled from subprocess execution:
//! the production implementation shells out, the mock in [`mocks`] returns
//! canned data and records every invocation.

use crate::error::{CoreError, CoreResult};

use std::io;
use std::path::Path;
use std::process::{Command, Stdio};

pub mod ffmpeg_builder;
pub mod mocks;
pub mod sidecar;

pub use ffmpeg_builder::{FfmpegPass, FilterChain, PassSink};
pub use sidecar::SidecarBackend;

/// Stream presence summary for a probed file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StreamSummary {
    pub has_video: bool,
    pub has_audio: bool,
}

/// Intrinsic video properties of a source file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VideoProperties {
    pub width: u32,
    pub height: u32,
    /// Display aspect ratio from the container, when it carries one.
    pub display_aspect: Option<f64>,
    pub duration_secs: f64,
}

/// Captured diagnostic log of one ffmpeg pass.
#[derive(Debug, Clone, Default)]
pub struct PassLog {
    pub log: String,
}

/// Opaque media probe/encode capability.
///
/// Sources are re-probed per invocation; none of these operations cache
/// per-file state, so repeated calls on an unchanged file agree.
pub trait MediaBackend {
    /// Fails with `DependencyNotFound` when the encoder binary is missing.
    fn verify_available(&self) -> CoreResult<()>;

    /// Reports whether the file has video and audio streams.
    fn probe_streams(&self, input: &Path) -> CoreResult<StreamSummary>;

    /// Container duration in seconds.
    fn probe_duration(&self, input: &Path) -> CoreResult<f64>;

    /// Dimensions, display aspect and duration of the first video stream.
    fn probe_video(&self, input: &Path) -> CoreResult<VideoProperties>;

    /// Runs one ffmpeg invocation and returns its diagnostic log.
    /// A non-zero exit maps to `CommandFailed`.
    fn run_filter_pass(&self, args: &[String]) -> CoreResult<PassLog>;

    /// ffmetadata dump of the container's global tags.
    fn read_global_metadata(&self, input: &Path) -> CoreResult<String>;

    /// Whether the named encoder is compiled into the available ffmpeg.
    fn encoder_available(&self, name: &str) -> CoreResult<bool>;
}

/// Checks that an external command exists and is executable by running it
/// with `-version`.
pub(crate) fn check_dependency(cmd_name: &str) -> CoreResult<()> {
    let result = Command::new(cmd_name)
        .arg("-version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status();

    match result {
        Ok(_) => {
            log::debug!("Found dependency: {cmd_name}");
            Ok(())
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            log::warn!("Dependency '{cmd_name}' not found.");
            Err(CoreError::DependencyNotFound(cmd_name.to_string()))
        }
        Err(e) => {
            log::error!("Failed to start dependency check command '{cmd_name}': {e}");
            Err(CoreError::CommandStart(cmd_name.to_string(), e))
        }
    }
}
