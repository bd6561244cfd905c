//! Mock [`MediaBackend`] for tests.
//!
//! Returns canned probe data, records every ffmpeg invocation, and creates
//! dummy output files so callers that rename outputs into place behave as
//! they do against the real backend.

use crate::error::{command_failed_error, CoreError, CoreResult};
use crate::external::{MediaBackend, PassLog, StreamSummary, VideoProperties};

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};

/// Configurable fake backend. Not thread-safe; intended for tests only.
#[derive(Debug)]
pub struct MockBackend {
    missing_ffmpeg: bool,
    /// Files reported with a video stream but no audio stream.
    audio_less: HashSet<PathBuf>,
    /// Files whose probes fail outright (corrupt/unreadable).
    probe_errors: HashSet<PathBuf>,
    /// Files whose encode passes fail.
    failing: HashSet<PathBuf>,
    durations: HashMap<PathBuf, f64>,
    video: VideoProperties,
    encoders: HashSet<String>,
    filter_log: String,
    metadata: String,
    calls: RefCell<Vec<Vec<String>>>,
}

impl Default for MockBackend {
    fn default() -> Self {
        Self {
            missing_ffmpeg: false,
            audio_less: HashSet::new(),
            probe_errors: HashSet::new(),
            failing: HashSet::new(),
            durations: HashMap::new(),
            video: VideoProperties {
                width: 1920,
                height: 1080,
                display_aspect: None,
                duration_secs: 600.0,
            },
            encoders: HashSet::new(),
            filter_log: String::new(),
            metadata: ";FFMETADATA1\n".to_string(),
            calls: RefCell::new(Vec::new()),
        }
    }
}

impl MockBackend {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_missing_ffmpeg(mut self) -> Self {
        self.missing_ffmpeg = true;
        self
    }

    /// Marks a file as having no audio stream.
    #[must_use]
    pub fn with_audio_less(mut self, path: impl Into<PathBuf>) -> Self {
        self.audio_less.insert(path.into());
        self
    }

    /// Marks a file as unreadable by every probe.
    #[must_use]
    pub fn with_probe_error(mut self, path: impl Into<PathBuf>) -> Self {
        self.probe_errors.insert(path.into());
        self
    }

    /// Makes encode passes for this input fail with a non-zero status.
    #[must_use]
    pub fn with_failing(mut self, path: impl Into<PathBuf>) -> Self {
        self.failing.insert(path.into());
        self
    }

    #[must_use]
    pub fn with_duration(mut self, path: impl Into<PathBuf>, secs: f64) -> Self {
        self.durations.insert(path.into(), secs);
        self
    }

    #[must_use]
    pub fn with_video(mut self, video: VideoProperties) -> Self {
        self.video = video;
        self
    }

    #[must_use]
    pub fn with_encoder(mut self, name: &str) -> Self {
        self.encoders.insert(name.to_string());
        self
    }

    #[must_use]
    pub fn with_filter_log(mut self, log: &str) -> Self {
        self.filter_log = log.to_string();
        self
    }

    #[must_use]
    pub fn with_metadata(mut self, metadata: &str) -> Self {
        self.metadata = metadata.to_string();
        self
    }

    /// Every recorded `run_filter_pass` argument list, in call order.
    pub fn calls(&self) -> Vec<Vec<String>> {
        self.calls.borrow().clone()
    }

    fn probe_guard(&self, input: &Path) -> CoreResult<()> {
        if self.probe_errors.contains(input) {
            Err(CoreError::FfprobeParse(format!(
                "mock probe failure for {}",
                input.display()
            )))
        } else {
            Ok(())
        }
    }
}

impl MediaBackend for MockBackend {
    fn verify_available(&self) -> CoreResult<()> {
        if self.missing_ffmpeg {
            Err(CoreError::DependencyNotFound("ffmpeg".to_string()))
        } else {
            Ok(())
        }
    }

    fn probe_streams(&self, input: &Path) -> CoreResult<StreamSummary> {
        self.probe_guard(input)?;
        Ok(StreamSummary {
            has_video: true,
            has_audio: !self.audio_less.contains(input),
        })
    }

    fn probe_duration(&self, input: &Path) -> CoreResult<f64> {
        self.probe_guard(input)?;
        Ok(self
            .durations
            .get(input)
            .copied()
            .unwrap_or(self.video.duration_secs))
    }

    fn probe_video(&self, input: &Path) -> CoreResult<VideoProperties> {
        self.probe_guard(input)?;
        let mut props = self.video.clone();
        if let Some(d) = self.durations.get(input) {
            props.duration_secs = *d;
        }
        Ok(props)
    }

    fn run_filter_pass(&self, args: &[String]) -> CoreResult<PassLog> {
        self.calls.borrow_mut().push(args.to_vec());

        if self
            .failing
            .iter()
            .any(|p| args.iter().any(|a| a.as_str() == p.to_string_lossy()))
        {
            return Err(command_failed_error(
                "ffmpeg",
                std::process::ExitStatus::default(),
                "mock encode failure",
            ));
        }

        // Create the output file when the pass writes to one, as ffmpeg would.
        if let Some(last) = args.last() {
            if last != "-" {
                let path = Path::new(last);
                if let Some(parent) = path.parent() {
                    fs::create_dir_all(parent)?;
                }
                fs::write(path, b"mock-output")?;
            }
        }

        Ok(PassLog {
            log: self.filter_log.clone(),
        })
    }

    fn read_global_metadata(&self, input: &Path) -> CoreResult<String> {
        self.probe_guard(input)?;
        Ok(self.metadata.clone())
    }

    fn encoder_available(&self, name: &str) -> CoreResult<bool> {
        Ok(self.encoders.contains(name))
    }
}
