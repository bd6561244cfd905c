//! Filter-chain and pass construction for ffmpeg command lines.
//!
//! The filter graph has a fixed stage order: deinterlace, forced-DAR,
//! scale, crop, denoise. [`FilterChain`] keeps one named slot per stage and
//! renders them once, in that order, so call order can never reorder the
//! graph.

use std::path::{Path, PathBuf};

/// Ordered video filter chain with named stages.
#[derive(Debug, Clone, Default)]
pub struct FilterChain {
    deinterlace: Option<String>,
    force_dar: Option<String>,
    scale: Option<String>,
    crop: Option<String>,
    denoise: Option<String>,
}

impl FilterChain {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn deinterlace(mut self, filter: &str) -> Self {
        if !filter.is_empty() {
            self.deinterlace = Some(filter.to_string());
        }
        self
    }

    #[must_use]
    pub fn force_dar(mut self, filter: &str) -> Self {
        if !filter.is_empty() {
            self.force_dar = Some(filter.to_string());
        }
        self
    }

    #[must_use]
    pub fn scale(mut self, filter: &str) -> Self {
        if !filter.is_empty() {
            self.scale = Some(filter.to_string());
        }
        self
    }

    #[must_use]
    pub fn crop(mut self, filter: &str) -> Self {
        if !filter.is_empty() {
            self.crop = Some(filter.to_string());
        }
        self
    }

    #[must_use]
    pub fn denoise(mut self, filter: &str) -> Self {
        if !filter.is_empty() {
            self.denoise = Some(filter.to_string());
        }
        self
    }

    /// Renders the chain in fixed stage order, or `None` when empty.
    #[must_use]
    pub fn render(&self) -> Option<String> {
        let stages: Vec<&str> = [
            self.deinterlace.as_deref(),
            self.force_dar.as_deref(),
            self.scale.as_deref(),
            self.crop.as_deref(),
            self.denoise.as_deref(),
        ]
        .into_iter()
        .flatten()
        .collect();

        if stages.is_empty() {
            None
        } else {
            Some(stages.join(","))
        }
    }
}

/// Where a pass writes its encoded stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PassSink {
    /// Analysis pass, discarded output.
    Null,
    /// Final container file.
    File(PathBuf),
}

/// One ffmpeg invocation: arguments up to (but excluding) the output.
#[derive(Debug, Clone)]
pub struct FfmpegPass {
    pub args: Vec<String>,
    pub sink: PassSink,
}

impl FfmpegPass {
    /// Full argument list, optionally redirecting a file sink to another
    /// path (used for in-flight temporary outputs).
    pub fn render_args(&self, output_override: Option<&Path>) -> Vec<String> {
        let mut args = self.args.clone();
        match &self.sink {
            PassSink::Null => {
                args.extend(["-f".to_string(), "null".to_string(), "-".to_string()]);
            }
            PassSink::File(path) => {
                let out = output_override.unwrap_or(path);
                args.push(out.to_string_lossy().into_owned());
            }
        }
        args
    }

    /// Human-readable command line for dry runs.
    pub fn command_line(&self) -> String {
        let mut line = String::from("ffmpeg");
        for arg in self.render_args(None) {
            line.push(' ');
            if arg.contains(' ') || arg.contains(',') {
                line.push('\'');
                line.push_str(&arg);
                line.push('\'');
            } else {
                line.push_str(&arg);
            }
        }
        line
    }
}
