//! Production [`MediaBackend`] shelling out to ffmpeg and ffprobe.

use crate::error::{command_failed_error, command_start_error, CoreError, CoreResult};
use crate::external::{check_dependency, MediaBackend, PassLog, StreamSummary, VideoProperties};

use ffmpeg_sidecar::command::FfmpegCommand;
use ffmpeg_sidecar::event::FfmpegEvent;
use ffprobe::{ffprobe, FfProbeError};
use once_cell::sync::OnceCell;

use std::collections::HashSet;
use std::path::Path;
use std::process::Command;

/// Media backend backed by the system ffmpeg/ffprobe binaries.
#[derive(Debug, Default)]
pub struct SidecarBackend {
    /// Encoder names from `ffmpeg -encoders`, scanned once per process.
    encoders: OnceCell<HashSet<String>>,
}

impl SidecarBackend {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn encoder_list(&self) -> CoreResult<&HashSet<String>> {
        self.encoders.get_or_try_init(|| {
            let output = Command::new("ffmpeg")
                .args(["-hide_banner", "-encoders"])
                .output()
                .map_err(|e| command_start_error("ffmpeg", e))?;
            if !output.status.success() {
                return Err(command_failed_error(
                    "ffmpeg -encoders",
                    output.status,
                    String::from_utf8_lossy(&output.stderr).into_owned(),
                ));
            }

            // Lines look like " A....D aac   AAC (Advanced Audio Coding)".
            let names = String::from_utf8_lossy(&output.stdout)
                .lines()
                .filter_map(|line| line.split_whitespace().nth(1).map(str::to_string))
                .collect();
            Ok(names)
        })
    }
}

impl MediaBackend for SidecarBackend {
    fn verify_available(&self) -> CoreResult<()> {
        check_dependency("ffmpeg")
    }

    fn probe_streams(&self, input: &Path) -> CoreResult<StreamSummary> {
        log::debug!("Probing streams of {}", input.display());
        let metadata = ffprobe(input).map_err(|e| map_ffprobe_error(e, "streams"))?;
        let mut summary = StreamSummary::default();
        for stream in &metadata.streams {
            match stream.codec_type.as_deref() {
                Some("video") => summary.has_video = true,
                Some("audio") => summary.has_audio = true,
                _ => {}
            }
        }
        Ok(summary)
    }

    fn probe_duration(&self, input: &Path) -> CoreResult<f64> {
        log::debug!("Probing duration of {}", input.display());
        let metadata = ffprobe(input).map_err(|e| map_ffprobe_error(e, "duration"))?;
        metadata
            .format
            .duration
            .as_deref()
            .and_then(|d| d.parse::<f64>().ok())
            .ok_or_else(|| {
                CoreError::FfprobeParse(format!(
                    "Failed to parse duration from format for {}",
                    input.display()
                ))
            })
    }

    fn probe_video(&self, input: &Path) -> CoreResult<VideoProperties> {
        log::debug!("Probing video properties of {}", input.display());
        let metadata = ffprobe(input).map_err(|e| map_ffprobe_error(e, "video properties"))?;

        let duration_secs = metadata
            .format
            .duration
            .as_deref()
            .and_then(|d| d.parse::<f64>().ok())
            .unwrap_or(0.0);

        let video_stream = metadata
            .streams
            .iter()
            .find(|s| s.codec_type.as_deref() == Some("video"))
            .ok_or_else(|| {
                CoreError::VideoInfoError(format!("No video stream found in {}", input.display()))
            })?;

        let width = video_stream.width.ok_or_else(|| {
            CoreError::VideoInfoError(format!("Video stream missing width in {}", input.display()))
        })?;
        let height = video_stream.height.ok_or_else(|| {
            CoreError::VideoInfoError(format!("Video stream missing height in {}", input.display()))
        })?;
        if width <= 0 || height <= 0 {
            return Err(CoreError::VideoInfoError(format!(
                "Invalid dimensions in {}: width={width}, height={height}",
                input.display()
            )));
        }

        Ok(VideoProperties {
            width: width as u32,
            height: height as u32,
            display_aspect: video_stream
                .display_aspect_ratio
                .as_deref()
                .and_then(parse_aspect_ratio),
            duration_secs,
        })
    }

    fn run_filter_pass(&self, args: &[String]) -> CoreResult<PassLog> {
        log::debug!("Running ffmpeg pass: {args:?}");
        let mut cmd = FfmpegCommand::new();
        cmd.args(args.iter().map(String::as_str));

        let mut child = cmd.spawn().map_err(|e| command_start_error("ffmpeg", e))?;

        let mut log_lines = String::new();
        for event in child.iter().map_err(|e| {
            command_failed_error(
                "ffmpeg",
                std::process::ExitStatus::default(),
                format!("Failed to get event iterator: {e}"),
            )
        })? {
            match event {
                FfmpegEvent::Log(_, line) | FfmpegEvent::Error(line) => {
                    log_lines.push_str(&line);
                    log_lines.push('\n');
                }
                _ => {}
            }
        }

        let status = child.wait().map_err(|e| command_start_error("ffmpeg", e))?;
        if status.success() {
            Ok(PassLog { log: log_lines })
        } else {
            Err(command_failed_error("ffmpeg", status, log_lines))
        }
    }

    fn read_global_metadata(&self, input: &Path) -> CoreResult<String> {
        let output = Command::new("ffmpeg")
            .arg("-hide_banner")
            .arg("-i")
            .arg(input)
            .args(["-f", "ffmetadata", "-"])
            .output()
            .map_err(|e| command_start_error("ffmpeg", e))?;
        if !output.status.success() {
            return Err(command_failed_error(
                "ffmpeg (ffmetadata)",
                output.status,
                String::from_utf8_lossy(&output.stderr).into_owned(),
            ));
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    fn encoder_available(&self, name: &str) -> CoreResult<bool> {
        Ok(self.encoder_list()?.contains(name))
    }
}

/// Parses an ffprobe aspect string like `16:9` into a ratio.
fn parse_aspect_ratio(s: &str) -> Option<f64> {
    let (num, den) = s.split_once(':')?;
    let num: f64 = num.trim().parse().ok()?;
    let den: f64 = den.trim().parse().ok()?;
    if num > 0.0 && den > 0.0 {
        Some(num / den)
    } else {
        None
    }
}

fn map_ffprobe_error(err: FfProbeError, context: &str) -> CoreError {
    match err {
        FfProbeError::Io(io_err) => command_start_error(format!("ffprobe ({context})"), io_err),
        FfProbeError::Status(output) => {
            let stderr = String::from_utf8_lossy(&output.stderr).into_owned();
            command_failed_error(format!("ffprobe ({context})"), output.status, stderr)
        }
        FfProbeError::Deserialize(err) => CoreError::FfprobeParse(format!(
            "ffprobe {context} output deserialization: {err}"
        )),
        _ => CoreError::FfprobeParse(format!("Unknown ffprobe error during {context}: {err:?}")),
    }
}
