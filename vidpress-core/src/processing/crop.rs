//! Letterbox/pillarbox detection via ffmpeg's cropdetect filter.
//!
//! One sample window is decoded at a fixed offset with the scale stage
//! applied, so the detected rectangle lives in output coordinates. The
//! filter's diagnostic log is scraped for `crop=W:H:X:Y` tokens; the last
//! valid match wins since detection stabilizes after the first frames.

use crate::error::CoreResult;
use crate::external::MediaBackend;
use crate::processing::scale::ScaleBox;

use std::path::Path;

/// Seek offset for the sample window, clamped to 0 for shorter files.
pub const CROP_SAMPLE_OFFSET_SECS: f64 = 180.0;

const CROP_SAMPLE_FRAMES: u32 = 30;
const CROP_LUMA_THRESHOLD: u32 = 24;

/// Detected crop rectangle inside the scaled frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CropBox {
    pub width: u32,
    pub height: u32,
    pub x: u32,
    pub y: u32,
}

impl CropBox {
    pub fn filter(&self) -> String {
        format!("crop={}:{}:{}:{}", self.width, self.height, self.x, self.y)
    }
}

/// Samples the source and derives a crop rectangle, or `None` when the log
/// yields no usable match (treated as "no crop needed").
pub fn detect_crop(
    backend: &dyn MediaBackend,
    input: &Path,
    scale: &ScaleBox,
    duration_secs: f64,
) -> CoreResult<Option<CropBox>> {
    let seek = if duration_secs > CROP_SAMPLE_OFFSET_SECS {
        CROP_SAMPLE_OFFSET_SECS
    } else {
        0.0
    };

    let filter = format!(
        "{},cropdetect=limit={CROP_LUMA_THRESHOLD}:round=8",
        scale.filter()
    );
    let args: Vec<String> = vec![
        "-hide_banner".into(),
        "-ss".into(),
        format!("{seek:.2}"),
        "-i".into(),
        input.to_string_lossy().into_owned(),
        "-frames:v".into(),
        CROP_SAMPLE_FRAMES.to_string(),
        "-vf".into(),
        filter,
        "-f".into(),
        "null".into(),
        "-".into(),
    ];

    let pass = backend.run_filter_pass(&args)?;
    let detected = parse_crop_log(&pass.log, scale);
    match &detected {
        Some(c) => log::debug!("Detected crop {} for {}", c.filter(), input.display()),
        None => log::debug!("No crop detected for {}", input.display()),
    }
    Ok(detected)
}

/// Scans a cropdetect log for `crop=W:H:X:Y` tokens. The last token that
/// parses and lies within the scaled frame wins; re-parsing the same log
/// always selects the same match.
pub(crate) fn parse_crop_log(output: &str, scale: &ScaleBox) -> Option<CropBox> {
    let mut last = None;
    for line in output.lines() {
        let Some(pos) = line.find("crop=") else {
            continue;
        };
        let value = &line[pos + 5..];
        let end = value
            .find(|c: char| c.is_whitespace())
            .unwrap_or(value.len());
        if let Some(crop) = parse_crop_value(&value[..end]) {
            if fits_in_frame(&crop, scale) {
                last = Some(crop);
            }
        }
    }
    last
}

fn parse_crop_value(value: &str) -> Option<CropBox> {
    let mut parts = value.split(':');
    let width = parts.next()?.parse().ok()?;
    let height = parts.next()?.parse().ok()?;
    let x = parts.next()?.parse().ok()?;
    let y = parts.next()?.parse().ok()?;
    if parts.next().is_some() {
        return None;
    }
    Some(CropBox {
        width,
        height,
        x,
        y,
    })
}

fn fits_in_frame(crop: &CropBox, scale: &ScaleBox) -> bool {
    crop.width > 0
        && crop.height > 0
        && crop.width + crop.x <= scale.width
        && crop.height + crop.y <= scale.height
}
