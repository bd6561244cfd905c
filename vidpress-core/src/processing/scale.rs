//! Bounding-box scale/pad geometry.
//!
//! Computes the output frame for a source given its display aspect ratio
//! and optional max width/height, rounded down to the encoder alignment
//! modulus. When both maxes are supplied the requested box acts as a floor,
//! not a cap: the output is the per-axis union of the box and the
//! aspect-derived size.

use crate::config::validate_modulus;
use crate::error::{CoreError, CoreResult};
use crate::external::VideoProperties;
use std::fmt;

const ASPECT_EPSILON: f64 = 1e-6;

/// Output geometry: the padded frame and the aspect-fit content inside it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScaleBox {
    pub width: u32,
    pub height: u32,
    pub pad_x: u32,
    pub pad_y: u32,
    pub content_width: u32,
    pub content_height: u32,
}

impl fmt::Display for ScaleBox {
    /// `W:H:X:Y` — frame size plus pad offsets, as consumed by the crop stage.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}:{}:{}",
            self.width, self.height, self.pad_x, self.pad_y
        )
    }
}

impl ScaleBox {
    /// Renders the scale filter stage, padding only when the frame deviates
    /// from the content aspect.
    pub fn filter(&self) -> String {
        if self.width == self.content_width && self.height == self.content_height {
            format!("scale={}:{}", self.width, self.height)
        } else {
            format!(
                "scale={}:{},pad={}:{}:{}:{}",
                self.content_width,
                self.content_height,
                self.width,
                self.height,
                self.pad_x,
                self.pad_y
            )
        }
    }
}

/// Computes the scale/pad geometry for a source.
///
/// The display dimensions are derived by applying the DAR to the stretched
/// axis. With neither max the display size is returned; with one max the
/// other axis follows the aspect ratio; with both the output never shrinks
/// below the union of the requested box and the aspect-derived size. All
/// dimensions floor to a multiple of `modulus` and never drop below one
/// modulus unit.
pub fn compute_scale(
    props: &VideoProperties,
    max_width: Option<u32>,
    max_height: Option<u32>,
    modulus: u32,
) -> CoreResult<ScaleBox> {
    validate_modulus(modulus)?;
    if props.width == 0 || props.height == 0 {
        return Err(CoreError::VideoInfoError(format!(
            "source has no usable dimensions ({}x{})",
            props.width, props.height
        )));
    }

    let storage_aspect = f64::from(props.width) / f64::from(props.height);
    let dar = props
        .display_aspect
        .filter(|d| *d > 0.0)
        .unwrap_or(storage_aspect);

    // Apply the DAR to the axis it stretches.
    let (display_w, display_h) = if dar > storage_aspect + ASPECT_EPSILON {
        ((f64::from(props.height) * dar).round() as u32, props.height)
    } else if dar < storage_aspect - ASPECT_EPSILON {
        (props.width, (f64::from(props.width) / dar).round() as u32)
    } else {
        (props.width, props.height)
    };
    let aspect = f64::from(display_w) / f64::from(display_h);

    let (target_w, target_h) = match (max_width, max_height) {
        (None, None) => (display_w, display_h),
        (Some(mw), None) => (mw, (f64::from(mw) / aspect).round() as u32),
        (None, Some(mh)) => ((f64::from(mh) * aspect).round() as u32, mh),
        (Some(mw), Some(mh)) => {
            let w_from_h = (f64::from(mh) * aspect).round() as u32;
            let h_from_w = (f64::from(mw) / aspect).round() as u32;
            (mw.max(w_from_h), mh.max(h_from_w))
        }
    };

    let width = floor_to_modulus(target_w, modulus);
    let height = floor_to_modulus(target_h, modulus);

    // Aspect-fit the content into the frame, centered by the pad offsets.
    let fit = f64::min(
        f64::from(width) / f64::from(display_w),
        f64::from(height) / f64::from(display_h),
    );
    let content_width =
        floor_to_modulus((f64::from(display_w) * fit).round() as u32, modulus).min(width);
    let content_height =
        floor_to_modulus((f64::from(display_h) * fit).round() as u32, modulus).min(height);

    Ok(ScaleBox {
        width,
        height,
        pad_x: (width - content_width) / 2,
        pad_y: (height - content_height) / 2,
        content_width,
        content_height,
    })
}

fn floor_to_modulus(value: u32, modulus: u32) -> u32 {
    ((value / modulus) * modulus).max(modulus)
}
