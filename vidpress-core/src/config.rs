//! Encoding and batch options.
//!
//! All user-supplied constraints are parsed and validated here, at the
//! boundary, so the pipeline below works with typed values only. In
//! particular the denoise flag is a tagged [`Denoise`] variant rather than
//! a loose string carried through the filter layer.

use crate::error::{CoreError, CoreResult};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

pub const DEFAULT_CRF: u32 = 19;
pub const DEFAULT_PRESET: &str = "slow";
pub const DEFAULT_PROFILE: &str = "high";
pub const DEFAULT_LEVEL: &str = "4.1";
pub const DEFAULT_AUDIO_BITRATE: u32 = 256;
pub const DEFAULT_MODULUS: u32 = 2;

/// Dimension moduli the encoder macroblock alignment accepts.
pub const ALLOWED_MODULI: [u32; 4] = [2, 4, 8, 16];

/// Checks a modulus against [`ALLOWED_MODULI`].
pub fn validate_modulus(modulus: u32) -> CoreResult<()> {
    if ALLOWED_MODULI.contains(&modulus) {
        Ok(())
    } else {
        Err(CoreError::InvalidConfig(format!(
            "modulus must be one of 2, 4, 8 or 16 (got {modulus})"
        )))
    }
}

/// Named hqdn3d strengths.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DenoisePreset {
    Weakest,
    Weak,
    Medium,
    Strong,
}

impl DenoisePreset {
    /// Fixed hqdn3d parameters for this preset.
    pub fn params(self) -> &'static str {
        match self {
            DenoisePreset::Weakest => "1:1:2:2",
            DenoisePreset::Weak => "2:1:2:3",
            DenoisePreset::Medium => "3:2:2:3",
            DenoisePreset::Strong => "7:7:5:5",
        }
    }
}

/// Denoise request: off, a named preset, or a custom hqdn3d 4-tuple.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Denoise {
    #[default]
    Off,
    Preset(DenoisePreset),
    Custom(u32, u32, u32, u32),
}

impl Denoise {
    /// Renders the hqdn3d filter stage, or `None` when denoising is off.
    pub fn filter(&self) -> Option<String> {
        match self {
            Denoise::Off => None,
            Denoise::Preset(p) => Some(format!("hqdn3d={}", p.params())),
            Denoise::Custom(a, b, c, d) => Some(format!("hqdn3d={a}:{b}:{c}:{d}")),
        }
    }
}

impl FromStr for Denoise {
    type Err = CoreError;

    fn from_str(s: &str) -> CoreResult<Self> {
        match s {
            "weakest" => return Ok(Denoise::Preset(DenoisePreset::Weakest)),
            "weak" => return Ok(Denoise::Preset(DenoisePreset::Weak)),
            "medium" => return Ok(Denoise::Preset(DenoisePreset::Medium)),
            "strong" => return Ok(Denoise::Preset(DenoisePreset::Strong)),
            _ => {}
        }

        let parts: Vec<&str> = s.split(':').collect();
        if parts.len() == 4 {
            if let (Ok(a), Ok(b), Ok(c), Ok(d)) = (
                parts[0].parse::<u32>(),
                parts[1].parse::<u32>(),
                parts[2].parse::<u32>(),
                parts[3].parse::<u32>(),
            ) {
                return Ok(Denoise::Custom(a, b, c, d));
            }
        }

        Err(CoreError::InvalidConfig(format!(
            "unknown denoise spec '{s}' (expected weakest|weak|medium|strong or a:b:c:d)"
        )))
    }
}

impl fmt::Display for Denoise {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Denoise::Off => write!(f, "off"),
            Denoise::Preset(DenoisePreset::Weakest) => write!(f, "weakest"),
            Denoise::Preset(DenoisePreset::Weak) => write!(f, "weak"),
            Denoise::Preset(DenoisePreset::Medium) => write!(f, "medium"),
            Denoise::Preset(DenoisePreset::Strong) => write!(f, "strong"),
            Denoise::Custom(a, b, c, d) => write!(f, "{a}:{b}:{c}:{d}"),
        }
    }
}

/// Immutable constraints for a single encode job.
#[derive(Debug, Clone)]
pub struct EncodeOptions {
    pub max_width: Option<u32>,
    pub max_height: Option<u32>,
    pub modulus: u32,
    /// Run crop detection and append the detected crop to the filter chain.
    pub crop: bool,
    pub denoise: Denoise,
    pub threads: Option<u32>,
    pub opencl: bool,
    pub crf: u32,
    /// Target video bitrate in kbit/s. When set it overrides CRF.
    pub video_bitrate: Option<u32>,
    pub preset: String,
    pub profile: String,
    pub tune: Option<String>,
    pub level: String,
    /// Audio bitrate in kbit/s; 0 stream-copies the audio instead.
    pub audio_bitrate: u32,
    /// Two-pass encode. Only honored together with a fixed video bitrate;
    /// with CRF the first pass is silently skipped.
    pub two_pass: bool,
    /// Ignore the container display aspect ratio and trust storage dimensions.
    pub force_original_ar: bool,
    /// Print the composed command(s) instead of executing them.
    pub print_command: bool,
}

impl Default for EncodeOptions {
    fn default() -> Self {
        Self {
            max_width: None,
            max_height: None,
            modulus: DEFAULT_MODULUS,
            crop: false,
            denoise: Denoise::Off,
            threads: None,
            opencl: false,
            crf: DEFAULT_CRF,
            video_bitrate: None,
            preset: DEFAULT_PRESET.to_string(),
            profile: DEFAULT_PROFILE.to_string(),
            tune: None,
            level: DEFAULT_LEVEL.to_string(),
            audio_bitrate: DEFAULT_AUDIO_BITRATE,
            two_pass: false,
            force_original_ar: false,
            print_command: false,
        }
    }
}

impl EncodeOptions {
    /// Validates constraints that must fail before any subprocess runs.
    pub fn validate(&self) -> CoreResult<()> {
        validate_modulus(self.modulus)
    }
}

/// Contract for a batch directory walk.
#[derive(Debug, Clone)]
pub struct BatchOptions {
    pub source: PathBuf,
    pub dest: PathBuf,
    /// Copy files lacking a video or audio stream verbatim instead of
    /// skipping them.
    pub copy_invalid: bool,
    /// Passthrough encode options applied to every valid file.
    pub encode: EncodeOptions,
}
