// vidpress-cli/src/cli.rs
//
// Defines the command-line argument structures using clap.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use vidpress_core::config::{
    DEFAULT_AUDIO_BITRATE, DEFAULT_CRF, DEFAULT_LEVEL, DEFAULT_MODULUS, DEFAULT_PRESET,
    DEFAULT_PROFILE,
};
use vidpress_core::{Denoise, EncodeOptions};

#[derive(Parser, Debug)]
#[command(
    author,
    version, // Reads from Cargo.toml via "cargo" feature in clap
    about = "Vidpress: x264 video transcoding tool",
    long_about = "Scales, crops, denoises and encodes video files to x264 MP4 via ffmpeg."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Encodes a single video file to x264 MP4
    Encode(EncodeArgs),
    /// Mirrors a directory tree, encoding every valid video file
    Batch(BatchArgs),
    /// Checks that a file has both a video and an audio stream
    Validate(ValidateArgs),
    /// Prints the scale/pad geometry computed for a file
    Scale(ScaleArgs),
    /// Builds ffmetadata chapters for a list of clips
    Chapters(ChaptersArgs),
}

/// Encode flags shared by the `encode` and `batch` subcommands. `batch`
/// re-parses its trailing arguments through this same struct, so both
/// surfaces stay in lockstep.
#[derive(Parser, Debug, Clone)]
pub struct EncodeFlags {
    /// Maximum output width in pixels
    #[arg(short = 'w', long, value_name = "PIXELS")]
    pub max_width: Option<u32>,

    /// Maximum output height in pixels
    #[arg(long, value_name = "PIXELS")]
    pub max_height: Option<u32>,

    /// Dimension modulus: every output dimension is floored to a multiple of this
    #[arg(long, default_value_t = DEFAULT_MODULUS, value_name = "N")]
    pub modulus: u32,

    /// Detect letterbox bars and crop them away
    #[arg(long)]
    pub crop: bool,

    /// Denoise strength: weakest|weak|medium|strong, or an hqdn3d a:b:c:d tuple
    #[arg(long, value_name = "SPEC")]
    pub denoise: Option<Denoise>,

    /// Trust the storage dimensions and ignore the container display aspect ratio
    #[arg(long)]
    pub force_original_ar: bool,

    /// Encoder thread count (ffmpeg default when omitted)
    #[arg(long, value_name = "N")]
    pub threads: Option<u32>,

    /// Enable x264 OpenCL lookahead
    #[arg(long)]
    pub opencl: bool,

    /// Constant rate factor; ignored when --video-bitrate is set
    #[arg(long, default_value_t = DEFAULT_CRF)]
    pub crf: u32,

    /// Target video bitrate in kbit/s (overrides CRF)
    #[arg(long, value_name = "KBITS")]
    pub video_bitrate: Option<u32>,

    /// x264 speed preset
    #[arg(long, default_value = DEFAULT_PRESET)]
    pub preset: String,

    /// H.264 profile
    #[arg(long, default_value = DEFAULT_PROFILE)]
    pub profile: String,

    /// x264 tune (e.g. film, animation)
    #[arg(long, value_name = "TUNE")]
    pub tune: Option<String>,

    /// H.264 level
    #[arg(long, default_value = DEFAULT_LEVEL)]
    pub level: String,

    /// Audio bitrate in kbit/s; 0 stream-copies the source audio
    #[arg(long, default_value_t = DEFAULT_AUDIO_BITRATE, value_name = "KBITS")]
    pub audio_bitrate: u32,

    /// Two-pass encode (only takes effect together with --video-bitrate)
    #[arg(long)]
    pub twopass: bool,

    /// Print the composed ffmpeg command(s) instead of running them
    #[arg(long)]
    pub print_command: bool,
}

impl EncodeFlags {
    pub fn to_options(&self) -> EncodeOptions {
        EncodeOptions {
            max_width: self.max_width,
            max_height: self.max_height,
            modulus: self.modulus,
            crop: self.crop,
            denoise: self.denoise.unwrap_or_default(),
            threads: self.threads,
            opencl: self.opencl,
            crf: self.crf,
            video_bitrate: self.video_bitrate,
            preset: self.preset.clone(),
            profile: self.profile.clone(),
            tune: self.tune.clone(),
            level: self.level.clone(),
            audio_bitrate: self.audio_bitrate,
            two_pass: self.twopass,
            force_original_ar: self.force_original_ar,
            print_command: self.print_command,
        }
    }
}

#[derive(Parser, Debug)]
pub struct EncodeArgs {
    /// Input video file
    #[arg(required = true, value_name = "INPUT")]
    pub input: PathBuf,

    /// Output path (defaults to <input stem>_x264.mp4 next to the input)
    #[arg(short = 'o', long = "output", value_name = "OUTPUT")]
    pub output: Option<PathBuf>,

    #[command(flatten)]
    pub flags: EncodeFlags,
}

#[derive(Parser, Debug)]
pub struct BatchArgs {
    /// Source directory to walk
    #[arg(required = true, value_name = "SOURCE_DIR")]
    pub source: PathBuf,

    /// Destination directory mirroring the source tree
    #[arg(required = true, value_name = "DEST_DIR")]
    pub dest: PathBuf,

    /// Copy files lacking a video or audio stream verbatim instead of skipping them
    #[arg(long)]
    pub copy_invalid: bool,

    /// Encode flags applied to every file, given after `--`
    #[arg(last = true, value_name = "ENCODE_FLAGS")]
    pub encode_flags: Vec<String>,
}

#[derive(Parser, Debug)]
pub struct ValidateArgs {
    /// File to check
    #[arg(required = true, value_name = "FILE")]
    pub file: PathBuf,
}

#[derive(Parser, Debug)]
pub struct ScaleArgs {
    /// File to probe
    #[arg(required = true, value_name = "FILE")]
    pub file: PathBuf,

    /// Maximum output width in pixels
    #[arg(short = 'w', long, value_name = "PIXELS")]
    pub max_width: Option<u32>,

    /// Maximum output height in pixels
    #[arg(long, value_name = "PIXELS")]
    pub max_height: Option<u32>,

    /// Dimension modulus
    #[arg(long, default_value_t = DEFAULT_MODULUS, value_name = "N")]
    pub modulus: u32,

    /// Trust the storage dimensions and ignore the container display aspect ratio
    #[arg(long)]
    pub force_original_ar: bool,
}

#[derive(Parser, Debug)]
pub struct ChaptersArgs {
    /// File listing one clip path per line (reads stdin when omitted)
    #[arg(value_name = "LIST_FILE")]
    pub list: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use vidpress_core::config::DenoisePreset;

    #[test]
    fn test_parse_encode_defaults() {
        let cli = Cli::parse_from(["vidpress", "encode", "movie.mkv"]);

        match cli.command {
            Commands::Encode(args) => {
                assert_eq!(args.input, PathBuf::from("movie.mkv"));
                assert!(args.output.is_none());
                let opts = args.flags.to_options();
                assert_eq!(opts.crf, 19);
                assert_eq!(opts.preset, "slow");
                assert_eq!(opts.profile, "high");
                assert_eq!(opts.level, "4.1");
                assert_eq!(opts.audio_bitrate, 256);
                assert_eq!(opts.modulus, 2);
                assert_eq!(opts.denoise, Denoise::Off);
                assert!(!opts.crop);
                assert!(!opts.two_pass);
            }
            _ => panic!("Expected Encode command"),
        }
    }

    #[test]
    fn test_parse_encode_full_flags() {
        let cli = Cli::parse_from([
            "vidpress",
            "encode",
            "movie.mkv",
            "-o",
            "out.mp4",
            "-w",
            "1280",
            "--max-height",
            "720",
            "--modulus",
            "8",
            "--crop",
            "--denoise",
            "strong",
            "--video-bitrate",
            "4000",
            "--twopass",
            "--audio-bitrate",
            "0",
            "--tune",
            "film",
        ]);

        match cli.command {
            Commands::Encode(args) => {
                assert_eq!(args.output, Some(PathBuf::from("out.mp4")));
                let opts = args.flags.to_options();
                assert_eq!(opts.max_width, Some(1280));
                assert_eq!(opts.max_height, Some(720));
                assert_eq!(opts.modulus, 8);
                assert!(opts.crop);
                assert_eq!(opts.denoise, Denoise::Preset(DenoisePreset::Strong));
                assert_eq!(opts.video_bitrate, Some(4000));
                assert!(opts.two_pass);
                assert_eq!(opts.audio_bitrate, 0);
                assert_eq!(opts.tune.as_deref(), Some("film"));
            }
            _ => panic!("Expected Encode command"),
        }
    }

    #[test]
    fn test_parse_denoise_custom_tuple() {
        let cli = Cli::parse_from(["vidpress", "encode", "in.avi", "--denoise", "4:3:6:4"]);
        match cli.command {
            Commands::Encode(args) => {
                assert_eq!(args.flags.denoise, Some(Denoise::Custom(4, 3, 6, 4)));
            }
            _ => panic!("Expected Encode command"),
        }
    }

    #[test]
    fn test_parse_batch_with_passthrough() {
        let cli = Cli::parse_from([
            "vidpress",
            "batch",
            "src",
            "dst",
            "--copy-invalid",
            "--",
            "-w",
            "1280",
            "--crop",
        ]);

        match cli.command {
            Commands::Batch(args) => {
                assert_eq!(args.source, PathBuf::from("src"));
                assert_eq!(args.dest, PathBuf::from("dst"));
                assert!(args.copy_invalid);
                assert_eq!(args.encode_flags, vec!["-w", "1280", "--crop"]);
            }
            _ => panic!("Expected Batch command"),
        }
    }

    #[test]
    fn test_batch_passthrough_reparses_as_encode_flags() {
        let raw = ["-w", "1280", "--denoise", "medium", "--audio-bitrate", "0"];
        let flags = EncodeFlags::try_parse_from(
            std::iter::once("vidpress").chain(raw.iter().copied()),
        )
        .unwrap();
        let opts = flags.to_options();
        assert_eq!(opts.max_width, Some(1280));
        assert_eq!(opts.denoise, Denoise::Preset(DenoisePreset::Medium));
        assert_eq!(opts.audio_bitrate, 0);
    }

    #[test]
    fn test_parse_scale_and_validate() {
        let cli = Cli::parse_from(["vidpress", "scale", "clip.mkv", "-w", "1920", "--modulus", "16"]);
        match cli.command {
            Commands::Scale(args) => {
                assert_eq!(args.file, PathBuf::from("clip.mkv"));
                assert_eq!(args.max_width, Some(1920));
                assert!(args.max_height.is_none());
                assert_eq!(args.modulus, 16);
            }
            _ => panic!("Expected Scale command"),
        }

        let cli = Cli::parse_from(["vidpress", "validate", "clip.mkv"]);
        assert!(matches!(cli.command, Commands::Validate(_)));
    }

    #[test]
    fn test_parse_chapters_stdin_default() {
        let cli = Cli::parse_from(["vidpress", "chapters"]);
        match cli.command {
            Commands::Chapters(args) => assert!(args.list.is_none()),
            _ => panic!("Expected Chapters command"),
        }
    }
}
