//! Encode orchestration: option resolution, filter-chain assembly, audio
//! strategy selection and pass execution.
//!
//! An encode is planned first ([`plan_encode`]) and executed second
//! ([`execute_plan`]); the plan is a pure value, so tests can assert on the
//! composed passes without spawning anything, and dry runs print them
//! verbatim.

use crate::config::EncodeOptions;
use crate::error::CoreResult;
use crate::external::{FfmpegPass, FilterChain, MediaBackend, PassSink};
use crate::processing::crop::detect_crop;
use crate::processing::scale::compute_scale;
use crate::temp_files::{scratch_path, PassLogGuard, PendingOutput};

use std::path::{Path, PathBuf};

/// Suffix appended to the input stem for the default output name.
pub const OUTPUT_SUFFIX: &str = "_x264";
/// Output container is always a streaming-optimized MP4.
pub const OUTPUT_EXTENSION: &str = "mp4";

const DEINTERLACE_FILTER: &str = "yadif=0:-1:1";

/// Audio handling for the final pass, in falling order of preference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioStrategy {
    /// Bitrate 0: re-mux the stream unchanged.
    Copy,
    /// Hardware-accelerated AudioToolbox AAC.
    AudioToolbox,
    /// Software Fraunhofer AAC.
    Fdk,
    /// Built-in aac encoder, which needs the experimental compat flag.
    Native,
}

impl AudioStrategy {
    fn args(self, bitrate_kbps: u32) -> Vec<String> {
        match self {
            AudioStrategy::Copy => vec!["-c:a".into(), "copy".into()],
            AudioStrategy::AudioToolbox => vec![
                "-c:a".into(),
                "aac_at".into(),
                "-b:a".into(),
                format!("{bitrate_kbps}k"),
            ],
            AudioStrategy::Fdk => vec![
                "-c:a".into(),
                "libfdk_aac".into(),
                "-b:a".into(),
                format!("{bitrate_kbps}k"),
            ],
            AudioStrategy::Native => vec![
                "-c:a".into(),
                "aac".into(),
                "-strict".into(),
                "experimental".into(),
                "-b:a".into(),
                format!("{bitrate_kbps}k"),
            ],
        }
    }
}

/// Outcome of [`encode_file`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EncodeOutcome {
    Encoded,
    /// Dry run: commands were printed, nothing executed.
    Printed,
}

/// A fully resolved encode: every pass, in order, plus scratch bookkeeping.
#[derive(Debug, Clone)]
pub struct EncodePlan {
    pub input: PathBuf,
    pub output: PathBuf,
    pub passes: Vec<FfmpegPass>,
    /// Two-pass stats file, when a first pass runs.
    pub passlog: Option<PathBuf>,
}

/// Default output path: input stem + fixed suffix, extension normalized.
pub fn default_output_path(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "output".to_string());
    input.with_file_name(format!("{stem}{OUTPUT_SUFFIX}.{OUTPUT_EXTENSION}"))
}

/// Picks the best available AAC encoder, falling back down the preference
/// list rather than failing. Bitrate 0 selects stream-copy.
pub fn select_audio_strategy(
    backend: &dyn MediaBackend,
    audio_bitrate: u32,
) -> CoreResult<AudioStrategy> {
    if audio_bitrate == 0 {
        return Ok(AudioStrategy::Copy);
    }
    if backend.encoder_available("aac_at")? {
        Ok(AudioStrategy::AudioToolbox)
    } else if backend.encoder_available("libfdk_aac")? {
        Ok(AudioStrategy::Fdk)
    } else {
        Ok(AudioStrategy::Native)
    }
}

/// Resolves options into an [`EncodePlan`].
///
/// Configuration errors (bad modulus, missing ffmpeg) surface here, before
/// any encode subprocess runs. A first pass is planned only when two-pass
/// is requested together with a fixed bitrate; with CRF the request
/// degrades to a single pass.
pub fn plan_encode(
    backend: &dyn MediaBackend,
    opts: &EncodeOptions,
    input: &Path,
    output: Option<&Path>,
) -> CoreResult<EncodePlan> {
    opts.validate()?;
    backend.verify_available()?;

    let mut props = backend.probe_video(input)?;
    if opts.force_original_ar {
        props.display_aspect = None;
    }

    let scale = compute_scale(&props, opts.max_width, opts.max_height, opts.modulus)?;
    let crop = if opts.crop {
        detect_crop(backend, input, &scale, props.duration_secs)?
    } else {
        None
    };

    let mut chain = FilterChain::new().deinterlace(DEINTERLACE_FILTER);
    if opts.force_original_ar {
        chain = chain.force_dar("setsar=1");
    }
    chain = chain.scale(&scale.filter());
    if let Some(c) = crop {
        chain = chain.crop(&c.filter());
    }
    if let Some(d) = opts.denoise.filter() {
        chain = chain.denoise(&d);
    }

    let output = output
        .map(Path::to_path_buf)
        .unwrap_or_else(|| default_output_path(input));
    let audio = select_audio_strategy(backend, opts.audio_bitrate)?;

    // Two-pass needs a bit-allocation target; a CRF request silently
    // degrades to a single pass.
    let two_pass = opts.two_pass && opts.video_bitrate.is_some();
    let passlog = if two_pass {
        let dir = output.parent().unwrap_or_else(|| Path::new("."));
        Some(scratch_path(dir, "vidpress_2pass", "log"))
    } else {
        None
    };

    let mut passes = Vec::with_capacity(if two_pass { 2 } else { 1 });
    if let Some(passlog) = &passlog {
        let mut args = common_args(input, &chain);
        args.extend(video_args(opts));
        args.extend([
            "-pass".to_string(),
            "1".to_string(),
            "-passlogfile".to_string(),
            passlog.to_string_lossy().into_owned(),
        ]);
        // Analysis pass: no audio, discarded output
        args.push("-an".to_string());
        passes.push(FfmpegPass {
            args,
            sink: PassSink::Null,
        });
    }

    let mut args = common_args(input, &chain);
    args.extend(video_args(opts));
    if let Some(passlog) = &passlog {
        args.extend([
            "-pass".to_string(),
            "2".to_string(),
            "-passlogfile".to_string(),
            passlog.to_string_lossy().into_owned(),
        ]);
    }
    args.extend(audio.args(opts.audio_bitrate));
    // The container is always MP4; ffmpeg would otherwise infer the muxer
    // from the output extension, which batch runs carry over verbatim.
    args.extend([
        "-f".to_string(),
        OUTPUT_EXTENSION.to_string(),
        "-movflags".to_string(),
        "+faststart".to_string(),
    ]);
    passes.push(FfmpegPass {
        args,
        sink: PassSink::File(output.clone()),
    });

    Ok(EncodePlan {
        input: input.to_path_buf(),
        output,
        passes,
        passlog,
    })
}

fn common_args(input: &Path, chain: &FilterChain) -> Vec<String> {
    let mut args = vec![
        "-hide_banner".to_string(),
        "-y".to_string(),
        "-i".to_string(),
        input.to_string_lossy().into_owned(),
    ];
    if let Some(filters) = chain.render() {
        args.extend(["-vf".to_string(), filters]);
    }
    args
}

fn video_args(opts: &EncodeOptions) -> Vec<String> {
    let mut args = vec![
        "-c:v".to_string(),
        "libx264".to_string(),
        "-preset".to_string(),
        opts.preset.clone(),
        "-profile:v".to_string(),
        opts.profile.clone(),
        "-level".to_string(),
        opts.level.clone(),
    ];
    if let Some(tune) = &opts.tune {
        args.extend(["-tune".to_string(), tune.clone()]);
    }
    if let Some(bitrate) = opts.video_bitrate {
        args.extend(["-b:v".to_string(), format!("{bitrate}k")]);
    } else {
        args.extend(["-crf".to_string(), opts.crf.to_string()]);
    }
    if let Some(threads) = opts.threads {
        args.extend(["-threads".to_string(), threads.to_string()]);
    }
    if opts.opencl {
        args.extend(["-x264-params".to_string(), "opencl=1".to_string()]);
    }
    args
}

/// Runs every pass of a plan in order.
///
/// The final container is written to a temporary sibling path and renamed
/// into place only after the last pass exits cleanly; pass stats files are
/// removed on every exit path. Any non-zero exit fails the encode, no
/// retry.
pub fn execute_plan(backend: &dyn MediaBackend, plan: &EncodePlan) -> CoreResult<EncodeOutcome> {
    let _passlog_guard = plan.passlog.clone().map(PassLogGuard::new);
    let pending = PendingOutput::new(&plan.output)?;

    let total = plan.passes.len();
    for (index, pass) in plan.passes.iter().enumerate() {
        log::info!(
            "Running pass {}/{} for {}",
            index + 1,
            total,
            plan.input.display()
        );
        let args = match pass.sink {
            PassSink::Null => pass.render_args(None),
            PassSink::File(_) => pass.render_args(Some(pending.temp_path())),
        };
        backend.run_filter_pass(&args)?;
    }

    pending.commit()?;
    log::info!("Encode finished: {}", plan.output.display());
    Ok(EncodeOutcome::Encoded)
}

/// Plans and runs a single-file encode; with `print_command` set the
/// composed passes are printed instead.
pub fn encode_file(
    backend: &dyn MediaBackend,
    opts: &EncodeOptions,
    input: &Path,
    output: Option<&Path>,
) -> CoreResult<EncodeOutcome> {
    let plan = plan_encode(backend, opts, input, output)?;
    if opts.print_command {
        for pass in &plan.passes {
            println!("{}", pass.command_line());
        }
        return Ok(EncodeOutcome::Printed);
    }
    execute_plan(backend, &plan)
}
