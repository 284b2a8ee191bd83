//! Lowering the segment plan to collaborator invocations.
//!
//! The whole plan becomes a single sox call: each segment is lowered to a
//! `trim 0 <in> [speed <f> rate <rate>] [tempo <f>] trim 0 <out>` effect
//! chain, and chains are joined with sox's `:` separator, so one
//! invocation consumes the source audio segment by segment.

use std::path::Path;
use std::process::{Command, Stdio};

use tracing::{debug, info};

use super::planner::AudioSegment;
use super::{AudioError, AudioResult};

/// Format a duration or factor the way the resampler expects it.
fn effect_value(value: f64) -> String {
    format!("{value:.6}")
}

/// Lower a segment plan to the resampler's effect argument list.
pub fn resample_args(plan: &[AudioSegment], sample_rate: u32) -> Vec<String> {
    let mut args = Vec::new();

    for (index, segment) in plan.iter().enumerate() {
        if index > 0 {
            args.push(":".to_string());
        }

        args.push("trim".to_string());
        args.push("0".to_string());
        args.push(effect_value(segment.input_secs));

        if segment.speed != 1.0 {
            args.push("speed".to_string());
            args.push(effect_value(segment.speed));
            args.push("rate".to_string());
            args.push(sample_rate.to_string());
        }

        if segment.tempo != 1.0 {
            args.push("tempo".to_string());
            args.push(effect_value(segment.tempo));
        }

        args.push("trim".to_string());
        args.push("0".to_string());
        args.push(effect_value(segment.output_secs));
    }

    args
}

/// Extract the source's audio track to a lossless PCM WAV file.
pub fn extract_audio(ffmpeg: &str, input: &Path, wav_out: &Path) -> AudioResult<()> {
    if !input.exists() {
        return Err(AudioError::missing_input(input));
    }

    info!("extracting audio from {}", input.display());

    let mut cmd = Command::new(ffmpeg);
    cmd.arg("-v")
        .arg("error")
        .arg("-y")
        .arg("-i")
        .arg(input)
        .arg("-vn")
        .arg("-acodec")
        .arg("pcm_s16le")
        .arg(wav_out)
        .stdin(Stdio::null());

    debug!("Running extraction: {:?}", cmd);

    let output = cmd
        .output()
        .map_err(|source| AudioError::spawn(ffmpeg, source))?;

    if !output.status.success() {
        return Err(AudioError::command_failed(
            ffmpeg,
            output.status,
            &output.stderr,
        ));
    }

    Ok(())
}

/// Run the resampler over the extracted audio with the lowered plan.
pub fn run_resample(
    sox: &str,
    wav_in: &Path,
    audio_out: &Path,
    plan: &[AudioSegment],
    sample_rate: u32,
) -> AudioResult<()> {
    if !wav_in.exists() {
        return Err(AudioError::missing_input(wav_in));
    }

    let effects = resample_args(plan, sample_rate);
    info!(
        segments = plan.len(),
        "re-timing audio into {}",
        audio_out.display()
    );

    let mut cmd = Command::new(sox);
    cmd.arg(wav_in)
        .arg(audio_out)
        .args(&effects)
        .stdin(Stdio::null());

    debug!("Running resampler: {:?}", cmd);

    let output = cmd
        .output()
        .map_err(|source| AudioError::spawn(sox, source))?;

    if !output.status.success() {
        return Err(AudioError::command_failed(
            sox,
            output.status,
            &output.stderr,
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn passthrough_segments_lower_to_pure_trims() {
        let plan = vec![
            AudioSegment {
                input_secs: 0.1,
                output_secs: 0.1,
                speed: 1.0,
                tempo: 1.0,
            },
            AudioSegment {
                input_secs: 0.05,
                output_secs: 0.05,
                speed: 1.0,
                tempo: 1.0,
            },
        ];

        let args = resample_args(&plan, 44100);
        assert_eq!(
            args,
            vec![
                "trim", "0", "0.100000", "trim", "0", "0.100000", //
                ":", //
                "trim", "0", "0.050000", "trim", "0", "0.050000",
            ]
        );
    }

    #[test]
    fn stretched_segment_lowers_speed_and_tempo() {
        let plan = vec![AudioSegment {
            input_secs: 2.5,
            output_secs: 0.1,
            speed: 2.5,
            tempo: 10.0,
        }];

        let args = resample_args(&plan, 44100);
        assert_eq!(
            args,
            vec![
                "trim", "0", "2.500000", //
                "speed", "2.500000", "rate", "44100", //
                "tempo", "10.000000", //
                "trim", "0", "0.100000",
            ]
        );
    }

    #[test]
    fn tempo_only_segment_skips_the_speed_stage() {
        let plan = vec![AudioSegment {
            input_secs: 0.2,
            output_secs: 0.1,
            speed: 1.0,
            tempo: 2.0,
        }];

        let args = resample_args(&plan, 48000);
        assert_eq!(
            args,
            vec![
                "trim", "0", "0.200000", //
                "tempo", "2.000000", //
                "trim", "0", "0.100000",
            ]
        );
    }

    #[test]
    fn empty_plan_lowers_to_no_effects() {
        assert!(resample_args(&[], 44100).is_empty());
    }

    #[test]
    fn extract_audio_rejects_missing_file() {
        let result = extract_audio(
            "ffmpeg",
            Path::new("/nonexistent/clip.mkv"),
            Path::new("/tmp/out.wav"),
        );
        assert!(matches!(result, Err(AudioError::MissingInput(_))));
    }

    #[test]
    fn run_resample_rejects_missing_intermediate() {
        let result = run_resample(
            "sox",
            Path::new("/nonexistent/audio.wav"),
            Path::new("/tmp/out.wav"),
            &[],
            44100,
        );
        assert!(matches!(result, Err(AudioError::MissingInput(_))));
    }
}
