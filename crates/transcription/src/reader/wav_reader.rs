use std::path::Path;

use crate::TranscriptionError;

/// Sample rate the Whisper backend expects.
pub const ASR_SAMPLE_RATE: u32 = 16000;

/// Reads a WAV file that must already be 16kHz. Errors if sample rate != 16000.
///
/// Supports integer and 32-bit float formats. Multi-channel audio is down-mixed to mono.
pub fn read_wav_16k_mono(path: impl AsRef<Path>) -> Result<Vec<f32>, TranscriptionError> {
    let path = path.as_ref();
    let reader = hound::WavReader::open(path).map_err(|e| match e {
        hound::Error::IoError(io) => TranscriptionError::io(path, io),
        other => TranscriptionError::UnsupportedAudio(format!(
            "'{}' is not a readable WAV file: {}",
            path.display(),
            other
        )),
    })?;
    let spec = reader.spec();
    if spec.sample_rate != ASR_SAMPLE_RATE {
        return Err(TranscriptionError::UnsupportedAudio(format!(
            "expected {}Hz WAV but got {}Hz in '{}'",
            ASR_SAMPLE_RATE,
            spec.sample_rate,
            path.display()
        )));
    }
    let channels = spec.channels as usize;

    let samples: Vec<f32> = match spec.sample_format {
        hound::SampleFormat::Int => {
            let max_val = (1i64 << (spec.bits_per_sample - 1)) as f32;
            reader
                .into_samples::<i32>()
                .map(|s| s.unwrap_or(0) as f32 / max_val)
                .collect()
        }
        hound::SampleFormat::Float => reader
            .into_samples::<f32>()
            .map(|s| s.unwrap_or(0.0))
            .collect(),
    };

    let mono = if channels > 1 {
        samples
            .chunks(channels)
            .map(|frame| frame.iter().sum::<f32>() / channels as f32)
            .collect()
    } else {
        samples
    };

    Ok(mono)
}
